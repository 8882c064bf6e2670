//! CLI subcommand implementations.

mod configure;
mod list;
mod match_url;
mod simulate;

pub use configure::run_configure;
pub use list::run_list;
pub use match_url::run_match;
pub use simulate::run_simulate;
