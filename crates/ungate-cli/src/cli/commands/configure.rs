//! `ungate configure`: point the user at the configuration surfaces.

use anyhow::Result;
use ungate_core::config;

pub fn run_configure() -> Result<()> {
    println!("configuration page: {}", config::CONFIGURE_URL);
    println!("local config file:  {}", config::config_path()?.display());
    Ok(())
}
