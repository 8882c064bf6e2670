//! `ungate match`: handler lookup for one address.

use ungate_core::handlers::HandlerRegistry;

pub fn run_match(registry: &HandlerRegistry, url: &str) {
    match registry.find(url) {
        Some(handler) => println!("{}", handler.name),
        None => println!("no handler"),
    }
}
