//! `ungate list`: print registered handlers.

use ungate_core::handlers::HandlerRegistry;

pub fn run_list(registry: &HandlerRegistry) {
    for handler in registry.iter() {
        let phases = match (&handler.start, &handler.ready) {
            (Some(_), Some(_)) => "start+ready",
            (Some(_), None) => "start",
            (None, Some(_)) => "ready",
            (None, None) => "-",
        };
        println!("{:<14} {:<12} {:?}", handler.name, phases, handler.pattern);
    }
}
