//! Ordered handler registry with deterministic first-match lookup.

use super::Handler;

#[derive(Debug, Default, Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler; earlier registrations win on overlap.
    pub fn register(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    /// First handler whose pattern matches `address`, or None.
    /// No side effects; at most one handler is ever selected.
    pub fn find(&self, address: &str) -> Option<&Handler> {
        self.handlers.iter().find(|h| h.pattern.matches(address))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.iter()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::UrlPattern;

    fn named(name: &'static str, pattern: UrlPattern) -> Handler {
        Handler::new(name, pattern)
    }

    #[test]
    fn find_returns_first_match_in_order() {
        let mut reg = HandlerRegistry::new();
        reg.register(named("broad", UrlPattern::regex(r"^https://gate\.example/")));
        reg.register(named(
            "narrow",
            UrlPattern::regex(r"^https://gate\.example/video/"),
        ));

        let h = reg.find("https://gate.example/video/123").unwrap();
        assert_eq!(h.name, "broad");
    }

    #[test]
    fn find_is_deterministic() {
        let mut reg = HandlerRegistry::new();
        reg.register(named("only", UrlPattern::HostSuffix("ouo.io")));
        let a = reg.find("https://ouo.io/x").map(|h| h.name);
        let b = reg.find("https://ouo.io/x").map(|h| h.name);
        assert_eq!(a, b);
        assert_eq!(a, Some("only"));
    }

    #[test]
    fn find_none_for_unclaimed_address() {
        let mut reg = HandlerRegistry::new();
        reg.register(named("only", UrlPattern::HostSuffix("ouo.io")));
        assert!(reg.find("https://unrelated.example/page").is_none());
        assert!(HandlerRegistry::new().find("https://ouo.io/x").is_none());
    }
}
