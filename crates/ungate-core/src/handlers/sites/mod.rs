//! Built-in site handlers.

mod adfly;
mod imagetwist;
mod imagevenue;
mod ouo;

use super::HandlerRegistry;

/// Registry with every built-in handler, in match priority order.
pub fn default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register(adfly::handler());
    registry.register(ouo::handler());
    registry.register(imagetwist::handler());
    registry.register(imagevenue::handler());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_dispatches_by_site() {
        let reg = default_registry();
        assert_eq!(reg.find("https://adf.ly/1ABCD").unwrap().name, "adfly");
        assert_eq!(reg.find("https://ouo.io/s/xyz").unwrap().name, "ouo");
        assert_eq!(
            reg.find("https://imagetwist.com/a1b2c3/pic.jpg").unwrap().name,
            "imagetwist"
        );
        assert_eq!(
            reg.find("https://imagevenue.com/ME12ABCD").unwrap().name,
            "imagevenue"
        );
        assert!(reg.find("https://example.com/").is_none());
    }
}
