//! imagetwist viewer pages: the full-size image is the `img.pic` element.

use crate::handlers::{Action, Handler, UrlPattern};

pub fn handler() -> Handler {
    Handler::new("imagetwist", UrlPattern::HostSuffix("imagetwist.com"))
        .on_ready(Action::follow_src("img.pic"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Action;

    #[test]
    fn handler_is_declarative() {
        let h = handler();
        assert!(h.start.is_none());
        assert!(matches!(
            h.ready,
            Some(Action::FollowSrc(ref sel)) if sel == "img.pic"
        ));
    }
}
