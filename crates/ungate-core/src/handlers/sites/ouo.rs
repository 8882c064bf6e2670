//! ouo.io shorteners: the skip anchor is present from the first paint, so
//! the jump happens in the start phase, before the gate's countdown loads.

use anyhow::{Context, Result};

use crate::handlers::{Action, Handler, SiteContext, UrlPattern};

pub fn handler() -> Handler {
    Handler::new("ouo", UrlPattern::HostSuffix("ouo.io"))
        .on_start(Action::invoke(start))
}

async fn start(cx: SiteContext) -> Result<()> {
    let href = cx
        .page
        .element_attr("a#btn-main", "href")?
        .context("skip anchor has no href")?;
    cx.page.navigate(&href)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UngateConfig;
    use crate::page::{Page, PageSnapshot, SimPage, SnapshotElement};
    use std::sync::Arc;

    #[tokio::test]
    async fn start_follows_skip_anchor() {
        let mut snap = PageSnapshot::new("https://ouo.io/s/xyz");
        snap.elements.push(SnapshotElement::with_attr(
            "a#btn-main",
            "href",
            "https://files.example/archive.rar",
        ));
        let page = Arc::new(SimPage::from_snapshot(snap));
        let cx = SiteContext {
            page: page.clone(),
            config: UngateConfig::default(),
        };
        start(cx).await.unwrap();
        assert_eq!(page.address(), "https://files.example/archive.rar");
    }

    #[tokio::test]
    async fn start_errors_when_anchor_missing() {
        let page = Arc::new(SimPage::from_snapshot(PageSnapshot::new(
            "https://ouo.io/s/xyz",
        )));
        let cx = SiteContext {
            page,
            config: UngateConfig::default(),
        };
        assert!(start(cx).await.is_err());
    }
}
