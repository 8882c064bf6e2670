//! imagevenue galleries: jump to the raw image unless the user turned
//! image redirection off.

use anyhow::Result;
use tracing::info;

use crate::handlers::{Action, Handler, SiteContext, UrlPattern};

pub fn handler() -> Handler {
    Handler::new("imagevenue", UrlPattern::HostSuffix("imagevenue.com"))
        .on_ready(Action::invoke(ready))
}

async fn ready(cx: SiteContext) -> Result<()> {
    if !cx.config.redirect_image {
        info!("image redirection disabled; leaving viewer page as is");
        return Ok(());
    }
    let src = cx.page.element_src("#main_image")?;
    cx.page.navigate(&src)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UngateConfig;
    use crate::page::{Page, PageSnapshot, SimPage, SnapshotElement};
    use std::sync::Arc;

    fn viewer_page() -> Arc<SimPage> {
        let mut snap = PageSnapshot::new("https://imagevenue.com/ME12ABCD");
        snap.elements.push(SnapshotElement::with_src(
            "#main_image",
            "https://cdn.imagevenue.com/full/photo.jpg",
        ));
        Arc::new(SimPage::from_snapshot(snap))
    }

    #[tokio::test]
    async fn redirects_to_raw_image_by_default() {
        let page = viewer_page();
        let cx = SiteContext {
            page: page.clone(),
            config: UngateConfig::default(),
        };
        ready(cx).await.unwrap();
        assert_eq!(page.address(), "https://cdn.imagevenue.com/full/photo.jpg");
    }

    #[tokio::test]
    async fn stays_put_when_redirection_disabled() {
        let page = viewer_page();
        let cx = SiteContext {
            page: page.clone(),
            config: UngateConfig {
                redirect_image: false,
                ..UngateConfig::default()
            },
        };
        ready(cx).await.unwrap();
        assert_eq!(page.address(), "https://imagevenue.com/ME12ABCD");
    }
}
