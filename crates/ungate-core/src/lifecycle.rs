//! Lifecycle orchestrator.
//!
//! Sequences the whole page treatment: frame check, config log, handler
//! lookup, the pre-ready phase (window defenses + `start`), the DOM-ready
//! wait, and the post-ready phase (body defenses, title tag, `ready`).
//! Strictly sequential; each phase's effects are fully applied before the
//! next begins. No retry, no rollback of already-patched globals.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{self, UngateConfig};
use crate::defense;
use crate::handlers::{Action, Handler, HandlerRegistry, SiteContext};
use crate::page::{Page, UnloadTarget};

/// Appended to the page title once the post-ready phase runs.
pub const TITLE_SUFFIX: &str = " - Ungate";

/// Runs the full sequence and logs any failure once at this level.
pub async fn run_guarded(page: Arc<dyn Page>, registry: &HandlerRegistry, cfg: &UngateConfig) {
    if let Err(e) = run(page, registry, cfg).await {
        warn!("lifecycle failed: {:#}", e);
    }
}

/// The phase sequence. Returns immediately inside embedded frames and
/// becomes a no-op when no handler claims the address.
pub async fn run(page: Arc<dyn Page>, registry: &HandlerRegistry, cfg: &UngateConfig) -> Result<()> {
    if !page.is_top_frame() {
        return Ok(());
    }

    let address = page.address();
    info!("working on {} with {}", address, config::dump(cfg)?);

    let Some(handler) = registry.find(&address) else {
        return Ok(());
    };
    info!("matched handler {}", handler.name);

    before_dom_ready(&page, handler, cfg).await?;
    page.wait_dom_ready().await;
    after_dom_ready(&page, handler, cfg).await?;
    Ok(())
}

async fn before_dom_ready(
    page: &Arc<dyn Page>,
    handler: &Handler,
    cfg: &UngateConfig,
) -> Result<()> {
    defense::suppress_leave_prompt(page.as_ref(), UnloadTarget::Window);
    defense::suppress_popups(page.as_ref());
    if let Some(action) = &handler.start {
        run_action(page, action, cfg).await?;
    }
    Ok(())
}

async fn after_dom_ready(
    page: &Arc<dyn Page>,
    handler: &Handler,
    cfg: &UngateConfig,
) -> Result<()> {
    // some sites bind the leave prompt on the body
    defense::suppress_leave_prompt(page.as_ref(), UnloadTarget::DocumentBody);
    let title = page.title();
    page.set_title(&format!("{title}{TITLE_SUFFIX}"));
    if let Some(action) = &handler.ready {
        run_action(page, action, cfg).await?;
    }
    Ok(())
}

/// Invoke-or-follow policy shared by both phases.
async fn run_action(page: &Arc<dyn Page>, action: &Action, cfg: &UngateConfig) -> Result<()> {
    match action {
        Action::Invoke(callback) => {
            let cx = SiteContext {
                page: Arc::clone(page),
                config: cfg.clone(),
            };
            callback(cx).await
        }
        Action::FollowSrc(selector) => {
            let src = page.element_src(selector)?;
            page.navigate(&src)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::UrlPattern;
    use crate::page::{Effect, PageSnapshot, SimPage, SnapshotElement};

    fn registry_with(handler: Handler) -> HandlerRegistry {
        let mut reg = HandlerRegistry::new();
        reg.register(handler);
        reg
    }

    #[tokio::test]
    async fn no_handler_means_no_effects() {
        let page = Arc::new(SimPage::from_snapshot(PageSnapshot::new(
            "https://unclaimed.example/",
        )));
        let reg = HandlerRegistry::new();
        run(page.clone(), &reg, &UngateConfig::default())
            .await
            .unwrap();
        assert!(page.effects().is_empty());
        assert_eq!(page.title(), "");
    }

    #[tokio::test]
    async fn embedded_frame_is_skipped_entirely() {
        let mut snap = PageSnapshot::new("https://ouo.io/s/x");
        snap.top_frame = false;
        let page = Arc::new(SimPage::from_snapshot(snap));
        let reg = registry_with(
            Handler::new("h", UrlPattern::HostSuffix("ouo.io"))
                .on_ready(Action::follow_src("#dl")),
        );
        run(page.clone(), &reg, &UngateConfig::default())
            .await
            .unwrap();
        assert!(page.effects().is_empty());
    }

    #[tokio::test]
    async fn follow_src_with_missing_element_propagates_error() {
        let page = Arc::new(SimPage::from_snapshot(PageSnapshot::new(
            "https://ouo.io/s/x",
        )));
        let reg = registry_with(
            Handler::new("h", UrlPattern::HostSuffix("ouo.io"))
                .on_start(Action::follow_src("#gone")),
        );
        let err = run(page.clone(), &reg, &UngateConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("#gone"));
        // defenses applied before the failure stay applied
        assert!(page
            .effects()
            .contains(&Effect::UnloadSubscriptionsFiltered(UnloadTarget::Window)));
    }

    #[tokio::test]
    async fn guarded_run_swallows_failures() {
        let page = Arc::new(SimPage::from_snapshot(PageSnapshot::new(
            "https://ouo.io/s/x",
        )));
        let reg = registry_with(
            Handler::new("h", UrlPattern::HostSuffix("ouo.io"))
                .on_start(Action::follow_src("#gone")),
        );
        run_guarded(page, &reg, &UngateConfig::default()).await;
    }

    #[tokio::test]
    async fn title_gets_suffix_after_ready() {
        let mut snap = PageSnapshot::new("https://ouo.io/s/x");
        snap.title = "Gate".to_string();
        snap.elements
            .push(SnapshotElement::with_src("#dl", "https://real.example/f.bin"));
        let page = Arc::new(SimPage::from_snapshot(snap));
        let reg = registry_with(
            Handler::new("h", UrlPattern::HostSuffix("ouo.io"))
                .on_ready(Action::follow_src("#dl")),
        );
        run(page.clone(), &reg, &UngateConfig::default())
            .await
            .unwrap();
        assert_eq!(page.title(), "Gate - Ungate");
        assert_eq!(page.address(), "https://real.example/f.bin");
    }
}
