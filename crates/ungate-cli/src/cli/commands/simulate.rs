//! `ungate run`: replay the lifecycle against a saved page snapshot and
//! print everything the engine did to the page.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use ungate_core::config::UngateConfig;
use ungate_core::handlers::HandlerRegistry;
use ungate_core::lifecycle;
use ungate_core::page::{Page, PageSnapshot, ReadyState, SimPage};

pub async fn run_simulate(
    registry: &HandlerRegistry,
    cfg: &UngateConfig,
    path: &Path,
) -> Result<()> {
    let snapshot = PageSnapshot::load(path)?;
    let still_loading = snapshot.ready_state == ReadyState::Loading;
    let page = Arc::new(SimPage::from_snapshot(snapshot));
    let as_page: Arc<dyn Page> = page.clone();

    // A snapshot saved mid-parse: finish the document once the lifecycle
    // suspends on the DOM-ready wait, as a real parser would.
    let finish = async {
        if still_loading {
            tokio::task::yield_now().await;
            page.finish_loading();
        }
    };
    tokio::join!(lifecycle::run_guarded(as_page, registry, cfg), finish);

    for effect in page.effects() {
        println!("{effect}");
    }
    println!("final url: {}", page.address());
    Ok(())
}
