//! Page-defense neutralizer: popup suppression and leave-prompt suppression.
//!
//! Both routines are synchronous, idempotent, and independent. Popup
//! suppression tolerates an already-hijacked `window.open` (ad blockers get
//! there first on some pages); leave-prompt suppression has no failure path
//! on supported engines.

use tracing::warn;

use crate::page::{GuardOutcome, Page, UnloadTarget};

/// Replace `window.open` with a stub reporting "not closed" and silence
/// `alert`/`confirm`. A hijacked `open` is logged as a warning and skipped.
pub fn suppress_popups(page: &dyn Page) {
    if let Err(e) = page.stub_window_open() {
        warn!("cannot stub window.open: {}", e);
    }
    page.silence_dialogs();
}

/// Defuse leave prompts on `target`: drop any handler already bound, guard
/// the property against re-assignment, and filter out new "beforeunload"
/// subscriptions while letting every other event type through.
///
/// No-op when the target does not exist (the document body is not parsed
/// during the pre-ready phase on some pages).
pub fn suppress_leave_prompt(page: &dyn Page, target: UnloadTarget) {
    if !page.unload_target_exists(target) {
        return;
    }
    page.clear_unload_handler(target);
    let mechanism = page.guard_mechanism();
    match page.guard_unload_property(target, mechanism) {
        GuardOutcome::Held => {}
        // At least one engine accepts the descriptor but turns the setter
        // into a no-op: assignments stay inert but go unlogged. Surface it
        // instead of silently replicating the gap.
        GuardOutcome::Degraded => {
            warn!(
                "unload guard degraded on {}; assignments swallowed unlogged",
                target
            );
        }
    }
    page.filter_unload_subscriptions(target);
}
