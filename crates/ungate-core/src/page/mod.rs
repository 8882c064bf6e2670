//! Page capability layer.
//!
//! The engine never touches browser globals directly. Everything it needs
//! from the page — address, readiness, navigation, and the patch points used
//! to defuse leave prompts and popup dialogs — goes through the [`Page`]
//! trait. The orchestrator and the defense routines only see this narrow
//! surface, so they can run unchanged against a real embedding or against
//! the simulated page in [`sim`].

mod sim;
mod snapshot;

pub use sim::{Effect, OpenBehavior, SimPage};
pub use snapshot::{PageSnapshot, SnapshotElement};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document parse progress, as reported by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// True once the document structure has finished parsing.
    pub fn is_dom_ready(self) -> bool {
        !matches!(self, ReadyState::Loading)
    }
}

/// Where a leave-prompt can be bound. Sites bind at either level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadTarget {
    Window,
    DocumentBody,
}

impl fmt::Display for UnloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnloadTarget::Window => write!(f, "window"),
            UnloadTarget::DocumentBody => write!(f, "document body"),
        }
    }
}

/// How the unload-property guard is installed on a platform.
/// Legacy runtimes lack a usable property-descriptor path and need the
/// old-style setter mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMechanism {
    Standard,
    LegacySetter,
}

/// What the unload-property guard ended up doing once installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Assignments to the unload handler are intercepted, logged, dropped.
    Held,
    /// The descriptor was accepted but the setter degraded to a no-op
    /// (observed on at least one engine). Assignments are still inert but
    /// go unlogged. Known platform limitation.
    Degraded,
}

/// Error from a page capability call.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("window.open is already hijacked")]
    OpenHijacked,
    #[error("no element matches selector {0:?}")]
    NoSuchElement(String),
    #[error("element {0:?} has no src")]
    NoSrc(String),
    #[error("navigation to {url:?} refused: {reason}")]
    NavigationRefused { url: String, reason: String },
}

/// Capability surface of one browsing context.
///
/// Query methods have no side effects; mutation methods apply synchronously
/// and are idempotent. `wait_dom_ready` is the only suspension point.
#[async_trait]
pub trait Page: Send + Sync {
    /// Full address of the current page.
    fn address(&self) -> String;

    /// False inside an embedded frame.
    fn is_top_frame(&self) -> bool;

    fn ready_state(&self) -> ReadyState;

    /// Resolves immediately when the document is already past `Loading`,
    /// otherwise on the next document-ready notification.
    async fn wait_dom_ready(&self);

    /// Point the browsing context at `url`.
    fn navigate(&self, url: &str) -> Result<(), PageError>;

    /// `src` attribute of the first element matching `selector`.
    fn element_src(&self, selector: &str) -> Result<String, PageError>;

    /// Named attribute of the first element matching `selector`.
    /// `Ok(None)` when the element exists but lacks the attribute.
    fn element_attr(&self, selector: &str, attr: &str) -> Result<Option<String>, PageError>;

    /// First capture of `pattern` across the page's inline scripts
    /// (capture group 1 when present, whole match otherwise).
    fn search_scripts(&self, pattern: &Regex) -> Option<String>;

    fn title(&self) -> String;

    fn set_title(&self, title: &str);

    // Patch points consumed by the defense neutralizer.

    /// Replace `window.open` with a stub whose handle reports "not closed".
    /// Fails when another agent (e.g. an ad blocker) got there first.
    fn stub_window_open(&self) -> Result<(), PageError>;

    /// Turn `alert` and `confirm` into no-ops.
    fn silence_dialogs(&self);

    /// Whether `target` exists yet (the body may not be parsed).
    fn unload_target_exists(&self, target: UnloadTarget) -> bool;

    /// Drop any unload handler already bound on `target`.
    fn clear_unload_handler(&self, target: UnloadTarget);

    /// Install the guard that swallows later unload-handler assignments.
    fn guard_unload_property(&self, target: UnloadTarget, mechanism: GuardMechanism)
        -> GuardOutcome;

    /// Wrap event subscription on `target` so "beforeunload" listeners are
    /// dropped while every other event type passes through.
    fn filter_unload_subscriptions(&self, target: UnloadTarget);

    /// Which guard mechanism this platform needs (feature detection).
    fn guard_mechanism(&self) -> GuardMechanism;
}
