//! Site handler model: a URL pattern plus optional `start`/`ready` actions.
//!
//! A handler claims a page by pattern and says what to do in each lifecycle
//! phase. An action is either site code to run, or a declarative "follow
//! this element's src" directive resolved by the orchestrator — never
//! decided by runtime type inspection.

mod pattern;
mod registry;
pub mod sites;

pub use pattern::UrlPattern;
pub use registry::HandlerRegistry;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::UngateConfig;
use crate::page::Page;

/// Everything a site callback gets to work with.
#[derive(Clone)]
pub struct SiteContext {
    pub page: Arc<dyn Page>,
    pub config: UngateConfig,
}

/// Boxed async site callback.
pub type Callback = Arc<
    dyn Fn(SiteContext) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync,
>;

/// One lifecycle action.
#[derive(Clone)]
pub enum Action {
    /// Run site code (may suspend).
    Invoke(Callback),
    /// Navigate to the `src` of the element matching this selector.
    FollowSrc(String),
}

impl Action {
    /// Wraps an async closure into the `Invoke` arm.
    pub fn invoke<F, Fut>(f: F) -> Self
    where
        F: Fn(SiteContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Action::Invoke(Arc::new(move |cx| Box::pin(f(cx))))
    }

    pub fn follow_src(selector: &str) -> Self {
        Action::FollowSrc(selector.to_string())
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Invoke(_) => write!(f, "Invoke"),
            Action::FollowSrc(selector) => write!(f, "FollowSrc({selector:?})"),
        }
    }
}

/// A site handler: where it applies and what to do in each phase.
#[derive(Debug, Clone)]
pub struct Handler {
    pub name: &'static str,
    pub pattern: UrlPattern,
    /// Runs before the DOM-ready wait.
    pub start: Option<Action>,
    /// Runs after the document has left the loading state.
    pub ready: Option<Action>,
}

impl Handler {
    pub fn new(name: &'static str, pattern: UrlPattern) -> Self {
        Self {
            name,
            pattern,
            start: None,
            ready: None,
        }
    }

    pub fn on_start(mut self, action: Action) -> Self {
        self.start = Some(action);
        self
    }

    pub fn on_ready(mut self, action: Action) -> Self {
        self.ready = Some(action);
        self
    }
}
