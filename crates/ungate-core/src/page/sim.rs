//! Simulated page: a [`Page`] over an in-memory snapshot.
//!
//! Every mutation the engine performs is recorded in an ordered effect log,
//! and the page side of each patch can be driven explicitly (`window_open`,
//! `assign_unload_handler`, ...) so tests and the CLI can observe what a
//! site script would see after the defenses are applied.

use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::{Mutex, RwLock};
use tokio::sync::watch;

use super::snapshot::{PageSnapshot, SnapshotElement};
use super::{GuardMechanism, GuardOutcome, Page, PageError, ReadyState, UnloadTarget};

/// One observable mutation performed on the page, in application order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Navigated(String),
    TitleChanged(String),
    WindowOpenStubbed,
    DialogsSilenced,
    UnloadHandlerCleared(UnloadTarget),
    UnloadGuardInstalled {
        target: UnloadTarget,
        mechanism: GuardMechanism,
        outcome: GuardOutcome,
    },
    UnloadSubscriptionsFiltered(UnloadTarget),
    BlockedUnloadAssignment(UnloadTarget),
    BlockedUnloadListener(UnloadTarget),
    FinishedLoading,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Navigated(url) => write!(f, "navigated to {url}"),
            Effect::TitleChanged(title) => write!(f, "title changed to {title:?}"),
            Effect::WindowOpenStubbed => write!(f, "window.open stubbed"),
            Effect::DialogsSilenced => write!(f, "alert/confirm silenced"),
            Effect::UnloadHandlerCleared(t) => write!(f, "cleared unload handler on {t}"),
            Effect::UnloadGuardInstalled {
                target,
                mechanism,
                outcome,
            } => write!(f, "unload guard on {target} ({mechanism:?}): {outcome:?}"),
            Effect::UnloadSubscriptionsFiltered(t) => {
                write!(f, "beforeunload subscriptions filtered on {t}")
            }
            Effect::BlockedUnloadAssignment(t) => {
                write!(f, "blocked onbeforeunload assignment on {t}")
            }
            Effect::BlockedUnloadListener(t) => {
                write!(f, "blocked beforeunload listener on {t}")
            }
            Effect::FinishedLoading => write!(f, "document finished loading"),
        }
    }
}

/// What a page script observes when it calls `window.open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenBehavior {
    /// Real popup; suppression not in place.
    Popup,
    /// Suppressed: a stub handle whose `closed` reads as given.
    Stub { closed: bool },
}

#[derive(Debug, Default)]
struct PatchState {
    open_stubbed: bool,
    dialogs_silenced: bool,
    window_guard: Option<GuardOutcome>,
    body_guard: Option<GuardOutcome>,
    window_filtered: bool,
    body_filtered: bool,
    window_unload_handler: bool,
    body_unload_handler: bool,
}

/// In-memory [`Page`] implementation backed by a [`PageSnapshot`].
pub struct SimPage {
    url: RwLock<String>,
    title: RwLock<String>,
    top_frame: bool,
    has_body: bool,
    open_hijacked: bool,
    legacy_setter: bool,
    degraded_guard: bool,
    elements: Vec<SnapshotElement>,
    scripts: Vec<String>,
    ready_tx: watch::Sender<ReadyState>,
    state: Mutex<PatchState>,
    listeners: Mutex<Vec<(UnloadTarget, String)>>,
    effects: Mutex<Vec<Effect>>,
}

impl SimPage {
    pub fn from_snapshot(snapshot: PageSnapshot) -> Self {
        let (ready_tx, _) = watch::channel(snapshot.ready_state);
        let state = PatchState {
            window_unload_handler: snapshot.window_unload_handler,
            body_unload_handler: snapshot.body_unload_handler,
            ..PatchState::default()
        };
        Self {
            url: RwLock::new(snapshot.url),
            title: RwLock::new(snapshot.title),
            top_frame: snapshot.top_frame,
            has_body: snapshot.has_body,
            open_hijacked: snapshot.open_hijacked,
            legacy_setter: snapshot.legacy_setter,
            degraded_guard: snapshot.degraded_guard,
            elements: snapshot.elements,
            scripts: snapshot.scripts,
            ready_tx,
            state: Mutex::new(state),
            listeners: Mutex::new(Vec::new()),
            effects: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, effect: Effect) {
        self.effects.lock().unwrap().push(effect);
    }

    fn element(&self, selector: &str) -> Option<&SnapshotElement> {
        self.elements.iter().find(|e| e.selector == selector)
    }

    /// Ordered copy of the effect log.
    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }

    /// Marks the document as parsed and wakes the DOM-ready wait.
    pub fn finish_loading(&self) {
        self.ready_tx.send_replace(ReadyState::Interactive);
        self.record(Effect::FinishedLoading);
    }

    // Page-side simulation: what a site script would observe.

    /// Simulates a site script calling `window.open`.
    pub fn window_open(&self) -> OpenBehavior {
        if self.state.lock().unwrap().open_stubbed {
            OpenBehavior::Stub { closed: false }
        } else {
            OpenBehavior::Popup
        }
    }

    /// Simulates `alert`/`confirm`; true when a dialog would be shown.
    pub fn dialog_shows(&self) -> bool {
        !self.state.lock().unwrap().dialogs_silenced
    }

    /// Simulates assigning `onbeforeunload` on `target`; true when the
    /// binding took effect.
    pub fn assign_unload_handler(&self, target: UnloadTarget) -> bool {
        let mut state = self.state.lock().unwrap();
        let guard = match target {
            UnloadTarget::Window => state.window_guard,
            UnloadTarget::DocumentBody => state.body_guard,
        };
        match guard {
            Some(GuardOutcome::Held) => {
                drop(state);
                tracing::info!("blocked onbeforeunload on {}", target);
                self.record(Effect::BlockedUnloadAssignment(target));
                false
            }
            // The degraded guard swallows the assignment without a trace.
            Some(GuardOutcome::Degraded) => false,
            None => {
                match target {
                    UnloadTarget::Window => state.window_unload_handler = true,
                    UnloadTarget::DocumentBody => state.body_unload_handler = true,
                }
                true
            }
        }
    }

    /// Simulates `addEventListener(event, ...)` on `target`; true when the
    /// subscription was registered.
    pub fn add_event_listener(&self, target: UnloadTarget, event: &str) -> bool {
        let filtered = {
            let state = self.state.lock().unwrap();
            match target {
                UnloadTarget::Window => state.window_filtered,
                UnloadTarget::DocumentBody => state.body_filtered,
            }
        };
        if filtered && event == "beforeunload" {
            tracing::info!("blocked beforeunload listener on {}", target);
            self.record(Effect::BlockedUnloadListener(target));
            return false;
        }
        self.listeners
            .lock()
            .unwrap()
            .push((target, event.to_string()));
        true
    }

    /// Whether an unload handler is currently bound on `target`.
    pub fn has_unload_handler(&self, target: UnloadTarget) -> bool {
        let state = self.state.lock().unwrap();
        match target {
            UnloadTarget::Window => state.window_unload_handler,
            UnloadTarget::DocumentBody => state.body_unload_handler,
        }
    }
}

#[async_trait]
impl Page for SimPage {
    fn address(&self) -> String {
        self.url.read().unwrap().clone()
    }

    fn is_top_frame(&self) -> bool {
        self.top_frame
    }

    fn ready_state(&self) -> ReadyState {
        *self.ready_tx.borrow()
    }

    async fn wait_dom_ready(&self) {
        let mut rx = self.ready_tx.subscribe();
        if rx.borrow().is_dom_ready() {
            return;
        }
        while rx.changed().await.is_ok() {
            if rx.borrow().is_dom_ready() {
                return;
            }
        }
    }

    fn navigate(&self, url: &str) -> Result<(), PageError> {
        if url.is_empty() {
            return Err(PageError::NavigationRefused {
                url: url.to_string(),
                reason: "empty target".to_string(),
            });
        }
        *self.url.write().unwrap() = url.to_string();
        self.record(Effect::Navigated(url.to_string()));
        Ok(())
    }

    fn element_src(&self, selector: &str) -> Result<String, PageError> {
        let element = self
            .element(selector)
            .ok_or_else(|| PageError::NoSuchElement(selector.to_string()))?;
        element
            .src
            .clone()
            .ok_or_else(|| PageError::NoSrc(selector.to_string()))
    }

    fn element_attr(&self, selector: &str, attr: &str) -> Result<Option<String>, PageError> {
        let element = self
            .element(selector)
            .ok_or_else(|| PageError::NoSuchElement(selector.to_string()))?;
        Ok(element.attrs.get(attr).cloned())
    }

    fn search_scripts(&self, pattern: &Regex) -> Option<String> {
        self.scripts.iter().find_map(|script| {
            pattern.captures(script).map(|caps| {
                caps.get(1)
                    .unwrap_or_else(|| caps.get(0).unwrap())
                    .as_str()
                    .to_string()
            })
        })
    }

    fn title(&self) -> String {
        self.title.read().unwrap().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.write().unwrap() = title.to_string();
        self.record(Effect::TitleChanged(title.to_string()));
    }

    fn stub_window_open(&self) -> Result<(), PageError> {
        if self.open_hijacked {
            return Err(PageError::OpenHijacked);
        }
        self.state.lock().unwrap().open_stubbed = true;
        self.record(Effect::WindowOpenStubbed);
        Ok(())
    }

    fn silence_dialogs(&self) {
        self.state.lock().unwrap().dialogs_silenced = true;
        self.record(Effect::DialogsSilenced);
    }

    fn unload_target_exists(&self, target: UnloadTarget) -> bool {
        match target {
            UnloadTarget::Window => true,
            UnloadTarget::DocumentBody => self.has_body,
        }
    }

    fn clear_unload_handler(&self, target: UnloadTarget) {
        {
            let mut state = self.state.lock().unwrap();
            match target {
                UnloadTarget::Window => state.window_unload_handler = false,
                UnloadTarget::DocumentBody => state.body_unload_handler = false,
            }
        }
        self.record(Effect::UnloadHandlerCleared(target));
    }

    fn guard_unload_property(
        &self,
        target: UnloadTarget,
        mechanism: GuardMechanism,
    ) -> GuardOutcome {
        let outcome = if mechanism == GuardMechanism::Standard && self.degraded_guard {
            GuardOutcome::Degraded
        } else {
            GuardOutcome::Held
        };
        {
            let mut state = self.state.lock().unwrap();
            match target {
                UnloadTarget::Window => state.window_guard = Some(outcome),
                UnloadTarget::DocumentBody => state.body_guard = Some(outcome),
            }
        }
        self.record(Effect::UnloadGuardInstalled {
            target,
            mechanism,
            outcome,
        });
        outcome
    }

    fn filter_unload_subscriptions(&self, target: UnloadTarget) {
        {
            let mut state = self.state.lock().unwrap();
            match target {
                UnloadTarget::Window => state.window_filtered = true,
                UnloadTarget::DocumentBody => state.body_filtered = true,
            }
        }
        self.record(Effect::UnloadSubscriptionsFiltered(target));
    }

    fn guard_mechanism(&self) -> GuardMechanism {
        if self.legacy_setter {
            GuardMechanism::LegacySetter
        } else {
            GuardMechanism::Standard
        }
    }
}
