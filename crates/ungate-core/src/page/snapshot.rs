//! Declarative page description for offline simulation.
//!
//! A snapshot captures what a gate page looks like to the engine: address,
//! title, the elements that answer selector queries, and inline script
//! bodies. The CLI loads one from TOML and replays the full lifecycle
//! against it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::ReadyState;

/// One element visible to selector queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotElement {
    /// Selector this element answers to (exact match).
    pub selector: String,
    /// `src` attribute, if any.
    #[serde(default)]
    pub src: Option<String>,
    /// Other attributes (e.g. `href`, `data-url`).
    #[serde(default)]
    pub attrs: HashMap<String, String>,
}

impl SnapshotElement {
    pub fn with_src(selector: &str, src: &str) -> Self {
        Self {
            selector: selector.to_string(),
            src: Some(src.to_string()),
            attrs: HashMap::new(),
        }
    }

    pub fn with_attr(selector: &str, attr: &str, value: &str) -> Self {
        let mut attrs = HashMap::new();
        attrs.insert(attr.to_string(), value.to_string());
        Self {
            selector: selector.to_string(),
            src: None,
            attrs,
        }
    }
}

/// Serializable description of a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Page address.
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// False to simulate running inside an embedded frame.
    #[serde(default = "default_true")]
    pub top_frame: bool,
    /// Initial document readiness: "loading", "interactive" or "complete".
    #[serde(default = "default_ready")]
    pub ready_state: ReadyState,
    #[serde(default)]
    pub elements: Vec<SnapshotElement>,
    /// Inline script bodies, searchable by site handlers.
    #[serde(default)]
    pub scripts: Vec<String>,
    /// Simulate an ad blocker that already hijacked `window.open`.
    #[serde(default)]
    pub open_hijacked: bool,
    /// Simulate a legacy runtime that needs the old-style setter guard.
    #[serde(default)]
    pub legacy_setter: bool,
    /// Simulate the engine where the standard property guard degrades to a
    /// silent no-op.
    #[serde(default)]
    pub degraded_guard: bool,
    /// Whether `document.body` exists yet.
    #[serde(default = "default_true")]
    pub has_body: bool,
    /// A leave-prompt handler is already bound on the window.
    #[serde(default)]
    pub window_unload_handler: bool,
    /// A leave-prompt handler is already bound on the body.
    #[serde(default)]
    pub body_unload_handler: bool,
}

fn default_true() -> bool {
    true
}

fn default_ready() -> ReadyState {
    ReadyState::Complete
}

impl PageSnapshot {
    /// Snapshot of a fully parsed top-frame page with no elements.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            top_frame: true,
            ready_state: ReadyState::Complete,
            elements: Vec::new(),
            scripts: Vec::new(),
            open_hijacked: false,
            legacy_setter: false,
            degraded_guard: false,
            has_body: true,
            window_unload_handler: false,
            body_unload_handler: false,
        }
    }

    /// Load a snapshot from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read snapshot: {}", path.display()))?;
        let snapshot = toml::from_str(&data)
            .with_context(|| format!("parse snapshot TOML: {}", path.display()))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_toml_minimal() {
        let toml = r#"
            url = "https://adf.ly/abc"
        "#;
        let snap: PageSnapshot = toml::from_str(toml).unwrap();
        assert_eq!(snap.url, "https://adf.ly/abc");
        assert!(snap.top_frame);
        assert!(snap.has_body);
        assert_eq!(snap.ready_state, ReadyState::Complete);
        assert!(snap.elements.is_empty());
        assert!(!snap.open_hijacked);
    }

    #[test]
    fn snapshot_toml_full() {
        let toml = r#"
            url = "https://imagetwist.com/x1y2z3/photo.jpg"
            title = "photo.jpg"
            ready_state = "loading"
            top_frame = false
            window_unload_handler = true

            [[elements]]
            selector = "img.pic"
            src = "https://img.imagetwist.com/x1y2z3/photo.jpg"

            [[elements]]
            selector = "a#continue"
            [elements.attrs]
            href = "https://imagetwist.com/next"
        "#;
        let snap: PageSnapshot = toml::from_str(toml).unwrap();
        assert_eq!(snap.ready_state, ReadyState::Loading);
        assert!(!snap.top_frame);
        assert!(snap.window_unload_handler);
        assert_eq!(snap.elements.len(), 2);
        assert_eq!(
            snap.elements[0].src.as_deref(),
            Some("https://img.imagetwist.com/x1y2z3/photo.jpg")
        );
        assert_eq!(
            snap.elements[1].attrs.get("href").map(String::as_str),
            Some("https://imagetwist.com/next")
        );
    }

    #[test]
    fn snapshot_load_missing_file_has_context() {
        let err = PageSnapshot::load(Path::new("/nonexistent/snap.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("read snapshot"));
    }

    #[test]
    fn snapshot_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.toml");
        let mut snap = PageSnapshot::new("https://ouo.io/abcd");
        snap.elements
            .push(SnapshotElement::with_attr("a#btn-main", "href", "https://real.example/f.zip"));
        std::fs::write(&path, toml::to_string_pretty(&snap).unwrap()).unwrap();

        let loaded = PageSnapshot::load(&path).unwrap();
        assert_eq!(loaded.url, "https://ouo.io/abcd");
        assert_eq!(loaded.elements.len(), 1);
    }
}
