//! Auto/manual arbitration for the active blueprint.
//!
//! In `Auto` the document is derived from the form on every resolve. Once the
//! user edits the blueprint text the reconciler switches to `Manual` and keeps
//! serving that text until an explicit, confirmed reset. Form changes never
//! leave `Manual` on their own.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::blueprint::Blueprint;
use crate::core::builder;
use crate::core::form::FormState;

/// Manually supplied blueprint: raw editor text, or an already parsed document
/// (older snapshots may hold the object form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManualContent {
    Text(String),
    Document(Value),
}

impl ManualContent {
    /// Text shown in the editor.
    pub fn preview_text(&self) -> String {
        match self {
            ManualContent::Text(t) => t.clone(),
            ManualContent::Document(v) => serde_json::to_string_pretty(v).unwrap_or_default(),
        }
    }

    fn is_empty_text(&self) -> bool {
        matches!(self, ManualContent::Text(t) if t.is_empty())
    }
}

/// Which code path produces the active document.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModeState {
    #[default]
    Auto,
    Manual(ManualContent),
}

impl ModeState {
    pub fn is_manual_mode(&self) -> bool {
        matches!(self, ModeState::Manual(_))
    }

    /// Present exactly when in manual mode.
    pub fn manual_content(&self) -> Option<&ManualContent> {
        match self {
            ModeState::Auto => None,
            ModeState::Manual(c) => Some(c),
        }
    }

    /// Short label for status output.
    pub fn label(&self) -> &'static str {
        match self {
            ModeState::Auto => "auto",
            ModeState::Manual(_) => "manual",
        }
    }
}

/// Result of resolving the active document.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveDocument {
    /// Built from the form.
    Derived(Blueprint),
    /// Parsed from manual text. The blueprint schema is not enforced.
    Manual(Value),
    /// Manual text that does not parse. Nothing downstream may launch or sync it.
    Invalid { raw: String, error: String },
}

impl ActiveDocument {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ActiveDocument::Invalid { .. })
    }

    /// Single-line JSON for URL projection; `None` for the invalid sentinel.
    pub fn to_compact_json(&self) -> Option<String> {
        match self {
            ActiveDocument::Derived(bp) => Some(bp.to_compact_json()),
            ActiveDocument::Manual(v) => serde_json::to_string(v).ok(),
            ActiveDocument::Invalid { .. } => None,
        }
    }

    /// Indented JSON for export; `None` for the invalid sentinel.
    pub fn to_pretty_json(&self) -> Option<String> {
        match self {
            ActiveDocument::Derived(bp) => Some(bp.to_pretty_json()),
            ActiveDocument::Manual(v) => serde_json::to_string_pretty(v).ok(),
            ActiveDocument::Invalid { .. } => None,
        }
    }
}

/// Answers yes/no questions put to the user (reset, restore).
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _question: &str) -> bool {
        self.0
    }
}

pub const RESET_QUESTION: &str = "Discard all manual blueprint edits and go back to the form settings?";

/// Single owner of the mode state.
#[derive(Debug, Default)]
pub struct Reconciler {
    state: ModeState,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn is_manual_mode(&self) -> bool {
        self.state.is_manual_mode()
    }

    /// Direct edit of the blueprint text. Captured verbatim, not re-parsed.
    pub fn edit(&mut self, raw: impl Into<String>) {
        if !self.state.is_manual_mode() {
            info!("switching to manual mode");
        }
        self.state = ModeState::Manual(ManualContent::Text(raw.into()));
    }

    /// Re-enter manual mode with content recovered from a snapshot.
    pub fn restore_manual(&mut self, content: ManualContent) {
        info!("restored manual blueprint from snapshot");
        self.state = ModeState::Manual(content);
    }

    /// Back to `Auto`, only if `confirm` agrees. Returns whether the reset happened.
    pub fn reset(&mut self, confirm: &mut dyn Confirm) -> bool {
        if !self.state.is_manual_mode() {
            return false;
        }
        if !confirm.confirm(RESET_QUESTION) {
            debug!("reset declined");
            return false;
        }
        info!("manual edits discarded, back to auto mode");
        self.state = ModeState::Auto;
        true
    }

    /// The document that feeds preview, export and the launch URL.
    ///
    /// Empty manual text counts as "nothing entered" and falls back to the form.
    pub fn resolve_active_document(&self, form: &FormState) -> ActiveDocument {
        match &self.state {
            ModeState::Manual(content) if !content.is_empty_text() => match content {
                ManualContent::Document(v) => ActiveDocument::Manual(v.clone()),
                ManualContent::Text(raw) => match serde_json::from_str::<Value>(raw) {
                    Ok(v) => ActiveDocument::Manual(v),
                    Err(e) => {
                        debug!(error = %e, "manual blueprint does not parse");
                        ActiveDocument::Invalid { raw: raw.clone(), error: e.to_string() }
                    }
                },
            },
            _ => ActiveDocument::Derived(builder::build(form)),
        }
    }

    /// Editor text: raw manual text verbatim (even when invalid), otherwise
    /// the pretty-printed derived document.
    pub fn preview_text(&self, form: &FormState) -> String {
        match &self.state {
            ModeState::Manual(content) if !content.is_empty_text() => content.preview_text(),
            _ => builder::build(form).to_pretty_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_resolves_to_build() {
        let form = FormState::default();
        let r = Reconciler::new();
        assert_eq!(r.resolve_active_document(&form), ActiveDocument::Derived(builder::build(&form)));
        assert!(r.state().manual_content().is_none());
    }

    #[test]
    fn manual_edit_survives_form_changes() {
        let mut form = FormState::default();
        let mut r = Reconciler::new();
        r.edit(r#"{"steps":[]}"#);
        let before = r.resolve_active_document(&form);

        form.php_version = "7.4".into();
        form.debug.enabled = true;

        assert_eq!(r.resolve_active_document(&form), before);
        assert!(r.is_manual_mode());
    }

    #[test]
    fn invalid_manual_text_is_flagged_but_previewed() {
        let form = FormState::default();
        let mut r = Reconciler::new();
        r.edit("{ not json");
        assert!(!r.resolve_active_document(&form).is_valid());
        assert_eq!(r.preview_text(&form), "{ not json");
    }

    #[test]
    fn reset_requires_confirmation() {
        let form = FormState::default();
        let mut r = Reconciler::new();
        r.edit("{}");

        assert!(!r.reset(&mut FixedAnswer(false)));
        assert!(r.is_manual_mode());

        assert!(r.reset(&mut FixedAnswer(true)));
        assert!(!r.is_manual_mode());
        assert_eq!(r.state().manual_content(), None);
        assert_eq!(r.resolve_active_document(&form), ActiveDocument::Derived(builder::build(&form)));
    }

    #[test]
    fn reset_in_auto_is_a_no_op() {
        let mut r = Reconciler::new();
        assert!(!r.reset(&mut FixedAnswer(true)));
    }

    #[test]
    fn empty_manual_text_falls_back_to_form() {
        let form = FormState::default();
        let mut r = Reconciler::new();
        r.edit("");
        assert!(r.is_manual_mode());
        assert_eq!(r.resolve_active_document(&form), ActiveDocument::Derived(builder::build(&form)));
    }

    #[test]
    fn document_content_passes_through() {
        let form = FormState::default();
        let mut r = Reconciler::new();
        let doc = serde_json::json!({ "landingPage": "/", "steps": [] });
        r.restore_manual(ManualContent::Document(doc.clone()));
        assert_eq!(r.resolve_active_document(&form), ActiveDocument::Manual(doc));
    }
}
