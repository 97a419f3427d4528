use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single grid record as supplied by the rows provider.
///
/// Rows are opaque JSON objects; the column reads two well-known fields from
/// them (the embedded per-row action map and the record identifier) and never
/// mutates them.
pub type Row = serde_json::Map<String, Value>;

/// Actions of one row, keyed by action index.
///
/// Insertion order is the display order. Overwriting an existing index keeps
/// the original position, which is what lets catalog actions override per-row
/// actions in place.
pub type RowActions = IndexMap<String, ResolvedAction>;

/// The derived collection: one `RowActions` entry per row, in row order.
pub type ActionsCollection = Vec<RowActions>;

/// Structured callback reference resolved through the component registry.
///
/// `provider` names a registered component; `target` names the method to
/// invoke on it. Both fields participate in template resolution, so a row can
/// select its own handler (e.g., `"target": "${handler_method}"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackRef {
    /// Logical name of the component that owns the method
    pub provider: String,
    /// Method identifier passed to the resolved component
    pub target: String,
}

/// A directly invocable action callback.
///
/// This is the programmatic counterpart of [`CallbackRef`]: it cannot come
/// from serde input and is attached to catalog templates in code. Invoked
/// with `(action index, record id, resolved action)`.
#[derive(Clone)]
pub struct ActionHandler(Arc<dyn Fn(&str, &Value, &ResolvedAction) + Send + Sync>);

impl ActionHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value, &ResolvedAction) + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    pub fn call(&self, index: &str, record_id: &Value, action: &ResolvedAction) {
        (self.0)(index, record_id, action);
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionHandler(..)")
    }
}

/// Confirmation descriptor attached to an action template.
///
/// When present, invocation is gated behind the confirmation dialog; both
/// fields are template-resolved against the owning row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPrompt {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// What the confirmation dialog collaborator receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub content: String,
}

impl ConfirmationRequest {
    pub fn from_prompt(prompt: &ConfirmPrompt) -> Self {
        Self {
            title: prompt.title.clone(),
            content: prompt.message.clone(),
        }
    }
}

/// Unresolved action descriptor, possibly containing `${ ... }` placeholders.
///
/// Templates come from two sources: per-row action maps embedded in each
/// row's own field, and the shared catalog applied uniformly to every row.
/// String fields (including nested strings under `extra`) are resolved
/// against the owning row when the template is materialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionTemplate {
    /// Human-readable label shown in the actions list
    #[serde(default)]
    pub label: Option<String>,
    /// Navigation target used by the default invocation path
    #[serde(default)]
    pub href: Option<String>,
    /// Registry-resolved callback; wins over `href` at dispatch
    #[serde(default)]
    pub callback: Option<CallbackRef>,
    /// Confirmation gate; absence means invoke immediately
    #[serde(default)]
    pub confirm: Option<ConfirmPrompt>,
    /// Explicitly hide the action; absent counts as visible
    #[serde(default)]
    pub hidden: bool,
    /// Programmatic callback, only attachable in code
    #[serde(skip)]
    pub handler: Option<ActionHandler>,
    /// Opaque fields carried through resolution untouched in shape
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Per-row materialization of an [`ActionTemplate`] after template
/// substitution, merged with the identifying `{index, row_index, record_id}`
/// triple.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedAction {
    /// Action identifier within its row
    pub index: String,
    /// Position of the owning row in the rows sequence
    pub row_index: usize,
    /// Value of the row's unique-identifier field
    #[serde(default)]
    pub record_id: Value,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub callback: Option<CallbackRef>,
    #[serde(default)]
    pub confirm: Option<ConfirmPrompt>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(skip)]
    pub handler: Option<ActionHandler>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ResolvedAction {
    /// An action with no `hidden: true` flag is visible.
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Whether invoking this action can have any effect at all.
    pub fn is_invocable(&self) -> bool {
        self.href.is_some() || self.callback.is_some() || self.handler.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_template_defaults() {
        let template: ActionTemplate = serde_json::from_value(json!({})).expect("deserialize");
        assert!(template.label.is_none());
        assert!(template.href.is_none());
        assert!(template.callback.is_none());
        assert!(template.confirm.is_none());
        assert!(!template.hidden);
        assert!(template.handler.is_none());
        assert!(template.extra.is_empty());
    }

    #[test]
    fn action_template_captures_unknown_fields() {
        let template: ActionTemplate = serde_json::from_value(json!({
            "label": "Edit",
            "href": "/edit/${id}",
            "cssClass": "action-edit"
        }))
        .expect("deserialize");
        assert_eq!(template.label.as_deref(), Some("Edit"));
        assert_eq!(template.extra.get("cssClass"), Some(&json!("action-edit")));
    }

    #[test]
    fn callback_ref_round_trip() {
        let json = r#"{"provider": "listing.columns_editor", "target": "startEdit"}"#;
        let callback: CallbackRef = serde_json::from_str(json).expect("deserialize");
        assert_eq!(callback.provider, "listing.columns_editor");
        assert_eq!(callback.target, "startEdit");

        let back = serde_json::to_string(&callback).expect("serialize");
        let callback2: CallbackRef = serde_json::from_str(&back).expect("round-trip");
        assert_eq!(callback2, callback);
    }

    #[test]
    fn resolved_action_visibility() {
        let action = ResolvedAction {
            index: "edit".into(),
            ..ResolvedAction::default()
        };
        assert!(action.is_visible());

        let hidden = ResolvedAction {
            hidden: true,
            ..action
        };
        assert!(!hidden.is_visible());
    }

    #[test]
    fn handler_is_not_serialized() {
        let action = ResolvedAction {
            index: "delete".into(),
            handler: Some(ActionHandler::new(|_, _, _| {})),
            ..ResolvedAction::default()
        };
        let value = serde_json::to_value(&action).expect("serialize");
        assert!(value.get("handler").is_none());
    }

    #[test]
    fn row_actions_override_keeps_position() {
        let mut actions = RowActions::new();
        actions.insert("edit".into(), ResolvedAction::default());
        actions.insert("delete".into(), ResolvedAction::default());
        actions.insert(
            "edit".into(),
            ResolvedAction {
                label: Some("Edit record".into()),
                ..ResolvedAction::default()
            },
        );

        let keys: Vec<&str> = actions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["edit", "delete"]);
        assert_eq!(actions["edit"].label.as_deref(), Some("Edit record"));
    }
}
