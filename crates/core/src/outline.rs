//! Serializable snapshot of an action tree.

use serde::Serialize;

use crate::action::Action;

/// Structural description of an action and its sub-actions.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionOutline {
    /// The action's trigger.
    pub trigger: String,
    /// Space-joined triggers from the root.
    pub path: String,
    /// Tokens that must follow the trigger.
    pub consume_min: usize,
    /// Tokens claimed at most; absent when unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consume_max: Option<usize>,
    /// One-line description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_descr: String,
    /// Whether the action is hidden from listings.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Immediate sub-actions in attach order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_actions: Vec<ActionOutline>,
}

impl Action {
    /// Snapshot this action's subtree.
    pub fn outline(&self) -> ActionOutline {
        let range = self.consume_range();
        ActionOutline {
            trigger: self.trigger().to_string(),
            path: self.path().to_string(),
            consume_min: range.min,
            consume_max: range.max,
            short_descr: self.short_descr().to_string(),
            hidden: self.is_hidden(),
            sub_actions: self.sub_actions().iter().map(Action::outline).collect(),
        }
    }
}

/// Pretty-printed JSON for an outline.
pub fn to_pretty_json(outline: &ActionOutline) -> String {
    serde_json::to_string_pretty(outline).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_mirrors_tree() {
        let mut root = Action::new("root");
        root.add_sub_action(Action::new("cat").with_consume_max(-1).with_short_descr("print"))
            .unwrap();
        root.finalize().unwrap();

        let outline = root.outline();
        assert_eq!(outline.path, "root");
        let triggers: Vec<&str> = outline
            .sub_actions
            .iter()
            .map(|s| s.trigger.as_str())
            .collect();
        assert_eq!(triggers, ["cat", "help"]);
        assert_eq!(outline.sub_actions[0].consume_max, None);
        assert_eq!(outline.sub_actions[1].consume_max, Some(1));

        let json: serde_json::Value = serde_json::from_str(&to_pretty_json(&outline)).unwrap();
        assert_eq!(json["sub_actions"][0]["path"], "root cat");
        assert!(json["sub_actions"][0].get("consume_max").is_none());
        assert!(json.get("hidden").is_none());
    }
}
