//! Declarative action trees loaded from JSON.
//!
//! ```json
//! {
//!   "trigger": "kv",
//!   "short_descr": "Key-value store",
//!   "sub_actions": [
//!     { "trigger": "get", "consume_min": 1, "arg_names": ["key"], "reply": "get {0}" }
//!   ]
//! }
//! ```

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ActionError;
use crate::handler::{Handler, HandlerError};
use crate::state::ParseState;

/// Errors from loading a manifest.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest is not valid JSON or does not match the schema.
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// The described tree violates an action-tree rule.
    #[error("invalid action tree: {0}")]
    Tree(#[from] ActionError),
}

/// JSON description of an action and its sub-actions.
///
/// Every field except `trigger` may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionManifest {
    /// Token matched by the action.
    pub trigger: String,
    /// Minimum tokens after the trigger.
    pub consume_min: i32,
    /// Maximum tokens after the trigger; negative for all remaining.
    pub consume_max: i32,
    /// One-line description.
    pub short_descr: String,
    /// Full description.
    pub long_descr: String,
    /// Placeholder names for consumed tokens.
    pub arg_names: Vec<String>,
    /// Hide from sub-action listings.
    pub hidden: bool,
    /// Suppress the synthetic help sub-action.
    pub disable_help: bool,
    /// Trigger of the synthetic help sub-action for this subtree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_trigger: Option<String>,
    /// Output template printed when the action runs; see [`ReplyHandler`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Nested sub-actions.
    pub sub_actions: Vec<ActionManifest>,
}

impl ActionManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the (unfinalized) action tree described by this manifest.
    pub fn build(&self) -> Result<Action, ActionError> {
        let mut action = Action::new(self.trigger.as_str())
            .with_consume(self.consume_min, self.consume_max)
            .with_short_descr(self.short_descr.as_str())
            .with_long_descr(self.long_descr.as_str())
            .with_arg_names(self.arg_names.iter().cloned())
            .with_hidden(self.hidden)
            .with_disable_help(self.disable_help);
        if let Some(trigger) = &self.help_trigger {
            action = action.with_help_trigger(trigger.as_str());
        }
        if let Some(template) = &self.reply {
            action = action.with_handler(ReplyHandler::new(template.as_str()));
        }
        for sub in &self.sub_actions {
            action.add_sub_action(sub.build()?)?;
        }
        Ok(action)
    }

    /// Parse, build, and finalize a tree in one step.
    pub fn load_tree(text: &str) -> Result<Action, ManifestError> {
        let mut action = Self::from_json(text)?.build()?;
        action.finalize()?;
        Ok(action)
    }
}

/// Handler printing a templated line.
///
/// Placeholders: `{path}` is the matched action's path, `{args}` the consumed
/// tokens joined by spaces, and `{0}`, `{1}`, ... individual consumed tokens
/// (empty when absent). Anything else is copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyHandler {
    template: String,
}

impl ReplyHandler {
    /// Create a handler for `template`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Expand the template against the current state.
    pub fn expand(&self, state: &ParseState) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            let key = &after[..close];
            match key {
                "path" => out.push_str(state.matched().last().map_or("", String::as_str)),
                "args" => out.push_str(&state.args().join(" ")),
                _ => match key.parse::<usize>() {
                    Ok(idx) => out.push_str(state.args().get(idx).map_or("", String::as_str)),
                    Err(_) => out.push_str(&rest[open..open + close + 2]),
                },
            }
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        out
    }
}

impl Handler for ReplyHandler {
    fn handle(&self, state: &mut ParseState, _extra: &[&dyn Any]) -> Result<(), HandlerError> {
        let line = self.expand(state);
        state.print(&line);
        state.print("\n");
        Ok(())
    }
}
