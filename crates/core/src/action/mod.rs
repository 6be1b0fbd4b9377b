//! The action tree: data model, builder, finalizer, and parser.

mod finalize;
mod parse;
mod tree;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handler::{FnHandler, Handler, HandlerError};
use crate::help::{DefaultHelp, HelpGenerator};
use crate::state::ParseState;

/// Normalized consume window of a finalized action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeRange {
    /// Tokens that must follow the trigger.
    pub min: usize,
    /// Tokens the action claims at most; `None` claims every remaining token.
    pub max: Option<usize>,
}

impl ConsumeRange {
    /// Normalize raw bounds: negative `min` becomes 0, a non-negative `max`
    /// below `min` is raised to `min`, a negative `max` is unbounded.
    pub fn from_raw(min: i32, max: i32) -> Self {
        let min = min.max(0) as usize;
        let max = usize::try_from(max).ok().map(|max| max.max(min));
        Self { min, max }
    }

    /// Whether the action takes every remaining token.
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// A node of the action tree.
///
/// Actions are created detached with [`Action::new`], configured through the
/// `with_*` builder methods, composed with [`Action::add_sub_action`], and
/// prepared once with [`Action::finalize`]. A finalized tree is immutable and
/// may be parsed from many threads at once.
#[derive(Clone, Default)]
pub struct Action {
    trigger: String,
    consume_min: i32,
    consume_max: i32,
    handler: Option<Arc<dyn Handler>>,
    short_descr: String,
    long_descr: String,
    arg_names: Vec<String>,
    hidden: bool,
    disable_help: bool,
    help_trigger: Option<String>,
    help_generator: Option<Arc<dyn HelpGenerator>>,

    // Set when attached or finalized.
    parent_path: Option<String>,
    path: String,
    sub_action_lookup: HashMap<String, usize>,
    sub_actions: Vec<Action>,
    answers_help: bool,
    finalized: bool,
}

impl Action {
    /// Create a detached action matching `trigger`.
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            ..Self::default()
        }
    }

    // ── Builder ─────────────────────────────────────────────────────────

    /// Minimum number of tokens after the trigger. Negative values count as 0.
    #[must_use]
    pub fn with_consume_min(mut self, min: i32) -> Self {
        self.consume_min = min;
        self
    }

    /// Maximum number of tokens after the trigger. A negative value consumes
    /// every remaining token; a value below the minimum is raised to it.
    #[must_use]
    pub fn with_consume_max(mut self, max: i32) -> Self {
        self.consume_max = max;
        self
    }

    /// Set both consume bounds.
    #[must_use]
    pub fn with_consume(self, min: i32, max: i32) -> Self {
        self.with_consume_min(min).with_consume_max(max)
    }

    /// Attach a handler.
    #[must_use]
    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Attach a closure as the handler.
    #[must_use]
    pub fn with_handler_fn<F>(self, f: F) -> Self
    where
        F: Fn(&mut ParseState, &[&dyn Any]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.with_handler(FnHandler(f))
    }

    /// One-line description shown in sub-action listings.
    #[must_use]
    pub fn with_short_descr(mut self, descr: impl Into<String>) -> Self {
        self.short_descr = descr.into();
        self
    }

    /// Full description shown in this action's own help.
    #[must_use]
    pub fn with_long_descr(mut self, descr: impl Into<String>) -> Self {
        self.long_descr = descr.into();
        self
    }

    /// Placeholder names for consumed tokens, in order.
    #[must_use]
    pub fn with_arg_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arg_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Hide this action from its parent's sub-action listing.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Suppress the synthetic help sub-action for this action.
    #[must_use]
    pub fn with_disable_help(mut self, disable: bool) -> Self {
        self.disable_help = disable;
        self
    }

    /// Trigger of the synthetic help sub-action for this subtree.
    #[must_use]
    pub fn with_help_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.help_trigger = Some(trigger.into());
        self
    }

    /// Help generator for this action and descendants that set none.
    #[must_use]
    pub fn with_help_generator(mut self, generator: impl HelpGenerator + 'static) -> Self {
        self.help_generator = Some(Arc::new(generator));
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The token this action matches.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Raw minimum consume bound (normalized once finalized).
    pub fn consume_min(&self) -> i32 {
        self.consume_min
    }

    /// Raw maximum consume bound (normalized once finalized).
    pub fn consume_max(&self) -> i32 {
        self.consume_max
    }

    /// Consume window with normalization applied.
    pub fn consume_range(&self) -> ConsumeRange {
        ConsumeRange::from_raw(self.consume_min, self.consume_max)
    }

    /// One-line description.
    pub fn short_descr(&self) -> &str {
        &self.short_descr
    }

    /// Full description.
    pub fn long_descr(&self) -> &str {
        &self.long_descr
    }

    /// Placeholder names for consumed tokens.
    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    /// Whether the action is left out of sub-action listings.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the synthetic help sub-action is suppressed.
    pub fn is_help_disabled(&self) -> bool {
        self.disable_help
    }

    /// Help trigger, set explicitly or inherited during finalize.
    pub fn help_trigger(&self) -> Option<&str> {
        self.help_trigger.as_deref()
    }

    /// Whether [`finalize`](Self::finalize) has run over this action.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Whether the action is attached below another action.
    pub fn has_parent(&self) -> bool {
        self.parent_path.is_some()
    }

    /// Space-joined triggers from the root to this action.
    ///
    /// A detached action's path is its trigger.
    pub fn path(&self) -> &str {
        if self.path.is_empty() {
            &self.trigger
        } else {
            &self.path
        }
    }

    /// Immediate sub-actions in attach order.
    pub fn sub_actions(&self) -> &[Action] {
        &self.sub_actions
    }

    /// The immediate sub-action matching `trigger`.
    pub fn get_sub_action(&self, trigger: &str) -> Option<&Action> {
        self.sub_action_lookup
            .get(trigger)
            .map(|&idx| &self.sub_actions[idx])
    }

    /// Render help text with the effective help generator.
    pub fn help(&self) -> String {
        match &self.help_generator {
            Some(generator) => generator.render(self),
            None => DefaultHelp::default().render(self),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("trigger", &self.trigger)
            .field("path", &self.path())
            .field("consume_min", &self.consume_min)
            .field("consume_max", &self.consume_max)
            .field("has_handler", &self.handler.is_some())
            .field("finalized", &self.finalized)
            .field(
                "sub_actions",
                &self
                    .sub_actions
                    .iter()
                    .map(Action::trigger)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
