//! Typed errors produced while building, finalizing, and parsing action trees.

use crate::action::Action;
use crate::handler::HandlerError;

/// Failure raised by the action-tree engine.
///
/// Build and finalize errors abort the whole operation; the tree must not be
/// reused afterwards. Parse errors abort the current call chain. Errors
/// returned by a node's own [`Handler`](crate::Handler) are carried through
/// the [`ActionError::Handler`] variant without altering their message or
/// source chain.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    // -- Construction --
    /// The action has an empty trigger string.
    #[error("action with empty trigger is not allowed")]
    EmptyTrigger,

    /// The action was already attached to a parent.
    #[error("action already belongs to an action tree\naction path: {path}")]
    AlreadyAssigned {
        /// Path at which the action is already attached.
        path: String,
    },

    /// A sibling with the same trigger is already attached to the parent.
    #[error("sub-action already exists, trigger: {trigger}")]
    DuplicatedSubAction {
        /// The colliding trigger.
        trigger: String,
    },

    /// The parent consumes every remaining token, so the child could never match.
    #[error("sub-action can never be reached\naction path: {path}")]
    Unreachable {
        /// Path the unreachable child would have had.
        path: String,
    },

    // -- Finalize --
    /// The action was finalized a second time.
    #[error("action double finalized\naction path: {}", victim.path())]
    DoubleFinalize {
        /// The already-finalized action.
        victim: Box<Action>,
    },

    // -- Parse --
    /// Parsing was attempted before the tree was finalized.
    #[error("action not finalized\naction path: {}", victim.path())]
    NotFinalized {
        /// The action that has not been finalized.
        victim: Box<Action>,
    },

    /// No per-call state was supplied to `parse`.
    #[error("calling parse() with no state (nil state)")]
    NilState,

    /// The matched action needs more trailing tokens than were supplied.
    #[error("too few arguments: {args:?}\naction path: {}", victim.path())]
    TooFewArgs {
        /// The matched action.
        victim: Box<Action>,
        /// The tokens that followed the trigger.
        args: Vec<String>,
    },

    // -- Handler --
    /// Error returned by a handler, passed through unchanged.
    #[error(transparent)]
    Handler(HandlerError),
}

impl ActionError {
    /// Returns `true` when the caller supplied tokens that do not satisfy the
    /// matched action, as opposed to a broken tree or a failing handler.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ActionError::TooFewArgs { .. })
    }

    /// The action this error refers to, when the variant carries one.
    ///
    /// The victim is a snapshot copy of the node and its subtree taken when
    /// the error was raised, not a reference into the live tree.
    pub fn victim(&self) -> Option<&Action> {
        match self {
            ActionError::DoubleFinalize { victim }
            | ActionError::NotFinalized { victim }
            | ActionError::TooFewArgs { victim, .. } => Some(victim),
            _ => None,
        }
    }

    /// Downcast a handler error to its concrete type.
    ///
    /// Returns `None` for engine errors and for handler errors of another type.
    pub fn handler_error<T>(&self) -> Option<&T>
    where
        T: std::error::Error + 'static,
    {
        match self {
            ActionError::Handler(err) => err.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::EmptyTrigger => "empty_trigger",
            ActionError::AlreadyAssigned { .. } => "already_assigned",
            ActionError::DuplicatedSubAction { .. } => "duplicated_sub_action",
            ActionError::Unreachable { .. } => "unreachable",
            ActionError::DoubleFinalize { .. } => "double_finalize",
            ActionError::NotFinalized { .. } => "not_finalized",
            ActionError::NilState => "nil_state",
            ActionError::TooFewArgs { .. } => "too_few_args",
            ActionError::Handler(_) => "handler",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Custom;

    impl fmt::Display for Custom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "cerr")
        }
    }

    impl std::error::Error for Custom {}

    #[test]
    fn usage_errors() {
        let err = ActionError::TooFewArgs {
            victim: Box::new(Action::new("arg")),
            args: vec!["sub".into()],
        };
        assert!(err.is_usage_error());
        assert!(!ActionError::NilState.is_usage_error());
        assert!(!ActionError::EmptyTrigger.is_usage_error());
    }

    #[test]
    fn messages_name_the_offending_action() {
        let err = ActionError::NotFinalized {
            victim: Box::new(Action::new("arg")),
        };
        assert!(err.to_string().contains("arg"));
        assert_eq!(err.victim().map(Action::trigger), Some("arg"));

        let err = ActionError::DuplicatedSubAction {
            trigger: "sub1".into(),
        };
        assert!(err.to_string().contains("sub1"));
        assert!(err.victim().is_none());

        assert!(ActionError::EmptyTrigger.to_string().contains("empty trigger"));
        assert!(ActionError::NilState.to_string().contains("nil"));
    }

    #[test]
    fn handler_errors_are_transparent() {
        let err = ActionError::Handler(Box::new(Custom));
        assert_eq!(err.to_string(), "cerr");
        assert!(err.handler_error::<Custom>().is_some());
        assert!(err.handler_error::<fmt::Error>().is_none());
        assert!(ActionError::NilState.handler_error::<Custom>().is_none());
        assert_eq!(err.kind(), "handler");
    }
}
