//! Handler strategy invoked when an action matches.

use std::any::Any;
use std::fmt;

use crate::state::ParseState;

/// Error type returned by handlers.
///
/// Any error type can be boxed into it; [`ActionError::handler_error`](crate::ActionError::handler_error)
/// recovers the concrete type on the caller's side.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Work performed when an action's trigger matches and its consume
/// requirement is met.
///
/// `state.args()` holds the tokens consumed by the matched action. `extra`
/// holds the opaque context values given to [`Action::parse`](crate::Action::parse),
/// forwarded unchanged to every handler along the matched path.
pub trait Handler: Send + Sync {
    /// Run the handler.
    fn handle(&self, state: &mut ParseState, extra: &[&dyn Any]) -> Result<(), HandlerError>;
}

/// Adapter turning a closure into a [`Handler`].
pub(crate) struct FnHandler<F>(pub(crate) F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut ParseState, &[&dyn Any]) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, state: &mut ParseState, extra: &[&dyn Any]) -> Result<(), HandlerError> {
        (self.0)(state, extra)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHandler")
    }
}
