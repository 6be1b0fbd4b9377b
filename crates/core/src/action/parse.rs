use std::any::Any;

use tracing::trace;

use super::Action;
use crate::error::ActionError;
use crate::help::answer_help_request;
use crate::state::ParseState;

impl Action {
    /// Match `tokens` against this finalized action and dispatch.
    ///
    /// When `tokens[0]` equals the trigger, the action claims its consume
    /// window from the following tokens, runs its handler, and offers the
    /// first unclaimed token to its sub-actions. A non-matching first token is
    /// not an error: the call returns `Ok(())` without effect so callers can
    /// try several roots in turn. `extra` is forwarded unchanged to every
    /// handler on the matched path.
    ///
    /// `state` is checked after the empty-token case, so an empty token list
    /// succeeds even without a state.
    pub fn parse<S: AsRef<str>>(
        &self,
        state: Option<&mut ParseState>,
        tokens: &[S],
        extra: &[&dyn Any],
    ) -> Result<(), ActionError> {
        if !self.finalized {
            return Err(ActionError::NotFinalized {
                victim: Box::new(self.clone()),
            });
        }

        if tokens.is_empty() {
            return Ok(());
        }

        let Some(state) = state else {
            return Err(ActionError::NilState);
        };

        self.dispatch(None, state, tokens, extra)
    }

    /// [`parse`](Self::parse) without extra context.
    pub fn run<S: AsRef<str>>(
        &self,
        state: &mut ParseState,
        tokens: &[S],
    ) -> Result<(), ActionError> {
        self.parse(Some(state), tokens, &[])
    }

    fn dispatch<S: AsRef<str>>(
        &self,
        parent: Option<&Action>,
        state: &mut ParseState,
        tokens: &[S],
        extra: &[&dyn Any],
    ) -> Result<(), ActionError> {
        if !self.finalized {
            return Err(ActionError::NotFinalized {
                victim: Box::new(self.clone()),
            });
        }

        let Some((first, rest)) = tokens.split_first() else {
            return Ok(());
        };
        if first.as_ref() != self.trigger {
            return Ok(());
        }

        let range = self.consume_range();
        if rest.len() < range.min {
            return Err(ActionError::TooFewArgs {
                victim: Box::new(self.clone()),
                args: rest.iter().map(|t| t.as_ref().to_string()).collect(),
            });
        }

        let take = match range.max {
            Some(max) if rest.len() > max => max,
            _ => rest.len(),
        };
        let (consumed, remaining) = rest.split_at(take);
        trace!(path = %self.path(), consumed = take, remaining = remaining.len(), "action matched");

        state.enter(self.path(), consumed);
        self.invoke(parent, state, extra)?;

        let Some(next) = remaining.first() else {
            return Ok(());
        };
        match self.get_sub_action(next.as_ref()) {
            Some(sub) => sub.dispatch(Some(self), state, remaining, extra),
            None => {
                trace!(path = %self.path(), token = next.as_ref(), "no sub-action matched");
                Ok(())
            }
        }
    }

    fn invoke(
        &self,
        parent: Option<&Action>,
        state: &mut ParseState,
        extra: &[&dyn Any],
    ) -> Result<(), ActionError> {
        if self.answers_help {
            let target = parent.unwrap_or(self);
            let text = answer_help_request(target, state.args());
            state.print(&text);
            return Ok(());
        }

        match &self.handler {
            Some(handler) => handler.handle(state, extra).map_err(ActionError::Handler),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(label: &'static str) -> Action {
        Action::new(label).with_handler_fn(move |state, _| {
            let line = format!("{label}:{};", state.args().join(","));
            state.print(&line);
            Ok(())
        })
    }

    #[test]
    fn non_matching_trigger_is_silent() {
        let mut act = recorder("test").with_consume_max(-1);
        act.finalize().unwrap();
        let mut state = ParseState::new();
        act.run(&mut state, &["test1", "arg"]).unwrap();
        assert_eq!(state.output(), "");
        assert!(state.matched().is_empty());
    }

    #[test]
    fn bounded_window_then_sub_action() {
        let mut act = recorder("test").with_consume(2, 3);
        act.add_sub_action(recorder("arg1")).unwrap();
        act.finalize().unwrap();

        // Three trailing tokens fit the window, so nothing is offered onwards.
        let mut state = ParseState::new();
        act.run(&mut state, &["test", "arg1", "arg2", "arg1"]).unwrap();
        assert_eq!(state.output(), "test:arg1,arg2,arg1;");

        let mut state = ParseState::new();
        act.run(&mut state, &["test", "a", "b", "c", "arg1"]).unwrap();
        assert_eq!(state.output(), "test:a,b,c;arg1:;");
        assert_eq!(state.matched(), ["test", "test arg1"]);
    }

    #[test]
    fn child_with_optional_window_takes_nothing_when_last() {
        let mut act = recorder("test").with_consume_min(2);
        act.add_sub_action(recorder("arg1").with_consume_max(1))
            .unwrap();
        act.finalize().unwrap();

        let mut state = ParseState::new();
        act.run(&mut state, &["test", "arg1", "arg2", "arg1"]).unwrap();
        assert_eq!(state.output(), "test:arg1,arg2;arg1:;");
    }

    #[test]
    fn too_few_args_carries_a_snapshot() {
        let mut act = recorder("test").with_consume_min(2);
        act.add_sub_action(recorder("sub")).unwrap();
        act.finalize().unwrap();

        let mut state = ParseState::new();
        let err = act.run(&mut state, &["test", "a"]).unwrap_err();
        let victim = err.victim().unwrap();
        assert!(!std::ptr::eq(victim, &act));
        assert_eq!(victim.path(), "test");
        assert!(victim.get_sub_action("sub").is_some());
    }

    #[test]
    fn help_responder_without_parent_describes_itself() {
        let mut root = Action::new("root");
        root.finalize().unwrap();
        let help = root.get_sub_action("help").unwrap();

        let mut state = ParseState::new();
        help.run(&mut state, &["help"]).unwrap();
        assert_eq!(state.output(), help.help());
    }
}
