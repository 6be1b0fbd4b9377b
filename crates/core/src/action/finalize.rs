use std::sync::Arc;

use tracing::{debug, trace};

use super::Action;
use crate::error::ActionError;
use crate::help::{DEFAULT_HELP_TRIGGER, DefaultHelp, HELP_ACTION_DESCRIPTION, HelpGenerator};

/// Settings a node passes down to its sub-actions during finalize.
struct Scope<'a> {
    parent_path: Option<&'a str>,
    help_generator: &'a Arc<dyn HelpGenerator>,
    help_trigger: &'a str,
}

impl Action {
    /// Prepare this action and its whole subtree for [`parse`](Self::parse).
    ///
    /// Normalizes consume bounds, recomputes paths, propagates help settings,
    /// injects the synthetic help sub-action where the action takes no
    /// trailing tokens, and marks every node finalized. Call once on the root
    /// after the tree is built. The first error aborts the pass; nodes visited
    /// before it stay finalized, so a tree that failed to finalize must be
    /// discarded.
    pub fn finalize(&mut self) -> Result<(), ActionError> {
        let generator: Arc<dyn HelpGenerator> = Arc::new(DefaultHelp::default());
        let result = self.finalize_subtree(Scope {
            parent_path: None,
            help_generator: &generator,
            help_trigger: DEFAULT_HELP_TRIGGER,
        });
        match &result {
            Ok(()) => debug!(root = %self.path(), "action tree finalized"),
            Err(err) => debug!(root = %self.path(), error = %err, "action tree finalize failed"),
        }
        result
    }

    fn finalize_subtree(&mut self, scope: Scope<'_>) -> Result<(), ActionError> {
        if self.finalized {
            return Err(ActionError::DoubleFinalize {
                victim: Box::new(self.clone()),
            });
        }

        if self.trigger.is_empty() {
            return Err(ActionError::EmptyTrigger);
        }

        self.parent_path = scope.parent_path.map(str::to_string);

        if self.consume_min < 0 {
            self.consume_min = 0;
        }
        if self.consume_max >= 0 && self.consume_max < self.consume_min {
            self.consume_max = self.consume_min;
        }

        self.path = match scope.parent_path {
            Some(parent) => format!("{parent} {}", self.trigger),
            None => self.trigger.clone(),
        };

        if self.help_generator.is_none() {
            self.help_generator = Some(Arc::clone(scope.help_generator));
        }
        if self.help_trigger.is_none() {
            self.help_trigger = Some(scope.help_trigger.to_string());
        }

        if !self.disable_help && self.consume_max == 0 {
            let trigger = self.help_trigger.clone().unwrap_or_default();
            match self.add_sub_action(Action::help_responder(trigger)) {
                Ok(()) => trace!(path = %self.path, "injected help sub-action"),
                Err(ActionError::DuplicatedSubAction { trigger }) => {
                    trace!(path = %self.path, %trigger, "user sub-action shadows help");
                }
                Err(err) => return Err(err),
            }
        }

        self.sub_action_lookup = self
            .sub_actions
            .iter()
            .enumerate()
            .map(|(idx, sub)| (sub.trigger.clone(), idx))
            .collect();

        self.finalized = true;

        let path = self.path.clone();
        let help_trigger = self.help_trigger.clone().unwrap_or_default();
        let help_generator = match &self.help_generator {
            Some(generator) => Arc::clone(generator),
            None => Arc::clone(scope.help_generator),
        };
        for sub in &mut self.sub_actions {
            sub.finalize_subtree(Scope {
                parent_path: Some(&path),
                help_generator: &help_generator,
                help_trigger: &help_trigger,
            })?;
        }

        Ok(())
    }

    /// The synthetic sub-action answering help requests for its parent.
    fn help_responder(trigger: String) -> Action {
        let mut help = Action::new(trigger)
            .with_consume_max(1)
            .with_arg_names(["sub-action"])
            .with_short_descr(HELP_ACTION_DESCRIPTION)
            .with_disable_help(true);
        help.answers_help = true;
        help
    }
}
