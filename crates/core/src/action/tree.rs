use tracing::debug;

use super::Action;
use crate::error::ActionError;

impl Action {
    /// Attach `sub` as an immediate sub-action.
    ///
    /// Fails when `sub` has an empty trigger, is already attached somewhere,
    /// would be unreachable because this action consumes every remaining
    /// token, or collides with an existing sibling's trigger. Attach before
    /// [`finalize`](Self::finalize): a sub-action added to a finalized action
    /// is never finalized itself, so dispatching into it fails with
    /// [`ActionError::NotFinalized`].
    pub fn add_sub_action(&mut self, mut sub: Action) -> Result<(), ActionError> {
        if sub.trigger.is_empty() {
            return Err(ActionError::EmptyTrigger);
        }

        if sub.parent_path.is_some() {
            return Err(ActionError::AlreadyAssigned {
                path: sub.path().to_string(),
            });
        }

        let path = format!("{} {}", self.path(), sub.trigger);
        if self.consume_max < 0 {
            return Err(ActionError::Unreachable { path });
        }

        if self.sub_action_lookup.contains_key(&sub.trigger) {
            return Err(ActionError::DuplicatedSubAction {
                trigger: sub.trigger,
            });
        }

        debug!(path = %path, "attaching sub-action");
        sub.parent_path = Some(self.path().to_string());
        sub.path = path;
        self.sub_action_lookup
            .insert(sub.trigger.clone(), self.sub_actions.len());
        self.sub_actions.push(sub);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_caches_path() {
        let mut root = Action::new("root");
        root.add_sub_action(Action::new("sub")).unwrap();
        let sub = root.get_sub_action("sub").unwrap();
        assert_eq!(sub.path(), "root sub");
        assert!(sub.has_parent());
        assert!(root.get_sub_action("none").is_none());
    }

    #[test]
    fn late_attach_is_not_finalized() {
        let mut root = Action::new("root");
        root.finalize().unwrap();
        root.add_sub_action(Action::new("late")).unwrap();
        assert!(!root.get_sub_action("late").unwrap().is_finalized());

        let mut state = crate::ParseState::new();
        let err = root.run(&mut state, &["root", "late"]).unwrap_err();
        match err {
            ActionError::NotFinalized { victim } => assert_eq!(victim.path(), "root late"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_trigger_rejected() {
        let mut root = Action::new("act");
        let err = root.add_sub_action(Action::default()).unwrap_err();
        assert!(matches!(err, ActionError::EmptyTrigger));
    }

    #[test]
    fn duplicate_keeps_first() {
        let mut root = Action::new("root");
        root.add_sub_action(Action::new("sub1").with_short_descr("first"))
            .unwrap();
        let err = root
            .add_sub_action(Action::new("sub1").with_short_descr("second"))
            .unwrap_err();
        match err {
            ActionError::DuplicatedSubAction { trigger } => assert_eq!(trigger, "sub1"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(root.sub_actions().len(), 1);
        assert_eq!(root.get_sub_action("sub1").unwrap().short_descr(), "first");
    }

    #[test]
    fn unbounded_parent_rejects_children() {
        let mut root = Action::new("test").with_consume_max(-1);
        let err = root.add_sub_action(Action::new("arg1")).unwrap_err();
        match err {
            ActionError::Unreachable { path } => assert_eq!(path, "test arg1"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(root.sub_actions().is_empty());
    }

    #[test]
    fn attached_clone_cannot_be_reattached() {
        let mut root = Action::new("arg");
        root.add_sub_action(Action::new("sub")).unwrap();
        let copy = root.get_sub_action("sub").unwrap().clone();

        let mut other = Action::new("new");
        let err = other.add_sub_action(copy).unwrap_err();
        match err {
            ActionError::AlreadyAssigned { path } => assert_eq!(path, "arg sub"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
