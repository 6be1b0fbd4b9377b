//! Shared test helpers for `tokentree_core` integration tests.

#![allow(unreachable_pub)]

use tokentree_core::{Action, ActionError, ParseState};

// ─── Action fixtures ─────────────────────────────────────────────────────────

/// Action whose handler appends its trigger to the output, space-separated.
#[allow(dead_code)]
pub fn appender(trigger: &'static str) -> Action {
    Action::new(trigger).with_handler_fn(move |state, _| {
        if !state.output().is_empty() {
            state.print(" ");
        }
        state.print(trigger);
        Ok(())
    })
}

/// Action that prints `called` iff it consumed exactly `expected`, else `failed`.
#[allow(dead_code)]
pub fn expects_args(trigger: &'static str, expected: &'static [&'static str]) -> Action {
    Action::new(trigger).with_handler_fn(move |state, _| {
        let ok = state.args() == expected;
        state.print(if ok { "called" } else { "failed" });
        Ok(())
    })
}

// ─── Parse helpers ───────────────────────────────────────────────────────────

/// Parse `tokens` with a fresh state and return the accumulated output.
#[allow(dead_code)]
pub fn output_of(action: &Action, tokens: &[&str]) -> Result<String, ActionError> {
    let mut state = ParseState::new();
    action.run(&mut state, tokens)?;
    Ok(state.into_output())
}

/// Walk every node and collect `(path, consume_min, consume_max)`.
#[allow(dead_code)]
pub fn collect_ranges(action: &Action, out: &mut Vec<(String, i32, i32)>) {
    out.push((
        action.path().to_string(),
        action.consume_min(),
        action.consume_max(),
    ));
    for sub in action.sub_actions() {
        collect_ranges(sub, out);
    }
}
