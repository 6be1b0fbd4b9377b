//! Output rendering for the CLI.
//!
//! Results go to stdout; errors go to stderr in pretty mode and to stdout as a
//! JSON envelope in JSON mode, so piped consumers always get one JSON value.

use std::io::{self, IsTerminal};

use tokentree_core::{ActionError, ActionOutline, ManifestError};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable text.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve an explicit choice, or pick based on whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Engine error behind an `anyhow` chain, if any.
fn action_error(err: &anyhow::Error) -> Option<&ActionError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ActionError>())
}

/// Machine-readable error name for the JSON envelope.
pub(crate) fn error_kind(err: &anyhow::Error) -> &'static str {
    if let Some(action) = action_error(err) {
        return action.kind();
    }
    if err
        .chain()
        .any(|cause| cause.downcast_ref::<ManifestError>().is_some())
    {
        return "invalid_manifest";
    }
    "command_failed"
}

/// Process exit code: 2 for bad tokens, 1 for everything else.
pub(crate) fn exit_code(err: &anyhow::Error) -> i32 {
    match action_error(err) {
        Some(action) if action.is_usage_error() => 2,
        _ => 1,
    }
}

/// Report a failed command in the given format.
pub(crate) fn render_error(err: &anyhow::Error, format: Format) {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": false,
                "error": error_kind(err),
                "message": format!("{err:#}"),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("error JSON serialization cannot fail")
            );
        }
        Format::Pretty => eprintln!("error: {err:#}"),
    }
}

// ── Outline ─────────────────────────────────────────────────────────────

/// Indented listing of a tree, hidden actions marked.
pub(crate) fn outline_text(outline: &ActionOutline) -> String {
    let mut out = String::new();
    push_outline(outline, 0, &mut out);
    out
}

fn push_outline(node: &ActionOutline, depth: usize, out: &mut String) {
    let window = match node.consume_max {
        None => format!("{}..", node.consume_min),
        Some(max) if max == node.consume_min => max.to_string(),
        Some(max) => format!("{}..{}", node.consume_min, max),
    };
    out.push_str(&"  ".repeat(depth));
    out.push_str(&node.trigger);
    out.push_str(&format!(" ({window})"));
    if node.hidden {
        out.push_str(" [hidden]");
    }
    if !node.short_descr.is_empty() {
        out.push_str(" - ");
        out.push_str(&node.short_descr);
    }
    out.push('\n');
    for sub in &node.sub_actions {
        push_outline(sub, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokentree_core::Action;

    #[test]
    fn outline_lists_windows() {
        let mut root = Action::new("kv").with_short_descr("store");
        root.add_sub_action(Action::new("get").with_consume(1, 2))
            .unwrap();
        root.add_sub_action(Action::new("cat").with_consume_max(-1).with_hidden(true))
            .unwrap();
        root.finalize().unwrap();

        let text = outline_text(&root.outline());
        assert_eq!(
            text,
            "kv (0) - store\n  get (1..2)\n  cat (0..) [hidden]\n  help (0..1) - Display help for this Action or Sub-action\n"
        );
    }

    #[test]
    fn usage_errors_exit_with_two() {
        let err = anyhow::Error::new(ActionError::TooFewArgs {
            victim: Box::new(Action::new("get")),
            args: Vec::new(),
        });
        assert_eq!(exit_code(&err), 2);
        assert_eq!(error_kind(&err), "too_few_args");

        let err = anyhow::anyhow!("boom");
        assert_eq!(exit_code(&err), 1);
        assert_eq!(error_kind(&err), "command_failed");
    }
}
