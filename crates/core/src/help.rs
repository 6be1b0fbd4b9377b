//! Help text generation.
//!
//! The help layout follows the same consume-window rules as matching: the
//! usage line shows required placeholders up to the minimum, then the
//! optional ones, and a generic sub-action placeholder when the action takes
//! no trailing tokens.

use crate::action::Action;

/// Default trigger of the synthetic help sub-action.
pub const DEFAULT_HELP_TRIGGER: &str = "help";

/// Short description of the synthetic help sub-action.
pub const HELP_ACTION_DESCRIPTION: &str = "Display help for this Action or Sub-action";

/// Produces the complete help text for an action.
///
/// Set on an action with [`Action::with_help_generator`]; descendants that set
/// none inherit the nearest ancestor's generator at finalize time.
pub trait HelpGenerator: Send + Sync {
    /// Render help for `action`.
    fn render(&self, action: &Action) -> String;
}

impl<F> HelpGenerator for F
where
    F: Fn(&Action) -> String + Send + Sync,
{
    fn render(&self, action: &Action) -> String {
        self(action)
    }
}

/// Built-in help layout.
///
/// ```text
/// Usage: tool get <key> [<default>]
///
/// Fetch a value.
///
/// Sub-actions:
///   help    Display help for this Action or Sub-action
/// ```
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DefaultHelp {
    /// Spaces before each sub-action line.
    pub indent: usize,
    /// Spaces between the trigger column and the description column.
    pub column_gap: usize,
    /// Label preceding the usage line.
    pub usage_label: String,
    /// Heading of the sub-action listing.
    pub sub_action_heading: String,
}

impl Default for DefaultHelp {
    fn default() -> Self {
        Self {
            indent: 2,
            column_gap: 4,
            usage_label: "Usage:".to_string(),
            sub_action_heading: "Sub-actions:".to_string(),
        }
    }
}

impl DefaultHelp {
    /// Set the listing indent.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the gap between the trigger and description columns.
    #[must_use]
    pub fn with_column_gap(mut self, gap: usize) -> Self {
        self.column_gap = gap;
        self
    }

    /// Usage line without the label: path followed by argument placeholders.
    pub fn usage(&self, action: &Action) -> String {
        let range = action.consume_range();
        let mut usage = action.path().to_string();

        for idx in 0..range.min {
            usage.push(' ');
            usage.push_str(&placeholder(action, idx));
        }

        match range.max {
            None => {
                usage.push_str(&format!(" [{}...]", placeholder(action, range.min)));
            }
            Some(max) if max > range.min => {
                // Spell out named slots plus one; elide the rest of a wide window.
                let spelled = max.min(action.arg_names().len().max(range.min) + 1);
                let mut optional: Vec<String> = (range.min..spelled)
                    .map(|idx| placeholder(action, idx))
                    .collect();
                match max - spelled {
                    0 => {}
                    1 => optional.push(placeholder(action, spelled)),
                    _ => {
                        optional.push("...".to_string());
                        optional.push(placeholder(action, max - 1));
                    }
                }
                usage.push_str(&format!(" [{}]", optional.join(" ")));
            }
            Some(0) if !action.sub_actions().is_empty() => usage.push_str(" [sub-action]"),
            _ => {}
        }

        usage
    }
}

impl HelpGenerator for DefaultHelp {
    fn render(&self, action: &Action) -> String {
        let mut out = format!("{} {}\n", self.usage_label, self.usage(action));

        let descr = if action.long_descr().is_empty() {
            action.short_descr()
        } else {
            action.long_descr()
        };
        if !descr.is_empty() {
            out.push('\n');
            out.push_str(descr.trim_end());
            out.push('\n');
        }

        let visible: Vec<&Action> = action
            .sub_actions()
            .iter()
            .filter(|sub| !sub.is_hidden())
            .collect();
        if !visible.is_empty() {
            out.push('\n');
            out.push_str(&self.sub_action_heading);
            out.push('\n');
            let width = visible
                .iter()
                .map(|sub| sub.trigger().len())
                .max()
                .unwrap_or(0);
            for sub in visible {
                let line = format!(
                    "{}{:<width$}{}{}",
                    " ".repeat(self.indent),
                    sub.trigger(),
                    " ".repeat(self.column_gap),
                    sub.short_descr(),
                );
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }

        out
    }
}

fn placeholder(action: &Action, idx: usize) -> String {
    match action.arg_names().get(idx) {
        Some(name) => format!("<{name}>"),
        None => format!("<arg{}>", idx + 1),
    }
}

/// Help text answering a request made through the synthetic help sub-action.
///
/// With no argument the target's own help is rendered; with one, the named
/// sub-action's help, or a "not found" message.
pub(crate) fn answer_help_request(target: &Action, args: &[String]) -> String {
    let Some(name) = args.first() else {
        return target.help();
    };
    match target.get_sub_action(name) {
        Some(sub) => sub.help(),
        None => format!(
            "sub-action \"{name}\" not found under \"{}\"\n",
            target.path()
        ),
    }
}
