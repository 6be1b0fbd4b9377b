//! Per-call parsing state.

use std::fmt;

/// State of a single top-level [`Action::parse`](crate::Action::parse) call.
///
/// Create a fresh value for every top-level call and discard it afterwards.
/// Handlers read the tokens consumed by their action from [`args`](Self::args)
/// and write human-readable output into the append-only sink.
#[derive(Debug, Default, Clone)]
pub struct ParseState {
    output: String,
    args: Vec<String>,
    matched: Vec<String>,
}

impl ParseState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens consumed by the currently executing action.
    ///
    /// Only meaningful inside a handler; after the call it holds the tokens of
    /// the last matched action.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Output accumulated so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consume the state, returning the accumulated output.
    pub fn into_output(self) -> String {
        self.output
    }

    /// Append text to the output sink.
    pub fn print(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Paths of the actions matched during this call, root first.
    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    pub(crate) fn enter<S: AsRef<str>>(&mut self, path: &str, consumed: &[S]) {
        self.args.clear();
        self.args
            .extend(consumed.iter().map(|t| t.as_ref().to_string()));
        self.matched.push(path.to_string());
    }
}

impl fmt::Write for ParseState {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}
