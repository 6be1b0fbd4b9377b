//! Action-tree token dispatcher.
//!
//! Build a tree of [`Action`]s with [`Action::add_sub_action`], prepare it once
//! with [`Action::finalize`], then match token sequences against it with
//! [`Action::parse`]. Each matched action claims a window of trailing tokens,
//! runs its [`Handler`], and offers the next token to its sub-actions. Help
//! text is generated from the same tree by a [`HelpGenerator`].
//!
//! ```
//! use tokentree_core::{Action, ParseState};
//!
//! let mut root = Action::new("greet").with_consume_min(1).with_handler_fn(|state, _| {
//!     let line = format!("hello {}", state.args()[0]);
//!     state.print(&line);
//!     Ok(())
//! });
//! root.finalize()?;
//!
//! let mut state = ParseState::new();
//! root.run(&mut state, &["greet", "world"])?;
//! assert_eq!(state.output(), "hello world");
//! # Ok::<(), tokentree_core::ActionError>(())
//! ```

#![warn(missing_docs)]

/// Action data model, builder, finalizer, and parser.
pub mod action;
/// Error taxonomy.
pub mod error;
/// Handler strategy.
pub mod handler;
/// Help text generation.
pub mod help;
/// JSON manifests describing action trees.
pub mod manifest;
/// Serializable tree snapshots.
pub mod outline;
/// Per-call parse state.
pub mod state;

// ── Convenience re-exports ──────────────────────────────────────────────────

pub use action::{Action, ConsumeRange};
pub use error::ActionError;
pub use handler::{Handler, HandlerError};
pub use help::{DEFAULT_HELP_TRIGGER, DefaultHelp, HELP_ACTION_DESCRIPTION, HelpGenerator};
pub use manifest::{ActionManifest, ManifestError, ReplyHandler};
pub use outline::{ActionOutline, to_pretty_json};
pub use state::ParseState;
