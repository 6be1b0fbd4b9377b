mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokentree_core::{Action, ActionManifest, ParseState, to_pretty_json};
use tracing::{debug, info};

use crate::render::{Format, exit_code, outline_text, render_error};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "tokentree",
    version,
    disable_help_subcommand = true,
    about = "tokentree: dispatch token sequences through a JSON-defined action tree"
)]
struct Cli {
    /// Output mode: "pretty" for human-readable text, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "tokentree_core=trace").
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Match tokens against the tree and print what the matched actions output.
    Dispatch {
        /// Path to the tree manifest (JSON).
        #[arg(long)]
        tree: String,
        /// Tokens to dispatch, starting with the root trigger. Put them
        /// after `--` when they look like options.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Show help for the root, or for the action reached by following the
    /// given triggers.
    Help {
        /// Path to the tree manifest (JSON).
        #[arg(long)]
        tree: String,
        /// Triggers below the root, e.g. `remote add`.
        path: Vec<String>,
    },

    /// Print the finalized tree.
    Outline {
        /// Path to the tree manifest (JSON).
        #[arg(long)]
        tree: String,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let result = match cli.cmd {
        Cmd::Dispatch { tree, tokens } => cmd_dispatch(&tree, &tokens, format),
        Cmd::Help { tree, path } => cmd_help(&tree, &path, format),
        Cmd::Outline { tree } => cmd_outline(&tree, format),
    };

    if let Err(err) = result {
        render_error(&err, format);
        process::exit(exit_code(&err));
    }
}

/// Logs go to stderr so stdout stays clean for results.
fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_dispatch(tree_path: &str, tokens: &[String], format: Format) -> Result<()> {
    let tree = load_tree(tree_path)?;
    let mut state = ParseState::new();
    tree.run(&mut state, tokens)?;
    info!(matched = state.matched().len(), "dispatch finished");

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": true,
                "output": state.output(),
                "matched": state.matched(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            print!("{}", state.output());
            if state.matched().is_empty() && !tokens.is_empty() {
                eprintln!(
                    "note: tokens did not start with the root trigger \"{}\"",
                    tree.trigger()
                );
            }
        }
    }
    Ok(())
}

fn cmd_help(tree_path: &str, path: &[String], format: Format) -> Result<()> {
    let tree = load_tree(tree_path)?;
    let node = resolve_path(&tree, path)?;
    let text = node.help();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "path": node.path(),
                "help": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => print!("{text}"),
    }
    Ok(())
}

fn cmd_outline(tree_path: &str, format: Format) -> Result<()> {
    let tree = load_tree(tree_path)?;
    let outline = tree.outline();

    match format {
        Format::Json => println!("{}", to_pretty_json(&outline)),
        Format::Pretty => print!("{}", outline_text(&outline)),
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read, build, and finalize the tree described by a manifest file.
fn load_tree(path: &str) -> Result<Action> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read tree file '{path}'"))?;
    let tree = ActionManifest::load_tree(&text)
        .with_context(|| format!("failed to load tree file '{path}'"))?;
    debug!(root = %tree.path(), "loaded action tree");
    Ok(tree)
}

/// Follow `path` triggers from the root.
fn resolve_path<'a>(root: &'a Action, path: &[String]) -> Result<&'a Action> {
    let mut node = root;
    for trigger in path {
        node = node.get_sub_action(trigger).with_context(|| {
            format!(
                "sub-action \"{trigger}\" not found under \"{}\"",
                node.path()
            )
        })?;
    }
    Ok(node)
}
