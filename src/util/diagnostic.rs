//! User-facing error reports.
//!
//! A report names what was rejected, the facts that led there, and how to
//! get unstuck:
//!
//! ```text
//! error: cannot add entity `Transfer` for contract `Token`
//!   = `TokenTransfer` is already declared in the manifest as well
//! help: Choose another name with `--contract-name <name>`
//! ```

use std::fmt;

/// Suggestions shared between commands.
pub mod suggestions {
    pub const NO_MANIFEST: &str =
        "Pass the manifest path explicitly: `graft add <address> <manifest>`";

    pub const ADD_USAGE: &str = "Usage: `graft add <address> [subgraph.yaml] --abi <path>`";

    pub const FETCH_FAILED: &str =
        "Check your network connection and the explorer API key (`ETHERSCAN_API_KEY`)";

    pub const CODEGEN_FAILED: &str =
        "Install dependencies with `yarn install`, or rerun with `--skip-codegen`";
}

const RED: &str = "\x1b[1;31m";
const GREEN: &str = "\x1b[1;32m";

/// An error report with context lines and suggestions.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: String,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Render for the terminal, with ANSI colors if `color` is set.
    pub fn format(&self, color: bool) -> String {
        let mut out = format!("{}: {}\n", paint("error", RED, color), self.message);
        for line in &self.context {
            out.push_str(&format!("  = {}\n", line));
        }
        for suggestion in &self.suggestions {
            out.push_str(&format!("{}: {}\n", paint("help", GREEN, color), suggestion));
        }
        out
    }
}

fn paint(label: &str, code: &str, color: bool) -> String {
    if color {
        format!("{}{}\x1b[0m", code, label)
    } else {
        label.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
