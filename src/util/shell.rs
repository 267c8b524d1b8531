//! Status output for the `graft` binary.
//!
//! Every user-facing progress line goes through [`Shell`]. Lines are written
//! to stderr as `{status:>12} {message}`, so stdout stays free for piping.
//! Long-running steps (explorer requests, `codegen`) are wrapped in a
//! [`Span`], which draws an indicatif spinner on interactive terminals.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `--quiet`: nothing but the final error report
    Quiet,
    #[default]
    Normal,
    /// `--verbose`: plain status lines instead of spinners, so they interleave
    /// cleanly with debug logs
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Status word printed in front of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Added,
    Merged,
    Finished,
    Fetching,
    Generating,
    Writing,
    Renamed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Done,
    Busy,
    Notice,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Done => "\x1b[1;32m",
            Tone::Busy => "\x1b[1;36m",
            Tone::Notice => "\x1b[1;33m",
        }
    }
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Added => "Added",
            Status::Merged => "Merged",
            Status::Finished => "Finished",
            Status::Fetching => "Fetching",
            Status::Generating => "Generating",
            Status::Writing => "Writing",
            Status::Renamed => "Renamed",
            Status::Skipped => "Skipped",
        }
    }

    fn tone(self) -> Tone {
        match self {
            Status::Added | Status::Merged | Status::Finished => Tone::Done,
            Status::Fetching | Status::Generating | Status::Writing => Tone::Busy,
            Status::Renamed | Status::Skipped => Tone::Notice,
        }
    }
}

const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags. `quiet` wins over `verbose`.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Shell::new(verbosity, color)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status line, unless the shell is quiet.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            eprintln!("{} {}", self.format_status(status), msg);
        }
    }

    fn format_status(&self, status: Status) -> String {
        let padded = format!("{:>width$}", status.label(), width = STATUS_WIDTH);
        if self.use_color {
            format!("{}{}\x1b[0m", status.tone().ansi(), padded)
        } else {
            padded
        }
    }

    /// Start a timed span for a long-running step.
    ///
    /// Interactive terminals in normal mode get a spinner; everything else
    /// gets the start message as a plain status line.
    pub fn span(self: &Arc<Self>, status: Status, msg: impl Display) -> Span {
        let msg = msg.to_string();
        let spinner = (self.verbosity == Verbosity::Normal && io::stderr().is_terminal())
            .then(|| spinner(&msg));
        if spinner.is_none() {
            self.status(status, &msg);
        }

        Span {
            shell: Arc::clone(self),
            spinner,
            start: Instant::now(),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A scoped timing span. Dropping it without finishing clears the spinner
/// and prints nothing; the caller reports the failure.
pub struct Span {
    shell: Arc<Shell>,
    spinner: Option<ProgressBar>,
    start: Instant,
}

impl Span {
    /// Clear the spinner and print `Finished {msg} in {elapsed}`.
    pub fn finish_with_message(mut self, msg: impl Display) {
        self.clear();
        self.shell.status(
            Status::Finished,
            format!("{} in {}", msg, format_duration(self.start.elapsed())),
        );
    }

    fn clear(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        self.clear();
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
