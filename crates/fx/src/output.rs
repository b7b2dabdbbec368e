//! Colored terminal status lines.

use std::fmt::Display;

use console::{Style, Term};

/// Width of the label column in [`Output::field`] lines.
const LABEL_WIDTH: usize = 14;

/// Status output on stderr.
pub(crate) struct Output {
    term: Term,
    label: Style,
    done: Style,
    warn: Style,
    error: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().cyan().bold(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            error: Style::new().red(),
        }
    }

    /// Print an aligned `label  value` line.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let label = format!("{label:>LABEL_WIDTH$}");
        self.line(&format!("{} {value}", self.label.apply_to(label)));
    }

    /// Print a completion message (green).
    pub(crate) fn done(&self, msg: &str) {
        self.line(&self.done.apply_to(msg).to_string());
    }

    /// Print a warning (yellow).
    pub(crate) fn warn(&self, msg: &str) {
        self.line(&self.warn.apply_to(msg).to_string());
    }

    /// Print an error (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.error.apply_to(msg).to_string());
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
