//! Terminal output for the CLI.
//!
//! Status messages go to stderr so that command results written with
//! [`Output::data`] can be piped from stdout.

use console::{Style, Term};

/// Styled status messages and plain result data.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.status.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&Style::new().red().bold(), msg);
    }

    /// Summary line, shown in bold cyan.
    pub(crate) fn highlight(&self, msg: &str) {
        self.styled(&Style::new().cyan().bold(), msg);
    }

    /// Command result line on stdout, never styled.
    pub(crate) fn data(&self, line: &str) {
        let _ = self.results.write_line(line);
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self
            .status
            .write_line(&style.clone().for_stderr().apply_to(msg).to_string());
    }
}
