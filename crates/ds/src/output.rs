//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter, writing to stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    bold: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    pub(crate) fn heading(&self, msg: &str) {
        let _ = self.term.write_line(&self.bold.apply_to(msg).to_string());
    }

    /// Aligned `label  count  detail` row, detail dimmed.
    pub(crate) fn row(&self, label: &str, count: usize, detail: &str) {
        let _ = self.term.write_line(&format!(
            "  {label:<16} {count:>5}  {}",
            self.dim.apply_to(detail)
        ));
    }

    /// Numbered warning list under a yellow header; nothing when empty.
    pub(crate) fn warnings(&self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        self.warning(&format!("{} warning(s):", warnings.len()));
        for (i, warning) in warnings.iter().enumerate() {
            let _ = self.term.write_line(&format!(
                "  {} {warning}",
                self.yellow.apply_to(format!("{:>3}.", i + 1))
            ));
        }
    }
}
