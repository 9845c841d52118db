//! Coloured terminal rendering of report lines

use console::{Term, style};
use lbprobe_core::{Level, Reporter};

/// Width of the `=` rules around section headers.
const RULE_WIDTH: usize = 60;

/// Writes report lines to a terminal with colour and status glyphs.
pub struct TermReporter {
    term: Term,
}

impl TermReporter {
    /// Reporter on standard output.
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Writes text as-is.
    pub fn raw(&mut self, text: &str) {
        self.write(text);
    }

    fn write(&self, text: &str) {
        if let Err(err) = self.term.write_line(text) {
            tracing::warn!(error = %err, "failed to write report line");
        }
    }
}

impl Reporter for TermReporter {
    fn line(&mut self, level: Level, text: &str) {
        match level {
            Level::Header => {
                let rule = "=".repeat(RULE_WIDTH);
                self.write("");
                self.write(&style(&rule).bold().blue().to_string());
                self.write(&style(text).bold().blue().to_string());
                self.write(&style(&rule).bold().blue().to_string());
                self.write("");
            }
            Level::Emphasis => {
                self.write("");
                self.write(&style(text).bold().to_string());
                self.write("");
            }
            _ => self.write(&render(level, text)),
        }
    }
}

/// Single-line rendering for every level except headers and emphasis.
fn render(level: Level, text: &str) -> String {
    match level {
        Level::Success => style(format!("✓ {text}")).green().to_string(),
        Level::Error => style(format!("✗ {text}")).red().to_string(),
        Level::Info => style(format!("ℹ {text}")).blue().to_string(),
        Level::Warning => style(format!("⚠ {text}")).yellow().to_string(),
        Level::Pass => format!("{} - {text}", style("PASS").green()),
        Level::Fail => format!("{} - {text}", style("FAIL").red()),
        Level::Header | Level::Emphasis => text.to_owned(),
    }
}
