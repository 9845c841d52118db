//! Report sinks
//!
//! Checks describe what happened as leveled lines; a [`Reporter`] decides
//! how those lines reach the user. The CLI renders them to a coloured
//! terminal, tests collect them with [`MemoryReporter`].

/// Kind of a report line, used by renderers to pick colour and prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Expected outcome observed.
    Success,
    /// Failure or diagnostic.
    Error,
    /// Neutral detail, such as an echoed response body.
    Info,
    /// Something worth attention that is not a failure.
    Warning,
    /// Section title.
    Header,
    /// Summary row for a check that passed; the text is the check name.
    Pass,
    /// Summary row for a check that failed; the text is the check name.
    Fail,
    /// Emphasised plain text, used for the results tally.
    Emphasis,
}

/// Destination for report lines.
pub trait Reporter {
    /// Records one line.
    fn line(&mut self, level: Level, text: &str);

    /// Records a [`Level::Success`] line.
    fn success(&mut self, text: &str) {
        self.line(Level::Success, text);
    }

    /// Records a [`Level::Error`] line.
    fn error(&mut self, text: &str) {
        self.line(Level::Error, text);
    }

    /// Records a [`Level::Info`] line.
    fn info(&mut self, text: &str) {
        self.line(Level::Info, text);
    }

    /// Records a [`Level::Warning`] line.
    fn warning(&mut self, text: &str) {
        self.line(Level::Warning, text);
    }

    /// Records a [`Level::Header`] line.
    fn header(&mut self, text: &str) {
        self.line(Level::Header, text);
    }

    /// Records a summary row for a named check.
    fn outcome(&mut self, name: &str, passed: bool) {
        self.line(if passed { Level::Pass } else { Level::Fail }, name);
    }
}

/// Collects lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    lines: Vec<(Level, String)>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines in order.
    pub fn lines(&self) -> &[(Level, String)] {
        &self.lines
    }

    /// Texts recorded at `level`, in order.
    pub fn texts(&self, level: Level) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(line_level, _)| *line_level == level)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// Whether any line at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.texts(level).iter().any(|text| text.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn line(&mut self, level: Level, text: &str) {
        self.lines.push((level, text.to_owned()));
    }
}
