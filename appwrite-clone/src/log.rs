//! The user-facing run log.

use tracing::info;

/// Append-only sink receiving one line per outcome.
pub trait LogSink {
    fn append(&mut self, line: String);
}

/// In-memory run log. Every line is also emitted as a tracing event with
/// target `clone_log`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

impl LogSink for RunLog {
    fn append(&mut self, line: String) {
        info!(target: "clone_log", "{}", line);
        self.lines.push(line);
    }
}

impl<F: FnMut(String)> LogSink for F {
    fn append(&mut self, line: String) {
        self(line)
    }
}
