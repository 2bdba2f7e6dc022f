use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Code the learner submitted.
    Input,
    Output,
    /// Messages from the app itself.
    System,
    Error,
}

/// One line in the console transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    kind: LogKind,
    text: String,
    at: DateTime<Utc>,
}

impl LogEntry {
    #[must_use]
    pub fn new(kind: LogKind, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            kind,
            text: text.into(),
            at,
        }
    }

    #[must_use]
    pub fn kind(&self) -> LogKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Append-only console history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<LogEntry>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn count_of(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }
}
