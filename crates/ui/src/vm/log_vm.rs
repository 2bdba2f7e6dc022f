use lesson_core::model::{LogKind, Transcript};

use super::time_fmt::format_clock_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLineVm {
    pub class: &'static str,
    pub prefix: &'static str,
    pub text: String,
    pub time: String,
}

#[must_use]
pub fn map_log_lines(transcript: &Transcript) -> Vec<LogLineVm> {
    transcript
        .entries()
        .iter()
        .map(|entry| {
            let (class, prefix) = match entry.kind() {
                LogKind::Input => ("log-line log-input", ">"),
                LogKind::Output => ("log-line log-output", ""),
                LogKind::System => ("log-line log-system", "#"),
                LogKind::Error => ("log-line log-error", "!"),
            };
            LogLineVm {
                class,
                prefix,
                text: entry.text().to_string(),
                time: format_clock_time(entry.at()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::LogEntry;
    use lesson_core::time::fixed_now;

    #[test]
    fn kinds_map_to_distinct_classes() {
        let mut transcript = Transcript::new();
        transcript.push(LogEntry::new(LogKind::Input, "1 + 1", fixed_now()));
        transcript.push(LogEntry::new(LogKind::Error, "Error: boom", fixed_now()));

        let lines = map_log_lines(&transcript);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].prefix, ">");
        assert!(lines[0].class.ends_with("log-input"));
        assert!(lines[1].class.ends_with("log-error"));
        assert_eq!(lines[1].text, "Error: boom");
    }
}
