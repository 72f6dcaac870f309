//! User-visible notifications. The shell queues them as actions finish; the
//! screen moves them into a context [`Signal`] that the log panel draws.

use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

impl ActivityLog {
    pub fn log(&mut self, level: LogLevel, message: &str) {
        self.entries.push(LogEntry {
            timestamp: current_time(),
            level,
            message: message.to_string(),
        });
    }

    /// Take every pending entry, oldest first.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == LogLevel::Error)
    }
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    log.write().log(level, message);
}

/// Append entries drained from the shell, opening the panel on errors.
pub fn absorb_notices(log: &mut Signal<ActivityLog>, notices: Vec<LogEntry>) {
    if notices.is_empty() {
        return;
    }
    let mut log = log.write();
    log.entries.extend(notices);
    if log.has_errors() {
        log.visible = true;
    }
}

fn current_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_log() {
        let mut log = ActivityLog::default();
        log.log(LogLevel::Success, "saved");
        log.log(LogLevel::Error, "failed");
        assert!(log.has_errors());

        let entries = log.drain();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "saved");
        assert_eq!(entries[0].timestamp.len(), 8);
        assert!(log.entries.is_empty());
        assert!(!log.has_errors());
    }
}
