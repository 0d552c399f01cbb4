//! Diagnostic log — bounded buffer of recent script diagnostics.

use std::collections::VecDeque;
use std::time::SystemTime;

use super::Phase;
use crate::script::Diagnostic;

/// A diagnostic tagged with the phase whose script produced it.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub phase: Phase,
    pub diagnostic: Diagnostic,
}

/// Circular buffer of recent diagnostics.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl DiagnosticLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a diagnostic, evicting the oldest if at capacity.
    pub fn push(&mut self, phase: Phase, diagnostic: Diagnostic) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            timestamp: SystemTime::now(),
            phase,
            diagnostic,
        });
    }

    /// The N most recent entries (newest last).
    pub fn recent(&self, n: usize) -> Vec<&LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(msg: &str) -> Diagnostic {
        Diagnostic::parse(msg, 1, 1)
    }

    #[test]
    fn new_log_is_empty() {
        let log = DiagnosticLog::new(10);
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn capacity_overflow_evicts_oldest() {
        let mut log = DiagnosticLog::new(3);
        for m in ["a", "b", "c", "d"] {
            log.push(Phase::Frame, diag(m));
        }
        let messages: Vec<&str> = log.entries().map(|e| e.diagnostic.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c", "d"]);
    }

    #[test]
    fn recent_returns_newest() {
        let mut log = DiagnosticLog::new(10);
        log.push(Phase::Init, diag("a"));
        log.push(Phase::Point, diag("b"));
        let recent = log.recent(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].phase, Phase::Point);
        assert_eq!(log.recent(5).len(), 2);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = DiagnosticLog::new(0);
        log.push(Phase::Beat, diag("a"));
        assert!(log.is_empty());
    }
}
