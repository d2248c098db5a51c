//! Statement log: the observation point for executed SQL.

use std::sync::{Arc, RwLock};

/// Shared capture of every statement an adapter hands to its driver.
///
/// Handles are cheap clones over the same buffer, so a test can hold one
/// while the adapter records into it. The buffer is bounded; once full,
/// the oldest entries are dropped.
#[derive(Debug, Clone)]
pub struct StatementLog {
    entries: Arc<RwLock<Vec<String>>>,
    capacity: usize,
}

impl StatementLog {
    /// Creates a log bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            capacity,
        }
    }

    /// Records a statement.
    pub fn record(&self, sql: &str) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if entries.len() == self.capacity && !entries.is_empty() {
            entries.remove(0);
        }
        entries.push(sql.to_string());
    }

    /// Returns the recorded statements, oldest first.
    pub fn statements(&self) -> Vec<String> {
        match self.entries.read() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Number of recorded statements.
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(_) => 0,
        }
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the log.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl Default for StatementLog {
    fn default() -> Self {
        Self::new(crate::config::AdapterConfig::default().statement_log_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_buffer() {
        let log = StatementLog::new(16);
        let handle = log.clone();

        log.record("SELECT 1");
        assert_eq!(handle.len(), 1);
        assert_eq!(handle.statements(), vec!["SELECT 1"]);

        handle.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let log = StatementLog::new(2);
        log.record("a");
        log.record("b");
        log.record("c");
        assert_eq!(log.statements(), vec!["b", "c"]);
    }
}
