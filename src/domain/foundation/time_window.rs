//! Half-open reporting window over timestamps.

use serde::{Deserialize, Serialize};

use super::{Timestamp, ValidationError};

/// Window `[start, end)` used by evaluation and export queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    /// Creates a window, rejecting an end that precedes the start.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if end.is_before(&start) {
            return Err(ValidationError::invalid_format(
                "time_window",
                "end precedes start",
            ));
        }
        Ok(Self { start, end })
    }

    /// The trailing `days` days ending one second from now.
    pub fn last_days(days: i64) -> Self {
        let end = Timestamp::now().plus_secs(1);
        Self {
            start: end.minus_days(days),
            end,
        }
    }

    /// A window that contains every timestamp the system can produce.
    pub fn unbounded() -> Self {
        Self {
            start: Timestamp::from_unix_secs(0),
            end: Timestamp::from_unix_secs(253_402_300_799),
        }
    }

    pub fn contains(&self, ts: &Timestamp) -> bool {
        !ts.is_before(&self.start) && ts.is_before(&self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_half_open() {
        let start = Timestamp::from_unix_secs(100);
        let end = Timestamp::from_unix_secs(200);
        let window = TimeWindow::new(start, end).unwrap();

        assert!(window.contains(&start));
        assert!(window.contains(&Timestamp::from_unix_secs(199)));
        assert!(!window.contains(&end));
        assert!(!window.contains(&Timestamp::from_unix_secs(99)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let result = TimeWindow::new(Timestamp::from_unix_secs(200), Timestamp::from_unix_secs(100));
        assert!(result.is_err());
    }

    #[test]
    fn last_days_contains_now() {
        assert!(TimeWindow::last_days(30).contains(&Timestamp::now()));
        assert!(TimeWindow::unbounded().contains(&Timestamp::now()));
    }
}
