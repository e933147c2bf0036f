/// Lifecycle states of a whole crawl
///
/// A crawl only moves forward through these states, in declaration order.
use std::fmt;

/// Represents the current phase of the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrawlState {
    /// Work is outstanding; workers are fetching and parsing
    Running,

    /// The outstanding counter reached zero; queues are being closed and
    /// workers are draining
    Draining,

    /// Every worker has exited
    Terminated,
}

impl CrawlState {
    /// Returns true once no further work will be accepted
    pub fn is_finishing(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns true if this is the final state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns the lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_ordered_forward() {
        assert!(CrawlState::Running < CrawlState::Draining);
        assert!(CrawlState::Draining < CrawlState::Terminated);
    }

    #[test]
    fn test_is_finishing() {
        assert!(!CrawlState::Running.is_finishing());
        assert!(CrawlState::Draining.is_finishing());
        assert!(CrawlState::Terminated.is_finishing());
    }

    #[test]
    fn test_is_terminal() {
        assert!(!CrawlState::Running.is_terminal());
        assert!(!CrawlState::Draining.is_terminal());
        assert!(CrawlState::Terminated.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlState::Draining.to_string(), "draining");
    }
}
