//! Options for the directory walk
//!
//! This module provides options controlling how directories are listed and
//! how often progress is reported. Search constraints live in
//! [`TraversalPolicy`](super::policy::TraversalPolicy).

use std::time::Duration;

use crate::cli::Cli;

/// Default delay between two progress snapshots
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Options for configuring the directory walk
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Whether to follow symbolic links
    pub follow_links: bool,

    /// List siblings sorted by file name instead of in directory order
    pub sort_by_name: bool,

    /// Minimum delay between progress snapshots (zero sends one per entry)
    pub progress_interval: Duration,

    /// Whether unreadable directories are reported to the sink as warnings
    pub report_warnings: bool,
}

impl FindOptions {
    /// Create a new FindOptions with default values
    pub fn new() -> Self {
        Self {
            follow_links: false,
            sort_by_name: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            report_warnings: true,
        }
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Set whether siblings are visited in file name order
    pub fn with_sort_by_name(mut self, sort: bool) -> Self {
        self.sort_by_name = sort;
        self
    }

    /// Set the progress snapshot interval
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set whether unreadable directories are surfaced as warnings
    pub fn with_report_warnings(mut self, report: bool) -> Self {
        self.report_warnings = report;
        self
    }

    /// Create FindOptions from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new()
            .with_follow_links(cli.follow_links)
            .with_sort_by_name(cli.sort)
    }
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_options_defaults() {
        let options = FindOptions::new();
        assert_eq!(options.follow_links, false);
        assert_eq!(options.sort_by_name, false);
        assert_eq!(options.progress_interval, DEFAULT_PROGRESS_INTERVAL);
        assert_eq!(options.report_warnings, true);
    }

    #[test]
    fn test_find_options_builders() {
        let options = FindOptions::new()
            .with_follow_links(true)
            .with_sort_by_name(true)
            .with_progress_interval(Duration::ZERO)
            .with_report_warnings(false);
        assert!(options.follow_links);
        assert!(options.sort_by_name);
        assert_eq!(options.progress_interval, Duration::ZERO);
        assert!(!options.report_warnings);
    }
}
