//! Traversal policy
//!
//! This module provides the depth bounds, start-prefix gate, per-directory
//! match cap and soft timeout that constrain a search, along with the
//! whitespace-separated command syntax used to configure them.

use std::time::{Duration, Instant};

use log::debug;

const MAX_DEPTH_FLAG: &str = "-maxRecursionDepth=";
const MIN_DEPTH_FLAG: &str = "-minRecursionDepth=";
const MAX_HORIZONTAL_FLAG: &str = "-maxHorizontal=";
const START_PREFIX_FLAG: &str = "-startPrefix=";
const TIMEOUT_FLAG: &str = "-timeout=";

/// Constraints applied to a single search run
///
/// `None` for a maximum means unbounded. Every setting defaults to a no-op.
/// A negative `max_depth` admits no level at all, so nothing is scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalPolicy {
    /// Matches shallower than this are not recorded (entries are still scanned)
    pub min_depth: usize,

    /// Deepest level whose entries are visited
    pub max_depth: Option<i64>,

    /// Siblings sorting before this name are skipped
    pub start_prefix: Option<String>,

    /// Maximum matches recorded per directory
    pub max_matches_per_directory: Option<usize>,

    /// Soft deadline, checked between entries
    pub timeout: Option<Duration>,
}

impl TraversalPolicy {
    /// Create a policy with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_depth(mut self, min_depth: usize) -> Self {
        self.min_depth = min_depth;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<i64>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the start prefix; an empty prefix disables the gate
    pub fn with_start_prefix(mut self, prefix: Option<String>) -> Self {
        self.start_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn with_max_matches_per_directory(mut self, cap: Option<usize>) -> Self {
        self.max_matches_per_directory = cap;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether entries at `depth` are visited
    pub fn should_descend(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| signed(depth) <= max)
    }

    /// Whether a match at `depth` is recorded
    pub fn should_record_match(&self, depth: usize) -> bool {
        depth >= self.min_depth
    }

    /// Initial gate state for a freshly entered directory
    pub fn initial_gate(&self) -> bool {
        self.start_prefix.as_deref().map_or(true, str::is_empty)
    }

    /// Evaluate the start-prefix gate for one sibling.
    ///
    /// Returns `(admit, gate_open)`. Once a name compares greater than or
    /// equal to the prefix the gate stays open for the rest of the sibling
    /// list. Names are compared ordinally by their UTF-8 bytes, which is the
    /// same as comparing Unicode scalar values. This can differ from a UTF-16
    /// code unit order when a name mixes characters at or above U+E000 with
    /// characters outside the Basic Multilingual Plane.
    pub fn admits_by_prefix(&self, name: &str, gate_open: bool) -> (bool, bool) {
        if gate_open {
            return (true, true);
        }
        match self.start_prefix.as_deref() {
            None | Some("") => (true, true),
            Some(prefix) => {
                let open = name >= prefix;
                (open, open)
            }
        }
    }

    /// Whether another match fits under the per-directory cap
    pub fn admits_horizontal_cap(&self, matched_in_directory: usize) -> bool {
        self.max_matches_per_directory
            .map_or(true, |cap| matched_in_directory < cap)
    }

    /// False when `min_depth > max_depth`; such a policy can never record a match
    pub fn is_satisfiable(&self) -> bool {
        self.max_depth.map_or(true, |max| signed(self.min_depth) <= max)
    }

    /// Maximum walkdir depth, which counts the root as depth 0.
    /// A negative bound yields 0 so only the root itself is opened.
    pub(crate) fn walk_depth(&self) -> Option<usize> {
        self.max_depth.map(|max| clamp_to_usize(max.saturating_add(1)))
    }

    /// Deadline for a run started at `start`
    pub fn deadline(&self, start: Instant) -> Option<Instant> {
        self.timeout.and_then(|t| start.checked_add(t))
    }

    /// Parse the whitespace-separated command syntax.
    ///
    /// Recognized flags: `-maxRecursionDepth=<int|∞>`, `-minRecursionDepth=<int>`,
    /// `-maxHorizontal=<int|∞>`, `-startPrefix=<name>` and `-timeout=<seconds>`.
    /// Unknown tokens are ignored. A value that does not parse as an integer
    /// resets that setting to its default instead of rejecting the whole
    /// string. Negative maximums admit nothing; a negative minimum is 0.
    pub fn from_commands(commands: &str) -> Self {
        let mut policy = Self::new();
        for token in commands.split_whitespace() {
            policy.apply_command(token);
        }
        policy
    }

    /// Apply a single command token to this policy
    pub fn apply_command(&mut self, token: &str) {
        if let Some(value) = token.strip_prefix(MAX_DEPTH_FLAG) {
            self.max_depth = parse_bound(value);
        } else if let Some(value) = token.strip_prefix(MIN_DEPTH_FLAG) {
            self.min_depth = parse_bound(value).map_or(0, clamp_to_usize);
        } else if let Some(value) = token.strip_prefix(MAX_HORIZONTAL_FLAG) {
            self.max_matches_per_directory = parse_bound(value).map(clamp_to_usize);
        } else if let Some(value) = token.strip_prefix(START_PREFIX_FLAG) {
            self.start_prefix = Some(value.to_string()).filter(|p| !p.is_empty());
        } else if let Some(value) = token.strip_prefix(TIMEOUT_FLAG) {
            self.timeout = parse_timeout(value);
        } else {
            debug!("Ignoring unknown command '{}'", token);
        }
    }
}

/// `∞`, `inf` and anything unparseable mean unbounded
fn parse_bound(value: &str) -> Option<i64> {
    match value {
        "∞" | "inf" | "infinity" => None,
        _ => value.parse().ok(),
    }
}

fn clamp_to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(if value < 0 { 0 } else { usize::MAX })
}

fn signed(depth: usize) -> i64 {
    i64::try_from(depth).unwrap_or(i64::MAX)
}

/// Seconds, fractional allowed; anything else disables the timeout
pub(crate) fn parse_timeout(value: &str) -> Option<Duration> {
    value
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}
