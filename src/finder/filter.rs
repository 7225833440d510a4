//! Entry filtering functionality
//!
//! This module provides filters for matching entries by name (regular
//! expressions) and by kind (file or directory).

use regex::{Regex, RegexBuilder};

use crate::errors::{SearchError, SearchResult};
use super::entry::{DirectoryEntry, EntryKind};

/// Trait for entry filters
pub trait EntryFilter {
    /// Check if the entry matches the filter
    fn matches(&self, entry: &DirectoryEntry) -> bool;

    /// Get the filter description
    fn description(&self) -> String;
}

/// How a regular expression is applied to a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The name contains a match anywhere
    #[default]
    Find,
    /// The whole name must match
    FullMatch,
}

/// Regular expression matched against entry names
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    find: Regex,
    full: Regex,
    original_pattern: String,
    ignore_case: bool,
    mode: MatchMode,
}

impl PatternMatcher {
    /// Create a new case-sensitive matcher using find semantics
    pub fn new(pattern: &str) -> SearchResult<Self> {
        Self::with_options(pattern, false, MatchMode::Find)
    }

    /// Create a new case-insensitive matcher using find semantics
    pub fn new_ignore_case(pattern: &str) -> SearchResult<Self> {
        Self::with_options(pattern, true, MatchMode::Find)
    }

    /// Create a matcher with explicit case sensitivity and mode.
    ///
    /// A malformed pattern fails with [`SearchError::PatternSyntax`].
    pub fn with_options(pattern: &str, ignore_case: bool, mode: MatchMode) -> SearchResult<Self> {
        let find = compile(pattern, pattern, ignore_case)?;
        let full = compile(&format!("^(?:{})$", pattern), pattern, ignore_case)?;

        Ok(Self {
            find,
            full,
            original_pattern: pattern.to_string(),
            ignore_case,
            mode,
        })
    }

    /// Match `name` using the configured mode
    pub fn matches(&self, name: &str) -> bool {
        self.matches_with(name, self.mode)
    }

    /// Match `name` using an explicit mode
    pub fn matches_with(&self, name: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Find => self.find.is_match(name),
            MatchMode::FullMatch => self.full.is_match(name),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The same pattern with the opposite case sensitivity
    pub fn with_opposite_case(&self) -> SearchResult<Self> {
        Self::with_options(&self.original_pattern, !self.ignore_case, self.mode)
    }
}

fn compile(source: &str, pattern: &str, ignore_case: bool) -> SearchResult<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| SearchError::PatternSyntax {
            pattern: pattern.to_string(),
            source: e,
        })
}

impl EntryFilter for PatternMatcher {
    fn matches(&self, entry: &DirectoryEntry) -> bool {
        PatternMatcher::matches(self, &entry.name)
    }

    fn description(&self) -> String {
        let mode = match self.mode {
            MatchMode::Find => "contains",
            MatchMode::FullMatch => "matches",
        };
        if self.ignore_case {
            format!("name (ignore case) {} /{}/", mode, self.original_pattern)
        } else {
            format!("name {} /{}/", mode, self.original_pattern)
        }
    }
}

/// Filter selecting files, directories or both
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFilter {
    pub files: bool,
    pub folders: bool,
}

impl KindFilter {
    pub fn new(files: bool, folders: bool) -> Self {
        Self { files, folders }
    }

    /// Keep both files and directories
    pub fn all() -> Self {
        Self::new(true, true)
    }

    pub fn admits(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::File => self.files,
            EntryKind::Directory => self.folders,
        }
    }

    /// Filter an accumulated result list without re-running the search
    pub fn apply<'a, I, T>(&self, items: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: AsRef<DirectoryEntry> + 'a,
    {
        items
            .into_iter()
            .filter(|item| self.matches(item.as_ref()))
            .collect()
    }
}

impl Default for KindFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl EntryFilter for KindFilter {
    fn matches(&self, entry: &DirectoryEntry) -> bool {
        self.admits(entry.kind)
    }

    fn description(&self) -> String {
        match (self.files, self.folders) {
            (true, true) => "is a file or directory".to_string(),
            (true, false) => "is a file".to_string(),
            (false, true) => "is a directory".to_string(),
            (false, false) => "matches nothing".to_string(),
        }
    }
}
