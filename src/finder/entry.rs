//! Entries produced by the traversal
//!
//! This module provides the read-only view of filesystem nodes handed to
//! filters and result sinks.

use std::path::{Path, PathBuf};

use walkdir::DirEntry;

/// Kind of a filesystem entry
///
/// Anything that is not a directory (including a symbolic link that is not
/// followed) is counted as a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file or other non-directory node
    File,
    /// Directory
    Directory,
}

impl EntryKind {
    /// Whether this is a directory
    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// A file or directory visited during a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Final path component
    pub name: String,
    /// Absolute path of the entry
    pub path: PathBuf,
    /// File or directory
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Create an entry from its parts
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    /// Build an entry from a walkdir entry
    pub(crate) fn from_walkdir(entry: &DirEntry) -> Self {
        let kind = if entry.file_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Self {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            kind,
        }
    }

    /// Absolute path of the entry
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// A matched entry together with the depth it was found at
///
/// Depth 0 is the search root's immediate children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub entry: DirectoryEntry,
    pub depth: usize,
}

impl MatchEvent {
    pub fn as_path(&self) -> &Path {
        self.entry.as_path()
    }
}

impl AsRef<DirectoryEntry> for DirectoryEntry {
    fn as_ref(&self) -> &DirectoryEntry {
        self
    }
}

impl AsRef<DirectoryEntry> for MatchEvent {
    fn as_ref(&self) -> &DirectoryEntry {
        &self.entry
    }
}
