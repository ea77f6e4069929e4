//! Post-processing report types.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::FileError;

/// One file moved by the renamer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenamedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Result of a post-processing run.
///
/// `filter_errors` and `walk_errors` are reported-but-continues failures:
/// the run completed, but some pages may still carry unfiltered content.
#[derive(Debug, Clone, Default, Serialize)]
#[non_exhaustive]
pub struct PostProcessReport {
    /// Pages rewritten through the line filter, by their pre-rename path.
    pub filtered_files: Vec<PathBuf>,
    /// Files renamed to the hyphenated convention, in visit order.
    pub renamed: Vec<RenamedFile>,
    /// Pages whose filtering failed. These were still renamed.
    pub filter_errors: Vec<FileError>,
    /// Directory traversal errors.
    pub walk_errors: Vec<FileError>,
    /// Final location of the root page, once relocated.
    pub root_page: Option<PathBuf>,
}

impl PostProcessReport {
    /// Whether every file was filtered and the walk saw no errors.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.filter_errors.is_empty() && self.walk_errors.is_empty()
    }

    /// Total number of reported errors.
    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.filter_errors.len() + self.walk_errors.len()
    }
}
