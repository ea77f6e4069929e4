//! Page naming: titles, link paths, file names and title casing.
//!
//! The header and link hooks handed to the generator are built from
//! [`PageNaming`]; both are pure functions of a file name.

use std::path::{Path, PathBuf};

use crate::config::DocsConfig;

/// Naming rules for one page tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNaming {
    root_name: String,
    root_title: String,
    root_link: String,
    link_prefix: String,
}

impl PageNaming {
    /// Naming rules for a tree whose root page is `<root_name>.md`.
    #[must_use]
    pub fn new(config: &DocsConfig, root_name: &str) -> Self {
        Self {
            root_name: root_name.to_owned(),
            root_title: config.root_title.clone(),
            root_link: config.root_link.clone(),
            link_prefix: config.link_prefix.clone(),
        }
    }

    /// Title shown in a page's front matter.
    ///
    /// The base name without extension, underscores turned into spaces. The
    /// root page gets the configured root title instead.
    #[must_use]
    pub fn title(&self, file_name: &str) -> String {
        let base = base_name(file_name);
        if base == self.root_name {
            return self.root_title.clone();
        }
        base.replace('_', " ")
    }

    /// Front matter block prepended to a page.
    #[must_use]
    pub fn front_matter(&self, file_name: &str) -> String {
        format!("---\ntitle: \"{}\"\n---\n", self.title(file_name))
    }

    /// URL path other pages use to link to `file_name`.
    #[must_use]
    pub fn link(&self, file_name: &str) -> String {
        let base = base_name(file_name);
        if base == self.root_name {
            return self.root_link.clone();
        }
        format!("{}{}", self.link_prefix, base.replace('_', "-"))
    }
}

/// File name without directories and without its extension.
fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Page file name for a command path such as `morty function build`.
#[must_use]
pub fn page_file_name(command_path: &str, extension: &str) -> String {
    format!("{}.{extension}", command_path.replace(' ', "_"))
}

/// `path` with every underscore in its file name replaced by a hyphen.
/// Directory components are left untouched.
#[must_use]
pub fn hyphenated_path(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.contains('_') => path.with_file_name(name.replace('_', "-")),
        _ => path.to_path_buf(),
    }
}

/// English title casing over a whole line.
///
/// The first letter of each word is upper-cased and the rest lower-cased.
/// Apostrophes inside a word do not start a new word; every other
/// non-alphanumeric character is copied as is.
#[must_use]
pub fn title_case(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_word = false;
    for c in line.chars() {
        if c.is_alphanumeric() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            in_word = in_word && c == '\'';
            out.push(c);
        }
    }
    out
}
