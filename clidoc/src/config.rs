//! Configuration for documentation generation and post-processing.
//!
//! Every value the pipeline needs lives here instead of in process-wide
//! constants, so tests and the CLI can point the pipeline at any directory.

use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "../../pages/cli";

/// Marker substring identifying the generator's footer line.
pub const DEFAULT_AUTO_GENERATED_MARKER: &str = "###### Auto generated by";

/// Marker substring identifying the "see also" heading.
pub const DEFAULT_SEE_ALSO_MARKER: &str = "SEE ALSO";

/// Settings shared by the generator, the post-processing walk and the root
/// page relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DocsConfig {
    /// Directory the page tree is written to and walked afterwards.
    pub out_dir: PathBuf,
    /// Title used in the front matter of the root page.
    pub root_title: String,
    /// Link path of the root page.
    pub root_link: String,
    /// Prefix prepended to the link path of every other page.
    pub link_prefix: String,
    /// Destination of the root page, relative to `out_dir`.
    pub root_page: PathBuf,
    /// Extension (without the dot) of the files the line filter rewrites.
    pub markdown_extension: String,
    /// Lines containing this substring are dropped.
    pub auto_generated_marker: String,
    /// Lines containing this substring (case-insensitive) are title-cased.
    pub see_also_marker: String,
    /// Whether the generator appends the auto-generated footer to each page.
    pub auto_gen_tag: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            root_title: "CLI".to_owned(),
            root_link: "/cli".to_owned(),
            link_prefix: "/cli/".to_owned(),
            root_page: PathBuf::from("../cli.md"),
            markdown_extension: "md".to_owned(),
            auto_generated_marker: DEFAULT_AUTO_GENERATED_MARKER.to_owned(),
            see_also_marker: DEFAULT_SEE_ALSO_MARKER.to_owned(),
            auto_gen_tag: true,
        }
    }
}

impl DocsConfig {
    /// Replace the output directory.
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Replace the root page destination (relative to `out_dir`).
    #[must_use]
    pub fn with_root_page(mut self, root_page: impl Into<PathBuf>) -> Self {
        self.root_page = root_page.into();
        self
    }

    /// Replace the root page title.
    #[must_use]
    pub fn with_root_title(mut self, root_title: impl Into<String>) -> Self {
        self.root_title = root_title.into();
        self
    }

    /// Replace the link paths: `root_link` for the root page and
    /// `link_prefix` for every other page.
    #[must_use]
    pub fn with_links(mut self, root_link: impl Into<String>, link_prefix: impl Into<String>) -> Self {
        self.root_link = root_link.into();
        self.link_prefix = link_prefix.into();
        self
    }

    /// Enable or disable the auto-generated footer.
    #[must_use]
    pub fn with_auto_gen_tag(mut self, enabled: bool) -> Self {
        self.auto_gen_tag = enabled;
        self
    }

    /// Where the root page ends up once relocated.
    #[must_use]
    pub fn root_page_destination(&self) -> PathBuf {
        self.out_dir.join(&self.root_page)
    }

    /// Whether `path` carries the configured markdown extension.
    #[must_use]
    pub fn is_markdown(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.markdown_extension)
    }
}
