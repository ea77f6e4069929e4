//! # clidoc
//!
//! Markdown reference pages for `clap` command trees.
//!
//! The pipeline renders one page per command, then tidies the tree for a
//! static site: the auto-generated footer is stripped, "see also" headings
//! are title-cased, file names switch from `_` to `-`, and the root page is
//! moved next to the output directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clap::Command;
//! use clidoc::{DocsConfig, run};
//!
//! let cmd = Command::new("morty").subcommand(Command::new("function"));
//! let config = DocsConfig::default().with_out_dir("pages/cli");
//!
//! let report = run(&cmd, &config).unwrap();
//! println!("Renamed: {}", report.renamed.len());
//! println!("OK: {}", report.ok());
//! ```

mod config;
mod error;
pub mod generate;
pub mod naming;
pub mod output;
pub mod postprocess;
mod report;

pub use config::{DEFAULT_OUT_DIR, DocsConfig};
pub use error::{DocsError, FileError, FileErrorKind};
pub use naming::PageNaming;
pub use report::{PostProcessReport, RenamedFile};

use std::path::PathBuf;

use clap::Command;
use tracing::info;

/// Render the raw page tree for `cmd` into `config.out_dir`.
///
/// Pages keep their generator names (`morty_function.md`) and footer.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or a page
/// cannot be written.
pub fn render(cmd: &Command, config: &DocsConfig) -> Result<Vec<PathBuf>, DocsError> {
    let naming = PageNaming::new(config, cmd.get_name());
    let pages = generate::generate_markdown_tree(
        cmd,
        &config.out_dir,
        config,
        |file| naming.front_matter(file),
        |file| naming.link(file),
    )?;
    info!(pages = pages.len(), "generated pages in {}", config.out_dir.display());
    Ok(pages)
}

/// Post-process an existing page tree and relocate its root page
/// `<root_name>.md`.
///
/// # Errors
///
/// Returns an error if a rename fails or the root page cannot be relocated.
/// Per-file filtering failures are reported in the returned report instead.
pub fn tidy(config: &DocsConfig, root_name: &str) -> Result<PostProcessReport, DocsError> {
    let mut report = postprocess::post_process(config)?;
    report.root_page = Some(postprocess::relocate_root_page(config, root_name)?);
    Ok(report)
}

/// Run the full pipeline: render, post-process, relocate the root page.
///
/// # Errors
///
/// Returns the first fatal error of any stage.
pub fn run(cmd: &Command, config: &DocsConfig) -> Result<PostProcessReport, DocsError> {
    render(cmd, config)?;
    tidy(config, cmd.get_name())
}
