//! Post-processing of a generated page tree.
//!
//! Runs after generation, on the output directory:
//! 1. Every markdown page has its auto-generated footer removed and its
//!    "see also" heading title-cased. The rewrite goes to a temporary file in
//!    the same directory, then replaces the page.
//! 2. Every file is renamed with the underscores in its name turned into
//!    hyphens.
//! 3. The root page is moved to its final location outside the directory.
//!
//! Filtering errors are recorded in the report and the walk moves on.
//! Rename errors abort the walk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::DocsConfig;
use crate::error::{DocsError, FileError, FileErrorKind};
use crate::naming::{hyphenated_path, page_file_name, title_case};
use crate::report::{PostProcessReport, RenamedFile};

/// Apply the line filter to page content.
///
/// Lines containing the auto-generated marker are dropped; lines containing
/// the see-also marker (case-insensitive) are title-cased. Every other line
/// is kept as is and in order. A trailing newline survives iff the input had
/// one.
#[must_use]
pub fn filter_lines(content: &str, config: &DocsConfig) -> String {
    let see_also = config.see_also_marker.to_lowercase();
    let kept: Vec<String> = content
        .lines()
        .filter(|line| !line.contains(config.auto_generated_marker.as_str()))
        .map(|line| {
            if !see_also.is_empty() && line.to_lowercase().contains(&see_also) {
                title_case(line)
            } else {
                line.to_owned()
            }
        })
        .collect();

    let mut out = kept.join("\n");
    if content.ends_with('\n') && !kept.is_empty() {
        out.push('\n');
    }
    out
}

/// Rewrite one markdown page in place through the line filter.
///
/// # Errors
///
/// Returns a [`FileError`] if the page cannot be read, is not UTF-8, or the
/// filtered content cannot be written back.
pub fn rewrite_page(path: &Path, config: &DocsConfig) -> Result<(), FileError> {
    let bytes = fs::read(path).map_err(|e| {
        FileError::new(path, FileErrorKind::Io, format!("Failed to read file: {e}"))
    })?;
    let content = String::from_utf8(bytes).map_err(|_| {
        FileError::new(path, FileErrorKind::InvalidEncoding, "File is not valid UTF-8")
    })?;

    let filtered = filter_lines(&content, config);
    write_atomically(path, filtered.as_bytes())
        .map_err(|e| FileError::new(path, FileErrorKind::Io, format!("Failed to write file: {e}")))
}

fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    // NamedTempFile is created 0600; the page keeps its own mode
    tmp.as_file().set_permissions(fs::metadata(path)?.permissions())?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Collect every regular file under `root`, sorted.
///
/// Traversal errors are returned alongside the files instead of stopping
/// the walk.
fn find_files(root: &Path) -> (Vec<PathBuf>, Vec<FileError>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    for entry_result in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                errors.push(FileError::new(
                    path,
                    FileErrorKind::Walk,
                    format!("Directory traversal error: {walk_err}"),
                ));
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    (files, errors)
}

fn rename(from: &Path, to: &Path) -> Result<(), DocsError> {
    fs::rename(from, to).map_err(|source| DocsError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Filter and rename every file under `config.out_dir`.
///
/// A file whose filtering failed is still renamed; the failure is recorded
/// in [`PostProcessReport::filter_errors`].
///
/// # Errors
///
/// Returns [`DocsError::Io`] if the output directory does not exist and
/// [`DocsError::Rename`] on the first rename failure. Files visited before
/// that failure keep their new names.
pub fn post_process(config: &DocsConfig) -> Result<PostProcessReport, DocsError> {
    let root = &config.out_dir;
    if !root.is_dir() {
        return Err(DocsError::Io {
            path: root.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "output directory not found"),
        });
    }

    let (files, walk_errors) = find_files(root);
    let mut report = PostProcessReport {
        walk_errors,
        ..PostProcessReport::default()
    };

    for path in &files {
        if config.is_markdown(path) {
            match rewrite_page(path, config) {
                Ok(()) => {
                    debug!(file = %path.display(), "removed auto-generated line");
                    report.filtered_files.push(path.clone());
                }
                Err(e) => {
                    warn!("{}", e.format_human_readable());
                    report.filter_errors.push(e);
                }
            }
        }

        let target = hyphenated_path(path);
        if target != *path {
            rename(path, &target)?;
            debug!(from = %path.display(), to = %target.display(), "renamed");
            report.renamed.push(RenamedFile {
                from: path.clone(),
                to: target,
            });
        }
    }

    for e in &report.walk_errors {
        warn!("{}", e.format_human_readable());
    }
    info!(
        files = files.len(),
        filtered = report.filtered_files.len(),
        renamed = report.renamed.len(),
        "post-processed {}",
        root.display()
    );
    Ok(report)
}

/// Move the root page `<root_name>.md` (after hyphenation) to
/// `config.root_page_destination()`.
///
/// # Errors
///
/// Returns [`DocsError::RootPageMissing`] if the page does not exist and
/// [`DocsError::Rename`] if the move fails.
pub fn relocate_root_page(config: &DocsConfig, root_name: &str) -> Result<PathBuf, DocsError> {
    let file_name = page_file_name(root_name, &config.markdown_extension);
    let source = hyphenated_path(&config.out_dir.join(file_name));
    if !source.is_file() {
        return Err(DocsError::RootPageMissing { path: source });
    }

    let destination = config.root_page_destination();
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| DocsError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    rename(&source, &destination)?;
    info!(from = %source.display(), to = %destination.display(), "relocated root page");
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filter_drops_marker_line_and_keeps_order() {
        let cfg = DocsConfig::default();
        let input = "## morty\n\nfirst\n###### Auto generated by clidoc on 1-Jan-2026\nsecond\n";
        assert_eq!(filter_lines(input, &cfg), "## morty\n\nfirst\nsecond\n");
    }

    #[test]
    fn test_filter_title_cases_see_also() {
        let cfg = DocsConfig::default();
        assert_eq!(filter_lines("### SEE ALSO", &cfg), "### See Also");
        assert_eq!(filter_lines("### see also\n* [x](/cli/x)\n", &cfg), "### See Also\n* [x](/cli/x)\n");
    }

    #[test]
    fn test_filter_normalizes_crlf() {
        let cfg = DocsConfig::default();
        let input = "## morty\r\n### SEE ALSO\r\n###### Auto generated by x\r\nlast\r\n";
        assert_eq!(filter_lines(input, &cfg), "## morty\n### See Also\nlast\n");
    }

    #[test]
    fn test_find_files_collects_walk_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let (files, errors) = find_files(&missing);
        assert!(files.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, FileErrorKind::Walk);
        assert_eq!(errors[0].file, missing);
    }

    #[test]
    fn test_find_files_is_sorted_and_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("b_dir")).unwrap();
        fs::write(tmp.path().join("b_dir").join("x.md"), "x").unwrap();
        fs::write(tmp.path().join("a.md"), "a").unwrap();
        let (files, errors) = find_files(tmp.path());
        assert!(errors.is_empty());
        assert_eq!(
            files,
            vec![tmp.path().join("a.md"), tmp.path().join("b_dir").join("x.md")]
        );
    }

    #[test]
    fn test_filter_keeps_missing_trailing_newline() {
        let cfg = DocsConfig::default();
        assert_eq!(filter_lines("a\nb", &cfg), "a\nb");
        assert_eq!(filter_lines("", &cfg), "");
    }

    #[test]
    fn test_rewrite_page_overwrites_file() {
        let tmp = TempDir::new().unwrap();
        let page = tmp.path().join("morty_fn.md");
        fs::write(&page, "keep\n###### Auto generated by x on y\n").unwrap();
        rewrite_page(&page, &DocsConfig::default()).unwrap();
        assert_eq!(fs::read_to_string(&page).unwrap(), "keep\n");
    }

    #[test]
    fn test_rewrite_page_rejects_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let page = tmp.path().join("bad.md");
        fs::write(&page, [0xff, 0xfe, 0x00]).unwrap();
        let err = rewrite_page(&page, &DocsConfig::default()).unwrap_err();
        assert_eq!(err.kind, FileErrorKind::InvalidEncoding);
    }

    #[test]
    fn test_rewrite_missing_page_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = rewrite_page(&tmp.path().join("absent.md"), &DocsConfig::default()).unwrap_err();
        assert_eq!(err.kind, FileErrorKind::Io);
    }

    #[test]
    fn test_post_process_missing_out_dir() {
        let tmp = TempDir::new().unwrap();
        let cfg = DocsConfig::default().with_out_dir(tmp.path().join("nope"));
        assert!(matches!(post_process(&cfg), Err(DocsError::Io { .. })));
    }

    #[test]
    fn test_relocate_missing_root_page() {
        let tmp = TempDir::new().unwrap();
        let cfg = DocsConfig::default().with_out_dir(tmp.path());
        let err = relocate_root_page(&cfg, "morty").unwrap_err();
        assert!(matches!(err, DocsError::RootPageMissing { .. }));
    }
}
