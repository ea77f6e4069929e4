//! Markdown page tree generator for `clap` command trees.
//!
//! Writes one page per visible command. File names are the command path
//! joined by `_` (`morty function build` -> `morty_function_build.md`).
//! Every page starts with the output of the header hook, and every
//! cross-reference goes through the link hook.
//!
//! Page layout:
//!
//! ```text
//! ## <command path>
//!
//! <about>
//!
//! ### Synopsis
//! ...
//! ### Options
//! ### Options inherited from parent commands
//! ### SEE ALSO
//!
//! ###### Auto generated by clidoc on <date>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Arg, Command, Id};
use tracing::debug;

use crate::config::DocsConfig;
use crate::error::DocsError;
use crate::naming::page_file_name;

/// Name written into the auto-generated footer.
pub const GENERATOR_NAME: &str = "clidoc";

/// Hooks and settings shared by every page of one generation run.
struct TreeWriter<'a> {
    dir: &'a Path,
    extension: &'a str,
    footer: Option<String>,
    file_prepender: &'a dyn Fn(&str) -> String,
    link_handler: &'a dyn Fn(&str) -> String,
}

/// Where a page sits in the tree.
struct PageContext<'a> {
    path: String,
    parent: Option<(&'a Command, &'a str)>,
    inherited: &'a [Id],
}

/// Generate the markdown page tree for `cmd` into `dir`.
///
/// `file_prepender` receives the full path of each page and returns text
/// written before the page body. `link_handler` receives a page file name
/// (`morty_function.md`) and returns the link target used in SEE ALSO.
///
/// Returns the written page paths in generation order (parents first).
///
/// # Errors
///
/// Returns [`DocsError::InvalidOutDir`] if `dir` cannot be created and
/// [`DocsError::Generate`] if a page cannot be written.
pub fn generate_markdown_tree<P, L>(
    cmd: &Command,
    dir: &Path,
    config: &DocsConfig,
    file_prepender: P,
    link_handler: L,
) -> Result<Vec<PathBuf>, DocsError>
where
    P: Fn(&str) -> String,
    L: Fn(&str) -> String,
{
    ensure_out_dir(dir)?;

    let mut cmd = cmd.clone();
    cmd.build();

    let footer = config.auto_gen_tag.then(|| {
        format!(
            "{} {GENERATOR_NAME} on {}",
            config.auto_generated_marker,
            Local::now().format("%-d-%b-%Y")
        )
    });
    let writer = TreeWriter {
        dir,
        extension: &config.markdown_extension,
        footer,
        file_prepender: &file_prepender,
        link_handler: &link_handler,
    };

    let mut written = Vec::new();
    let root = PageContext {
        path: cmd.get_name().to_owned(),
        parent: None,
        inherited: &[],
    };
    writer.visit(&cmd, &root, &mut written)?;
    Ok(written)
}

fn ensure_out_dir(dir: &Path) -> Result<(), DocsError> {
    if dir.exists() && !dir.is_dir() {
        return Err(DocsError::InvalidOutDir {
            path: dir.to_path_buf(),
            reason: "not a directory".to_owned(),
        });
    }
    fs::create_dir_all(dir).map_err(|e| DocsError::InvalidOutDir {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}

impl TreeWriter<'_> {
    fn visit(
        &self,
        cmd: &Command,
        ctx: &PageContext<'_>,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), DocsError> {
        let file_name = page_file_name(&ctx.path, self.extension);
        let page_path = self.dir.join(&file_name);

        let mut content = (self.file_prepender)(&page_path.to_string_lossy());
        content.push_str(&self.render_page(cmd, ctx));
        fs::write(&page_path, content).map_err(|source| DocsError::Generate {
            path: page_path.clone(),
            source,
        })?;
        debug!(page = %page_path.display(), "wrote page");
        written.push(page_path);

        let globals: Vec<Id> = cmd
            .get_arguments()
            .filter(|a| a.is_global_set())
            .map(|a| a.get_id().clone())
            .collect();
        for child in visible_subcommands(cmd) {
            let child_ctx = PageContext {
                path: format!("{} {}", ctx.path, child.get_name()),
                parent: Some((cmd, &ctx.path)),
                inherited: &globals,
            };
            self.visit(child, &child_ctx, written)?;
        }
        Ok(())
    }

    fn render_page(&self, cmd: &Command, ctx: &PageContext<'_>) -> String {
        let short = cmd.get_about().map(ToString::to_string).unwrap_or_default();
        let long = cmd
            .get_long_about()
            .map_or_else(|| short.clone(), ToString::to_string);

        let mut page = format!("## {}\n\n", ctx.path);
        if !short.is_empty() {
            page.push_str(&short);
            page.push_str("\n\n");
        }
        if !long.is_empty() {
            page.push_str("### Synopsis\n\n");
            page.push_str(&long);
            page.push_str("\n\n");
        }

        let (inherited, local): (Vec<&Arg>, Vec<&Arg>) = cmd
            .get_arguments()
            .filter(|a| !a.is_hide_set() && !a.is_positional())
            .partition(|a| ctx.inherited.contains(a.get_id()));

        page.push_str("```\n");
        page.push_str(&usage_line(cmd, &ctx.path));
        page.push_str("\n```\n\n");

        if let Some(examples) = cmd.get_after_help() {
            page.push_str("### Examples\n\n```\n");
            page.push_str(examples.to_string().trim_end());
            page.push_str("\n```\n\n");
        }

        if !local.is_empty() {
            page.push_str("### Options\n\n```\n");
            page.push_str(&option_lines(&local));
            page.push_str("```\n\n");
        }
        if !inherited.is_empty() {
            page.push_str("### Options inherited from parent commands\n\n```\n");
            page.push_str(&option_lines(&inherited));
            page.push_str("```\n\n");
        }

        let children = visible_subcommands(cmd);
        if ctx.parent.is_some() || !children.is_empty() {
            page.push_str("### SEE ALSO\n\n");
            if let Some((parent, parent_path)) = ctx.parent {
                page.push_str(&self.see_also_entry(parent, parent_path));
            }
            for child in children {
                let child_path = format!("{} {}", ctx.path, child.get_name());
                page.push_str(&self.see_also_entry(child, &child_path));
            }
            page.push('\n');
        }

        if let Some(footer) = &self.footer {
            page.push_str(footer);
            page.push('\n');
        }
        page
    }

    fn see_also_entry(&self, cmd: &Command, path: &str) -> String {
        let link = (self.link_handler)(&page_file_name(path, self.extension));
        let about = cmd.get_about().map(ToString::to_string).unwrap_or_default();
        format!("* [{path}]({link})\t - {about}\n")
    }
}

/// Subcommands that get their own page, sorted by name.
///
/// The `help` subcommand clap adds on `build` is skipped. A user-defined
/// `help` is only possible with the auto one disabled, so it is kept.
fn visible_subcommands(cmd: &Command) -> Vec<&Command> {
    let auto_help = !cmd.is_disable_help_subcommand_set();
    let mut children: Vec<&Command> = cmd
        .get_subcommands()
        .filter(|c| !c.is_hide_set() && !(auto_help && c.get_name() == "help"))
        .collect();
    children.sort_by(|a, b| a.get_name().cmp(b.get_name()));
    children
}

fn usage_line(cmd: &Command, path: &str) -> String {
    let mut parts = vec![path.to_owned()];
    if cmd
        .get_arguments()
        .any(|a| !a.is_positional() && !a.is_hide_set())
    {
        parts.push("[OPTIONS]".to_owned());
    }
    for arg in cmd.get_positionals().filter(|a| !a.is_hide_set()) {
        let name = value_name(arg);
        if arg.is_required_set() {
            parts.push(format!("<{name}>"));
        } else {
            parts.push(format!("[{name}]"));
        }
    }
    if !visible_subcommands(cmd).is_empty() {
        parts.push("<COMMAND>".to_owned());
    }
    parts.join(" ")
}

fn value_name(arg: &Arg) -> String {
    arg.get_value_names()
        .and_then(|names| names.first())
        .map_or_else(|| arg.get_id().as_str().to_uppercase(), ToString::to_string)
}

fn flag_spec(arg: &Arg) -> String {
    let flags = match (arg.get_short(), arg.get_long()) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("    --{long}"),
        (None, None) => arg.get_id().as_str().to_owned(),
    };
    if arg.get_action().takes_values() {
        format!("{flags} <{}>", value_name(arg))
    } else {
        flags
    }
}

/// Aligned option table, one line per argument.
fn option_lines(args: &[&Arg]) -> String {
    let specs: Vec<(String, String)> = args
        .iter()
        .map(|a| {
            let help = a.get_help().map(ToString::to_string).unwrap_or_default();
            (flag_spec(a), help)
        })
        .collect();
    let width = specs.iter().map(|(spec, _)| spec.len()).max().unwrap_or(0);

    specs
        .iter()
        .map(|(spec, help)| {
            if help.is_empty() {
                format!("  {spec}\n")
            } else {
                format!("  {spec:<width$}   {help}\n")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::PageNaming;
    use clap::ArgAction;
    use tempfile::TempDir;

    fn sample_command() -> Command {
        Command::new("morty")
            .about("Morty FaaS command line")
            .arg(
                Arg::new("config")
                    .long("config")
                    .short('c')
                    .global(true)
                    .help("Path to the configuration file"),
            )
            .subcommand(
                Command::new("function")
                    .about("Manage functions")
                    .subcommand(
                        Command::new("build")
                            .about("Build a function")
                            .arg(Arg::new("name").required(true))
                            .arg(
                                Arg::new("push")
                                    .long("push")
                                    .action(ArgAction::SetTrue)
                                    .help("Push the image after build"),
                            ),
                    )
                    .subcommand(Command::new("invoke").about("Invoke a function")),
            )
            .subcommand(Command::new("internal").hide(true))
    }

    fn generate(dir: &Path) -> Vec<PathBuf> {
        let config = DocsConfig::default();
        let naming = PageNaming::new(&config, "morty");
        generate_markdown_tree(
            &sample_command(),
            dir,
            &config,
            |f| naming.front_matter(f),
            |f| naming.link(f),
        )
        .unwrap()
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_one_page_per_visible_command() {
        let tmp = TempDir::new().unwrap();
        let written = generate(tmp.path());
        assert_eq!(
            file_names(&written),
            vec![
                "morty.md",
                "morty_function.md",
                "morty_function_build.md",
                "morty_function_invoke.md",
            ]
        );
        assert!(!tmp.path().join("morty_help.md").exists());
        assert!(!tmp.path().join("morty_internal.md").exists());
    }

    #[test]
    fn test_page_starts_with_front_matter() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path());
        let root = fs::read_to_string(tmp.path().join("morty.md")).unwrap();
        assert!(root.starts_with("---\ntitle: \"CLI\"\n---\n## morty\n"), "got: {root}");
        let build = fs::read_to_string(tmp.path().join("morty_function_build.md")).unwrap();
        assert!(build.starts_with("---\ntitle: \"morty function build\"\n---\n"));
    }

    #[test]
    fn test_see_also_links_parent_and_children() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path());
        let page = fs::read_to_string(tmp.path().join("morty_function.md")).unwrap();
        assert!(page.contains("### SEE ALSO\n\n"));
        assert!(page.contains("* [morty](/cli)\t - Morty FaaS command line\n"));
        assert!(page.contains("* [morty function build](/cli/morty-function-build)\t - Build a function\n"));
        let build_pos = page.find("morty function build]").unwrap();
        let invoke_pos = page.find("morty function invoke]").unwrap();
        assert!(build_pos < invoke_pos);
    }

    #[test]
    fn test_options_and_inherited_options() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path());
        let page = fs::read_to_string(tmp.path().join("morty_function_build.md")).unwrap();
        assert!(page.contains("morty function build [OPTIONS] <NAME>"), "got: {page}");
        assert!(page.contains("### Options\n\n```\n"));
        assert!(page.contains("--push"));
        let inherited = page
            .split("### Options inherited from parent commands")
            .nth(1)
            .unwrap();
        assert!(inherited.contains("-c, --config <CONFIG>"));
    }

    #[test]
    fn test_footer_uses_marker() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path());
        let page = fs::read_to_string(tmp.path().join("morty.md")).unwrap();
        let last = page.lines().last().unwrap();
        assert!(last.starts_with("###### Auto generated by clidoc on "), "got: {last}");
    }

    #[test]
    fn test_footer_can_be_disabled() {
        let tmp = TempDir::new().unwrap();
        let config = DocsConfig::default().with_auto_gen_tag(false);
        generate_markdown_tree(&sample_command(), tmp.path(), &config, |_| String::new(), str::to_owned)
            .unwrap();
        let page = fs::read_to_string(tmp.path().join("morty.md")).unwrap();
        assert!(!page.contains("Auto generated"));
    }

    #[test]
    fn test_user_defined_help_subcommand_gets_a_page() {
        let tmp = TempDir::new().unwrap();
        let cmd = Command::new("morty")
            .disable_help_subcommand(true)
            .subcommand(Command::new("help").about("Open the online manual"))
            .subcommand(Command::new("config").about("Show configuration"));

        let written = generate_markdown_tree(
            &cmd,
            tmp.path(),
            &DocsConfig::default(),
            |_| String::new(),
            str::to_owned,
        )
        .unwrap();

        assert_eq!(
            file_names(&written),
            vec!["morty.md", "morty_config.md", "morty_help.md"]
        );
        let root = fs::read_to_string(tmp.path().join("morty.md")).unwrap();
        assert!(root.contains("* [morty help](morty_help.md)\t - Open the online manual"));
    }

    #[test]
    fn test_out_dir_that_is_a_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not_a_dir");
        fs::write(&file, "x").unwrap();
        let result = generate_markdown_tree(
            &sample_command(),
            &file,
            &DocsConfig::default(),
            |_| String::new(),
            str::to_owned,
        );
        assert!(matches!(result, Err(DocsError::InvalidOutDir { .. })));
    }
}
