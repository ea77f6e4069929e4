use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clidoc::{DocsConfig, PostProcessReport, output};

use crate::logging;

#[derive(Parser, Debug)]
#[command(
    name = "clidoc",
    version,
    about = "Generate markdown reference pages for the clidoc command line",
    long_about = "Generate markdown reference pages for the clidoc command line.\n\n\
        Without a subcommand the full pipeline runs: pages are rendered, the \
        auto-generated footer is removed, file names are hyphenated and the \
        root page is moved next to the output directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory the page tree is written to
    #[arg(long, global = true, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Destination of the root page, relative to the output directory
    #[arg(long, global = true, value_name = "PATH")]
    pub root_page: Option<PathBuf>,

    /// Report format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Render the pages and tidy them (the default)
    Generate,
    /// Render the raw page tree without post-processing
    Render {
        /// Do not append the auto-generated footer
        #[arg(long)]
        no_auto_gen_tag: bool,
    },
    /// Tidy an existing page tree and relocate its root page
    Tidy {
        /// Name of the root command whose page is relocated
        #[arg(long, value_name = "NAME")]
        root_name: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Cli {
    fn docs_config(&self) -> DocsConfig {
        let mut config = DocsConfig::default();
        if let Some(out_dir) = &self.out_dir {
            config = config.with_out_dir(out_dir);
        }
        if let Some(root_page) = &self.root_page {
            config = config.with_root_page(root_page);
        }
        config
    }
}

/// Parse arguments, install logging and run the selected command.
///
/// # Errors
///
/// Returns an error on any fatal pipeline failure.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;
    execute(&cli)
}

fn execute(cli: &Cli) -> Result<()> {
    let config = cli.docs_config();
    let root_cmd = Cli::command();
    tracing::debug!(out_dir = %config.out_dir.display(), command = ?cli.command, "starting");

    match cli.command.as_ref().unwrap_or(&Commands::Generate) {
        Commands::Generate => {
            let report = clidoc::run(&root_cmd, &config).with_context(|| {
                format!("failed to generate documentation in {}", config.out_dir.display())
            })?;
            print_report(&report, cli.format)
        }
        Commands::Render { no_auto_gen_tag } => {
            let config = config.with_auto_gen_tag(!no_auto_gen_tag);
            let pages = clidoc::render(&root_cmd, &config).with_context(|| {
                format!("failed to generate documentation in {}", config.out_dir.display())
            })?;
            for page in pages {
                println!("{}", page.display());
            }
            Ok(())
        }
        Commands::Tidy { root_name } => {
            let root_name = root_name.as_deref().unwrap_or_else(|| root_cmd.get_name());
            let report = clidoc::tidy(&config, root_name)
                .with_context(|| format!("failed to tidy {}", config.out_dir.display()))?;
            print_report(&report, cli.format)
        }
    }
}

fn print_report(report: &PostProcessReport, format: OutputFormat) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Human => output::write_human(report, &mut stdout),
        OutputFormat::Json => output::write_json(report, &mut stdout),
    }
}
