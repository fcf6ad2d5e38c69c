//! Argument parsing and one-shot subcommands.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use crate::app::compare::Comparer;
use crate::app::pending::PendingStore;
use crate::app::selection::selection_source_for;
use crate::domain::document::Buffer;
use crate::domain::model::ToolId;
use crate::infra::config::Config;
use crate::infra::launcher::ProcessLauncher;
use crate::infra::notify::ConsoleNotifier;
use crate::infra::paths::PathResolver;
use crate::infra::tools::ToolRegistry;
use crate::ui::shell::Shell;

const STDIN_MARKER: &str = "-";

#[derive(Debug, Parser)]
#[command(
    name = "easydiff",
    author,
    version,
    about = "Compare two documents in an external visual diff tool",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Extra configuration file applied on top of the discovered ones
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open LEFT and RIGHT in a diff tool. Use `-` to read one side from stdin
    Compare {
        left: PathBuf,
        right: PathBuf,
        /// Tool to launch; defaults to `default_tool` from the config
        #[arg(short, long, value_enum)]
        tool: Option<ToolId>,
        /// Print the command line instead of launching it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show how each supported tool resolves to an executable
    Tools {
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
    /// Interactive session with open documents and "compare later"
    Shell {
        /// Host version used to pick how two selected documents are found
        #[arg(long, default_value_t = 4000)]
        host_version: u32,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// Parse arguments, initialise logging, and dispatch.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    crate::init(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compare {
            left,
            right,
            tool,
            dry_run,
        } => compare(config, &left, &right, tool, dry_run),
        Commands::Tools { json } => tools(&config, json),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Shell { host_version } => {
            let comparer = Comparer::new(
                config,
                Arc::new(PendingStore::new()),
                Box::new(ProcessLauncher),
                Box::new(ConsoleNotifier),
            );
            Shell::new(comparer, selection_source_for(host_version)).run()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "easydiff", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn compare(
    config: Config,
    left: &Path,
    right: &Path,
    tool: Option<ToolId>,
    dry_run: bool,
) -> Result<ExitCode> {
    if left == Path::new(STDIN_MARKER) && right == Path::new(STDIN_MARKER) {
        anyhow::bail!("only one side can be read from stdin");
    }
    let tool = match tool {
        Some(tool) => tool,
        None => config.default_tool().parse()?,
    };
    let left = load_document(left)?;
    let right = load_document(right)?;

    // The tool outlives this process, so unsaved input must stay on disk.
    let comparer = Comparer::new(
        config,
        Arc::new(PendingStore::new()),
        Box::new(ProcessLauncher),
        Box::new(ConsoleNotifier),
    )
    .with_resolver(PathResolver::new(true));

    let result = if dry_run {
        comparer.prepare(tool, Some(&left), Some(&right))
    } else {
        comparer.compare_now(tool, Some(&left), Some(&right))
    };

    match result {
        Ok(command) => {
            if dry_run {
                println!("{command}");
            }
            Ok(ExitCode::SUCCESS)
        }
        // Already shown to the user by the notifier.
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

fn load_document(path: &Path) -> Result<Buffer> {
    if path == Path::new(STDIN_MARKER) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(Buffer::scratch("stdin", text));
    }
    Buffer::open(path)
}

fn tools(config: &Config, json: bool) -> Result<ExitCode> {
    let entries = ToolRegistry::from_config(config).entries();
    if json {
        let rendered =
            serde_json::to_string_pretty(&entries).context("failed to serialize tool list")?;
        println!("{rendered}");
        return Ok(ExitCode::SUCCESS);
    }

    for entry in entries {
        let origin = match (&entry.configured, entry.uses_default) {
            (Some(configured), true) => {
                format!("default, {} not found", configured.display())
            }
            (_, true) => "default".to_owned(),
            (_, false) => entry.config_key.to_owned(),
        };
        println!(
            "{:<13} {:<12} {} ({origin})",
            entry.id,
            entry.label,
            entry.executable.display()
        );
    }
    Ok(ExitCode::SUCCESS)
}
