mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use memmaster_lib::flashcards::SortOrder;

#[derive(Parser)]
#[command(name = "memmaster-cli", about = "Spaced-repetition flashcards in your notes", version)]
struct Cli {
    /// Vault directory (default: current directory)
    #[arg(long, global = true, env = "MEMMASTER_VAULT")]
    vault: Option<PathBuf>,

    /// Settings directory (default: platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List cards due for review
    Due {
        /// Filter by title, content or tag
        #[arg(long)]
        search: Option<String>,
        /// oldest-first or newest-first
        #[arg(long)]
        sort: Option<SortOrder>,
    },

    /// List every flashcard in the vault
    List,

    /// Show review statistics
    Stats,

    /// Grade a card: easy, medium or hard
    Grade {
        /// Note path, relative to the vault
        path: String,
        difficulty: String,
    },

    /// Turn a note into a flashcard
    Make {
        /// Note path, relative to the vault
        path: String,
    },

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print current settings
    Show,

    /// Recognise cards by tag
    SetTag {
        tag: String,
    },

    /// Recognise cards by folder
    SetFolder {
        folder: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();

    let app = app::App::new(cli.vault, cli.config_dir)?;

    match cli.command {
        Command::Due { search, sort } => {
            commands::due::run(&app, search.as_deref(), sort.unwrap_or_default(), &cli.format, use_color)?;
        }
        Command::List => {
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Grade { path, difficulty } => {
            commands::grade::run(&app, &path, &difficulty, &cli.format, use_color)?;
        }
        Command::Make { path } => {
            commands::make::run(&app, &path, &cli.format, use_color)?;
        }
        Command::Config(subcmd) => match subcmd {
            ConfigCommand::Show => commands::config::run_show(&app, &cli.format)?,
            ConfigCommand::SetTag { tag } => commands::config::run_set_tag(&app, &tag, &cli.format)?,
            ConfigCommand::SetFolder { folder } => {
                commands::config::run_set_folder(&app, &folder, &cli.format)?
            }
        },
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
