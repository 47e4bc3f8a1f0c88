use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docugenius")]
#[command(
    version,
    about = "AI-driven documentation generator for GitHub repositories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate documentation for a repository
    Generate {
        #[arg(help = "Repository as owner/name")]
        repository: String,
        #[arg(long, help = "Branch, tag, or commit (default branch if omitted)")]
        git_ref: Option<String>,
        #[arg(long, help = "Model override")]
        model: Option<String>,
        #[arg(long, short, help = "Write rendered Markdown to this file")]
        output: Option<PathBuf>,
        #[arg(long, default_value = "local", help = "Owner key for persistence")]
        user: String,
        #[arg(long, help = "Skip persisting the generated document")]
        no_save: bool,
    },

    /// List saved documents
    List {
        #[arg(long, default_value = "local", help = "Owner key")]
        user: String,
    },

    /// Delete a saved document
    Delete {
        #[arg(help = "Document id")]
        id: String,
        #[arg(long, default_value = "local", help = "Owner key")]
        user: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Show configuration file paths
    Path,
    /// Initialize project configuration
    Init,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Generate {
            repository,
            git_ref,
            model,
            output,
            user,
            no_save,
        } => {
            runtime.block_on(docugenius::cli::commands::generate::run(
                docugenius::cli::commands::generate::GenerateOptions {
                    repository,
                    git_ref,
                    model,
                    output,
                    user,
                    no_save,
                },
            ))?;
        }
        Commands::List { user } => {
            runtime.block_on(docugenius::cli::commands::generate::list(&user))?;
        }
        Commands::Delete { id, user } => {
            runtime.block_on(docugenius::cli::commands::generate::delete(&id, &user))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                docugenius::cli::commands::config::show(json)?;
            }
            ConfigAction::Path => {
                docugenius::cli::commands::config::path()?;
            }
            ConfigAction::Init => {
                docugenius::cli::commands::config::init()?;
            }
        },
    }

    Ok(())
}
