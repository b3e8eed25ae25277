//! ghq-nav CLI - Command line interface for ghq-nav
//!
//! Browse, open, and fetch repositories managed by ghq.

mod commands;
mod terminal;
mod workspace_file;

use clap::{Parser, Subcommand};
use ghq_nav_core::{CommandId, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_palette_command, GetArgs, ListArgs, ResolveUrlArgs};

/// ghq-nav: pick ghq repositories and open them in your editor
#[derive(Parser, Debug)]
#[command(name = "ghq-nav")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to ghq executable (overrides config and env)
    #[arg(long, global = true, env = "GHQ_NAV_GHQ")]
    ghq_path: Option<String>,

    /// Editor command used to open folders and files (overrides config and env)
    #[arg(long, global = true, env = "GHQ_NAV_EDITOR")]
    editor: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Open a repository in the editor
    #[command(visible_alias = "o")]
    Open {
        /// Open in a new window instead of reusing the current one
        #[arg(short = 'n', long)]
        new_window: bool,
    },

    /// Open a repository in a new editor window
    OpenInNewWindow,

    /// Open a repository's web page
    #[command(visible_alias = "browse")]
    OpenInBrowser,

    /// Add a repository to the editor workspace
    AddToWorkspace,

    /// Pick a repository, then one of its files, and open the file
    #[command(visible_alias = "f")]
    OpenFile,

    /// Clone a repository by URL with ghq get
    Get(GetArgs),

    /// Print the upstream repository URL of the package owning a file
    ResolveUrl(ResolveUrlArgs),

    /// List repositories
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Print the ghq root
    Root,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.ghq_path.clone(), cli.editor.clone())?;

    if cli.verbose {
        tracing::info!(
            ghq = %config.tools.ghq,
            editor = %config.editor.command,
            workspace_file = ?config.editor.workspace_file,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("ghq-nav {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Open { new_window }) => {
            let id = if new_window {
                CommandId::OpenInNewWindow
            } else {
                CommandId::Open
            };
            run_palette_command(id, &config, None).await?;
        }
        Some(Commands::OpenInNewWindow) => {
            run_palette_command(CommandId::OpenInNewWindow, &config, None).await?;
        }
        Some(Commands::OpenInBrowser) => {
            run_palette_command(CommandId::OpenInBrowser, &config, None).await?;
        }
        Some(Commands::AddToWorkspace) => {
            run_palette_command(CommandId::AddToWorkspace, &config, None).await?;
        }
        Some(Commands::OpenFile) => {
            run_palette_command(CommandId::OpenFileInCurrentWindow, &config, None).await?;
        }
        Some(Commands::Get(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::ResolveUrl(args)) => {
            args.execute(&config, cli.verbose).await?;
        }
        Some(Commands::List(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Root) => {
            commands::list::show_root(&config).await?;
        }
        Some(Commands::Config) => {
            println!("ghq-nav Configuration");
            println!("=====================");
            println!();
            println!("Tools:");
            println!("  ghq: {}", config.tools.ghq);
            println!("  git: {}", config.tools.git);
            println!("  npm: {}", config.tools.npm);
            println!("  gem: {}", config.tools.gem);
            println!();
            println!("Editor:");
            println!("  command: {}", config.editor.command);
            println!(
                "  workspace_file: {}",
                config
                    .editor
                    .workspace_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(none - uses editor --add)".to_string())
            );
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("ghq-nav - browse and open ghq repositories");
            println!();
            println!("Commands:");
            for id in CommandId::ALL {
                println!("  {}", id);
            }
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
