use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repovault::{BackupService, CancelToken, Config, GitCli, GitHubLister};

#[derive(Parser)]
#[command(name = "repovault")]
#[command(about = "Bare-mirror backup tool for git repositories and GitHub accounts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up every configured profile (the default)
    Run,

    /// Load the configuration and show what would be backed up
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    info!("Starting RepoVault v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(&config).await,
        Commands::Check => cmd_check(&config),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from the specified path or the default location
fn load_config(config_path: Option<std::path::PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    Config::load(&path)
}

/// Back up every configured profile once
async fn cmd_run(config: &Config) -> Result<()> {
    let cancel = CancelToken::new();
    spawn_interrupt_handler(cancel.clone());

    let backup = BackupService::new(GitCli::new());
    let lister = GitHubLister::new();

    let profiles = config.profiles.generic.len() + config.profiles.github.len();
    println!("🔄 Backing up {} profile(s)...", profiles);

    match repovault::run(config, &backup, &lister, &cancel).await {
        Ok(summary) => {
            println!(
                "✅ Backup complete: {} repositories up to date",
                summary.backed_up
            );
            Ok(())
        }
        Err(err) => {
            if err.cancelled {
                println!("🛑 Backup run cancelled");
            }
            if !err.failures.is_empty() {
                println!("\n❌ {} operation(s) failed:", err.failures.len());
                for failure in &err.failures {
                    println!("   {}", failure);
                }
            }
            std::process::exit(1);
        }
    }
}

/// Validate the configuration and print a profile summary
fn cmd_check(config: &Config) -> Result<()> {
    println!("✅ Configuration OK");

    println!("   Generic profiles: {}", config.profiles.generic.len());
    for profile in &config.profiles.generic {
        println!(
            "     📁 {} -> {} ({} targets)",
            profile.name,
            profile.root_folder,
            profile.targets.len()
        );
    }

    println!("   GitHub profiles: {}", config.profiles.github.len());
    for profile in &config.profiles.github {
        let scope = match &profile.include {
            None => "all repositories".to_string(),
            Some(list) if list.is_empty() => "disabled by empty include".to_string(),
            Some(list) => format!("{} included", list.len()),
        };
        println!(
            "     📁 {} -> {} ({})",
            profile.name, profile.root_folder, scope
        );
    }

    Ok(())
}

/// Turn Ctrl+C into a cooperative stop at the next repository boundary
fn spawn_interrupt_handler(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current operation");
            cancel.cancel();
        }
    });
}
