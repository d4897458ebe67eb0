//! CLI Adapter.

mod install;
mod status;
mod uninstall;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::AppError;

use install::InstallArgs;

/// Environment variable overriding the diagnostic log filter.
const LOG_ENV: &str = "MTDEPLOY_LOG";

#[derive(Parser)]
#[command(name = "mtdeploy")]
#[command(version)]
#[command(
    about = "Provision, verify, and tear down an MTProto proxy on this host",
    long_about = None
)]
struct Cli {
    /// Installer settings file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Runs `install` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install (or reinstall) the proxy service
    Install(InstallArgs),
    /// Stop the proxy service and delete its files
    #[clap(visible_alias = "remove")]
    Uninstall,
    /// Show service state and connection links of the current install
    Status,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result: Result<i32, AppError> = match cli.command {
        None => install::run_install(config, InstallArgs::default()).map(|_| 0),
        Some(Commands::Install(args)) => install::run_install(config, args).map(|_| 0),
        Some(Commands::Uninstall) => uninstall::run_uninstall(config).map(|_| 0),
        Some(Commands::Status) => status::run_status(config),
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("❌ {}: {}", e.label(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "mtdeploy=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .try_init();
}
