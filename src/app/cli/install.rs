//! Install command implementation.

use std::path::Path;

use clap::Args;

use crate::app::api::{self, InstallOptions};
use crate::domain::{AppError, ConnectionReport};

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct InstallArgs {
    /// Port the proxy listens on [default: 443]
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,
    /// Domain the proxy impersonates during the TLS handshake [default: www.google.com]
    #[arg(long, value_name = "HOST")]
    pub domain: Option<String>,
    /// Expose a metrics endpoint on 127.0.0.1:9090
    #[arg(long)]
    pub metrics: bool,
    /// Answer every prompt with its default
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub fn run_install(config: Option<&Path>, args: InstallArgs) -> Result<(), AppError> {
    let options = InstallOptions { port: args.port, domain: args.domain, metrics: args.metrics };
    let report = api::install(config, &options, args.yes)?;

    println!();
    println!("🎉 MTProto proxy is installed");
    print_connection(&report)
}

/// Print links, details, management commands, and warnings.
pub(super) fn print_connection(report: &ConnectionReport) -> Result<(), AppError> {
    println!();
    println!("🔗 Connection links:");
    println!("  {}", report.tg_link()?);
    println!("  {}", report.web_link()?);
    println!();
    println!("📋 Details:");
    println!("  Server:         {}", report.server);
    println!("  Port:           {}", report.port);
    println!("  Masking domain: {}", report.tls_domain);
    println!("  Secret:         {}", report.secret);
    if let Some(url) = &report.metrics_url {
        println!("  Metrics:        {}", url);
    }
    println!("  Install dir:    {}", report.install_dir.display());

    if !report.management.is_empty() {
        println!();
        println!("🛠️  Management:");
        for command in &report.management {
            println!("  {:<10} {}", format!("{}:", command.label), command.command);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!("⚠️  {}", warning);
        }
    }
    Ok(())
}
