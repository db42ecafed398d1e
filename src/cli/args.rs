//! CLI argument definitions using clap

use crate::checker::CheckOptions;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ssl-guardian")]
#[command(version)]
#[command(about = "Check TLS certificates for expiry, weak keys and trust problems", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Domain to check (shortcut for 'check' command)
    #[arg(value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Port to connect to (default: 443, or the config file value)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Connection timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Days before expiry at which a certificate is flagged
    #[arg(long, global = true, value_parser = clap::value_parser!(i64).range(0..))]
    pub warning_days: Option<i64>,

    /// Path to a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the certificate of one domain
    Check(CheckArgs),

    /// Check many domains concurrently
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Domain to check
    #[arg(required = true)]
    pub domain: String,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Domains to check
    #[arg(value_name = "DOMAINS")]
    pub domains: Vec<String>,

    /// File with one domain per line
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Number of parallel checks
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Only show domains with issues
    #[arg(long)]
    pub issues_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rich terminal tables (default)
    #[default]
    Table,
    /// JSON output
    Json,
    /// Markdown summary
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl Cli {
    /// The shortcut domain, normalized
    pub fn normalized_domain(&self) -> Option<String> {
        self.domain.as_deref().map(normalize_domain)
    }

    /// Apply command-line overrides on top of configured options
    pub fn apply_overrides(&self, mut options: CheckOptions) -> CheckOptions {
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(secs) = self.timeout {
            options.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(days) = self.warning_days {
            options.warning_days = days;
        }
        options
    }
}

/// Strip scheme, path and port from user input and lowercase the host
pub fn normalize_domain(input: &str) -> String {
    let mut host = input.trim();
    if let Some((_, rest)) = host.split_once("://") {
        host = rest;
    }
    if let Some(end) = host.find(['/', '?', '#']) {
        host = &host[..end];
    }
    if let Some((_, rest)) = host.rsplit_once('@') {
        host = rest;
    }
    if let Some((name, port)) = host.rsplit_once(':') {
        if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) {
            host = name;
        }
    }
    host.trim_end_matches('.').to_lowercase()
}
