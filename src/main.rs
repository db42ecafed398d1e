//! SSL Guardian - TLS certificate expiry and health checker
//!
//! Checks one domain or many domains concurrently and reports certificate
//! validity, upcoming expiry and weak keys as a table, JSON or Markdown.

use anyhow::Context;
use clap::Parser;
use console::style;
use ssl_guardian::checks::read_domains_file;
use ssl_guardian::cli::{normalize_domain, BatchArgs, Cli, Commands, OutputFormat};
use ssl_guardian::config::load_settings;
use ssl_guardian::models::{BatchResult, CheckResult};
use ssl_guardian::output;
use ssl_guardian::utils::create_progress_bar;
use ssl_guardian::SslChecker;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Every certificate checked was valid
const EXIT_OK: u8 = 0;
/// Usage or configuration problem
const EXIT_ERROR: u8 = 1;
/// At least one check failed or found an invalid certificate
const EXIT_ISSUES: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Install the ring crypto provider for rustls
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let settings = load_settings(cli.config.as_deref()).context("failed to load configuration")?;
    let options = cli.apply_overrides(settings.check_options());
    let checker = SslChecker::from_settings(&settings)?.with_options(options);

    match &cli.command {
        Some(Commands::Check(args)) => {
            let domain = normalize_domain(&args.domain);
            run_check(&checker, &domain, &cli).await
        }
        Some(Commands::Batch(args)) => run_batch(checker, args, &cli).await,
        None => match cli.normalized_domain() {
            Some(domain) => run_check(&checker, &domain, &cli).await,
            None => {
                anyhow::bail!("no domain given; try 'ssl-guardian --help'")
            }
        },
    }
}

async fn run_check(checker: &SslChecker, domain: &str, cli: &Cli) -> anyhow::Result<u8> {
    if domain.is_empty() {
        anyhow::bail!("domain must not be empty");
    }

    let result = checker.check_one(domain).await;

    match cli.format {
        OutputFormat::Json => output::print_json(&result)?,
        OutputFormat::Markdown => print!("{}", output::render_check_markdown(&result)),
        OutputFormat::Table => output::print_check_result(&result, cli.verbose),
    }

    Ok(exit_code_for(&result))
}

async fn run_batch(checker: SslChecker, args: &BatchArgs, cli: &Cli) -> anyhow::Result<u8> {
    let mut domains: Vec<String> = args.domains.iter().map(|d| normalize_domain(d)).collect();
    if let Some(path) = &args.file {
        let from_file = read_domains_file(path)
            .with_context(|| format!("failed to read domains from {}", path.display()))?;
        domains.extend(from_file.iter().map(|d| normalize_domain(d)));
    }
    domains.retain(|d| !d.is_empty());

    if domains.is_empty() {
        anyhow::bail!("no domains to check; pass domains or --file");
    }

    let checker = match args.parallel {
        Some(parallel) => checker.with_parallel(parallel),
        None => checker,
    };

    let results = if cli.format == OutputFormat::Table {
        let pb = create_progress_bar(domains.len() as u64, "Checking certificates");
        let results = checker
            .check_all(&domains, |result| {
                pb.set_message(result.domain.clone());
                pb.inc(1);
            })
            .await;
        pb.finish_and_clear();
        results
    } else {
        checker.check_all(&domains, |_| {}).await
    };

    let batch = BatchResult::from_results(&results);

    match cli.format {
        OutputFormat::Json => output::print_json(&batch)?,
        OutputFormat::Markdown => print!("{}", output::render_batch_markdown(&batch)),
        OutputFormat::Table => {
            output::print_batch_table(&batch, args.issues_only);
            output::print_batch_summary(&batch);
        }
    }

    Ok(if batch.all_valid() { EXIT_OK } else { EXIT_ISSUES })
}

fn exit_code_for(result: &CheckResult) -> u8 {
    if result.is_healthy() {
        EXIT_OK
    } else {
        EXIT_ISSUES
    }
}
