//! "Certwatch" checker

//! Crate docs

#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    unstable_features,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    unused_extern_crates
)]
// For development:
// #![allow(dead_code, unused_imports, unused_variables, deprecated)]


use certwatch::*;
use clap::Parser;
use colored::Colorize;
use std::{io, path::PathBuf, process};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};


/// All certificates valid
const EXIT_HEALTHY: i32 = 0;

/// Some certificates expire soon, expired, or couldn't be checked
const EXIT_AT_RISK: i32 = 1;

/// Configuration or run parameters unusable
const EXIT_FAILURE: i32 = 2;


/// Check TLS certificate expiration of configured hosts, notify about at-risk ones
#[derive(Parser, Debug)]
#[command(name = "certwatch", author, version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON), defaults to first existing of: /etc/certwatch/certwatch.conf, ./certwatch.conf
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// TLS port to check
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    port: Option<u32>,

    /// Per-host timeout in seconds
    #[arg(short = 't', long = "timeout", value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Amount of hosts checked at once
    #[arg(long = "concurrency", value_name = "COUNT")]
    concurrency: Option<usize>,

    /// Webhook to notify about at-risk hosts
    #[arg(short = 'w', long = "webhook", value_name = "URL")]
    webhook: Option<String>,

    /// Owner label put in notifications
    #[arg(long = "owner", value_name = "LABEL")]
    owner: Option<String>,

    /// Print report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,
}


/// Initial setup of the tracing subscriber, RUST_LOG wins over configured level
fn setup_logger(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .unwrap_or_else(|err| eprintln!("Couldn't initialize logger: {}", err));
}


/// Merge CLI arguments over configuration, run the checks, print results
fn run(args: &Args, config: &Config) -> Result<RunOutcome, RunError> {
    let mut config = config.clone();
    config.override_with(args.port, args.timeout, args.concurrency);
    let params = config.run_parameters()?;
    debug!("Run parameters: {:?}", params);

    let mut settings = config.settings.clone();
    settings.override_with(args.webhook.as_deref(), args.owner.as_deref());

    let records = config.host_records();
    let execution = execute_checks(
        TlsFetcher,
        &WebhookNotifier::default(),
        &records,
        &settings,
        &params,
    )?;

    if args.json {
        match execution.report.to_json() {
            Ok(json) => println!("{}", json),
            Err(err) => {
                error!("Report serialization failure: {}", err);
                println!("{}", execution.report);
            }
        }
    } else {
        println!("{}", execution.report);
    }

    match &execution.notification {
        Ok(NotifyStatus::Sent) => {
            eprintln!(
                "{}",
                format!(
                    "Notification about {} at-risk host(s) sent.",
                    execution.batch.total_count()
                )
                .green()
            );
        }
        Ok(NotifyStatus::Skipped) if !execution.batch.is_empty() => {
            eprintln!(
                "{}",
                "At-risk hosts found, but no webhook configured. Notification skipped.".yellow()
            );
        }
        Ok(NotifyStatus::Skipped) => (),
        Err(err) => eprintln!("{}", format!("Notification failed: {}", err).red()),
    }

    Ok(execution.outcome())
}


fn main() {
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(args.config.as_deref());
    setup_logger(
        config
            .as_ref()
            .map(Config::get_log_level)
            .unwrap_or(LevelFilter::INFO),
    );
    info!("Starting Certwatch v{}", env!("CARGO_PKG_VERSION"));

    let exit_code = match config {
        Ok(config) => {
            match run(&args, &config) {
                Ok(RunOutcome::Healthy) => EXIT_HEALTHY,
                Ok(RunOutcome::AtRisk) => EXIT_AT_RISK,
                Err(err) => {
                    error!("{}", err);
                    eprintln!("{}", format!("FATAL: {}", err).red());
                    EXIT_FAILURE
                }
            }
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", format!("FATAL: {}", err).red());
            EXIT_FAILURE
        }
    };
    process::exit(exit_code)
}
