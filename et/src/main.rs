//! et - merge optimized expert prompts into a template catalog

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use expert_templates::Updater;
use expert_templates::cli::Cli;
use expert_templates::config::Config;
use expert_templates::updater::RunSummary;

fn parse_level(level_str: &str) -> tracing::Level {
    match level_str.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", level_str);
            tracing::Level::WARN
        }
    }
}

/// Priority: CLI --log-level > config file > RUST_LOG > WARN
fn build_filter(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> EnvFilter {
    match cli_log_level.or(config_log_level) {
        Some(s) => EnvFilter::default().add_directive(parse_level(s).into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let filter = build_filter(cli_log_level, config_log_level);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    debug!("Logging initialized");
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for expert in &summary.report.updated {
        if expert.evicted > 0 {
            println!(
                "{} {} ({}), {} old template(s) dropped",
                "✓".green(),
                expert.name,
                expert.key.cyan(),
                expert.evicted
            );
        } else {
            println!("{} {} ({})", "✓".green(), expert.name, expert.key.cyan());
        }
    }

    println!();
    if summary.written {
        println!("{} Expert templates updated", "✓".green().bold());
    } else {
        println!("{} Dry run, no files written", "•".yellow().bold());
    }
    println!("  Experts updated: {}", summary.updated_count());
    if summary.written {
        println!("  Backup: {}", summary.backup_path.display());
    }
    println!("  Version: {}", summary.version.cyan());
    println!("  Optimized at: {}", summary.info.optimization_date);
    println!("  Features:");
    for feature in &summary.info.features {
        println!("    {} {}", "✨".dimmed(), feature);
    }
    println!("  Catalog: {}", summary.catalog_path.display());
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let config = cli.apply(config);
    config.validate()?;

    info!("expert-templates starting");
    println!("{} Loading {}", "📖".dimmed(), config.catalog.display());
    println!("{} Loading {}", "📖".dimmed(), config.source.display());

    let now = chrono::Local::now();
    let summary = Updater::new(config).dry_run(cli.dry_run).run(&now)?;

    print_summary(&summary);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        println!("{} Update failed: {:#}", "✗".red(), e);
        std::process::exit(1);
    }
}
