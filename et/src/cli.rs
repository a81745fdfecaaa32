//! CLI argument parsing for expert-templates

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "et")]
#[command(author, version, about = "Merge optimized expert prompts into a template catalog", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog to update (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Optimization source to merge from (overrides config)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Merge and report without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(ref catalog) = self.catalog {
            config.catalog = catalog.clone();
        }
        if let Some(ref source) = self.source {
            config.source = source.clone();
        }
        if let Some(ref level) = self.log_level {
            config.log_level = Some(level.clone());
        }
        config
    }
}
