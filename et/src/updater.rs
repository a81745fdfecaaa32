//! End-to-end update run
//!
//! Load both documents, merge and stamp a copy of the catalog, then write the
//! backup of the untouched original strictly before overwriting the catalog.
//! A failure before the backup write leaves the disk untouched.

use chrono::{DateTime, TimeZone};
use eyre::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::catalog::{Catalog, OptimizationSource};
use crate::config::Config;
use crate::merge::{MergeReport, merge};
use crate::stamp::{OptimizationInfo, StampOptions, stamp};
use crate::store;

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: MergeReport,
    pub info: OptimizationInfo,
    pub version: String,
    pub catalog_path: PathBuf,
    pub backup_path: PathBuf,
    /// False for dry runs
    pub written: bool,
}

impl RunSummary {
    pub fn updated_count(&self) -> usize {
        self.report.count()
    }
}

/// Drives one update run
pub struct Updater {
    config: Config,
    dry_run: bool,
}

impl Updater {
    pub fn new(config: Config) -> Self {
        Self { config, dry_run: false }
    }

    /// Skip both writes
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the update with `now` as the run timestamp
    pub fn run<Tz>(&self, now: &DateTime<Tz>) -> Result<RunSummary>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let config = &self.config;
        debug!(catalog = ?config.catalog, source = ?config.source, dry_run = self.dry_run, "Updater::run: called");

        info!("Loading catalog {}", config.catalog.display());
        let original: Catalog = store::load_json(&config.catalog).context("Failed to load catalog")?;

        info!("Loading optimization source {}", config.source.display());
        let source: OptimizationSource =
            store::load_json(&config.source).context("Failed to load optimization source")?;

        let mut merged = original.clone();
        let report = merge(&mut merged, &source, &config.merge_options())?;

        let backup_path = store::backup_path(&config.catalog, now)?;
        let backup_file = backup_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let info = stamp(
            &mut merged,
            &StampOptions {
                version: config.version.clone(),
                optimized_by: config.optimized_by.clone(),
                expert_count: report.count(),
                backup_file,
            },
            now,
        )?;

        if self.dry_run {
            info!("Dry run, leaving {} untouched", config.catalog.display());
        } else {
            store::write_json(&backup_path, &original).context("Failed to write backup")?;
            let written = if config.atomic_write {
                store::write_json_atomic(&config.catalog, &merged)
            } else {
                store::write_json(&config.catalog, &merged)
            };
            written.context("Failed to write catalog")?;
        }

        Ok(RunSummary {
            report,
            info,
            version: config.version.clone(),
            catalog_path: config.catalog.clone(),
            backup_path,
            written: !self.dry_run,
        })
    }
}
