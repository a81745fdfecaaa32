//! expert-templates - merge optimized expert prompts into a template catalog
//!
//! A one-shot batch job: load the catalog and the optimization source, rewrite
//! the recognized experts' industry records, prepend one optimized template to
//! each, stamp version metadata, back up the original catalog and write the
//! merged catalog back.
//!
//! # Flow
//!
//! ```text
//! Load -> Merge (per expert) -> Stamp -> Backup write -> Catalog overwrite
//! ```
//!
//! # Example
//!
//! ```ignore
//! use expert_templates::{Catalog, OptimizationSource, merge, MergeOptions};
//!
//! let mut catalog: Catalog = store::load_json(&catalog_path)?;
//! let source: OptimizationSource = store::load_json(&source_path)?;
//! let report = merge(&mut catalog, &source, &MergeOptions::default())?;
//! println!("updated {} experts", report.count());
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod stamp;
pub mod store;
pub mod template;
pub mod updater;

pub use catalog::{Catalog, OptimizationSource};
pub use error::MergeError;
pub use merge::{MergeOptions, MergeReport, merge};
pub use stamp::{OptimizationInfo, StampOptions, stamp};
pub use template::{ExpertInfo, OptimizedPrompt, PromptSections, Template, build_template};
pub use updater::{RunSummary, Updater};

/// Expert keys considered by default, in processing order
pub const DEFAULT_EXPERTS: [&str; 5] = ["teacher", "lawyer", "accountant", "realtor", "insurance"];

/// Default cap on an industry's template list after a merge
pub const DEFAULT_MAX_TEMPLATES: usize = 10;

/// Version written to the catalog after a run
pub const DEFAULT_VERSION: &str = "2025.2-optimized";
