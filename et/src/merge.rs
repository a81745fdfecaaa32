//! Catalog merger
//!
//! Applies the optimization source to the catalog in place. Only the
//! recognized expert keys are considered; a recognized key missing from
//! either document is skipped quietly so that a partial optimization run can
//! still be merged.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::catalog::{Catalog, OptimizationSource};
use crate::error::MergeError;
use crate::template::{ExpertInfo, build_template};

/// Options for a merge
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Expert keys to consider, in processing order
    pub experts: Vec<String>,
    /// Cap on each updated industry's template list
    pub max_templates: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            experts: crate::DEFAULT_EXPERTS.iter().map(|s| s.to_string()).collect(),
            max_templates: crate::DEFAULT_MAX_TEMPLATES,
        }
    }
}

/// What a merge changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Expert keys whose industry was updated, in processing order
    pub updated: Vec<UpdatedExpert>,
}

/// One updated industry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedExpert {
    pub key: String,
    /// Display name taken from the optimization source
    pub name: String,
    /// Templates dropped from the tail to respect the cap
    pub evicted: usize,
}

impl MergeReport {
    /// Number of experts updated
    pub fn count(&self) -> usize {
        self.updated.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.updated.iter().any(|e| e.key == key)
    }
}

/// Merge the optimization source into the catalog
///
/// For every recognized key present in both `catalog.industries` and
/// `source.experts`, overwrites the industry's display fields, prepends a
/// freshly built optimized template and truncates the template list to
/// `options.max_templates`. Running this twice inserts two templates.
pub fn merge(
    catalog: &mut Catalog,
    source: &OptimizationSource,
    options: &MergeOptions,
) -> Result<MergeReport, MergeError> {
    debug!(experts = ?options.experts, max_templates = options.max_templates, "merge: called");
    let mut report = MergeReport::default();

    let Some(industries) = catalog.industries_mut() else {
        debug!("merge: catalog has no industries object, nothing to do");
        return Ok(report);
    };

    for key in &options.experts {
        let Some(expert_value) = source.expert(key) else {
            debug!(%key, "merge: not in optimization source, skipping");
            continue;
        };
        let Some(industry) = industries.get_mut(key) else {
            debug!(%key, "merge: not in catalog industries, skipping");
            continue;
        };

        let info = ExpertInfo::from_value(key, expert_value)?;
        info!("Updating expert '{}' ({})", key, info.name);

        let record = industry.as_object_mut().ok_or_else(|| MergeError::InvalidIndustry {
            industry: key.clone(),
            reason: "record is not a JSON object".to_string(),
        })?;

        apply_expert_fields(record, &info);
        let evicted = prepend_template(key, record, &info, options.max_templates)?;

        report.updated.push(UpdatedExpert {
            key: key.clone(),
            name: info.name.clone(),
            evicted,
        });
    }

    info!(updated = report.count(), "Merge complete");
    Ok(report)
}

/// Overwrite the display fields of an industry record
fn apply_expert_fields(record: &mut Map<String, Value>, info: &ExpertInfo) {
    record.insert("name".to_string(), Value::from(info.name.clone()));
    record.insert("description".to_string(), Value::from(info.description.clone()));
    record.insert("emoji".to_string(), Value::from(info.emoji.clone()));
    record.insert("targetUsers".to_string(), Value::from(info.target_users.clone()));
    record.insert(
        "coreCompetencies".to_string(),
        Value::from(info.core_competencies.clone()),
    );
}

/// Insert the optimized template at index 0 and cap the list, returning how
/// many templates fell off the tail
fn prepend_template(
    key: &str,
    record: &mut Map<String, Value>,
    info: &ExpertInfo,
    max_templates: usize,
) -> Result<usize, MergeError> {
    let template = serde_json::to_value(build_template(key, info))?;

    let templates = record
        .entry("templates")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| MergeError::InvalidIndustry {
            industry: key.to_string(),
            reason: "templates is not a list".to_string(),
        })?;

    templates.insert(0, template);

    let evicted = templates.len().saturating_sub(max_templates);
    if evicted > 0 {
        debug!(%key, evicted, "prepend_template: truncating template list");
        templates.truncate(max_templates);
    }
    Ok(evicted)
}
