//! Catalog and optimization source documents
//!
//! The catalog is kept as an ordered JSON object so that everything the merge
//! does not touch (unknown keys, untouched industries, existing templates)
//! round-trips verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level catalog key holding the industries
pub const INDUSTRIES_KEY: &str = "industries";

/// Top-level catalog key holding the version string
pub const VERSION_KEY: &str = "version";

/// Top-level catalog key holding the last-updated date
pub const LAST_UPDATED_KEY: &str = "lastUpdated";

/// Top-level catalog key holding the run summary
pub const OPTIMIZATION_INFO_KEY: &str = "optimizationInfo";

/// The template catalog consumed by the prompt generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    pub fn version(&self) -> Option<&str> {
        self.root.get(VERSION_KEY).and_then(Value::as_str)
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.root.get(LAST_UPDATED_KEY).and_then(Value::as_str)
    }

    /// Industry records keyed by expert key
    pub fn industries(&self) -> Option<&Map<String, Value>> {
        self.root.get(INDUSTRIES_KEY).and_then(Value::as_object)
    }

    pub fn industries_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.root.get_mut(INDUSTRIES_KEY).and_then(Value::as_object_mut)
    }

    pub fn industry(&self, key: &str) -> Option<&Value> {
        self.industries().and_then(|industries| industries.get(key))
    }

    pub fn has_industry(&self, key: &str) -> bool {
        self.industry(key).is_some()
    }

    /// Templates of an industry, if the industry exists and has a template list
    pub fn templates(&self, key: &str) -> Option<&Vec<Value>> {
        self.industry(key)
            .and_then(|industry| industry.get("templates"))
            .and_then(Value::as_array)
    }

    /// Set a top-level field, keeping its position if it already exists
    pub fn set(&mut self, key: &str, value: Value) {
        self.root.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

/// The optimizer output holding per-expert prompt definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSource {
    /// Expert entries keyed by expert key, decoded lazily per expert
    pub experts: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptimizationSource {
    pub fn expert(&self, key: &str) -> Option<&Value> {
        self.experts.get(key)
    }
}
