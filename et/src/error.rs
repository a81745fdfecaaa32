//! Merge error types

use thiserror::Error;

/// Errors that abort a merge
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Expert '{expert}' has an incomplete optimization record: {source}")]
    InvalidExpert {
        expert: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Industry '{industry}' is malformed: {reason}")]
    InvalidIndustry { industry: String, reason: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
