//! Version stamping
//!
//! Runs once after every merge, regardless of how many experts were updated.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::{Catalog, LAST_UPDATED_KEY, OPTIMIZATION_INFO_KEY, VERSION_KEY};
use crate::error::MergeError;

/// Features recorded in the catalog's run summary
pub const RUN_FEATURES: [&str; 5] = [
    "行动型AI教练模式",
    "Context7最佳实践应用",
    "中国本土化深度优化",
    "结构化决策框架",
    "具体执行步骤指导",
];

/// Default value of `optimizationInfo.optimizedBy`
pub const DEFAULT_OPTIMIZED_BY: &str = "AI Prompt Generator";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Run summary attached to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationInfo {
    pub optimized_by: String,
    pub optimization_date: String,
    pub features: Vec<String>,
    pub expert_count: usize,
    pub backup_file: String,
}

/// Inputs to [`stamp`]
#[derive(Debug, Clone)]
pub struct StampOptions {
    pub version: String,
    pub optimized_by: String,
    pub expert_count: usize,
    /// Backup file name, without directory
    pub backup_file: String,
}

/// Overwrite version metadata and attach the run summary
pub fn stamp<Tz>(
    catalog: &mut Catalog,
    options: &StampOptions,
    now: &DateTime<Tz>,
) -> Result<OptimizationInfo, MergeError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    debug!(version = %options.version, expert_count = options.expert_count, "stamp: called");
    let info = OptimizationInfo {
        optimized_by: options.optimized_by.clone(),
        optimization_date: now.format(DATETIME_FORMAT).to_string(),
        features: RUN_FEATURES.iter().map(|s| s.to_string()).collect(),
        expert_count: options.expert_count,
        backup_file: options.backup_file.clone(),
    };

    catalog.set(VERSION_KEY, Value::from(options.version.clone()));
    catalog.set(LAST_UPDATED_KEY, Value::from(now.format(DATE_FORMAT).to_string()));
    catalog.set(OPTIMIZATION_INFO_KEY, serde_json::to_value(&info)?);
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    fn options(count: usize) -> StampOptions {
        StampOptions {
            version: crate::DEFAULT_VERSION.to_string(),
            optimized_by: DEFAULT_OPTIMIZED_BY.to_string(),
            expert_count: count,
            backup_file: "templates-2025-backup-20250301_093005.json".to_string(),
        }
    }

    #[test]
    fn test_stamp_sets_version_fields() {
        let mut catalog: Catalog =
            serde_json::from_value(json!({"version": "2025.1", "lastUpdated": "2025-01-01", "industries": {}}))
                .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 5).unwrap();

        let info = stamp(&mut catalog, &options(3), &now).unwrap();

        assert_eq!(catalog.version(), Some("2025.2-optimized"));
        assert_eq!(catalog.last_updated(), Some("2025-03-01"));
        assert_eq!(info.optimization_date, "2025-03-01 09:30:05");
        let stored = catalog.get(OPTIMIZATION_INFO_KEY).unwrap();
        assert_eq!(stored["expertCount"], 3);
        assert_eq!(stored["backupFile"], "templates-2025-backup-20250301_093005.json");
        assert_eq!(stored["features"].as_array().unwrap().len(), 5);
        assert_eq!(serde_json::from_value::<OptimizationInfo>(stored.clone()).unwrap(), info);

        let keys: Vec<&String> = stored.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            ["optimizedBy", "optimizationDate", "features", "expertCount", "backupFile"]
        );
    }

    #[test]
    fn test_stamp_runs_with_zero_updates() {
        let mut catalog = Catalog::default();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        stamp(&mut catalog, &options(0), &now).unwrap();

        assert_eq!(catalog.get(OPTIMIZATION_INFO_KEY).unwrap()["expertCount"], 0);
        assert!(catalog.version().is_some());
    }

    #[test]
    fn test_stamp_uses_local_wall_clock() {
        let mut catalog = Catalog::default();
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();

        stamp(&mut catalog, &options(1), &now).unwrap();

        assert_eq!(catalog.last_updated(), Some("2025-12-31"));
    }
}
