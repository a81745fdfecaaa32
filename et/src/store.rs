//! JSON file persistence: loading, backup naming and writing

use chrono::{DateTime, TimeZone};
use eyre::{Context, Result, eyre};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Read and decode a UTF-8 JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(?path, "load_json: called");
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content).context(format!("Invalid JSON in {}", path.display()))?;
    Ok(value)
}

/// Render a value as 2-space indented JSON with non-ASCII kept verbatim
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}

/// Backup location for a catalog: `<dir>/<stem>-backup-<YYYYMMDD_HHMMSS>.json`
pub fn backup_path<Tz>(catalog_path: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stem = catalog_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| eyre!("Catalog path has no file name: {}", catalog_path.display()))?;
    let name = format!("{}-backup-{}.json", stem, now.format(BACKUP_TIMESTAMP_FORMAT));

    Ok(match catalog_path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    })
}

/// Write a value as pretty JSON, overwriting whatever is at `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    debug!(?path, "write_json: called");
    let content = to_pretty_json(value)?;
    fs::write(path, content).context(format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write a value as pretty JSON through a temporary file in the same
/// directory, then rename it over `path`
///
/// An existing target keeps its permissions, and a symlinked target is
/// replaced at the link's destination so the link survives.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    debug!(?path, "write_json_atomic: called");
    let content = to_pretty_json(value)?;

    let target = if path.exists() {
        fs::canonicalize(path).context(format!("Failed to resolve {}", path.display()))?
    } else {
        path.to_path_buf()
    };
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .context(format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .context(format!("Failed to write temporary file for {}", path.display()))?;
    if let Ok(meta) = fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .context(format!("Failed to copy permissions of {}", target.display()))?;
    }
    tmp.as_file().sync_all().context("Failed to sync temporary file")?;
    tmp.persist(&target)
        .map_err(|e| e.error)
        .context(format!("Failed to replace {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_embeds_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 5).unwrap();
        let path = backup_path(Path::new("/srv/app/data/templates-2025.json"), &now).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/srv/app/data/templates-2025-backup-20250301_093005.json")
        );
    }

    #[test]
    fn test_backup_path_relative_catalog() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let path = backup_path(Path::new("catalog.json"), &now).unwrap();
        assert_eq!(path, PathBuf::from("catalog-backup-20250301_000000.json"));
    }

    #[test]
    fn test_write_keeps_non_ascii_and_two_space_indent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");

        write_json(&path, &json!({"name": "律师", "tags": ["合同"]})).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"name\": \"律师\""));
        assert!(content.contains("\n  \"tags\""));
        assert!(!content.contains("\\u"));
    }

    #[test]
    fn test_write_atomic_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        fs::write(&path, "{\"version\": 1}").unwrap();

        write_json_atomic(&path, &json!({"version": 2})).unwrap();

        let value: Value = load_json(&path).unwrap();
        assert_eq!(value["version"], 2);
        let leftovers = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_json_atomic(&path, &json!({"version": 2})).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_symlink() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real.json");
        let link = temp.path().join("catalog.json");
        fs::write(&real, "{}").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_json_atomic(&link, &json!({"version": 2})).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let value: Value = load_json(&real).unwrap();
        assert_eq!(value["version"], 2);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let result: Result<Value> = load_json(&temp.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_json::<Value>(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid JSON"));
    }
}
