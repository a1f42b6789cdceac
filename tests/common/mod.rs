//! Common test utilities for the backup-audit integration tests

#![allow(dead_code)]

use backup_audit::{BackupLogEvent, CatalogDocument, ContainerInfo, ContainerRecord};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fixed audit instant: Saturday 2026-10-17 06:00 UTC
pub fn audit_time() -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2026, 10, 17, 6, 0, 0).unwrap()
}

pub fn hours_before(hours: i64) -> DateTime<Utc> {
	audit_time() - Duration::hours(hours)
}

/// Create a temporary directory for testing
pub fn setup_temp_dir() -> TempDir {
	TempDir::new().expect("Failed to create temp directory")
}

/// A container record with an optional `BACKUP_FREQ` declaration
pub fn container(name: &str, policy: Option<&str>, log: Vec<BackupLogEvent>) -> ContainerRecord {
	let mut info = HashMap::new();
	if let Some(policy) = policy {
		info.insert("BACKUP_FREQ".to_string(), policy.to_string());
	}
	ContainerRecord {
		id: format!("id-{name}"),
		name: name.to_string(),
		state: "running".to_string(),
		info: ContainerInfo(info),
		backup_log: log,
	}
}

/// A completed run that started `started` hours and ended `ended` hours before the audit
pub fn completed_run(id: &str, started: i64, ended: i64) -> Vec<BackupLogEvent> {
	vec![
		BackupLogEvent::start(id, hours_before(started)),
		BackupLogEvent::end(id, hours_before(ended), format!("s3://mydb-backups/{id}")),
	]
}

/// Write a catalog export to disk and return its path
pub fn write_catalog(dir: &Path, catalog: &CatalogDocument) -> PathBuf {
	let path = dir.join("catalog.json");
	std::fs::write(&path, serde_json::to_string_pretty(catalog).unwrap())
		.expect("Failed to write catalog");
	path
}
