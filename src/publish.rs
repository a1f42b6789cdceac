//! Atomic publishing of the metrics snapshot
//!
//! The snapshot is rendered into a temporary file next to the target and renamed over
//! it, so a scraper reading the target only ever sees a complete previous or complete
//! new snapshot.

use crate::config::PublisherConfig;
use crate::error::{AuditError, Result};
use crate::metrics::MetricsFormatter;
use crate::verdict::AuditReport;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SnapshotPublisher {
	config: PublisherConfig,
	formatter: MetricsFormatter,
}

impl SnapshotPublisher {
	pub fn new(config: PublisherConfig, formatter: MetricsFormatter) -> Result<Self> {
		config.validate()?;
		Ok(Self { config, formatter })
	}

	pub fn output_path(&self) -> &Path {
		&self.config.output_path
	}

	pub fn publish(&self, report: &AuditReport) -> Result<PathBuf> {
		let target = &self.config.output_path;
		let dir = match target.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};

		let mut staged = NamedTempFile::new_in(dir)?;
		{
			let mut writer = BufWriter::new(staged.as_file_mut());
			self.formatter.render(report, &mut writer)?;
			writer.flush()?;
		}
		staged.as_file().sync_all()?;
		make_world_readable(staged.path())?;

		staged
			.persist(target)
			.map_err(|e| AuditError::publish(target, &e.error.to_string()))?;

		info!(
			"Published snapshot {} ({} verdicts, {} failures)",
			target.display(),
			report.len(),
			report.failure_count()
		);
		Ok(target.clone())
	}
}

// Temporary files are created 0600; the scraper usually runs as another user.
#[cfg(unix)]
fn make_world_readable(path: &Path) -> Result<()> {
	use std::os::unix::fs::PermissionsExt;
	std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
	Ok(())
}

#[cfg(not(unix))]
fn make_world_readable(_path: &Path) -> Result<()> {
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;

	#[test]
	fn test_publish_replaces_target() {
		let dir = tempfile::tempdir().unwrap();
		let target = dir.path().join("mydb_backup.prom");
		std::fs::write(&target, "stale").unwrap();

		let publisher = SnapshotPublisher::new(
			PublisherConfig { output_path: target.clone() },
			MetricsFormatter::default(),
		)
		.unwrap();
		assert_eq!(publisher.output_path(), target.as_path());
		let written = publisher.publish(&AuditReport::new(Utc::now())).unwrap();

		assert_eq!(written, target);
		let text = std::fs::read_to_string(&target).unwrap();
		assert!(text.starts_with("# TYPE mydb_backup_report_date gauge\n"));
		assert!(!text.contains("stale"));

		// Only the published file remains; the staging file was renamed away.
		assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
	}

	#[test]
	fn test_publish_into_missing_directory_fails() {
		let dir = tempfile::tempdir().unwrap();
		let target = dir.path().join("absent").join("mydb_backup.prom");
		let publisher = SnapshotPublisher::new(
			PublisherConfig { output_path: target.clone() },
			MetricsFormatter::default(),
		)
		.unwrap();

		assert!(publisher.publish(&AuditReport::new(Utc::now())).is_err());
		assert!(!target.exists());
	}

	#[cfg(unix)]
	#[test]
	fn test_published_file_is_readable() {
		use std::os::unix::fs::PermissionsExt;

		let dir = tempfile::tempdir().unwrap();
		let target = dir.path().join("snapshot.prom");
		let publisher = SnapshotPublisher::new(
			PublisherConfig { output_path: target.clone() },
			MetricsFormatter::default(),
		)
		.unwrap();
		publisher.publish(&AuditReport::new(Utc::now())).unwrap();

		let mode = std::fs::metadata(&target).unwrap().permissions().mode();
		assert_eq!(mode & 0o777, 0o644);
	}
}
