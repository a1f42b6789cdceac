//! Audit and publishing configuration

use crate::error::{AuditError, Result};
use chrono::{Duration, Weekday};
use std::path::PathBuf;

/// Default location of the published snapshot
pub const DEFAULT_OUTPUT_PATH: &str = "mydb_backup.prom";

/// Configuration for one audit run
#[derive(Debug, Clone)]
pub struct AuditConfig {
	/// Day on which weekly-policy containers are checked
	pub weekly_audit_day: Weekday,
	/// How far back a backup start may lie and still count as in policy
	pub compliance_window: Duration,
}

impl Default for AuditConfig {
	fn default() -> Self {
		Self {
			// Full backups run Friday night; check them Saturday morning.
			weekly_audit_day: Weekday::Sat,
			compliance_window: Duration::hours(24),
		}
	}
}

impl AuditConfig {
	/// Create a configuration auditing weekly backups on the given day
	pub fn with_weekly_audit_day(weekly_audit_day: Weekday) -> Self {
		Self { weekly_audit_day, ..Default::default() }
	}

	/// Validate the configuration and return errors if invalid
	pub fn validate(&self) -> Result<()> {
		if self.compliance_window <= Duration::zero() {
			return Err(AuditError::configuration_error(
				"compliance_window",
				"must be positive",
				"> 0s",
				&format!("{}s", self.compliance_window.num_seconds()),
			));
		}

		Ok(())
	}
}

/// Where and how the snapshot is published
#[derive(Debug, Clone)]
pub struct PublisherConfig {
	pub output_path: PathBuf,
}

impl Default for PublisherConfig {
	fn default() -> Self {
		Self { output_path: PathBuf::from(DEFAULT_OUTPUT_PATH) }
	}
}

impl PublisherConfig {
	pub fn validate(&self) -> Result<()> {
		if self.output_path.file_name().is_none() {
			return Err(AuditError::configuration_error(
				"output_path",
				"must name a file",
				"path ending in a file name",
				&self.output_path.display().to_string(),
			));
		}

		Ok(())
	}
}

/// Parse a weekday name as accepted on the command line (`sat`, `Saturday`, ...)
pub fn parse_weekday(value: &str) -> Result<Weekday> {
	value.parse::<Weekday>().map_err(|_| {
		AuditError::configuration_error("weekly_audit_day", "unknown weekday", "mon..sun", value)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = AuditConfig::default();
		assert_eq!(config.weekly_audit_day, Weekday::Sat);
		assert_eq!(config.compliance_window, Duration::hours(24));
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_invalid_window() {
		let config = AuditConfig {
			compliance_window: Duration::zero(),
			..Default::default()
		};
		let err = config.validate().unwrap_err();
		assert!(err.is_configuration_error());
	}

	#[test]
	fn test_parse_weekday() {
		assert_eq!(parse_weekday("sat").unwrap(), Weekday::Sat);
		assert_eq!(parse_weekday("Friday").unwrap(), Weekday::Fri);
		assert!(parse_weekday("someday").is_err());
	}

	#[test]
	fn test_publisher_config() {
		assert!(PublisherConfig::default().validate().is_ok());
		let config = PublisherConfig { output_path: PathBuf::from("/") };
		assert!(config.validate().is_err());
	}
}
