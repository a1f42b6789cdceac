//! Audit orchestration: walks the active containers and collects one verdict per
//! container that is due today.

use crate::catalog::BackupCatalog;
use crate::config::AuditConfig;
use crate::error::Result;
use crate::policy::{BackupPolicy, PolicyGate, UNDECLARED_POLICY_LABEL};
use crate::reconciler::LogReconciler;
use crate::verdict::{AuditReport, ComplianceStatus, ComplianceVerdict, POLICY_NOT_DEFINED};
use chrono::{DateTime, Datelike, Local, Utc, Weekday};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Auditor {
	gate: PolicyGate,
	reconciler: LogReconciler,
}

impl Auditor {
	pub fn new(config: &AuditConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			gate: PolicyGate::new(config.weekly_audit_day),
			reconciler: LogReconciler::new(config.compliance_window),
		})
	}

	/// Audit against the wall clock. The weekly gate follows the local calendar day.
	pub fn run_now<C>(&self, catalog: &C) -> Result<AuditReport>
	where C: BackupCatalog + ?Sized {
		self.run(catalog, Utc::now(), Local::now().weekday())
	}

	/// Audit every active container in catalog order.
	///
	/// Any catalog error aborts the whole run: a report missing some containers must
	/// never be published as if it were complete.
	pub fn run<C>(&self, catalog: &C, now: DateTime<Utc>, today: Weekday) -> Result<AuditReport>
	where C: BackupCatalog + ?Sized {
		let mut report = AuditReport::new(now);
		let mut skipped = 0usize;

		for container in catalog.active_containers()? {
			let info = catalog.container_info(&container.id)?;

			let Some(declared) = info.backup_frequency() else {
				debug!("{}: no backup policy declared", container.name);
				report.push(ComplianceVerdict {
					name: container.name,
					status: ComplianceStatus::Failure,
					start_time: None,
					duration_secs: 0,
					message: POLICY_NOT_DEFINED.to_string(),
					policy: UNDECLARED_POLICY_LABEL.to_string(),
				});
				continue;
			};

			let Some(policy) = BackupPolicy::parse(declared) else {
				warn!(
					"{} ({}): unrecognised backup policy {:?}, container not audited",
					container.name, container.id, declared
				);
				skipped += 1;
				continue;
			};

			if !self.gate.is_due(policy, today) {
				debug!("{}: {} policy not due on {}", container.name, policy, today);
				skipped += 1;
				continue;
			}

			let events = catalog.backup_log(&container.id)?;
			let outcome = self.reconciler.reconcile(&events, now);
			debug!(
				"{}: {:?} start={:?} duration={}s location={:?} {}",
				container.name,
				outcome.status,
				outcome.start_time,
				outcome.duration_secs,
				outcome.location,
				outcome.message
			);

			report.push(ComplianceVerdict {
				name: container.name,
				status: outcome.status,
				start_time: outcome.start_time,
				duration_secs: outcome.duration_secs,
				message: outcome.message,
				policy: policy.label().to_string(),
			});
		}

		info!(
			"Audit {} finished: {} audited, {} failed, {} skipped",
			report.run_id,
			report.len(),
			report.failure_count(),
			skipped
		);

		Ok(report)
	}
}

impl Default for Auditor {
	fn default() -> Self {
		Self { gate: PolicyGate::default(), reconciler: LogReconciler::default() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::{CatalogDocument, ContainerInfo, ContainerRecord};
	use crate::events::BackupLogEvent;
	use chrono::{Duration, TimeZone};
	use std::collections::HashMap;

	fn now() -> DateTime<Utc> {
		// A Saturday
		Utc.with_ymd_and_hms(2026, 10, 17, 6, 0, 0).unwrap()
	}

	fn record(id: &str, policy: Option<&str>, log: Vec<BackupLogEvent>) -> ContainerRecord {
		let mut info = HashMap::new();
		if let Some(policy) = policy {
			info.insert("BACKUP_FREQ".to_string(), policy.to_string());
		}
		ContainerRecord {
			id: id.to_string(),
			name: format!("{id}-db"),
			state: "running".to_string(),
			info: ContainerInfo(info),
			backup_log: log,
		}
	}

	fn good_log() -> Vec<BackupLogEvent> {
		vec![
			BackupLogEvent::start("b", now() - Duration::hours(2)),
			BackupLogEvent::end("b", now() - Duration::hours(1), "s3://b"),
		]
	}

	#[test]
	fn test_undeclared_policy_ignores_log() {
		let catalog = CatalogDocument { containers: vec![record("a", None, good_log())] };
		let report = Auditor::default().run(&catalog, now(), Weekday::Sat).unwrap();

		assert_eq!(report.len(), 1);
		let verdict = &report.verdicts[0];
		assert_eq!(verdict.status, ComplianceStatus::Failure);
		assert_eq!(verdict.message, "Policy not defined");
		assert_eq!(verdict.policy, "None");
		assert_eq!(verdict.start_time, None);
	}

	#[test]
	fn test_weekly_skipped_off_day() {
		let catalog = CatalogDocument {
			containers: vec![record("w", Some("Weekly"), good_log()), record("d", Some("Daily"), good_log())],
		};
		let report = Auditor::default().run(&catalog, now(), Weekday::Wed).unwrap();

		let names: Vec<&str> = report.verdicts.iter().map(|v| v.name.as_str()).collect();
		assert_eq!(names, vec!["d-db"]);
	}

	#[test]
	fn test_weekly_audited_on_audit_day() {
		let catalog = CatalogDocument { containers: vec![record("w", Some("Weekly"), good_log())] };
		let report = Auditor::default().run(&catalog, now(), Weekday::Sat).unwrap();

		assert_eq!(report.len(), 1);
		assert!(report.verdicts[0].is_success());
		assert_eq!(report.verdicts[0].policy, "Weekly");
		assert_eq!(report.verdicts[0].duration_secs, 3600);
	}

	#[test]
	fn test_unknown_policy_is_skipped() {
		let catalog = CatalogDocument { containers: vec![record("m", Some("Monthly"), good_log())] };
		let report = Auditor::default().run(&catalog, now(), Weekday::Sat).unwrap();
		assert!(report.is_empty());
	}

	#[test]
	fn test_configured_audit_day() {
		let auditor = Auditor::new(&AuditConfig::with_weekly_audit_day(Weekday::Mon)).unwrap();
		let catalog = CatalogDocument { containers: vec![record("w", Some("Weekly"), good_log())] };

		assert!(auditor.run(&catalog, now(), Weekday::Sat).unwrap().is_empty());
		assert_eq!(auditor.run(&catalog, now(), Weekday::Mon).unwrap().len(), 1);
	}

	#[test]
	fn test_invalid_config_is_rejected() {
		let config = AuditConfig { compliance_window: Duration::zero(), ..Default::default() };
		assert!(Auditor::new(&config).is_err());
	}
}
