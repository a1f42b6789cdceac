use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message recorded for containers that declare no backup policy
pub const POLICY_NOT_DEFINED: &str = "Policy not defined";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
	Success,
	Failure,
}

/// Compliance outcome for one container in one audit run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceVerdict {
	pub name: String,
	pub status: ComplianceStatus,
	pub start_time: Option<DateTime<Utc>>,
	/// Only meaningful on success, where it is at least 1
	pub duration_secs: u64,
	pub message: String,
	pub policy: String,
}

impl ComplianceVerdict {
	pub fn is_success(&self) -> bool {
		self.status == ComplianceStatus::Success
	}

	/// Start time as unix seconds, if a start event was seen
	pub fn start_epoch(&self) -> Option<i64> {
		self.start_time.map(|ts| ts.timestamp())
	}
}

/// The verdicts of a single audit run, in container iteration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
	pub run_id: Uuid,
	pub generated_at: DateTime<Utc>,
	pub verdicts: Vec<ComplianceVerdict>,
}

impl AuditReport {
	pub fn new(generated_at: DateTime<Utc>) -> Self {
		Self { run_id: Uuid::new_v4(), generated_at, verdicts: Vec::new() }
	}

	pub fn push(&mut self, verdict: ComplianceVerdict) {
		self.verdicts.push(verdict);
	}

	pub fn failures(&self) -> impl Iterator<Item = &ComplianceVerdict> {
		self.verdicts.iter().filter(|v| !v.is_success())
	}

	pub fn successes(&self) -> impl Iterator<Item = &ComplianceVerdict> {
		self.verdicts.iter().filter(|v| v.is_success())
	}

	pub fn failure_count(&self) -> usize {
		self.failures().count()
	}

	pub fn len(&self) -> usize {
		self.verdicts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.verdicts.is_empty()
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}
