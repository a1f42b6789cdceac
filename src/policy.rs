//! Backup policy and the gate that decides whether a container is audited today

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata key a container uses to declare its backup cadence
pub const POLICY_KEY: &str = "BACKUP_FREQ";

/// Label reported for containers that declare no policy
pub const UNDECLARED_POLICY_LABEL: &str = "None";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BackupPolicy {
	Daily,
	Weekly,
}

impl BackupPolicy {
	/// Parse a declared `BACKUP_FREQ` value. Matching is exact: `"daily"` is not a policy.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"Daily" => Some(BackupPolicy::Daily),
			"Weekly" => Some(BackupPolicy::Weekly),
			_ => None,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			BackupPolicy::Daily => "Daily",
			BackupPolicy::Weekly => "Weekly",
		}
	}
}

impl fmt::Display for BackupPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Decides which containers must be checked on a given day.
///
/// Weekly backups are audited the morning after they run, so the gate opens on
/// `weekly_audit_day` rather than on the backup day itself.
#[derive(Debug, Clone, Copy)]
pub struct PolicyGate {
	weekly_audit_day: Weekday,
}

impl PolicyGate {
	pub fn new(weekly_audit_day: Weekday) -> Self {
		Self { weekly_audit_day }
	}

	pub fn weekly_audit_day(&self) -> Weekday {
		self.weekly_audit_day
	}

	pub fn is_due(&self, policy: BackupPolicy, today: Weekday) -> bool {
		match policy {
			BackupPolicy::Daily => true,
			BackupPolicy::Weekly => today == self.weekly_audit_day,
		}
	}
}

impl Default for PolicyGate {
	fn default() -> Self {
		Self::new(Weekday::Sat)
	}
}
