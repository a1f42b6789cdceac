use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
	Start,
	End,
}

/// One row of a container's backup log.
///
/// A run writes a `start` row when it begins and an `end` row carrying the storage
/// location once the backup has been stored. Both rows share the same `backup_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupLogEvent {
	pub state: EventState,
	#[serde(rename = "ts")]
	pub timestamp: DateTime<Utc>,
	pub backup_id: String,
	#[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

impl BackupLogEvent {
	pub fn start(backup_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
		Self {
			state: EventState::Start,
			timestamp,
			backup_id: backup_id.into(),
			location: None,
		}
	}

	pub fn end(
		backup_id: impl Into<String>, timestamp: DateTime<Utc>, location: impl Into<String>,
	) -> Self {
		Self {
			state: EventState::End,
			timestamp,
			backup_id: backup_id.into(),
			location: Some(location.into()),
		}
	}

	pub fn is_start(&self) -> bool {
		self.state == EventState::Start
	}
}
