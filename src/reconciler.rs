//! Backup log reconciliation
//!
//! Reduces a container's backup log to a single compliance outcome. The log is scanned
//! once, in the order the catalog returned it, and for each of `start` and `end` the last
//! row seen wins. Nothing else about ordering is assumed: an older start appearing after
//! a newer one replaces it, exactly as a retried run's second start replaces the first.
//!
//! There is one success shape: a start and an end carrying the same `backup_id`, no
//! start older than the compliance window, and a start no later than `now`. Every other
//! combination is a failure.

use crate::events::{BackupLogEvent, EventState};
use crate::verdict::ComplianceStatus;
use chrono::{DateTime, Duration, Utc};

const START_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of reconciling one backup log
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
	pub status: ComplianceStatus,
	/// Set whenever a start row was seen, regardless of status
	pub start_time: Option<DateTime<Utc>>,
	pub duration_secs: u64,
	pub message: String,
	/// Storage location reported by the last end row
	pub location: Option<String>,
}

#[derive(Debug, Default)]
struct Mark<'a> {
	timestamp: Option<DateTime<Utc>>,
	backup_id: Option<&'a str>,
}

impl<'a> Mark<'a> {
	fn record(&mut self, event: &'a BackupLogEvent) {
		self.timestamp = Some(event.timestamp);
		// A row without an id cannot be paired with anything
		self.backup_id = Some(event.backup_id.as_str()).filter(|id| !id.is_empty());
	}
}

/// Classifies backup logs against a rolling compliance window
#[derive(Debug, Clone, Copy)]
pub struct LogReconciler {
	window: Duration,
}

impl LogReconciler {
	pub fn new(window: Duration) -> Self {
		Self { window }
	}

	pub fn reconcile(&self, events: &[BackupLogEvent], now: DateTime<Utc>) -> Reconciliation {
		let since = now - self.window;

		let mut start = Mark::default();
		let mut end = Mark::default();
		let mut location = None;
		// Sticky: one stale start taints the whole log
		let mut out_of_policy = false;

		for event in events {
			match event.state {
				EventState::Start => {
					start.record(event);
					if event.timestamp < since {
						out_of_policy = true;
					}
				}
				EventState::End => {
					end.record(event);
					location = event.location.clone();
				}
			}
		}

		let started = describe_start(start.timestamp);
		let mut duration_secs = 0;
		let (status, message) = match (start.backup_id, end.backup_id) {
			(Some(start_id), Some(end_id)) if start_id == end_id => {
				if out_of_policy {
					(
						ComplianceStatus::Failure,
						format!("Out of Policy. Last backup: {started}"),
					)
				} else if start.timestamp.is_some_and(|ts| ts > now) {
					(
						ComplianceStatus::Failure,
						format!("Clock Skew: Started in the future {started}"),
					)
				} else {
					duration_secs = match (start.timestamp, end.timestamp) {
						(Some(s), Some(e)) => (e - s).num_seconds().max(1) as u64,
						_ => 1,
					};
					(ComplianceStatus::Success, String::new())
				}
			}
			(Some(_), Some(_)) => {
				(ComplianceStatus::Failure, format!("Backup Running: Started {started}"))
			}
			_ if out_of_policy => {
				(ComplianceStatus::Failure, format!("Out of Policy. Started: {started}"))
			}
			_ => (ComplianceStatus::Failure, format!("Error: Last: {started}")),
		};

		Reconciliation {
			status,
			start_time: start.timestamp,
			duration_secs,
			message,
			location,
		}
	}
}

impl Default for LogReconciler {
	fn default() -> Self {
		Self::new(Duration::hours(24))
	}
}

fn describe_start(start: Option<DateTime<Utc>>) -> String {
	match start {
		Some(ts) => ts.format(START_FORMAT).to_string(),
		None => "None".to_string(),
	}
}
