//! Backup metadata catalog
//!
//! The auditor only talks to the [`BackupCatalog`] trait. [`CatalogDocument`] is the
//! implementation shipped with the binary: a JSON export of the admin database holding
//! every container, its metadata and the rows of its most recent backup run.

use crate::error::{AuditError, Result};
use crate::events::BackupLogEvent;
use crate::policy::POLICY_KEY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A managed database instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
	pub id: String,
	pub name: String,
}

/// Free-form container metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo(pub HashMap<String, String>);

impl ContainerInfo {
	/// Raw declared backup frequency, if any
	pub fn backup_frequency(&self) -> Option<&str> {
		self.0.get(POLICY_KEY).map(String::as_str)
	}
}

/// Source of containers, their metadata and their backup logs
pub trait BackupCatalog {
	/// Containers currently in an active state, in catalog order
	fn active_containers(&self) -> Result<Vec<Container>>;

	fn container_info(&self, id: &str) -> Result<ContainerInfo>;

	/// Rows of the container's most recent backup run, in log emission order
	fn backup_log(&self, id: &str) -> Result<Vec<BackupLogEvent>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
	pub id: String,
	pub name: String,
	#[serde(default = "default_state")]
	pub state: String,
	#[serde(default)]
	pub info: ContainerInfo,
	#[serde(default)]
	pub backup_log: Vec<BackupLogEvent>,
}

fn default_state() -> String {
	"running".to_string()
}

impl ContainerRecord {
	pub fn is_active(&self) -> bool {
		self.state.eq_ignore_ascii_case("running") || self.state.eq_ignore_ascii_case("active")
	}
}

/// In-memory catalog, usually read from a JSON export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
	pub containers: Vec<ContainerRecord>,
}

impl CatalogDocument {
	/// Read and parse a catalog export
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path)?;
		let document: CatalogDocument = serde_json::from_str(&raw)?;
		debug!(
			"Loaded catalog {} with {} containers",
			path.display(),
			document.containers.len()
		);
		Ok(document)
	}

	fn record(&self, id: &str, operation: &str) -> Result<&ContainerRecord> {
		self.containers
			.iter()
			.find(|record| record.id == id)
			.ok_or_else(|| AuditError::catalog(operation, id, "container not found"))
	}
}

impl BackupCatalog for CatalogDocument {
	fn active_containers(&self) -> Result<Vec<Container>> {
		Ok(self
			.containers
			.iter()
			.filter(|record| record.is_active())
			.map(|record| Container { id: record.id.clone(), name: record.name.clone() })
			.collect())
	}

	fn container_info(&self, id: &str) -> Result<ContainerInfo> {
		Ok(self.record(id, "container_info")?.info.clone())
	}

	fn backup_log(&self, id: &str) -> Result<Vec<BackupLogEvent>> {
		Ok(self.record(id, "backup_log")?.backup_log.clone())
	}
}
