//! Audit scheduled database backups and publish the result as a Prometheus snapshot.

pub mod auditor;
pub mod catalog;
pub mod config;
mod error;
pub mod events;
pub mod metrics;
pub mod policy;
pub mod publish;
pub mod reconciler;
pub mod retry;
pub mod verdict;

pub use auditor::Auditor;
pub use catalog::{BackupCatalog, CatalogDocument, Container, ContainerInfo, ContainerRecord};
pub use config::{AuditConfig, PublisherConfig};
pub use error::{AuditError, ErrorRecoveryConfig, Result};
pub use events::{BackupLogEvent, EventState};
pub use metrics::MetricsFormatter;
pub use policy::{BackupPolicy, PolicyGate};
pub use publish::SnapshotPublisher;
pub use reconciler::{LogReconciler, Reconciliation};
pub use retry::{RetryConfigBuilder, RetryManager};
pub use verdict::{AuditReport, ComplianceStatus, ComplianceVerdict};
