use std::time::Duration;
use thiserror::Error;

/// Audit error types
///
/// Only failures that prevent a snapshot from being produced live here. Per-container
/// anomalies (missing policy, stale or incomplete backups) are verdicts, not errors:
/// see [`crate::verdict::ComplianceVerdict`].
#[derive(Error, Debug)]
pub enum AuditError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON serialization error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Catalog error: {operation} failed for {container} - {cause}")]
	Catalog {
		operation: String,
		container: String,
		cause: String,
	},

	#[error(
		"Configuration error: {parameter} - {reason} (expected: {expected}, actual: {actual})"
	)]
	ConfigurationError {
		parameter: String,
		reason: String,
		expected: String,
		actual: String,
	},

	#[error("Publish error: could not write snapshot to {path} - {cause}")]
	Publish { path: String, cause: String },

	#[error("Recovery failed: {operation} after {attempts} attempts over {total_duration:?} - {last_error}")]
	RecoveryFailed {
		operation: String,
		attempts: u32,
		total_duration: Duration,
		last_error: String,
	},
}

/// Error recovery configuration
#[derive(Debug, Clone)]
pub struct ErrorRecoveryConfig {
	/// Maximum number of retry attempts for recoverable errors
	pub max_retries: u32,
	/// Initial retry delay
	pub initial_retry_delay: Duration,
	/// Maximum retry delay (for exponential backoff)
	pub max_retry_delay: Duration,
	/// Exponential backoff multiplier
	pub backoff_multiplier: f64,
	/// Whether to enable exponential backoff
	pub exponential_backoff: bool,
}

impl Default for ErrorRecoveryConfig {
	fn default() -> Self {
		Self {
			max_retries: 3,
			initial_retry_delay: Duration::from_millis(250),
			max_retry_delay: Duration::from_secs(10),
			backoff_multiplier: 2.0,
			exponential_backoff: true,
		}
	}
}

impl ErrorRecoveryConfig {
	/// Calculate the delay for a given retry attempt
	pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
		if !self.exponential_backoff {
			return self.initial_retry_delay;
		}

		let delay_ms = self.initial_retry_delay.as_millis() as f64
			* self.backoff_multiplier.powi(attempt as i32);

		let delay = Duration::from_millis(delay_ms as u64);
		std::cmp::min(delay, self.max_retry_delay)
	}
}

impl AuditError {
	/// Check if this error indicates that the operation should be retried
	pub fn is_retryable(&self) -> bool {
		match self {
			AuditError::Io(io_err) => matches!(
				io_err.kind(),
				std::io::ErrorKind::TimedOut
					| std::io::ErrorKind::ConnectionRefused
					| std::io::ErrorKind::ConnectionReset
					| std::io::ErrorKind::ConnectionAborted
					| std::io::ErrorKind::Interrupted
					| std::io::ErrorKind::WouldBlock
			),

			// A catalog that is half-written when we read it parses again fine a moment later
			AuditError::Json(json_err) => json_err.is_eof(),

			AuditError::Catalog { .. } => false,
			AuditError::ConfigurationError { .. } => false,
			AuditError::Publish { .. } => false,
			AuditError::RecoveryFailed { .. } => false,
		}
	}

	/// Check if this error is related to configuration issues
	pub fn is_configuration_error(&self) -> bool {
		matches!(self, AuditError::ConfigurationError { .. })
	}

	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			AuditError::Io(_) => "io",
			AuditError::Json(_) => "serialization",
			AuditError::Catalog { .. } => "catalog",
			AuditError::ConfigurationError { .. } => "configuration",
			AuditError::Publish { .. } => "publish",
			AuditError::RecoveryFailed { .. } => "recovery",
		}
	}

	/// Create a catalog lookup error
	pub fn catalog(operation: &str, container: &str, cause: &str) -> Self {
		AuditError::Catalog {
			operation: operation.to_string(),
			container: container.to_string(),
			cause: cause.to_string(),
		}
	}

	/// Create a configuration error
	pub fn configuration_error(
		parameter: &str, reason: &str, expected: &str, actual: &str,
	) -> Self {
		AuditError::ConfigurationError {
			parameter: parameter.to_string(),
			reason: reason.to_string(),
			expected: expected.to_string(),
			actual: actual.to_string(),
		}
	}

	/// Create a publish error
	pub fn publish(path: &std::path::Path, cause: &str) -> Self {
		AuditError::Publish {
			path: path.display().to_string(),
			cause: cause.to_string(),
		}
	}
}

pub type Result<T> = std::result::Result<T, AuditError>;
