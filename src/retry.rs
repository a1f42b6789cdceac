//! Retry mechanism for catalog access
//!
//! Reading the catalog export can fail transiently (the exporter is mid-write, the
//! share is briefly unreachable). Such errors are retried with exponential backoff;
//! anything else fails the run immediately.

use crate::error::{AuditError, ErrorRecoveryConfig, Result};
use tracing::{debug, warn};

/// Retry manager that handles the retry logic with exponential backoff
#[derive(Debug, Default)]
pub struct RetryManager {
	config: ErrorRecoveryConfig,
}

impl RetryManager {
	/// Create a new retry manager with the given configuration
	pub fn new(config: ErrorRecoveryConfig) -> Self {
		Self { config }
	}

	/// Run `operation_fn` until it succeeds, fails with a non-retryable error, or the
	/// retry budget is spent
	pub async fn execute<T, F>(&self, operation_name: &str, mut operation_fn: F) -> Result<T>
	where F: FnMut() -> Result<T> {
		let mut attempt = 0;
		let start_time = std::time::Instant::now();

		loop {
			match operation_fn() {
				Ok(result) => {
					if attempt > 0 {
						debug!(
							"Operation '{}' succeeded after {} attempts in {:?}",
							operation_name,
							attempt + 1,
							start_time.elapsed()
						);
					}
					return Ok(result);
				}
				Err(error) => {
					if !error.is_retryable() {
						debug!(
							"Operation '{}' failed with non-retryable error: {}",
							operation_name, error
						);
						return Err(error);
					}

					if attempt >= self.config.max_retries {
						warn!(
							"Operation '{}' failed after {} attempts over {:?}, giving up",
							operation_name,
							attempt + 1,
							start_time.elapsed()
						);
						return Err(AuditError::RecoveryFailed {
							operation: operation_name.to_string(),
							attempts: attempt + 1,
							total_duration: start_time.elapsed(),
							last_error: error.to_string(),
						});
					}

					let delay = self.config.delay_for_attempt(attempt);
					warn!(
						"Operation '{}' failed (attempt {}), retrying in {:?}: {}",
						operation_name,
						attempt + 1,
						delay,
						error
					);

					tokio::time::sleep(delay).await;
					attempt += 1;
				}
			}
		}
	}
}

/// A builder for creating retry configurations
#[derive(Debug)]
pub struct RetryConfigBuilder {
	config: ErrorRecoveryConfig,
}

impl RetryConfigBuilder {
	/// Create a new builder with default configuration
	pub fn new() -> Self {
		Self { config: ErrorRecoveryConfig::default() }
	}

	/// Set the maximum number of retry attempts
	pub fn max_retries(mut self, max_retries: u32) -> Self {
		self.config.max_retries = max_retries;
		self
	}

	/// Set the initial retry delay
	pub fn initial_delay(mut self, delay: std::time::Duration) -> Self {
		self.config.initial_retry_delay = delay;
		self
	}

	/// Set the maximum retry delay
	pub fn max_delay(mut self, delay: std::time::Duration) -> Self {
		self.config.max_retry_delay = delay;
		self
	}

	/// Enable or disable exponential backoff
	pub fn exponential_backoff(mut self, enabled: bool) -> Self {
		self.config.exponential_backoff = enabled;
		self
	}

	/// Build the configuration
	pub fn build(self) -> ErrorRecoveryConfig {
		self.config
	}
}

impl Default for RetryConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}
