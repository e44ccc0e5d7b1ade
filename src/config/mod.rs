//! Configuration for claimscan pipelines
//!
//! Controls the validation stage's concurrency ceiling and retry policy.
//! Configuration is held by the per-run [`Pipeline`](crate::pipeline::Pipeline)
//! context; there is no process-wide state.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use claimscan::ClaimscanConfig;
//!
//! // 10 concurrent receipt fetches, bounded retry with backoff
//! let config = ClaimscanConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use claimscan::{ClaimscanConfigBuilder, RetryConfig};
//! use std::time::Duration;
//!
//! let config = ClaimscanConfigBuilder::with_defaults()
//!     .validator_concurrency(4)
//!     .retry(RetryConfig {
//!         max_retries: 5,
//!         base_delay: Duration::from_millis(200),
//!         max_delay: Duration::from_secs(60),
//!     })
//!     .build();
//! ```

use std::time::Duration;

/// Default number of receipt fetches in flight during validation.
const DEFAULT_VALIDATOR_CONCURRENCY: usize = 10;
/// Default maximum number of retry attempts per receipt fetch.
const DEFAULT_MAX_RETRIES: u32 = 8;
/// Default base delay for exponential backoff (300ms).
const DEFAULT_BASE_DELAY_MS: u64 = 300;
/// Default maximum delay between retries (30 seconds).
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// Configuration for claimscan operations
///
/// Use [`ClaimscanConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct ClaimscanConfig {
    /// Maximum number of concurrent receipt fetches during validation.
    /// Default: 10
    pub validator_concurrency: usize,

    /// Retry policy for per-event receipt fetches.
    pub retry: RetryConfig,
}

/// Retry policy with exponential backoff.
///
/// The delay for attempt `n` is `min(base_delay * 2^n, max_delay)`. Attempts
/// are bounded: a receipt fetch that fails `max_retries + 1` times surfaces
/// as [`ValidationError::RetriesExhausted`](crate::errors::ValidationError)
/// instead of blocking the pipeline forever.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial request).
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// Calculates the backoff duration for a given attempt.
    ///
    /// Uses exponential backoff: `min(base_delay * 2^attempt, max_delay)`,
    /// saturating rather than overflowing for large attempt numbers.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt);
        let delay_ms = self.base_delay.as_millis().saturating_mul(multiplier as u128);
        let capped_delay_ms = delay_ms.min(self.max_delay.as_millis()) as u64;
        Duration::from_millis(capped_delay_ms)
    }
}

impl Default for ClaimscanConfig {
    fn default() -> Self {
        Self {
            validator_concurrency: DEFAULT_VALIDATOR_CONCURRENCY,
            retry: RetryConfig::default(),
        }
    }
}

/// Builder for [`ClaimscanConfig`]
///
/// # Example
///
/// ```rust
/// use claimscan::ClaimscanConfigBuilder;
///
/// let config = ClaimscanConfigBuilder::with_defaults()
///     .validator_concurrency(20)
///     .max_retries(3)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClaimscanConfigBuilder {
    config: ClaimscanConfig,
}

impl ClaimscanConfigBuilder {
    /// Creates a builder seeded with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: ClaimscanConfig::default(),
        }
    }

    /// Sets the maximum number of concurrent receipt fetches.
    ///
    /// # Panics
    ///
    /// Panics if `concurrency` is zero; a zero-width pool cannot make
    /// progress.
    pub fn validator_concurrency(mut self, concurrency: usize) -> Self {
        assert!(concurrency > 0, "validator concurrency must be positive");
        self.config.validator_concurrency = concurrency;
        self
    }

    /// Replaces the full retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Sets the maximum number of retry attempts per receipt fetch.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.retry.max_retries = max_retries;
        self
    }

    /// Sets the base delay for exponential backoff.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.retry.base_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.retry.max_delay = delay;
        self
    }

    /// Builds the configured [`ClaimscanConfig`].
    pub fn build(self) -> ClaimscanConfig {
        self.config
    }
}
