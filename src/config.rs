// src/config.rs
// =============================================================================
// Settings for one crawl.
//
// The CLI builds a CrawlConfig from its arguments; the library only ever
// sees this validated struct. Defaults reproduce the classic golang.org
// crawl: seed http://golang.org/, depth 4, 1.1 second idle timeout and room
// for 10 pending tasks.
// =============================================================================

use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SEED: &str = "http://golang.org/";
pub const DEFAULT_MAX_DEPTH: i64 = 4;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(1100);
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// What happens to workers still running when the idle timeout fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownMode {
    /// Abort them; their results are never reported
    #[default]
    Abandon,
    /// Wait for them to finish; links they find are not scheduled
    Drain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub seed: String,
    /// Number of link hops to follow; the seed itself needs depth >= 1
    pub max_depth: i64,
    /// The crawl ends once no task has been dequeued for this long
    pub idle_timeout: Duration,
    /// Pending tasks held before add() starts waiting
    pub queue_capacity: usize,
    pub shutdown: ShutdownMode,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            shutdown: ShutdownMode::Abandon,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid seed URL '{seed}': {reason}")]
    InvalidSeed { seed: String, reason: String },

    #[error("queue capacity must be at least 1")]
    ZeroCapacity,

    #[error("idle timeout must be greater than zero")]
    ZeroIdleTimeout,
}

impl CrawlConfig {
    /// Checks the settings that would make a crawl meaningless.
    ///
    /// The seed only has to be an absolute URL; the fixture fetcher serves
    /// any string, so no scheme is enforced here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = Url::parse(&self.seed) {
            return Err(ConfigError::InvalidSeed {
                seed: self.seed.clone(),
                reason: e.to_string(),
            });
        }

        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.idle_timeout.is_zero() {
            return Err(ConfigError::ZeroIdleTimeout);
        }

        Ok(())
    }

    /// The seed's host, if it has one
    pub fn seed_host(&self) -> Option<String> {
        Url::parse(&self.seed)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CrawlConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.seed, "http://golang.org/");
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.idle_timeout, Duration::from_millis(1100));
    }

    #[test]
    fn test_relative_seed_is_rejected() {
        let config = CrawlConfig {
            seed: "golang.org".to_string(),
            ..CrawlConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSeed { .. })));
    }

    #[test]
    fn test_zero_capacity_and_timeout_are_rejected() {
        let config = CrawlConfig {
            queue_capacity: 0,
            ..CrawlConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));

        let config = CrawlConfig {
            idle_timeout: Duration::ZERO,
            ..CrawlConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroIdleTimeout));
    }

    #[test]
    fn test_seed_host() {
        assert_eq!(CrawlConfig::default().seed_host(), Some("golang.org".to_string()));
    }
}
