//! Lock timing configuration
//!
//! ```toml
//! [lock]
//! ttl_minutes = 10
//! renew_interval_minutes = 5
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lock lifetime without renewal
pub const DEFAULT_TTL_MINUTES: u32 = 10;

/// Default renewal period while a lock is held
pub const DEFAULT_RENEW_INTERVAL_MINUTES: u32 = 5;

/// Timing of lock expiry and renewal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Minutes a lock lives past its last acquisition or renewal
    pub ttl_minutes: u32,
    /// Minutes between background renewals
    pub renew_interval_minutes: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TTL_MINUTES,
            renew_interval_minutes: DEFAULT_RENEW_INTERVAL_MINUTES,
        }
    }
}

impl LockConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.ttl_minutes))
    }

    pub fn renew_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.renew_interval_minutes) * 60)
    }

    /// A renewal must land before the lock it renews expires
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_minutes == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.renew_interval_minutes == 0 {
            return Err(ConfigError::ZeroRenewInterval);
        }
        if self.renew_interval_minutes >= self.ttl_minutes {
            return Err(ConfigError::RenewalTooSlow {
                renew: self.renew_interval_minutes,
                ttl: self.ttl_minutes,
            });
        }
        Ok(())
    }
}

/// Invalid lock configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("lock ttl must be positive")]
    ZeroTtl,

    #[error("lock renew interval must be positive")]
    ZeroRenewInterval,

    #[error("renew interval ({renew} min) must be shorter than the lock ttl ({ttl} min)")]
    RenewalTooSlow { renew: u32, ttl: u32 },
}
