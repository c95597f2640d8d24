//! Configuration for the session store.

use std::time::Duration;

/// Default time-to-live after the last activity (48 hours, a typical
/// shopping-session horizon).
pub const DEFAULT_TTL: Duration = Duration::from_secs(48 * 60 * 60);

/// Default warning window for the expiring-soon flag (1 hour).
pub const DEFAULT_EXPIRING_SOON_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Default interval for the sweep scheduler (5 minutes).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for session expiry bookkeeping.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Time-to-live after the last activity. A record whose
    /// `last_activity_at + ttl` has passed is not found on read and is
    /// removed by the sweep.
    pub ttl: Duration,

    /// Window before `expires_at` in which a session reports itself as
    /// expiring soon.
    pub expiring_soon_window: Duration,

    /// Interval the sweep scheduler should run at. The store itself owns
    /// no timer; the host triggers [`sweep_expired`] at this cadence.
    ///
    /// [`sweep_expired`]: crate::SessionStore::sweep_expired
    pub sweep_interval: Duration,

    /// Whether the host should run the sweep scheduler at all.
    /// If false, expired records are only dropped lazily on read paths
    /// and by explicit sweep calls.
    pub enable_sweep_task: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            expiring_soon_window: DEFAULT_EXPIRING_SOON_WINDOW,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            enable_sweep_task: true,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the expiring-soon warning window.
    pub fn with_expiring_soon_window(mut self, window: Duration) -> Self {
        self.expiring_soon_window = window;
        self
    }

    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Enable or disable the sweep scheduler.
    pub fn with_sweep_task(mut self, enabled: bool) -> Self {
        self.enable_sweep_task = enabled;
        self
    }
}
