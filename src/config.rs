//! One-time global configuration of the reclamation scheme.

use core::cell::UnsafeCell;
use core::sync::atomic::{
    AtomicU8,
    Ordering::{Acquire, Relaxed, Release},
};

include!(concat!(env!("OUT_DIR"), "/build_constants.rs"));

const UNINIT: u8 = 0;
const BUSY: u8 = 1;
const READY: u8 = 2;

/// The one-time configuration for the process-wide default collector.
///
/// Must be initialized with [`init_once`][GlobalConfig::init_once] before the
/// default collector is first touched in order to take effect.
pub static CONFIG: GlobalConfig = GlobalConfig::new();

////////////////////////////////////////////////////////////////////////////////////////////////////
// GlobalConfig
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A one-time lock-free initialization cell for a [`Config`].
#[derive(Debug)]
pub struct GlobalConfig {
    init_state: AtomicU8,
    config: UnsafeCell<Config>,
}

/***** impl Sync **********************************************************************************/

unsafe impl Sync for GlobalConfig {}

/***** impl inherent ******************************************************************************/

impl GlobalConfig {
    /// Creates a new uninitialized [`GlobalConfig`].
    #[inline]
    pub const fn new() -> Self {
        Self { init_state: AtomicU8::new(UNINIT), config: UnsafeCell::new(Config::new()) }
    }

    /// Initializes the [`GlobalConfig`] with the given `config`, but only
    /// once; later calls have no effect.
    #[inline]
    pub fn init_once(&self, config: Config) {
        if self.init_state.compare_exchange(UNINIT, BUSY, Acquire, Relaxed).is_ok() {
            let inner = unsafe { &mut *self.config.get() };
            *inner = config;
            self.init_state.store(READY, Release);
        }
    }

    /// Reads the initialized [`Config`] or returns the default configuration,
    /// if the [`GlobalConfig`] is either not or currently in the process of
    /// being initialized.
    #[inline]
    pub(crate) fn read_config_or_default(&self) -> Config {
        if self.init_state.load(Acquire) == READY {
            unsafe { *self.config.get() }
        } else {
            Config::default()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Config
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The tuning parameters of a collector.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
    update_threshold: usize,
}

/***** impl Default *******************************************************************************/

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/***** impl inherent ******************************************************************************/

impl Config {
    /// Creates a new default [`Config`].
    ///
    /// The default update threshold is compiled in from the
    /// `EBR_UPDATE_THRESHOLD` environment variable and falls back to 100.
    #[inline]
    pub const fn new() -> Self {
        Self { update_threshold: DEFAULT_UPDATE_THRESHOLD }
    }

    /// Creates a new [`Config`] with the given update threshold.
    ///
    /// The threshold is the number of first-level critical region entries a
    /// thread performs at a stale epoch before it attempts to advance the
    /// global epoch. A threshold of 0 attempts to advance on every
    /// first-level entry.
    #[inline]
    pub const fn with_update_threshold(update_threshold: usize) -> Self {
        Self { update_threshold }
    }

    /// Returns the update threshold.
    #[inline]
    pub fn update_threshold(self) -> usize {
        self.update_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, GlobalConfig};

    #[test]
    fn init_once_is_first_writer_wins() {
        let config = GlobalConfig::new();
        assert_eq!(config.read_config_or_default(), Config::new());

        config.init_once(Config::with_update_threshold(1));
        config.init_once(Config::with_update_threshold(2));
        assert_eq!(config.read_config_or_default().update_threshold(), 1);
    }
}
