//! The shared state of one collector instance and its user-facing handle.

use std::fmt;
use std::sync::Arc;

use crate::abandoned::AbandonedQueue;
use crate::config::Config;
use crate::epoch::{AtomicEpoch, Epoch, ThreadControlBlock};
use crate::list::ThreadBlockList;
use crate::local::Local;
#[cfg(feature = "tracking")]
use crate::tracker::{AllocationTracker, ReclamationStats};

////////////////////////////////////////////////////////////////////////////////////////////////////
// Global
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The process-visible state shared by all threads participating in one
/// collector instance.
pub(crate) struct Global {
    /// The global epoch counter, advanced modulo the number of generations.
    pub epoch: AtomicEpoch,
    /// The registry of all threads that ever participated.
    pub threads: ThreadBlockList<ThreadControlBlock>,
    /// The retire lists abandoned by exited threads.
    pub abandoned: AbandonedQueue,
    /// The configuration fixed at collector creation.
    pub config: Config,
    #[cfg(feature = "tracking")]
    pub tracker: AllocationTracker,
}

/***** impl inherent ******************************************************************************/

impl Global {
    #[inline]
    pub fn new(config: Config) -> Self {
        Self {
            epoch: AtomicEpoch::new(Epoch::ZERO),
            threads: ThreadBlockList::new(),
            abandoned: AbandonedQueue::new(),
            config,
            #[cfg(feature = "tracking")]
            tracker: AllocationTracker::default(),
        }
    }
}

/***** impl Debug *********************************************************************************/

impl fmt::Debug for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Global")
            .field("epoch", &self.epoch)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Collector
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A handle to an epoch-based reclamation instance.
///
/// Distinct collectors share no state whatsoever: each has its own global
/// epoch, thread registry and orphan queue. Cloning a collector yields
/// another handle to the same instance. When the last handle (including all
/// [`Local`]s registered through it) is dropped, every record still awaiting
/// destruction is reclaimed.
#[derive(Clone, Debug)]
pub struct Collector {
    global: Arc<Global>,
}

/***** impl inherent ******************************************************************************/

impl Collector {
    /// Creates a new collector with the default [`Config`].
    #[inline]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new collector with the given `config`.
    #[inline]
    pub fn with_config(config: Config) -> Self {
        Self { global: Arc::new(Global::new(config)) }
    }

    /// Registers the calling thread with this collector, returning its
    /// thread-local state.
    #[inline]
    pub fn register(&self) -> Local {
        Local::with_global(Arc::clone(&self.global))
    }

    /// Returns a snapshot of this collector's reclamation counters.
    #[cfg(feature = "tracking")]
    #[inline]
    pub fn reclamation_stats(&self) -> ReclamationStats {
        self.global.tracker.stats()
    }
}

/***** impl Default *******************************************************************************/

impl Default for Collector {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
