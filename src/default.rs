//! The process-wide default collector and the thread-local access to it.

use std::ptr;
use std::sync::atomic::Ordering::{AcqRel, Acquire};
use std::sync::atomic::{AtomicPtr, Ordering};

use crate::config::CONFIG;
use crate::epoch::Epoch;
use crate::global::Collector;
use crate::guard::Guard;
use crate::local::{Local, LocalAccess};
use crate::marked::AtomicMarkedPtr;
use crate::retired::Retired;

thread_local!(static LOCAL: Local = default_collector().register());

/// Returns the process-wide default [`Collector`], creating it on first use.
///
/// The collector is configured from [`CONFIG`], so any call to
/// [`CONFIG.init_once`][crate::GlobalConfig::init_once] must precede the
/// first touch of the default collector.
#[inline]
pub fn default_collector() -> &'static Collector {
    static COLLECTOR: AtomicPtr<Collector> = AtomicPtr::new(ptr::null_mut());

    let collector = COLLECTOR.load(Acquire);
    if !collector.is_null() {
        return unsafe { &*collector };
    }

    let created = Box::into_raw(Box::new(Collector::with_config(CONFIG.read_config_or_default())));
    match COLLECTOR.compare_exchange(ptr::null_mut(), created, AcqRel, Acquire) {
        Ok(_) => unsafe { &*created },
        Err(existing) => {
            // lost the race, another thread's collector is already in place
            drop(unsafe { Box::from_raw(created) });
            unsafe { &*existing }
        }
    }
}

/// Returns `true` if the current thread is active within the default
/// collector, i.e. has at least one live non-null [`Guard`] in some scope.
#[inline]
pub fn is_thread_active() -> bool {
    LOCAL.with(|local| local.is_active())
}

/// Acquires a guard for `src` within the default collector, without having to
/// construct the guard beforehand.
#[inline]
pub fn acquire_guard<T, const N: usize>(
    src: &AtomicMarkedPtr<T, N>,
    order: Ordering,
) -> Guard<T, DefaultAccess, N> {
    let mut guard = Guard::new();
    guard.acquire(src, order);
    guard
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Guard
////////////////////////////////////////////////////////////////////////////////////////////////////

impl<T, const N: usize> Guard<T, DefaultAccess, N> {
    /// Creates a new null guard bound to the default collector.
    #[inline]
    pub fn new() -> Self {
        Self::with_access(DefaultAccess)
    }
}

impl<T, const N: usize> Default for Guard<T, DefaultAccess, N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// DefaultAccess
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Access to the default collector's thread-local state.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultAccess;

/***** impl LocalAccess ***************************************************************************/

impl LocalAccess for DefaultAccess {
    #[inline]
    fn enter_critical(self) {
        LOCAL.with(|local| local.enter_critical());
    }

    #[inline]
    fn leave_critical(self) {
        LOCAL.with(|local| local.leave_critical());
    }

    #[inline]
    fn retire_record(self, record: Retired) {
        LOCAL.with(move |local| local.retire_record(record));
    }

    #[inline]
    fn current_local_epoch(self) -> Epoch {
        LOCAL.with(|local| local.current_local_epoch())
    }
}
