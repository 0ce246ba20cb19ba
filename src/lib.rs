//! An epoch-based memory reclamation engine for lock-free data structures.
//!
//! Lock-free data structures built out of [`AtomicMarkedPtr`] fields face the
//! reclamation problem: a node unlinked by one thread may still be read by
//! another. This crate defers the physical destruction of such nodes until no
//! thread can possibly hold a reference to them anymore, without per-access
//! reference counting: threads declare *critical regions* by holding
//! [`Guard`]s, a global epoch counter cycles through three generations and a
//! retired node is destroyed only after the epoch has advanced twice past the
//! generation it was retired in.
//!
//! Node types opt in by embedding a [`Header`] and implementing
//! [`Retirable`]; retirement happens through [`Guard::reclaim`], optionally
//! with a stateful [`Deleter`]. Threads exiting with unreclaimed garbage hand
//! it over to the surviving threads, so nothing is ever leaked while the
//! collector lives.
//!
//! Most users go through the process-wide default collector; independent
//! [`Collector`] instances (each with their own epoch and thread registry)
//! are available for tests and special setups.
//!
//! # Examples
//!
//! ```
//! use std::sync::atomic::Ordering::{Acquire, Release};
//!
//! use ebr::{AtomicMarkedPtr, BoxDeleter, Guard, Header, MarkedPtr, Retirable};
//!
//! struct Node {
//!     header: Header<Node>,
//!     value: u64,
//! }
//!
//! unsafe impl Retirable for Node {
//!     type Deleter = BoxDeleter;
//!
//!     fn header(&self) -> &Header<Node> {
//!         &self.header
//!     }
//! }
//!
//! let slot: AtomicMarkedPtr<Node, 0> = AtomicMarkedPtr::null();
//! let node = Box::into_raw(Box::new(Node { header: Header::new(), value: 42 }));
//! slot.store(MarkedPtr::new(node), Release);
//!
//! let mut guard = Guard::new();
//! guard.acquire(&slot, Acquire);
//! assert_eq!(unsafe { guard.deref().value }, 42);
//!
//! // unlink the node, then hand it to the engine for deferred destruction
//! slot.store(MarkedPtr::null(), Release);
//! unsafe { guard.reclaim() };
//! assert!(guard.is_null());
//! ```

#![warn(missing_docs)]

pub use crate::config::{Config, GlobalConfig, CONFIG};
pub use crate::default::{acquire_guard, default_collector, is_thread_active, DefaultAccess};
pub use crate::epoch::Epoch;
pub use crate::global::Collector;
pub use crate::guard::Guard;
pub use crate::local::{Local, LocalAccess};
pub use crate::marked::{AtomicMarkedPtr, MarkedPtr};
pub use crate::retired::{BoxDeleter, Deleter, Header, Retirable, Retired};
#[cfg(feature = "tracking")]
pub use crate::tracker::ReclamationStats;

mod abandoned;
mod config;
mod default;
mod epoch;
mod global;
mod guard;
mod list;
mod local;
mod marked;
mod retired;
#[cfg(feature = "tracking")]
mod tracker;

/// A [`Guard`] bound to the default collector.
pub type DefaultGuard<T, const N: usize> = Guard<T, DefaultAccess, N>;
