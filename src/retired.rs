//! The retirable-node contract and the intrusive lists of retired records.
//!
//! Every node managed by the reclamation engine embeds a [`Header`], which
//! provides the `next` slot used while the node is queued on a retire list,
//! a back-pointer to the node itself and storage for the deleter captured at
//! retirement. Destruction is dispatched through a single function pointer
//! monomorphized per `(node, deleter)` pair.

use core::cell::{Cell, UnsafeCell};
use core::fmt;
use core::mem::MaybeUninit;
use core::ptr::{self, NonNull};

////////////////////////////////////////////////////////////////////////////////////////////////////
// Deleter (trait)
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A callable that performs the physical destruction of a retired node.
///
/// A deleter is captured by value at the moment of retirement and invoked
/// exactly once, on exactly one thread, once the epoch safety condition for
/// the node is met. That thread is not necessarily the retiring one — the
/// garbage of an exited thread is destroyed by whichever thread adopts it —
/// so deleters must be `Send`.
pub trait Deleter<T>: Sized + Send {
    /// Destroys `node`.
    ///
    /// # Safety
    ///
    /// `node` must point at a live node that was retired with this deleter
    /// and is no longer reachable by any thread.
    unsafe fn delete(self, node: NonNull<T>);
}

/// The default [`Deleter`], which re-boxes the node and drops it.
#[derive(Copy, Clone, Debug, Default)]
pub struct BoxDeleter;

impl<T> Deleter<T> for BoxDeleter {
    #[inline]
    unsafe fn delete(self, node: NonNull<T>) {
        drop(Box::from_raw(node.as_ptr()));
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Retirable (trait)
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A node type that can be handed to the engine for deferred destruction.
///
/// Retired nodes may be destroyed on a different thread than the retiring
/// one (see [`Deleter`]), which is why retirable nodes must be `Send`.
///
/// # Safety
///
/// `header` must return a reference to a [`Header`] field embedded in `self`
/// (i.e. one that lives at a stable address inside the node for the node's
/// entire lifetime) and must always return the same field.
pub unsafe trait Retirable: Sized + Send {
    /// The deleter type applied to this node on reclamation.
    type Deleter: Deleter<Self>;

    /// Returns the node's embedded header.
    fn header(&self) -> &Header<Self, Self::Deleter>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Header
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The intrusive part of every retirable node.
///
/// While a node is live its header is inert; the engine touches it only
/// between retirement and destruction. The deleter storage occupies no space
/// for zero-sized deleter types such as [`BoxDeleter`].
#[repr(C)]
pub struct Header<T, D = BoxDeleter> {
    base: Erased,
    node: Cell<*mut T>,
    deleter: UnsafeCell<MaybeUninit<D>>,
}

/***** impl Send + Sync ***************************************************************************/

// The interior mutability is exercised only between retirement and
// destruction, during which the node is unreachable from the user data
// structure and accessed by at most one thread at a time. That thread may
// differ from the retiring one, hence the `Send` bounds.
unsafe impl<T: Send, D: Send> Send for Header<T, D> {}
unsafe impl<T: Send, D: Send> Sync for Header<T, D> {}

/***** impl inherent ******************************************************************************/

impl<T, D> Header<T, D> {
    /// Creates a new inert `Header`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            base: Erased { next: Cell::new(ptr::null_mut()), delete_self: Cell::new(None) },
            node: Cell::new(ptr::null_mut()),
            deleter: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

impl<T: Retirable> Header<T, T::Deleter> {
    /// Installs the back-pointer, the deleter and the destruction hook.
    ///
    /// # Safety
    ///
    /// `node` must be the node containing this header. Must be called at most
    /// once per retirement, before the node is linked into a retire list.
    #[inline]
    pub(crate) unsafe fn install(&self, node: *mut T, deleter: T::Deleter) {
        debug_assert!(self.base.delete_self.get().is_none(), "node retired twice");
        self.node.set(node);
        (*self.deleter.get()).write(deleter);
        self.base.delete_self.set(Some(delete_node::<T>));
    }
}

/***** impl Default *******************************************************************************/

impl<T, D> Default for Header<T, D> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/***** impl Debug *********************************************************************************/

impl<T, D> fmt::Debug for Header<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header").field("retired", &self.base.delete_self.get().is_some()).finish()
    }
}

/// Destroys the node a header belongs to by moving its deleter out and
/// applying it to the stored back-pointer.
unsafe fn delete_node<T: Retirable>(base: NonNull<Erased>) {
    let header = base.cast::<Header<T, T::Deleter>>();
    let node = header.as_ref().node.get();
    debug_assert!(!node.is_null());
    let deleter = (*header.as_ref().deleter.get()).assume_init_read();
    deleter.delete(NonNull::new_unchecked(node));
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Erased
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The type-erased prefix of every [`Header`]: the intrusive `next` link and
/// the destruction hook installed at retirement.
pub(crate) struct Erased {
    next: Cell<*mut Erased>,
    delete_self: Cell<Option<unsafe fn(NonNull<Erased>)>>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Retired
////////////////////////////////////////////////////////////////////////////////////////////////////

/// An opaque handle to a retired record, ready to be linked into a
/// [`RetireList`].
pub struct Retired(NonNull<Erased>);

/***** impl Send **********************************************************************************/

// A retired record is owned by exactly one thread (or orphan) at a time, and
// records are only ever created from `Retirable` nodes, whose bounds ensure
// that both the node and its captured deleter are `Send`.
unsafe impl Send for Retired {}

/***** impl inherent ******************************************************************************/

impl Retired {
    /// Erases `node` into a retired record.
    ///
    /// # Safety
    ///
    /// The node's destruction hook must have been installed via
    /// [`Header::install`] and the node must remain allocated until the hook
    /// runs.
    #[inline]
    pub(crate) unsafe fn new_unchecked<T: Retirable>(node: NonNull<T>) -> Self {
        let header: &Header<T, T::Deleter> = node.as_ref().header();
        debug_assert!(header.base.delete_self.get().is_some());
        Self(NonNull::from(&header.base))
    }
}

/***** impl Debug *********************************************************************************/

impl fmt::Debug for Retired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Retired").field(&self.0.as_ptr()).finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// RetireList
////////////////////////////////////////////////////////////////////////////////////////////////////

/// An intrusive singly-linked stack of retired records, threaded through the
/// records' own `next` slots.
///
/// The list is strictly thread-owned; handing a non-empty list to another
/// thread happens only through the orphan mechanism.
#[derive(Default)]
pub(crate) struct RetireList {
    head: *mut Erased,
}

/***** impl Send **********************************************************************************/

// every queued record is `Send` by construction, see `Retired`
unsafe impl Send for RetireList {}

/***** impl inherent ******************************************************************************/

impl RetireList {
    /// Creates a new empty `RetireList`.
    #[inline]
    pub const fn new() -> Self {
        Self { head: ptr::null_mut() }
    }

    /// Returns `true` if the list contains no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }

    /// Pushes `retired` at the front of the list.
    #[inline]
    pub fn push(&mut self, retired: Retired) {
        let erased = retired.0.as_ptr();
        unsafe { (*erased).next.set(self.head) };
        self.head = erased;
    }

    /// Takes the entire list, leaving an empty one behind.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self { head: core::mem::replace(&mut self.head, ptr::null_mut()) }
    }

    /// Destroys every record in the list and empties it, returning the number
    /// of destroyed records.
    ///
    /// Each record's `next` link is read *before* its destruction hook runs,
    /// since the hook frees the record's memory. The chain is detached from
    /// the list up front, so a retirement performed from within a hook lands
    /// on the (now empty) list instead of the chain being walked.
    #[inline]
    pub fn drain(&mut self) -> usize {
        let mut curr = core::mem::replace(&mut self.head, ptr::null_mut());
        let mut count = 0;

        while let Some(erased) = NonNull::new(curr) {
            unsafe {
                curr = erased.as_ref().next.get();
                erased.as_ref().next.set(ptr::null_mut());
                let delete_self = erased
                    .as_ref()
                    .delete_self
                    .take()
                    .unwrap_or_else(|| unreachable!("queued record without destruction hook"));
                delete_self(erased);
            }
            count += 1;
        }

        count
    }
}

/***** impl Drop **********************************************************************************/

impl Drop for RetireList {
    #[inline]
    fn drop(&mut self) {
        self.drain();
    }
}

/***** impl Debug *********************************************************************************/

impl fmt::Debug for RetireList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetireList").field("is_empty", &self.is_empty()).finish()
    }
}
