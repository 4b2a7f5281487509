//! Ownership cell for resources that carry their own cleanup hooks.
//!
//! Instead of binding a closure, a resource type implements
//! [`ReleaseHooks`] and a [`ManagedCell`] invokes the two hooks by
//! composition on the first release. This replaces the inheritance-based
//! "resource base class" shape: the cell is parameterized over "a thing
//! with these two hooks" and nothing else.

use std::any;
use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::state::{CellState, Slot};
use crate::tracking;

/// Cleanup hooks a managed resource exposes to its cell.
///
/// On the first release the cell calls [`release_managed`] and then
/// [`release_unmanaged`], each exactly once, and drops the resource after
/// both return. Either hook may be left as its default no-op; implement
/// only the phases the resource needs.
///
/// The split mirrors the usual two-phase teardown of composite resources:
/// `release_managed` for owned sub-objects that know how to clean
/// themselves up, `release_unmanaged` for raw handles the resource holds
/// directly.
///
/// [`release_managed`]: ReleaseHooks::release_managed
/// [`release_unmanaged`]: ReleaseHooks::release_unmanaged
pub trait ReleaseHooks {
    /// First release phase. Default: no-op.
    fn release_managed(&mut self) {}

    /// Second release phase, after [`release_managed`]. Default: no-op.
    ///
    /// [`release_managed`]: ReleaseHooks::release_managed
    fn release_unmanaged(&mut self) {}
}

/// A cell owning a resource that implements [`ReleaseHooks`].
///
/// Same state machine and guard surface as
/// [`ReleasableCell`](crate::ReleasableCell); only the shape of the
/// release action differs. A type that wraps a `ManagedCell` should call
/// [`ensure_not_moved`](ManagedCell::ensure_not_moved) /
/// [`ensure_not_released`](ManagedCell::ensure_not_released) (or just
/// [`peek_mut`](ManagedCell::peek_mut)) at the top of every
/// resource-touching method to get the same failure behavior as the
/// cell's own accessors.
///
/// # Examples
///
/// ```
/// use handoff::{ManagedCell, ReleaseHooks, Result};
///
/// struct Connection {
///     live: bool,
/// }
///
/// impl ReleaseHooks for Connection {
///     fn release_managed(&mut self) {
///         self.live = false;
///     }
/// }
///
/// struct Session {
///     conn: ManagedCell<Connection>,
/// }
///
/// impl Session {
///     fn is_live(&self) -> Result<bool> {
///         self.conn.ensure_not_moved()?;
///         self.conn.ensure_not_released()?;
///         Ok(self.conn.peek()?.live)
///     }
/// }
///
/// let mut session = Session {
///     conn: ManagedCell::new(Connection { live: true }),
/// };
/// assert!(session.is_live().unwrap());
///
/// session.conn.release();
/// assert!(session.is_live().unwrap_err().is_released());
/// ```
pub struct ManagedCell<R: ReleaseHooks> {
    slot: Slot<R>,
}

impl<R: ReleaseHooks> ManagedCell<R> {
    /// Create a cell owning `resource`.
    pub fn new(resource: R) -> Self {
        tracking::record_created();
        ManagedCell {
            slot: Slot::new(resource),
        }
    }

    /// Create a cell from an optional resource.
    ///
    /// Fails with [`Error::MissingValue`](crate::Error::MissingValue) when
    /// the resource is absent.
    pub fn from_option(resource: Option<R>) -> Result<Self> {
        let slot = Slot::from_option(resource)?;
        tracking::record_created();
        Ok(ManagedCell { slot })
    }

    /// Borrow the held resource.
    pub fn peek(&self) -> Result<&R> {
        self.slot.peek()
    }

    /// Mutably borrow the held resource.
    pub fn peek_mut(&mut self) -> Result<&mut R> {
        self.slot.peek_mut()
    }

    /// Transfer ownership of the resource to the caller.
    ///
    /// The hooks do not run; the caller takes over the release
    /// obligation, typically by re-wrapping the resource in a new cell.
    pub fn transfer(&mut self) -> Result<R> {
        let resource = self.slot.transfer()?;
        tracking::record_settled();
        Ok(resource)
    }

    /// Non-failing transfer: `None` once the resource is gone.
    pub fn try_transfer(&mut self) -> Option<R> {
        self.transfer().ok()
    }

    /// Release the resource through its hooks.
    ///
    /// On the first call from the owned state this runs
    /// [`ReleaseHooks::release_managed`], then
    /// [`ReleaseHooks::release_unmanaged`], then drops the resource. Any
    /// later call, and any call after a transfer, is a silent no-op.
    pub fn release(&mut self) {
        if let Some(mut resource) = self.slot.begin_release() {
            tracking::record_settled();
            resource.release_managed();
            resource.release_unmanaged();
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CellState {
        self.slot.state()
    }

    /// Check if the cell still holds its resource.
    pub fn is_owned(&self) -> bool {
        self.slot.state().is_owned()
    }

    /// Check if the resource was transferred out.
    pub fn is_moved(&self) -> bool {
        self.slot.state().is_moved()
    }

    /// Check if the hooks ran.
    pub fn is_released(&self) -> bool {
        self.slot.state().is_released()
    }

    /// Guard: fail with [`Error::Moved`](crate::Error::Moved) after a
    /// transfer. Pure validation, no side effects.
    pub fn ensure_not_moved(&self) -> Result<()> {
        self.slot.ensure_not_moved()
    }

    /// Guard: fail with [`Error::Released`](crate::Error::Released) after
    /// a release. Pure validation, no side effects.
    pub fn ensure_not_released(&self) -> Result<()> {
        self.slot.ensure_not_released()
    }
}

impl<R: ReleaseHooks> Drop for ManagedCell<R> {
    fn drop(&mut self) {
        if self.slot.state().is_owned() {
            debug!(
                "releasing still-owned managed cell of {} on drop",
                any::type_name::<R>()
            );
            self.release();
        }
    }
}

impl<R: ReleaseHooks> fmt::Debug for ManagedCell<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedCell")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
