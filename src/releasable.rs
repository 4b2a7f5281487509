//! Ownership cell with a bound release action.
//!
//! [`ReleasableCell`] pairs a resource with the operation that reclaims
//! it (close, unmap, return-to-pool). The action is bound at construction
//! and runs at most once, on exactly the value the cell holds at the
//! moment of release — never on a value that was already transferred out.

use std::any;
use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::state::{CellState, Slot};
use crate::tracking;

/// A cell owning a resource together with its release action.
///
/// Exactly one of two things happens to the resource over the cell's
/// lifetime: it is transferred to a new owner, or the release action
/// consumes it. Release is deliberately callable from any cleanup path,
/// any number of times — after the first terminal transition it is a
/// silent no-op, never an error.
///
/// Dropping a still-owned cell performs the release, so a scope exit
/// cannot strand the resource.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use handoff::ReleasableCell;
///
/// static CLOSED: AtomicUsize = AtomicUsize::new(0);
///
/// let mut cell = ReleasableCell::new("conn-4", |_conn| {
///     CLOSED.fetch_add(1, Ordering::SeqCst);
/// });
///
/// cell.release();
/// cell.release(); // no-op: the action already ran
/// assert_eq!(CLOSED.load(Ordering::SeqCst), 1);
/// assert!(cell.is_released());
/// ```
///
/// Transfer and release exclude each other:
///
/// ```
/// use handoff::ReleasableCell;
///
/// let mut cell = ReleasableCell::new(vec![1u8, 2, 3], |buffer| drop(buffer));
/// let buffer = cell.transfer().unwrap();
///
/// // The action never runs: ownership already left the cell.
/// cell.release();
/// assert_eq!(buffer, vec![1, 2, 3]);
/// ```
pub struct ReleasableCell<T, F: FnOnce(T)> {
    slot: Slot<T>,
    action: Option<F>,
}

impl<T, F: FnOnce(T)> ReleasableCell<T, F> {
    /// Create a cell owning `value`, with `action` bound as its release
    /// operation.
    pub fn new(value: T, action: F) -> Self {
        tracking::record_created();
        ReleasableCell {
            slot: Slot::new(value),
            action: Some(action),
        }
    }

    /// Create a cell from an optional value.
    ///
    /// Fails with [`Error::MissingValue`](crate::Error::MissingValue) when
    /// the value is absent. The action is discarded unused in that case;
    /// it only ever runs on a value the cell actually held.
    pub fn from_option(value: Option<T>, action: F) -> Result<Self> {
        let slot = Slot::from_option(value)?;
        tracking::record_created();
        Ok(ReleasableCell {
            slot,
            action: Some(action),
        })
    }

    /// Borrow the held resource.
    ///
    /// Read-only and repeatable while the cell is owned; fails with
    /// [`Error::Moved`](crate::Error::Moved) or
    /// [`Error::Released`](crate::Error::Released) by state afterwards.
    pub fn peek(&self) -> Result<&T> {
        self.slot.peek()
    }

    /// Mutably borrow the held resource.
    pub fn peek_mut(&mut self) -> Result<&mut T> {
        self.slot.peek_mut()
    }

    /// Transfer ownership of the resource to the caller.
    ///
    /// The release action will never run in this cell afterwards; the
    /// caller owns the resource and its cleanup from here on. The unused
    /// action is discarded.
    pub fn transfer(&mut self) -> Result<T> {
        let value = self.slot.transfer()?;
        self.action = None;
        tracking::record_settled();
        Ok(value)
    }

    /// Non-failing transfer: `None` once the resource is gone.
    pub fn try_transfer(&mut self) -> Option<T> {
        self.transfer().ok()
    }

    /// Run the release action on the held resource.
    ///
    /// Safe to call unconditionally from any cleanup path: when the cell
    /// is already moved or released this does nothing. The action runs at
    /// most once over the cell's lifetime, and only on the value present
    /// at this moment — a transferred value is out of reach.
    pub fn release(&mut self) {
        if let Some(value) = self.slot.begin_release() {
            tracking::record_settled();
            // The action is present whenever the slot is owned; the two
            // are taken together on every terminal transition.
            if let Some(action) = self.action.take() {
                action(value);
            }
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

    /// Check if the release action ran.
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

impl<T, F: FnOnce(T)> Drop for ReleasableCell<T, F> {
    fn drop(&mut self) {
        if self.slot.state().is_owned() {
            debug!(
                "releasing still-owned cell of {} on drop",
                any::type_name::<T>()
            );
            self.release();
        }
    }
}

impl<T, F: FnOnce(T)> fmt::Debug for ReleasableCell<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleasableCell")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
