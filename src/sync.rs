//! Lock-protected ownership cell for shared, multi-threaded use.
//!
//! Transfer and release are each a read-check-then-write on the cell's
//! state, so under concurrency the whole sequence must be one atomic
//! step; otherwise two racing callers can both observe `Owned` and both
//! "win." Single-owner cells get that atomicity for free from `&mut self`
//! exclusivity. [`SharedCell`] is the rendition for `&self` access from
//! multiple threads: the same state machine behind a
//! [`parking_lot::Mutex`], so exactly one of any number of racing
//! terminal operations succeeds.

use std::any;
use std::fmt;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::state::{CellState, Slot};
use crate::tracking;

type ReleaseAction<T> = Box<dyn FnOnce(T) + Send>;

struct Inner<T> {
    slot: Slot<T>,
    action: Option<ReleaseAction<T>>,
    /// Whether this cell registered with the live-cell gauge (true iff it
    /// was constructed with a release action).
    tracked: bool,
}

/// A cell usable through `&self` from multiple threads.
///
/// Typically held in an `Arc` and cloned across workers; whichever caller
/// reaches [`transfer`](SharedCell::transfer) or
/// [`release`](SharedCell::release) first settles the cell, and every
/// other caller observes the terminal state. Transfer and release remain
/// mutually exclusive: a concurrent race between them resolves to exactly
/// one outcome.
///
/// All operations lock the cell for their full duration; none block
/// beyond that lock (the release action runs under it, so keep actions
/// short).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use handoff::SharedCell;
///
/// let cell = Arc::new(SharedCell::new(String::from("payload")));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let cell = cell.clone();
///         thread::spawn(move || cell.try_transfer())
///     })
///     .collect();
///
/// let winners: Vec<_> = handles
///     .into_iter()
///     .filter_map(|h| h.join().unwrap())
///     .collect();
///
/// // Exactly one thread got the value.
/// assert_eq!(winners, vec![String::from("payload")]);
/// assert!(cell.is_moved());
/// ```
pub struct SharedCell<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> SharedCell<T> {
    /// Create a cell owning `value`, with no release action.
    ///
    /// Behaves like a thread-shareable
    /// [`MoveCell`](crate::MoveCell): release still moves the cell to
    /// the terminal `Released` state, it just has no action to run.
    pub fn new(value: T) -> Self {
        SharedCell {
            inner: Mutex::new(Inner {
                slot: Slot::new(value),
                action: None,
                tracked: false,
            }),
        }
    }

    /// Create a cell owning `value`, with `action` bound as its release
    /// operation.
    pub fn with_action<F>(value: T, action: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        tracking::record_created();
        SharedCell {
            inner: Mutex::new(Inner {
                slot: Slot::new(value),
                action: Some(Box::new(action)),
                tracked: true,
            }),
        }
    }

    /// Create a cell from an optional value.
    ///
    /// Fails with [`Error::MissingValue`](crate::Error::MissingValue)
    /// when the value is absent.
    pub fn from_option(value: Option<T>) -> Result<Self> {
        Ok(SharedCell {
            inner: Mutex::new(Inner {
                slot: Slot::from_option(value)?,
                action: None,
                tracked: false,
            }),
        })
    }

    /// Run `f` on a borrow of the held value.
    ///
    /// The closure-based shape replaces `peek`: a plain reference cannot
    /// outlive the lock, so the borrow is scoped to the call. Fails by
    /// state once the value is gone, without invoking `f`.
    pub fn peek_with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let inner = self.inner.lock();
        Ok(f(inner.slot.peek()?))
    }

    /// Run `f` on a mutable borrow of the held value.
    pub fn peek_mut_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut inner = self.inner.lock();
        Ok(f(inner.slot.peek_mut()?))
    }

    /// Transfer ownership of the value to the caller.
    ///
    /// At most one caller ever succeeds; the check and the extraction
    /// happen under the lock as a single step. A bound release action is
    /// discarded unused.
    pub fn transfer(&self) -> Result<T> {
        let mut inner = self.inner.lock();
        let value = inner.slot.transfer()?;
        inner.action = None;
        if inner.tracked {
            tracking::record_settled();
        }
        Ok(value)
    }

    /// Non-failing transfer: `None` once the value is gone.
    pub fn try_transfer(&self) -> Option<T> {
        self.transfer().ok()
    }

    /// Release the held value, running the bound action if any.
    ///
    /// Silent no-op once the cell is terminal, same as the single-owner
    /// cells; safe to call unconditionally from any number of threads.
    /// The action runs under the cell's lock.
    pub fn release(&self) {
        let mut inner = self.inner.lock();
        if let Some(value) = inner.slot.begin_release() {
            if inner.tracked {
                tracking::record_settled();
            }
            if let Some(action) = inner.action.take() {
                action(value);
            }
        }
    }

    /// Current lifecycle state.
    ///
    /// A snapshot: by the time the caller inspects it another thread may
    /// have settled the cell. The terminal states are stable, so `Moved`
    /// and `Released` answers never go stale.
    pub fn state(&self) -> CellState {
        self.inner.lock().slot.state()
    }

    /// Check if the cell still holds its value (snapshot, as
    /// [`state`](SharedCell::state)).
    pub fn is_owned(&self) -> bool {
        self.state().is_owned()
    }

    /// Check if the value was transferred out.
    pub fn is_moved(&self) -> bool {
        self.state().is_moved()
    }

    /// Check if the cell was released.
    pub fn is_released(&self) -> bool {
        self.state().is_released()
    }

    /// Guard: fail with [`Error::Moved`](crate::Error::Moved) after a
    /// transfer. Validates a snapshot of the state.
    pub fn ensure_not_moved(&self) -> Result<()> {
        self.inner.lock().slot.ensure_not_moved()
    }

    /// Guard: fail with [`Error::Released`](crate::Error::Released) after
    /// a release. Validates a snapshot of the state.
    pub fn ensure_not_released(&self) -> Result<()> {
        self.inner.lock().slot.ensure_not_released()
    }
}

impl<T> Drop for SharedCell<T> {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        if inner.slot.state().is_owned() && inner.tracked {
            debug!(
                "releasing still-owned shared cell of {} on drop",
                any::type_name::<T>()
            );
        }
        if let Some(value) = inner.slot.begin_release() {
            if inner.tracked {
                tracking::record_settled();
            }
            if let Some(action) = inner.action.take() {
                action(value);
            }
        }
    }
}

impl<T> fmt::Debug for SharedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCell")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_new_cell_is_owned() {
        let cell = SharedCell::new(7);
        assert!(cell.is_owned());
        assert_eq!(cell.peek_with(|v| *v).unwrap(), 7);
    }

    #[test]
    fn test_transfer_through_shared_reference() {
        let cell = SharedCell::new(String::from("payload"));
        assert_eq!(cell.transfer().unwrap(), "payload");
        assert!(cell.is_moved());
        assert!(cell.transfer().unwrap_err().is_moved());
        assert!(cell.peek_with(|v| v.clone()).unwrap_err().is_moved());
    }

    #[test]
    fn test_peek_mut_with_edits_in_place() {
        let cell = SharedCell::new(vec![1, 2]);
        cell.peek_mut_with(|v| v.push(3)).unwrap();
        assert_eq!(cell.peek_with(|v| v.clone()).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_release_runs_action_exactly_once() {
        let count = Arc::new(AtomicU32::new(0));
        let count_in = count.clone();
        let cell = SharedCell::with_action(7, move |_| {
            count_in.fetch_add(1, Ordering::SeqCst);
        });

        cell.release();
        cell.release();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(cell.is_released());
    }

    #[test]
    fn test_release_without_action_still_terminal() {
        let cell = SharedCell::new(7);
        cell.release();
        assert!(cell.is_released());
        assert!(cell.transfer().unwrap_err().is_released());
    }

    #[test]
    fn test_transfer_disarms_action() {
        let count = Arc::new(AtomicU32::new(0));
        let count_in = count.clone();
        let cell = SharedCell::with_action(7, move |_| {
            count_in.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(cell.transfer().unwrap(), 7);
        cell.release();
        drop(cell);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_releases_owned_action_cell() {
        let count = Arc::new(AtomicU32::new(0));
        let count_in = count.clone();
        {
            let _cell = SharedCell::with_action(7, move |_| {
                count_in.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guards_reject_by_state() {
        let cell = SharedCell::new(7);
        assert!(cell.ensure_not_moved().is_ok());
        assert!(cell.ensure_not_released().is_ok());

        cell.release();
        assert!(cell.ensure_not_released().unwrap_err().is_released());
        assert!(cell.ensure_not_moved().is_ok());
    }

    #[test]
    fn test_from_option_rejects_none() {
        assert!(SharedCell::<u32>::from_option(None)
            .unwrap_err()
            .is_missing_value());
        let cell = SharedCell::from_option(Some(3)).unwrap();
        assert!(cell.is_owned());
    }
}
