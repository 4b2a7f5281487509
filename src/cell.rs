//! Bare-value ownership cell.
//!
//! [`MoveCell`] tracks only whether its value has been handed off. There
//! is no release action: dropping a still-owned `MoveCell` simply drops
//! the value, which is not a resource leak.

use crate::error::Result;
use crate::state::{CellState, Slot};

/// A cell that hands its value to exactly one new owner.
///
/// The cell starts out owning the value. After a successful
/// [`transfer`](MoveCell::transfer), every further access fails with
/// [`Error::Moved`](crate::Error::Moved) — the cell never again observes
/// the value it gave away. The `Released` state is unreachable for this
/// variant.
///
/// # Examples
///
/// ```
/// use handoff::MoveCell;
///
/// let mut cell = MoveCell::new(String::from("Hello, World!"));
/// assert_eq!(cell.peek().unwrap(), "Hello, World!");
///
/// let value = cell.transfer().unwrap();
/// assert_eq!(value, "Hello, World!");
///
/// // The original holder can no longer see the value.
/// assert!(cell.peek().unwrap_err().is_moved());
/// ```
#[derive(Debug)]
pub struct MoveCell<T> {
    slot: Slot<T>,
}

impl<T> MoveCell<T> {
    /// Create a cell owning `value`.
    pub fn new(value: T) -> Self {
        MoveCell {
            slot: Slot::new(value),
        }
    }

    /// Create a cell from an optional value.
    ///
    /// Fails with [`Error::MissingValue`](crate::Error::MissingValue) when
    /// the value is absent; no cell exists after a failed construction.
    ///
    /// # Examples
    ///
    /// ```
    /// use handoff::MoveCell;
    ///
    /// assert!(MoveCell::<u32>::from_option(None).is_err());
    /// assert!(MoveCell::from_option(Some(7)).is_ok());
    /// ```
    pub fn from_option(value: Option<T>) -> Result<Self> {
        Ok(MoveCell {
            slot: Slot::from_option(value)?,
        })
    }

    /// Borrow the held value.
    ///
    /// Read-only and repeatable while the cell is owned; fails with
    /// [`Error::Moved`](crate::Error::Moved) afterwards.
    pub fn peek(&self) -> Result<&T> {
        self.slot.peek()
    }

    /// Mutably borrow the held value.
    pub fn peek_mut(&mut self) -> Result<&mut T> {
        self.slot.peek_mut()
    }

    /// Transfer ownership of the value to the caller.
    ///
    /// Returns the exact value the cell held — no clone — and leaves the
    /// cell in the terminal `Moved` state, its internal slot cleared.
    pub fn transfer(&mut self) -> Result<T> {
        self.slot.transfer()
    }

    /// Non-failing transfer.
    ///
    /// Returns `Some(value)` for the first caller and `None` for everyone
    /// after; never an error, for callers that prefer branching over
    /// failure propagation.
    ///
    /// # Examples
    ///
    /// ```
    /// use handoff::MoveCell;
    ///
    /// let mut cell = MoveCell::new(7);
    /// assert_eq!(cell.try_transfer(), Some(7));
    /// assert_eq!(cell.try_transfer(), None);
    /// ```
    pub fn try_transfer(&mut self) -> Option<T> {
        self.slot.try_transfer()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CellState {
        self.slot.state()
    }

    /// Check if the cell still holds its value.
    pub fn is_owned(&self) -> bool {
        self.slot.state().is_owned()
    }

    /// Check if the value was transferred out.
    pub fn is_moved(&self) -> bool {
        self.slot.state().is_moved()
    }

    /// Guard: fail with [`Error::Moved`](crate::Error::Moved) once the
    /// value is gone.
    ///
    /// Pure validation with no side effects, for callers that wrap a cell
    /// and want the same failure behavior as the accessors before doing
    /// work of their own.
    pub fn ensure_not_moved(&self) -> Result<()> {
        self.slot.ensure_not_moved()
    }
}

impl<T> From<T> for MoveCell<T> {
    fn from(value: T) -> Self {
        MoveCell::new(value)
    }
}
