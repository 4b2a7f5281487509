//! The ownership state machine shared by every cell variant.
//!
//! A cell is born holding its value and leaves that state through exactly
//! one of two terminal transitions: a transfer (the value is handed to the
//! caller) or a release (the value is consumed by its release action).
//! Everything else in the crate is a thin configuration of [`Slot`], the
//! private core defined here.

use std::mem;

use crate::error::{Error, Result};

/// Lifecycle state of a cell.
///
/// ```text
///        construct
///           │
///           ▼
///        [Owned] ──transfer──▶ [Moved]      terminal
///           │
///        release
///           │
///           ▼
///       [Released]                          terminal
/// ```
///
/// `Owned` is the only state in which the cell holds its value. The two
/// terminal states are mutually exclusive and irreversible: a moved cell
/// can never be released, a released cell can never be moved, and neither
/// ever returns to `Owned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// The cell holds its value; every operation is legal.
    Owned,
    /// The value was transferred out; access fails with [`Error::Moved`].
    Moved,
    /// The release action ran; access fails with [`Error::Released`].
    Released,
}

impl CellState {
    /// Check if the cell still holds its value.
    pub fn is_owned(&self) -> bool {
        matches!(self, CellState::Owned)
    }

    /// Check if the value was transferred out.
    pub fn is_moved(&self) -> bool {
        matches!(self, CellState::Moved)
    }

    /// Check if the release action ran.
    pub fn is_released(&self) -> bool {
        matches!(self, CellState::Released)
    }

    /// Check if no further ownership-affecting operation can succeed.
    pub fn is_terminal(&self) -> bool {
        !self.is_owned()
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellState::Owned => "Owned",
            CellState::Moved => "Moved",
            CellState::Released => "Released",
        }
    }
}

impl std::fmt::Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The generic core every public cell delegates to.
///
/// State and value are one field, so the "value present exactly while
/// owned" invariant holds by construction: extracting the value and
/// leaving `Owned` are the same assignment.
#[derive(Debug)]
pub(crate) enum Slot<T> {
    /// Still owns the value.
    Owned(T),
    /// The value was transferred out.
    Moved,
    /// The value was consumed by its release action.
    Released,
}

impl<T> Slot<T> {
    /// Create a slot in the `Owned` state.
    pub(crate) fn new(value: T) -> Self {
        Slot::Owned(value)
    }

    /// Create a slot from an optional value.
    ///
    /// Fails with [`Error::MissingValue`] when the value is absent; the
    /// slot is never created in that case.
    pub(crate) fn from_option(value: Option<T>) -> Result<Self> {
        match value {
            Some(value) => Ok(Slot::Owned(value)),
            None => Err(Error::missing_value::<T>()),
        }
    }

    /// Current lifecycle state.
    pub(crate) fn state(&self) -> CellState {
        match self {
            Slot::Owned(_) => CellState::Owned,
            Slot::Moved => CellState::Moved,
            Slot::Released => CellState::Released,
        }
    }

    /// Borrow the held value, failing by state when it is gone.
    pub(crate) fn peek(&self) -> Result<&T> {
        match self {
            Slot::Owned(value) => Ok(value),
            Slot::Moved => Err(Error::moved::<T>()),
            Slot::Released => Err(Error::released::<T>()),
        }
    }

    /// Mutably borrow the held value, failing by state when it is gone.
    pub(crate) fn peek_mut(&mut self) -> Result<&mut T> {
        match self {
            Slot::Owned(value) => Ok(value),
            Slot::Moved => Err(Error::moved::<T>()),
            Slot::Released => Err(Error::released::<T>()),
        }
    }

    /// Transfer ownership of the value to the caller.
    ///
    /// On success the slot becomes `Moved` and the exact held value is
    /// returned; nothing is cloned and no release action runs. Failure is
    /// idempotent: the slot keeps whichever terminal state it was in.
    pub(crate) fn transfer(&mut self) -> Result<T> {
        match mem::replace(self, Slot::Moved) {
            Slot::Owned(value) => Ok(value),
            Slot::Moved => Err(Error::moved::<T>()),
            Slot::Released => {
                // Put the released marker back; a failed transfer must not
                // rewrite history.
                *self = Slot::Released;
                Err(Error::released::<T>())
            }
        }
    }

    /// Non-failing transfer: `None` when the value is already gone.
    pub(crate) fn try_transfer(&mut self) -> Option<T> {
        self.transfer().ok()
    }

    /// Move to `Released`, handing the value to the caller so the
    /// adapter can run its release action on it.
    ///
    /// Returns `None` without touching the state when the slot is already
    /// terminal; release from `Moved` or `Released` is a silent no-op.
    pub(crate) fn begin_release(&mut self) -> Option<T> {
        match mem::replace(self, Slot::Released) {
            Slot::Owned(value) => Some(value),
            Slot::Moved => {
                // A moved cell stays moved; release does not run here.
                *self = Slot::Moved;
                None
            }
            Slot::Released => None,
        }
    }

    /// Guard: fail with [`Error::Moved`] after a successful transfer.
    pub(crate) fn ensure_not_moved(&self) -> Result<()> {
        match self {
            Slot::Moved => Err(Error::moved::<T>()),
            _ => Ok(()),
        }
    }

    /// Guard: fail with [`Error::Released`] after a release.
    pub(crate) fn ensure_not_released(&self) -> Result<()> {
        match self {
            Slot::Released => Err(Error::released::<T>()),
            _ => Ok(()),
        }
    }
}
