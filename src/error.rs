//! Error types for cell operations.
//!
//! Every guarded operation fails synchronously with a typed error naming
//! the state that rejected it. There is deliberately no variant for a
//! repeated release: releasing a cell that is already terminal is a silent
//! no-op, because cleanup paths must be unconditionally safe to run.

use std::any;

use thiserror::Error;

/// All cell errors.
///
/// Each variant carries a `value_type` tag so a failure names the payload
/// type it concerns. The tag is produced by [`std::any::type_name`] at
/// monomorphization time; no runtime reflection is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The value was already transferred to another owner.
    ///
    /// Returned by every access on a cell whose transfer succeeded. This
    /// is an expected, recoverable condition, not a bug signal by itself.
    #[error("value of type {value_type} already moved out of its cell")]
    Moved {
        /// Type of the value the cell held.
        value_type: &'static str,
    },

    /// The resource was already released.
    ///
    /// Returned by every access on a cell whose release action has run.
    #[error("resource of type {value_type} already released")]
    Released {
        /// Type of the resource the cell held.
        value_type: &'static str,
    },

    /// A cell was constructed from an absent value.
    ///
    /// Fatal to the construction call only; the cell never exists.
    #[error("cannot construct a cell of {value_type} from an absent value")]
    MissingValue {
        /// Type of the value the cell would have held.
        value_type: &'static str,
    },
}

/// Result type for cell operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn moved<T>() -> Self {
        Error::Moved {
            value_type: any::type_name::<T>(),
        }
    }

    pub(crate) fn released<T>() -> Self {
        Error::Released {
            value_type: any::type_name::<T>(),
        }
    }

    pub(crate) fn missing_value<T>() -> Self {
        Error::MissingValue {
            value_type: any::type_name::<T>(),
        }
    }

    /// Check if this error reports access after a transfer.
    pub fn is_moved(&self) -> bool {
        matches!(self, Error::Moved { .. })
    }

    /// Check if this error reports access after a release.
    pub fn is_released(&self) -> bool {
        matches!(self, Error::Released { .. })
    }

    /// Check if this error reports construction from an absent value.
    pub fn is_missing_value(&self) -> bool {
        matches!(self, Error::MissingValue { .. })
    }

    /// The type name of the payload the failing cell was built for.
    pub fn value_type(&self) -> &'static str {
        match self {
            Error::Moved { value_type }
            | Error::Released { value_type }
            | Error::MissingValue { value_type } => value_type,
        }
    }
}
