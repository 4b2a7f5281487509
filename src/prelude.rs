//! Convenient imports for Handoff.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```
//! use handoff::prelude::*;
//!
//! let mut cell = MoveCell::new(42);
//! let value = cell.transfer().unwrap();
//! assert_eq!(value, 42);
//! ```

// Cell variants
pub use crate::cell::MoveCell;
pub use crate::managed::{ManagedCell, ReleaseHooks};
pub use crate::releasable::ReleasableCell;
pub use crate::sync::SharedCell;

// Lifecycle state
pub use crate::state::CellState;

// Error handling
pub use crate::error::{Error, Result};
