//! # Handoff
//!
//! Runtime-checked ownership-transfer cells for values and resources that
//! must be handed off or released exactly once.
//!
//! A cell wraps a value and tracks one question: does this holder still
//! own it? Transferring the value out marks the cell `Moved`; running its
//! release action marks it `Released`. Both states are terminal, and any
//! later access fails with a typed error at the point of misuse instead of
//! silently observing a value that belongs to someone else. The checks are
//! runtime checks, for the handoff protocols the borrow checker cannot see
//! (values threaded through registries, callbacks, or shared state).
//!
//! ## Quick Start
//!
//! ```
//! use handoff::prelude::*;
//!
//! fn demo() -> Result<()> {
//!     // A bare value: owned until transferred.
//!     let mut cell = MoveCell::new(String::from("Hello, World!"));
//!     let value = cell.transfer()?;
//!     assert_eq!(value, "Hello, World!");
//!     assert!(cell.peek().unwrap_err().is_moved());
//!
//!     // A resource with a bound release action: runs at most once, and
//!     // never on a value that was transferred out.
//!     let mut conn = ReleasableCell::new("conn-4", |c| println!("closing {c}"));
//!     conn.release();
//!     conn.release(); // no-op
//!     Ok(())
//! }
//! # demo().unwrap();
//! ```
//!
//! ## Cell Variants
//!
//! All variants share one state machine (`Owned → Moved | Released`);
//! they differ only in payload shape:
//!
//! - [`MoveCell`] — bare value, no release action; `Released` is
//!   unreachable.
//! - [`ReleasableCell`] — value plus an `FnOnce(T)` release action bound
//!   at construction; drop releases if still owned.
//! - [`ManagedCell`] — the resource itself implements [`ReleaseHooks`]
//!   (`release_managed` then `release_unmanaged`, invoked once on first
//!   release).
//! - [`SharedCell`] — the same machine behind a mutex, for `&self` use
//!   across threads; racing terminal operations resolve to exactly one
//!   winner.
//!
//! ## Error Contract
//!
//! Access after transfer fails with [`Error::Moved`]; access after
//! release fails with [`Error::Released`]; constructing from an absent
//! value fails with [`Error::MissingValue`]. Repeated release is not an
//! error — cleanup paths must be unconditionally safe — and
//! `try_transfer` converts transfer failure into `None` for callers that
//! prefer branching.
//!
//! ## Leak Visibility
//!
//! Resource-carrying cells register with a process-wide gauge
//! ([`tracking::live_cells`]) from construction until their first
//! terminal transition, so a debug harness can assert that everything
//! acquired was handed off or released.

#![warn(missing_docs)]

mod cell;
mod error;
mod managed;
mod releasable;
mod state;
mod sync;

pub mod prelude;
pub mod tracking;

pub use cell::MoveCell;
pub use error::{Error, Result};
pub use managed::{ManagedCell, ReleaseHooks};
pub use releasable::ReleasableCell;
pub use state::CellState;
pub use sync::SharedCell;
