//! Accounting of live resource-carrying cells.
//!
//! Rust has no finalizer to fall back on, so "a resource cell was dropped
//! or forgotten while still owned" is made observable instead of silently
//! tolerated: every cell that carries a release obligation registers here
//! at construction and deregisters on its first terminal transition,
//! whether that transition came from an explicit call or from `Drop`. A
//! cell lost to [`std::mem::forget`] never deregisters and stays visible
//! in the gauge.
//!
//! The gauge is process-wide. Debug harnesses and tests that want a clean
//! zero should run in their own process (integration test binaries already
//! do) or compare against a baseline taken before the scenario.

use std::sync::atomic::{AtomicUsize, Ordering};

static LIVE_CELLS: AtomicUsize = AtomicUsize::new(0);

/// Number of resource-carrying cells that are alive and still owned.
///
/// Counts [`ReleasableCell`](crate::ReleasableCell),
/// [`ManagedCell`](crate::ManagedCell), and action-carrying
/// [`SharedCell`](crate::SharedCell) instances whose release obligation
/// has not yet been discharged by a transfer or a release. Bare
/// [`MoveCell`](crate::MoveCell) values are not tracked; a value is not a
/// resource.
///
/// # Examples
///
/// ```
/// use handoff::{tracking, ReleasableCell};
///
/// let baseline = tracking::live_cells();
/// let mut cell = ReleasableCell::new(7, |_| {});
/// assert_eq!(tracking::live_cells(), baseline + 1);
///
/// cell.release();
/// assert_eq!(tracking::live_cells(), baseline);
/// ```
pub fn live_cells() -> usize {
    LIVE_CELLS.load(Ordering::Relaxed)
}

/// A resource-carrying cell came into existence in the owned state.
pub(crate) fn record_created() {
    LIVE_CELLS.fetch_add(1, Ordering::Relaxed);
}

/// A tracked cell reached a terminal state. Called at most once per cell.
pub(crate) fn record_settled() {
    let previous = LIVE_CELLS.fetch_sub(1, Ordering::Relaxed);
    debug_assert!(previous > 0, "settled more cells than were created");
}
