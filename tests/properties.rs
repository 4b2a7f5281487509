//! Property Tests
//!
//! The ownership-state-machine contract checked over arbitrary operation
//! sequences: monotonicity, exactly-once release, transfer/release
//! exclusion, identity preservation, idempotent release, and the
//! non-failing `try_transfer` contract.

mod common;

use common::*;
use handoff::{CellState, MoveCell, ReleasableCell};
use proptest::prelude::*;

/// One step a caller can take against a releasable cell.
#[derive(Debug, Clone, Copy)]
enum Op {
    Peek,
    Transfer,
    TryTransfer,
    Release,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Peek),
        Just(Op::Transfer),
        Just(Op::TryTransfer),
        Just(Op::Release),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    /// Once a terminal transition succeeds, every later access fails with
    /// the matching error and the state never changes again.
    #[test]
    fn state_stays_terminal_under_any_operation_sequence(
        ops in prop::collection::vec(op_strategy(), 1..32),
    ) {
        let counter = ReleaseCounter::new();
        let mut cell = ReleasableCell::new(0u64, counter.action());
        let mut settled: Option<CellState> = None;

        for op in ops {
            match op {
                Op::Peek => {
                    let result = cell.peek();
                    match settled {
                        None => prop_assert!(result.is_ok()),
                        Some(CellState::Moved) => {
                            prop_assert!(result.unwrap_err().is_moved())
                        }
                        Some(_) => prop_assert!(result.unwrap_err().is_released()),
                    }
                }
                Op::Transfer => {
                    let result = cell.transfer();
                    match settled {
                        None => {
                            prop_assert!(result.is_ok());
                            settled = Some(CellState::Moved);
                        }
                        Some(CellState::Moved) => {
                            prop_assert!(result.unwrap_err().is_moved())
                        }
                        Some(_) => prop_assert!(result.unwrap_err().is_released()),
                    }
                }
                Op::TryTransfer => {
                    let result = cell.try_transfer();
                    if settled.is_none() {
                        prop_assert!(result.is_some());
                        settled = Some(CellState::Moved);
                    } else {
                        prop_assert!(result.is_none());
                    }
                }
                Op::Release => {
                    cell.release();
                    if settled.is_none() {
                        settled = Some(CellState::Released);
                    }
                }
            }
            prop_assert_eq!(cell.state(), settled.unwrap_or(CellState::Owned));
        }
    }

    /// The release action runs at most once over any operation sequence,
    /// and exactly once iff no transfer won first.
    #[test]
    fn release_action_runs_at_most_once(
        ops in prop::collection::vec(op_strategy(), 0..32),
    ) {
        let counter = ReleaseCounter::new();
        let mut cell = ReleasableCell::new(0u64, counter.action());

        let mut transferred = false;
        for op in ops {
            match op {
                Op::Peek => {
                    let _ = cell.peek();
                }
                Op::Transfer => {
                    if cell.transfer().is_ok() {
                        transferred = true;
                    }
                }
                Op::TryTransfer => {
                    if cell.try_transfer().is_some() {
                        transferred = true;
                    }
                }
                Op::Release => {
                    cell.release();
                }
            }
        }
        drop(cell);

        // Drop finishes the job when the sequence left the cell owned.
        let expected = if transferred { 0 } else { 1 };
        prop_assert_eq!(counter.releases(), expected);
    }

    /// The transferred value is the exact value the constructor received.
    #[test]
    fn transfer_preserves_value_identity(payload in any::<Vec<u8>>()) {
        let boxed = payload.into_boxed_slice();
        let address = boxed.as_ptr();

        let mut cell = MoveCell::new(boxed);
        let out = cell.transfer().unwrap();
        prop_assert_eq!(out.as_ptr(), address);
    }

    /// N releases are observationally equivalent to one.
    #[test]
    fn repeated_release_equals_single_release(extra_releases in 0usize..8) {
        let counter = ReleaseCounter::new();
        let mut cell = ReleasableCell::new(0u64, counter.action());

        cell.release();
        for _ in 0..extra_releases {
            cell.release();
        }

        prop_assert_eq!(counter.releases(), 1);
        prop_assert_eq!(cell.state(), CellState::Released);
    }

    /// `try_transfer` reports failure through its return value only;
    /// exactly one call in any sequence yields the value.
    #[test]
    fn try_transfer_yields_exactly_one_winner(calls in 1usize..16) {
        let mut cell = MoveCell::new(String::from("payload"));

        let successes = (0..calls)
            .filter(|_| cell.try_transfer().is_some())
            .count();
        prop_assert_eq!(successes, 1);
    }

    /// Peek never mutates: any number of peeks leaves an owned cell owned
    /// with its value intact.
    #[test]
    fn peek_has_no_side_effects(value in any::<u64>(), peeks in 1usize..16) {
        let cell = MoveCell::new(value);
        for _ in 0..peeks {
            prop_assert_eq!(cell.peek().unwrap(), &value);
        }
        prop_assert_eq!(cell.state(), CellState::Owned);
    }
}
