//! Shared probe resources for the integration suites.
//!
//! Release actions and hooks are observed through counters rather than
//! real OS resources, so every assertion about "the action ran N times"
//! is exact.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use handoff::ReleaseHooks;

/// An in-memory buffer that stands in for a closable resource.
#[derive(Debug, PartialEq, Eq)]
pub struct Buffer {
    pub data: Vec<u8>,
    pub open: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer {
            data: Vec::new(),
            open: true,
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        assert!(self.open, "write to closed buffer");
        self.data.extend_from_slice(bytes);
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Counts how many times a release action ran.
#[derive(Clone, Default)]
pub struct ReleaseCounter {
    count: Arc<AtomicUsize>,
}

impl ReleaseCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A release action that closes the buffer it receives and bumps the
    /// counter.
    pub fn close_action(&self) -> impl FnOnce(Buffer) + Send + 'static {
        let count = self.count.clone();
        move |mut buffer| {
            buffer.close();
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A release action over any payload that only bumps the counter.
    pub fn action<T>(&self) -> impl FnOnce(T) + Send + 'static {
        let count = self.count.clone();
        move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn releases(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// A hook-bearing resource that records how often each phase ran and in
/// which order.
pub struct HookedResource {
    managed_runs: Arc<AtomicUsize>,
    unmanaged_runs: Arc<AtomicUsize>,
    order: Arc<std::sync::Mutex<Vec<&'static str>>>,
}

/// Observer half of a [`HookedResource`]; stays with the test while the
/// resource moves into a cell.
#[derive(Clone)]
pub struct HookObserver {
    managed_runs: Arc<AtomicUsize>,
    unmanaged_runs: Arc<AtomicUsize>,
    order: Arc<std::sync::Mutex<Vec<&'static str>>>,
}

impl HookedResource {
    pub fn new() -> (Self, HookObserver) {
        let managed_runs = Arc::new(AtomicUsize::new(0));
        let unmanaged_runs = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        (
            HookedResource {
                managed_runs: managed_runs.clone(),
                unmanaged_runs: unmanaged_runs.clone(),
                order: order.clone(),
            },
            HookObserver {
                managed_runs,
                unmanaged_runs,
                order,
            },
        )
    }
}

impl ReleaseHooks for HookedResource {
    fn release_managed(&mut self) {
        self.managed_runs.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push("managed");
    }

    fn release_unmanaged(&mut self) {
        self.unmanaged_runs.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push("unmanaged");
    }
}

impl HookObserver {
    pub fn managed_runs(&self) -> usize {
        self.managed_runs.load(Ordering::SeqCst)
    }

    pub fn unmanaged_runs(&self) -> usize {
        self.unmanaged_runs.load(Ordering::SeqCst)
    }

    pub fn call_order(&self) -> Vec<&'static str> {
        self.order.lock().unwrap().clone()
    }
}
