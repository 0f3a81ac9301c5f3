//! Per-operation progress cell.
//!
//! One worker writes, any number of pollers read. The fraction is stored as the bit pattern
//! of an `f64` in an `AtomicU64`, so readers never observe a torn value.

use crate::consts::STREAMING_PROGRESS_CEILING;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle of one operation as seen by a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Running,
    Done,
    Failed,
}

impl OperationState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => OperationState::Running,
            2 => OperationState::Done,
            3 => OperationState::Failed,
            _ => OperationState::Pending,
        }
    }

    /// `true` once the operation will make no further progress.
    pub fn is_terminal(self) -> bool {
        matches!(self, OperationState::Done | OperationState::Failed)
    }
}

#[derive(Debug, Default)]
struct Inner {
    fraction_bits: AtomicU64,
    state: AtomicU8,
}

/// Shared progress handle. Cloning shares the same cell.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    inner: Arc<Inner>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fraction in `[0.0, 1.0]`.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.inner.fraction_bits.load(Ordering::Acquire))
    }

    pub fn state(&self) -> OperationState {
        OperationState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    pub(crate) fn start(&self) {
        self.inner.state.store(1, Ordering::Release);
    }

    /// Record streaming progress; never moves backwards and never reaches `1.0`.
    pub(crate) fn advance(&self, fraction: f64) {
        let capped = fraction.clamp(0.0, STREAMING_PROGRESS_CEILING);
        if capped > self.get() {
            self.inner
                .fraction_bits
                .store(capped.to_bits(), Ordering::Release);
        }
    }

    /// Mark the operation verified and persisted.
    pub(crate) fn complete(&self) {
        self.inner
            .fraction_bits
            .store(1.0f64.to_bits(), Ordering::Release);
        self.inner.state.store(2, Ordering::Release);
    }

    pub(crate) fn fail(&self) {
        self.inner.state.store(3, Ordering::Release);
    }
}

/// Byte counter that feeds a [`Progress`] cell.
pub(crate) struct ProgressTracker<'a> {
    progress: Option<&'a Progress>,
    total: u64,
    done: u64,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(progress: Option<&'a Progress>, total: u64) -> Self {
        Self {
            progress,
            total,
            done: 0,
        }
    }

    pub(crate) fn record(&mut self, bytes: usize) {
        self.done += bytes as u64;
        if let Some(progress) = self.progress {
            if self.total > 0 {
                progress.advance(self.done as f64 / self.total as f64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending_at_zero() {
        let p = Progress::new();
        assert_eq!(p.get(), 0.0);
        assert_eq!(p.state(), OperationState::Pending);
        assert!(!p.is_finished());
    }

    #[test]
    fn streaming_never_reaches_one() {
        let p = Progress::new();
        p.start();
        p.advance(0.5);
        p.advance(1.0);
        assert!(p.get() < 1.0);
        assert_eq!(p.state(), OperationState::Running);

        p.complete();
        assert_eq!(p.get(), 1.0);
        assert_eq!(p.state(), OperationState::Done);
    }

    #[test]
    fn never_moves_backwards() {
        let p = Progress::new();
        p.advance(0.7);
        p.advance(0.2);
        assert_eq!(p.get(), 0.7);
    }

    #[test]
    fn failure_keeps_fraction() {
        let p = Progress::new();
        p.advance(0.4);
        p.fail();
        assert_eq!(p.get(), 0.4);
        assert!(p.is_finished());
        assert_eq!(p.state(), OperationState::Failed);
    }

    #[test]
    fn clones_share_the_cell() {
        let p = Progress::new();
        let poller = p.clone();
        p.advance(0.25);
        assert_eq!(poller.get(), 0.25);
    }

    #[test]
    fn tracker_reports_fraction_of_total() {
        let p = Progress::new();
        let mut tracker = ProgressTracker::new(Some(&p), 200);
        tracker.record(50);
        assert_eq!(p.get(), 0.25);
        tracker.record(150);
        assert_eq!(p.get(), STREAMING_PROGRESS_CEILING);
    }
}
