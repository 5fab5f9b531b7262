//! Per-directory completion tracking.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

type DoneFn<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Counts processed entries of one directory and fires a callback once all
/// of them are done.
///
/// `total` is the number of entries that entered the pipeline, not the raw
/// directory size. Recording is order-independent and saturates at `total`;
/// the callback fires exactly once. A directory with nothing to process is
/// done as soon as the tracker is created.
pub struct CompletionTracker<'a> {
    total: usize,
    processed: AtomicUsize,
    on_done: Mutex<Option<DoneFn<'a>>>,
}

impl<'a> CompletionTracker<'a> {
    pub fn new(total: usize, on_done: impl FnOnce() + Send + 'a) -> Self {
        let tracker = Self {
            total,
            processed: AtomicUsize::new(0),
            on_done: Mutex::new(Some(Box::new(on_done))),
        };

        if total == 0 {
            tracker.fire();
        }

        tracker
    }

    /// Record one processed entry.
    ///
    /// Returns `true` for the call that completed the directory.
    pub fn record(&self) -> bool {
        let previous = self
            .processed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.total).then_some(n + 1)
            });

        match previous {
            Ok(n) if n + 1 == self.total => {
                self.fire();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.processed() >= self.total
    }

    fn fire(&self) {
        let on_done = self
            .on_done
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(on_done) = on_done {
            on_done();
        }
    }
}

impl fmt::Debug for CompletionTracker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionTracker")
            .field("total", &self.total)
            .field("processed", &self.processed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_fires_once_when_all_recorded() {
        let fired = AtomicUsize::new(0);
        let tracker = CompletionTracker::new(3, || {
            fired.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!tracker.record());
        assert!(!tracker.record());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(tracker.record());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(tracker.is_done());
    }

    #[test]
    fn test_empty_directory_done_immediately() {
        let fired = AtomicUsize::new(0);
        let tracker = CompletionTracker::new(0, || {
            fired.fetch_add(1, Ordering::SeqCst);
        });

        assert!(tracker.is_done());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_extra_records_saturate() {
        let fired = AtomicUsize::new(0);
        let tracker = CompletionTracker::new(1, || {
            fired.fetch_add(1, Ordering::SeqCst);
        });

        assert!(tracker.record());
        assert!(!tracker.record());
        assert_eq!(tracker.processed(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_records_fire_once() {
        let fired = AtomicUsize::new(0);
        let tracker = CompletionTracker::new(1_000, || {
            fired.fetch_add(1, Ordering::SeqCst);
        });

        let completions = (0..1_000)
            .into_par_iter()
            .filter(|_| tracker.record())
            .count();

        assert_eq!(completions, 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
