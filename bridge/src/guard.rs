//! Once-only initialization guard for the native library.
//!
//! Exactly one load attempt is made per guard. Concurrent first callers block
//! until the winner publishes its outcome; every caller after that, including
//! the blocked ones, observes the same outcome. A failed load stays failed.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use mathoku::error::panic_message;

use crate::error::BridgeError;

enum LoadState<T> {
    Unloaded,
    Loading,
    Loaded(Arc<T>),
    Failed(BridgeError),
}

pub struct LoadGuard<T> {
    state: Mutex<LoadState<T>>,
    published: Condvar,
    attempts: AtomicUsize,
}

impl<T> LoadGuard<T> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(LoadState::Unloaded),
            published: Condvar::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Return the loaded value, running `load` if nobody has tried yet.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<T>, BridgeError>
    where
        F: FnOnce() -> Result<T, BridgeError>,
    {
        let mut state = self.lock();
        loop {
            match &*state {
                LoadState::Loaded(value) => return Ok(Arc::clone(value)),
                LoadState::Failed(err) => return Err(err.clone()),
                LoadState::Unloaded => break,
                LoadState::Loading => {}
            }
            state = self
                .published
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        *state = LoadState::Loading;
        drop(state);
        self.attempts.fetch_add(1, Ordering::SeqCst);

        // The loader runs without the lock held; a panic must still publish.
        let outcome = panic::catch_unwind(AssertUnwindSafe(load)).unwrap_or_else(|payload| {
            Err(BridgeError::load_failure(format!(
                "library loader panicked: {}",
                panic_message(&*payload)
            )))
        });

        let mut state = self.lock();
        let result = match outcome {
            Ok(value) => {
                let value = Arc::new(value);
                *state = LoadState::Loaded(Arc::clone(&value));
                Ok(value)
            }
            Err(err) => {
                *state = LoadState::Failed(err.clone());
                Err(err)
            }
        };
        drop(state);
        self.published.notify_all();
        result
    }

    /// Number of load attempts made so far (0 or 1).
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock(), LoadState::Loaded(_))
    }

    fn lock(&self) -> MutexGuard<'_, LoadState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for LoadGuard<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn loads_once_and_caches() {
        let guard = LoadGuard::new();
        let first = guard.get_or_load(|| Ok(7)).unwrap();
        let second = guard.get_or_load(|| Ok(99)).unwrap();
        assert_eq!(*first, 7);
        assert_eq!(*second, 7);
        assert_eq!(guard.attempts(), 1);
        assert!(guard.is_loaded());
    }

    #[test]
    fn failure_is_sticky() {
        let guard: LoadGuard<u32> = LoadGuard::new();
        let err = guard
            .get_or_load(|| Err(BridgeError::load_failure("no such file")))
            .unwrap_err();
        assert_eq!(err.message, "no such file");

        let again = guard.get_or_load(|| Ok(1)).unwrap_err();
        assert_eq!(again, err);
        assert_eq!(guard.attempts(), 1);
        assert!(!guard.is_loaded());
    }

    #[test]
    fn panicking_loader_becomes_load_failure() {
        let guard: LoadGuard<u32> = LoadGuard::new();
        let err = guard.get_or_load(|| panic!("dlopen exploded")).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::LoadFailure);
        assert!(err.message.contains("dlopen exploded"));
        assert!(guard.get_or_load(|| Ok(1)).is_err());
    }

    #[test]
    fn concurrent_first_callers_share_one_attempt() {
        const CALLERS: usize = 16;
        let guard = Arc::new(LoadGuard::new());
        let start = Arc::new(Barrier::new(CALLERS));
        let runs = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..CALLERS)
            .map(|i| {
                let guard = Arc::clone(&guard);
                let start = Arc::clone(&start);
                let runs = Arc::clone(&runs);
                thread::spawn(move || {
                    start.wait();
                    guard
                        .get_or_load(|| {
                            runs.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            Ok(i)
                        })
                        .map(|v| *v)
                })
            })
            .collect();

        let values: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(guard.attempts(), 1);
        assert!(values.iter().all(|v| *v == values[0]));
    }
}
