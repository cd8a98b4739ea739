use std::{fmt, sync::OnceLock};

type ThunkInit<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A definition that is either given up front or produced on first access.
///
/// Deferred producers let mutually recursive types refer to each other. The
/// producer runs at most once, concurrent first accesses block on the same
/// initialization.
pub struct Thunk<T> {
    value: OnceLock<T>,
    init: Option<ThunkInit<T>>,
}

impl<T> Thunk<T> {
    pub fn ready(value: T) -> Self {
        Self {
            value: OnceLock::from(value),
            init: None,
        }
    }

    pub fn deferred(init: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            value: OnceLock::new(),
            init: Some(Box::new(init)),
        }
    }

    pub fn get(&self) -> &T {
        self.value.get_or_init(|| match self.init.as_ref() {
            Some(init) => init(),
            None => unreachable!("ready thunks are initialized at construction"),
        })
    }

    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T> From<T> for Thunk<T> {
    fn from(value: T) -> Self {
        Self::ready(value)
    }
}

impl<T: Default> Default for Thunk<T> {
    fn default() -> Self {
        Self::ready(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Thunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => f.debug_tuple("Thunk").field(value).finish(),
            None => f.write_str("Thunk(<deferred>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn test_ready() {
        let thunk = Thunk::ready(vec![1, 2]);
        assert!(thunk.is_forced());
        assert_eq!(thunk.get(), &vec![1, 2]);
    }

    #[test]
    fn test_deferred_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let thunk = Thunk::deferred({
            let calls = calls.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                "forced"
            }
        });
        assert!(!thunk.is_forced());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(*thunk.get(), "forced");
        assert_eq!(*thunk.get(), "forced");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deferred_concurrent_access() {
        let calls = Arc::new(AtomicUsize::new(0));
        let thunk = Arc::new(Thunk::deferred({
            let calls = calls.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            }
        }));
        let handles = (0..8)
            .map(|_| {
                let thunk = thunk.clone();
                std::thread::spawn(move || *thunk.get())
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
