//! Capability callbacks dispatched by type
//!
//! Components register `Arc<T>` handles (usually `Arc<dyn SomeTrait>`) and
//! callers invoke a closure on every registered handle of a given type.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

type Entry = Arc<dyn Any + Send + Sync>;

/// Registry of capability objects
#[derive(Default)]
pub struct CallbackHub {
    entries: Mutex<Vec<Entry>>,
}

impl std::fmt::Debug for CallbackHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackHub")
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}

impl CallbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle; registering the same `Arc` again does nothing
    ///
    /// Returns true if the handle was added.
    pub fn register<T>(&self, callback: Arc<T>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let mut entries = self.entries.lock();
        if entries.iter().any(|e| same::<T>(e, &callback)) {
            return false;
        }
        entries.push(Arc::new(callback));
        true
    }

    /// Remove a handle; returns false if it was not registered
    pub fn unregister<T>(&self, callback: &Arc<T>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| !same::<T>(e, callback));
        entries.len() != before
    }

    /// Invoke `f` on every registered `T`, in registration order
    ///
    /// Works on a snapshot, so `f` may register or unregister handles.
    pub fn call<T, F>(&self, mut f: F) -> usize
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnMut(&T),
    {
        let snapshot: Vec<Entry> = self.entries.lock().clone();

        let mut called = 0;
        for entry in &snapshot {
            if let Some(callback) = entry.downcast_ref::<Arc<T>>() {
                f(callback);
                called += 1;
            }
        }

        trace!(kind = std::any::type_name::<T>(), called, "Dispatched callbacks");
        called
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn same<T>(entry: &Entry, callback: &Arc<T>) -> bool
where
    T: ?Sized + Send + Sync + 'static,
{
    entry
        .downcast_ref::<Arc<T>>()
        .is_some_and(|existing| Arc::ptr_eq(existing, callback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait RefreshListener: Send + Sync {
        fn on_refresh(&self, rows: usize);
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl RefreshListener for Counter {
        fn on_refresh(&self, rows: usize) {
            self.0.fetch_add(rows, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_call_reaches_registered_trait_objects() {
        let hub = CallbackHub::new();
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());

        hub.register::<dyn RefreshListener>(a.clone());
        hub.register::<dyn RefreshListener>(b.clone());

        assert_eq!(hub.call::<dyn RefreshListener, _>(|l| l.on_refresh(3)), 2);
        assert_eq!(a.0.load(Ordering::SeqCst), 3);
        assert_eq!(b.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let hub = CallbackHub::new();
        let listener: Arc<dyn RefreshListener> = Arc::new(Counter::default());

        assert!(hub.register(listener.clone()));
        assert!(!hub.register(listener.clone()));
        assert_eq!(hub.len(), 1);

        assert!(hub.unregister(&listener));
        assert!(!hub.unregister(&listener));
        assert!(hub.is_empty());
    }

    #[test]
    fn test_call_filters_by_type() {
        let hub = CallbackHub::new();
        hub.register(Arc::new(String::from("not a listener")));
        hub.register::<dyn RefreshListener>(Arc::new(Counter::default()));

        assert_eq!(hub.call::<dyn RefreshListener, _>(|_| {}), 1);
        assert_eq!(hub.call::<String, _>(|s| assert!(s.contains("listener"))), 1);
        assert_eq!(hub.call::<u32, _>(|_| {}), 0);
    }

    #[test]
    fn test_unregister_during_call() {
        let hub = Arc::new(CallbackHub::new());
        let first: Arc<dyn RefreshListener> = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());
        hub.register(first.clone());
        hub.register::<dyn RefreshListener>(second.clone());

        let h = hub.clone();
        let called = hub.call::<dyn RefreshListener, _>(|l| {
            h.unregister(&first);
            l.on_refresh(1);
        });

        assert_eq!(called, 2);
        assert_eq!(second.0.load(Ordering::SeqCst), 1);
        assert_eq!(hub.len(), 1);
    }
}
