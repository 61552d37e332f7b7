// Listener registration set

use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered listener registrations with set semantics
///
/// Identity is the allocation behind the `Arc`, so registering the same
/// listener twice keeps one entry. Notification iterates a snapshot, so a
/// listener may add or remove listeners from inside its callback.
pub struct ListenerSet<L: ?Sized> {
    listeners: Mutex<Vec<Arc<L>>>,
}

impl<L: ?Sized> ListenerSet<L> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Returns false when the listener was already registered
    pub fn add(&self, listener: Arc<L>) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Returns the number of listeners left
    pub fn remove(&self, listener: &Arc<L>) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len()
    }

    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.listeners.lock().clone()
    }

    /// Call `f` for every listener registered at the time of the call
    pub fn notify(&self, mut f: impl FnMut(&L)) {
        for listener in self.snapshot() {
            f(&listener);
        }
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

fn same_listener<L: ?Sized>(a: &Arc<L>, b: &Arc<L>) -> bool {
    // Compare data pointers only; vtable pointers of the same type may differ
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> String;
    }

    struct Fixed(&'static str);

    impl Named for Fixed {
        fn name(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let set: ListenerSet<dyn Named> = ListenerSet::new();
        let a: Arc<dyn Named> = Arc::new(Fixed("a"));

        assert!(set.add(a.clone()));
        assert!(!set.add(a.clone()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_reports_remaining() {
        let set: ListenerSet<dyn Named> = ListenerSet::new();
        let a: Arc<dyn Named> = Arc::new(Fixed("a"));
        let b: Arc<dyn Named> = Arc::new(Fixed("b"));
        set.add(a.clone());
        set.add(b.clone());

        assert_eq!(set.remove(&a), 1);
        assert_eq!(set.remove(&a), 1);
        assert_eq!(set.remove(&b), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_notify_in_registration_order() {
        let set: ListenerSet<dyn Named> = ListenerSet::new();
        set.add(Arc::new(Fixed("first")));
        set.add(Arc::new(Fixed("second")));

        let mut seen = Vec::new();
        set.notify(|l| seen.push(l.name()));
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[test]
    fn test_notify_tolerates_mutation_from_callback() {
        let set: Arc<ListenerSet<dyn Named>> = Arc::new(ListenerSet::new());
        set.add(Arc::new(Fixed("a")));
        set.add(Arc::new(Fixed("b")));

        let mut calls = 0;
        set.notify(|_| {
            calls += 1;
            set.clear();
        });
        // Snapshot still delivered to both
        assert_eq!(calls, 2);
        assert!(set.is_empty());
    }
}
