//! Deferred cross-reference resolution
//!
//! Grounded on `DelayedCaller`/`DalayedIdToInstanceMapper` in
//! `core/utils/delayed_caller.py`: a source document may reference an
//! id before the entity it names has been constructed (EA-XMI in
//! particular interleaves forward references freely). Rather than
//! requiring a topological pre-pass, every reference registers a
//! callback against the referenced id and the callback fires the
//! moment that id's instance is registered, or -- if it never is -- at
//! an explicit [`IdResolver::flush`].

use std::collections::VecDeque;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::errors::{TranslationError, TranslationResult};

/// Maps source ids to instances of `V`, and queues deferred callbacks
/// for ids not yet seen.
///
/// `V` is a [`crate::model::Handle`] in every concrete use: resolution
/// hands the deferred callback a clone of the shared handle, not an
/// owned value.
pub struct IdResolver<V: Clone> {
    id_to_instance: HashMap<String, V>,
    id_to_queue: HashMap<String, VecDeque<Box<dyn FnOnce(V)>>>,
}

impl<V: Clone> Default for IdResolver<V> {
    fn default() -> Self {
        Self {
            id_to_instance: HashMap::new(),
            id_to_queue: HashMap::new(),
        }
    }
}

impl<V: Clone> IdResolver<V> {
    /// Construct an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `id`, failing if `id` is already taken
    /// (invariant I1). Any callbacks already queued for `id` fire
    /// immediately, in FIFO order.
    pub fn register(&mut self, id: impl Into<String>, value: V) -> TranslationResult<()> {
        let id = id.into();
        if self.id_to_instance.contains_key(&id) {
            return Err(TranslationError::DuplicateId(id));
        }
        self.id_to_instance.insert(id.clone(), value.clone());
        self.drain_queue_for(&id, value);
        Ok(())
    }

    /// Register `value` under `id` only if `id` is not already taken.
    /// Used where a dialect strategy may see the same id twice by
    /// construction (e.g. re-visiting a referenced element) without it
    /// being a real duplicate-id error.
    pub fn register_if_absent(&mut self, id: impl Into<String>, value: V) {
        let id = id.into();
        if self.id_to_instance.contains_key(&id) {
            return;
        }
        self.id_to_instance.insert(id.clone(), value.clone());
        self.drain_queue_for(&id, value);
    }

    /// The instance registered under `id`, if any.
    pub fn resolve(&self, id: &str) -> Option<V> {
        self.id_to_instance.get(id).cloned()
    }

    /// Queue `callback` to run with the instance registered under `id`,
    /// once it exists. If `id` is already registered, runs immediately.
    pub fn defer(&mut self, id: impl Into<String>, callback: impl FnOnce(V) + 'static) {
        let id = id.into();
        if let Some(existing) = self.id_to_instance.get(&id).cloned() {
            callback(existing);
            return;
        }
        self.id_to_queue.entry(id).or_default().push_back(Box::new(callback));
    }

    /// Run every still-queued callback against whatever instance its id
    /// resolves to. When `strict` is `true`, any id with a non-empty
    /// queue but no registered instance is a fatal
    /// [`TranslationError::UnresolvedReference`]; when `false`, it is
    /// logged and left unresolved (used for partial/incremental builds
    /// across multiple documents).
    pub fn flush(&mut self, strict: bool) -> TranslationResult<()> {
        let ids: Vec<String> = self.id_to_queue.keys().cloned().collect();
        for id in ids {
            match self.id_to_instance.get(&id).cloned() {
                Some(instance) => self.drain_queue_for(&id, instance),
                None => {
                    let pending = self.id_to_queue.get(&id).map(|q| q.len()).unwrap_or(0);
                    if pending == 0 {
                        continue;
                    }
                    if strict {
                        return Err(TranslationError::UnresolvedReference(id));
                    } else {
                        warn!(id = %id, pending, "couldn't associate referred id with any known instance");
                    }
                }
            }
        }
        Ok(())
    }

    fn drain_queue_for(&mut self, id: &str, instance: V) {
        if let Some(queue) = self.id_to_queue.get_mut(id) {
            while let Some(callback) = queue.pop_front() {
                debug!(id = %id, "resolving deferred reference");
                callback(instance.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_register_then_defer_fires_immediately() {
        let mut resolver: IdResolver<Rc<RefCell<i32>>> = IdResolver::new();
        resolver.register("a", Rc::new(RefCell::new(1))).unwrap();
        let seen = Rc::new(RefCell::new(false));
        let seen_clone = seen.clone();
        resolver.defer("a", move |_v| *seen_clone.borrow_mut() = true);
        assert!(*seen.borrow());
    }

    #[test]
    fn test_defer_then_register_fires_on_register() {
        let mut resolver: IdResolver<Rc<RefCell<i32>>> = IdResolver::new();
        let seen = Rc::new(RefCell::new(false));
        let seen_clone = seen.clone();
        resolver.defer("a", move |_v| *seen_clone.borrow_mut() = true);
        assert!(!*seen.borrow());
        resolver.register("a", Rc::new(RefCell::new(1))).unwrap();
        assert!(*seen.borrow());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut resolver: IdResolver<Rc<RefCell<i32>>> = IdResolver::new();
        resolver.register("a", Rc::new(RefCell::new(1))).unwrap();
        let err = resolver.register("a", Rc::new(RefCell::new(2))).unwrap_err();
        assert!(matches!(err, TranslationError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_flush_non_strict_leaves_unresolved_without_error() {
        let mut resolver: IdResolver<Rc<RefCell<i32>>> = IdResolver::new();
        resolver.defer("missing", |_v| panic!("should never fire"));
        resolver.flush(false).unwrap();
    }

    #[test]
    fn test_flush_strict_errors_on_unresolved() {
        let mut resolver: IdResolver<Rc<RefCell<i32>>> = IdResolver::new();
        resolver.defer("missing", |_v| {});
        let err = resolver.flush(true).unwrap_err();
        assert!(matches!(err, TranslationError::UnresolvedReference(id) if id == "missing"));
    }

    #[test]
    fn test_fifo_order_preserved() {
        let mut resolver: IdResolver<Rc<RefCell<i32>>> = IdResolver::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order_clone = order.clone();
            resolver.defer("a", move |_v| order_clone.borrow_mut().push(i));
        }
        resolver.register("a", Rc::new(RefCell::new(1))).unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
