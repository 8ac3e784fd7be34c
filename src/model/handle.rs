//! The reference-counted handle type used for every cross-entity link
//!
//! Per the redesign notes on cyclic references, owning storage for
//! every entity lives in a single `Model`'s [`super::containers::ModelElements`].
//! Any other field that needs to point at an entity -- `Attribute::type_ref`,
//! `Generalization::specific`, a diagram's element list -- holds a
//! clone of the same `Handle`, which is simply a shared, ref-counted
//! pointer: ownership remains with the model's container, every other
//! holder just participates in the shared count. The one genuinely
//! cyclic edge, an entity's back-reference to its owning `Model`, is
//! instead a [`std::rc::Weak`] (see `model::model::Model`), which is
//! the non-owning handle the notes call for.
use std::cell::RefCell;
use std::rc::Rc;

/// A shared, interior-mutable pointer to a canonical entity.
pub type Handle<T> = Rc<RefCell<T>>;

/// Wrap a value in a fresh [`Handle`].
pub fn handle<T>(value: T) -> Handle<T> {
    Rc::new(RefCell::new(value))
}
