//! Contracts for collaborators outside this crate's scope
//!
//! A real deployment persists translated models somewhere (object
//! store, document database); this crate only defines the contract it
//! expects of that collaborator, and ships an in-memory
//! test double for exercising the contract in this crate's own tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::errors::TranslationResult;
use crate::model::Model;

/// Where a translated [`Model`] is persisted once built. Out of scope
/// for this crate to implement for real; this is the contract a
/// caller's repository adapter must satisfy.
pub trait ModelRepository {
    /// Persist `model` under `id`, overwriting any prior model with
    /// the same id.
    fn save(&self, id: &str, model: &Model) -> TranslationResult<()>;

    /// Retrieve the model previously saved under `id`, if any.
    fn get(&self, id: &str) -> TranslationResult<Option<Model>>;
}

/// An in-memory [`ModelRepository`], useful only for tests -- this
/// crate has no production persistence concerns.
#[derive(Default)]
pub struct InMemoryModelRepository {
    models: RefCell<HashMap<String, Model>>,
}

impl InMemoryModelRepository {
    /// Construct an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelRepository for InMemoryModelRepository {
    fn save(&self, id: &str, model: &Model) -> TranslationResult<()> {
        self.models.borrow_mut().insert(id.to_string(), model.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> TranslationResult<Option<Model>> {
        Ok(self.models.borrow().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_repository_round_trips() {
        let repo = InMemoryModelRepository::new();
        let model = Model::new("m1", Some("library".to_string()));
        repo.save("m1", &model).unwrap();
        let fetched = repo.get("m1").unwrap().unwrap();
        assert_eq!(fetched.metadata.len(), 0);
    }

    #[test]
    fn test_get_missing_is_none() {
        let repo = InMemoryModelRepository::new();
        assert!(repo.get("missing").unwrap().is_none());
    }
}
