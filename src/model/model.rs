//! The top-level canonical model

use std::collections::HashMap;
use std::rc::Weak;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::containers::{Diagrams, ModelElements};
use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::{impl_named_element, impl_uml_element};

/// The root of a deserialized UML model: a named element carrying
/// source metadata, the owning element store, and the non-owning
/// diagram views over it.
///
/// `Model` itself is never wrapped in a [`crate::model::handle::Handle`]
/// pointed at by entities inside it -- an entity's back-reference to its
/// owning model (where one is needed) holds a [`Weak`] over the
/// `RefCell<Model>` the caller constructs, breaking the would-be cycle
/// (redesign note: "Cyclic references").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    core: ElementCore,
    named: NamedElementCore,
    /// Arbitrary source metadata (e.g. tool name/version), string-keyed
    pub metadata: HashMap<String, Value>,
    /// The owning element store
    pub elements: ModelElements,
    /// Non-owning diagram views
    pub diagrams: Diagrams,
}

impl_named_element!(Model, core = core, named = named);

impl Model {
    /// Construct an empty model.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            metadata: HashMap::new(),
            elements: ModelElements::default(),
            diagrams: Diagrams::default(),
        }
    }
}

/// A non-owning back-reference an entity may hold to its enclosing
/// model, used only where the builder needs to walk back up (e.g. to
/// look up a sibling by id during lazy resolution).
pub type ModelBackref = Weak<std::cell::RefCell<Model>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::UmlElement;

    #[test]
    fn test_model_starts_empty() {
        let model = Model::new("m1", Some("library".to_string()));
        assert_eq!(model.id(), "m1");
        assert!(model.elements.classes.is_empty());
        assert!(model.diagrams.class_diagrams.is_empty());
        assert!(model.metadata.is_empty());
    }
}
