//! Container entities: the model's owning element store
//! and the non-owning diagram-membership lists layered over it.

use serde::{Deserialize, Serialize};

use crate::model::classifier::{Class, DataType, Interface};
use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::model::enumeration::Enumeration;
use crate::model::handle::Handle;
use crate::model::interaction::Interaction;
use crate::model::package::Package;
use crate::model::relationship::{Association, Dependency, DirectedAssociation, Generalization, Realization};
use crate::model::types::PrimitiveType;
use crate::{impl_named_element, impl_uml_element};

/// The model's sole owning store: every entity lives in exactly one of
/// these parallel sequences. Diagrams reference into this
/// store by id; they never own an entity (invariant I4).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelElements {
    /// Classes, in registration order
    pub classes: Vec<Handle<Class>>,
    /// Interfaces, in registration order
    pub interfaces: Vec<Handle<Interface>>,
    /// Data types, in registration order
    pub data_types: Vec<Handle<DataType>>,
    /// Enumerations, in registration order
    pub enumerations: Vec<Handle<Enumeration>>,
    /// Primitive types, in registration order
    pub primitive_types: Vec<Handle<PrimitiveType>>,
    /// Associations (including Aggregation/Composition), in registration order
    pub associations: Vec<Handle<Association>>,
    /// Directed associations (including Aggregation/Composition), in registration order
    pub directed_associations: Vec<Handle<DirectedAssociation>>,
    /// Generalizations, in registration order
    pub generalizations: Vec<Handle<Generalization>>,
    /// Dependencies, in registration order
    pub dependencies: Vec<Handle<Dependency>>,
    /// Realizations, in registration order
    pub realizations: Vec<Handle<Realization>>,
    /// Interactions, in registration order
    pub interactions: Vec<Handle<Interaction>>,
    /// Packages, in registration order
    pub packages: Vec<Handle<Package>>,
}

/// The ids a [`ClassDiagram`] displays, resolved against
/// [`ModelElements`] rather than owned directly (invariant I4).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassDiagramElements {
    /// Ids of displayed classifiers and relationships
    pub element_ids: Vec<String>,
}

/// The ids a [`SequenceDiagram`] displays, resolved against
/// [`ModelElements`] rather than owned directly (invariant I4).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SequenceDiagramElements {
    /// Ids of displayed interactions (and, transitively, their lifelines)
    pub element_ids: Vec<String>,
}

/// A class diagram: a named view over a subset of [`ModelElements`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDiagram {
    core: ElementCore,
    named: NamedElementCore,
    /// Referenced element ids
    pub elements: ClassDiagramElements,
}

impl_named_element!(ClassDiagram, core = core, named = named);

impl ClassDiagram {
    /// Construct a class diagram with no members yet.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            elements: ClassDiagramElements::default(),
        }
    }
}

/// A sequence diagram: a named view over a subset of [`ModelElements`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceDiagram {
    core: ElementCore,
    named: NamedElementCore,
    /// Referenced element ids
    pub elements: SequenceDiagramElements,
}

impl_named_element!(SequenceDiagram, core = core, named = named);

impl SequenceDiagram {
    /// Construct a sequence diagram with no members yet.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            elements: SequenceDiagramElements::default(),
        }
    }
}

/// Two parallel sequences of class and sequence diagrams.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Diagrams {
    /// Class diagrams, in registration order
    pub class_diagrams: Vec<ClassDiagram>,
    /// Sequence diagrams, in registration order
    pub sequence_diagrams: Vec<SequenceDiagram>,
}
