//! The canonical UML model: entity types, composition
//! helpers, and the owning/non-owning container shapes built from them.

pub mod classifier;
pub mod containers;
pub mod core;
pub mod element_ref;
pub mod enumeration;
pub mod feature;
pub mod handle;
pub mod interaction;
pub mod model;
pub mod package;
pub mod relationship;
pub mod types;

pub use classifier::{Class, Classifier, DataType, Interface};
pub use containers::{ClassDiagram, Diagrams, ModelElements, SequenceDiagram};
pub use core::{NamedElement, UmlElement, Visibility};
pub use element_ref::{AnyElement, ClassOrInterfaceRef, ClassifierRef, TypeRef};
pub use enumeration::Enumeration;
pub use feature::{Attribute, FeatureFlags, Operation, Parameter, ParameterDirection};
pub use handle::{handle, Handle};
pub use interaction::{
    CombinedFragment, Fragment, FragmentOperator, Interaction, InteractionUse, Lifeline, Message, MessageKind,
    MessageSort, OccurrenceSpecification, Operand,
};
pub use model::Model;
pub use package::Package;
pub use relationship::{
    Aggregation, Association, AssociationEnd, Composition, Dependency, DirectedAssociation, Generalization,
    Multiplicity, Realization,
};
pub use types::{PrimitiveKind, PrimitiveType};
