//! Classifiers: `Class`, `Interface`, `DataType`
//!
//! Grounded on `UmlClassifier`/`UmlClass`/`UmlInterface`/`UmlDataType`
//! in `core/model/umlars_model/uml_elements.py`, which give classifiers
//! ordered attribute/operation lists and let `Class` additionally carry
//! super-classes and realized interfaces.

use serde::{Deserialize, Serialize};

use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::model::feature::{Attribute, Operation};
use crate::model::handle::Handle;
use crate::model::relationship::{Generalization, Realization};
use crate::{impl_named_element, impl_uml_element};

/// Fields shared by every classifier kind, composed rather than
/// inherited (redesign note: "Deep/multiple inheritance").
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassifierCore {
    /// Ordered attributes, in source order (invariant I3)
    pub attributes: Vec<Handle<Attribute>>,
    /// Ordered operations, in source order (invariant I3)
    pub operations: Vec<Handle<Operation>>,
}

/// Behaviour shared by every classifier kind.
pub trait Classifier {
    /// Ordered attribute handles.
    fn attributes(&self) -> &[Handle<Attribute>];
    /// Ordered operation handles.
    fn operations(&self) -> &[Handle<Operation>];
    /// Mutable access to the shared member lists, for the builder to
    /// append to as attributes/operations are constructed.
    fn classifier_mut(&mut self) -> &mut ClassifierCore;
}

/// Generates a [`Classifier`] impl forwarding to a `classifier: ClassifierCore` field.
#[macro_export]
macro_rules! impl_classifier {
    ($ty:ty, classifier = $field:ident) => {
        impl $crate::model::classifier::Classifier for $ty {
            fn attributes(&self) -> &[$crate::model::handle::Handle<$crate::model::feature::Attribute>] {
                &self.$field.attributes
            }

            fn operations(&self) -> &[$crate::model::handle::Handle<$crate::model::feature::Operation>] {
                &self.$field.operations
            }

            fn classifier_mut(&mut self) -> &mut $crate::model::classifier::ClassifierCore {
                &mut self.$field
            }
        }
    };
}

/// A UML class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    core: ElementCore,
    named: NamedElementCore,
    classifier: ClassifierCore,
    /// Whether the class is abstract
    pub is_abstract: bool,
    /// Generalizations naming this class as the `specific` end
    pub super_classes: Vec<Handle<Generalization>>,
    /// Interface realizations naming this class as the `client`
    pub realizations: Vec<Handle<Realization>>,
}

impl_named_element!(Class, core = core, named = named);
impl_classifier!(Class, classifier = classifier);

impl Class {
    /// Construct a class with no members yet.
    pub fn new(id: impl Into<String>, name: Option<String>, visibility: Visibility) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, visibility),
            classifier: ClassifierCore::default(),
            is_abstract: false,
            super_classes: Vec::new(),
            realizations: Vec::new(),
        }
    }
}

/// A UML interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    core: ElementCore,
    named: NamedElementCore,
    classifier: ClassifierCore,
}

impl_named_element!(Interface, core = core, named = named);
impl_classifier!(Interface, classifier = classifier);

impl Interface {
    /// Construct an interface with no members yet.
    pub fn new(id: impl Into<String>, name: Option<String>, visibility: Visibility) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, visibility),
            classifier: ClassifierCore::default(),
        }
    }
}

/// A UML data type (not to be confused with [`super::types::PrimitiveType`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataType {
    core: ElementCore,
    named: NamedElementCore,
    classifier: ClassifierCore,
}

impl_named_element!(DataType, core = core, named = named);
impl_classifier!(DataType, classifier = classifier);

impl DataType {
    /// Construct a data type with no members yet.
    pub fn new(id: impl Into<String>, name: Option<String>, visibility: Visibility) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, visibility),
            classifier: ClassifierCore::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::UmlElement;
    use crate::model::handle::handle;

    #[test]
    fn test_class_starts_concrete_with_no_members() {
        let class = Class::new("c1", Some("Car".to_string()), Visibility::Public);
        assert_eq!(class.id(), "c1");
        assert!(!class.is_abstract);
        assert!(class.attributes().is_empty());
        assert!(class.super_classes.is_empty());
    }

    #[test]
    fn test_class_attribute_order_preserved() {
        let mut class = Class::new("c1", Some("Car".to_string()), Visibility::Public);
        let a1 = handle(Attribute::new(
            "a1",
            Some("speed".to_string()),
            Visibility::Private,
            "c1",
            Default::default(),
        ));
        let a2 = handle(Attribute::new(
            "a2",
            Some("color".to_string()),
            Visibility::Private,
            "c1",
            Default::default(),
        ));
        class.classifier.attributes.push(a1);
        class.classifier.attributes.push(a2);
        let ids: Vec<_> = class.attributes().iter().map(|a| a.borrow().id().to_string()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }
}
