//! Type-erased references used where a field may point at one of
//! several entity kinds (`Attribute.type`, `Dependency.client`,
//! `Lifeline.represents`, ...).
//!
//! Each variant holds a [`Handle`] rather than a bare id, so once a
//! reference is resolved by the id-resolver it stays a live, shared
//! pointer at the referenced entity for the lifetime of the model.

use serde::{Deserialize, Serialize};

use crate::model::classifier::{Class, Classifier, DataType, Interface};
use crate::model::core::{NamedElement, UmlElement};
use crate::model::enumeration::Enumeration;
use crate::model::feature::{Attribute, Operation};
use crate::model::handle::Handle;
use crate::model::interaction::Interaction;
use crate::model::package::Package;
use crate::model::relationship::{Association, Dependency, DirectedAssociation, Generalization, Realization};
use crate::model::types::PrimitiveType;

/// A reference to any entity usable as a feature's type
/// (`PrimitiveType | Class | Interface | DataType | Enumeration`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeRef {
    /// Reference to a primitive type
    Primitive(Handle<PrimitiveType>),
    /// Reference to a class
    Class(Handle<Class>),
    /// Reference to an interface
    Interface(Handle<Interface>),
    /// Reference to a data type
    DataType(Handle<DataType>),
    /// Reference to an enumeration
    Enumeration(Handle<Enumeration>),
}

impl TypeRef {
    /// The id of the referenced entity, regardless of variant.
    pub fn id(&self) -> String {
        match self {
            TypeRef::Primitive(h) => h.borrow().id().to_string(),
            TypeRef::Class(h) => h.borrow().id().to_string(),
            TypeRef::Interface(h) => h.borrow().id().to_string(),
            TypeRef::DataType(h) => h.borrow().id().to_string(),
            TypeRef::Enumeration(h) => h.borrow().id().to_string(),
        }
    }
}

/// A reference to any classifier (`Class | Interface | DataType`), used
/// by `Dependency.client`/`.supplier` and `AssociationEnd.element`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifierRef {
    /// Reference to a class
    Class(Handle<Class>),
    /// Reference to an interface
    Interface(Handle<Interface>),
    /// Reference to a data type
    DataType(Handle<DataType>),
}

impl ClassifierRef {
    /// The id of the referenced classifier, regardless of variant.
    pub fn id(&self) -> String {
        match self {
            ClassifierRef::Class(h) => h.borrow().id().to_string(),
            ClassifierRef::Interface(h) => h.borrow().id().to_string(),
            ClassifierRef::DataType(h) => h.borrow().id().to_string(),
        }
    }
}

/// A reference to a `Class` or `Interface`, used by `Lifeline.represents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassOrInterfaceRef {
    /// Reference to a class
    Class(Handle<Class>),
    /// Reference to an interface
    Interface(Handle<Interface>),
}

impl ClassOrInterfaceRef {
    /// The id of the referenced entity, regardless of variant.
    pub fn id(&self) -> String {
        match self {
            ClassOrInterfaceRef::Class(h) => h.borrow().id().to_string(),
            ClassOrInterfaceRef::Interface(h) => h.borrow().id().to_string(),
        }
    }
}

/// Any element that may sit in a [`Package`]'s ordered member list
/// (an ordered list of contained elements).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnyElement {
    /// A class
    Class(Handle<Class>),
    /// An interface
    Interface(Handle<Interface>),
    /// A data type
    DataType(Handle<DataType>),
    /// An enumeration
    Enumeration(Handle<Enumeration>),
    /// A primitive type
    PrimitiveType(Handle<PrimitiveType>),
    /// An association
    Association(Handle<Association>),
    /// A directed association (covers Aggregation/Composition, which
    /// wrap the same shape)
    DirectedAssociation(Handle<DirectedAssociation>),
    /// A generalization
    Generalization(Handle<Generalization>),
    /// A dependency
    Dependency(Handle<Dependency>),
    /// A realization
    Realization(Handle<Realization>),
    /// An interaction
    Interaction(Handle<Interaction>),
    /// A nested package
    Package(Handle<Package>),
}

impl AnyElement {
    /// The id of the wrapped element, regardless of variant.
    pub fn id(&self) -> String {
        match self {
            AnyElement::Class(h) => h.borrow().id().to_string(),
            AnyElement::Interface(h) => h.borrow().id().to_string(),
            AnyElement::DataType(h) => h.borrow().id().to_string(),
            AnyElement::Enumeration(h) => h.borrow().id().to_string(),
            AnyElement::PrimitiveType(h) => h.borrow().id().to_string(),
            AnyElement::Association(h) => h.borrow().id().to_string(),
            AnyElement::DirectedAssociation(h) => h.borrow().id().to_string(),
            AnyElement::Generalization(h) => h.borrow().id().to_string(),
            AnyElement::Dependency(h) => h.borrow().id().to_string(),
            AnyElement::Realization(h) => h.borrow().id().to_string(),
            AnyElement::Interaction(h) => h.borrow().id().to_string(),
            AnyElement::Package(h) => h.borrow().id().to_string(),
        }
    }

    /// Narrow to a [`TypeRef`], when this element is one of the five
    /// kinds a feature's type may reference. `None` if a reference
    /// resolved to, say, an association -- a data error the caller
    /// should surface, not silently coerce.
    pub fn as_type_ref(&self) -> Option<TypeRef> {
        match self {
            AnyElement::PrimitiveType(h) => Some(TypeRef::Primitive(h.clone())),
            AnyElement::Class(h) => Some(TypeRef::Class(h.clone())),
            AnyElement::Interface(h) => Some(TypeRef::Interface(h.clone())),
            AnyElement::DataType(h) => Some(TypeRef::DataType(h.clone())),
            AnyElement::Enumeration(h) => Some(TypeRef::Enumeration(h.clone())),
            _ => None,
        }
    }

    /// Narrow to a [`ClassifierRef`], when this element is a
    /// `Class`/`Interface`/`DataType`.
    pub fn as_classifier_ref(&self) -> Option<ClassifierRef> {
        match self {
            AnyElement::Class(h) => Some(ClassifierRef::Class(h.clone())),
            AnyElement::Interface(h) => Some(ClassifierRef::Interface(h.clone())),
            AnyElement::DataType(h) => Some(ClassifierRef::DataType(h.clone())),
            _ => None,
        }
    }

    /// Narrow to a [`ClassOrInterfaceRef`], when this element is a
    /// `Class`/`Interface`.
    pub fn as_class_or_interface_ref(&self) -> Option<ClassOrInterfaceRef> {
        match self {
            AnyElement::Class(h) => Some(ClassOrInterfaceRef::Class(h.clone())),
            AnyElement::Interface(h) => Some(ClassOrInterfaceRef::Interface(h.clone())),
            _ => None,
        }
    }

    /// Narrow to a `Handle<Class>`, when this element is a `Class`.
    pub fn as_class(&self) -> Option<Handle<Class>> {
        match self {
            AnyElement::Class(h) => Some(h.clone()),
            _ => None,
        }
    }

    /// Whether `self` and `other` describe the identical declaration --
    /// same variant and same own fields -- rather than merely sharing
    /// an id. Compares only fields fixed at construction time, not
    /// collections populated afterwards (`Class::realizations`,
    /// `Package::members`, ...), since those can reach back through a
    /// shared [`Handle`] to the very element being compared.
    pub fn structurally_eq(&self, other: &AnyElement) -> bool {
        match (self, other) {
            (AnyElement::Class(a), AnyElement::Class(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name() == b.name() && a.visibility() == b.visibility() && a.is_abstract == b.is_abstract
            }
            (AnyElement::Interface(a), AnyElement::Interface(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name() == b.name() && a.visibility() == b.visibility()
            }
            (AnyElement::DataType(a), AnyElement::DataType(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name() == b.name() && a.visibility() == b.visibility()
            }
            (AnyElement::Enumeration(a), AnyElement::Enumeration(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name() == b.name() && a.literals == b.literals
            }
            (AnyElement::PrimitiveType(a), AnyElement::PrimitiveType(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name() == b.name() && a.kind == b.kind
            }
            (AnyElement::Package(a), AnyElement::Package(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name() == b.name() && a.visibility() == b.visibility()
            }
            (AnyElement::Association(a), AnyElement::Association(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.end1.borrow().element.id() == b.end1.borrow().element.id()
                    && a.end2.borrow().element.id() == b.end2.borrow().element.id()
            }
            (AnyElement::DirectedAssociation(a), AnyElement::DirectedAssociation(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.source.borrow().element.id() == b.source.borrow().element.id()
                    && a.target.borrow().element.id() == b.target.borrow().element.id()
            }
            (AnyElement::Generalization(a), AnyElement::Generalization(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.specific.borrow().id() == b.specific.borrow().id() && a.general.borrow().id() == b.general.borrow().id()
            }
            (AnyElement::Dependency(a), AnyElement::Dependency(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.client.id() == b.client.id() && a.supplier.id() == b.supplier.id()
            }
            (AnyElement::Realization(a), AnyElement::Realization(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.dependency.client.id() == b.dependency.client.id() && a.dependency.supplier.id() == b.dependency.supplier.id()
            }
            (AnyElement::Interaction(a), AnyElement::Interaction(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name() == b.name()
            }
            _ => false,
        }
    }

    /// Append `attribute` to this element's ordered attribute list, if
    /// it is a classifier. A no-op otherwise -- the caller logs the
    /// mismatch, this just reports it via the boolean return.
    pub fn push_attribute(&self, attribute: Handle<Attribute>) -> bool {
        match self {
            AnyElement::Class(h) => {
                h.borrow_mut().classifier_mut().attributes.push(attribute);
                true
            }
            AnyElement::Interface(h) => {
                h.borrow_mut().classifier_mut().attributes.push(attribute);
                true
            }
            AnyElement::DataType(h) => {
                h.borrow_mut().classifier_mut().attributes.push(attribute);
                true
            }
            _ => false,
        }
    }

    /// Append `operation` to this element's ordered operation list, if
    /// it is a classifier.
    pub fn push_operation(&self, operation: Handle<Operation>) -> bool {
        match self {
            AnyElement::Class(h) => {
                h.borrow_mut().classifier_mut().operations.push(operation);
                true
            }
            AnyElement::Interface(h) => {
                h.borrow_mut().classifier_mut().operations.push(operation);
                true
            }
            AnyElement::DataType(h) => {
                h.borrow_mut().classifier_mut().operations.push(operation);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::Visibility;
    use crate::model::handle::handle;

    #[test]
    fn test_type_ref_id_forwards_through_variant() {
        let c = handle(Class::new("c1", Some("Car".to_string()), Visibility::Public));
        let t = TypeRef::Class(c);
        assert_eq!(t.id(), "c1");
    }

    #[test]
    fn test_classifier_ref_id_forwards_through_variant() {
        let i = handle(Interface::new("i1", Some("Drivable".to_string()), Visibility::Public));
        let r = ClassifierRef::Interface(i);
        assert_eq!(r.id(), "i1");
    }

    #[test]
    fn test_structurally_eq_matches_identical_classes() {
        let a = AnyElement::Class(handle(Class::new("c1", Some("Car".to_string()), Visibility::Public)));
        let b = AnyElement::Class(handle(Class::new("c1", Some("Car".to_string()), Visibility::Public)));
        assert!(a.structurally_eq(&b));
    }

    #[test]
    fn test_structurally_eq_rejects_differing_fields() {
        let a = AnyElement::Class(handle(Class::new("c1", Some("Car".to_string()), Visibility::Public)));
        let b = AnyElement::Class(handle(Class::new("c1", Some("Truck".to_string()), Visibility::Public)));
        assert!(!a.structurally_eq(&b));
    }

    #[test]
    fn test_structurally_eq_rejects_mismatched_variants() {
        let class = AnyElement::Class(handle(Class::new("c1", Some("Car".to_string()), Visibility::Public)));
        let interface = AnyElement::Interface(handle(Interface::new("c1", Some("Car".to_string()), Visibility::Public)));
        assert!(!class.structurally_eq(&interface));
    }
}
