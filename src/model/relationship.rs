//! Relationships between classifiers
//!
//! Grounded on `UmlGeneralization`/`UmlDependency`/`UmlAssociationBase`
//! in `core/model/umlars_model/uml_elements.py`; `Realization` and the
//! `Aggregation`/`Composition` split are spec-level refinements of the
//! same shapes.

use serde::{Deserialize, Serialize};

use crate::model::core::ElementCore;
use crate::model::element_ref::ClassifierRef;
use crate::model::handle::Handle;
use crate::{impl_uml_element, model::classifier::Class};

/// A generalization: ordered pair `specific -> general`, both classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generalization {
    core: ElementCore,
    /// The more specific class
    pub specific: Handle<Class>,
    /// The more general class
    pub general: Handle<Class>,
}

impl_uml_element!(Generalization, core = core);

impl Generalization {
    /// Construct a generalization edge.
    pub fn new(id: impl Into<String>, specific: Handle<Class>, general: Handle<Class>) -> Self {
        Self {
            core: ElementCore::new(id),
            specific,
            general,
        }
    }
}

/// A dependency between two classifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    core: ElementCore,
    /// The dependent classifier
    pub client: ClassifierRef,
    /// The classifier depended upon
    pub supplier: ClassifierRef,
}

impl_uml_element!(Dependency, core = core);

impl Dependency {
    /// Construct a dependency edge.
    pub fn new(id: impl Into<String>, client: ClassifierRef, supplier: ClassifierRef) -> Self {
        Self {
            core: ElementCore::new(id),
            client,
            supplier,
        }
    }
}

/// A realization: a dependency where the client implements the
/// supplier's contract, e.g. `Class .. |> Interface`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realization {
    /// The underlying dependency shape
    pub dependency: Dependency,
}

impl crate::model::core::UmlElement for Realization {
    fn id(&self) -> &str {
        self.dependency.id()
    }
}

impl Realization {
    /// Construct a realization edge.
    pub fn new(id: impl Into<String>, client: ClassifierRef, supplier: ClassifierRef) -> Self {
        Self {
            dependency: Dependency::new(id, client, supplier),
        }
    }
}

/// Multiplicity of an association end. Defaults to `One`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    /// Exactly one (`1`)
    One,
    /// Zero or one (`0..1`)
    ZeroOrOne,
    /// Zero or more (`0..*`)
    ZeroOrMore,
    /// One or more (`1..*`)
    OneOrMore,
    /// Any other source multiplicity string, tolerated without
    /// validation (non-goal: validating UML semantics beyond
    /// structural well-formedness).
    Custom(String),
}

impl Default for Multiplicity {
    fn default() -> Self {
        Multiplicity::One
    }
}

impl Multiplicity {
    /// Parse a source-dialect multiplicity string. Unrecognized forms
    /// are kept verbatim as `Custom` rather than coerced to a default.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "1" => Multiplicity::One,
            "0..1" => Multiplicity::ZeroOrOne,
            "0..*" | "*" => Multiplicity::ZeroOrMore,
            "1..*" => Multiplicity::OneOrMore,
            other => Multiplicity::Custom(other.to_string()),
        }
    }
}

/// One end of an association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationEnd {
    core: ElementCore,
    /// The classifier this end attaches to
    pub element: ClassifierRef,
    /// The end's role name, if the source provided one
    pub role: Option<String>,
    /// Multiplicity, defaulting to `One`
    pub multiplicity: Multiplicity,
    /// Whether the end is navigable from the opposite end
    pub navigability: bool,
}

impl_uml_element!(AssociationEnd, core = core);

impl AssociationEnd {
    /// Construct an association end with default multiplicity and
    /// navigability.
    pub fn new(id: impl Into<String>, element: ClassifierRef, role: Option<String>) -> Self {
        Self {
            core: ElementCore::new(id),
            element,
            role,
            multiplicity: Multiplicity::default(),
            navigability: true,
        }
    }
}

/// A bidirectional association: exactly two ends, neither privileged
/// (invariant I5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
    core: ElementCore,
    /// First end
    pub end1: Handle<AssociationEnd>,
    /// Second end
    pub end2: Handle<AssociationEnd>,
}

impl_uml_element!(Association, core = core);

impl Association {
    /// Construct an association from two ends.
    pub fn new(id: impl Into<String>, end1: Handle<AssociationEnd>, end2: Handle<AssociationEnd>) -> Self {
        Self {
            core: ElementCore::new(id),
            end1,
            end2,
        }
    }
}

/// A directed association: `end1 == source`, `end2 == target`
/// (invariant I5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectedAssociation {
    core: ElementCore,
    /// Source end
    pub source: Handle<AssociationEnd>,
    /// Target end
    pub target: Handle<AssociationEnd>,
}

impl_uml_element!(DirectedAssociation, core = core);

impl DirectedAssociation {
    /// Construct a directed association.
    pub fn new(id: impl Into<String>, source: Handle<AssociationEnd>, target: Handle<AssociationEnd>) -> Self {
        Self {
            core: ElementCore::new(id),
            source,
            target,
        }
    }
}

/// A shared-ownership directed association (diamond-outline end at
/// `target`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregation {
    /// The underlying directed-association shape
    pub directed: DirectedAssociation,
}

impl crate::model::core::UmlElement for Aggregation {
    fn id(&self) -> &str {
        self.directed.id()
    }
}

impl Aggregation {
    /// Construct an aggregation.
    pub fn new(id: impl Into<String>, source: Handle<AssociationEnd>, target: Handle<AssociationEnd>) -> Self {
        Self {
            directed: DirectedAssociation::new(id, source, target),
        }
    }
}

/// An owned-composition directed association (filled-diamond end at
/// `target`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    /// The underlying directed-association shape
    pub directed: DirectedAssociation,
}

impl crate::model::core::UmlElement for Composition {
    fn id(&self) -> &str {
        self.directed.id()
    }
}

impl Composition {
    /// Construct a composition.
    pub fn new(id: impl Into<String>, source: Handle<AssociationEnd>, target: Handle<AssociationEnd>) -> Self {
        Self {
            directed: DirectedAssociation::new(id, source, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::{UmlElement, Visibility};
    use crate::model::handle::handle;

    fn sample_end(id: &str, class_id: &str) -> Handle<AssociationEnd> {
        let class = handle(Class::new(class_id, Some(class_id.to_string()), Visibility::Public));
        handle(AssociationEnd::new(id, ClassifierRef::Class(class), None))
    }

    #[test]
    fn test_multiplicity_parse_or_default() {
        assert_eq!(Multiplicity::parse_or_default("0..1"), Multiplicity::ZeroOrOne);
        assert_eq!(Multiplicity::parse_or_default("0..*"), Multiplicity::ZeroOrMore);
        assert_eq!(Multiplicity::parse_or_default("1..*"), Multiplicity::OneOrMore);
        assert_eq!(Multiplicity::parse_or_default("3..5"), Multiplicity::Custom("3..5".to_string()));
    }

    #[test]
    fn test_association_exposes_both_ends() {
        let e1 = sample_end("e1", "c1");
        let e2 = sample_end("e2", "c2");
        let assoc = Association::new("a1", e1, e2);
        assert_eq!(assoc.id(), "a1");
    }

    #[test]
    fn test_directed_association_source_target_naming() {
        let source = sample_end("e1", "c1");
        let target = sample_end("e2", "c2");
        let comp = Composition::new("comp1", source, target);
        assert_eq!(comp.id(), "comp1");
        assert_eq!(comp.directed.target.borrow().element.id(), "c2");
    }
}
