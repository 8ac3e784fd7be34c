//! Attributes, operations and parameters

use serde::{Deserialize, Serialize};

use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::model::element_ref::TypeRef;
use crate::{impl_named_element, impl_uml_element};

/// The boolean flag set `Attribute` carries. Kept as a
/// small struct rather than seven loose `bool` fields so construct
/// operations can pass and default it as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// `static` modifier
    pub is_static: bool,
    /// `ordered` modifier (applies to multi-valued features)
    pub is_ordered: bool,
    /// `unique` modifier
    pub is_unique: bool,
    /// `readOnly` modifier (Attribute only; Operation ignores it)
    pub is_read_only: bool,
    /// `query` modifier
    pub is_query: bool,
    /// `derived` modifier
    pub is_derived: bool,
    /// `derivedUnion` modifier
    pub is_derived_union: bool,
}

/// A classifier attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    core: ElementCore,
    named: NamedElementCore,
    /// The attribute's type, resolved once the referenced entity exists
    pub type_ref: Option<TypeRef>,
    /// The classifier this attribute belongs to
    pub classifier_id: String,
    /// Boolean modifier set
    pub flags: FeatureFlags,
}

impl_named_element!(Attribute, core = core, named = named);

impl Attribute {
    /// Construct an attribute with an as-yet-unresolved type.
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
        classifier_id: impl Into<String>,
        flags: FeatureFlags,
    ) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, visibility),
            type_ref: None,
            classifier_id: classifier_id.into(),
            flags,
        }
    }
}

/// The direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterDirection {
    /// Input parameter
    In,
    /// Output parameter
    Out,
    /// Input/output parameter
    Inout,
    /// The operation's return slot, modelled as a parameter
    Return,
}

/// An operation parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    core: ElementCore,
    named: NamedElementCore,
    /// The parameter's type
    pub type_ref: Option<TypeRef>,
    /// Parameter direction
    pub direction: ParameterDirection,
}

impl_named_element!(Parameter, core = core, named = named);

impl Parameter {
    /// Construct a parameter with an as-yet-unresolved type.
    pub fn new(id: impl Into<String>, name: Option<String>, direction: ParameterDirection) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            type_ref: None,
            direction,
        }
    }
}

/// A classifier operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    core: ElementCore,
    named: NamedElementCore,
    /// Ordered parameters, in source order (invariant I3)
    pub parameters: Vec<Parameter>,
    /// Return type, if any
    pub return_type: Option<TypeRef>,
    /// Whether the operation is abstract
    pub is_abstract: bool,
    /// Declared exception type names
    pub exceptions: Vec<String>,
    /// The classifier this operation belongs to
    pub classifier_id: String,
    /// Boolean modifier set (readOnly is not meaningful for operations
    /// and is always false)
    pub flags: FeatureFlags,
}

impl_named_element!(Operation, core = core, named = named);

impl Operation {
    /// Construct an operation with no parameters yet.
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
        classifier_id: impl Into<String>,
    ) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, visibility),
            parameters: Vec::new(),
            return_type: None,
            is_abstract: false,
            exceptions: Vec::new(),
            classifier_id: classifier_id.into(),
            flags: FeatureFlags::default(),
        }
    }
}
