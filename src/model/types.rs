//! Primitive types

use serde::{Deserialize, Serialize};

use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::{impl_named_element, impl_uml_element};

/// The closed set of well-known primitive kinds, plus the
/// free-form string escape hatch dialects use for types the closed
/// set doesn't cover (e.g. EA's raw `EAJava_*` names that the
/// strategy's `ConfigNamespace` mapping table doesn't recognize).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Integral number
    Int,
    /// Real/decimal number
    Real,
    /// Floating point number
    Float,
    /// Text
    String,
    /// Boolean
    Boolean,
    /// Single character
    Char,
    /// Absence of a value (e.g. operation with no return type)
    Void,
    /// A dialect-specific name the closed set didn't map
    Other(String),
}

/// A primitive type entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimitiveType {
    core: ElementCore,
    named: NamedElementCore,
    /// The primitive's kind
    pub kind: PrimitiveKind,
}

impl_named_element!(PrimitiveType, core = core, named = named);

impl PrimitiveType {
    /// Construct a primitive type entity.
    pub fn new(id: impl Into<String>, name: Option<String>, kind: PrimitiveKind) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::{NamedElement, UmlElement};

    #[test]
    fn test_primitive_type_construction() {
        let p = PrimitiveType::new("p1", Some("int".to_string()), PrimitiveKind::Int);
        assert_eq!(p.id(), "p1");
        assert_eq!(p.name(), Some("int"));
        assert_eq!(p.kind, PrimitiveKind::Int);
    }

    #[test]
    fn test_primitive_kind_other_roundtrips_through_json() {
        let p = PrimitiveType::new("p2", None, PrimitiveKind::Other("EAJava_date".to_string()));
        let json = serde_json::to_string(&p).unwrap();
        let back: PrimitiveType = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, PrimitiveKind::Other("EAJava_date".to_string()));
    }
}
