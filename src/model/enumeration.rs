//! Enumerations

use serde::{Deserialize, Serialize};

use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::{impl_named_element, impl_uml_element};

/// An enumeration entity: a named element with an ordered list of
/// literal strings. Order is significant (invariant I3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enumeration {
    core: ElementCore,
    named: NamedElementCore,
    /// Ordered literal names, in source order
    pub literals: Vec<String>,
}

impl_named_element!(Enumeration, core = core, named = named);

impl Enumeration {
    /// Construct an enumeration with no literals yet.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            literals: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::UmlElement;

    #[test]
    fn test_enumeration_preserves_literal_order() {
        let mut e = Enumeration::new("e1", Some("Gender".to_string()));
        e.literals.push("MALE".to_string());
        e.literals.push("FEMALE".to_string());
        assert_eq!(e.id(), "e1");
        assert_eq!(e.literals, vec!["MALE", "FEMALE"]);
    }
}
