//! Packages
//!
//! Grounded on `UmlPackage` in `core/model/umlars_model/uml_elements.py`,
//! whose `packaged_elements` list is the ordered-membership shape this
//! mirrors with a type-erased [`AnyElement`].

use serde::{Deserialize, Serialize};

use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::model::element_ref::AnyElement;
use crate::{impl_named_element, impl_uml_element};

/// A package: a named element owning an ordered list of contained
/// elements (invariant I3 does not name `Package.members`, but source
/// order is preserved for round-tripping regardless).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    core: ElementCore,
    named: NamedElementCore,
    /// Ordered contained elements, in source order
    pub members: Vec<AnyElement>,
}

impl_named_element!(Package, core = core, named = named);

impl Package {
    /// Construct a package with no members yet.
    pub fn new(id: impl Into<String>, name: Option<String>, visibility: Visibility) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, visibility),
            members: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classifier::Class;
    use crate::model::core::UmlElement;
    use crate::model::handle::handle;

    #[test]
    fn test_package_member_order_preserved() {
        let mut pkg = Package::new("p1", Some("model".to_string()), Visibility::Public);
        let c1 = handle(Class::new("c1", Some("Car".to_string()), Visibility::Public));
        let c2 = handle(Class::new("c2", Some("Driver".to_string()), Visibility::Public));
        pkg.members.push(AnyElement::Class(c1));
        pkg.members.push(AnyElement::Class(c2));
        let ids: Vec<_> = pkg.members.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
        assert_eq!(pkg.id(), "p1");
    }
}
