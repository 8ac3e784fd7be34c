//! Shared, composed fields every canonical entity embeds
//!
//! Per the redesign notes, deep inheritance between UML entity classes
//! is replaced with composition: every concrete struct embeds an
//! [`ElementCore`], and every `NamedElement` additionally embeds a
//! [`NamedElementCore`]. Neither type is ever the base of a Rust trait
//! object hierarchy; they are plain fields.

use serde::{Deserialize, Serialize};

/// Visibility of a named element. Defaults to `Public` (I-9: Open
/// Question "Visibility mapping" is resolved as a single default with
/// per-format overrides in each `ConfigNamespace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible outside the owning package
    Public,
    /// Visible only within the owning classifier
    Private,
    /// Visible to subclasses of the owning classifier
    Protected,
    /// Visible within the owning package
    Package,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

impl Visibility {
    /// Parse a source-dialect visibility string, falling back to the
    /// default rather than raising -- per spec this is structural
    /// tolerance, not semantic validation.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "public" => Visibility::Public,
            "private" => Visibility::Private,
            "protected" => Visibility::Protected,
            "package" => Visibility::Package,
            _ => Visibility::Public,
        }
    }
}

/// Fields every canonical entity carries: a stable, source-assigned,
/// non-empty string identifier unique across the model (invariant I1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCore {
    id: String,
}

impl ElementCore {
    /// Construct a new core from a non-empty id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        debug_assert!(!id.is_empty(), "entity id must be non-empty");
        Self { id }
    }

    /// The entity's current id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the id. Callers owning an `IdResolver` registration must
    /// re-register under the new id afterwards (see `id_resolver`).
    pub fn set_id(&mut self, new_id: impl Into<String>) -> String {
        std::mem::replace(&mut self.id, new_id.into())
    }
}

/// Fields shared by every `NamedElement`: a display name and a
/// visibility, composed into the owning struct rather than inherited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NamedElementCore {
    /// Display name, absent when the source omits it
    pub name: Option<String>,
    /// Visibility, defaulting to `Public`
    pub visibility: Visibility,
}

impl NamedElementCore {
    /// Construct with a name and explicit visibility.
    pub fn new(name: Option<String>, visibility: Visibility) -> Self {
        Self { name, visibility }
    }
}

/// Trait implemented by every canonical entity; the sole shared
/// interface in place of inheritance (redesign note: "Deep/multiple
/// inheritance").
pub trait UmlElement {
    /// The entity's stable identifier.
    fn id(&self) -> &str;
}

/// Trait implemented by every `NamedElement` variant.
pub trait NamedElement: UmlElement {
    /// Display name, if the source provided one.
    fn name(&self) -> Option<&str>;
    /// Visibility, defaulting to `Public`.
    fn visibility(&self) -> Visibility;
}

/// Generates `UmlElement`/`NamedElement` impls that forward to a
/// `core: ElementCore` / `named: NamedElementCore` field pair, so each
/// concrete entity only declares the fields it adds on top of those
/// two.
#[macro_export]
macro_rules! impl_uml_element {
    ($ty:ty, core = $field:ident) => {
        impl $crate::model::core::UmlElement for $ty {
            fn id(&self) -> &str {
                self.$field.id()
            }
        }
    };
}

/// As [`impl_uml_element`] but also forwards `NamedElement`.
#[macro_export]
macro_rules! impl_named_element {
    ($ty:ty, core = $core_field:ident, named = $named_field:ident) => {
        $crate::impl_uml_element!($ty, core = $core_field);

        impl $crate::model::core::NamedElement for $ty {
            fn name(&self) -> Option<&str> {
                self.$named_field.name.as_deref()
            }

            fn visibility(&self) -> $crate::model::core::Visibility {
                self.$named_field.visibility
            }
        }
    };
}
