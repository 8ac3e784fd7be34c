//! A format's constant tables, collected into one lookup surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::path::ConfigPath;
use crate::errors::{TranslationError, TranslationResult};

/// The dialect-specific constant tables a strategy consults while
/// walking its source document: XML/JSON tag names, attribute names,
/// and any other dialect vocabulary, grouped the way
/// `ea_constants.py`/`staruml_constants.py` group theirs (`TAGS`,
/// `ATTRIBUTES`, and an `EXTENDED_*` pair of tables EA layers on top).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigNamespace {
    groups: HashMap<String, HashMap<String, String>>,
}

impl ConfigNamespace {
    /// Construct an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define one named group of key/value pairs, e.g.
    /// `.with_group("TAGS", [("model", "uml:Model")])`.
    pub fn with_group<I, K, V>(mut self, group: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.groups.entry(group.into()).or_default();
        for (k, v) in entries {
            table.insert(k.into(), v.into());
        }
        self
    }

    /// Resolve a path of the form `group.key` built by [`ConfigPath`]
    /// against this namespace. A path with more than two segments, or
    /// any segment not present in its group, is a
    /// [`TranslationError::Configuration`] -- a strategy author's
    /// mistake, never a data error.
    pub fn resolve(&self, path: &ConfigPath) -> TranslationResult<&str> {
        let segments = path.segments();
        let (group, key) = match segments {
            [group, key] => (group, key),
            _ => {
                return Err(TranslationError::Configuration(format!(
                    "expected a two-segment group.key path, got {:?}",
                    segments
                )))
            }
        };
        self.groups
            .get(group)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .ok_or_else(|| {
                TranslationError::Configuration(format!("no such configuration key: {group}.{key}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::path::ConfigPath;

    #[test]
    fn test_resolve_known_key() {
        let ns = ConfigNamespace::new().with_group("TAGS", [("model", "uml:Model")]);
        let path = ConfigPath::new().field("TAGS").field("model");
        assert_eq!(ns.resolve(&path).unwrap(), "uml:Model");
    }

    #[test]
    fn test_resolve_unknown_key_is_configuration_error() {
        let ns = ConfigNamespace::new().with_group("TAGS", [("model", "uml:Model")]);
        let path = ConfigPath::new().field("TAGS").field("bogus");
        let err = ns.resolve(&path).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
