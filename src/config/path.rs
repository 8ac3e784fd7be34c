//! The explicit stand-in for `ConfigProxy`'s recorded attribute chain.

use serde::{Deserialize, Serialize};

/// An ordered sequence of lookup segments, resolved later against a
/// [`super::ConfigNamespace`]. Lets a strategy refer to
/// `ConfigPath::new().field("TAGS").field("model")` the way the
/// original refers to `Config.TAGS.model` -- one expression, evaluated
/// lazily -- without needing attribute-access interception.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigPath {
    segments: Vec<String>,
}

impl ConfigPath {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field/group segment.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(name.into());
        self
    }

    /// Alias for [`Self::field`], for callers that read `[...]`
    /// indexing as more natural than dotted access (mirrors the
    /// original's `GETATTR`/`GETITEM` distinction, which collapses to
    /// the same string-keyed lookup here).
    pub fn index(self, name: impl Into<String>) -> Self {
        self.field(name)
    }

    /// The path's segments, in access order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_chain_builds_ordered_segments() {
        let path = ConfigPath::new().field("TAGS").field("model");
        assert_eq!(path.segments(), &["TAGS".to_string(), "model".to_string()]);
    }
}
