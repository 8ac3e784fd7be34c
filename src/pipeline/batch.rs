//! The unit of work a [`super::Pipe`] consumes and produces.

use std::collections::HashMap;

use serde_json::Value;

/// A chunk of source data plus whatever context the predecessor pipe
/// chose to share with its successors (e.g. "the class id this
/// attribute batch belongs to"). Grounded on `DataBatch` in
/// `core/deserialization/abstract/pipeline_deserialization/pipeline.py`.
#[derive(Debug, Clone)]
pub struct DataBatch {
    /// The payload this pipe stage operates on
    pub data: Value,
    /// Key/value context carried down from the predecessor, if any
    pub parent_context: HashMap<String, Value>,
}

impl DataBatch {
    /// Construct a batch with no parent context.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            parent_context: HashMap::new(),
        }
    }

    /// Construct a batch carrying parent context.
    pub fn with_context(data: Value, parent_context: HashMap<String, Value>) -> Self {
        Self { data, parent_context }
    }

    /// A child batch over new data, inheriting this batch's context and
    /// layering `extra` on top.
    pub fn child(&self, data: Value, extra: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut context = self.parent_context.clone();
        context.extend(extra);
        Self::with_context(data, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_batch_inherits_and_extends_context() {
        let mut ctx = HashMap::new();
        ctx.insert("classifier_id".to_string(), Value::String("c1".to_string()));
        let batch = DataBatch::with_context(Value::Null, ctx);
        let child = batch.child(Value::Bool(true), [("attr_id".to_string(), Value::String("a1".to_string()))]);
        assert_eq!(child.parent_context["classifier_id"], Value::String("c1".to_string()));
        assert_eq!(child.parent_context["attr_id"], Value::String("a1".to_string()));
    }
}
