//! JSON-native helpers, used directly by the StarUML MDJ strategy and,
//! once XML has been normalized by [`super::xml`], by every strategy's
//! generic attribute-extraction code.
//!
//! Grounded on `JSONModelProcessingPipe`/`StarumlMDJModelProcessingPipe`
//! in `core/deserialization/formats/staruml_mdj/staruml_mdj_model_processing_pipeline.py`.

use serde_json::{Map, Value};

use crate::errors::{TranslationError, TranslationResult};

/// Replace `data[key]`, an MDJ `{"$ref": "<id>"}` object, with the bare
/// id string under `new_key` (defaulting to `key`). A no-op if `key` is
/// absent or isn't a `$ref` object. Grounded on `_flatten_reference`.
pub fn flatten_reference(data: &mut Map<String, Value>, key: &str, new_key: Option<&str>, remove_key: bool) {
    let Some(reference) = data.get(key) else { return };
    let Some(id) = reference.get("$ref").cloned() else { return };
    if remove_key {
        data.remove(key);
    }
    data.insert(new_key.unwrap_or(key).to_string(), id);
}

/// The string value of `object[key]`, failing with
/// [`TranslationError::InvalidFormat`] if absent or not a string.
pub fn required_str<'a>(object: &'a Map<String, Value>, key: &str) -> TranslationResult<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| TranslationError::invalid_format(format!("missing required key {key}"), "json element"))
}

/// The string value of `object[key]`, or `None` if absent.
pub fn optional_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

/// The array value of `object[key]`, or an empty slice if absent.
pub fn array_of<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    object.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}
