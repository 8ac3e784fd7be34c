//! A JSON document with an unrecognized top-level `_type` matches no
//! strategy and yields `NoStrategyAvailable`.

use uml_ingest_core::{DataSource, Deserializer, TranslationError};

#[test]
fn unrecognized_type_discriminator_yields_no_strategy_available() {
    let json = r#"{"_type": "SomethingElse", "_id": "x1", "name": "Mystery"}"#;
    let deserializer = Deserializer::new();
    let source = DataSource::from_str(json);
    let err = deserializer.translate("model-1", vec![source], None).unwrap_err();
    assert!(matches!(err, TranslationError::NoStrategyAvailable));
}
