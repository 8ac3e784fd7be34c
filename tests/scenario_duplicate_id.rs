//! Two sources carrying the same class id under different names must
//! raise `DuplicateId`.

use uml_ingest_core::strategy::SupportedFormat;
use uml_ingest_core::{DataSource, Deserializer, TranslationError};

fn class_xmi(name: &str) -> String {
    format!(
        r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
            <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
            <uml:Model xmi:id="model-1" name="Shared">
                <packagedElement xmi:type="uml:Class" xmi:id="shared-id" name="{name}"/>
            </uml:Model>
        </xmi:XMI>"#
    )
}

#[test]
fn same_class_id_different_names_raises_duplicate_id() {
    let first = class_xmi("FirstName");
    let second = class_xmi("SecondName");
    let deserializer = Deserializer::new();
    let sources = vec![DataSource::from_str(first), DataSource::from_str(second)];
    let err = deserializer.translate("model-1", sources, Some(SupportedFormat::EaXmi)).unwrap_err();
    assert!(matches!(err, TranslationError::DuplicateId(id) if id == "shared-id"));
}
