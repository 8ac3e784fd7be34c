//! Strict reference closure, forward references resolving regardless
//! of source order, and cross-document resolution for Papyrus.

use uml_ingest_core::model::{Classifier, NamedElement, UmlElement};
use uml_ingest_core::strategy::SupportedFormat;
use uml_ingest_core::{DataSource, Deserializer};

const FORWARD_REF_XMI: &str = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
    <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
    <uml:Model xmi:id="model-1" name="Forward">
        <packagedElement xmi:type="uml:Class" xmi:id="c-book" name="Book">
            <ownedAttribute xmi:id="a-title" name="title">
                <type xmi:idref="t-string"/>
            </ownedAttribute>
        </packagedElement>
        <packagedElement xmi:type="uml:PrimitiveType" xmi:id="t-string" name="String"/>
    </uml:Model>
</xmi:XMI>"#;

const BACKWARD_REF_XMI: &str = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
    <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
    <uml:Model xmi:id="model-1" name="Backward">
        <packagedElement xmi:type="uml:PrimitiveType" xmi:id="t-string" name="String"/>
        <packagedElement xmi:type="uml:Class" xmi:id="c-book" name="Book">
            <ownedAttribute xmi:id="a-title" name="title">
                <type xmi:idref="t-string"/>
            </ownedAttribute>
        </packagedElement>
    </uml:Model>
</xmi:XMI>"#;

#[test]
fn forward_and_backward_type_references_resolve_the_same_way() {
    let deserializer = Deserializer::new();
    let forward = deserializer
        .translate("model-1", vec![DataSource::from_str(FORWARD_REF_XMI)], Some(SupportedFormat::EaXmi))
        .unwrap();
    let backward = deserializer
        .translate("model-1", vec![DataSource::from_str(BACKWARD_REF_XMI)], Some(SupportedFormat::EaXmi))
        .unwrap();

    for model in [&forward, &backward] {
        let book = &model.elements.classes[0];
        let attribute = book.borrow().attributes()[0].clone();
        let type_ref = attribute.borrow().type_ref.as_ref().expect("attribute type should resolve").id();
        assert_eq!(type_ref, "t-string");
    }
}

#[test]
fn strict_build_fails_when_a_reference_never_resolves() {
    let dangling = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
        <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
        <uml:Model xmi:id="model-1" name="Dangling">
            <packagedElement xmi:type="uml:Generalization" xmi:id="g1" specific="c-missing-1" general="c-missing-2"/>
        </uml:Model>
    </xmi:XMI>"#;
    let deserializer = Deserializer::new();
    let err = deserializer
        .translate("model-1", vec![DataSource::from_str(dangling)], Some(SupportedFormat::EaXmi))
        .unwrap_err();
    assert!(matches!(err, uml_ingest_core::TranslationError::UnresolvedReference(_)));
}

#[test]
fn papyrus_notation_element_resolves_against_the_paired_uml_document() {
    let uml = r#"<uml:Model xmi:id="model" name="Car" xmlns:xmi="http://www.omg.org/XMI" xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
        <packagedElement xmi:type="uml:Class" xmi:id="cls-car" name="Car"/>
    </uml:Model>"#;
    let notation = r#"<notation:Diagram xmi:id="diagram-1" name="CarDiagram" type="PapyrusUMLClassDiagram" xmlns:xmi="http://www.omg.org/XMI" xmlns:notation="http://www.eclipse.org/gmf/runtime/1.0.2/notation">
        <children xmi:id="shape-1" element="cls-car"/>
    </notation:Diagram>"#;

    let deserializer = Deserializer::new();
    let sources = vec![DataSource::from_str(uml), DataSource::from_str(notation)];
    let model = deserializer.translate("model-1", sources, Some(SupportedFormat::Papyrus)).unwrap();

    let diagram = &model.diagrams.class_diagrams[0];
    assert_eq!(diagram.name(), Some("CarDiagram"));
    let referenced_id = &diagram.elements.element_ids[0];
    assert!(model.elements.classes.iter().any(|c| c.borrow().id() == referenced_id));
}
