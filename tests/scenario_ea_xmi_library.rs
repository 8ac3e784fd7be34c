//! EA-XMI library model with 3 classes and 2 bidirectional
//! associations.

use uml_ingest_core::model::{Classifier, NamedElement, UmlElement, Visibility};
use uml_ingest_core::strategy::SupportedFormat;
use uml_ingest_core::{DataSource, Deserializer};

const LIBRARY_XMI: &str = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
    <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
    <uml:Model xmi:id="model-1" name="Library">
        <packagedElement xmi:type="uml:Class" xmi:id="c-a" name="Class A">
            <ownedAttribute xmi:id="attr-a" name="Attribute A" visibility="private"/>
            <ownedAttribute xmi:id="attr-b" name="Attribute B" visibility="private"/>
            <ownedOperation xmi:id="op-a" name="Operation A" visibility="public"/>
            <ownedOperation xmi:id="op-b" name="Operation B" visibility="public"/>
        </packagedElement>
        <packagedElement xmi:type="uml:Class" xmi:id="c-b" name="Class B"/>
        <packagedElement xmi:type="uml:Class" xmi:id="c-c" name="Class C"/>
        <packagedElement xmi:type="uml:Association" xmi:id="assoc-ab" name="Association A">
            <ownedEnd xmi:id="end-b" name="role b">
                <type xmi:idref="c-b"/>
            </ownedEnd>
            <ownedEnd xmi:id="end-a" name="role a">
                <type xmi:idref="c-a"/>
            </ownedEnd>
        </packagedElement>
        <packagedElement xmi:type="uml:Association" xmi:id="assoc-ac" name="Association B">
            <ownedEnd xmi:id="end-a2" name="role a2">
                <type xmi:idref="c-a"/>
            </ownedEnd>
            <ownedEnd xmi:id="end-c" name="role c">
                <type xmi:idref="c-c"/>
            </ownedEnd>
        </packagedElement>
    </uml:Model>
</xmi:XMI>"#;

#[test]
fn library_model_has_three_classes_and_two_associations() {
    let deserializer = Deserializer::new();
    let model = deserializer
        .translate("model-1", vec![DataSource::from_str(LIBRARY_XMI)], Some(SupportedFormat::EaXmi))
        .unwrap();

    assert_eq!(model.elements.classes.len(), 3);
    assert_eq!(model.elements.associations.len(), 2);

    let class_a = model
        .elements
        .classes
        .iter()
        .find(|c| c.borrow().name() == Some("Class A"))
        .expect("Class A should be present");
    let class_a = class_a.borrow();
    assert_eq!(class_a.attributes().len(), 2);
    for attribute in class_a.attributes() {
        assert_eq!(attribute.borrow().visibility(), Visibility::Private);
    }
    assert_eq!(class_a.operations().len(), 2);
    for operation in class_a.operations() {
        assert_eq!(operation.borrow().visibility(), Visibility::Public);
    }
}

#[test]
fn association_a_ends_carry_expected_roles_and_elements() {
    let deserializer = Deserializer::new();
    let model = deserializer
        .translate("model-1", vec![DataSource::from_str(LIBRARY_XMI)], Some(SupportedFormat::EaXmi))
        .unwrap();

    let association_a = model
        .elements
        .associations
        .iter()
        .find(|a| a.borrow().name() == Some("Association A"))
        .expect("Association A should be present");
    let association_a = association_a.borrow();

    let end1 = association_a.end1.borrow();
    let end2 = association_a.end2.borrow();
    let roles: std::collections::HashSet<_> =
        [end1.role.clone(), end2.role.clone()].into_iter().flatten().collect();
    assert_eq!(roles, ["role a".to_string(), "role b".to_string()].into_iter().collect());

    assert_eq!(end1.element.id(), "c-b");
    assert_eq!(end2.element.id(), "c-a");
}
