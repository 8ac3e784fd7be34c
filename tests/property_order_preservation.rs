//! Order preservation: `Interaction.fragments`, `Operation.parameters`
//! and `Enumeration.literals` all match source order.

use uml_ingest_core::model::{Classifier, NamedElement, UmlElement};
use uml_ingest_core::strategy::SupportedFormat;
use uml_ingest_core::{DataSource, Deserializer};

const ORDERED_XMI: &str = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
    <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
    <uml:Model xmi:id="model-1" name="Ordering">
        <packagedElement xmi:type="uml:Enumeration" xmi:id="e-gender" name="Gender">
            <ownedLiteral xmi:id="l-3" name="other"/>
            <ownedLiteral xmi:id="l-1" name="female"/>
            <ownedLiteral xmi:id="l-2" name="male"/>
        </packagedElement>
        <packagedElement xmi:type="uml:Class" xmi:id="c-calc" name="Calculator">
            <ownedOperation xmi:id="op-1" name="combine" visibility="public">
                <ownedParameter xmi:id="p-3" name="third" direction="in"/>
                <ownedParameter xmi:id="p-1" name="first" direction="in"/>
                <ownedParameter xmi:id="p-2" name="second" direction="in"/>
            </ownedOperation>
        </packagedElement>
        <packagedElement xmi:type="uml:Interaction" xmi:id="int-1" name="Combine">
            <lifeline xmi:id="ll-a" name="caller">
                <type xmi:idref="c-calc"/>
            </lifeline>
            <lifeline xmi:id="ll-b" name="callee">
                <type xmi:idref="c-calc"/>
            </lifeline>
            <message xmi:id="m-third" name="sendThird" sendEvent="ll-a" receiveEvent="ll-b"/>
            <message xmi:id="m-first" name="sendFirst" sendEvent="ll-a" receiveEvent="ll-b"/>
            <message xmi:id="m-second" name="sendSecond" sendEvent="ll-a" receiveEvent="ll-b"/>
        </packagedElement>
    </uml:Model>
</xmi:XMI>"#;

#[test]
fn enumeration_literals_keep_source_order() {
    let deserializer = Deserializer::new();
    let model = deserializer
        .translate("model-1", vec![DataSource::from_str(ORDERED_XMI)], Some(SupportedFormat::EaXmi))
        .unwrap();
    let gender = &model.elements.enumerations[0];
    assert_eq!(gender.borrow().literals, vec!["other", "female", "male"]);
}

#[test]
fn operation_parameters_keep_source_order() {
    let deserializer = Deserializer::new();
    let model = deserializer
        .translate("model-1", vec![DataSource::from_str(ORDERED_XMI)], Some(SupportedFormat::EaXmi))
        .unwrap();
    let calculator = &model.elements.classes[0];
    let operation = calculator.borrow().operations()[0].clone();
    let names: Vec<_> = operation.borrow().parameters.iter().map(|p| p.name().map(str::to_string)).collect();
    assert_eq!(names, vec![Some("third".to_string()), Some("first".to_string()), Some("second".to_string())]);
}

#[test]
fn interaction_fragments_keep_message_send_order() {
    let deserializer = Deserializer::new();
    let model = deserializer
        .translate("model-1", vec![DataSource::from_str(ORDERED_XMI)], Some(SupportedFormat::EaXmi))
        .unwrap();
    let interaction = &model.elements.interactions[0];
    let ids: Vec<String> = interaction.borrow().messages.iter().map(|m| m.borrow().id().to_string()).collect();
    assert_eq!(ids, vec!["m-third".to_string(), "m-first".to_string(), "m-second".to_string()]);
    assert_eq!(interaction.borrow().fragments.len(), interaction.borrow().messages.len());
}
