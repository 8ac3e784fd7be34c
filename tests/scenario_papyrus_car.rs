//! Papyrus pair (`.uml` + `.notation`) for the same car model,
//! checking every diagram element resolves to an entity the `.uml`
//! document defines.

use uml_ingest_core::model::{NamedElement, UmlElement};
use uml_ingest_core::strategy::SupportedFormat;
use uml_ingest_core::{DataSource, Deserializer};

const CAR_UML: &str = r#"<uml:Model xmi:id="model" name="CarModel" xmlns:xmi="http://www.omg.org/XMI" xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
    <packagedElement xmi:type="uml:Interface" xmi:id="cls-movable" name="Movable"/>
    <packagedElement xmi:type="uml:Class" xmi:id="cls-person" name="Person"/>
    <packagedElement xmi:type="uml:Class" xmi:id="cls-driver" name="Driver"/>
    <packagedElement xmi:type="uml:Class" xmi:id="cls-car" name="Car"/>
    <packagedElement xmi:type="uml:Class" xmi:id="cls-wheel" name="Wheel"/>
</uml:Model>"#;

const CAR_NOTATION: &str = r#"<notation:Diagram xmi:id="diagram-1" name="CarClassDiagram" type="PapyrusUMLClassDiagram" xmlns:xmi="http://www.omg.org/XMI" xmlns:notation="http://www.eclipse.org/gmf/runtime/1.0.2/notation">
    <children xmi:id="shape-movable" element="cls-movable"/>
    <children xmi:id="shape-person" element="cls-person"/>
    <children xmi:id="shape-driver" element="cls-driver"/>
    <children xmi:id="shape-car" element="cls-car"/>
    <children xmi:id="shape-wheel" element="cls-wheel"/>
</notation:Diagram>"#;

#[test]
fn papyrus_pair_builds_the_same_classes_as_the_uml_document() {
    let deserializer = Deserializer::new();
    let sources = vec![DataSource::from_str(CAR_UML), DataSource::from_str(CAR_NOTATION)];
    let model = deserializer.translate("model-1", sources, Some(SupportedFormat::Papyrus)).unwrap();

    let mut class_names: Vec<_> = model.elements.classes.iter().map(|c| c.borrow().name().unwrap_or("").to_string()).collect();
    class_names.sort();
    assert_eq!(class_names, vec!["Car", "Driver", "Person", "Wheel"]);
    assert_eq!(model.elements.interfaces.len(), 1);
    assert_eq!(model.elements.interfaces[0].borrow().name(), Some("Movable"));
}

#[test]
fn every_notation_diagram_element_resolves_to_a_uml_defined_entity() {
    let deserializer = Deserializer::new();
    let sources = vec![DataSource::from_str(CAR_UML), DataSource::from_str(CAR_NOTATION)];
    let model = deserializer.translate("model-1", sources, Some(SupportedFormat::Papyrus)).unwrap();

    assert_eq!(model.diagrams.class_diagrams.len(), 1);
    let diagram = &model.diagrams.class_diagrams[0];
    assert_eq!(diagram.elements.element_ids.len(), 5);

    let known_ids: std::collections::HashSet<String> = model
        .elements
        .classes
        .iter()
        .map(|c| c.borrow().id().to_string())
        .chain(model.elements.interfaces.iter().map(|i| i.borrow().id().to_string()))
        .collect();

    for element_id in &diagram.elements.element_ids {
        assert!(known_ids.contains(element_id), "diagram references unresolved id {element_id}");
    }
}
