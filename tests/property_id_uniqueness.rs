//! Id uniqueness across a translation, and registry isolation across
//! independent `Deserializer` instances.

use std::collections::HashSet;

use proptest::prelude::*;

use uml_ingest_core::model::UmlElement;
use uml_ingest_core::strategy::SupportedFormat;
use uml_ingest_core::{DataSource, Deserializer};

fn ea_xmi_with_classes(names: &[String]) -> String {
    let packaged: String = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!(r#"<packagedElement xmi:type="uml:Class" xmi:id="c{i}" name="{name}"/>"#))
        .collect();
    format!(
        r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
            <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
            <uml:Model xmi:id="model-1" name="Generated">{packaged}</uml:Model>
        </xmi:XMI>"#
    )
}

proptest! {
    #[test]
    fn every_generated_class_keeps_a_distinct_id(count in 1usize..12) {
        let names: Vec<String> = (0..count).map(|i| format!("Class{i}")).collect();
        let xml = ea_xmi_with_classes(&names);
        let deserializer = Deserializer::new();
        let model = deserializer
            .translate("model-1", vec![DataSource::from_str(xml)], Some(SupportedFormat::EaXmi))
            .unwrap();

        prop_assert_eq!(model.elements.classes.len(), count);
        let ids: HashSet<String> = model.elements.classes.iter().map(|c| c.borrow().id().to_string()).collect();
        prop_assert_eq!(ids.len(), count);
    }
}

#[test]
fn clear_then_translate_matches_a_fresh_deserializer() {
    let xml_a = ea_xmi_with_classes(&["Alpha".to_string()]);
    let xml_b = ea_xmi_with_classes(&["Beta".to_string(), "Gamma".to_string()]);

    let mut reused = Deserializer::new();
    reused
        .translate("model-a", vec![DataSource::from_str(xml_a)], Some(SupportedFormat::EaXmi))
        .unwrap();
    reused.clear();
    let reused_result = reused
        .translate("model-b", vec![DataSource::from_str(xml_b.clone())], Some(SupportedFormat::EaXmi))
        .unwrap();

    let fresh = Deserializer::new();
    let fresh_result = fresh
        .translate("model-b", vec![DataSource::from_str(xml_b)], Some(SupportedFormat::EaXmi))
        .unwrap();

    assert_eq!(reused_result.elements.classes.len(), fresh_result.elements.classes.len());
    let reused_names: Vec<_> = reused_result.elements.classes.iter().map(|c| c.borrow().id().to_string()).collect();
    let fresh_names: Vec<_> = fresh_result.elements.classes.iter().map(|c| c.borrow().id().to_string()).collect();
    assert_eq!(reused_names, fresh_names);
}
