//! Enterprise Architect's XMI 2.1 export dialect.
//!
//! Grounded on `EaXmiImportParsingStrategy`/`EaXmiDetectionPipe`/
//! `RootPipe`/`DocumentationPipe`/`UmlModelPipe`/`UmlPackagePipe`/
//! `UmlClassPipe`/`UmlAttributePipe`/`ExtensionPipe`/`DiagramPipe` in
//! `core/deserialization/formats/ea_xmi/{ea_constants,ea_xmi_pipeline,
//! ea_xmi_deserialization_strategy}.py`. Detection and processing are
//! assembled as actual [`PipeNode`] trees below (`detection_pipe`/
//! `processing_pipe`) rather than called as bare methods: `RootPipe`
//! fans documentation/model/extension batches out to
//! `DocumentationPipe`/`ModelPipe`/`ExtensionPipe`, `ModelPipe` fans
//! relationship batches to `RelationshipPipe`, and every classifier's
//! members flow through a small `AttributePipe`/`OperationPipe`/
//! `ParameterPipe` tree. Package/class dispatch across nesting depths
//! stays a plain recursive pass (`construct_classifiers`) rather than
//! additional tree levels: `PipeNode`'s successor list is a fixed shape
//! built once per `processing_pipe()` call, but EA package nesting is
//! unbounded, and the classifier-before-relationship ordering the
//! two-pass design enforces spans the whole document, not one
//! package's own children -- neither survives being distributed across
//! an arbitrary number of tree levels. The association, generalization,
//! dependency, realization and interaction handling below extends the
//! prototype to standard UML2 XMI 2.1 element shapes (`ownedEnd`,
//! `generalization`, `client`/`supplier`, `ownedBehavior`), following
//! the same tag/attribute vocabulary `ea_constants.py` already reserves
//! keys for (`owned_end`, `attribute_type`, `sequence_behavior`,
//! `lifeline`, `message`, `fragment`).

use std::collections::HashMap;

use serde_json::Value;

use crate::builder::UmlModelBuilder;
use crate::config::{ConfigNamespace, ConfigPath};
use crate::data_source::DataSource;
use crate::errors::{TranslationError, TranslationResult};
use crate::model::{FeatureFlags, Multiplicity, ParameterDirection, PrimitiveKind, Visibility};
use crate::pipeline::{
    attributes_of, children_of, children_with_tag, parse_xml_to_value, tag_of, AttributeCondition, DataBatch,
    FormatDetectionPipe, Pipe, PipeNode,
};
use crate::strategy::{Strategy, SupportedFormat};

const TAG_ROOT: &str = "{http://schema.omg.org/spec/XMI/2.1}XMI";
const TAG_DOCUMENTATION: &str = "{http://schema.omg.org/spec/XMI/2.1}Documentation";
const TAG_MODEL: &str = "{http://schema.omg.org/spec/UML/2.1}Model";
const TAG_PACKAGED_ELEMENT: &str = "packagedElement";
const TAG_OWNED_ATTRIBUTE: &str = "ownedAttribute";
const TAG_OWNED_OPERATION: &str = "ownedOperation";
const TAG_OWNED_PARAMETER: &str = "ownedParameter";
const TAG_OWNED_END: &str = "ownedEnd";
const TAG_OWNED_LITERAL: &str = "ownedLiteral";
const TAG_GENERALIZATION: &str = "generalization";
const TAG_TYPE: &str = "type";
const TAG_LIFELINE: &str = "lifeline";
const TAG_MESSAGE: &str = "message";
const TAG_EXTENSION: &str = "{http://schema.omg.org/spec/XMI/2.1}Extension";
const TAG_DIAGRAMS: &str = "diagrams";
const TAG_DIAGRAM: &str = "diagram";
const TAG_PROPERTIES: &str = "properties";
const TAG_ELEMENTS: &str = "elements";

const ATTR_ID: &str = "{http://schema.omg.org/spec/XMI/2.1}id";
const ATTR_TYPE: &str = "{http://schema.omg.org/spec/XMI/2.1}type";
const ATTR_IDREF: &str = "{http://schema.omg.org/spec/XMI/2.1}idref";
const ATTR_XMI_VERSION: &str = "{http://schema.omg.org/spec/XMI/2.1}version";
const ATTR_EXPORTER: &str = "exporter";
const ATTR_EXPORTER_VERSION: &str = "exporterVersion";
const ATTR_EXPORTER_ID: &str = "exporterID";
const ATTR_NAME: &str = "name";
const ATTR_VISIBILITY: &str = "visibility";
const ATTR_IS_ABSTRACT: &str = "isAbstract";
const ATTR_GENERAL: &str = "general";
const ATTR_SPECIFIC: &str = "specific";
const ATTR_CLIENT: &str = "client";
const ATTR_SUPPLIER: &str = "supplier";
const ATTR_AGGREGATION: &str = "aggregation";
const ATTR_DIRECTION: &str = "direction";
const ATTR_SEND_EVENT: &str = "sendEvent";
const ATTR_RECEIVE_EVENT: &str = "receiveEvent";
const ATTR_MESSAGE_SORT: &str = "messageSort";
const ATTR_SUBJECT: &str = "subject";
const ATTR_EXTENDER: &str = "extender";
const ATTR_PROPERTY_TYPE: &str = "type";

const TYPE_PACKAGE: &str = "uml:Package";
const TYPE_CLASS: &str = "uml:Class";
const TYPE_INTERFACE: &str = "uml:Interface";
const TYPE_DATA_TYPE: &str = "uml:DataType";
const TYPE_ENUMERATION: &str = "uml:Enumeration";
const TYPE_PRIMITIVE_TYPE: &str = "uml:PrimitiveType";
const TYPE_ASSOCIATION: &str = "uml:Association";
const TYPE_DEPENDENCY: &str = "uml:Dependency";
const TYPE_GENERALIZATION: &str = "uml:Generalization";
const TYPE_REALIZATION: &str = "uml:Realization";
const TYPE_INTERACTION: &str = "uml:Interaction";

const EXPECTED_XMI_VERSION: &str = "2.1";
const EXPECTED_EXPORTER: &str = "Enterprise Architect";

const CONTEXT_CLASSIFIER_ID: &str = "classifier_id";
const CONTEXT_OPERATION_ID: &str = "operation_id";

/// Parses Enterprise Architect's XMI 2.1 export.
pub struct EaXmiStrategy {
    config: ConfigNamespace,
}

impl EaXmiStrategy {
    /// Construct the strategy, building its `ConfigNamespace` once.
    pub fn new() -> Self {
        Self {
            config: ConfigNamespace::new()
                .with_group("TAGS", [("root", TAG_ROOT), ("documentation", TAG_DOCUMENTATION)])
                .with_group("ATTRIBUTES", [("xmi_version", ATTR_XMI_VERSION), ("exporter", ATTR_EXPORTER)]),
        }
    }

    fn xmi_version_condition() -> ConfigPath {
        ConfigPath::new().field("ATTRIBUTES").field("xmi_version")
    }

    fn exporter_condition() -> ConfigPath {
        ConfigPath::new().field("ATTRIBUTES").field("exporter")
    }

    fn required_attr<'a>(element: &'a Value, key: &str, location: &str) -> TranslationResult<&'a str> {
        attributes_of(element)
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format(format!("missing attribute {key}"), location.to_string()))
    }

    fn optional_attr<'a>(element: &'a Value, key: &str) -> Option<&'a str> {
        attributes_of(element).and_then(|m| m.get(key)).and_then(Value::as_str)
    }

    fn process_documentation(element: &Value, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let mut metadata: Vec<(String, Value)> = Vec::new();
        if let Some(exporter) = Self::optional_attr(element, ATTR_EXPORTER) {
            metadata.push(("exporter".to_string(), Value::String(exporter.to_string())));
        }
        if let Some(version) = Self::optional_attr(element, ATTR_EXPORTER_VERSION) {
            metadata.push(("exporterVersion".to_string(), Value::String(version.to_string())));
        }
        if let Some(id) = Self::optional_attr(element, ATTR_EXPORTER_ID) {
            metadata.push(("exporterID".to_string(), Value::String(id.to_string())));
        }
        builder.construct_metadata(metadata);
        Ok(())
    }

    /// First pass: construct every non-relationship packaged element
    /// (packages recurse; classifiers register their members through
    /// [`Self::construct_members`]'s own pipe tree), and collect
    /// relationship elements (whose endpoints are only resolvable once
    /// every classifier in the document is known) for a second pass at
    /// the caller.
    fn construct_classifiers<'a>(
        elements: &[&'a Value],
        parent_package: Option<&str>,
        builder: &mut UmlModelBuilder,
        relationships: &mut Vec<&'a Value>,
    ) -> TranslationResult<()> {
        for element in elements {
            let kind = Self::required_attr(element, ATTR_TYPE, TAG_PACKAGED_ELEMENT)?;
            let id = Self::required_attr(element, ATTR_ID, TAG_PACKAGED_ELEMENT)?.to_string();
            let name = Self::optional_attr(element, ATTR_NAME).map(str::to_string);
            let visibility = Self::optional_attr(element, ATTR_VISIBILITY)
                .map(Visibility::parse_or_default)
                .unwrap_or_default();

            match kind {
                TYPE_PACKAGE => {
                    builder.construct_package(id.clone(), name, visibility)?;
                    if let Some(parent) = parent_package {
                        builder.bind_element_to_package(id.clone(), parent.to_string());
                    }
                    let nested = children_with_tag(element, TAG_PACKAGED_ELEMENT);
                    Self::construct_classifiers(&nested, Some(&id), builder, relationships)?;
                }
                TYPE_CLASS => {
                    let is_abstract = Self::optional_attr(element, ATTR_IS_ABSTRACT) == Some("true");
                    builder.construct_class(id.clone(), name, visibility, is_abstract)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    Self::construct_members(element, &id, builder)?;
                    for generalization in children_with_tag(element, TAG_GENERALIZATION) {
                        Self::construct_nested_generalization(generalization, &id, builder)?;
                    }
                }
                TYPE_INTERFACE => {
                    builder.construct_interface(id.clone(), name, visibility)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    Self::construct_members(element, &id, builder)?;
                }
                TYPE_DATA_TYPE => {
                    builder.construct_data_type(id.clone(), name, visibility)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    Self::construct_members(element, &id, builder)?;
                }
                TYPE_ENUMERATION => {
                    let literals = children_with_tag(element, TAG_OWNED_LITERAL)
                        .into_iter()
                        .filter_map(|literal| Self::optional_attr(literal, ATTR_NAME).map(str::to_string))
                        .collect();
                    builder.construct_enumeration(id.clone(), name, literals)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                }
                TYPE_PRIMITIVE_TYPE => {
                    let primitive_kind = Self::primitive_kind_from_name(name.as_deref());
                    builder.construct_primitive_type(id.clone(), name, primitive_kind)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                }
                TYPE_INTERACTION => {
                    Self::construct_interaction(element, &id, name, builder)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                }
                TYPE_ASSOCIATION | TYPE_DEPENDENCY | TYPE_GENERALIZATION | TYPE_REALIZATION => {
                    relationships.push(element);
                }
                other => {
                    builder.note_unmapped_element(other, &id);
                }
            }
        }
        Ok(())
    }

    fn bind_to_parent(id: &str, parent_package: Option<&str>, builder: &mut UmlModelBuilder) {
        if let Some(parent) = parent_package {
            builder.bind_element_to_package(id.to_string(), parent.to_string());
        }
    }

    /// Run a classifier's `ownedAttribute`/`ownedOperation` children
    /// through a small pipe tree (`MembersPipe -> [AttributePipe,
    /// OperationPipe -> ParameterPipe]`) rather than looping over them
    /// directly -- unlike package nesting, a classifier's member list
    /// and an operation's parameter list are both bounded, single-level
    /// fan-outs, so they fit the tree shape without the recursion
    /// problem package/class dispatch runs into.
    fn construct_members(element: &Value, classifier_id: &str, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let tree = PipeNode::new(Box::new(MembersPipe)).add_next(PipeNode::new(Box::new(AttributePipe))).add_next(
            PipeNode::new(Box::new(OperationPipe)).add_next(PipeNode::new(Box::new(ParameterPipe))),
        );
        let mut context = HashMap::new();
        context.insert(CONTEXT_CLASSIFIER_ID.to_string(), Value::String(classifier_id.to_string()));
        tree.run(DataBatch::with_context(element.clone(), context), builder)
    }

    /// Maps a primitive type's declared name onto the closed
    /// [`PrimitiveKind`] set. EA's raw Java-derived names
    /// (`EAJava_boolean`, `EAJava_int`, `EAJava_float`, `EAJava_char`,
    /// `EAJava_void`, `EAJava_double`) map onto their canonical kind
    /// the same as the bare token, per the `EA_TYPE_ATTRIBUTE_MAPPING`
    /// table in `staruml_constants.py`; anything else falls back to
    /// [`PrimitiveKind::Other`] (e.g. `EAJava_date`, which that table
    /// doesn't cover either).
    fn primitive_kind_from_name(name: Option<&str>) -> PrimitiveKind {
        match name.map(str::to_lowercase).as_deref() {
            Some("int") | Some("integer") | Some("short") | Some("long") | Some("eajava_int") => PrimitiveKind::Int,
            Some("double") | Some("real") | Some("decimal") | Some("eajava_double") => PrimitiveKind::Real,
            Some("float") | Some("eajava_float") => PrimitiveKind::Float,
            Some("string") => PrimitiveKind::String,
            Some("boolean") | Some("bool") | Some("eajava_boolean") => PrimitiveKind::Boolean,
            Some("char") | Some("character") | Some("eajava_char") => PrimitiveKind::Char,
            Some("void") | Some("eajava_void") => PrimitiveKind::Void,
            Some(other) => PrimitiveKind::Other(other.to_string()),
            None => PrimitiveKind::Other(String::new()),
        }
    }

    /// The type id an attribute/parameter references, whether inlined
    /// as a plain `type="..."` attribute or as a nested `<type
    /// xmi:idref="..."/>` element (EA's usual shape).
    fn attribute_type_id(element: &Value) -> Option<String> {
        if let Some(nested) = children_with_tag(element, TAG_TYPE).into_iter().next() {
            if let Some(idref) = Self::optional_attr(nested, ATTR_IDREF) {
                return Some(idref.to_string());
            }
        }
        Self::optional_attr(element, ATTR_TYPE).map(str::to_string)
    }

    fn construct_nested_generalization(element: &Value, specific_id: &str, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let id = Self::required_attr(element, ATTR_ID, TAG_GENERALIZATION)?.to_string();
        let general_id = Self::required_attr(element, ATTR_GENERAL, TAG_GENERALIZATION)?.to_string();
        builder.construct_generalization(id, specific_id.to_string(), general_id);
        Ok(())
    }

    fn construct_relationship(element: &Value, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let kind = Self::required_attr(element, ATTR_TYPE, TAG_PACKAGED_ELEMENT)?;
        let id = Self::required_attr(element, ATTR_ID, TAG_PACKAGED_ELEMENT)?.to_string();
        match kind {
            TYPE_GENERALIZATION => {
                let specific_id = Self::required_attr(element, ATTR_SPECIFIC, TAG_PACKAGED_ELEMENT)?.to_string();
                let general_id = Self::required_attr(element, ATTR_GENERAL, TAG_PACKAGED_ELEMENT)?.to_string();
                builder.construct_generalization(id, specific_id, general_id);
            }
            TYPE_DEPENDENCY => {
                let client_id = Self::required_attr(element, ATTR_CLIENT, TAG_PACKAGED_ELEMENT)?.to_string();
                let supplier_id = Self::required_attr(element, ATTR_SUPPLIER, TAG_PACKAGED_ELEMENT)?.to_string();
                builder.construct_dependency(id, &client_id, &supplier_id);
            }
            TYPE_REALIZATION => {
                let client_id = Self::required_attr(element, ATTR_CLIENT, TAG_PACKAGED_ELEMENT)?.to_string();
                let supplier_id = Self::required_attr(element, ATTR_SUPPLIER, TAG_PACKAGED_ELEMENT)?.to_string();
                builder.construct_realization(id, &client_id, &supplier_id);
            }
            TYPE_ASSOCIATION => Self::construct_association(element, id, builder)?,
            _ => unreachable!("only relationship kinds are collected"),
        }
        Ok(())
    }

    fn construct_association(element: &Value, id: String, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let ends = children_with_tag(element, TAG_OWNED_END);
        let (Some(end1_data), Some(end2_data)) = (ends.first(), ends.get(1)) else {
            return Err(TranslationError::invalid_format("association must have two owned ends", TAG_OWNED_END));
        };

        let end1 = Self::construct_end(end1_data, builder)?;
        let end2 = Self::construct_end(end2_data, builder)?;

        let aggregation =
            Self::optional_attr(end2_data, ATTR_AGGREGATION).or_else(|| Self::optional_attr(end1_data, ATTR_AGGREGATION));
        match aggregation {
            Some("composite") => {
                builder.construct_composition(id, end1, end2)?;
            }
            Some("shared") => {
                builder.construct_aggregation(id, end1, end2)?;
            }
            _ => {
                builder.construct_association(id, end1, end2)?;
            }
        }
        Ok(())
    }

    fn construct_end(
        element: &Value,
        builder: &mut UmlModelBuilder,
    ) -> TranslationResult<crate::model::Handle<crate::model::AssociationEnd>> {
        let end_id = Self::required_attr(element, ATTR_ID, TAG_OWNED_END)?.to_string();
        let element_id = Self::attribute_type_id(element)
            .ok_or_else(|| TranslationError::invalid_format("association end missing a target type", TAG_OWNED_END))?;
        let role = Self::optional_attr(element, ATTR_NAME).map(str::to_string);
        let navigability = Self::optional_attr(element, "isNavigable").map(|v| v != "false").unwrap_or(true);
        builder.construct_association_end(end_id, &element_id, role, Multiplicity::default(), navigability)
    }

    fn construct_interaction(element: &Value, id: &str, name: Option<String>, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let mut lifelines = Vec::new();
        let mut lifeline_by_id = std::collections::HashMap::new();
        for lifeline_el in children_with_tag(element, TAG_LIFELINE) {
            let lifeline_id = Self::required_attr(lifeline_el, ATTR_ID, TAG_LIFELINE)?.to_string();
            let lifeline_name = Self::optional_attr(lifeline_el, ATTR_NAME).map(str::to_string);
            let represents = Self::attribute_type_id(lifeline_el)
                .ok_or_else(|| TranslationError::invalid_format("lifeline missing represented classifier", TAG_LIFELINE))?;
            let lifeline = builder.construct_lifeline(lifeline_id.clone(), lifeline_name, &represents)?;
            lifeline_by_id.insert(lifeline_id, lifeline.clone());
            lifelines.push(lifeline);
        }

        let mut messages = Vec::new();
        let mut fragments = Vec::new();
        for message_el in children_with_tag(element, TAG_MESSAGE) {
            let message_id = Self::required_attr(message_el, ATTR_ID, TAG_MESSAGE)?.to_string();
            let send_id = Self::required_attr(message_el, ATTR_SEND_EVENT, TAG_MESSAGE)?;
            let receive_id = Self::required_attr(message_el, ATTR_RECEIVE_EVENT, TAG_MESSAGE)?;
            let Some(send_lifeline) = lifeline_by_id.get(send_id).cloned() else {
                return Err(TranslationError::invalid_format("message sendEvent references an unknown lifeline", TAG_MESSAGE));
            };
            let Some(receive_lifeline) = lifeline_by_id.get(receive_id).cloned() else {
                return Err(TranslationError::invalid_format("message receiveEvent references an unknown lifeline", TAG_MESSAGE));
            };
            let send_event = builder.construct_occurrence_specification(format!("{message_id}-send"), send_lifeline)?;
            let receive_event = builder.construct_occurrence_specification(format!("{message_id}-receive"), receive_lifeline)?;
            let sort = match Self::optional_attr(message_el, ATTR_MESSAGE_SORT) {
                Some("asynchCall") => crate::model::MessageSort::AsynchCall,
                Some("asynchSignal") => crate::model::MessageSort::AsynchSignal,
                Some("createMessage") => crate::model::MessageSort::CreateMsg,
                Some("deleteMessage") => crate::model::MessageSort::DeleteMsg,
                Some("reply") => crate::model::MessageSort::Reply,
                _ => crate::model::MessageSort::SynchCall,
            };
            let message = builder.construct_message(
                message_id,
                send_event.clone(),
                receive_event,
                sort,
                crate::model::MessageKind::Complete,
                Vec::new(),
            )?;
            messages.push(message.clone());
            fragments.push(crate::model::Fragment::Occurrence(send_event));
        }

        builder.construct_interaction(id.to_string(), name, lifelines, messages, fragments)?;
        Ok(())
    }

    fn process_diagram(element: &Value, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let id = Self::required_attr(element, ATTR_ID, TAG_DIAGRAM)?.to_string();
        let properties = children_with_tag(element, TAG_PROPERTIES).into_iter().next();
        let diagram_type = properties.and_then(|p| Self::optional_attr(p, ATTR_PROPERTY_TYPE)).unwrap_or("Logical");
        let name = properties.and_then(|p| Self::optional_attr(p, ATTR_NAME)).map(str::to_string);

        let mut element_ids = Vec::new();
        for elements in children_with_tag(element, TAG_ELEMENTS) {
            for member in children_of(elements) {
                if let Some(subject) = Self::optional_attr(member, ATTR_SUBJECT) {
                    element_ids.push(subject.to_string());
                }
            }
        }

        match diagram_type {
            "Sequence" => {
                builder.construct_sequence_diagram(id, name, element_ids)?;
            }
            _ => {
                builder.construct_class_diagram(id, name, element_ids)?;
            }
        }
        Ok(())
    }

}

/// Detection-only node: recognizes `xmi:XMI` with `xmi:version="2.1"`
/// and an `xmi:Documentation` whose `exporter` is Enterprise Architect.
/// Returns no batches on a match; every mismatch is reported as
/// [`TranslationError::UnsupportedFormat`] so [`FormatDetectionPipe`]
/// folds it into `Ok(false)`.
struct RootDetectionPipe {
    config: ConfigNamespace,
}

impl Pipe for RootDetectionPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let root = &batch.data;
        if tag_of(root) != Some(TAG_ROOT) {
            return Err(TranslationError::unsupported("root tag is not xmi:XMI"));
        }
        let version_matches = AttributeCondition::new(EaXmiStrategy::xmi_version_condition(), EXPECTED_XMI_VERSION)
            .evaluate(root, &self.config)
            .unwrap_or(false);
        if !version_matches {
            return Err(TranslationError::unsupported("xmi:version mismatch"));
        }
        let Some(documentation) = children_with_tag(root, TAG_DOCUMENTATION).into_iter().next() else {
            return Err(TranslationError::unsupported("missing xmi:Documentation"));
        };
        let exporter_matches = AttributeCondition::new(EaXmiStrategy::exporter_condition(), EXPECTED_EXPORTER)
            .evaluate(documentation, &self.config)
            .unwrap_or(false);
        if !exporter_matches {
            return Err(TranslationError::unsupported("exporter mismatch"));
        }
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "ea-xmi-root-detect"
    }
}

/// Root of the processing tree: records `xmi:version` as metadata and
/// fans every child element out to its successors, which each gate on
/// their own tag via `can_process`.
struct RootPipe;

impl Pipe for RootPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let root = &batch.data;
        if tag_of(root) != Some(TAG_ROOT) {
            return Err(TranslationError::unsupported("root tag is not xmi:XMI"));
        }
        let xmi_version = EaXmiStrategy::required_attr(root, ATTR_XMI_VERSION, TAG_ROOT)?;
        builder.construct_metadata([("xmiVersion".to_string(), Value::String(xmi_version.to_string()))]);
        Ok(children_of(root).into_iter().map(|child| batch.child(child.clone(), [])).collect())
    }

    fn name(&self) -> &str {
        "ea-xmi-root"
    }
}

struct DocumentationPipe;

impl Pipe for DocumentationPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        tag_of(&batch.data) == Some(TAG_DOCUMENTATION)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        EaXmiStrategy::process_documentation(&batch.data, builder)?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "ea-xmi-documentation"
    }
}

/// Constructs the model and every classifier in it (recursing through
/// nested packages directly, not via further tree levels -- see the
/// module doc comment), then hands each collected relationship element
/// to its successor as its own batch.
struct ModelPipe;

impl Pipe for ModelPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        tag_of(&batch.data) == Some(TAG_MODEL)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let element = &batch.data;
        let name = EaXmiStrategy::optional_attr(element, ATTR_NAME).map(str::to_string);
        builder.construct_model(name);

        let top_level = children_with_tag(element, TAG_PACKAGED_ELEMENT);
        let mut relationships: Vec<&Value> = Vec::new();
        EaXmiStrategy::construct_classifiers(&top_level, None, builder, &mut relationships)?;
        Ok(relationships.into_iter().map(|relationship| batch.child(relationship.clone(), [])).collect())
    }

    fn name(&self) -> &str {
        "ea-xmi-model"
    }
}

/// Dispatches one relationship element (association, generalization,
/// dependency or realization) -- reachable only after `ModelPipe` has
/// finished constructing every classifier in the document.
struct RelationshipPipe;

impl Pipe for RelationshipPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        matches!(
            EaXmiStrategy::optional_attr(&batch.data, ATTR_TYPE),
            Some(TYPE_ASSOCIATION) | Some(TYPE_DEPENDENCY) | Some(TYPE_GENERALIZATION) | Some(TYPE_REALIZATION)
        )
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        EaXmiStrategy::construct_relationship(&batch.data, builder)?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "ea-xmi-relationship"
    }
}

/// Fans a classifier's `ownedAttribute`/`ownedOperation` children out
/// to its successors.
struct MembersPipe;

impl Pipe for MembersPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let element = &batch.data;
        let mut children: Vec<DataBatch> = Vec::new();
        for attribute in children_with_tag(element, TAG_OWNED_ATTRIBUTE) {
            children.push(batch.child(attribute.clone(), []));
        }
        for operation in children_with_tag(element, TAG_OWNED_OPERATION) {
            children.push(batch.child(operation.clone(), []));
        }
        Ok(children)
    }

    fn name(&self) -> &str {
        "ea-xmi-members"
    }
}

struct AttributePipe;

impl Pipe for AttributePipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        tag_of(&batch.data) == Some(TAG_OWNED_ATTRIBUTE)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let classifier_id = batch
            .parent_context
            .get(CONTEXT_CLASSIFIER_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("attribute batch missing classifier context", TAG_OWNED_ATTRIBUTE))?
            .to_string();
        let attribute = &batch.data;
        let attr_id = EaXmiStrategy::required_attr(attribute, ATTR_ID, TAG_OWNED_ATTRIBUTE)?.to_string();
        let name = EaXmiStrategy::optional_attr(attribute, ATTR_NAME).map(str::to_string);
        let visibility = EaXmiStrategy::optional_attr(attribute, ATTR_VISIBILITY)
            .map(Visibility::parse_or_default)
            .unwrap_or_default();
        let type_id = EaXmiStrategy::attribute_type_id(attribute);
        builder.construct_attribute(attr_id, name, visibility, classifier_id, type_id, FeatureFlags::default())?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "ea-xmi-attribute"
    }
}

struct OperationPipe;

impl Pipe for OperationPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        tag_of(&batch.data) == Some(TAG_OWNED_OPERATION)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let classifier_id = batch
            .parent_context
            .get(CONTEXT_CLASSIFIER_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("operation batch missing classifier context", TAG_OWNED_OPERATION))?
            .to_string();
        let operation = &batch.data;
        let op_id = EaXmiStrategy::required_attr(operation, ATTR_ID, TAG_OWNED_OPERATION)?.to_string();
        let name = EaXmiStrategy::optional_attr(operation, ATTR_NAME).map(str::to_string);
        let visibility = EaXmiStrategy::optional_attr(operation, ATTR_VISIBILITY)
            .map(Visibility::parse_or_default)
            .unwrap_or_default();
        builder.construct_operation(op_id.clone(), name, visibility, classifier_id)?;

        let parameters = children_with_tag(operation, TAG_OWNED_PARAMETER);
        Ok(parameters
            .into_iter()
            .map(|parameter| batch.child(parameter.clone(), [(CONTEXT_OPERATION_ID.to_string(), Value::String(op_id.clone()))]))
            .collect())
    }

    fn name(&self) -> &str {
        "ea-xmi-operation"
    }
}

struct ParameterPipe;

impl Pipe for ParameterPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        tag_of(&batch.data) == Some(TAG_OWNED_PARAMETER)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let op_id = batch
            .parent_context
            .get(CONTEXT_OPERATION_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("parameter batch missing operation context", TAG_OWNED_PARAMETER))?
            .to_string();
        let parameter = &batch.data;
        let param_id = EaXmiStrategy::required_attr(parameter, ATTR_ID, TAG_OWNED_PARAMETER)?.to_string();
        let param_name = EaXmiStrategy::optional_attr(parameter, ATTR_NAME).map(str::to_string);
        let direction = match EaXmiStrategy::optional_attr(parameter, ATTR_DIRECTION) {
            Some("return") => ParameterDirection::Return,
            Some("out") => ParameterDirection::Out,
            Some("inout") => ParameterDirection::Inout,
            _ => ParameterDirection::In,
        };
        let type_id = EaXmiStrategy::attribute_type_id(parameter);
        if direction == ParameterDirection::Return {
            if let Some(type_id) = type_id {
                builder.set_operation_return_type(&op_id, type_id);
            }
        } else {
            builder.construct_parameter(param_id, param_name, &op_id, type_id, direction)?;
        }
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "ea-xmi-parameter"
    }
}

/// Enterprise Architect's own `xmi:Extension`, containing its
/// `diagrams` block. Fans each `diagram` element out to `DiagramPipe`.
struct ExtensionPipe;

impl Pipe for ExtensionPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        tag_of(&batch.data) == Some(TAG_EXTENSION)
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let element = &batch.data;
        if EaXmiStrategy::optional_attr(element, ATTR_EXTENDER) != Some(EXPECTED_EXPORTER) {
            return Ok(Vec::new());
        }
        let mut diagrams = Vec::new();
        for diagrams_el in children_with_tag(element, TAG_DIAGRAMS) {
            for diagram in children_with_tag(diagrams_el, TAG_DIAGRAM) {
                diagrams.push(batch.child(diagram.clone(), []));
            }
        }
        Ok(diagrams)
    }

    fn name(&self) -> &str {
        "ea-xmi-extension"
    }
}

struct DiagramPipe;

impl Pipe for DiagramPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        tag_of(&batch.data) == Some(TAG_DIAGRAM)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        EaXmiStrategy::process_diagram(&batch.data, builder)?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "ea-xmi-diagram"
    }
}

impl Default for EaXmiStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for EaXmiStrategy {
    fn supported_format(&self) -> SupportedFormat {
        SupportedFormat::EaXmi
    }

    fn name(&self) -> &'static str {
        "ea-xmi"
    }

    fn can_deserialize(&self, source: &DataSource) -> TranslationResult<bool> {
        let root = match parse_xml_to_value(source.content()?) {
            Ok(root) => root,
            Err(_) => return Ok(false),
        };
        let mut scratch = UmlModelBuilder::new("__ea-xmi-detect__");
        match self.detection_pipe().is_supported_format(DataBatch::new(root), &mut scratch) {
            Ok(matched) => Ok(matched),
            Err(err) if err.is_unsupported_format() => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn process(&self, source: &DataSource, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let root = parse_xml_to_value(source.content()?)?;
        if tag_of(&root) != Some(TAG_ROOT) {
            return Err(TranslationError::unsupported("root tag is not xmi:XMI"));
        }
        self.processing_pipe().run(DataBatch::new(root), builder)
    }

    /// Assemble the detection pipe: a single node that validates
    /// `xmi:version`/exporter and returns no batches, turned into a
    /// plain boolean by [`FormatDetectionPipe`]. Never mutates
    /// `builder`.
    fn detection_pipe(&self) -> FormatDetectionPipe<Box<dyn Pipe>> {
        FormatDetectionPipe::new(Box::new(RootDetectionPipe { config: self.config.clone() }))
    }

    /// Assemble the processing tree: `RootPipe -> [DocumentationPipe,
    /// ModelPipe -> RelationshipPipe, ExtensionPipe -> DiagramPipe]`.
    fn processing_pipe(&self) -> PipeNode {
        PipeNode::new(Box::new(RootPipe))
            .add_next(PipeNode::new(Box::new(DocumentationPipe)))
            .add_next(PipeNode::new(Box::new(ModelPipe)).add_next(PipeNode::new(Box::new(RelationshipPipe))))
            .add_next(PipeNode::new(Box::new(ExtensionPipe)).add_next(PipeNode::new(Box::new(DiagramPipe))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classifier;

    const SAMPLE: &str = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
        <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
        <uml:Model xmi:id="model-1" name="Library" xmi:type="uml:Model">
            <packagedElement xmi:type="uml:Package" xmi:id="pkg-1" name="model">
                <packagedElement xmi:type="uml:Class" xmi:id="c-book" name="Book">
                    <ownedAttribute xmi:id="a-title" name="title" xmi:type="uml:Property">
                        <type xmi:idref="t-string"/>
                    </ownedAttribute>
                </packagedElement>
                <packagedElement xmi:type="uml:PrimitiveType" xmi:id="t-string" name="String"/>
            </packagedElement>
        </uml:Model>
    </xmi:XMI>"#;

    #[test]
    fn test_can_deserialize_recognizes_ea_exporter() {
        let strategy = EaXmiStrategy::new();
        let source = DataSource::from_str(SAMPLE);
        assert!(strategy.can_deserialize(&source).unwrap());
    }

    #[test]
    fn test_can_deserialize_rejects_other_exporter() {
        let strategy = EaXmiStrategy::new();
        let xml = SAMPLE.replace("Enterprise Architect", "StarUML");
        let source = DataSource::from_str(xml);
        assert!(!strategy.can_deserialize(&source).unwrap());
    }

    #[test]
    fn test_process_builds_class_with_attribute_type() {
        let strategy = EaXmiStrategy::new();
        let source = DataSource::from_str(SAMPLE);
        let mut builder = UmlModelBuilder::new("model-1");
        strategy.process(&source, &mut builder).unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.elements.classes.len(), 1);
        let book = &model.elements.classes[0];
        assert_eq!(book.borrow().attributes().len(), 1);
        assert!(book.borrow().attributes()[0].borrow().type_ref.is_some());
        assert_eq!(model.elements.packages[0].borrow().members.len(), 2);
    }

    #[test]
    fn test_processing_pipe_runs_relationship_pipe_after_model_pipe() {
        let strategy = EaXmiStrategy::new();
        let xml = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
            <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
            <uml:Model xmi:id="model-1" name="Shapes">
                <packagedElement xmi:type="uml:Generalization" xmi:id="g1" specific="c-square" general="c-shape"/>
                <packagedElement xmi:type="uml:Class" xmi:id="c-square" name="Square"/>
                <packagedElement xmi:type="uml:Class" xmi:id="c-shape" name="Shape"/>
            </uml:Model>
        </xmi:XMI>"#;
        let source = DataSource::from_str(xml);
        let mut builder = UmlModelBuilder::new("model-1");
        strategy.process(&source, &mut builder).unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.elements.generalizations.len(), 1);
    }
}
