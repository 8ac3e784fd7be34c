//! Eclipse Papyrus's split `.uml` (standard UML2 XMI) model plus
//! `.notation` (GMF) diagram layout export.
//!
//! Grounded on `PapyrusXmiDetectionPipe` in
//! `core/deserialization/formats/papyrus_xmi/{papyrus_xmi_format_detection_pipeline,
//! notation_xmi_format_detection_pipeline}.py`: the `.uml` document is
//! recognized by its uml namespace URI containing `"eclipse"`, the
//! `.notation` document by its root element living in a namespace
//! containing `"notation"`. Both checks only ever see one candidate
//! document at a time here, unlike the Python pipes which additionally
//! raise on a missing `xmi`/`uml` namespace declaration -- this
//! strategy instead treats a document that satisfies neither check as
//! simply not its format, consistent with how every other strategy's
//! `can_deserialize` behaves.
//!
//! The `.uml` classifier/member/relationship/interaction shapes are
//! the same UML2 XMI vocabulary [`super::ea_xmi::EaXmiStrategy`]
//! already parses, so construction below follows the same pipe tree
//! shape -- `RootPipe` dispatches a `.uml` document's `Model` element
//! to `ModelPipe -> RelationshipPipe`, or a `.notation` document's root
//! to `NotationPipe`, gated by a `papyrus_stage` context tag rather
//! than by element tag name (Papyrus versions ship a handful of UML2
//! XMI namespace URIs, so attribute/tag lookups here match by local
//! name rather than exact namespaced key -- the model pipeline source
//! this would otherwise ground on was not part of the retained
//! reference pack, so the `.notation` pass, shapes referencing a model
//! element by a `href`-shaped `element` attribute, is this crate's own
//! reading of the GMF Notation metamodel).

use std::collections::HashMap;

use serde_json::Value;

use crate::builder::UmlModelBuilder;
use crate::data_source::DataSource;
use crate::errors::{TranslationError, TranslationResult};
use crate::model::{
    AssociationEnd, FeatureFlags, Fragment, Handle, MessageKind, MessageSort, Multiplicity, ParameterDirection,
    PrimitiveKind, Visibility,
};
use crate::pipeline::{
    attributes_of, children_of, children_with_tag, parse_xml_to_value, tag_of, DataBatch, FormatDetectionPipe, Pipe,
    PipeNode,
};
use crate::strategy::{Strategy, SupportedFormat};

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

const NAMESPACE_MARKER_ECLIPSE: &str = "eclipse";
const NAMESPACE_MARKER_NOTATION: &str = "notation";

const CONTEXT_STAGE: &str = "papyrus_stage";
const CONTEXT_FILE_STEM: &str = "file_stem";
const CONTEXT_CLASSIFIER_ID: &str = "classifier_id";
const CONTEXT_OPERATION_ID: &str = "operation_id";

/// Parses Eclipse Papyrus's split `.uml`/`.notation` export.
pub struct PapyrusStrategy;

impl PapyrusStrategy {
    /// Construct the strategy. Stateless: Papyrus's detection needs no
    /// configured tag/attribute aliases, unlike EA's exporter check.
    pub fn new() -> Self {
        Self
    }

    fn tag_namespace(tag: &str) -> Option<&str> {
        let rest = tag.strip_prefix('{')?;
        rest.find('}').map(|end| &rest[..end])
    }

    fn tag_local(tag: &str) -> &str {
        match tag.rfind('}') {
            Some(idx) => &tag[idx + 1..],
            None => tag,
        }
    }

    fn local_tag(value: &Value) -> Option<&str> {
        tag_of(value).map(Self::tag_local)
    }

    /// Fetch an attribute by local name, ignoring whichever namespace
    /// URI its prefix happens to resolve to in this document.
    fn attr_local<'a>(element: &'a Value, local_name: &str) -> Option<&'a str> {
        let attrs = attributes_of(element)?;
        for (key, value) in attrs {
            let candidate = match key.rfind('}') {
                Some(idx) => &key[idx + 1..],
                None => key.as_str(),
            };
            if candidate == local_name {
                return value.as_str();
            }
        }
        None
    }

    fn required_attr_local<'a>(element: &'a Value, local_name: &str, location: &str) -> TranslationResult<&'a str> {
        Self::attr_local(element, local_name)
            .ok_or_else(|| TranslationError::invalid_format(format!("missing attribute {local_name}"), location.to_string()))
    }

    /// The type id an attribute/parameter/association-end/lifeline
    /// references, whether inlined as a plain `type="..."`/`represents="..."`
    /// attribute or as a nested `<type idref="..."/>` element.
    fn type_reference(element: &Value, attribute_name: &str) -> Option<String> {
        if let Some(nested) = children_with_tag(element, TAG_TYPE).into_iter().next() {
            if let Some(idref) = Self::attr_local(nested, "idref") {
                return Some(idref.to_string());
            }
        }
        Self::attr_local(element, attribute_name).map(str::to_string)
    }

    fn primitive_kind_from_name(name: Option<&str>) -> PrimitiveKind {
        match name.map(str::to_lowercase).as_deref() {
            Some("int") | Some("integer") | Some("short") | Some("long") => PrimitiveKind::Int,
            Some("double") | Some("real") | Some("decimal") => PrimitiveKind::Real,
            Some("float") => PrimitiveKind::Float,
            Some("string") => PrimitiveKind::String,
            Some("boolean") | Some("bool") => PrimitiveKind::Boolean,
            Some("char") | Some("character") => PrimitiveKind::Char,
            Some("void") => PrimitiveKind::Void,
            Some(other) => PrimitiveKind::Other(other.to_string()),
            None => PrimitiveKind::Other(String::new()),
        }
    }

    fn model_element(root: &Value) -> Option<&Value> {
        if Self::local_tag(root) == Some("Model") {
            return Some(root);
        }
        children_of(root).into_iter().find(|child| Self::local_tag(child) == Some("Model"))
    }

    /// First pass: construct every non-relationship packaged element
    /// (packages recurse; classifiers register their members through
    /// [`Self::construct_members`]'s own pipe tree), and collect
    /// relationship elements for a second pass at the caller.
    fn construct_classifiers<'a>(
        elements: &[&'a Value],
        parent_package: Option<&str>,
        builder: &mut UmlModelBuilder,
        relationships: &mut Vec<&'a Value>,
    ) -> TranslationResult<()> {
        for element in elements {
            let kind = Self::required_attr_local(element, "type", TAG_PACKAGED_ELEMENT)?;
            let id = Self::required_attr_local(element, "id", TAG_PACKAGED_ELEMENT)?.to_string();
            let name = Self::attr_local(element, "name").map(str::to_string);
            let visibility = Self::attr_local(element, "visibility").map(Visibility::parse_or_default).unwrap_or_default();

            match kind {
                TYPE_PACKAGE => {
                    builder.construct_package(id.clone(), name, visibility)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    let nested = children_with_tag(element, TAG_PACKAGED_ELEMENT);
                    Self::construct_classifiers(&nested, Some(&id), builder, relationships)?;
                }
                TYPE_CLASS => {
                    let is_abstract = Self::attr_local(element, "isAbstract") == Some("true");
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
                        .filter_map(|literal| Self::attr_local(literal, "name").map(str::to_string))
                        .collect();
                    builder.construct_enumeration(id.clone(), name, literals)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                }
                TYPE_PRIMITIVE_TYPE => {
                    let kind = Self::primitive_kind_from_name(name.as_deref());
                    builder.construct_primitive_type(id.clone(), name, kind)?;
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

    /// Run a classifier's members through the same pipe tree shape
    /// [`super::ea_xmi::EaXmiStrategy`] uses (`MembersPipe ->
    /// [AttributePipe, OperationPipe -> ParameterPipe]`), with the
    /// namespace-agnostic attribute lookups this dialect needs.
    fn construct_members(element: &Value, classifier_id: &str, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let tree = PipeNode::new(Box::new(MembersPipe)).add_next(PipeNode::new(Box::new(AttributePipe))).add_next(
            PipeNode::new(Box::new(OperationPipe)).add_next(PipeNode::new(Box::new(ParameterPipe))),
        );
        let mut context = HashMap::new();
        context.insert(CONTEXT_CLASSIFIER_ID.to_string(), Value::String(classifier_id.to_string()));
        tree.run(DataBatch::with_context(element.clone(), context), builder)
    }

    fn construct_nested_generalization(element: &Value, specific_id: &str, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let id = Self::required_attr_local(element, "id", TAG_GENERALIZATION)?.to_string();
        let general_id = Self::required_attr_local(element, "general", TAG_GENERALIZATION)?.to_string();
        builder.construct_generalization(id, specific_id.to_string(), general_id);
        Ok(())
    }

    fn construct_relationship(element: &Value, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let kind = Self::required_attr_local(element, "type", TAG_PACKAGED_ELEMENT)?;
        let id = Self::required_attr_local(element, "id", TAG_PACKAGED_ELEMENT)?.to_string();
        match kind {
            TYPE_GENERALIZATION => {
                let specific_id = Self::required_attr_local(element, "specific", TAG_PACKAGED_ELEMENT)?.to_string();
                let general_id = Self::required_attr_local(element, "general", TAG_PACKAGED_ELEMENT)?.to_string();
                builder.construct_generalization(id, specific_id, general_id);
            }
            TYPE_DEPENDENCY => {
                let client_id = Self::required_attr_local(element, "client", TAG_PACKAGED_ELEMENT)?.to_string();
                let supplier_id = Self::required_attr_local(element, "supplier", TAG_PACKAGED_ELEMENT)?.to_string();
                builder.construct_dependency(id, &client_id, &supplier_id);
            }
            TYPE_REALIZATION => {
                let client_id = Self::required_attr_local(element, "client", TAG_PACKAGED_ELEMENT)?.to_string();
                let supplier_id = Self::required_attr_local(element, "supplier", TAG_PACKAGED_ELEMENT)?.to_string();
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

        let aggregation = Self::attr_local(end2_data, "aggregation").or_else(|| Self::attr_local(end1_data, "aggregation"));
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

    fn construct_end(element: &Value, builder: &mut UmlModelBuilder) -> TranslationResult<Handle<AssociationEnd>> {
        let end_id = Self::required_attr_local(element, "id", TAG_OWNED_END)?.to_string();
        let element_id = Self::type_reference(element, "type")
            .ok_or_else(|| TranslationError::invalid_format("association end missing a target type", TAG_OWNED_END))?;
        let role = Self::attr_local(element, "name").map(str::to_string);
        let navigability = Self::attr_local(element, "isNavigable").map(|v| v != "false").unwrap_or(true);
        builder.construct_association_end(end_id, &element_id, role, Multiplicity::default(), navigability)
    }

    fn construct_interaction(element: &Value, id: &str, name: Option<String>, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let mut lifelines = Vec::new();
        let mut lifeline_by_id = HashMap::new();
        for lifeline_el in children_with_tag(element, TAG_LIFELINE) {
            let lifeline_id = Self::required_attr_local(lifeline_el, "id", TAG_LIFELINE)?.to_string();
            let lifeline_name = Self::attr_local(lifeline_el, "name").map(str::to_string);
            let represents = Self::type_reference(lifeline_el, "represents")
                .ok_or_else(|| TranslationError::invalid_format("lifeline missing represented classifier", TAG_LIFELINE))?;
            let lifeline = builder.construct_lifeline(lifeline_id.clone(), lifeline_name, &represents)?;
            lifeline_by_id.insert(lifeline_id, lifeline.clone());
            lifelines.push(lifeline);
        }

        let mut messages = Vec::new();
        let mut fragments = Vec::new();
        for message_el in children_with_tag(element, TAG_MESSAGE) {
            let message_id = Self::required_attr_local(message_el, "id", TAG_MESSAGE)?.to_string();
            let send_id = Self::required_attr_local(message_el, "sendEvent", TAG_MESSAGE)?;
            let receive_id = Self::required_attr_local(message_el, "receiveEvent", TAG_MESSAGE)?;
            let Some(send_lifeline) = lifeline_by_id.get(send_id).cloned() else {
                return Err(TranslationError::invalid_format("message sendEvent references an unknown lifeline", TAG_MESSAGE));
            };
            let Some(receive_lifeline) = lifeline_by_id.get(receive_id).cloned() else {
                return Err(TranslationError::invalid_format("message receiveEvent references an unknown lifeline", TAG_MESSAGE));
            };
            let send_event = builder.construct_occurrence_specification(format!("{message_id}-send"), send_lifeline)?;
            let receive_event = builder.construct_occurrence_specification(format!("{message_id}-receive"), receive_lifeline)?;
            let sort = match Self::attr_local(message_el, "messageSort") {
                Some("asynchCall") => MessageSort::AsynchCall,
                Some("asynchSignal") => MessageSort::AsynchSignal,
                Some("createMessage") => MessageSort::CreateMsg,
                Some("deleteMessage") => MessageSort::DeleteMsg,
                Some("reply") => MessageSort::Reply,
                _ => MessageSort::SynchCall,
            };
            let message = builder.construct_message(message_id, send_event.clone(), receive_event, sort, MessageKind::Complete, Vec::new())?;
            messages.push(message.clone());
            fragments.push(Fragment::Occurrence(send_event));
        }

        builder.construct_interaction(id.to_string(), name, lifelines, messages, fragments)?;
        Ok(())
    }

    fn process_notation(root: &Value, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let id = Self::attr_local(root, "id").map(str::to_string).unwrap_or_else(|| "notation-diagram".to_string());
        let name = Self::attr_local(root, "name").map(str::to_string);
        let diagram_kind = Self::attr_local(root, "type").unwrap_or("").to_lowercase();

        let mut element_ids = Vec::new();
        Self::collect_element_refs(root, &mut element_ids);

        if diagram_kind.contains("sequence") {
            builder.construct_sequence_diagram(id, name, element_ids)?;
        } else {
            builder.construct_class_diagram(id, name, element_ids)?;
        }
        Ok(())
    }

    fn collect_element_refs(value: &Value, out: &mut Vec<String>) {
        if let Some(element_ref) = Self::attr_local(value, "element") {
            out.push(Self::strip_href_fragment(element_ref));
        }
        for child in children_of(value) {
            Self::collect_element_refs(child, out);
        }
    }

    fn strip_href_fragment(href: &str) -> String {
        match href.rsplit_once('#') {
            Some((_, fragment)) => fragment.to_string(),
            None => href.to_string(),
        }
    }

    /// Assemble the detection pipe: a single node that checks the root
    /// (or its child `Model`, for the `.uml` case) against the
    /// notation/eclipse namespace markers. Never mutates `builder`.
    fn detection_pipe() -> FormatDetectionPipe<Box<dyn Pipe>> {
        FormatDetectionPipe::new(Box::new(RootDetectionPipe))
    }

    /// Assemble the processing tree: `RootPipe` dispatches to either
    /// `ModelPipe -> RelationshipPipe` (`.uml`) or `NotationPipe`
    /// (`.notation`), gated by the `papyrus_stage` context tag `RootPipe`
    /// sets on its output batch.
    fn processing_pipe() -> PipeNode {
        PipeNode::new(Box::new(RootPipe))
            .add_next(PipeNode::new(Box::new(ModelPipe)).add_next(PipeNode::new(Box::new(RelationshipPipe))))
            .add_next(PipeNode::new(Box::new(NotationPipe)))
    }
}

struct RootDetectionPipe;

impl Pipe for RootDetectionPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let root = &batch.data;
        let Some(root_tag) = tag_of(root) else {
            return Err(TranslationError::unsupported("root element missing a tag"));
        };

        if let Some(ns) = PapyrusStrategy::tag_namespace(root_tag) {
            if ns.to_lowercase().contains(NAMESPACE_MARKER_NOTATION) {
                return Ok(Vec::new());
            }
        }

        if PapyrusStrategy::tag_local(root_tag) == "Model" {
            if let Some(ns) = PapyrusStrategy::tag_namespace(root_tag) {
                if ns.to_lowercase().contains(NAMESPACE_MARKER_ECLIPSE) {
                    return Ok(Vec::new());
                }
            }
        }

        for child in children_of(root) {
            let Some(child_tag) = tag_of(child) else { continue };
            if PapyrusStrategy::tag_local(child_tag) == "Model" {
                if let Some(ns) = PapyrusStrategy::tag_namespace(child_tag) {
                    if ns.to_lowercase().contains(NAMESPACE_MARKER_ECLIPSE) {
                        return Ok(Vec::new());
                    }
                }
            }
        }

        Err(TranslationError::unsupported("neither Papyrus UML nor notation namespace matched"))
    }

    fn name(&self) -> &str {
        "papyrus-root-detect"
    }
}

/// Root of the processing tree: tags the batch `model` or `notation`
/// depending on which namespace the root matches, so its two
/// successors can gate on that rather than on tag name (which varies
/// across Papyrus's own namespace URI versions).
struct RootPipe;

impl Pipe for RootPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let root = &batch.data;
        let root_tag = tag_of(root).ok_or_else(|| TranslationError::unsupported("root element missing a tag"))?;

        if let Some(ns) = PapyrusStrategy::tag_namespace(root_tag) {
            if ns.to_lowercase().contains(NAMESPACE_MARKER_NOTATION) {
                return Ok(vec![batch.child(root.clone(), [(CONTEXT_STAGE.to_string(), Value::String("notation".to_string()))])]);
            }
        }

        let model = PapyrusStrategy::model_element(root)
            .ok_or_else(|| TranslationError::invalid_format("no uml:Model element found", "root"))?;
        Ok(vec![batch.child(model.clone(), [(CONTEXT_STAGE.to_string(), Value::String("model".to_string()))])])
    }

    fn name(&self) -> &str {
        "papyrus-root"
    }
}

/// Constructs the model and every classifier in it, then hands each
/// collected relationship element to its successor as its own batch.
struct ModelPipe;

impl Pipe for ModelPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        batch.parent_context.get(CONTEXT_STAGE).and_then(Value::as_str) == Some("model")
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let model = &batch.data;
        let name = PapyrusStrategy::attr_local(model, "name")
            .map(str::to_string)
            .or_else(|| batch.parent_context.get(CONTEXT_FILE_STEM).and_then(Value::as_str).map(str::to_string));
        builder.construct_model(name);

        let top_level = children_with_tag(model, TAG_PACKAGED_ELEMENT);
        let mut relationships: Vec<&Value> = Vec::new();
        PapyrusStrategy::construct_classifiers(&top_level, None, builder, &mut relationships)?;
        Ok(relationships.into_iter().map(|relationship| batch.child(relationship.clone(), [])).collect())
    }

    fn name(&self) -> &str {
        "papyrus-model"
    }
}

struct RelationshipPipe;

impl Pipe for RelationshipPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        matches!(
            PapyrusStrategy::attr_local(&batch.data, "type"),
            Some(TYPE_ASSOCIATION) | Some(TYPE_DEPENDENCY) | Some(TYPE_GENERALIZATION) | Some(TYPE_REALIZATION)
        )
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        PapyrusStrategy::construct_relationship(&batch.data, builder)?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "papyrus-relationship"
    }
}

struct NotationPipe;

impl Pipe for NotationPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        batch.parent_context.get(CONTEXT_STAGE).and_then(Value::as_str) == Some("notation")
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        PapyrusStrategy::process_notation(&batch.data, builder)?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "papyrus-notation"
    }
}

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
        "papyrus-members"
    }
}

struct AttributePipe;

impl Pipe for AttributePipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        PapyrusStrategy::local_tag(&batch.data) == Some(TAG_OWNED_ATTRIBUTE)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let classifier_id = batch
            .parent_context
            .get(CONTEXT_CLASSIFIER_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("attribute batch missing classifier context", TAG_OWNED_ATTRIBUTE))?
            .to_string();
        let attribute = &batch.data;
        let attr_id = PapyrusStrategy::required_attr_local(attribute, "id", TAG_OWNED_ATTRIBUTE)?.to_string();
        let name = PapyrusStrategy::attr_local(attribute, "name").map(str::to_string);
        let visibility = PapyrusStrategy::attr_local(attribute, "visibility").map(Visibility::parse_or_default).unwrap_or_default();
        let type_id = PapyrusStrategy::type_reference(attribute, "type");
        builder.construct_attribute(attr_id, name, visibility, classifier_id, type_id, FeatureFlags::default())?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "papyrus-attribute"
    }
}

struct OperationPipe;

impl Pipe for OperationPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        PapyrusStrategy::local_tag(&batch.data) == Some(TAG_OWNED_OPERATION)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let classifier_id = batch
            .parent_context
            .get(CONTEXT_CLASSIFIER_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("operation batch missing classifier context", TAG_OWNED_OPERATION))?
            .to_string();
        let operation = &batch.data;
        let op_id = PapyrusStrategy::required_attr_local(operation, "id", TAG_OWNED_OPERATION)?.to_string();
        let name = PapyrusStrategy::attr_local(operation, "name").map(str::to_string);
        let visibility = PapyrusStrategy::attr_local(operation, "visibility").map(Visibility::parse_or_default).unwrap_or_default();
        builder.construct_operation(op_id.clone(), name, visibility, classifier_id)?;

        let parameters = children_with_tag(operation, TAG_OWNED_PARAMETER);
        Ok(parameters
            .into_iter()
            .map(|parameter| batch.child(parameter.clone(), [(CONTEXT_OPERATION_ID.to_string(), Value::String(op_id.clone()))]))
            .collect())
    }

    fn name(&self) -> &str {
        "papyrus-operation"
    }
}

struct ParameterPipe;

impl Pipe for ParameterPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        PapyrusStrategy::local_tag(&batch.data) == Some(TAG_OWNED_PARAMETER)
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let op_id = batch
            .parent_context
            .get(CONTEXT_OPERATION_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("parameter batch missing operation context", TAG_OWNED_PARAMETER))?
            .to_string();
        let parameter = &batch.data;
        let param_id = PapyrusStrategy::required_attr_local(parameter, "id", TAG_OWNED_PARAMETER)?.to_string();
        let param_name = PapyrusStrategy::attr_local(parameter, "name").map(str::to_string);
        let direction = match PapyrusStrategy::attr_local(parameter, "direction") {
            Some("return") => ParameterDirection::Return,
            Some("out") => ParameterDirection::Out,
            Some("inout") => ParameterDirection::Inout,
            _ => ParameterDirection::In,
        };
        let type_id = PapyrusStrategy::type_reference(parameter, "type");
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
        "papyrus-parameter"
    }
}

impl Default for PapyrusStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for PapyrusStrategy {
    fn supported_format(&self) -> SupportedFormat {
        SupportedFormat::Papyrus
    }

    fn name(&self) -> &'static str {
        "papyrus"
    }

    fn can_deserialize(&self, source: &DataSource) -> TranslationResult<bool> {
        let root = match parse_xml_to_value(source.content()?) {
            Ok(root) => root,
            Err(_) => return Ok(false),
        };
        let mut scratch = UmlModelBuilder::new("__papyrus-detect__");
        match self.detection_pipe().is_supported_format(DataBatch::new(root), &mut scratch) {
            Ok(matched) => Ok(matched),
            Err(err) if err.is_unsupported_format() => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn process(&self, source: &DataSource, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let root = parse_xml_to_value(source.content()?)?;
        let mut context = HashMap::new();
        if let Some(stem) = source.file_path().and_then(|p| p.file_stem()).map(|s| s.to_string_lossy().into_owned()) {
            context.insert(CONTEXT_FILE_STEM.to_string(), Value::String(stem));
        }
        self.processing_pipe().run(DataBatch::with_context(root, context), builder)
    }

    fn detection_pipe(&self) -> FormatDetectionPipe<Box<dyn Pipe>> {
        Self::detection_pipe()
    }

    fn processing_pipe(&self) -> PipeNode {
        Self::processing_pipe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classifier;

    const SAMPLE_UML: &str = r#"<uml:Model xmi:id="_model" xmi:type="uml:Model" name="car-model" xmlns:xmi="http://www.omg.org/XMI" xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
        <packagedElement xmi:type="uml:Class" xmi:id="_car" name="Car">
            <ownedAttribute xmi:id="_wheels" name="wheels">
                <type xmi:idref="_int"/>
            </ownedAttribute>
        </packagedElement>
        <packagedElement xmi:type="uml:PrimitiveType" xmi:id="_int" name="int"/>
    </uml:Model>"#;

    const SAMPLE_NOTATION: &str = r#"<notation:Diagram xmi:id="_diagram" name="car-diagram" type="PapyrusUMLClassDiagram" xmlns:xmi="http://www.omg.org/XMI" xmlns:notation="http://www.eclipse.org/gmf/runtime/1.0.2/notation">
        <children element="platform:/resource/car/car.uml#_car"/>
    </notation:Diagram>"#;

    #[test]
    fn test_can_deserialize_recognizes_uml_model() {
        let strategy = PapyrusStrategy::new();
        let source = DataSource::from_str(SAMPLE_UML);
        assert!(strategy.can_deserialize(&source).unwrap());
    }

    #[test]
    fn test_can_deserialize_recognizes_notation() {
        let strategy = PapyrusStrategy::new();
        let source = DataSource::from_str(SAMPLE_NOTATION);
        assert!(strategy.can_deserialize(&source).unwrap());
    }

    #[test]
    fn test_can_deserialize_rejects_ea_namespace() {
        let strategy = PapyrusStrategy::new();
        let xml = r#"<uml:Model xmi:id="_m" xmi:type="uml:Model" name="m" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1"/>"#;
        let source = DataSource::from_str(xml);
        assert!(!strategy.can_deserialize(&source).unwrap());
    }

    #[test]
    fn test_process_uml_builds_class_with_attribute_type() {
        let strategy = PapyrusStrategy::new();
        let source = DataSource::from_str(SAMPLE_UML);
        let mut builder = UmlModelBuilder::new("_model");
        strategy.process(&source, &mut builder).unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.elements.classes.len(), 1);
        let car = &model.elements.classes[0];
        assert_eq!(car.borrow().attributes().len(), 1);
        assert!(car.borrow().attributes()[0].borrow().type_ref.is_some());
    }

    #[test]
    fn test_process_notation_builds_class_diagram_with_referenced_element() {
        let strategy = PapyrusStrategy::new();
        let uml_source = DataSource::from_str(SAMPLE_UML);
        let mut builder = UmlModelBuilder::new("_model");
        strategy.process(&uml_source, &mut builder).unwrap();

        let notation_source = DataSource::from_str(SAMPLE_NOTATION);
        strategy.process(&notation_source, &mut builder).unwrap();

        let model = builder.build().unwrap();
        assert_eq!(model.diagrams.class_diagrams.len(), 1);
        assert_eq!(model.diagrams.class_diagrams[0].elements.element_ids, vec!["_car".to_string()]);
    }
}
