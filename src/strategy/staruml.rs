//! StarUML's native `.mdj` JSON export.
//!
//! Grounded on `RootPipe`/`UmlModelPipe`/`UmlClassPipe`/`UmlAttributePipe`/
//! `UmlAssociationPipe`/`UmlAssociationEndPipe`/`UmlGeneralizationPipe`/
//! `UmlInterfaceRealizationPipe` in
//! `core/deserialization/formats/staruml_mdj/staruml_mdj_model_processing_pipeline.py`,
//! and `StarumlMDJConfig` for the `_type` discriminator vocabulary. That
//! pipeline never registers a `UMLDependency` or `UMLInteraction`/
//! `UMLLifeline`/`UMLMessage` pipe, and its `UmlInterfacePipe` only
//! recurses into `operations`, not `attributes` -- this strategy adds
//! dependency and interaction handling (mirroring
//! [`super::ea_xmi::EaXmiStrategy`]'s own extension of its prototype)
//! and recurses both member arrays for every classifier kind uniformly,
//! since [`crate::model::Classifier`] makes no such distinction.
//!
//! Every `$ref`-shaped reference (`{"type": {"$ref": "id"}}` vs a bare
//! id string) is resolved with [`flatten_reference`], following
//! `_flatten_reference`'s literal call sites in the pipeline above.
//!
//! Document-level dispatch (model construction, then relationships)
//! and member construction flow through a real pipe tree, the same
//! shape [`super::ea_xmi::EaXmiStrategy`] and [`super::papyrus::PapyrusStrategy`]
//! use. Package/class nesting stays a plain recursive pass for the same
//! reason it does in both of those: a `PipeNode` tree's shape is fixed
//! once built, so it can't express the unbounded recursive package
//! depth a single document may nest classifiers under, and a class
//! here additionally nests further classifiers under its own
//! `ownedElements` (unlike EA/Papyrus, where only packages nest).
//! Diagram elements are interleaved with classifiers in `ownedElements`
//! in this dialect (there is no separate GMF-style pass), so they are
//! handled inline in the same recursive pass rather than through the
//! pipe tree.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::builder::UmlModelBuilder;
use crate::data_source::DataSource;
use crate::errors::{TranslationError, TranslationResult};
use crate::model::{FeatureFlags, Handle, Lifeline, Multiplicity, ParameterDirection, PrimitiveKind, Visibility};
use crate::pipeline::{array_of, flatten_reference, optional_str, required_str, DataBatch, FormatDetectionPipe, Pipe, PipeNode};
use crate::strategy::{Strategy, SupportedFormat};

const KEY_TYPE: &str = "_type";
const KEY_ID: &str = "_id";
const KEY_NAME: &str = "name";
const KEY_VISIBILITY: &str = "visibility";
const KEY_IS_ABSTRACT: &str = "isAbstract";
const KEY_OWNED_ELEMENTS: &str = "ownedElements";
const KEY_ATTRIBUTES: &str = "attributes";
const KEY_OPERATIONS: &str = "operations";
const KEY_PARAMETERS: &str = "parameters";
const KEY_LITERALS: &str = "literals";
const KEY_TYPE_REF: &str = "type";
const KEY_END1: &str = "end1";
const KEY_END2: &str = "end2";
const KEY_REFERENCE: &str = "reference";
const KEY_MULTIPLICITY: &str = "multiplicity";
const KEY_AGGREGATION: &str = "aggregation";
const KEY_NAVIGABLE: &str = "navigable";
const KEY_SOURCE: &str = "source";
const KEY_TARGET: &str = "target";
const KEY_DIRECTION: &str = "direction";
const KEY_OWNED_VIEWS: &str = "ownedViews";
const KEY_MODEL_REF: &str = "model";

const TYPE_PROJECT: &str = "Project";
const TYPE_MODEL: &str = "UMLModel";
const TYPE_PACKAGE: &str = "UMLPackage";
const TYPE_CLASS: &str = "UMLClass";
const TYPE_INTERFACE: &str = "UMLInterface";
const TYPE_DATA_TYPE: &str = "UMLDataType";
const TYPE_ENUMERATION: &str = "UMLEnumeration";
const TYPE_PRIMITIVE_TYPE: &str = "UMLPrimitiveType";
const TYPE_ASSOCIATION: &str = "UMLAssociation";
const TYPE_GENERALIZATION: &str = "UMLGeneralization";
const TYPE_DEPENDENCY: &str = "UMLDependency";
const TYPE_REALIZATION: &str = "UMLInterfaceRealization";
const TYPE_INTERACTION: &str = "UMLInteraction";
const TYPE_LIFELINE: &str = "UMLLifeline";
const TYPE_MESSAGE: &str = "UMLMessage";

const CONTEXT_CLASSIFIER_ID: &str = "classifier_id";
const CONTEXT_OPERATION_ID: &str = "operation_id";

/// Parses StarUML's native `.mdj` JSON export.
pub struct StarUmlStrategy;

impl StarUmlStrategy {
    /// Construct the strategy. Stateless, like every JSON-native pipe
    /// in the pipeline this is grounded on.
    pub fn new() -> Self {
        Self
    }

    fn required_object<'a>(value: &'a Value, location: &str) -> TranslationResult<&'a Map<String, Value>> {
        value.as_object().ok_or_else(|| TranslationError::invalid_format("expected a json object", location.to_string()))
    }

    /// Resolve a field that is either a bare id string or an MDJ
    /// `{"$ref": "id"}` reference object.
    fn reference_id(object: &Map<String, Value>, key: &str) -> Option<String> {
        let value = object.get(key)?;
        if let Value::String(id) = value {
            return Some(id.clone());
        }
        let mut scratch = Map::new();
        scratch.insert(key.to_string(), value.clone());
        flatten_reference(&mut scratch, key, Some("id"), true);
        scratch.get("id").and_then(Value::as_str).map(str::to_string)
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

    /// The document's `UMLModel` object: either the document root
    /// itself, or the first `UMLModel` found among a `Project`
    /// document's `ownedElements`.
    fn model_element(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
        if optional_str(root, KEY_TYPE) == Some(TYPE_MODEL) {
            return Some(root);
        }
        array_of(root, KEY_OWNED_ELEMENTS)
            .iter()
            .filter_map(Value::as_object)
            .find(|child| optional_str(child, KEY_TYPE) == Some(TYPE_MODEL))
    }

    /// First pass: construct every non-relationship owned element
    /// (packages and classes recurse into their own `ownedElements`;
    /// classifiers register their members through
    /// [`Self::construct_members`]'s own pipe tree), and collect
    /// relationship elements for a second pass at the caller.
    fn construct_classifiers<'a>(
        elements: &'a [Value],
        parent_package: Option<&str>,
        builder: &mut UmlModelBuilder,
        relationships: &mut Vec<&'a Value>,
    ) -> TranslationResult<()> {
        for element in elements {
            let object = Self::required_object(element, "ownedElements")?;
            let kind = required_str(object, KEY_TYPE)?;
            let id = required_str(object, KEY_ID)?.to_string();
            let name = optional_str(object, KEY_NAME).map(str::to_string);
            let visibility = optional_str(object, KEY_VISIBILITY).map(Visibility::parse_or_default).unwrap_or_default();

            match kind {
                TYPE_PACKAGE => {
                    builder.construct_package(id.clone(), name, visibility)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    Self::construct_classifiers(array_of(object, KEY_OWNED_ELEMENTS), Some(&id), builder, relationships)?;
                }
                TYPE_CLASS => {
                    let is_abstract = object.get(KEY_IS_ABSTRACT).and_then(Value::as_bool).unwrap_or(false);
                    builder.construct_class(id.clone(), name, visibility, is_abstract)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    Self::construct_members(object, &id, builder)?;
                    Self::construct_classifiers(array_of(object, KEY_OWNED_ELEMENTS), Some(&id), builder, relationships)?;
                }
                TYPE_INTERFACE => {
                    builder.construct_interface(id.clone(), name, visibility)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    Self::construct_members(object, &id, builder)?;
                }
                TYPE_DATA_TYPE => {
                    builder.construct_data_type(id.clone(), name, visibility)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                    Self::construct_members(object, &id, builder)?;
                }
                TYPE_ENUMERATION => {
                    let literals = array_of(object, KEY_LITERALS)
                        .iter()
                        .filter_map(Value::as_object)
                        .filter_map(|literal| optional_str(literal, KEY_NAME).map(str::to_string))
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
                    Self::construct_interaction(object, &id, name, builder)?;
                    Self::bind_to_parent(&id, parent_package, builder);
                }
                TYPE_ASSOCIATION | TYPE_GENERALIZATION | TYPE_DEPENDENCY | TYPE_REALIZATION => {
                    relationships.push(element);
                }
                kind if kind.contains("ClassDiagram") || kind.contains("SequenceDiagram") => {
                    Self::process_diagram(object, kind, &id, name, builder)?;
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
    /// [AttributePipe, OperationPipe -> ParameterPipe]`).
    fn construct_members(object: &Map<String, Value>, classifier_id: &str, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let tree = PipeNode::new(Box::new(MembersPipe)).add_next(PipeNode::new(Box::new(AttributePipe))).add_next(
            PipeNode::new(Box::new(OperationPipe)).add_next(PipeNode::new(Box::new(ParameterPipe))),
        );
        let mut context = HashMap::new();
        context.insert(CONTEXT_CLASSIFIER_ID.to_string(), Value::String(classifier_id.to_string()));
        tree.run(DataBatch::with_context(Value::Object(object.clone()), context), builder)
    }

    fn construct_relationship(element: &Value, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let object = Self::required_object(element, "relationship")?;
        let kind = required_str(object, KEY_TYPE)?;
        let id = required_str(object, KEY_ID)?.to_string();
        match kind {
            TYPE_GENERALIZATION => {
                let specific_id = Self::reference_id(object, KEY_SOURCE)
                    .ok_or_else(|| TranslationError::invalid_format("generalization missing source", TYPE_GENERALIZATION))?;
                let general_id = Self::reference_id(object, KEY_TARGET)
                    .ok_or_else(|| TranslationError::invalid_format("generalization missing target", TYPE_GENERALIZATION))?;
                builder.construct_generalization(id, specific_id, general_id);
            }
            TYPE_DEPENDENCY => {
                let client_id = Self::reference_id(object, KEY_SOURCE)
                    .ok_or_else(|| TranslationError::invalid_format("dependency missing source", TYPE_DEPENDENCY))?;
                let supplier_id = Self::reference_id(object, KEY_TARGET)
                    .ok_or_else(|| TranslationError::invalid_format("dependency missing target", TYPE_DEPENDENCY))?;
                builder.construct_dependency(id, &client_id, &supplier_id);
            }
            TYPE_REALIZATION => {
                let client_id = Self::reference_id(object, KEY_SOURCE)
                    .ok_or_else(|| TranslationError::invalid_format("realization missing source", TYPE_REALIZATION))?;
                let supplier_id = Self::reference_id(object, KEY_TARGET)
                    .ok_or_else(|| TranslationError::invalid_format("realization missing target", TYPE_REALIZATION))?;
                builder.construct_realization(id, &client_id, &supplier_id);
            }
            TYPE_ASSOCIATION => Self::construct_association(object, id, builder)?,
            _ => unreachable!("only relationship kinds are collected"),
        }
        Ok(())
    }

    fn construct_association(object: &Map<String, Value>, id: String, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let end1_value = object
            .get(KEY_END1)
            .ok_or_else(|| TranslationError::invalid_format("association missing end1", TYPE_ASSOCIATION))?;
        let end2_value = object
            .get(KEY_END2)
            .ok_or_else(|| TranslationError::invalid_format("association missing end2", TYPE_ASSOCIATION))?;
        let end1_object = Self::required_object(end1_value, "end1")?;
        let end2_object = Self::required_object(end2_value, "end2")?;

        let end1 = Self::construct_end(end1_object, builder)?;
        let end2 = Self::construct_end(end2_object, builder)?;

        let aggregation = optional_str(end2_object, KEY_AGGREGATION).or_else(|| optional_str(end1_object, KEY_AGGREGATION));
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

    fn construct_end(object: &Map<String, Value>, builder: &mut UmlModelBuilder) -> TranslationResult<Handle<crate::model::AssociationEnd>> {
        let end_id = required_str(object, KEY_ID)?.to_string();
        let element_id = Self::reference_id(object, KEY_REFERENCE)
            .ok_or_else(|| TranslationError::invalid_format("association end missing a reference", "UMLAssociationEnd"))?;
        let role = optional_str(object, KEY_NAME).map(str::to_string);
        let multiplicity = optional_str(object, KEY_MULTIPLICITY).map(Multiplicity::parse_or_default).unwrap_or_default();
        let navigability = object.get(KEY_NAVIGABLE).and_then(Value::as_bool).unwrap_or(true);
        builder.construct_association_end(end_id, &element_id, role, multiplicity, navigability)
    }

    fn construct_interaction(object: &Map<String, Value>, id: &str, name: Option<String>, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let mut lifelines = Vec::new();
        let mut lifeline_by_id: HashMap<String, Handle<Lifeline>> = HashMap::new();
        for participant in array_of(object, KEY_OWNED_ELEMENTS) {
            let Some(participant) = participant.as_object() else { continue };
            if optional_str(participant, KEY_TYPE) != Some(TYPE_LIFELINE) {
                continue;
            }
            let lifeline_id = required_str(participant, KEY_ID)?.to_string();
            let lifeline_name = optional_str(participant, KEY_NAME).map(str::to_string);
            let represents = Self::reference_id(participant, KEY_REFERENCE)
                .ok_or_else(|| TranslationError::invalid_format("lifeline missing represented classifier", TYPE_LIFELINE))?;
            let lifeline = builder.construct_lifeline(lifeline_id.clone(), lifeline_name, &represents)?;
            lifeline_by_id.insert(lifeline_id, lifeline.clone());
            lifelines.push(lifeline);
        }

        let mut messages = Vec::new();
        let mut fragments = Vec::new();
        for message in array_of(object, KEY_OWNED_ELEMENTS) {
            let Some(message) = message.as_object() else { continue };
            if optional_str(message, KEY_TYPE) != Some(TYPE_MESSAGE) {
                continue;
            }
            let message_id = required_str(message, KEY_ID)?.to_string();
            let source_id = Self::reference_id(message, KEY_SOURCE)
                .ok_or_else(|| TranslationError::invalid_format("message missing source lifeline", TYPE_MESSAGE))?;
            let target_id = Self::reference_id(message, KEY_TARGET)
                .ok_or_else(|| TranslationError::invalid_format("message missing target lifeline", TYPE_MESSAGE))?;
            let Some(send_lifeline) = lifeline_by_id.get(&source_id).cloned() else {
                return Err(TranslationError::invalid_format("message source references an unknown lifeline", TYPE_MESSAGE));
            };
            let Some(receive_lifeline) = lifeline_by_id.get(&target_id).cloned() else {
                return Err(TranslationError::invalid_format("message target references an unknown lifeline", TYPE_MESSAGE));
            };
            let send_event = builder.construct_occurrence_specification(format!("{message_id}-send"), send_lifeline)?;
            let receive_event = builder.construct_occurrence_specification(format!("{message_id}-receive"), receive_lifeline)?;
            let sort = match optional_str(message, "messageSort") {
                Some("asynchCall") => crate::model::MessageSort::AsynchCall,
                Some("asynchSignal") => crate::model::MessageSort::AsynchSignal,
                Some("createMessage") => crate::model::MessageSort::CreateMsg,
                Some("deleteMessage") => crate::model::MessageSort::DeleteMsg,
                Some("reply") => crate::model::MessageSort::Reply,
                _ => crate::model::MessageSort::SynchCall,
            };
            let built = builder.construct_message(
                message_id,
                send_event.clone(),
                receive_event,
                sort,
                crate::model::MessageKind::Complete,
                Vec::new(),
            )?;
            messages.push(built.clone());
            fragments.push(crate::model::Fragment::Occurrence(send_event));
        }

        builder.construct_interaction(id.to_string(), name, lifelines, messages, fragments)?;
        Ok(())
    }

    fn process_diagram(object: &Map<String, Value>, kind: &str, id: &str, name: Option<String>, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let mut element_ids = Vec::new();
        for view in array_of(object, KEY_OWNED_VIEWS) {
            Self::collect_model_refs(view, &mut element_ids);
        }

        if kind.contains("Sequence") {
            builder.construct_sequence_diagram(id.to_string(), name, element_ids)?;
        } else {
            builder.construct_class_diagram(id.to_string(), name, element_ids)?;
        }
        Ok(())
    }

    fn collect_model_refs(value: &Value, out: &mut Vec<String>) {
        let Some(object) = value.as_object() else { return };
        if let Some(id) = Self::reference_id(object, KEY_MODEL_REF) {
            out.push(id);
        }
        for child in array_of(object, KEY_OWNED_VIEWS) {
            Self::collect_model_refs(child, out);
        }
    }

    /// Assemble the detection pipe: a single node checking the
    /// document root's `_type` against `Project`/`UMLModel`. Never
    /// mutates `builder`.
    fn detection_pipe() -> FormatDetectionPipe<Box<dyn Pipe>> {
        FormatDetectionPipe::new(Box::new(RootDetectionPipe))
    }

    /// Assemble the processing tree: `RootPipe` locates the document's
    /// `UMLModel` object and hands it to `ModelPipe -> RelationshipPipe`.
    fn processing_pipe() -> PipeNode {
        PipeNode::new(Box::new(RootPipe)).add_next(PipeNode::new(Box::new(ModelPipe)).add_next(PipeNode::new(Box::new(RelationshipPipe))))
    }
}

struct RootDetectionPipe;

impl Pipe for RootDetectionPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let Some(object) = batch.data.as_object() else {
            return Err(TranslationError::unsupported("document root is not a json object"));
        };
        if matches!(optional_str(object, KEY_TYPE), Some(TYPE_PROJECT) | Some(TYPE_MODEL)) {
            Ok(Vec::new())
        } else {
            Err(TranslationError::unsupported("root _type is neither Project nor UMLModel"))
        }
    }

    fn name(&self) -> &str {
        "staruml-root-detect"
    }
}

struct RootPipe;

impl Pipe for RootPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let object = StarUmlStrategy::required_object(&batch.data, "document root")?;
        let model = StarUmlStrategy::model_element(object).ok_or_else(|| TranslationError::unsupported("no UMLModel element found"))?;
        Ok(vec![batch.child(Value::Object(model.clone()), [])])
    }

    fn name(&self) -> &str {
        "staruml-root"
    }
}

struct ModelPipe;

impl Pipe for ModelPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let model = StarUmlStrategy::required_object(&batch.data, KEY_TYPE)?;
        let name = optional_str(model, KEY_NAME).map(str::to_string);
        builder.construct_model(name);

        let top_level = array_of(model, KEY_OWNED_ELEMENTS);
        let mut relationships: Vec<&Value> = Vec::new();
        StarUmlStrategy::construct_classifiers(top_level, None, builder, &mut relationships)?;
        Ok(relationships.into_iter().map(|relationship| batch.child(relationship.clone(), [])).collect())
    }

    fn name(&self) -> &str {
        "staruml-model"
    }
}

struct RelationshipPipe;

impl Pipe for RelationshipPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        let Some(object) = batch.data.as_object() else { return false };
        matches!(
            optional_str(object, KEY_TYPE),
            Some(TYPE_ASSOCIATION) | Some(TYPE_GENERALIZATION) | Some(TYPE_DEPENDENCY) | Some(TYPE_REALIZATION)
        )
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        StarUmlStrategy::construct_relationship(&batch.data, builder)?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "staruml-relationship"
    }
}

struct MembersPipe;

impl Pipe for MembersPipe {
    fn can_process(&self, _batch: &DataBatch) -> bool {
        true
    }

    fn process(&self, batch: DataBatch, _builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let object = StarUmlStrategy::required_object(&batch.data, KEY_TYPE)?;
        let mut children = Vec::new();
        for attribute in array_of(object, KEY_ATTRIBUTES) {
            children.push(batch.child(attribute.clone(), []));
        }
        for operation in array_of(object, KEY_OPERATIONS) {
            children.push(batch.child(operation.clone(), []));
        }
        Ok(children)
    }

    fn name(&self) -> &str {
        "staruml-members"
    }
}

struct AttributePipe;

impl Pipe for AttributePipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        let Some(object) = batch.data.as_object() else { return false };
        optional_str(object, KEY_TYPE).is_some_and(|t| t.ends_with("Attribute"))
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let classifier_id = batch
            .parent_context
            .get(CONTEXT_CLASSIFIER_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("attribute batch missing classifier context", KEY_ATTRIBUTES))?
            .to_string();
        let attribute = StarUmlStrategy::required_object(&batch.data, KEY_ATTRIBUTES)?;
        let attr_id = required_str(attribute, KEY_ID)?.to_string();
        let name = optional_str(attribute, KEY_NAME).map(str::to_string);
        let visibility = optional_str(attribute, KEY_VISIBILITY).map(Visibility::parse_or_default).unwrap_or_default();
        let type_id = StarUmlStrategy::reference_id(attribute, KEY_TYPE_REF);
        builder.construct_attribute(attr_id, name, visibility, classifier_id, type_id, FeatureFlags::default())?;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "staruml-attribute"
    }
}

struct OperationPipe;

impl Pipe for OperationPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        let Some(object) = batch.data.as_object() else { return false };
        optional_str(object, KEY_TYPE).is_some_and(|t| t.ends_with("Operation"))
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let classifier_id = batch
            .parent_context
            .get(CONTEXT_CLASSIFIER_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("operation batch missing classifier context", KEY_OPERATIONS))?
            .to_string();
        let operation = StarUmlStrategy::required_object(&batch.data, KEY_OPERATIONS)?;
        let op_id = required_str(operation, KEY_ID)?.to_string();
        let name = optional_str(operation, KEY_NAME).map(str::to_string);
        let visibility = optional_str(operation, KEY_VISIBILITY).map(Visibility::parse_or_default).unwrap_or_default();
        builder.construct_operation(op_id.clone(), name, visibility, classifier_id)?;

        let parameters = array_of(operation, KEY_PARAMETERS);
        Ok(parameters
            .iter()
            .map(|parameter| batch.child(parameter.clone(), [(CONTEXT_OPERATION_ID.to_string(), Value::String(op_id.clone()))]))
            .collect())
    }

    fn name(&self) -> &str {
        "staruml-operation"
    }
}

struct ParameterPipe;

impl Pipe for ParameterPipe {
    fn can_process(&self, batch: &DataBatch) -> bool {
        let Some(object) = batch.data.as_object() else { return false };
        optional_str(object, KEY_TYPE).is_some_and(|t| t.ends_with("Parameter"))
    }

    fn process(&self, batch: DataBatch, builder: &mut UmlModelBuilder) -> TranslationResult<Vec<DataBatch>> {
        let op_id = batch
            .parent_context
            .get(CONTEXT_OPERATION_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| TranslationError::invalid_format("parameter batch missing operation context", KEY_PARAMETERS))?
            .to_string();
        let parameter = StarUmlStrategy::required_object(&batch.data, KEY_PARAMETERS)?;
        let param_id = required_str(parameter, KEY_ID)?.to_string();
        let param_name = optional_str(parameter, KEY_NAME).map(str::to_string);
        let direction = match optional_str(parameter, KEY_DIRECTION) {
            Some("return") => ParameterDirection::Return,
            Some("out") => ParameterDirection::Out,
            Some("inout") => ParameterDirection::Inout,
            _ => ParameterDirection::In,
        };
        let type_id = StarUmlStrategy::reference_id(parameter, KEY_TYPE_REF);
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
        "staruml-parameter"
    }
}

impl Default for StarUmlStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for StarUmlStrategy {
    fn supported_format(&self) -> SupportedFormat {
        SupportedFormat::StarUml
    }

    fn name(&self) -> &'static str {
        "staruml-mdj"
    }

    fn can_deserialize(&self, source: &DataSource) -> TranslationResult<bool> {
        let Ok(root) = serde_json::from_str::<Value>(source.content()?) else {
            return Ok(false);
        };
        let mut scratch = UmlModelBuilder::new("__staruml-detect__");
        match Self::detection_pipe().is_supported_format(DataBatch::new(root), &mut scratch) {
            Ok(matched) => Ok(matched),
            Err(err) if err.is_unsupported_format() => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn process(&self, source: &DataSource, builder: &mut UmlModelBuilder) -> TranslationResult<()> {
        let root: Value = serde_json::from_str(source.content()?)?;
        Self::processing_pipe().run(DataBatch::new(root), builder)
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

    const SAMPLE: &str = r#"{
        "_type": "UMLModel",
        "_id": "model-1",
        "name": "Library",
        "ownedElements": [
            {
                "_type": "UMLClass",
                "_id": "c-book",
                "name": "Book",
                "attributes": [
                    {"_type": "UMLAttribute", "_id": "a-title", "name": "title", "type": {"$ref": "t-string"}}
                ]
            },
            {"_type": "UMLPrimitiveType", "_id": "t-string", "name": "String"}
        ]
    }"#;

    #[test]
    fn test_can_deserialize_recognizes_uml_model() {
        let strategy = StarUmlStrategy::new();
        let source = DataSource::from_str(SAMPLE);
        assert!(strategy.can_deserialize(&source).unwrap());
    }

    #[test]
    fn test_can_deserialize_rejects_other_json() {
        let strategy = StarUmlStrategy::new();
        let source = DataSource::from_str(r#"{"_type": "SomethingElse"}"#);
        assert!(!strategy.can_deserialize(&source).unwrap());
    }

    #[test]
    fn test_process_builds_class_with_attribute_type() {
        let strategy = StarUmlStrategy::new();
        let source = DataSource::from_str(SAMPLE);
        let mut builder = UmlModelBuilder::new("model-1");
        strategy.process(&source, &mut builder).unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.elements.classes.len(), 1);
        let book = &model.elements.classes[0];
        assert_eq!(book.borrow().attributes().len(), 1);
        assert!(book.borrow().attributes()[0].borrow().type_ref.is_some());
    }

    #[test]
    fn test_process_resolves_generalization_after_full_classifier_pass() {
        let strategy = StarUmlStrategy::new();
        let source = DataSource::from_str(
            r#"{
                "_type": "UMLModel",
                "_id": "model-1",
                "name": "Shapes",
                "ownedElements": [
                    {"_type": "UMLGeneralization", "_id": "g1", "source": {"$ref": "c-square"}, "target": {"$ref": "c-shape"}},
                    {"_type": "UMLClass", "_id": "c-square", "name": "Square"},
                    {"_type": "UMLClass", "_id": "c-shape", "name": "Shape"}
                ]
            }"#,
        );
        let mut builder = UmlModelBuilder::new("model-1");
        strategy.process(&source, &mut builder).unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.elements.generalizations.len(), 1);
    }
}
