//! The fluent, fallible construction API wrapping the canonical
//! [`Model`] and its [`IdResolver`].
//!
//! Grounded on `UmlModelBuilder`/`IUmlModelBuilder` in
//! `core/model/umlars_model/uml_model_builder.py` and
//! `core/model/abstract/uml_model_builder.py`. Every `construct_*`
//! there logs the call and returns `self` for chaining; here the
//! return is `TranslationResult<&mut Self>` instead of a bare `&mut
//! Self`, since a duplicate id must surface as an error,
//! not be swallowed -- the one necessary deviation from pure fluent
//! chaining. Unimplemented/optional operations use [`log_and_noop`]
//! rather than an open-ended catch-all.
//!
//! Edges whose far endpoint may not exist yet at construction time
//! (`Generalization`, `Dependency`, `Realization`, package membership)
//! mirror `register_dalayed_call_for_id` in the original builder: they
//! are queued and resolved once, at [`UmlModelBuilder::build`], rather
//! than chaining nested closures through the id resolver.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::errors::{TranslationError, TranslationResult};
use crate::id_resolver::IdResolver;
use crate::model::{
    handle, Aggregation, AnyElement, Association, AssociationEnd, Attribute, Class, ClassDiagram,
    ClassOrInterfaceRef, Classifier, ClassifierRef, CombinedFragment, Composition, DataType, Dependency,
    DirectedAssociation, Enumeration, FeatureFlags, Fragment, FragmentOperator, Generalization, Handle, Interaction,
    InteractionUse, Interface, Lifeline, Message, MessageKind, MessageSort, Model, Multiplicity,
    OccurrenceSpecification, Operand, Operation, Package, Parameter, ParameterDirection, PrimitiveKind,
    PrimitiveType, Realization, SequenceDiagram, TypeRef, Visibility,
};

/// Logs that an as-yet-unimplemented or intentionally no-op
/// construction operation was called, without disrupting the pipeline
/// (mirrors `log_calls_and_return_self` in
/// `core/model/abstract/uml_model_builder.py`).
macro_rules! log_and_noop {
    ($self:ident, $name:expr, $($arg:expr),* $(,)?) => {{
        debug!(operation = $name, $($arg,)* "construct operation not mapped to a canonical entity");
        $self
    }};
}

/// A generalization edge not yet resolvable at construction time.
struct PendingGeneralization {
    id: String,
    specific_id: String,
    general_id: String,
}

/// A dependency/realization edge not yet resolvable at construction time.
struct PendingDependency {
    id: String,
    client_id: String,
    supplier_id: String,
    is_realization: bool,
}

/// A package-membership edge not yet resolvable at construction time.
struct PendingMembership {
    element_id: String,
    package_id: String,
}

/// Builds a canonical [`Model`] incrementally, resolving
/// forward/out-of-order id references as they arrive.
pub struct UmlModelBuilder {
    model: Model,
    resolver: IdResolver<AnyElement>,
    known_ids: HashSet<String>,
    attributes: HashMap<String, Handle<Attribute>>,
    operations: HashMap<String, Handle<Operation>>,
    pending_generalizations: Vec<PendingGeneralization>,
    pending_dependencies: Vec<PendingDependency>,
    pending_memberships: Vec<PendingMembership>,
}

impl UmlModelBuilder {
    /// Construct an empty builder for a model with the given id.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model: Model::new(model_id, None),
            resolver: IdResolver::new(),
            known_ids: HashSet::new(),
            attributes: HashMap::new(),
            operations: HashMap::new(),
            pending_generalizations: Vec::new(),
            pending_dependencies: Vec::new(),
            pending_memberships: Vec::new(),
        }
    }

    /// The model built so far, without consuming the builder.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Finish construction: resolve every pending edge and drain the
    /// id resolver non-strictly (see [`Self::finish_strict`] for the
    /// fatal variant used once every document in a multi-document
    /// dialect has been loaded).
    pub fn build(mut self) -> TranslationResult<Model> {
        self.resolve_pending(false)?;
        self.resolver.flush(false)?;
        Ok(self.model)
    }

    /// As [`Self::build`], but any edge or reference that never
    /// resolves is a fatal [`TranslationError::UnresolvedReference`].
    pub fn finish_strict(mut self) -> TranslationResult<Model> {
        self.resolve_pending(true)?;
        self.resolver.flush(true)?;
        Ok(self.model)
    }

    /// Reset to an empty model, discarding all registered ids.
    pub fn clear(&mut self, model_id: impl Into<String>) {
        self.model = Model::new(model_id, None);
        self.resolver = IdResolver::new();
        self.known_ids.clear();
        self.attributes.clear();
        self.operations.clear();
        self.pending_generalizations.clear();
        self.pending_dependencies.clear();
        self.pending_memberships.clear();
    }

    /// Set the model's display name.
    pub fn construct_model(&mut self, name: Option<String>) -> &mut Self {
        debug!(operation = "construct_model", ?name);
        if let Some(name) = name {
            self.model.name = Some(name);
        }
        self
    }

    /// Attach arbitrary source metadata (tool name/version and the like).
    pub fn construct_metadata(&mut self, entries: impl IntoIterator<Item = (String, Value)>) -> &mut Self {
        self.model.metadata.extend(entries);
        self
    }

    /// Claim `id` into the single, model-wide id namespace (invariant
    /// I1), failing if it has already been claimed by any entity kind.
    fn claim(&mut self, id: &str) -> TranslationResult<()> {
        if !self.known_ids.insert(id.to_string()) {
            return Err(TranslationError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    /// As [`Self::claim`], but a repeated id is only an error if it
    /// points at a structurally different entity than the one already
    /// registered under it -- a re-declaration of the identical entity
    /// (e.g. the same class named twice across split documents) is
    /// tolerated. Returns whether `element` still needs registering
    /// (`false` means an identical entity already occupies `id`).
    fn claim_or_match(&mut self, id: &str, element: &AnyElement) -> TranslationResult<bool> {
        if !self.known_ids.insert(id.to_string()) {
            return match self.resolver.resolve(id) {
                Some(existing) if existing.structurally_eq(element) => Ok(false),
                _ => Err(TranslationError::DuplicateId(id.to_string())),
            };
        }
        Ok(true)
    }

    /// Register `element` under `id`, returning whether it is newly
    /// registered. `false` means an identical entity already occupied
    /// `id` -- the caller must not also push its freshly-built handle
    /// into the model's element store, or the re-declaration would
    /// appear twice.
    fn register(&mut self, id: &str, element: AnyElement) -> TranslationResult<bool> {
        let is_new = self.claim_or_match(id, &element)?;
        if is_new {
            self.resolver.register_if_absent(id.to_string(), element);
        }
        Ok(is_new)
    }

    /// Resolve `id` to a [`TypeRef`] once it exists, assigning it
    /// through `assign` -- deferred if the id hasn't arrived yet.
    fn defer_type_ref(&mut self, id: impl Into<String>, assign: impl FnOnce(TypeRef) + 'static) {
        self.resolver.defer(id, move |element| match element.as_type_ref() {
            Some(type_ref) => assign(type_ref),
            None => debug!("referenced id did not resolve to a valid feature type"),
        });
    }

    fn resolve_pending(&mut self, strict: bool) -> TranslationResult<()> {
        for pending in std::mem::take(&mut self.pending_generalizations) {
            let specific = self.resolver.resolve(&pending.specific_id).and_then(|e| e.as_class());
            let general = self.resolver.resolve(&pending.general_id).and_then(|e| e.as_class());
            match (specific, general) {
                (Some(specific), Some(general)) => {
                    let generalization = handle(Generalization::new(pending.id.clone(), specific, general));
                    let element = AnyElement::Generalization(generalization.clone());
                    if self.claim_or_match(&pending.id, &element)? {
                        self.model.elements.generalizations.push(generalization);
                        self.resolver.register_if_absent(pending.id, element);
                    }
                }
                _ if strict => return Err(TranslationError::UnresolvedReference(pending.id)),
                _ => debug!(id = %pending.id, "generalization endpoints never resolved; dropped"),
            }
        }

        for pending in std::mem::take(&mut self.pending_dependencies) {
            let client = self.resolver.resolve(&pending.client_id).and_then(|e| e.as_classifier_ref());
            let supplier = self.resolver.resolve(&pending.supplier_id).and_then(|e| e.as_classifier_ref());
            match (client, supplier) {
                (Some(client), Some(supplier)) => {
                    if pending.is_realization {
                        let realization = handle(Realization::new(pending.id.clone(), client.clone(), supplier));
                        let element = AnyElement::Realization(realization.clone());
                        if self.claim_or_match(&pending.id, &element)? {
                            self.model.elements.realizations.push(realization.clone());
                            if let ClassifierRef::Class(class) = client {
                                class.borrow_mut().realizations.push(realization);
                            }
                            self.resolver.register_if_absent(pending.id, element);
                        }
                    } else {
                        let dependency = handle(Dependency::new(pending.id.clone(), client, supplier));
                        let element = AnyElement::Dependency(dependency.clone());
                        if self.claim_or_match(&pending.id, &element)? {
                            self.model.elements.dependencies.push(dependency);
                            self.resolver.register_if_absent(pending.id, element);
                        }
                    }
                }
                _ if strict => return Err(TranslationError::UnresolvedReference(pending.id)),
                _ => debug!(id = %pending.id, "dependency/realization endpoints never resolved; dropped"),
            }
        }

        for pending in std::mem::take(&mut self.pending_memberships) {
            let element = self.resolver.resolve(&pending.element_id);
            let package = self.resolver.resolve(&pending.package_id).and_then(|e| match e {
                AnyElement::Package(p) => Some(p),
                _ => None,
            });
            match (element, package) {
                (Some(element), Some(package)) => package.borrow_mut().members.push(element),
                _ if strict => return Err(TranslationError::UnresolvedReference(pending.element_id)),
                _ => debug!(
                    element_id = %pending.element_id, package_id = %pending.package_id,
                    "package membership never resolved; dropped",
                ),
            }
        }

        Ok(())
    }

    /// Construct a class.
    pub fn construct_class(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
        is_abstract: bool,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let mut class = Class::new(id.clone(), name, visibility);
        class.is_abstract = is_abstract;
        let class = handle(class);
        if self.register(&id, AnyElement::Class(class.clone()))? {
            self.model.elements.classes.push(class);
        }
        Ok(self)
    }

    /// Construct an interface.
    pub fn construct_interface(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let interface = handle(Interface::new(id.clone(), name, visibility));
        if self.register(&id, AnyElement::Interface(interface.clone()))? {
            self.model.elements.interfaces.push(interface);
        }
        Ok(self)
    }

    /// Construct a data type.
    pub fn construct_data_type(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let data_type = handle(DataType::new(id.clone(), name, visibility));
        if self.register(&id, AnyElement::DataType(data_type.clone()))? {
            self.model.elements.data_types.push(data_type);
        }
        Ok(self)
    }

    /// Construct an enumeration with its literal sequence.
    pub fn construct_enumeration(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        literals: Vec<String>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let mut enumeration = Enumeration::new(id.clone(), name);
        enumeration.literals = literals;
        let enumeration = handle(enumeration);
        if self.register(&id, AnyElement::Enumeration(enumeration.clone()))? {
            self.model.elements.enumerations.push(enumeration);
        }
        Ok(self)
    }

    /// Construct a primitive type.
    pub fn construct_primitive_type(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        kind: PrimitiveKind,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let primitive = handle(PrimitiveType::new(id.clone(), name, kind));
        if self.register(&id, AnyElement::PrimitiveType(primitive.clone()))? {
            self.model.elements.primitive_types.push(primitive);
        }
        Ok(self)
    }

    /// Construct an attribute, deferring its type resolution and its
    /// registration into the owning classifier's member list if either
    /// id hasn't resolved yet.
    pub fn construct_attribute(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
        classifier_id: impl Into<String>,
        type_id: Option<String>,
        flags: FeatureFlags,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        self.claim(&id)?;
        let classifier_id = classifier_id.into();
        let attribute = handle(Attribute::new(id.clone(), name, visibility, classifier_id.clone(), flags));

        if let Some(type_id) = type_id {
            let attribute_for_type = attribute.clone();
            self.defer_type_ref(type_id, move |type_ref| {
                attribute_for_type.borrow_mut().type_ref = Some(type_ref);
            });
        }

        let attribute_for_owner = attribute.clone();
        self.resolver.defer(classifier_id, move |owner| {
            if !owner.push_attribute(attribute_for_owner.clone()) {
                debug!("attribute's classifier_id did not resolve to a classifier");
            }
        });

        self.attributes.insert(id, attribute);
        Ok(self)
    }

    /// Construct an operation, deferring its registration into the
    /// owning classifier's member list.
    pub fn construct_operation(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
        classifier_id: impl Into<String>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        self.claim(&id)?;
        let classifier_id = classifier_id.into();
        let operation = handle(Operation::new(id.clone(), name, visibility, classifier_id.clone()));

        let operation_for_owner = operation.clone();
        self.resolver.defer(classifier_id, move |owner| {
            if !owner.push_operation(operation_for_owner.clone()) {
                debug!("operation's classifier_id did not resolve to a classifier");
            }
        });

        self.operations.insert(id, operation);
        Ok(self)
    }

    /// Assign a resolved/deferred return type to an already-constructed
    /// operation.
    pub fn set_operation_return_type(&mut self, operation_id: &str, type_id: impl Into<String>) {
        if let Some(operation) = self.operations.get(operation_id).cloned() {
            self.defer_type_ref(type_id, move |type_ref| {
                operation.borrow_mut().return_type = Some(type_ref);
            });
        } else {
            debug!(operation_id, "return type set on an unknown operation id");
        }
    }

    /// Construct a parameter and append it to its owning operation's
    /// ordered parameter list (invariant I3). The operation must already
    /// be registered -- every supported dialect nests a parameter inside
    /// its owning operation element, so this never needs a deferred
    /// owner lookup the way attributes/operations do against their
    /// classifier.
    pub fn construct_parameter(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        operation_id: &str,
        type_id: Option<String>,
        direction: ParameterDirection,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        self.claim(&id)?;
        let parameter = Parameter::new(id, name, direction);

        let Some(operation) = self.operations.get(operation_id).cloned() else {
            debug!(operation_id, "parameter's operation_id did not resolve to an operation");
            return Ok(self);
        };

        let index = {
            let mut op = operation.borrow_mut();
            op.parameters.push(parameter);
            op.parameters.len() - 1
        };

        if let Some(type_id) = type_id {
            let operation_for_type = operation.clone();
            self.defer_type_ref(type_id, move |type_ref| {
                operation_for_type.borrow_mut().parameters[index].type_ref = Some(type_ref);
            });
        }

        Ok(self)
    }

    /// Construct a generalization edge, resolved once both `specific`
    /// and `general` exist (at latest, at [`Self::build`]).
    pub fn construct_generalization(
        &mut self,
        id: impl Into<String>,
        specific_id: impl Into<String>,
        general_id: impl Into<String>,
    ) -> &mut Self {
        self.pending_generalizations.push(PendingGeneralization {
            id: id.into(),
            specific_id: specific_id.into(),
            general_id: general_id.into(),
        });
        self
    }

    /// Construct a dependency edge between two classifiers, resolved
    /// once both endpoints exist.
    pub fn construct_dependency(&mut self, id: impl Into<String>, client_id: &str, supplier_id: &str) -> &mut Self {
        self.pending_dependencies.push(PendingDependency {
            id: id.into(),
            client_id: client_id.to_string(),
            supplier_id: supplier_id.to_string(),
            is_realization: false,
        });
        self
    }

    /// Construct a realization edge (client implements supplier),
    /// resolved once both endpoints exist.
    pub fn construct_realization(&mut self, id: impl Into<String>, client_id: &str, supplier_id: &str) -> &mut Self {
        self.pending_dependencies.push(PendingDependency {
            id: id.into(),
            client_id: client_id.to_string(),
            supplier_id: supplier_id.to_string(),
            is_realization: true,
        });
        self
    }

    /// Construct an association end. Returns the end's handle so the
    /// caller can assemble an association/directed association from it.
    /// The referenced classifier is expected to already be registered
    /// (every supported dialect declares classifiers before the
    /// associations between them).
    pub fn construct_association_end(
        &mut self,
        id: impl Into<String>,
        element_id: &str,
        role: Option<String>,
        multiplicity: Multiplicity,
        navigability: bool,
    ) -> TranslationResult<Handle<AssociationEnd>> {
        let id = id.into();
        self.claim(&id)?;
        let element = self
            .resolver
            .resolve(element_id)
            .and_then(|e| e.as_classifier_ref())
            .ok_or_else(|| TranslationError::UnresolvedReference(element_id.to_string()))?;
        let mut end = AssociationEnd::new(id, element, role);
        end.multiplicity = multiplicity;
        end.navigability = navigability;
        Ok(handle(end))
    }

    /// Construct a bidirectional association from two already-built ends.
    pub fn construct_association(
        &mut self,
        id: impl Into<String>,
        end1: Handle<AssociationEnd>,
        end2: Handle<AssociationEnd>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let association = handle(Association::new(id.clone(), end1, end2));
        if self.register(&id, AnyElement::Association(association.clone()))? {
            self.model.elements.associations.push(association);
        }
        Ok(self)
    }

    /// Construct a directed association (`source -> target`).
    pub fn construct_directed_association(
        &mut self,
        id: impl Into<String>,
        source: Handle<AssociationEnd>,
        target: Handle<AssociationEnd>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let directed = handle(DirectedAssociation::new(id.clone(), source, target));
        if self.register(&id, AnyElement::DirectedAssociation(directed.clone()))? {
            self.model.elements.directed_associations.push(directed);
        }
        Ok(self)
    }

    /// Construct an aggregation (shared-ownership directed association).
    /// Stored alongside plain directed associations: a directed association defines
    /// `Aggregation`/`Composition` as `DirectedAssociation` specializations
    /// with no extra fields, so the canonical store keeps one sequence.
    pub fn construct_aggregation(
        &mut self,
        id: impl Into<String>,
        source: Handle<AssociationEnd>,
        target: Handle<AssociationEnd>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let aggregation = Aggregation::new(id.clone(), source, target);
        let directed = handle(aggregation.directed);
        if self.register(&id, AnyElement::DirectedAssociation(directed.clone()))? {
            self.model.elements.directed_associations.push(directed);
        }
        Ok(self)
    }

    /// Construct a composition (owned-composition directed association).
    pub fn construct_composition(
        &mut self,
        id: impl Into<String>,
        source: Handle<AssociationEnd>,
        target: Handle<AssociationEnd>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let composition = Composition::new(id.clone(), source, target);
        let directed = handle(composition.directed);
        if self.register(&id, AnyElement::DirectedAssociation(directed.clone()))? {
            self.model.elements.directed_associations.push(directed);
        }
        Ok(self)
    }

    /// Construct a package.
    pub fn construct_package(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        visibility: Visibility,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let package = handle(Package::new(id.clone(), name, visibility));
        if self.register(&id, AnyElement::Package(package.clone()))? {
            self.model.elements.packages.push(package);
        }
        Ok(self)
    }

    /// Append an already-registered element to a package's ordered
    /// member list, by id. Resolved at [`Self::build`] if either id
    /// hasn't arrived yet.
    pub fn bind_element_to_package(&mut self, element_id: impl Into<String>, package_id: impl Into<String>) {
        self.pending_memberships.push(PendingMembership {
            element_id: element_id.into(),
            package_id: package_id.into(),
        });
    }

    /// Construct a lifeline. The represented classifier is expected to
    /// already be registered.
    pub fn construct_lifeline(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        represents_id: &str,
    ) -> TranslationResult<Handle<Lifeline>> {
        let id = id.into();
        self.claim(&id)?;
        let represents: ClassOrInterfaceRef = self
            .resolver
            .resolve(represents_id)
            .and_then(|e| e.as_class_or_interface_ref())
            .ok_or_else(|| TranslationError::UnresolvedReference(represents_id.to_string()))?;
        Ok(handle(Lifeline::new(id, name, represents)))
    }

    /// Construct an occurrence specification covering `lifeline`.
    pub fn construct_occurrence_specification(
        &mut self,
        id: impl Into<String>,
        lifeline: Handle<Lifeline>,
    ) -> TranslationResult<Handle<OccurrenceSpecification>> {
        let id = id.into();
        self.claim(&id)?;
        Ok(handle(OccurrenceSpecification::new(id, lifeline)))
    }

    /// Construct a message between two occurrences.
    pub fn construct_message(
        &mut self,
        id: impl Into<String>,
        send_event: Handle<OccurrenceSpecification>,
        receive_event: Handle<OccurrenceSpecification>,
        sort: MessageSort,
        kind: MessageKind,
        arguments: Vec<String>,
    ) -> TranslationResult<Handle<Message>> {
        let id = id.into();
        self.claim(&id)?;
        let mut message = Message::new(id, send_event, receive_event, sort, kind);
        message.arguments = arguments;
        Ok(handle(message))
    }

    /// Resolve and attach an invoked operation's signature to an
    /// already-built message, once the operation exists.
    pub fn set_message_signature(&mut self, message: Handle<Message>, operation_id: &str) {
        if let Some(operation) = self.operations.get(operation_id).cloned() {
            message.borrow_mut().signature = Some(operation);
        } else {
            debug!(operation_id, "message signature references an unknown operation");
        }
    }

    /// Construct an operand with no fragments yet.
    pub fn construct_operand(&mut self, id: impl Into<String>, guard: Option<String>) -> TranslationResult<Operand> {
        let id = id.into();
        self.claim(&id)?;
        Ok(Operand::new(id, guard))
    }

    /// Construct a combined fragment with no operands yet.
    pub fn construct_combined_fragment(
        &mut self,
        id: impl Into<String>,
        operator: FragmentOperator,
    ) -> TranslationResult<CombinedFragment> {
        let id = id.into();
        self.claim(&id)?;
        Ok(CombinedFragment::new(id, operator))
    }

    /// Construct an interaction use referring to an already-built interaction.
    pub fn construct_interaction_use(
        &mut self,
        id: impl Into<String>,
        interaction: Handle<Interaction>,
    ) -> TranslationResult<InteractionUse> {
        let id = id.into();
        self.claim(&id)?;
        Ok(InteractionUse::new(id, interaction))
    }

    /// Construct an interaction with the given lifelines, messages and
    /// ordered fragment sequence (invariant I3).
    pub fn construct_interaction(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        lifelines: Vec<Handle<Lifeline>>,
        messages: Vec<Handle<Message>>,
        fragments: Vec<Fragment>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        let mut interaction = Interaction::new(id.clone(), name);
        interaction.lifelines = lifelines;
        interaction.messages = messages;
        interaction.fragments = fragments;
        let interaction = handle(interaction);
        if self.register(&id, AnyElement::Interaction(interaction.clone()))? {
            self.model.elements.interactions.push(interaction);
        }
        Ok(self)
    }

    /// Construct a class diagram with the given referenced element ids.
    pub fn construct_class_diagram(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        element_ids: Vec<String>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        self.claim(&id)?;
        let mut diagram = ClassDiagram::new(id, name);
        diagram.elements.element_ids = element_ids;
        self.model.diagrams.class_diagrams.push(diagram);
        Ok(self)
    }

    /// Construct a sequence diagram with the given referenced element ids.
    pub fn construct_sequence_diagram(
        &mut self,
        id: impl Into<String>,
        name: Option<String>,
        element_ids: Vec<String>,
    ) -> TranslationResult<&mut Self> {
        let id = id.into();
        self.claim(&id)?;
        let mut diagram = SequenceDiagram::new(id, name);
        diagram.elements.element_ids = element_ids;
        self.model.diagrams.sequence_diagrams.push(diagram);
        Ok(self)
    }

    /// Record that a source element kind has no canonical-model
    /// counterpart (e.g. an EA `Documentation`/`Extension` node). Never
    /// disrupts translation (REDESIGN FLAGS: "Dynamic attribute access"
    /// is replaced by this explicit, named no-op rather than a silent
    /// catch-all).
    pub fn note_unmapped_element(&mut self, kind: &str, id: &str) -> &mut Self {
        log_and_noop!(self, "note_unmapped_element", kind = kind, id = id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_class_then_attribute_resolves_type() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_primitive_type("t1", Some("int".to_string()), PrimitiveKind::Int)
            .unwrap();
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        builder
            .construct_attribute(
                "a1",
                Some("speed".to_string()),
                Visibility::Private,
                "c1",
                Some("t1".to_string()),
                FeatureFlags::default(),
            )
            .unwrap();

        let model = builder.build().unwrap();
        assert_eq!(model.elements.classes.len(), 1);
        let class = &model.elements.classes[0];
        assert_eq!(class.borrow().attributes().len(), 1);
        assert!(class.borrow().attributes()[0].borrow().type_ref.is_some());
    }

    #[test]
    fn test_forward_reference_resolves_out_of_order() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        builder
            .construct_attribute(
                "a1",
                Some("speed".to_string()),
                Visibility::Private,
                "c1",
                Some("t1".to_string()),
                FeatureFlags::default(),
            )
            .unwrap();
        builder
            .construct_primitive_type("t1", Some("int".to_string()), PrimitiveKind::Int)
            .unwrap();

        let model = builder.build().unwrap();
        let class = &model.elements.classes[0];
        let attr = class.borrow().attributes()[0].clone();
        assert!(attr.borrow().type_ref.is_some());
    }

    #[test]
    fn test_duplicate_class_id_is_rejected() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        let err = builder
            .construct_class("c1", Some("Other".to_string()), Visibility::Public, false)
            .unwrap_err();
        assert!(matches!(err, TranslationError::DuplicateId(id) if id == "c1"));
    }

    #[test]
    fn test_duplicate_id_across_entity_kinds_is_rejected() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_class("shared-id", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        let err = builder
            .construct_interface("shared-id", Some("Drivable".to_string()), Visibility::Public)
            .unwrap_err();
        assert!(matches!(err, TranslationError::DuplicateId(id) if id == "shared-id"));
    }

    #[test]
    fn test_duplicate_id_with_identical_class_is_tolerated() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();

        let model = builder.build().unwrap();
        assert_eq!(model.elements.classes.len(), 1);
    }

    #[test]
    fn test_duplicate_id_with_differing_visibility_is_rejected() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        let err = builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Private, false)
            .unwrap_err();
        assert!(matches!(err, TranslationError::DuplicateId(id) if id == "c1"));
    }

    #[test]
    fn test_forward_referenced_generalization_resolves_at_build() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder.construct_generalization("g1", "c1", "c2");
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        builder
            .construct_class("c2", Some("Vehicle".to_string()), Visibility::Public, true)
            .unwrap();

        let model = builder.build().unwrap();
        assert_eq!(model.elements.generalizations.len(), 1);
    }

    #[test]
    fn test_package_membership_resolves_at_build() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_package("p1", Some("model".to_string()), Visibility::Public)
            .unwrap();
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        builder.bind_element_to_package("c1", "p1");

        let model = builder.build().unwrap();
        assert_eq!(model.elements.packages[0].borrow().members.len(), 1);
    }

    #[test]
    fn test_operation_with_parameters_and_return_type() {
        let mut builder = UmlModelBuilder::new("model-1");
        builder
            .construct_primitive_type("t-int", Some("int".to_string()), PrimitiveKind::Int)
            .unwrap();
        builder
            .construct_class("c1", Some("Car".to_string()), Visibility::Public, false)
            .unwrap();
        builder
            .construct_operation("op1", Some("accelerate".to_string()), Visibility::Public, "c1")
            .unwrap();
        builder
            .construct_parameter(
                "p1",
                Some("delta".to_string()),
                "op1",
                Some("t-int".to_string()),
                ParameterDirection::In,
            )
            .unwrap();
        builder.set_operation_return_type("op1", "t-int");

        let model = builder.build().unwrap();
        let class = &model.elements.classes[0];
        let op = class.borrow().operations()[0].clone();
        assert_eq!(op.borrow().parameters.len(), 1);
        assert!(op.borrow().parameters[0].type_ref.is_some());
        assert!(op.borrow().return_type.is_some());
    }
}
