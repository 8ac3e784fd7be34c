//! Sequence-diagram entities
//!
//! Grounded on `UmlLifeline`/`UmlMessage`/`UmlFragment`/`UmlInteraction`
//! in `core/model/umlars_model/uml_elements.py`, extended with the
//! `CombinedFragment`/`Operand`/`InteractionUse` triad and the closed
//! `sort`/`kind`/`operator` enumerations layered on top of that
//! shape.

use serde::{Deserialize, Serialize};

use crate::model::core::{ElementCore, NamedElementCore, Visibility};
use crate::model::element_ref::ClassOrInterfaceRef;
use crate::model::feature::Operation;
use crate::model::handle::Handle;
use crate::{impl_named_element, impl_uml_element};

/// A lifeline: a named element standing for a participant instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifeline {
    core: ElementCore,
    named: NamedElementCore,
    /// The classifier this lifeline represents
    pub represents: ClassOrInterfaceRef,
}

impl_named_element!(Lifeline, core = core, named = named);

impl Lifeline {
    /// Construct a lifeline.
    pub fn new(id: impl Into<String>, name: Option<String>, represents: ClassOrInterfaceRef) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            represents,
        }
    }
}

/// A point on a lifeline where a message is sent or received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceSpecification {
    core: ElementCore,
    /// The lifeline this occurrence sits on
    pub covered: Handle<Lifeline>,
}

impl_uml_element!(OccurrenceSpecification, core = core);

impl OccurrenceSpecification {
    /// Construct an occurrence specification.
    pub fn new(id: impl Into<String>, covered: Handle<Lifeline>) -> Self {
        Self {
            core: ElementCore::new(id),
            covered,
        }
    }
}

/// The communication style of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageSort {
    /// Synchronous call, blocking the sender
    SynchCall,
    /// Asynchronous call
    AsynchCall,
    /// Asynchronous signal
    AsynchSignal,
    /// Object creation message
    CreateMsg,
    /// Object destruction message
    DeleteMsg,
    /// Reply to a prior synchronous call
    Reply,
}

/// Whether a [`Message`]'s occurrences are both present in the
/// enclosing interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Both send and receive events are present
    Complete,
    /// Only the send event is present
    Lost,
    /// Only the receive event is present
    Found,
    /// Neither event's completeness could be determined
    Unknown,
}

/// A message exchanged between two lifelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    core: ElementCore,
    /// The sending occurrence
    pub send_event: Handle<OccurrenceSpecification>,
    /// The receiving occurrence
    pub receive_event: Handle<OccurrenceSpecification>,
    /// The invoked operation, if resolvable
    pub signature: Option<Handle<Operation>>,
    /// Ordered argument expressions, as source text
    pub arguments: Vec<String>,
    /// Communication style
    pub sort: MessageSort,
    /// Occurrence completeness
    pub kind: MessageKind,
}

impl_uml_element!(Message, core = core);

impl Message {
    /// Construct a message with no arguments and no resolved signature.
    pub fn new(
        id: impl Into<String>,
        send_event: Handle<OccurrenceSpecification>,
        receive_event: Handle<OccurrenceSpecification>,
        sort: MessageSort,
        kind: MessageKind,
    ) -> Self {
        Self {
            core: ElementCore::new(id),
            send_event,
            receive_event,
            signature: None,
            arguments: Vec::new(),
            sort,
            kind,
        }
    }
}

/// One branch of a [`CombinedFragment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operand {
    core: ElementCore,
    /// Guard expression, as source text
    pub guard: Option<String>,
    /// Ordered nested fragments (invariant I3)
    pub fragments: Vec<Fragment>,
}

impl_uml_element!(Operand, core = core);

impl Operand {
    /// Construct an operand with no fragments yet.
    pub fn new(id: impl Into<String>, guard: Option<String>) -> Self {
        Self {
            core: ElementCore::new(id),
            guard,
            fragments: Vec::new(),
        }
    }
}

/// The interaction operator of a [`CombinedFragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentOperator {
    /// Alternatives, at most one operand executes
    Alt,
    /// Optional, the single operand may not execute
    Opt,
    /// Looping execution of the operand
    Loop,
    /// Parallel, interleaved execution of operands
    Par,
    /// Weak sequencing of operands
    Seq,
    /// Strict sequencing of operands
    Strict,
    /// Abrupt exit from the enclosing interaction
    Break,
    /// Invalid trace
    Neg,
    /// Exactly one valid trace
    Critical,
    /// Assertion, the only valid continuation
    Assert,
    /// Traces to ignore
    Ignore,
    /// Traces to consider, excluding all others
    Consider,
}

/// A combined fragment: an operator applied to ordered operands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedFragment {
    core: ElementCore,
    /// Lifelines the fragment spans
    pub covered: Vec<Handle<Lifeline>>,
    /// Ordered operands (invariant I3)
    pub operands: Vec<Operand>,
    /// Interaction operator
    pub operator: FragmentOperator,
}

impl_uml_element!(CombinedFragment, core = core);

impl CombinedFragment {
    /// Construct a combined fragment with no operands yet.
    pub fn new(id: impl Into<String>, operator: FragmentOperator) -> Self {
        Self {
            core: ElementCore::new(id),
            covered: Vec::new(),
            operands: Vec::new(),
            operator,
        }
    }
}

/// A reference to another interaction, inlined at this point in the
/// enclosing interaction's fragment sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionUse {
    core: ElementCore,
    /// The referenced interaction
    pub refers_to: Handle<Interaction>,
    /// Lifelines the use spans
    pub covered: Vec<Handle<Lifeline>>,
}

impl_uml_element!(InteractionUse, core = core);

impl InteractionUse {
    /// Construct an interaction use.
    pub fn new(id: impl Into<String>, refers_to: Handle<Interaction>) -> Self {
        Self {
            core: ElementCore::new(id),
            refers_to,
            covered: Vec::new(),
        }
    }
}

/// Any element that may appear in an [`Interaction`]'s ordered
/// `fragments` sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Fragment {
    /// A single send/receive occurrence
    Occurrence(Handle<OccurrenceSpecification>),
    /// A combined fragment
    Combined(Handle<CombinedFragment>),
    /// A reference to another interaction
    Use(Handle<InteractionUse>),
}

/// A sequence diagram's interaction: lifelines, messages, and the
/// order-significant fragment sequence that represents execution order
/// (invariant I3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    core: ElementCore,
    named: NamedElementCore,
    /// Lifelines participating in the interaction
    pub lifelines: Vec<Handle<Lifeline>>,
    /// Messages exchanged in the interaction
    pub messages: Vec<Handle<Message>>,
    /// Ordered top-level fragment sequence (invariant I3)
    pub fragments: Vec<Fragment>,
}

impl_named_element!(Interaction, core = core, named = named);

impl Interaction {
    /// Construct an interaction with no members yet.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            core: ElementCore::new(id),
            named: NamedElementCore::new(name, Visibility::Public),
            lifelines: Vec::new(),
            messages: Vec::new(),
            fragments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classifier::Class;
    use crate::model::core::UmlElement;
    use crate::model::handle::handle;

    fn sample_lifeline(id: &str) -> Handle<Lifeline> {
        let class = handle(Class::new("c1", Some("Car".to_string()), Visibility::Public));
        handle(Lifeline::new(id, Some(id.to_string()), ClassOrInterfaceRef::Class(class)))
    }

    #[test]
    fn test_interaction_fragment_order_preserved() {
        let ll = sample_lifeline("ll1");
        let o1 = handle(OccurrenceSpecification::new("o1", ll.clone()));
        let o2 = handle(OccurrenceSpecification::new("o2", ll.clone()));
        let mut interaction = Interaction::new("i1", Some("Drive".to_string()));
        interaction.fragments.push(Fragment::Occurrence(o1));
        interaction.fragments.push(Fragment::Occurrence(o2));
        assert_eq!(interaction.fragments.len(), 2);
        assert_eq!(interaction.id(), "i1");
    }

    #[test]
    fn test_message_default_construction() {
        let ll = sample_lifeline("ll1");
        let send = handle(OccurrenceSpecification::new("o1", ll.clone()));
        let recv = handle(OccurrenceSpecification::new("o2", ll));
        let msg = Message::new("m1", send, recv, MessageSort::SynchCall, MessageKind::Complete);
        assert!(msg.arguments.is_empty());
        assert!(msg.signature.is_none());
    }
}
