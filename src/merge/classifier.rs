use crate::model::{FlowNodeDefinition, FlowNodeInstance, FlowNodeKind, GatewayKind};

/// Static view of the flow node that just finished.
///
/// Wraps a definition that may be absent (an implicit end has no node), plus
/// the live instance when one exists. Every predicate answers `false` for the
/// absent node rather than failing.
#[derive(Debug, Clone, Copy)]
pub struct FlowNodeClassifier<'a> {
    definition: Option<&'a FlowNodeDefinition>,
    instance: Option<&'a FlowNodeInstance>,
}

impl<'a> FlowNodeClassifier<'a> {
    pub fn new(definition: Option<&'a FlowNodeDefinition>, instance: Option<&'a FlowNodeInstance>) -> Self {
        Self { definition, instance }
    }

    /// Sentinel for "no flow node".
    pub fn none() -> Self {
        Self { definition: None, instance: None }
    }

    pub fn definition(&self) -> Option<&'a FlowNodeDefinition> {
        self.definition
    }

    pub fn instance(&self) -> Option<&'a FlowNodeInstance> {
        self.instance
    }

    fn kind(&self) -> Option<FlowNodeKind> {
        self.definition.map(|d| d.kind)
    }

    pub fn is_null(&self) -> bool {
        self.definition.is_none()
    }

    pub fn is_boundary_event(&self) -> bool {
        matches!(self.kind(), Some(FlowNodeKind::BoundaryEvent { .. }))
    }

    /// Only catch events can interrupt; anything else reports `false`.
    pub fn is_interrupting(&self) -> bool {
        match self.kind() {
            Some(FlowNodeKind::BoundaryEvent { interrupting })
            | Some(FlowNodeKind::IntermediateCatchEvent { interrupting }) => interrupting,
            _ => false,
        }
    }

    pub fn is_exclusive_gateway(&self) -> bool {
        matches!(self.kind(), Some(FlowNodeKind::Gateway { gateway: GatewayKind::Exclusive }))
    }

    pub fn is_parallel_or_inclusive_gateway(&self) -> bool {
        matches!(
            self.kind(),
            Some(FlowNodeKind::Gateway { gateway: GatewayKind::Parallel | GatewayKind::Inclusive })
        )
    }

    pub fn is_event_sub_process(&self) -> bool {
        matches!(self.kind(), Some(FlowNodeKind::SubProcess { triggered_by_event: true }))
    }

    pub fn has_incoming_transitions(&self) -> bool {
        self.definition.is_some_and(|d| !d.incoming.is_empty())
    }
}
