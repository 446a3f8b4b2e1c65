use serde::{Serialize, Deserialize};
use crate::error::Result;
use crate::merge::classifier::FlowNodeClassifier;
use crate::merge::resolver::TokenResolver;
use crate::merge::topology::TransitionTopology;
use crate::model::{FlowNodeDefinition, FlowNodeInstance, OutputTokenInfo, ProcessInstanceId, TokenRefId};
use crate::runtime::storage::TokenStore;

/// All answers for one flow-node completion, gathered in one place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeDecision {
    pub must_create_token: bool,
    pub must_consume_input_token: bool,
    pub implicit_end: bool,
    pub output: OutputTokenInfo,
}

/// Facade asked by the process-execution step each time a flow node finishes.
/// Stateless: build one per completion and drop it.
pub struct FlowMerger<'a> {
    classifier: FlowNodeClassifier<'a>,
    topology: TransitionTopology,
    store: &'a dyn TokenStore,
    process_instance_id: ProcessInstanceId,
    flow_node_token_ref_id: TokenRefId,
}

impl<'a> FlowMerger<'a> {
    pub fn new(
        classifier: FlowNodeClassifier<'a>,
        topology: TransitionTopology,
        store: &'a dyn TokenStore,
        process_instance_id: ProcessInstanceId,
        flow_node_token_ref_id: TokenRefId,
    ) -> Self {
        Self {
            classifier,
            topology,
            store,
            process_instance_id,
            flow_node_token_ref_id,
        }
    }

    /// Merger for a live instance; the current token is the one the instance carries.
    pub fn for_instance(
        definition: Option<&'a FlowNodeDefinition>,
        instance: &'a FlowNodeInstance,
        topology: TransitionTopology,
        store: &'a dyn TokenStore,
    ) -> Self {
        Self::new(
            FlowNodeClassifier::new(definition, Some(instance)),
            topology,
            store,
            instance.process_instance_id,
            instance.token_ref_id,
        )
    }

    pub fn topology(&self) -> &TransitionTopology {
        &self.topology
    }

    // Shared guard of the two token questions
    fn routes_on_own_token(&self) -> bool {
        !self.classifier.is_null()
            && !self.classifier.is_boundary_event()
            && !self.classifier.is_exclusive_gateway()
            && !self.topology.is_last_flow_node()
    }

    /// A new branch is registered only when the node truly forks.
    pub fn must_create_token_on_finish(&self) -> bool {
        self.routes_on_own_token() && self.topology.has_multiple_outgoing_transitions()
    }

    /// Only a structural join at a parallel or inclusive gateway retires the incoming token.
    pub fn must_consume_input_token_on_taking_transition(&self) -> bool {
        self.routes_on_own_token()
            && self.topology.has_multiple_incoming_transitions()
            && self.classifier.is_parallel_or_inclusive_gateway()
    }

    pub fn is_implicit_end(&self) -> bool {
        self.classifier.is_null() || self.topology.is_last_flow_node()
    }

    /// Boundary event that leads nowhere. Already covered by `is_implicit_end`.
    pub fn is_boundary_event_without_outgoing(&self) -> bool {
        self.classifier.is_boundary_event() && self.topology.is_last_flow_node()
    }

    pub fn get_output_token_info(&self) -> Result<OutputTokenInfo> {
        TokenResolver::new(
            &self.classifier,
            &self.topology,
            self.store,
            self.process_instance_id,
            self.flow_node_token_ref_id,
        )
        .get_output_token_info()
    }

    pub fn decide(&self) -> Result<MergeDecision> {
        Ok(MergeDecision {
            must_create_token: self.must_create_token_on_finish(),
            must_consume_input_token: self.must_consume_input_token_on_taking_transition(),
            implicit_end: self.is_implicit_end(),
            output: self.get_output_token_info()?,
        })
    }
}
