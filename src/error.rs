use thiserror::Error;
use crate::model::{FlowNodeId, ProcessInstanceId, TokenRefId};

#[derive(Debug, Error)]
pub enum FlowMergeError {
    /// The current token is gone. The enclosing transaction must abort,
    /// otherwise a concurrent branch is silently dropped.
    #[error("token {ref_id} not found in process instance {process_instance_id}")]
    TokenNotFound {
        process_instance_id: ProcessInstanceId,
        ref_id: TokenRefId,
    },

    #[error(
        "transition topology matches no merge class (incoming taken: {incoming_taken}, outgoing: {all_outgoing}, valid: {valid_outgoing})"
    )]
    InconsistentTopology {
        incoming_taken: usize,
        all_outgoing: usize,
        valid_outgoing: usize,
    },

    #[error("a token must be minted for flow node {flow_node_definition_id} but no flow node instance was given")]
    MissingFlowNodeInstance { flow_node_definition_id: FlowNodeId },

    #[error("flow node {flow_node_definition_id} is not part of the process definition")]
    UnknownFlowNode { flow_node_definition_id: FlowNodeId },

    #[error("token store failure: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FlowMergeError>;
