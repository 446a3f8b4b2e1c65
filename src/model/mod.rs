pub mod builder;

use serde::{Serialize, Deserialize};

pub type FlowNodeId = i64;
pub type TransitionId = i64;
pub type TokenRefId = i64;
pub type ProcessInstanceId = i64;

/// 并发标记 (Token)
/// 每个 Token 代表流程实例中的一条并发执行线索，通过 parent_ref_id 组成一棵树。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    pub ref_id: TokenRefId,
    pub parent_ref_id: Option<TokenRefId>,
    pub process_instance_id: ProcessInstanceId,
}

impl Token {
    /// The token created when a process instance starts.
    pub fn root(process_instance_id: ProcessInstanceId, ref_id: TokenRefId) -> Self {
        Self {
            ref_id,
            parent_ref_id: None,
            process_instance_id,
        }
    }

    pub fn child(process_instance_id: ProcessInstanceId, ref_id: TokenRefId, parent_ref_id: TokenRefId) -> Self {
        Self {
            ref_id,
            parent_ref_id: Some(parent_ref_id),
            process_instance_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_ref_id.is_none()
    }
}

/// A directed edge between two flow nodes.
/// The condition is opaque here; the guard evaluator upstream decides which
/// transitions are valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    pub id: TransitionId,
    pub source: FlowNodeId,
    pub target: FlowNodeId,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GatewayKind {
    Exclusive,
    Parallel,
    Inclusive,
}

/// 流程节点类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type")]
pub enum FlowNodeKind {
    Start,
    End,
    Task,
    Gateway {
        gateway: GatewayKind,
    },
    // Catch events carry the interruption flag
    BoundaryEvent {
        interrupting: bool,
    },
    IntermediateCatchEvent {
        interrupting: bool,
    },
    SubProcess {
        #[serde(default)]
        triggered_by_event: bool,
    },
}

/// Static definition of a step in the process graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowNodeDefinition {
    pub id: FlowNodeId,
    pub name: String,
    #[serde(flatten)]
    pub kind: FlowNodeKind,
    #[serde(default)]
    pub incoming: Vec<TransitionId>,
    #[serde(default)]
    pub outgoing: Vec<TransitionId>,
}

/// 运行时节点实例
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowNodeInstance {
    pub id: i64,
    pub process_instance_id: ProcessInstanceId,
    pub flow_node_definition_id: FlowNodeId,
    /// Token carried by the branch that reached this instance.
    pub token_ref_id: TokenRefId,
}

/// Identifiers of the token(s) a finishing flow node hands on.
/// Both `None` means no further token bookkeeping is required.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputTokenInfo {
    pub output_token_ref_id: Option<TokenRefId>,
    pub output_parent_token_ref_id: Option<TokenRefId>,
}

impl OutputTokenInfo {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(output_token_ref_id: TokenRefId, output_parent_token_ref_id: Option<TokenRefId>) -> Self {
        Self {
            output_token_ref_id: Some(output_token_ref_id),
            output_parent_token_ref_id,
        }
    }

    pub fn is_none(&self) -> bool {
        self.output_token_ref_id.is_none() && self.output_parent_token_ref_id.is_none()
    }
}

/// Flow-node definition store for one process definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessDefinition {
    pub id: String,
    pub name: String,
    pub flow_nodes: Vec<FlowNodeDefinition>,
    pub transitions: Vec<Transition>,
}

impl ProcessDefinition {
    pub fn flow_node(&self, id: FlowNodeId) -> Option<&FlowNodeDefinition> {
        self.flow_nodes.iter().find(|n| n.id == id)
    }

    pub fn flow_node_by_name(&self, name: &str) -> Option<&FlowNodeDefinition> {
        self.flow_nodes.iter().find(|n| n.name == name)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    pub fn outgoing_transitions(&self, flow_node_id: FlowNodeId) -> Vec<Transition> {
        self.transitions.iter().filter(|t| t.source == flow_node_id).cloned().collect()
    }

    pub fn incoming_transitions(&self, flow_node_id: FlowNodeId) -> Vec<Transition> {
        self.transitions.iter().filter(|t| t.target == flow_node_id).cloned().collect()
    }
}
