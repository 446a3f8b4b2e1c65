use crate::model::{
    FlowNodeDefinition, FlowNodeId, FlowNodeKind, GatewayKind, ProcessDefinition, Transition, TransitionId,
};

/// Fluent builder for process definitions, mostly used by tests and host code
/// that assembles graphs programmatically. Nodes are referenced by name;
/// ids are assigned in insertion order starting at 1.
pub struct ProcessBuilder {
    id: String,
    name: String,
    pub flow_nodes: Vec<FlowNodeDefinition>, // public so tests can tweak a node after the fact
    transitions: Vec<Transition>,
    next_node_id: FlowNodeId,
    next_transition_id: TransitionId,
}

impl ProcessBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            flow_nodes: Vec::new(),
            transitions: Vec::new(),
            next_node_id: 1,
            next_transition_id: 1,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn node(mut self, name: &str, kind: FlowNodeKind) -> Self {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.flow_nodes.push(FlowNodeDefinition {
            id,
            name: name.to_string(),
            kind,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        self
    }

    pub fn start(self, name: &str) -> Self {
        self.node(name, FlowNodeKind::Start)
    }

    pub fn end(self, name: &str) -> Self {
        self.node(name, FlowNodeKind::End)
    }

    pub fn task(self, name: &str) -> Self {
        self.node(name, FlowNodeKind::Task)
    }

    pub fn gateway(self, name: &str, gateway: GatewayKind) -> Self {
        self.node(name, FlowNodeKind::Gateway { gateway })
    }

    pub fn boundary_event(self, name: &str, interrupting: bool) -> Self {
        self.node(name, FlowNodeKind::BoundaryEvent { interrupting })
    }

    pub fn catch_event(self, name: &str, interrupting: bool) -> Self {
        self.node(name, FlowNodeKind::IntermediateCatchEvent { interrupting })
    }

    pub fn sub_process(self, name: &str, triggered_by_event: bool) -> Self {
        self.node(name, FlowNodeKind::SubProcess { triggered_by_event })
    }

    pub fn connect(self, source: &str, target: &str) -> Self {
        self.link(source, target, None, false)
    }

    pub fn connect_if(self, source: &str, target: &str, condition: &str) -> Self {
        self.link(source, target, Some(condition.to_string()), false)
    }

    pub fn connect_default(self, source: &str, target: &str) -> Self {
        self.link(source, target, None, true)
    }

    fn link(mut self, source: &str, target: &str, condition: Option<String>, default: bool) -> Self {
        let (Some(source_id), Some(target_id)) = (self.id_of(source), self.id_of(target)) else {
            // Unknown endpoints are ignored, same as an edge to nowhere
            return self;
        };

        let id = self.next_transition_id;
        self.next_transition_id += 1;
        self.transitions.push(Transition {
            id,
            source: source_id,
            target: target_id,
            condition,
            default,
        });

        for node in self.flow_nodes.iter_mut() {
            if node.id == source_id {
                node.outgoing.push(id);
            }
            if node.id == target_id {
                node.incoming.push(id);
            }
        }
        self
    }

    fn id_of(&self, name: &str) -> Option<FlowNodeId> {
        self.flow_nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    pub fn build(self) -> ProcessDefinition {
        ProcessDefinition {
            id: self.id,
            name: self.name,
            flow_nodes: self.flow_nodes,
            transitions: self.transitions,
        }
    }
}
