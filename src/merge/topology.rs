use std::collections::HashSet;
use serde::{Serialize, Deserialize};
use tracing::warn;
use crate::error::{FlowMergeError, Result};
use crate::model::Transition;

/// Fork/join class of one flow-node completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TopologyShape {
    /// No valid outgoing transition; the branch ends here.
    LastNode,
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl TopologyShape {
    /// Classifies raw counts. `None` means the counts match no class, which
    /// only happens when more than one incoming transition was taken and the
    /// node defines no outgoing transition while one is still valid.
    pub fn classify(incoming_taken: usize, all_outgoing: usize, valid_outgoing: usize) -> Option<Self> {
        if valid_outgoing == 0 {
            return Some(TopologyShape::LastNode);
        }
        // Zero incoming is a process start and counts as one
        let many_in = incoming_taken > 1;
        match (many_in, all_outgoing) {
            (false, 1) => Some(TopologyShape::OneToOne),
            (false, 0) if valid_outgoing == 1 => Some(TopologyShape::OneToOne),
            (false, n) if n > 1 => Some(TopologyShape::OneToMany),
            (true, 1) => Some(TopologyShape::ManyToOne),
            (true, n) if n > 1 => Some(TopologyShape::ManyToMany),
            _ => None,
        }
    }
}

/// Outgoing/incoming picture of one flow-node completion.
///
/// `valid_outgoing` comes pre-resolved from the guard evaluator: guards that
/// hold, or the default transition.
#[derive(Debug, Clone)]
pub struct TransitionTopology {
    all_outgoing: HashSet<Transition>,
    valid_outgoing: HashSet<Transition>,
    incoming_taken: usize,
    shape: Option<TopologyShape>,
}

impl TransitionTopology {
    pub fn new(
        all_outgoing: impl IntoIterator<Item = Transition>,
        valid_outgoing: impl IntoIterator<Item = Transition>,
        incoming_taken: usize,
    ) -> Self {
        let all_outgoing: HashSet<Transition> = all_outgoing.into_iter().collect();
        let valid_outgoing: HashSet<Transition> = valid_outgoing.into_iter().collect();
        let shape = TopologyShape::classify(incoming_taken, all_outgoing.len(), valid_outgoing.len());
        Self {
            all_outgoing,
            valid_outgoing,
            incoming_taken,
            shape,
        }
    }

    pub fn all_outgoing(&self) -> &HashSet<Transition> {
        &self.all_outgoing
    }

    pub fn valid_outgoing(&self) -> &HashSet<Transition> {
        &self.valid_outgoing
    }

    pub fn incoming_taken(&self) -> usize {
        self.incoming_taken
    }

    pub fn shape(&self) -> Result<TopologyShape> {
        self.shape.ok_or_else(|| {
            warn!(
                incoming_taken = self.incoming_taken,
                all_outgoing = self.all_outgoing.len(),
                valid_outgoing = self.valid_outgoing.len(),
                "Transition topology matches no merge class"
            );
            self.inconsistency()
        })
    }

    /// Error for a decision this topology should never have led to.
    pub fn inconsistency(&self) -> FlowMergeError {
        FlowMergeError::InconsistentTopology {
            incoming_taken: self.incoming_taken,
            all_outgoing: self.all_outgoing.len(),
            valid_outgoing: self.valid_outgoing.len(),
        }
    }

    pub fn is_last_flow_node(&self) -> bool {
        self.valid_outgoing.is_empty()
    }

    pub fn has_multiple_outgoing_transitions(&self) -> bool {
        self.all_outgoing.len() > 1
    }

    pub fn has_multiple_incoming_transitions(&self) -> bool {
        self.incoming_taken > 1
    }

    pub fn is_simple_merge(&self) -> bool {
        self.incoming_taken <= 1
            && (self.all_outgoing.len() == 1 || (self.all_outgoing.is_empty() && self.valid_outgoing.len() == 1))
    }

    pub fn is_simple_to_many(&self) -> bool {
        self.incoming_taken <= 1 && self.all_outgoing.len() > 1
    }

    pub fn is_many_to_many(&self) -> bool {
        self.incoming_taken > 1 && self.all_outgoing.len() > 1
    }

    pub fn is_many_to_one(&self) -> bool {
        self.incoming_taken > 1 && self.all_outgoing.len() == 1
    }
}
