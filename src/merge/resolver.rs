use tracing::{debug, error, warn};
use crate::error::{FlowMergeError, Result};
use crate::merge::classifier::FlowNodeClassifier;
use crate::merge::topology::{TopologyShape, TransitionTopology};
use crate::model::{OutputTokenInfo, ProcessInstanceId, Token, TokenRefId};
use crate::runtime::storage::{TokenStore, fetch_token};

/// Computes the token identifiers a finishing flow node hands on.
pub struct TokenResolver<'a> {
    classifier: &'a FlowNodeClassifier<'a>,
    topology: &'a TransitionTopology,
    store: &'a dyn TokenStore,
    process_instance_id: ProcessInstanceId,
    flow_node_token_ref_id: TokenRefId,
}

impl<'a> TokenResolver<'a> {
    pub fn new(
        classifier: &'a FlowNodeClassifier<'a>,
        topology: &'a TransitionTopology,
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

    /// Decision table, first match wins:
    /// no node or no valid outgoing transition needs no bookkeeping, boundary
    /// events ride the current token, exclusive gateways and one-to-one nodes
    /// pass it through, and the remaining shapes fork, re-fork or join.
    pub fn get_output_token_info(&self) -> Result<OutputTokenInfo> {
        if self.classifier.is_null() || self.topology.is_last_flow_node() {
            return Ok(OutputTokenInfo::none());
        }

        let current = fetch_token(self.store, self.process_instance_id, self.flow_node_token_ref_id)?;

        if self.classifier.is_boundary_event() {
            let parent = if self.classifier.is_interrupting() { current.parent_ref_id } else { None };
            return Ok(OutputTokenInfo::new(current.ref_id, parent));
        }

        // Exclusive choice never forks, whatever the counts say
        if self.classifier.is_exclusive_gateway() {
            return Ok(OutputTokenInfo::new(current.ref_id, None));
        }

        let shape = self.topology.shape()?;
        let info = match shape {
            TopologyShape::OneToOne => OutputTokenInfo::new(current.ref_id, None),
            TopologyShape::OneToMany => OutputTokenInfo::new(self.minted_ref_id()?, Some(current.ref_id)),
            TopologyShape::ManyToMany => {
                if self.classifier.is_parallel_or_inclusive_gateway() {
                    // Merge one level up, then re-fork from the grandparent
                    OutputTokenInfo::new(self.minted_ref_id()?, current.parent_ref_id)
                } else {
                    OutputTokenInfo::new(self.minted_ref_id()?, Some(current.ref_id))
                }
            }
            TopologyShape::ManyToOne => {
                if self.classifier.is_parallel_or_inclusive_gateway() {
                    self.join(&current)
                } else {
                    OutputTokenInfo::new(current.ref_id, None)
                }
            }
            // Ruled out by the last-node check above
            TopologyShape::LastNode => {
                error!(
                    process_instance_id = self.process_instance_id,
                    token_ref_id = current.ref_id,
                    "Last-node topology reached the routing table"
                );
                return Err(self.topology.inconsistency());
            }
        };

        debug!(
            process_instance_id = self.process_instance_id,
            token_ref_id = current.ref_id,
            shape = ?shape,
            output_token_ref_id = ?info.output_token_ref_id,
            output_parent_token_ref_id = ?info.output_parent_token_ref_id,
            "Resolved output token"
        );
        Ok(info)
    }

    // True join: collapse onto the parent token
    fn join(&self, current: &Token) -> OutputTokenInfo {
        if current.parent_ref_id.is_none() {
            warn!(
                process_instance_id = self.process_instance_id,
                token_ref_id = current.ref_id,
                "Joining on a root token, no parent to collapse onto"
            );
        }
        OutputTokenInfo {
            output_token_ref_id: current.parent_ref_id,
            output_parent_token_ref_id: None,
        }
    }

    /// New tokens are keyed by the finishing node's own instance id.
    fn minted_ref_id(&self) -> Result<TokenRefId> {
        self.classifier
            .instance()
            .map(|i| i.id)
            .ok_or_else(|| FlowMergeError::MissingFlowNodeInstance {
                flow_node_definition_id: self.classifier.definition().map(|d| d.id).unwrap_or_default(),
            })
    }
}
