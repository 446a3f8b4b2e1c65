use std::sync::{Arc, Mutex};
use dashmap::DashMap;
use tracing::{debug, error, info};
use crate::error::{FlowMergeError, Result};
use crate::merge::{FlowMerger, TransitionTopology};
use crate::model::{FlowNodeDefinition, FlowNodeInstance, ProcessDefinition, ProcessInstanceId, Token, TokenRefId, Transition};
use crate::runtime::storage::TokenStore;

/// What the execution engine does next with the completed node.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The branch ended; nothing to propagate.
    ImplicitEnd,
    Proceed {
        /// Token the target flow nodes carry.
        token_ref_id: Option<TokenRefId>,
        created: Option<Token>,
        consumed: Option<TokenRefId>,
        transitions: Vec<Transition>,
    },
}

/// Applies merge decisions to the token store.
///
/// The token read and the resulting create/consume happen under one
/// per-process-instance lock, so sibling branches finishing at the same time
/// cannot both perform a join. Atomicity with the rest of the node completion
/// still belongs to the host's transaction.
pub struct CompletionStep {
    store: Arc<dyn TokenStore>,
    // Map<InstanceID, lock>
    locks: DashMap<ProcessInstanceId, Arc<Mutex<()>>>,
}

impl CompletionStep {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    fn instance_lock(&self, process_instance_id: ProcessInstanceId) -> Arc<Mutex<()>> {
        // Clone the Arc so the map shard lock is released before we block on the mutex
        self.locks
            .entry(process_instance_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Drops the lock entry once nobody else holds or waits on it.
    fn release_lock(&self, process_instance_id: ProcessInstanceId, lock: Arc<Mutex<()>>) {
        drop(lock);
        // The map's own reference is the only one left
        self.locks.remove_if(&process_instance_id, |_, l| Arc::strong_count(l) == 1);
    }

    /// Number of process instances with a lock entry.
    pub fn tracked_instances(&self) -> usize {
        self.locks.len()
    }

    pub fn complete(
        &self,
        definition: &ProcessDefinition,
        instance: &FlowNodeInstance,
        valid_outgoing: Vec<Transition>,
        incoming_taken: usize,
    ) -> Result<StepOutcome> {
        let flow_node = definition
            .flow_node(instance.flow_node_definition_id)
            .ok_or(FlowMergeError::UnknownFlowNode {
                flow_node_definition_id: instance.flow_node_definition_id,
            })?;

        let topology = TransitionTopology::new(
            definition.outgoing_transitions(flow_node.id),
            valid_outgoing.iter().cloned(),
            incoming_taken,
        );
        let merger = FlowMerger::for_instance(Some(flow_node), instance, topology, self.store.as_ref());

        let lock = self.instance_lock(instance.process_instance_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.apply(&merger, flow_node, instance, valid_outgoing)
        };
        self.release_lock(instance.process_instance_id, lock);
        result
    }

    fn apply(
        &self,
        merger: &FlowMerger<'_>,
        flow_node: &FlowNodeDefinition,
        instance: &FlowNodeInstance,
        valid_outgoing: Vec<Transition>,
    ) -> Result<StepOutcome> {
        if merger.is_implicit_end() {
            info!(
                process_instance_id = instance.process_instance_id,
                flow_node = %flow_node.name,
                token_ref_id = instance.token_ref_id,
                "Implicit end reached"
            );
            return Ok(StepOutcome::ImplicitEnd);
        }

        let decision = merger.decide().inspect_err(|e| {
            error!(
                process_instance_id = instance.process_instance_id,
                flow_node = %flow_node.name,
                error = %e,
                "Failed to resolve output token"
            );
        })?;
        debug!(flow_node = %flow_node.name, decision = ?decision, "Merge decision");

        let pid = instance.process_instance_id;

        // Create before consume: a rejected create leaves the store untouched
        let mut created = None;
        if decision.must_create_token {
            let ref_id = decision
                .output
                .output_token_ref_id
                .ok_or_else(|| merger.topology().inconsistency())?;
            let parent = decision.output.output_parent_token_ref_id;
            self.store.create_token(pid, ref_id, parent)?;
            created = Some(Token {
                ref_id,
                parent_ref_id: parent,
                process_instance_id: pid,
            });
        }

        let mut consumed = None;
        if decision.must_consume_input_token {
            if let Err(e) = self.store.consume_token(pid, instance.token_ref_id) {
                if let Some(token) = created {
                    // Undo the create so the tree is as before the step
                    if let Err(undo) = self.store.consume_token(pid, token.ref_id) {
                        error!(
                            process_instance_id = pid,
                            token_ref_id = token.ref_id,
                            error = %undo,
                            "Failed to roll back created token"
                        );
                    }
                }
                return Err(e.into());
            }
            consumed = Some(instance.token_ref_id);
        }

        Ok(StepOutcome::Proceed {
            token_ref_id: decision.output.output_token_ref_id,
            created,
            consumed,
            transitions: valid_outgoing,
        })
    }
}
