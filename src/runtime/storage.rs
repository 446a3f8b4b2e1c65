use std::collections::{HashMap, HashSet};
use anyhow::{Result, anyhow, bail};
use dashmap::DashMap;
use tracing::{debug, warn};
use crate::error::FlowMergeError;
use crate::model::{ProcessInstanceId, Token, TokenRefId};

// --- Interfaces ---

/// Token Store
/// The merge engine only reads from it; the completion step mutates it using
/// the decisions the engine returns.
pub trait TokenStore: Send + Sync {
    fn get_token(&self, process_instance_id: ProcessInstanceId, ref_id: TokenRefId) -> Result<Option<Token>>;
    fn create_token(&self, process_instance_id: ProcessInstanceId, ref_id: TokenRefId, parent_ref_id: Option<TokenRefId>) -> Result<()>;
    fn consume_token(&self, process_instance_id: ProcessInstanceId, ref_id: TokenRefId) -> Result<()>;
    /// Live tokens of one instance, in no particular order.
    fn tokens(&self, process_instance_id: ProcessInstanceId) -> Result<Vec<Token>>;
}

/// Reads a token that must exist.
pub fn fetch_token(store: &dyn TokenStore, process_instance_id: ProcessInstanceId, ref_id: TokenRefId) -> crate::error::Result<Token> {
    match store.get_token(process_instance_id, ref_id)? {
        Some(token) => Ok(token),
        None => {
            warn!(process_instance_id, ref_id, "Current token not found");
            Err(FlowMergeError::TokenNotFound { process_instance_id, ref_id })
        }
    }
}

// --- In-Memory Implementation ---

#[derive(Default)]
struct InstanceTokens {
    live: HashMap<TokenRefId, Token>,
    consumed: HashSet<TokenRefId>,
}

pub struct InMemoryTokenStore {
    // Map<InstanceID, tokens>
    instances: DashMap<ProcessInstanceId, InstanceTokens>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self {
            instances: DashMap::new(),
        }
    }

    /// Registers the root token of a freshly started process instance.
    pub fn init_instance(&self, process_instance_id: ProcessInstanceId, root_ref_id: TokenRefId) -> Result<()> {
        if self.instances.contains_key(&process_instance_id) {
            bail!("Process instance {} already initialized", process_instance_id);
        }
        let mut tokens = InstanceTokens::default();
        tokens.live.insert(root_ref_id, Token::root(process_instance_id, root_ref_id));
        self.instances.insert(process_instance_id, tokens);
        Ok(())
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get_token(&self, process_instance_id: ProcessInstanceId, ref_id: TokenRefId) -> Result<Option<Token>> {
        Ok(self.instances
            .get(&process_instance_id)
            .and_then(|inst| inst.live.get(&ref_id).copied()))
    }

    fn create_token(&self, process_instance_id: ProcessInstanceId, ref_id: TokenRefId, parent_ref_id: Option<TokenRefId>) -> Result<()> {
        let mut inst = self.instances.entry(process_instance_id).or_default();

        if inst.live.contains_key(&ref_id) {
            bail!("Token {} already exists in process instance {}", ref_id, process_instance_id);
        }
        // Consumed ref ids are never handed out again
        if inst.consumed.contains(&ref_id) {
            bail!("Token {} was already consumed in process instance {}", ref_id, process_instance_id);
        }

        let token = Token { ref_id, parent_ref_id, process_instance_id };
        inst.live.insert(ref_id, token);
        debug!(process_instance_id, ref_id, parent_ref_id = ?parent_ref_id, "Token created");
        Ok(())
    }

    fn consume_token(&self, process_instance_id: ProcessInstanceId, ref_id: TokenRefId) -> Result<()> {
        let mut inst = self.instances
            .get_mut(&process_instance_id)
            .ok_or_else(|| anyhow!("Unknown process instance {}", process_instance_id))?;

        if inst.live.remove(&ref_id).is_none() {
            bail!("Token {} is not live in process instance {}", ref_id, process_instance_id);
        }
        inst.consumed.insert(ref_id);
        debug!(process_instance_id, ref_id, "Token consumed");
        Ok(())
    }

    fn tokens(&self, process_instance_id: ProcessInstanceId) -> Result<Vec<Token>> {
        Ok(self.instances
            .get(&process_instance_id)
            .map(|inst| inst.live.values().copied().collect())
            .unwrap_or_default())
    }
}
