//! The destination network and bridge token the user picked.

use tracing::debug;

use crate::registry::{BridgeToken, NetworkTarget, Registry};

/// Active destination selection. Independent of the wallet's own chain.
#[derive(Debug, Clone, Default)]
pub struct NetworkSelection {
    current: Option<NetworkTarget>,
    token: Option<BridgeToken>,
}

impl NetworkSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `candidate` the active target, as stored in the registry.
    ///
    /// Never fails: a chain id the registry does not know leaves the
    /// selection unchanged. Returns the active target.
    pub fn select(&mut self, registry: &Registry, candidate: &NetworkTarget) -> Option<NetworkTarget> {
        self.select_chain(registry, candidate.chain_id)
    }

    pub fn select_chain(&mut self, registry: &Registry, chain_id: u64) -> Option<NetworkTarget> {
        match registry.network(chain_id) {
            Some(target) => {
                debug!(chain_id, network = %target.display_name, "network selected");
                self.current = Some(target.clone());
            }
            None => debug!(chain_id, "ignoring selection of unregistered chain"),
        }
        self.current.clone()
    }

    pub fn current(&self) -> Option<&NetworkTarget> {
        self.current.as_ref()
    }

    /// Networks the user may pick: the registry minus the chain the wallet
    /// is connected to.
    pub fn destinations<'a>(
        &self,
        registry: &'a Registry,
        wallet_chain: Option<u64>,
    ) -> impl Iterator<Item = &'a NetworkTarget> + Clone + 'a {
        registry
            .networks()
            .filter(move |n| Some(n.chain_id) != wallet_chain)
    }

    /// Pick a bridge token by name. Returns `None` if the name is unknown,
    /// leaving the previous token selected.
    pub fn select_token(&mut self, registry: &Registry, name: &str) -> Option<&BridgeToken> {
        let token = registry.token(name)?.clone();
        debug!(token = %token.name, chain_id = token.chain_id, "bridge token selected");
        self.token = Some(token);
        self.token.as_ref()
    }

    pub fn token(&self) -> Option<&BridgeToken> {
        self.token.as_ref()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
