use alloy::primitives::{address, keccak256, Address, B256};
use alloy::providers::Provider;
use alloy::transports::http::{Client, Http};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::contracts::{EnsRegistry, EnsResolver};
use super::EvmClient;
use crate::wallet::NameResolver;

/// ENS registry address (mainnet and the public testnets).
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// EIP-137 namehash of a dot-separated name.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}

impl<P> EvmClient<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    /// Resolve an ENS name (e.g. `vitalik.eth`) through the registry.
    /// Returns `None` when the name has no resolver or no address.
    pub async fn resolve_ens_name(&self, name: &str) -> Result<Option<Address>> {
        let node = namehash(name);
        let registry = EnsRegistry::new(ENS_REGISTRY, &self.provider);
        let resolver = registry
            .resolver(node)
            .call()
            .await
            .context("Failed to query ENS registry")?
            ._0;
        if resolver.is_zero() {
            debug!(name, "no ENS resolver set");
            return Ok(None);
        }

        let addr = EnsResolver::new(resolver, &self.provider)
            .addr(node)
            .call()
            .await
            .with_context(|| format!("Failed to resolve '{name}'"))?
            ._0;
        Ok((!addr.is_zero()).then_some(addr))
    }
}

#[async_trait]
impl<P> NameResolver for EvmClient<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>> {
        self.resolve_ens_name(name).await
    }
}
