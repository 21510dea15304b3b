//! Collaborator interfaces the core talks to the chain through.
//!
//! The core never owns a provider or a key. A wallet connector (the alloy
//! client in [`crate::evm`], or an in-memory double in tests) implements
//! these traits and is injected into the session.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::currency::Currency;
use crate::submit::BurnCall;

pub use alloy::primitives::TxHash;

/// Connected wallet: account access, chain id, and signing + broadcasting.
#[async_trait]
pub trait BridgeWallet: Send + Sync {
    /// Ask the wallet for its accounts. The first one is the active account.
    async fn request_accounts(&self) -> anyhow::Result<Vec<Address>>;

    /// Chain the wallet is currently connected to.
    async fn chain_id(&self) -> anyhow::Result<u64>;

    /// Sign and broadcast `burn(recipient, amount, chainId)` on `contract`.
    async fn send_burn(
        &self,
        contract: Address,
        call: &BurnCall,
        gas_limit: u64,
    ) -> anyhow::Result<TxHash>;

    /// Balance of `owner` in `currency` on the connected chain.
    async fn balance(&self, currency: &Currency, owner: Address) -> anyhow::Result<U256>;
}

/// ERC20 allowance reads and approvals.
#[async_trait]
pub trait TokenApprover: Send + Sync {
    async fn allowance(&self, token: Address, owner: Address, spender: Address)
        -> anyhow::Result<U256>;

    async fn approve(&self, token: Address, spender: Address, amount: U256)
        -> anyhow::Result<TxHash>;
}

/// Name -> address lookup. `Ok(None)` means the name has no address.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve_name(&self, name: &str) -> anyhow::Result<Option<Address>>;
}

/// Resolver used when no name service is reachable: nothing ever resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNameResolver;

#[async_trait]
impl NameResolver for NoNameResolver {
    async fn resolve_name(&self, _name: &str) -> anyhow::Result<Option<Address>> {
        Ok(None)
    }
}
