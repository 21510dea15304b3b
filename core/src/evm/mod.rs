//! Collaborators backed by an EVM JSON-RPC node and a local private key.

pub mod contracts;
pub mod names;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::currency::Currency;
use crate::submit::BurnCall;
use crate::wallet::{BridgeWallet, TokenApprover, TxHash};
use contracts::{BridgeContract, ERC20};

pub use names::{namehash, ENS_REGISTRY};

/// Reject non-HTTPS RPC URLs unless `allow_insecure` is set.
pub fn validate_rpc_url(url: &str, allow_insecure: bool) -> Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        if allow_insecure {
            return Ok(());
        }
        bail!("Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections.");
    }
    bail!("Invalid RPC URL scheme: {url}\nExpected an https:// URL.");
}

/// A signing RPC client. Implements every chain-facing collaborator.
#[derive(Debug, Clone)]
pub struct EvmClient<P> {
    provider: P,
    address: Address,
}

/// Connect to `rpc_url` with a hex private key.
pub fn connect(
    rpc_url: &str,
    private_key: &str,
    allow_insecure: bool,
) -> Result<EvmClient<impl Provider<Http<Client>> + Clone>> {
    validate_rpc_url(rpc_url, allow_insecure)?;
    let signer: PrivateKeySigner = private_key
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid private key: {e}"))?;
    let address = signer.address();
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(rpc_url.parse().context("Invalid RPC URL")?);

    info!(rpc_url = %rpc_url, address = %address, "created EVM client with signer");
    Ok(EvmClient { provider, address })
}

impl<P> EvmClient<P> {
    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl<P> BridgeWallet for EvmClient<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.address])
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("Failed to query chain id")
    }

    async fn send_burn(&self, contract: Address, call: &BurnCall, gas_limit: u64) -> Result<TxHash> {
        let bridge = BridgeContract::new(contract, &self.provider);
        debug!(
            %contract,
            recipient = %call.recipient,
            amount = %call.amount,
            chain_id = call.chain_id,
            gas_limit,
            "sending burn"
        );
        let pending = bridge
            .burn(call.recipient, call.amount, U256::from(call.chain_id))
            .gas(gas_limit)
            .send()
            .await
            .context("Failed to send burn transaction")?;
        Ok(*pending.tx_hash())
    }

    async fn balance(&self, currency: &Currency, owner: Address) -> Result<U256> {
        match currency.token_address() {
            None => self
                .provider
                .get_balance(owner)
                .await
                .context("Failed to query balance"),
            Some(token) => Ok(ERC20::new(token, &self.provider)
                .balanceOf(owner)
                .call()
                .await
                .with_context(|| format!("Failed to query {} balance", currency.symbol()))?
                ._0),
        }
    }
}

#[async_trait]
impl<P> TokenApprover for EvmClient<P>
where
    P: Provider<Http<Client>> + Send + Sync,
{
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        Ok(ERC20::new(token, &self.provider)
            .allowance(owner, spender)
            .call()
            .await
            .context("Failed to query allowance")?
            ._0)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let pending = ERC20::new(token, &self.provider)
            .approve(spender, amount)
            .send()
            .await
            .context("Failed to send approval")?;
        Ok(*pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn rejects_http_url_without_insecure() {
        let err = validate_rpc_url("http://localhost:8545", false).unwrap_err();
        assert!(err.to_string().contains("--insecure"));
    }

    #[test]
    fn accepts_http_url_with_insecure() {
        assert!(validate_rpc_url("http://localhost:8545", true).is_ok());
        assert!(validate_rpc_url("https://rpc.example.org", false).is_ok());
    }

    #[test]
    fn rejects_invalid_url_scheme() {
        let err = validate_rpc_url("ws://localhost:8546", true).unwrap_err();
        assert!(err.to_string().contains("https://"));
    }

    #[test]
    fn connect_derives_signer_address() {
        let client = connect("http://localhost:8545", ANVIL_KEY, true).unwrap();
        assert_eq!(
            client.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn connect_rejects_bad_key() {
        match connect("http://localhost:8545", "0x1234", true) {
            Err(e) => assert!(e.to_string().contains("Invalid private key")),
            Ok(_) => panic!("short key should be rejected"),
        }
    }
}
