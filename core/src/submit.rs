//! Building and sending the bridge `burn` transaction.

use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::{Address, U256};
use tracing::{info, warn};

use crate::error::{BridgeError, Result};
use crate::registry::{NetworkTarget, Registry};
use crate::wallet::{BridgeWallet, TxHash};

/// Gas ceiling for `burn`. Over-provisioned; no estimation is done.
pub const DEFAULT_GAS_LIMIT: u64 = 5_000_000;

/// A fully validated bridge transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    pub recipient: Address,
    pub network: NetworkTarget,
    pub amount: U256,
}

impl BridgeRequest {
    /// Validate the pieces of a request. `amount` is in token base units.
    pub fn new(
        recipient: Option<Address>,
        network: Option<&NetworkTarget>,
        amount: U256,
    ) -> Result<Self> {
        let recipient = recipient.ok_or_else(|| {
            BridgeError::InvalidRequest("Enter a valid recipient address.".into())
        })?;
        let network = network
            .cloned()
            .ok_or_else(|| BridgeError::InvalidRequest("Select a destination network.".into()))?;
        if amount.is_zero() {
            return Err(BridgeError::InvalidRequest(
                "Amount must be greater than 0".into(),
            ));
        }
        Ok(Self {
            recipient,
            network,
            amount,
        })
    }

    pub fn burn_call(&self) -> BurnCall {
        BurnCall {
            recipient: self.recipient,
            amount: self.amount,
            chain_id: self.network.chain_id,
        }
    }
}

/// Arguments of `burn(address recipient, uint256 amount, uint256 chainId)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnCall {
    pub recipient: Address,
    pub amount: U256,
    pub chain_id: u64,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    pub tx_hash: TxHash,
    pub contract: Address,
    pub network: NetworkTarget,
    pub amount: U256,
    pub recipient: Address,
}

/// Sends bridge transactions, one at a time.
#[derive(Debug, Default)]
pub struct BridgeSubmitter {
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the submission settles or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BridgeError::AlreadyInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BridgeSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send `burn` to the bridge contract registered for the request's
    /// network. One attempt, no retry.
    pub async fn submit(
        &self,
        request: &BridgeRequest,
        registry: &Registry,
        wallet: &dyn BridgeWallet,
        gas_limit: u64,
    ) -> Result<TxResult> {
        let chain_id = request.network.chain_id;
        let contract = registry
            .bridge_contract(chain_id)
            .ok_or(BridgeError::UnsupportedNetwork(chain_id))?;

        let _guard = InFlight::acquire(&self.in_flight)?;

        let call = request.burn_call();
        let tx_hash = wallet
            .send_burn(contract, &call, gas_limit)
            .await
            .map_err(|e| {
                warn!(chain_id, %contract, "bridge submission failed: {e:#}");
                BridgeError::Submission(format!("Bridge transaction failed: {e:#}"))
            })?;

        info!(
            %tx_hash,
            chain_id,
            %contract,
            recipient = %request.recipient,
            amount = %request.amount,
            "bridge transaction submitted"
        );
        Ok(TxResult {
            tx_hash,
            contract,
            network: request.network.clone(),
            amount: request.amount,
            recipient: request.recipient,
        })
    }
}
