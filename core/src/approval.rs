//! Token allowance tracking for the current trade.
//!
//! The tracker follows one target at a time (currency, amount, owner,
//! spender). Changing any part of it starts over from `Unknown`; for an
//! unchanged target the status only ever moves forward.

use alloy::primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::currency::{Currency, CurrencyAmount};
use crate::error::{BridgeError, Result};
use crate::settings::SlippageTolerance;
use crate::trade::Trade;
use crate::wallet::{TokenApprover, TxHash};

/// Ordered so that forward transitions compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ApprovalStatus {
    #[default]
    Unknown,
    NotApproved,
    Pending,
    Approved,
}

/// What needs to be approved, and for whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalTarget {
    pub currency: Currency,
    pub amount: U256,
    pub owner: Address,
    pub spender: Address,
}

impl ApprovalTarget {
    pub fn new(required: &CurrencyAmount, owner: Address, spender: Address) -> Self {
        Self {
            currency: required.currency.clone(),
            amount: required.raw,
            owner,
            spender,
        }
    }

    /// The amount a trade may spend at the given slippage.
    pub fn for_trade(
        trade: &Trade,
        slippage: SlippageTolerance,
        owner: Address,
        spender: Address,
    ) -> Self {
        Self::new(&trade.maximum_amount_in(slippage), owner, spender)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApprovalTracker {
    target: Option<ApprovalTarget>,
    allowance: Option<U256>,
    submitted: bool,
    pending_tx: Option<TxHash>,
    status: ApprovalStatus,
}

impl ApprovalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow `target`. A different target than before resets everything.
    pub fn track(&mut self, target: Option<ApprovalTarget>) -> ApprovalStatus {
        if target != self.target {
            debug!(
                previous = ?self.target.as_ref().map(|t| t.currency.symbol().to_string()),
                next = ?target.as_ref().map(|t| t.currency.symbol().to_string()),
                "approval target changed, resetting"
            );
            *self = Self {
                target,
                ..Self::default()
            };
            self.settle();
        }
        self.status
    }

    /// Status for a trade at the given slippage.
    pub fn track_trade(
        &mut self,
        trade: Option<&Trade>,
        slippage: SlippageTolerance,
        owner: Address,
        spender: Address,
    ) -> ApprovalStatus {
        self.track(trade.map(|t| ApprovalTarget::for_trade(t, slippage, owner, spender)))
    }

    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    pub fn target(&self) -> Option<&ApprovalTarget> {
        self.target.as_ref()
    }

    /// Whether an approval transaction was sent for the current target.
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn pending_tx(&self) -> Option<TxHash> {
        self.pending_tx
    }

    /// The target to fetch an allowance for, if one is needed.
    pub fn allowance_query(&self) -> Option<ApprovalTarget> {
        self.target
            .as_ref()
            .filter(|t| !t.currency.is_native())
            .cloned()
    }

    /// Record a fetched allowance. Results for a target that is no longer
    /// tracked are dropped; returns whether it was applied.
    pub fn record_allowance(&mut self, query: &ApprovalTarget, allowance: U256) -> bool {
        if self.target.as_ref() != Some(query) {
            debug!(%allowance, "discarding allowance for a superseded target");
            return false;
        }
        self.allowance = Some(allowance);
        self.settle();
        true
    }

    /// Fetch the allowance for the current target.
    pub async fn refresh(&mut self, approver: &dyn TokenApprover) -> Result<ApprovalStatus> {
        let Some(query) = self.allowance_query() else {
            return Ok(self.status);
        };
        let Some(token) = query.currency.token_address() else {
            return Ok(self.status);
        };
        let allowance = approver
            .allowance(token, query.owner, query.spender)
            .await
            .map_err(|e| BridgeError::Network(format!("Failed to fetch allowance: {e:#}")))?;
        self.record_allowance(&query, allowance);
        Ok(self.status)
    }

    /// Send an approval for the current target.
    ///
    /// Only valid while `NotApproved`. On failure the status stays
    /// `NotApproved`; on submission it becomes `Pending`.
    pub async fn request_approval(
        &mut self,
        approver: &dyn TokenApprover,
        exact: bool,
    ) -> Result<TxHash> {
        match self.status {
            ApprovalStatus::NotApproved => {}
            ApprovalStatus::Approved => {
                return Err(BridgeError::InvalidRequest(
                    "Approval is not required.".into(),
                ))
            }
            ApprovalStatus::Pending => {
                return Err(BridgeError::InvalidRequest(
                    "An approval is already pending.".into(),
                ))
            }
            ApprovalStatus::Unknown => {
                return Err(BridgeError::InvalidRequest(
                    "The allowance has not been checked yet.".into(),
                ))
            }
        }
        let (token, spender, required) = match &self.target {
            Some(t) => match t.currency.token_address() {
                Some(token) => (token, t.spender, t.amount),
                None => {
                    return Err(BridgeError::InvalidRequest(
                        "Native currency needs no approval.".into(),
                    ))
                }
            },
            None => return Err(BridgeError::InvalidRequest("Nothing to approve.".into())),
        };

        let amount = if exact { required } else { U256::MAX };
        match approver.approve(token, spender, amount).await {
            Ok(tx_hash) => {
                info!(%tx_hash, %token, %spender, "approval submitted");
                self.submitted = true;
                self.pending_tx = Some(tx_hash);
                self.settle();
                Ok(tx_hash)
            }
            Err(e) => {
                warn!(%token, "approval failed: {e:#}");
                Err(BridgeError::Approval(format!("Approval failed: {e:#}")))
            }
        }
    }

    fn computed(&self) -> ApprovalStatus {
        let Some(target) = &self.target else {
            return ApprovalStatus::Unknown;
        };
        if target.currency.is_native() {
            return ApprovalStatus::Approved;
        }
        match self.allowance {
            Some(allowance) if allowance >= target.amount => ApprovalStatus::Approved,
            _ if self.submitted => ApprovalStatus::Pending,
            Some(_) => ApprovalStatus::NotApproved,
            None => ApprovalStatus::Unknown,
        }
    }

    fn settle(&mut self) {
        self.status = self.status.max(self.computed());
    }
}
