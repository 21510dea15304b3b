//! User settings consumed by the swap fields and the approval tracker.

use std::fmt;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Upper bound for the slippage tolerance: 50%.
pub const MAX_SLIPPAGE_BIPS: u16 = 5_000;

/// Slippage tolerance expressed in basis points (1/10000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct SlippageTolerance(u16);

impl SlippageTolerance {
    pub fn from_bips(bips: u16) -> Result<Self> {
        if bips > MAX_SLIPPAGE_BIPS {
            return Err(BridgeError::InvalidRequest(format!(
                "Slippage must be at most {MAX_SLIPPAGE_BIPS} bips (50%)."
            )));
        }
        Ok(Self(bips))
    }

    pub fn bips(self) -> u16 {
        self.0
    }

    /// `amount * (10000 + bips) / 10000`, rounded down.
    pub fn add_to(self, amount: U256) -> U256 {
        amount.saturating_mul(U256::from(10_000u64 + u64::from(self.0))) / U256::from(10_000u64)
    }

    /// `amount * (10000 - bips) / 10000`, rounded down.
    pub fn subtract_from(self, amount: U256) -> U256 {
        amount.saturating_mul(U256::from(10_000u64 - u64::from(self.0))) / U256::from(10_000u64)
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<u16> for SlippageTolerance {
    type Error = BridgeError;

    fn try_from(bips: u16) -> Result<Self> {
        Self::from_bips(bips)
    }
}

impl From<SlippageTolerance> for u16 {
    fn from(s: SlippageTolerance) -> u16 {
        s.0
    }
}

impl fmt::Display for SlippageTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// When an explicit recipient may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientPolicy {
    /// Only in expert mode.
    #[default]
    ExpertOnly,
    Always,
}

/// Read-only view of the user's settings.
pub trait Settings {
    fn expert_mode(&self) -> bool;
    fn slippage(&self) -> SlippageTolerance;
    fn recipient_policy(&self) -> RecipientPolicy;

    /// Approve exactly the required amount instead of an unlimited allowance.
    fn exact_approval(&self) -> bool {
        false
    }

    fn recipient_allowed(&self) -> bool {
        match self.recipient_policy() {
            RecipientPolicy::Always => true,
            RecipientPolicy::ExpertOnly => self.expert_mode(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub expert_mode: bool,
    pub slippage: SlippageTolerance,
    pub recipient_policy: RecipientPolicy,
    pub exact_approval: bool,
}

impl Settings for UserSettings {
    fn expert_mode(&self) -> bool {
        self.expert_mode
    }

    fn slippage(&self) -> SlippageTolerance {
        self.slippage
    }

    fn recipient_policy(&self) -> RecipientPolicy {
        self.recipient_policy
    }

    fn exact_approval(&self) -> bool {
        self.exact_approval
    }
}
