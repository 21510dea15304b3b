use std::path::PathBuf;

use anyhow::Context;

pub mod approval;
pub mod commands;
pub mod config;
pub mod currency;
pub mod display;
pub mod error;
pub mod evm;
pub mod recipient;
pub mod registry;
pub mod selection;
pub mod session;
pub mod settings;
pub mod submit;
pub mod swap;
pub mod trade;
pub mod wallet;
pub mod wrap;

#[cfg(test)]
mod testing;

pub use approval::{ApprovalStatus, ApprovalTarget, ApprovalTracker};
pub use commands::Command;
pub use config::BridgeConfig;
pub use currency::{Currency, CurrencyAmount, Token};
pub use error::BridgeError;
pub use recipient::{AddressResolver, AddressState, Recipient, ResolvedRecipient};
pub use registry::{BridgeToken, NetworkTarget, Registry};
pub use selection::NetworkSelection;
pub use session::{BridgeSession, Collaborators, SessionStatus};
pub use settings::{RecipientPolicy, Settings, SlippageTolerance, UserSettings};
pub use submit::{BridgeRequest, BridgeSubmitter, BurnCall, TxResult};
pub use swap::{DerivedSwap, Field, SwapFieldState};
pub use trade::{NoQuotes, Trade, TradeQuoter};
pub use wallet::{BridgeWallet, NameResolver, NoNameResolver, TokenApprover, TxHash};
pub use wrap::WrapType;

pub use alloy::primitives::{Address, U256};

/// XDG-compliant data directory for the config and registry files.
/// Linux: `~/.local/share/evm-bridge/`, macOS: `~/Library/Application Support/evm-bridge/`
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Cannot determine data directory")?
        .join("evm-bridge");
    Ok(dir)
}
