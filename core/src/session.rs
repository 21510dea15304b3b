//! High-level facade used by the command layer.
//!
//! Owns the state holders and the injected collaborators, and sequences them:
//! selection and recipient feed the swap fields, the derived swap feeds the
//! approval tracker, and everything together builds the bridge request.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::approval::{ApprovalStatus, ApprovalTarget, ApprovalTracker};
use crate::config::BridgeConfig;
use crate::currency::{Currency, CurrencyAmount};
use crate::display;
use crate::error::{BridgeError, Result};
use crate::recipient::{AddressResolver, AddressState, ResolvedRecipient};
use crate::registry::{BridgeToken, NetworkTarget, Registry};
use crate::selection::NetworkSelection;
use crate::settings::{Settings, SlippageTolerance, UserSettings};
use crate::submit::{BridgeRequest, BridgeSubmitter, TxResult};
use crate::swap::{DerivedSwap, Field, SwapFieldState};
use crate::trade::TradeQuoter;
use crate::wallet::{BridgeWallet, NameResolver, TokenApprover, TxHash};

/// The external services a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub wallet: Arc<dyn BridgeWallet>,
    pub approver: Arc<dyn TokenApprover>,
    pub names: Arc<dyn NameResolver>,
    pub quoter: Arc<dyn TradeQuoter>,
}

/// Snapshot rendered by the `status` command.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub account: Option<Address>,
    pub wallet_chain: Option<u64>,
    pub network: Option<NetworkTarget>,
    pub token: Option<String>,
    pub recipient_input: String,
    pub recipient_loading: bool,
    pub recipient: Option<Address>,
    pub recipient_name: Option<String>,
    pub input: String,
    pub output: String,
    pub wrap: Option<String>,
    pub approval: ApprovalStatus,
    pub input_error: Option<String>,
}

pub struct BridgeSession {
    registry: Registry,
    settings: UserSettings,
    gas_limit: u64,
    collaborators: Collaborators,
    selection: NetworkSelection,
    fields: SwapFieldState,
    recipient: AddressResolver,
    approval: ApprovalTracker,
    submitter: BridgeSubmitter,
    account: Option<Address>,
    wallet_chain: Option<u64>,
}

fn not_connected() -> BridgeError {
    BridgeError::InvalidRequest("Connect a wallet first.".into())
}

impl BridgeSession {
    pub fn new(
        registry: Registry,
        settings: UserSettings,
        gas_limit: u64,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            registry,
            settings,
            gas_limit,
            collaborators,
            selection: NetworkSelection::new(),
            fields: SwapFieldState::new(),
            recipient: AddressResolver::new(),
            approval: ApprovalTracker::new(),
            submitter: BridgeSubmitter::new(),
            account: None,
            wallet_chain: None,
        }
    }

    pub fn from_config(config: &BridgeConfig, collaborators: Collaborators) -> Result<Self> {
        Ok(Self::new(
            config.load_registry()?,
            config.settings.clone(),
            config.gas_limit,
            collaborators,
        ))
    }

    /// Ask the wallet for its active account and chain.
    pub async fn connect(&mut self) -> Result<Address> {
        let wallet = &self.collaborators.wallet;
        let accounts = wallet
            .request_accounts()
            .await
            .map_err(|e| BridgeError::Network(format!("Failed to connect wallet: {e:#}")))?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| BridgeError::Network("The wallet returned no accounts.".into()))?;
        let chain_id = wallet
            .chain_id()
            .await
            .map_err(|e| BridgeError::Network(format!("Failed to query chain id: {e:#}")))?;

        info!(%account, chain_id, "wallet connected");
        self.account = Some(account);
        self.wallet_chain = Some(chain_id);
        Ok(account)
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn wallet_chain(&self) -> Option<u64> {
        self.wallet_chain
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn fields(&self) -> &SwapFieldState {
        &self.fields
    }

    pub fn set_expert_mode(&mut self, enabled: bool) {
        self.settings.expert_mode = enabled;
        if !self.settings.recipient_allowed() && !self.recipient.raw().is_empty() {
            debug!("recipient no longer allowed, clearing it");
            self.clear_recipient();
        }
    }

    pub fn set_slippage(&mut self, bips: u16) -> Result<SlippageTolerance> {
        self.settings.slippage = SlippageTolerance::from_bips(bips)?;
        Ok(self.settings.slippage)
    }

    // -- Network and token --

    pub fn selected_network(&self) -> Option<&NetworkTarget> {
        self.selection.current()
    }

    pub fn selected_token(&self) -> Option<&BridgeToken> {
        self.selection.token()
    }

    /// Destination networks, without the chain the wallet is on.
    pub fn destinations(&self) -> impl Iterator<Item = &NetworkTarget> + Clone + '_ {
        self.selection.destinations(&self.registry, self.wallet_chain)
    }

    /// Select the destination network by chain id or name.
    pub fn select_network(&mut self, query: &str) -> Result<NetworkTarget> {
        let target = self
            .registry
            .find_network(query)
            .cloned()
            .ok_or_else(|| BridgeError::InvalidRequest(format!("Unknown network '{query}'.")))?;
        if Some(target.chain_id) == self.wallet_chain {
            return Err(BridgeError::InvalidRequest(format!(
                "{} is the network your wallet is connected to. Pick another destination.",
                target.display_name
            )));
        }
        self.selection
            .select(&self.registry, &target)
            .ok_or_else(|| BridgeError::UnsupportedNetwork(target.chain_id))
    }

    /// Select the token to bridge. It becomes the output currency.
    pub fn select_token(&mut self, name: &str) -> Result<BridgeToken> {
        let token = self
            .selection
            .select_token(&self.registry, name)
            .cloned()
            .ok_or_else(|| BridgeError::InvalidRequest(format!("Unknown token '{name}'.")))?;
        if let Some(currency) = self.registry.currency(token.chain_id, &token.name) {
            self.fields.select_currency(Field::Output, currency);
        }
        Ok(token)
    }

    /// Bind a currency of the connected chain to one of the fields.
    pub fn select_currency(&mut self, field: Field, symbol: &str) -> Result<Currency> {
        let chain_id = self.wallet_chain.ok_or_else(not_connected)?;
        let currency = self.registry.currency(chain_id, symbol).ok_or_else(|| {
            BridgeError::InvalidRequest(format!("Unknown currency '{symbol}' on chain {chain_id}."))
        })?;
        self.fields.select_currency(field, currency.clone());
        Ok(currency)
    }

    // -- Amounts --

    /// Amount to bridge, typed into the output field.
    pub fn set_amount(&mut self, value: &str) {
        self.fields.set_independent(Field::Output, value);
    }

    pub fn set_input_amount(&mut self, value: &str) {
        self.fields.set_independent(Field::Input, value);
    }

    pub fn switch_fields(&mut self) {
        self.fields.switch_fields();
    }

    // -- Recipient --

    /// Set the recipient: an address or a name to resolve.
    pub async fn set_recipient(&mut self, raw: &str) -> Result<AddressState> {
        if !self.settings.recipient_allowed() {
            return Err(BridgeError::InvalidRequest(
                "Sending to another address requires expert mode. Run `expert on` first.".into(),
            ));
        }
        self.fields.set_recipient(Some(raw), &self.settings);
        let state = self
            .recipient
            .resolve(raw, self.collaborators.names.as_ref())
            .await;
        if self.recipient.error() {
            return Err(BridgeError::Resolution(format!(
                "Could not resolve '{}' to an address.",
                self.recipient.raw()
            )));
        }
        Ok(state)
    }

    pub fn clear_recipient(&mut self) {
        self.fields.set_recipient(None, &self.settings);
        self.recipient.clear();
    }

    pub fn recipient(&self) -> Option<ResolvedRecipient> {
        self.recipient.resolved()
    }

    // -- Derivation and approval --

    pub async fn derive(&self) -> DerivedSwap {
        let balance = self.input_balance().await;
        self.fields
            .derive(
                &self.registry,
                self.collaborators.quoter.as_ref(),
                self.settings.slippage(),
                balance,
            )
            .await
    }

    async fn input_balance(&self) -> Option<U256> {
        let account = self.account?;
        let currency = self.fields.currency(Field::Input)?;
        if Some(currency.chain_id()) != self.wallet_chain {
            return None;
        }
        match self.collaborators.wallet.balance(currency, account).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(currency = %currency, "balance query failed: {e:#}");
                None
            }
        }
    }

    /// What the bridge contract must be allowed to spend: the trade's
    /// maximum input, or else the bridged amount of the output currency.
    fn approval_target(&self, derived: &DerivedSwap) -> Option<ApprovalTarget> {
        let owner = self.account?;
        let chain_id = self.selection.current()?.chain_id;
        let spender = self.registry.bridge_contract(chain_id)?;
        let required = match &derived.trade {
            Some(trade) => trade.maximum_amount_in(self.settings.slippage()),
            None => {
                let currency = self.fields.currency(Field::Output)?.clone();
                CurrencyAmount::new(currency, self.bridge_amount(derived).ok()?)
            }
        };
        Some(ApprovalTarget::new(&required, owner, spender))
    }

    async fn refresh_approval(&mut self, derived: &DerivedSwap) -> ApprovalStatus {
        let target = self.approval_target(derived);
        self.approval.track(target);
        if let Err(e) = self.approval.refresh(self.collaborators.approver.as_ref()).await {
            warn!("allowance refresh failed: {e}");
        }
        self.approval.status()
    }

    pub fn approval_status(&self) -> ApprovalStatus {
        self.approval.status()
    }

    pub fn pending_approval(&self) -> Option<TxHash> {
        self.approval.pending_tx()
    }

    /// Send an approval for the current amount.
    pub async fn approve(&mut self) -> Result<TxHash> {
        let derived = self.derive().await;
        self.refresh_approval(&derived).await;
        self.approval
            .request_approval(
                self.collaborators.approver.as_ref(),
                self.settings.exact_approval(),
            )
            .await
    }

    pub async fn status(&mut self) -> SessionStatus {
        let derived = self.derive().await;
        let approval = self.refresh_approval(&derived).await;
        let input_error = match self.bridge_request(&derived) {
            Err(e) => Some(e.to_string()),
            Ok(_) if self.fields.currency(Field::Input).is_some() => derived.input_error.clone(),
            Ok(_) => None,
        };
        let state = self.recipient.state();
        SessionStatus {
            account: self.account,
            wallet_chain: self.wallet_chain,
            network: self.selection.current().cloned(),
            token: self
                .selection
                .token()
                .map(|t| format!("{} (chain {})", t.name, t.chain_id)),
            recipient_input: self.recipient.raw().to_string(),
            recipient_loading: state.loading,
            recipient: state.address,
            recipient_name: state.name,
            input: derived.formatted_input.clone(),
            output: derived.formatted_output.clone(),
            wrap: derived.wrap.applies().then(|| derived.wrap.to_string()),
            approval,
            input_error,
        }
    }

    // -- Submission --

    /// Build the request from the current state. An empty recipient field
    /// sends to the connected account.
    pub fn bridge_request(&self, derived: &DerivedSwap) -> Result<BridgeRequest> {
        let recipient = if self.recipient.raw().is_empty() {
            Some(self.account.ok_or_else(not_connected)?)
        } else if self.recipient.is_resolving() {
            return Err(BridgeError::InvalidRequest(format!(
                "Still resolving '{}'.",
                self.recipient.raw()
            )));
        } else {
            self.recipient.normalized()
        };
        let network = self.selection.current();
        // Missing recipient or network is reported before the amount.
        let amount = match (recipient, network) {
            (Some(_), Some(_)) => self.bridge_amount(derived)?,
            _ => U256::ZERO,
        };
        BridgeRequest::new(recipient, network, amount)
    }

    /// Base units to burn. A typed output amount is taken as a whole number
    /// of base units; a derived one comes from the wrap or trade as is.
    fn bridge_amount(&self, derived: &DerivedSwap) -> Result<U256> {
        if self.fields.independent_field() == Field::Output {
            return display::parse_base_units(self.fields.typed_value())
                .map_err(BridgeError::InvalidRequest);
        }
        derived
            .amount(Field::Output)
            .map(|amount| amount.raw)
            .filter(|raw| !raw.is_zero())
            .ok_or_else(|| {
                BridgeError::InvalidRequest(
                    derived
                        .input_error
                        .clone()
                        .unwrap_or_else(|| "Enter an amount".to_string()),
                )
            })
    }

    /// Validate and submit the burn. Amount and recipient are cleared only
    /// after a successful submission.
    pub async fn bridge(&mut self) -> Result<TxResult> {
        let derived = self.derive().await;
        let request = self.bridge_request(&derived)?;
        let result = self
            .submitter
            .submit(
                &request,
                &self.registry,
                self.collaborators.wallet.as_ref(),
                self.gas_limit,
            )
            .await?;

        let independent = self.fields.independent_field();
        self.fields.set_independent(independent, "");
        self.clear_recipient();
        Ok(result)
    }
}
