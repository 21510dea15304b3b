//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy::primitives::{address, Address, B256, U256};
use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::currency::{Currency, CurrencyAmount};
use crate::submit::BurnCall;
use crate::trade::{QuoteRequest, Trade, TradeQuoter, TradeType};
use crate::wallet::{BridgeWallet, NameResolver, TokenApprover, TxHash};

pub const ACCOUNT: Address = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");

fn next_hash(counter: &AtomicU64) -> TxHash {
    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
    B256::left_padding_from(&n.to_be_bytes())
}

#[derive(Default)]
pub struct MockNames {
    names: HashMap<String, Address>,
    fail: bool,
}

impl MockNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, address: Address) -> Self {
        self.names.insert(name.to_string(), address);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl NameResolver for MockNames {
    async fn resolve_name(&self, name: &str) -> anyhow::Result<Option<Address>> {
        if self.fail {
            bail!("resolver unavailable");
        }
        Ok(self.names.get(name).copied())
    }
}

/// Quotes at a fixed `num / den` rate.
pub struct MockQuoter {
    rate: Option<(u64, u64)>,
    calls: AtomicUsize,
}

impl MockQuoter {
    pub fn rate(num: u64, den: u64) -> Self {
        Self {
            rate: Some((num, den)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            rate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeQuoter for MockQuoter {
    async fn best_trade(&self, request: &QuoteRequest) -> anyhow::Result<Option<Trade>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some((num, den)) = self.rate else {
            bail!("quote service down");
        };
        let (num, den) = (U256::from(num), U256::from(den));
        let amount = request.amount.clone();
        let trade = match request.trade_type {
            TradeType::ExactInput => Trade {
                trade_type: TradeType::ExactInput,
                output: CurrencyAmount::new(request.other.clone(), amount.raw * num / den),
                input: amount,
            },
            TradeType::ExactOutput => Trade {
                trade_type: TradeType::ExactOutput,
                input: CurrencyAmount::new(request.other.clone(), amount.raw * den / num),
                output: amount,
            },
        };
        Ok(Some(trade))
    }
}

pub struct MockApprover {
    allowance: Mutex<U256>,
    reject: bool,
    approvals: Mutex<Vec<(Address, U256)>>,
    hashes: AtomicU64,
}

impl MockApprover {
    pub fn with_allowance(allowance: U256) -> Self {
        Self {
            allowance: Mutex::new(allowance),
            reject: false,
            approvals: Mutex::new(Vec::new()),
            hashes: AtomicU64::new(1000),
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn set_allowance(&self, allowance: U256) {
        *self.allowance.lock().unwrap() = allowance;
    }

    /// `(spender, amount)` of every approval sent.
    pub fn approvals(&self) -> Vec<(Address, U256)> {
        self.approvals.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenApprover for MockApprover {
    async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> anyhow::Result<U256> {
        Ok(*self.allowance.lock().unwrap())
    }

    async fn approve(&self, _token: Address, spender: Address, amount: U256) -> anyhow::Result<TxHash> {
        if self.reject {
            bail!("user rejected the request");
        }
        self.approvals.lock().unwrap().push((spender, amount));
        Ok(next_hash(&self.hashes))
    }
}

pub struct MockWallet {
    accounts: Vec<Address>,
    chain_id: u64,
    balance: U256,
    reject: bool,
    gate: Option<Semaphore>,
    burns: Mutex<Vec<(Address, BurnCall, u64)>>,
    hashes: AtomicU64,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            accounts: vec![ACCOUNT],
            chain_id: 1,
            balance: U256::MAX,
            reject: false,
            gate: None,
            burns: Mutex::new(Vec::new()),
            hashes: AtomicU64::new(0),
        }
    }

    pub fn on_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn without_accounts(mut self) -> Self {
        self.accounts.clear();
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Burns block until [`MockWallet::release`] is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1024);
        }
    }

    pub fn burns(&self) -> Vec<(Address, BurnCall, u64)> {
        self.burns.lock().unwrap().clone()
    }
}

#[async_trait]
impl BridgeWallet for MockWallet {
    async fn request_accounts(&self) -> anyhow::Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> anyhow::Result<u64> {
        Ok(self.chain_id)
    }

    async fn send_burn(&self, contract: Address, call: &BurnCall, gas_limit: u64) -> anyhow::Result<TxHash> {
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await?;
        }
        if self.reject {
            bail!("user rejected the request");
        }
        self.burns.lock().unwrap().push((contract, *call, gas_limit));
        Ok(next_hash(&self.hashes))
    }

    async fn balance(&self, _currency: &Currency, _owner: Address) -> anyhow::Result<U256> {
        Ok(self.balance)
    }
}
