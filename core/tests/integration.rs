/// End-to-end session flows against in-memory collaborators, plus live tests
/// against a real RPC node.
/// Run the live ones with: BRIDGE_RPC_URL=... BRIDGE_PRIVATE_KEY=... cargo test -- --ignored
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, B256, U256};
use async_trait::async_trait;
use evm_bridge_core::recipient::AddressResolver;
use evm_bridge_core::{
    ApprovalStatus, BridgeError, BridgeSession, BridgeWallet, BurnCall, Collaborators, Command,
    Currency, Field, NameResolver, NoQuotes, Registry, TokenApprover, TxHash, UserSettings,
};

const ACCOUNT: Address = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
const FRIEND: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

fn hash(n: u64) -> TxHash {
    B256::left_padding_from(&n.to_be_bytes())
}

/// Wallet on a fixed chain. Rejects the next `reject_next` burns.
struct TestWallet {
    chain_id: u64,
    reject_next: AtomicBool,
    burns: Mutex<Vec<(Address, BurnCall)>>,
    counter: AtomicU64,
}

impl TestWallet {
    fn on_chain(chain_id: u64) -> Self {
        Self {
            chain_id,
            reject_next: AtomicBool::new(false),
            burns: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
        }
    }

    fn burns(&self) -> Vec<(Address, BurnCall)> {
        self.burns.lock().unwrap().clone()
    }
}

#[async_trait]
impl BridgeWallet for TestWallet {
    async fn request_accounts(&self) -> anyhow::Result<Vec<Address>> {
        Ok(vec![ACCOUNT])
    }

    async fn chain_id(&self) -> anyhow::Result<u64> {
        Ok(self.chain_id)
    }

    async fn send_burn(
        &self,
        contract: Address,
        call: &BurnCall,
        _gas_limit: u64,
    ) -> anyhow::Result<TxHash> {
        if self.reject_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("user rejected the request");
        }
        self.burns.lock().unwrap().push((contract, *call));
        Ok(hash(self.counter.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn balance(&self, _currency: &Currency, _owner: Address) -> anyhow::Result<U256> {
        Ok(U256::from(10u64).pow(U256::from(21u64)))
    }
}

#[derive(Default)]
struct TestApprover {
    allowance: Mutex<U256>,
    approvals: Mutex<Vec<(Address, U256)>>,
}

#[async_trait]
impl TokenApprover for TestApprover {
    async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> anyhow::Result<U256> {
        Ok(*self.allowance.lock().unwrap())
    }

    async fn approve(&self, _token: Address, spender: Address, amount: U256) -> anyhow::Result<TxHash> {
        self.approvals.lock().unwrap().push((spender, amount));
        Ok(hash(99))
    }
}

struct TestNames(HashMap<&'static str, Address>);

#[async_trait]
impl NameResolver for TestNames {
    async fn resolve_name(&self, name: &str) -> anyhow::Result<Option<Address>> {
        Ok(self.0.get(name).copied())
    }
}

struct Harness {
    session: BridgeSession,
    wallet: Arc<TestWallet>,
    approver: Arc<TestApprover>,
}

async fn harness(chain_id: u64, settings: UserSettings) -> Harness {
    let wallet = Arc::new(TestWallet::on_chain(chain_id));
    let approver = Arc::new(TestApprover::default());
    let collaborators = Collaborators {
        wallet: wallet.clone(),
        approver: approver.clone(),
        names: Arc::new(TestNames(HashMap::from([("friend.eth", FRIEND)]))),
        quoter: Arc::new(NoQuotes),
    };
    let mut session = BridgeSession::new(Registry::builtin(), settings, 5_000_000, collaborators);
    session.connect().await.unwrap();
    Harness {
        session,
        wallet,
        approver,
    }
}

async fn run(session: &mut BridgeSession, line: &str) -> anyhow::Result<String> {
    Command::parse(line)?.execute(session, false).await
}

#[tokio::test]
async fn bridge_to_polygon_with_approval() {
    let mut h = harness(56, UserSettings::default()).await;
    run(&mut h.session, "network 137").await.unwrap();
    run(&mut h.session, "token FinalX").await.unwrap();
    run(&mut h.session, "amount 100").await.unwrap();

    let status = h.session.status().await;
    assert_eq!(status.approval, ApprovalStatus::NotApproved);

    run(&mut h.session, "approve").await.unwrap();
    assert_eq!(h.session.approval_status(), ApprovalStatus::Pending);
    let approvals = h.approver.approvals.lock().unwrap().clone();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0].1, U256::MAX);

    *h.approver.allowance.lock().unwrap() = U256::MAX;
    assert_eq!(h.session.status().await.approval, ApprovalStatus::Approved);

    let out = run(&mut h.session, "bridge").await.unwrap();
    assert!(out.contains("Polygon (137)"));

    let burns = h.wallet.burns();
    assert_eq!(burns.len(), 1);
    let (contract, call) = burns[0];
    assert_eq!(Some(contract), h.session.registry().bridge_contract(137));
    assert_eq!(call.recipient, ACCOUNT);
    assert_eq!(call.amount, U256::from(100u64));
    assert_eq!(call.chain_id, 137);
}

#[tokio::test]
async fn rejected_bridge_can_be_resubmitted() {
    let mut h = harness(1, UserSettings::default()).await;
    h.session.select_network("Polygon").unwrap();
    h.session.set_amount("42");

    h.wallet.reject_next.store(true, Ordering::SeqCst);
    let err = h.session.bridge().await.unwrap_err();
    assert!(matches!(err, BridgeError::Submission(_)));
    assert!(h.wallet.burns().is_empty());

    let result = h.session.bridge().await.unwrap();
    assert_eq!(result.amount, U256::from(42u64));
    assert_eq!(h.wallet.burns().len(), 1);
}

#[tokio::test]
async fn named_recipient_in_expert_mode() {
    let mut h = harness(1, UserSettings::default()).await;
    assert!(run(&mut h.session, "to friend.eth").await.is_err());

    run(&mut h.session, "expert on").await.unwrap();
    let out = run(&mut h.session, "to friend.eth").await.unwrap();
    assert!(out.contains("friend.eth"));

    run(&mut h.session, "network binance").await.unwrap();
    run(&mut h.session, "amount 3").await.unwrap();
    let result = h.session.bridge().await.unwrap();
    assert_eq!(result.recipient, FRIEND);
    assert!(h.session.recipient().is_none());
}

#[test]
fn stale_lookup_never_overwrites_newer_input() {
    let mut resolver = AddressResolver::new();
    let first = resolver.set_input("alice.eth").unwrap();
    let second = resolver.set_input("bob.eth").unwrap();

    assert!(!resolver.apply_resolution(&first, Some(FRIEND)));
    assert_eq!(resolver.normalized(), None);
    assert!(resolver.is_resolving());

    assert!(resolver.apply_resolution(&second, Some(ACCOUNT)));
    assert_eq!(resolver.normalized(), Some(ACCOUNT));
    assert_eq!(resolver.resolved_name(), Some("bob.eth"));
}

#[tokio::test]
async fn wrap_mirrors_amount_exactly() {
    let mut h = harness(1, UserSettings::default()).await;
    h.session.select_currency(Field::Input, "ETH").unwrap();
    h.session.select_currency(Field::Output, "WETH").unwrap();
    h.session.set_input_amount("1.25");
    let derived = h.session.derive().await;
    assert_eq!(derived.formatted_output, "1.25");
    assert!(derived.trade.is_none());
    assert!(derived.input_error.is_none());

    h.session.switch_fields();
    let derived = h.session.derive().await;
    assert_eq!(derived.wrap.to_string(), "unwrap");
}

#[tokio::test]
async fn input_amount_bridges_derived_base_units() {
    let mut h = harness(1, UserSettings::default()).await;
    run(&mut h.session, "network polygon").await.unwrap();
    run(&mut h.session, "from ETH").await.unwrap();
    run(&mut h.session, "into WETH").await.unwrap();
    run(&mut h.session, "input 1.25").await.unwrap();

    let result = h.session.bridge().await.unwrap();
    let expected = U256::from(125u64) * U256::from(10u64).pow(U256::from(16u64));
    assert_eq!(result.amount, expected);
    assert_eq!(h.wallet.burns()[0].1.amount, expected);
}

#[tokio::test]
async fn connected_chain_is_never_offered() {
    let mut h = harness(137, UserSettings::default()).await;
    let out = run(&mut h.session, "networks").await.unwrap();
    assert!(!out.contains("Polygon"));
    assert!(run(&mut h.session, "network polygon").await.is_err());
}

mod live {
    use super::*;
    use evm_bridge_core::evm;

    fn env() -> Option<(String, String)> {
        Some((
            std::env::var("BRIDGE_RPC_URL").ok()?,
            std::env::var("BRIDGE_PRIVATE_KEY").ok()?,
        ))
    }

    #[tokio::test]
    #[ignore]
    async fn live_connect_reports_chain() {
        let Some((url, key)) = env() else { return };
        let client = evm::connect(&url, &key, true).expect("failed to create client");
        let accounts = client.request_accounts().await.expect("accounts");
        assert_eq!(accounts, vec![client.address()]);
        let chain_id = client.chain_id().await.expect("chain id");
        assert!(chain_id > 0);
    }

    #[tokio::test]
    #[ignore]
    async fn live_native_balance() {
        let Some((url, key)) = env() else { return };
        let client = evm::connect(&url, &key, true).expect("failed to create client");
        let chain_id = client.chain_id().await.expect("chain id");
        let native = Currency::native(chain_id, "ETH");
        client
            .balance(&native, client.address())
            .await
            .expect("failed to query balance");
    }
}
