//! Static registry of destination networks and bridge tokens.
//!
//! Loaded once at startup and read-only afterwards. Entries are keyed by
//! chain id and kept in insertion order for presentation.

use std::fmt;
use std::path::Path;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::currency::{Currency, Token};
use crate::error::{BridgeError, Result};

/// A destination network the user can bridge to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkTarget {
    pub chain_id: u64,
    pub display_name: String,
}

impl NetworkTarget {
    pub fn new(chain_id: u64, display_name: impl Into<String>) -> Self {
        Self {
            chain_id,
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for NetworkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.chain_id)
    }
}

/// Everything the core knows about one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(flatten)]
    pub target: NetworkTarget,
    /// Bridge contract the burn is sent to when this chain is selected.
    #[serde(default)]
    pub bridge_contract: Option<Address>,
    /// Canonical wrapped form of the native asset (WETH, WBNB, ...).
    #[serde(default)]
    pub wrapped_native: Option<Token>,
    pub native_symbol: String,
}

/// A named token the bridge can move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeToken {
    pub name: String,
    pub chain_id: u64,
    pub address: Address,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    networks: Vec<RegistryEntry>,
    #[serde(default)]
    tokens: Vec<BridgeToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    tokens: Vec<BridgeToken>,
}

const BSC_BRIDGE: Address = address!("1759B3AbD81B6c27bc1B1D0a6F5EF68f4151B523");
const GAURA_BRIDGE: Address = address!("6f78cde40436D1e406CFC9e4F2ed788E0C43E929");

fn wrapped(chain_id: u64, address: Address, symbol: &str) -> Option<Token> {
    Some(Token {
        chain_id,
        address,
        symbol: symbol.into(),
        decimals: 18,
    })
}

fn bridge_token(name: &str, chain_id: u64, address: Address) -> BridgeToken {
    BridgeToken {
        name: name.into(),
        chain_id,
        address,
    }
}

impl Registry {
    /// The reference deployment: Binance, Gaura, Ethereum and Polygon.
    pub fn builtin() -> Self {
        let entries = vec![
            RegistryEntry {
                target: NetworkTarget::new(56, "Binance"),
                bridge_contract: Some(BSC_BRIDGE),
                wrapped_native: wrapped(
                    56,
                    address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
                    "WBNB",
                ),
                native_symbol: "BNB".into(),
            },
            RegistryEntry {
                target: NetworkTarget::new(61115, "Gaura"),
                bridge_contract: Some(GAURA_BRIDGE),
                wrapped_native: None,
                native_symbol: "GAURA".into(),
            },
            RegistryEntry {
                target: NetworkTarget::new(1, "Ethereum"),
                bridge_contract: Some(BSC_BRIDGE),
                wrapped_native: wrapped(
                    1,
                    address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                    "WETH",
                ),
                native_symbol: "ETH".into(),
            },
            RegistryEntry {
                target: NetworkTarget::new(137, "Polygon"),
                bridge_contract: Some(BSC_BRIDGE),
                wrapped_native: wrapped(
                    137,
                    address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
                    "WMATIC",
                ),
                native_symbol: "MATIC".into(),
            },
        ];
        let tokens = vec![
            bridge_token("Anna", 56, address!("32b8376f42af40C58Cfbb7B69908EC66EcE07d7D")),
            bridge_token("Aura", 61115, address!("E4821faf6E65Bf091119E33dF694033F4C6d173D")),
            bridge_token("BoomX", 1, address!("694D613F79A6852bED0AE1CeC6D5cab62C724dF3")),
            bridge_token("5Paisa", 137, address!("e0d2a21b86b334C507c376f71Ed5061740F8735f")),
            bridge_token("FinalX", 137, address!("4F0b872be3f988296D69492C67cd0F9B17e57a7E")),
        ];
        Self { entries, tokens }
    }

    /// Build a registry, rejecting duplicate chain ids and tokens on unknown chains.
    pub fn from_entries(entries: Vec<RegistryEntry>, tokens: Vec<BridgeToken>) -> Result<Self> {
        for (i, entry) in entries.iter().enumerate() {
            let id = entry.target.chain_id;
            if entries[..i].iter().any(|e| e.target.chain_id == id) {
                return Err(BridgeError::Config(format!(
                    "Duplicate registry entry for chain {id}."
                )));
            }
            if let Some(w) = &entry.wrapped_native {
                if w.chain_id != id {
                    return Err(BridgeError::Config(format!(
                        "Wrapped native {} of chain {id} is declared on chain {}.",
                        w.symbol, w.chain_id
                    )));
                }
            }
        }
        for token in &tokens {
            if !entries.iter().any(|e| e.target.chain_id == token.chain_id) {
                return Err(BridgeError::Config(format!(
                    "Token {} refers to unknown chain {}.",
                    token.name, token.chain_id
                )));
            }
        }
        Ok(Self { entries, tokens })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(json)
            .map_err(|e| BridgeError::Config(format!("Invalid registry: {e}")))?;
        Self::from_entries(file.networks, file.tokens)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read registry {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn get(&self, chain_id: u64) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.target.chain_id == chain_id)
    }

    pub fn network(&self, chain_id: u64) -> Option<&NetworkTarget> {
        self.get(chain_id).map(|e| &e.target)
    }

    /// Look a network up by chain id or case-insensitive display name.
    pub fn find_network(&self, query: &str) -> Option<&NetworkTarget> {
        if let Ok(id) = query.parse::<u64>() {
            return self.network(id);
        }
        self.entries
            .iter()
            .map(|e| &e.target)
            .find(|t| t.display_name.eq_ignore_ascii_case(query))
    }

    /// Networks in registry order. Every call starts a fresh iteration.
    pub fn networks(&self) -> impl Iterator<Item = &NetworkTarget> + Clone + '_ {
        self.entries.iter().map(|e| &e.target)
    }

    pub fn bridge_contract(&self, chain_id: u64) -> Option<Address> {
        self.get(chain_id).and_then(|e| e.bridge_contract)
    }

    pub fn native(&self, chain_id: u64) -> Option<Currency> {
        self.get(chain_id)
            .map(|e| Currency::native(chain_id, e.native_symbol.clone()))
    }

    pub fn wrapped_native(&self, chain_id: u64) -> Option<&Token> {
        self.get(chain_id).and_then(|e| e.wrapped_native.as_ref())
    }

    pub fn tokens(&self) -> &[BridgeToken] {
        &self.tokens
    }

    pub fn token(&self, name: &str) -> Option<&BridgeToken> {
        self.tokens
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a currency by symbol on a chain: the native symbol, the
    /// wrapped native symbol, or a bridge token name.
    pub fn currency(&self, chain_id: u64, symbol: &str) -> Option<Currency> {
        let entry = self.get(chain_id)?;
        if entry.native_symbol.eq_ignore_ascii_case(symbol) {
            return Some(Currency::native(chain_id, entry.native_symbol.clone()));
        }
        if let Some(w) = entry
            .wrapped_native
            .as_ref()
            .filter(|w| w.symbol.eq_ignore_ascii_case(symbol))
        {
            return Some(Currency::Token(w.clone()));
        }
        self.tokens
            .iter()
            .find(|t| t.chain_id == chain_id && t.name.eq_ignore_ascii_case(symbol))
            .map(|t| {
                Currency::Token(Token {
                    chain_id,
                    address: t.address,
                    symbol: t.name.clone(),
                    decimals: 18,
                })
            })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_is_stable() {
        let registry = Registry::builtin();
        let ids: Vec<u64> = registry.networks().map(|n| n.chain_id).collect();
        assert_eq!(ids, vec![56, 61115, 1, 137]);
        let again: Vec<u64> = registry.networks().map(|n| n.chain_id).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn networks_iterator_is_restartable() {
        let registry = Registry::builtin();
        let iter = registry.networks();
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn bridge_contracts() {
        let registry = Registry::builtin();
        assert_eq!(registry.bridge_contract(137), Some(BSC_BRIDGE));
        assert_eq!(registry.bridge_contract(61115), Some(GAURA_BRIDGE));
        assert_eq!(registry.bridge_contract(5), None);
    }

    #[test]
    fn find_network_by_id_or_name() {
        let registry = Registry::builtin();
        assert_eq!(registry.find_network("137").unwrap().display_name, "Polygon");
        assert_eq!(registry.find_network("polygon").unwrap().chain_id, 137);
        assert!(registry.find_network("goerli").is_none());
        assert!(registry.find_network("5").is_none());
    }

    #[test]
    fn currency_lookup() {
        let registry = Registry::builtin();
        assert!(registry.currency(1, "eth").unwrap().is_native());
        let weth = registry.currency(1, "WETH").unwrap();
        assert_eq!(weth.symbol(), "WETH");
        assert_eq!(registry.currency(137, "finalx").unwrap().symbol(), "FinalX");
        assert!(registry.currency(1, "FinalX").is_none());
        assert!(registry.currency(61115, "WGAURA").is_none());
    }

    #[test]
    fn from_json_round() {
        let json = r#"{
            "networks": [
                {"chain_id": 1, "display_name": "Ethereum", "native_symbol": "ETH",
                 "bridge_contract": "0x1759B3AbD81B6c27bc1B1D0a6F5EF68f4151B523"},
                {"chain_id": 10, "display_name": "Optimism", "native_symbol": "ETH",
                 "bridge_contract": null}
            ],
            "tokens": [
                {"name": "BoomX", "chain_id": 1,
                 "address": "0x694D613F79A6852bED0AE1CeC6D5cab62C724dF3"}
            ]
        }"#;
        let registry = Registry::from_json(json).unwrap();
        assert_eq!(registry.networks().count(), 2);
        assert_eq!(registry.bridge_contract(10), None);
        assert_eq!(registry.tokens().len(), 1);
    }

    #[test]
    fn duplicate_chain_rejected() {
        let entry = RegistryEntry {
            target: NetworkTarget::new(1, "Ethereum"),
            bridge_contract: None,
            wrapped_native: None,
            native_symbol: "ETH".into(),
        };
        let err = Registry::from_entries(vec![entry.clone(), entry], vec![]).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn token_on_unknown_chain_rejected() {
        let err = Registry::from_entries(vec![], vec![bridge_token("X", 9, Address::ZERO)])
            .unwrap_err();
        assert!(err.to_string().contains("unknown chain 9"));
    }

    #[test]
    fn invalid_json_is_config_error() {
        assert!(matches!(
            Registry::from_json("{"),
            Err(BridgeError::Config(_))
        ));
    }
}
