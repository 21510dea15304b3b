use std::fmt;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::display;

/// Decimals of every EVM native asset.
pub const NATIVE_DECIMALS: u8 = 18;

/// An ERC20 token on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Either a chain's native asset or an ERC20 token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Currency {
    Native { chain_id: u64, symbol: String },
    Token(Token),
}

impl Currency {
    pub fn native(chain_id: u64, symbol: impl Into<String>) -> Self {
        Currency::Native {
            chain_id,
            symbol: symbol.into(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Currency::Native { chain_id, .. } => *chain_id,
            Currency::Token(t) => t.chain_id,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Currency::Native { symbol, .. } => symbol,
            Currency::Token(t) => &t.symbol,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Currency::Native { .. } => NATIVE_DECIMALS,
            Currency::Token(t) => t.decimals,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native { .. })
    }

    /// Contract address for tokens, `None` for the native asset.
    pub fn token_address(&self) -> Option<Address> {
        match self {
            Currency::Native { .. } => None,
            Currency::Token(t) => Some(t.address),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A raw on-chain amount of a currency (in its smallest unit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    pub currency: Currency,
    pub raw: U256,
}

impl CurrencyAmount {
    pub fn new(currency: Currency, raw: U256) -> Self {
        Self { currency, raw }
    }

    /// Parse a human-readable decimal string in the currency's units.
    pub fn parse(currency: Currency, input: &str) -> Result<Self, String> {
        let raw = display::parse_units(input, currency.decimals())?;
        Ok(Self { currency, raw })
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Full precision, trailing zeros trimmed.
    pub fn to_exact(&self) -> String {
        display::format_units(self.raw, self.currency.decimals())
    }

    pub fn to_significant(&self, digits: usize) -> String {
        display::to_significant(self.raw, self.currency.decimals(), digits)
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_exact(), self.currency.symbol())
    }
}
