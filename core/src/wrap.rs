//! Native asset <-> wrapped token detection.

use std::fmt;

use alloy::primitives::U256;

use crate::currency::{Currency, CurrencyAmount};
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapType {
    NotApplicable,
    Wrap,
    Unwrap,
}

impl WrapType {
    pub fn applies(self) -> bool {
        self != WrapType::NotApplicable
    }
}

impl fmt::Display for WrapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapType::NotApplicable => write!(f, "swap"),
            WrapType::Wrap => write!(f, "wrap"),
            WrapType::Unwrap => write!(f, "unwrap"),
        }
    }
}

fn is_wrapped_native(registry: &Registry, currency: &Currency) -> bool {
    match currency {
        Currency::Token(token) => registry
            .wrapped_native(token.chain_id)
            .is_some_and(|w| w.address == token.address),
        Currency::Native { .. } => false,
    }
}

/// Wrap when going native -> its wrapped token on the same chain, unwrap for
/// the reverse; anything else is a regular trade.
pub fn classify(
    registry: &Registry,
    input: Option<&Currency>,
    output: Option<&Currency>,
) -> WrapType {
    let (Some(input), Some(output)) = (input, output) else {
        return WrapType::NotApplicable;
    };
    if input.chain_id() != output.chain_id() {
        return WrapType::NotApplicable;
    }
    if input.is_native() && is_wrapped_native(registry, output) {
        WrapType::Wrap
    } else if is_wrapped_native(registry, input) && output.is_native() {
        WrapType::Unwrap
    } else {
        WrapType::NotApplicable
    }
}

/// Validation message for a wrap/unwrap, `None` when it can go ahead.
pub fn wrap_input_error(amount: Option<&CurrencyAmount>, balance: Option<U256>) -> Option<String> {
    let amount = match amount {
        Some(a) if !a.is_zero() => a,
        _ => return Some("Enter an amount".to_string()),
    };
    match balance {
        Some(balance) if balance < amount.raw => Some(format!(
            "Insufficient {} balance",
            amount.currency.symbol()
        )),
        _ => None,
    }
}
