//! Trades produced by an external quoting collaborator.

use async_trait::async_trait;

use crate::currency::{Currency, CurrencyAmount};
use crate::settings::SlippageTolerance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// A priced route between two currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub trade_type: TradeType,
    pub input: CurrencyAmount,
    pub output: CurrencyAmount,
}

impl Trade {
    /// Most the user may spend. Exact-input trades spend exactly the input.
    pub fn maximum_amount_in(&self, slippage: SlippageTolerance) -> CurrencyAmount {
        match self.trade_type {
            TradeType::ExactInput => self.input.clone(),
            TradeType::ExactOutput => CurrencyAmount::new(
                self.input.currency.clone(),
                slippage.add_to(self.input.raw),
            ),
        }
    }

    /// Least the user may receive. Exact-output trades receive exactly the output.
    pub fn minimum_amount_out(&self, slippage: SlippageTolerance) -> CurrencyAmount {
        match self.trade_type {
            TradeType::ExactOutput => self.output.clone(),
            TradeType::ExactInput => CurrencyAmount::new(
                self.output.currency.clone(),
                slippage.subtract_from(self.output.raw),
            ),
        }
    }
}

/// What the quoter is asked for: the typed amount on one side and the
/// currency wanted on the other.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub trade_type: TradeType,
    pub amount: CurrencyAmount,
    pub other: Currency,
}

#[async_trait]
pub trait TradeQuoter: Send + Sync {
    async fn best_trade(&self, request: &QuoteRequest) -> anyhow::Result<Option<Trade>>;
}

/// Quoter for deployments without a trading backend. Never finds a route.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoQuotes;

#[async_trait]
impl TradeQuoter for NoQuotes {
    async fn best_trade(&self, _request: &QuoteRequest) -> anyhow::Result<Option<Trade>> {
        Ok(None)
    }
}
