//! The two-sided amount fields and everything derived from them.
//!
//! Only the independent field is ever written. The other side is computed
//! on demand by [`SwapFieldState::derive`], either 1:1 for wraps or from a
//! quoted trade, so there is no setter for it at all.

use std::fmt;

use alloy::primitives::U256;
use tracing::{debug, warn};

use crate::currency::{Currency, CurrencyAmount};
use crate::registry::Registry;
use crate::settings::{Settings, SlippageTolerance};
use crate::trade::{QuoteRequest, Trade, TradeQuoter, TradeType};
use crate::wrap::{self, WrapType};

/// Significant digits shown for a quoted dependent amount.
const DEPENDENT_DIGITS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Input,
    Output,
}

impl Field {
    pub fn opposite(self) -> Self {
        match self {
            Field::Input => Field::Output,
            Field::Output => Field::Input,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Input => write!(f, "input"),
            Field::Output => write!(f, "output"),
        }
    }
}

/// What the user typed and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapFields {
    pub independent_field: Field,
    pub typed_value: String,
    /// `None` means the sender receives the output.
    pub recipient: Option<String>,
}

impl Default for SwapFields {
    fn default() -> Self {
        Self {
            independent_field: Field::Input,
            typed_value: String::new(),
            recipient: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SwapFieldState {
    fields: SwapFields,
    input_currency: Option<Currency>,
    output_currency: Option<Currency>,
}

impl SwapFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &SwapFields {
        &self.fields
    }

    pub fn independent_field(&self) -> Field {
        self.fields.independent_field
    }

    pub fn typed_value(&self) -> &str {
        &self.fields.typed_value
    }

    pub fn recipient(&self) -> Option<&str> {
        self.fields.recipient.as_deref()
    }

    pub fn currency(&self, field: Field) -> Option<&Currency> {
        match field {
            Field::Input => self.input_currency.as_ref(),
            Field::Output => self.output_currency.as_ref(),
        }
    }

    /// The user typed into `field`.
    pub fn set_independent(&mut self, field: Field, value: impl Into<String>) {
        self.fields.independent_field = field;
        self.fields.typed_value = value.into();
    }

    /// Swap sides. The typed value stays with the currency it was typed for.
    pub fn switch_fields(&mut self) {
        self.fields.independent_field = self.fields.independent_field.opposite();
        std::mem::swap(&mut self.input_currency, &mut self.output_currency);
    }

    /// Bind a currency to a field. Picking the currency the other side
    /// already holds switches the fields instead.
    pub fn select_currency(&mut self, field: Field, currency: Currency) {
        if self.currency(field.opposite()) == Some(&currency) {
            self.switch_fields();
            return;
        }
        match field {
            Field::Input => self.input_currency = Some(currency),
            Field::Output => self.output_currency = Some(currency),
        }
    }

    /// Set or clear the recipient. Setting one is silently ignored when the
    /// settings do not allow it; returns whether the value was taken.
    pub fn set_recipient(&mut self, recipient: Option<&str>, settings: &dyn Settings) -> bool {
        match recipient {
            Some(r) if !settings.recipient_allowed() => {
                debug!(recipient = %r, "recipient not allowed outside expert mode, ignoring");
                false
            }
            _ => {
                self.fields.recipient = recipient.map(str::to_string);
                true
            }
        }
    }

    /// The typed value as an amount of the independent field's currency.
    pub fn parsed_amount(&self) -> Option<CurrencyAmount> {
        let currency = self.currency(self.fields.independent_field)?.clone();
        if self.fields.typed_value.trim().is_empty() {
            return None;
        }
        CurrencyAmount::parse(currency, &self.fields.typed_value).ok()
    }

    /// Compute the dependent side and validation state.
    ///
    /// Wraps are resolved 1:1 without asking the quoter.
    pub async fn derive(
        &self,
        registry: &Registry,
        quoter: &dyn TradeQuoter,
        slippage: SlippageTolerance,
        input_balance: Option<U256>,
    ) -> DerivedSwap {
        let independent = self.fields.independent_field;
        let wrap = wrap::classify(
            registry,
            self.input_currency.as_ref(),
            self.output_currency.as_ref(),
        );
        let parsed_amount = self.parsed_amount();

        let mut derived = DerivedSwap {
            wrap,
            parsed_amount: parsed_amount.clone(),
            trade: None,
            input_amount: None,
            output_amount: None,
            formatted_input: String::new(),
            formatted_output: String::new(),
            input_error: None,
        };

        if wrap.applies() {
            let mirrored = |field: Field| {
                let currency = self.currency(field)?.clone();
                parsed_amount
                    .as_ref()
                    .map(|a| CurrencyAmount::new(currency, a.raw))
            };
            derived.input_amount = mirrored(Field::Input);
            derived.output_amount = mirrored(Field::Output);
            derived.input_error = wrap::wrap_input_error(derived.input_amount.as_ref(), input_balance);
        } else {
            derived.trade = self.quote(quoter, parsed_amount.as_ref()).await;
            match &derived.trade {
                Some(trade) => {
                    derived.input_amount = Some(trade.input.clone());
                    derived.output_amount = Some(trade.output.clone());
                }
                None => match independent {
                    Field::Input => derived.input_amount = parsed_amount.clone(),
                    Field::Output => derived.output_amount = parsed_amount.clone(),
                },
            }
            derived.input_error = self.trade_input_error(&derived, slippage, input_balance);
        }

        let dependent = derived
            .amount(independent.opposite())
            .map(|a| {
                if wrap.applies() {
                    a.to_exact()
                } else {
                    a.to_significant(DEPENDENT_DIGITS)
                }
            })
            .unwrap_or_default();
        match independent {
            Field::Input => {
                derived.formatted_input = self.fields.typed_value.clone();
                derived.formatted_output = dependent;
            }
            Field::Output => {
                derived.formatted_input = dependent;
                derived.formatted_output = self.fields.typed_value.clone();
            }
        }
        derived
    }

    async fn quote(&self, quoter: &dyn TradeQuoter, amount: Option<&CurrencyAmount>) -> Option<Trade> {
        let amount = amount.filter(|a| !a.is_zero())?;
        let independent = self.fields.independent_field;
        let other = self.currency(independent.opposite())?.clone();
        let request = QuoteRequest {
            trade_type: match independent {
                Field::Input => TradeType::ExactInput,
                Field::Output => TradeType::ExactOutput,
            },
            amount: amount.clone(),
            other,
        };
        match quoter.best_trade(&request).await {
            Ok(trade) => trade,
            Err(e) => {
                warn!("trade quote failed: {e:#}");
                None
            }
        }
    }

    fn trade_input_error(
        &self,
        derived: &DerivedSwap,
        slippage: SlippageTolerance,
        input_balance: Option<U256>,
    ) -> Option<String> {
        if self.input_currency.is_none() || self.output_currency.is_none() {
            return Some("Select a token".to_string());
        }
        if derived.parsed_amount.as_ref().map_or(true, CurrencyAmount::is_zero) {
            return Some("Enter an amount".to_string());
        }
        let trade = match &derived.trade {
            Some(t) => t,
            None => return Some("Insufficient liquidity for this trade.".to_string()),
        };
        let max_in = trade.maximum_amount_in(slippage);
        match input_balance {
            Some(balance) if balance < max_in.raw => Some(format!(
                "Insufficient {} balance",
                max_in.currency.symbol()
            )),
            _ => None,
        }
    }
}

/// Result of [`SwapFieldState::derive`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSwap {
    pub wrap: WrapType,
    pub parsed_amount: Option<CurrencyAmount>,
    pub trade: Option<Trade>,
    pub input_amount: Option<CurrencyAmount>,
    pub output_amount: Option<CurrencyAmount>,
    pub formatted_input: String,
    pub formatted_output: String,
    pub input_error: Option<String>,
}

impl DerivedSwap {
    pub fn amount(&self, field: Field) -> Option<&CurrencyAmount> {
        match field {
            Field::Input => self.input_amount.as_ref(),
            Field::Output => self.output_amount.as_ref(),
        }
    }
}
