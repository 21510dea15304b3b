/// Output formatting: unit conversion for token amounts and display helpers.
///
/// Amounts travel through the core as raw `U256` values in a currency's
/// smallest unit; these helpers convert to and from the decimal strings the
/// user types and reads.
use alloy::primitives::{Address, U256};

use crate::approval::ApprovalStatus;
use crate::registry::NetworkTarget;
use crate::session::SessionStatus;
use crate::submit::TxResult;

fn ten_pow(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Convert a raw amount into a decimal string, trailing zeros trimmed.
/// Examples: (1_500_000, 6) -> "1.5", (0, 18) -> "0"
#[must_use]
pub fn format_units(raw: U256, decimals: u8) -> String {
    let base = ten_pow(decimals);
    let whole = raw / base;
    let frac = raw % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{whole}.{}", frac_str.trim_end_matches('0'))
}

/// Format with at most `digits` significant digits, rounding half up.
/// Integer digits past the limit become zeros: 1234567.89 -> "1234570".
#[must_use]
pub fn to_significant(raw: U256, decimals: u8, digits: usize) -> String {
    let digits = digits.max(1);
    let len = raw.to_string().len();
    if len <= digits {
        return format_units(raw, decimals);
    }
    let unit = U256::from(10u64).pow(U256::from(len - digits));
    let mut kept = raw / unit;
    if (raw % unit) * U256::from(2u64) >= unit {
        kept += U256::from(1u64);
    }
    format_units(kept.checked_mul(unit).unwrap_or(raw), decimals)
}

/// Parse a human-readable decimal amount into raw units.
/// Accepts: "1.5", "1", ".25", "1." (treated as "1.0").
#[must_use = "parsing result should be checked"]
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }

    if input.starts_with('-') {
        return Err("Amount must be positive".to_string());
    }

    let (whole, frac) = input.split_once('.').unwrap_or((input, ""));
    if frac.contains('.') {
        return Err(format!("Invalid amount format '{input}'"));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(format!("Invalid amount '{input}'"));
    }
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(whole) || !digits_only(frac) {
        return Err(format!("Invalid amount '{input}'"));
    }
    if frac.len() > decimals as usize {
        return Err(format!(
            "Too many decimal places. At most {decimals} are supported."
        ));
    }

    let whole_raw = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| "Amount too large".to_string())?
    };
    let frac_raw = if frac.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{frac:0<width$}", width = decimals as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| "Amount too large".to_string())?
    };

    whole_raw
        .checked_mul(ten_pow(decimals))
        .and_then(|w| w.checked_add(frac_raw))
        .ok_or_else(|| "Amount too large".to_string())
}

/// Parse a strictly positive whole number of base units, as passed to `burn`.
#[must_use = "parsing result should be checked"]
pub fn parse_base_units(input: &str) -> Result<U256, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!(
            "Invalid amount '{input}'. Expected a whole number of token units."
        ));
    }
    let raw = U256::from_str_radix(input, 10).map_err(|_| "Amount too large".to_string())?;
    if raw.is_zero() {
        return Err("Amount must be greater than 0".to_string());
    }
    Ok(raw)
}

/// Abbreviated checksummed address: `0xd8dA…6045`.
#[must_use]
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

/// Format the network registry listing. `connected` marks the wallet's chain.
#[must_use]
pub fn format_networks<'a>(
    networks: impl Iterator<Item = &'a NetworkTarget>,
    selected: Option<&NetworkTarget>,
    connected: Option<u64>,
) -> String {
    let mut lines = Vec::new();
    for network in networks {
        let marker = if selected == Some(network) { "*" } else { " " };
        let suffix = if connected == Some(network.chain_id) {
            "  (connected)"
        } else {
            ""
        };
        lines.push(format!(
            "{marker} {:<8} {}{suffix}",
            network.chain_id, network.display_name
        ));
    }
    if lines.is_empty() {
        return "No networks available.".to_string();
    }
    lines.join("\n")
}

/// Format the session summary shown by `status`.
#[must_use]
pub fn format_status(status: &SessionStatus) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "  Account:   {}",
        status
            .account
            .map(|a| a.to_string())
            .unwrap_or_else(|| "not connected".into())
    ));
    if let Some(chain) = status.wallet_chain {
        lines.push(format!("  Chain:     {chain}"));
    }
    lines.push(format!(
        "  Network:   {}",
        status
            .network
            .as_ref()
            .map(|n| format!("{} ({})", n.display_name, n.chain_id))
            .unwrap_or_else(|| "-".into())
    ));
    if let Some(token) = &status.token {
        lines.push(format!("  Token:     {token}"));
    }
    let recipient = if status.recipient_loading {
        format!("{} (resolving...)", status.recipient_input)
    } else if let Some(addr) = status.recipient {
        match &status.recipient_name {
            Some(name) => format!("{name} ({addr})"),
            None => addr.to_string(),
        }
    } else if status.recipient_input.is_empty() {
        "sender".to_string()
    } else {
        format!("{} (invalid)", status.recipient_input)
    };
    lines.push(format!("  Recipient: {recipient}"));
    lines.push(format!("  Input:     {}", status.input));
    lines.push(format!("  Output:    {}", status.output));
    if let Some(wrap) = &status.wrap {
        lines.push(format!("  Mode:      {wrap}"));
    }
    lines.push(format!("  Approval:  {}", format_approval(status.approval)));
    if let Some(err) = &status.input_error {
        lines.push(format!("  Notice:    {err}"));
    }
    lines.join("\n")
}

#[must_use]
pub fn format_approval(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Unknown => "unknown",
        ApprovalStatus::NotApproved => "approval required",
        ApprovalStatus::Pending => "pending",
        ApprovalStatus::Approved => "approved",
    }
}

/// Format a submitted bridge transaction.
#[must_use]
pub fn format_tx_result(result: &TxResult) -> String {
    format!(
        "Bridge transaction sent!\n  Tx hash:   {}\n  Contract:  {}\n  Network:   {} ({})\n  Amount:    {}\n  Recipient: {}",
        result.tx_hash,
        result.contract,
        result.network.display_name,
        result.network.chain_id,
        result.amount,
        result.recipient,
    )
}

/// Format a submitted bridge transaction as JSON.
#[must_use]
pub fn format_tx_result_json(result: &TxResult) -> String {
    serde_json::json!({
        "tx_hash": result.tx_hash.to_string(),
        "contract": result.contract.to_string(),
        "chain_id": result.network.chain_id,
        "network": result.network.display_name,
        "amount": result.amount.to_string(),
        "recipient": result.recipient.to_string(),
    })
    .to_string()
}
