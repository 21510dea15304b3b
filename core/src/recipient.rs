use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use anyhow::bail;
use tracing::{debug, warn};

use crate::wallet::NameResolver;

/// Remove every whitespace character, not just the surrounding ones.
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a `0x`-prefixed 40-hex-character address.
///
/// All-lowercase and all-uppercase hex is accepted as is; mixed case must be
/// a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Option<Address> {
    let hex = input.strip_prefix("0x")?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(input, None).ok()
    } else {
        Address::from_str(input).ok()
    }
}

/// Whether the input looks like an ENS name (`vitalik.eth`, `pay.vitalik.eth`).
pub fn looks_like_name(input: &str) -> bool {
    let lower = input.to_lowercase();
    let Some(rest) = lower.strip_suffix(".eth") else {
        return false;
    };
    !rest.is_empty()
        && rest.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// A recipient that may be a raw address or an ENS name (e.g. `vitalik.eth`).
/// Name resolution is deferred to execute-time where we have async + network access.
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    Address(Address),
    Name(String),
}

impl Recipient {
    /// Parse user input as either a hex address or an `.eth` name.
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let input = strip_whitespace(input);
        if input.is_empty() {
            bail!("Recipient cannot be empty.");
        }

        if input.starts_with("0x") || input.starts_with("0X") {
            return match parse_address(&input) {
                Some(addr) => Ok(Recipient::Address(addr)),
                None => bail!("Invalid address '{input}'."),
            };
        }

        if looks_like_name(&input) {
            return Ok(Recipient::Name(input.to_lowercase()));
        }

        bail!("Invalid recipient '{input}'. Expected a 0x address or an .eth name.");
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Address(addr) => write!(f, "{addr}"),
            Recipient::Name(name) => write!(f, "{name}"),
        }
    }
}

/// The result of resolving a `Recipient`: always has an address, optionally
/// retains the original name for display purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecipient {
    pub address: Address,
    pub name: Option<String>,
}

impl fmt::Display for ResolvedRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({addr})", addr = self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Snapshot of the recipient field as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressState {
    pub address: Option<Address>,
    pub loading: bool,
    pub name: Option<String>,
}

/// An outstanding name lookup. Carries the input it was issued for, so a
/// late answer can be matched against the current input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameLookup {
    input: String,
}

impl NameLookup {
    pub fn name(&self) -> &str {
        &self.input
    }

    /// Run the lookup against a resolver. Resolver failures count as "not found".
    pub async fn run(&self, resolver: &dyn NameResolver) -> Option<Address> {
        match resolver.resolve_name(&self.input.to_lowercase()).await {
            Ok(address) => address,
            Err(e) => {
                warn!(name = %self.input, "name resolution failed: {e:#}");
                None
            }
        }
    }
}

/// Holds the recipient input and its resolved address.
///
/// `normalized` is only ever set from a literal address or from a lookup
/// whose input is still the current one.
#[derive(Debug, Clone, Default)]
pub struct AddressResolver {
    raw: String,
    normalized: Option<Address>,
    resolving: bool,
    resolved_name: Option<String>,
}

impl AddressResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input. Returns a lookup to run when the input is a name;
    /// literal addresses are resolved synchronously.
    pub fn set_input(&mut self, raw: &str) -> Option<NameLookup> {
        let stripped = strip_whitespace(raw);
        if stripped == self.raw {
            return None;
        }

        self.raw = stripped;
        self.resolved_name = None;

        if let Some(address) = parse_address(&self.raw) {
            self.normalized = Some(address);
            self.resolving = false;
            return None;
        }

        self.normalized = None;
        if looks_like_name(&self.raw) {
            self.resolving = true;
            debug!(name = %self.raw, "issuing name lookup");
            Some(NameLookup {
                input: self.raw.clone(),
            })
        } else {
            self.resolving = false;
            None
        }
    }

    /// Apply the answer of a lookup. Answers for an input that is no longer
    /// current are discarded; returns whether the state changed.
    pub fn apply_resolution(&mut self, lookup: &NameLookup, address: Option<Address>) -> bool {
        if lookup.input != self.raw {
            debug!(
                stale = %lookup.input,
                current = %self.raw,
                "discarding stale name resolution"
            );
            return false;
        }
        self.resolving = false;
        self.normalized = address;
        self.resolved_name = address.map(|_| lookup.input.to_lowercase());
        true
    }

    /// Set the input and, for names, resolve it before returning.
    pub async fn resolve(&mut self, raw: &str, resolver: &dyn NameResolver) -> AddressState {
        if let Some(lookup) = self.set_input(raw) {
            let address = lookup.run(resolver).await;
            self.apply_resolution(&lookup, address);
        }
        self.state()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> Option<Address> {
        self.normalized
    }

    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    pub fn resolved_name(&self) -> Option<&str> {
        self.resolved_name.as_deref()
    }

    /// Non-empty input that is neither resolving nor resolved.
    pub fn error(&self) -> bool {
        !self.raw.is_empty() && !self.resolving && self.normalized.is_none()
    }

    pub fn state(&self) -> AddressState {
        AddressState {
            address: self.normalized,
            loading: self.resolving,
            name: self.resolved_name.clone(),
        }
    }

    /// The resolved recipient, if any.
    pub fn resolved(&self) -> Option<ResolvedRecipient> {
        self.normalized.map(|address| ResolvedRecipient {
            address,
            name: self.resolved_name.clone(),
        })
    }
}
