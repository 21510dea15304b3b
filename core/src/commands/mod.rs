/// Command definitions and parsing for the bridge REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use crate::recipient::{Recipient, ResolvedRecipient};
use crate::submit::BridgeRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the connected account and chain
    Account,
    /// List destination networks
    Networks,
    /// Select the destination network: network <chain_id|name>
    Network { query: String },
    /// List bridge tokens
    Tokens,
    /// Select the token to bridge: token <name>
    Token { name: String },
    /// Set or clear the recipient: to <address|name.eth|clear>
    To { recipient: Option<Recipient> },
    /// Amount to bridge (output field): amount <value>
    Amount { value: String },
    /// Amount to spend (input field): input <value>
    Input { value: String },
    /// Currency to spend: from <symbol>
    From { currency: String },
    /// Currency to receive: into <symbol>
    Into { currency: String },
    /// Swap input and output
    Switch,
    /// Toggle expert mode: expert on|off
    Expert { enabled: bool },
    /// Set slippage tolerance in basis points: slippage <bips>
    Slippage { bips: u16 },
    /// Show the current bridge state
    Status,
    /// Approve the bridge contract to spend the token
    Approve,
    /// Submit the bridge transaction
    Bridge,
    /// Print help
    Help { command: Option<String> },
    /// Exit
    Exit,
}

impl Command {
    /// Return the recipient if this command sets one.
    pub fn recipient(&self) -> Option<&Recipient> {
        match self {
            Command::To { recipient } => recipient.as_ref(),
            _ => None,
        }
    }

    /// Returns a confirmation prompt if this command should ask before executing.
    /// `request` is the bridge request the command would submit.
    pub fn confirmation_prompt(
        &self,
        request: Option<&BridgeRequest>,
        resolved: Option<&ResolvedRecipient>,
    ) -> Option<String> {
        match self {
            Command::Bridge => {
                let request = request?;
                let recipient = match resolved {
                    Some(r) if r.address == request.recipient => r.to_string(),
                    _ => request.recipient.to_string(),
                };
                Some(format!(
                    "Bridge {} token units to {} on {}?",
                    request.amount, recipient, request.network,
                ))
            }
            Command::Approve => Some(
                "Approve the bridge contract to spend your tokens?".to_string(),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NetworkTarget;
    use alloy::primitives::{Address, U256};

    fn request() -> BridgeRequest {
        BridgeRequest {
            recipient: Address::ZERO,
            network: NetworkTarget::new(137, "Polygon"),
            amount: U256::from(100u64),
        }
    }

    #[test]
    fn bridge_requires_confirmation() {
        let prompt = Command::Bridge
            .confirmation_prompt(Some(&request()), None)
            .unwrap();
        assert!(prompt.contains("100"));
        assert!(prompt.contains("Polygon (137)"));
    }

    #[test]
    fn bridge_without_request_has_no_prompt() {
        assert!(Command::Bridge.confirmation_prompt(None, None).is_none());
    }

    #[test]
    fn bridge_prompt_shows_resolved_name() {
        let resolved = ResolvedRecipient {
            address: Address::ZERO,
            name: Some("friend.eth".into()),
        };
        let prompt = Command::Bridge
            .confirmation_prompt(Some(&request()), Some(&resolved))
            .unwrap();
        assert!(prompt.contains("friend.eth"));
        assert!(prompt.contains("0x"));
    }

    #[test]
    fn read_only_commands_need_no_confirmation() {
        assert!(Command::Status.confirmation_prompt(None, None).is_none());
        assert!(Command::Networks.confirmation_prompt(None, None).is_none());
        assert!(Command::Approve.confirmation_prompt(None, None).is_some());
    }

    #[test]
    fn recipient_accessor() {
        let cmd = Command::To {
            recipient: Some(Recipient::Name("friend.eth".into())),
        };
        assert!(cmd.recipient().is_some());
        assert!(Command::To { recipient: None }.recipient().is_none());
    }
}
