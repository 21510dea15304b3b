use anyhow::{anyhow, bail, Result};

use super::Command;
use crate::recipient::Recipient;

/// Digits with at most one dot, at least one digit.
fn looks_like_amount(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.matches('.').count() <= 1
        && value.chars().any(|c| c.is_ascii_digit())
}

fn parse_amount(value: Option<&str>, usage: &str) -> Result<String> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("Missing amount. Usage: {usage}"))?;
    if !looks_like_amount(value) {
        bail!("Invalid amount '{value}'");
    }
    Ok(value.to_string())
}

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), Some(rest.trim())),
            None => (input.to_lowercase(), None),
        };
        let arg = rest.filter(|s| !s.is_empty());

        match cmd.as_str() {
            "account" | "acc" => Ok(Command::Account),

            "networks" | "nets" => Ok(Command::Networks),

            "network" | "net" => {
                let query = arg.ok_or_else(|| {
                    anyhow!("Missing network. Usage: network <chain_id|name>")
                })?;
                Ok(Command::Network {
                    query: query.to_string(),
                })
            }

            "tokens" => Ok(Command::Tokens),

            "token" => {
                let name = arg.ok_or_else(|| anyhow!("Missing token. Usage: token <name>"))?;
                Ok(Command::Token {
                    name: name.to_string(),
                })
            }

            "to" | "recipient" => {
                let value = arg.ok_or_else(|| {
                    anyhow!("Missing recipient. Usage: to <address|name.eth|clear>")
                })?;
                if value.eq_ignore_ascii_case("clear") {
                    return Ok(Command::To { recipient: None });
                }
                Ok(Command::To {
                    recipient: Some(Recipient::parse(value)?),
                })
            }

            "amount" | "amt" => Ok(Command::Amount {
                value: parse_amount(arg, "amount <value>")?,
            }),

            "input" => Ok(Command::Input {
                value: parse_amount(arg, "input <value>")?,
            }),

            "from" => {
                let currency =
                    arg.ok_or_else(|| anyhow!("Missing currency. Usage: from <symbol>"))?;
                Ok(Command::From {
                    currency: currency.to_string(),
                })
            }

            "into" => {
                let currency =
                    arg.ok_or_else(|| anyhow!("Missing currency. Usage: into <symbol>"))?;
                Ok(Command::Into {
                    currency: currency.to_string(),
                })
            }

            "switch" | "flip" => Ok(Command::Switch),

            "expert" => {
                let enabled = match arg.map(str::to_lowercase).as_deref() {
                    Some("on") | Some("true") => true,
                    Some("off") | Some("false") => false,
                    _ => bail!("Usage: expert on|off"),
                };
                Ok(Command::Expert { enabled })
            }

            "slippage" => {
                let value =
                    arg.ok_or_else(|| anyhow!("Missing value. Usage: slippage <bips>"))?;
                let bips: u16 = value.parse().map_err(|_| {
                    anyhow!("Invalid slippage '{value}'. Expected basis points, e.g. 50 for 0.5%.")
                })?;
                Ok(Command::Slippage { bips })
            }

            "status" | "st" => Ok(Command::Status),

            "approve" => Ok(Command::Approve),

            "bridge" | "burn" => Ok(Command::Bridge),

            "help" | "h" | "?" => Ok(Command::Help {
                command: arg.map(|s| s.to_lowercase()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command '{other}'. Type 'help' for a list of commands."),
        }
    }
}
