use anyhow::Result;
use serde_json::json;

use super::help::help_text;
use super::Command;
use crate::display;
use crate::session::BridgeSession;
use crate::swap::Field;

impl Command {
    /// Execute a command against the session and return the output string.
    pub async fn execute(&self, session: &mut BridgeSession, json_output: bool) -> Result<String> {
        match self {
            Command::Account => {
                let account = session.account();
                let chain = session.wallet_chain();
                if json_output {
                    return Ok(json!({
                        "account": account.map(|a| a.to_string()),
                        "chain_id": chain,
                    })
                    .to_string());
                }
                Ok(match (account, chain) {
                    (Some(a), Some(c)) => format!("{a} (chain {c})"),
                    (Some(a), None) => a.to_string(),
                    _ => "No wallet connected.".to_string(),
                })
            }

            Command::Networks => {
                let selected = session.selected_network();
                if json_output {
                    let nets: Vec<_> = session
                        .destinations()
                        .map(|n| {
                            json!({
                                "chain_id": n.chain_id,
                                "name": n.display_name,
                                "selected": Some(n) == selected,
                                "bridge_contract": session
                                    .registry()
                                    .bridge_contract(n.chain_id)
                                    .map(|a| a.to_string()),
                            })
                        })
                        .collect();
                    return Ok(json!(nets).to_string());
                }
                Ok(display::format_networks(
                    session.destinations(),
                    selected,
                    session.wallet_chain(),
                ))
            }

            Command::Network { query } => {
                let target = session.select_network(query)?;
                if json_output {
                    return Ok(json!({
                        "chain_id": target.chain_id,
                        "name": target.display_name,
                    })
                    .to_string());
                }
                Ok(format!("Destination set to {target}."))
            }

            Command::Tokens => {
                let selected = session.selected_token().map(|t| t.name.clone());
                let tokens = session.registry().tokens();
                if json_output {
                    let list: Vec<_> = tokens
                        .iter()
                        .map(|t| {
                            json!({
                                "name": t.name,
                                "chain_id": t.chain_id,
                                "address": t.address.to_string(),
                                "selected": selected.as_deref() == Some(t.name.as_str()),
                            })
                        })
                        .collect();
                    return Ok(json!(list).to_string());
                }
                if tokens.is_empty() {
                    return Ok("No bridge tokens registered.".to_string());
                }
                let lines: Vec<String> = tokens
                    .iter()
                    .map(|t| {
                        let marker = if selected.as_deref() == Some(t.name.as_str()) {
                            "*"
                        } else {
                            " "
                        };
                        format!(
                            "{marker} {:<8} chain {:<6} {}",
                            t.name,
                            t.chain_id,
                            display::short_address(&t.address)
                        )
                    })
                    .collect();
                Ok(lines.join("\n"))
            }

            Command::Token { name } => {
                let token = session.select_token(name)?;
                if json_output {
                    return Ok(json!({
                        "name": token.name,
                        "chain_id": token.chain_id,
                        "address": token.address.to_string(),
                    })
                    .to_string());
                }
                Ok(format!("Bridging {} (chain {}).", token.name, token.chain_id))
            }

            Command::To { recipient } => {
                let Some(recipient) = recipient else {
                    session.clear_recipient();
                    return Ok(if json_output {
                        json!({ "recipient": null }).to_string()
                    } else {
                        "Recipient cleared. Tokens will be sent to your own account.".to_string()
                    });
                };
                let state = session.set_recipient(&recipient.to_string()).await?;
                let resolved = session.recipient();
                if json_output {
                    return Ok(json!({
                        "recipient": state.address.map(|a| a.to_string()),
                        "name": state.name,
                    })
                    .to_string());
                }
                Ok(match resolved {
                    Some(r) => format!("Recipient set to {r}."),
                    None => format!("Recipient '{recipient}' is not resolved yet."),
                })
            }

            Command::Amount { value } => {
                session.set_amount(value);
                Ok(if json_output {
                    json!({ "field": "output", "value": value }).to_string()
                } else {
                    format!("Amount set to {value}.")
                })
            }

            Command::Input { value } => {
                session.set_input_amount(value);
                let derived = session.derive().await;
                if json_output {
                    return Ok(json!({
                        "input": derived.formatted_input,
                        "output": derived.formatted_output,
                        "error": derived.input_error,
                    })
                    .to_string());
                }
                Ok(match derived.input_error {
                    Some(err) => format!("Input set to {value}. {err}"),
                    None => format!(
                        "Input set to {value}. You receive {}.",
                        derived.formatted_output
                    ),
                })
            }

            Command::From { currency } | Command::Into { currency } => {
                let field = if matches!(self, Command::From { .. }) {
                    Field::Input
                } else {
                    Field::Output
                };
                let selected = session.select_currency(field, currency)?;
                let fields = session.fields();
                let input = fields.currency(Field::Input).map(|c| c.to_string());
                let output = fields.currency(Field::Output).map(|c| c.to_string());
                if json_output {
                    return Ok(json!({ "input": input, "output": output }).to_string());
                }
                Ok(format!(
                    "{} -> {} ({selected} on the {field} side)",
                    input.as_deref().unwrap_or("-"),
                    output.as_deref().unwrap_or("-"),
                ))
            }

            Command::Switch => {
                session.switch_fields();
                let fields = session.fields();
                let input = fields.currency(Field::Input).map(|c| c.to_string());
                let output = fields.currency(Field::Output).map(|c| c.to_string());
                if json_output {
                    return Ok(json!({
                        "input": input,
                        "output": output,
                        "independent": fields.independent_field().to_string(),
                    })
                    .to_string());
                }
                Ok(format!(
                    "Switched: {} -> {}",
                    input.as_deref().unwrap_or("-"),
                    output.as_deref().unwrap_or("-"),
                ))
            }

            Command::Expert { enabled } => {
                session.set_expert_mode(*enabled);
                Ok(if json_output {
                    json!({ "expert_mode": enabled }).to_string()
                } else if *enabled {
                    "Expert mode on. Custom recipients are allowed.".to_string()
                } else {
                    "Expert mode off.".to_string()
                })
            }

            Command::Slippage { bips } => {
                let slippage = session.set_slippage(*bips)?;
                Ok(if json_output {
                    json!({ "slippage_bips": slippage.bips() }).to_string()
                } else {
                    format!("Slippage tolerance set to {slippage}.")
                })
            }

            Command::Status => {
                let status = session.status().await;
                if json_output {
                    return Ok(json!({
                        "account": status.account.map(|a| a.to_string()),
                        "wallet_chain": status.wallet_chain,
                        "network": status.network.as_ref().map(|n| json!({
                            "chain_id": n.chain_id,
                            "name": n.display_name,
                        })),
                        "token": status.token,
                        "recipient": status.recipient.map(|a| a.to_string()),
                        "recipient_name": status.recipient_name,
                        "recipient_loading": status.recipient_loading,
                        "input": status.input,
                        "output": status.output,
                        "wrap": status.wrap,
                        "approval": display::format_approval(status.approval),
                        "error": status.input_error,
                    })
                    .to_string());
                }
                Ok(display::format_status(&status))
            }

            Command::Approve => {
                let tx_hash = session.approve().await?;
                Ok(if json_output {
                    json!({ "tx_hash": tx_hash.to_string(), "status": "pending" }).to_string()
                } else {
                    format!("Approval sent!\n  Tx hash: {tx_hash}\n  Run 'status' to check confirmation.")
                })
            }

            Command::Bridge => {
                let result = session.bridge().await?;
                if json_output {
                    Ok(display::format_tx_result_json(&result))
                } else {
                    Ok(display::format_tx_result(&result))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::U256;

    use super::*;
    use crate::registry::Registry;
    use crate::session::Collaborators;
    use crate::settings::UserSettings;
    use crate::testing::{MockApprover, MockNames, MockWallet};
    use crate::trade::NoQuotes;

    async fn session() -> (BridgeSession, Arc<MockWallet>) {
        let wallet = Arc::new(MockWallet::new().on_chain(56));
        let collaborators = Collaborators {
            wallet: wallet.clone(),
            approver: Arc::new(MockApprover::with_allowance(U256::MAX)),
            names: Arc::new(MockNames::new()),
            quoter: Arc::new(NoQuotes),
        };
        let mut session =
            BridgeSession::new(Registry::builtin(), UserSettings::default(), 5_000_000, collaborators);
        session.connect().await.unwrap();
        (session, wallet)
    }

    async fn run(session: &mut BridgeSession, line: &str) -> Result<String> {
        Command::parse(line)?.execute(session, false).await
    }

    #[tokio::test]
    async fn networks_hide_connected_chain() {
        let (mut s, _) = session().await;
        let out = run(&mut s, "networks").await.unwrap();
        assert!(!out.contains("Binance"));
        assert!(out.contains("Polygon"));
    }

    #[tokio::test]
    async fn full_bridge_flow() {
        let (mut s, wallet) = session().await;
        run(&mut s, "network polygon").await.unwrap();
        run(&mut s, "token FinalX").await.unwrap();
        run(&mut s, "amount 250").await.unwrap();
        let status = run(&mut s, "status").await.unwrap();
        assert!(status.contains("Polygon (137)"));
        assert!(status.contains("approved"));

        let out = run(&mut s, "bridge").await.unwrap();
        assert!(out.contains("Bridge transaction sent!"));
        assert_eq!(wallet.burns()[0].1.amount, U256::from(250u64));
    }

    #[tokio::test]
    async fn errors_are_reported_not_fatal() {
        let (mut s, _) = session().await;
        let err = run(&mut s, "bridge").await.unwrap_err();
        assert!(err.to_string().contains("Select a destination network"));
        assert!(run(&mut s, "network 56").await.is_err());
        assert!(run(&mut s, "to friend.eth").await.is_err());
        assert!(run(&mut s, "account").await.is_ok());
    }

    #[tokio::test]
    async fn json_output_is_valid() {
        let (mut s, _) = session().await;
        for line in ["account", "networks", "tokens", "network 1", "amount 5", "status"] {
            let out = Command::parse(line)
                .unwrap()
                .execute(&mut s, true)
                .await
                .unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert!(!parsed.is_null(), "{line} produced null");
        }
    }

    #[tokio::test]
    async fn expert_mode_unlocks_recipient_clear() {
        let (mut s, _) = session().await;
        run(&mut s, "expert on").await.unwrap();
        let out = run(&mut s, "to clear").await.unwrap();
        assert!(out.contains("own account"));
    }

    #[tokio::test]
    async fn currency_commands() {
        let (mut s, _) = session().await;
        let out = run(&mut s, "from BNB").await.unwrap();
        assert!(out.starts_with("BNB"));
        let out = run(&mut s, "into WBNB").await.unwrap();
        assert!(out.contains("BNB -> WBNB"));
        let out = run(&mut s, "input 2").await.unwrap();
        assert!(out.contains("You receive 2."));
        let out = run(&mut s, "switch").await.unwrap();
        assert!(out.contains("WBNB -> BNB"));
    }
}
