use crate::{open_session, Cli};
/// REPL shell: Reedline-based interactive bridge session.
use anyhow::Result;
use evm_bridge_core::commands::Command;
use evm_bridge_core::display::short_address;
use evm_bridge_core::BridgeSession;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

fn prompt_for(session: &BridgeSession) -> DefaultPrompt {
    let account = session
        .account()
        .map(|a| short_address(&a))
        .unwrap_or_else(|| "-".into());
    let target = session
        .selected_network()
        .map(|n| format!(" -> {}", n.display_name))
        .unwrap_or_default();
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("[bridge {account}{target}]")),
        DefaultPromptSegment::Empty,
    )
}

pub async fn run_repl(cli: &Cli) -> Result<()> {
    println!("EVM Bridge v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let mut session = open_session(cli).await?;
    if let Some(account) = session.account() {
        println!("Wallet connected. Account: {account}");
    }
    if let Some(chain) = session.wallet_chain() {
        println!("Burning on chain {chain}.");
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let commands: Vec<String> = [
        "account", "acc", "networks", "nets", "network", "net", "tokens", "token", "to",
        "recipient", "amount", "amt", "input", "from", "into", "switch", "flip", "expert",
        "slippage", "status", "st", "approve", "bridge", "burn", "help", "exit", "quit", "q",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        let prompt = prompt_for(&session);
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        if !confirm(&cmd, &session).await {
                            println!("Cancelled.");
                            continue;
                        }
                        match cmd.execute(&mut session, cli.json).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

/// Ask before commands that send a transaction. An invalid bridge request
/// skips the prompt; `execute` reports the problem.
async fn confirm(cmd: &Command, session: &BridgeSession) -> bool {
    let request = match cmd {
        Command::Bridge => {
            let derived = session.derive().await;
            match session.bridge_request(&derived) {
                Ok(request) => Some(request),
                Err(_) => return true,
            }
        }
        _ => None,
    };
    let resolved = session.recipient();
    match cmd.confirmation_prompt(request.as_ref(), resolved.as_ref()) {
        Some(msg) => prompt_confirm(&msg),
        None => true,
    }
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}
