#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("account") | Some("acc") => {
            "account\n  Show the connected account and the chain the wallet is on.\n  Alias: acc".to_string()
        }
        Some("networks") | Some("nets") => {
            "networks\n  List destination networks.\n  The chain your wallet is connected to is never offered.\n  Alias: nets".to_string()
        }
        Some("network") | Some("net") => {
            "network <chain_id|name>\n  Select the destination network.\n  Examples: network 137\n           network polygon\n  Alias: net".to_string()
        }
        Some("tokens") => "tokens\n  List bridge tokens and the chain each lives on.".to_string(),
        Some("token") => {
            "token <name>\n  Select the token to bridge. It becomes the output currency.\n  Example: token FinalX".to_string()
        }
        Some("to") | Some("recipient") => {
            "to <address|name.eth|clear>\n  Send the bridged tokens to another account.\n  Names are resolved through ENS. Requires expert mode.\n  'to clear' sends to your own account again.\n  Alias: recipient".to_string()
        }
        Some("amount") | Some("amt") => {
            "amount <value>\n  Amount to bridge, in whole token units.\n  Example: amount 100\n  Alias: amt".to_string()
        }
        Some("input") => {
            "input <value>\n  Amount to spend from the input currency.\n  The output amount is derived from it.".to_string()
        }
        Some("from") => {
            "from <symbol>\n  Currency to spend, on the wallet's chain.\n  Example: from ETH".to_string()
        }
        Some("into") => {
            "into <symbol>\n  Currency to receive, on the wallet's chain.\n  Native to wrapped (ETH -> WETH) is a 1:1 wrap.\n  Example: into WETH".to_string()
        }
        Some("switch") | Some("flip") => {
            "switch\n  Swap the input and output currencies.\n  Alias: flip".to_string()
        }
        Some("expert") => {
            "expert on|off\n  Toggle expert mode. Custom recipients need it.\n  Turning it off clears the recipient.".to_string()
        }
        Some("slippage") => {
            "slippage <bips>\n  Set the slippage tolerance in basis points.\n  Example: slippage 50 (0.50%). Maximum 5000.".to_string()
        }
        Some("status") | Some("st") => {
            "status\n  Show network, recipient, amounts and approval state.\n  Alias: st".to_string()
        }
        Some("approve") => {
            "approve\n  Allow the bridge contract to spend the token.\n  Only sent when the current allowance is too low.".to_string()
        }
        Some("bridge") | Some("burn") => {
            "bridge\n  Burn the amount on this chain for release on the destination network.\n  Asks for confirmation first.\n  Alias: burn".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit the bridge.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 account          Show connected account\n\
             \x20 networks         List destination networks\n\
             \x20 network          Select the destination network\n\
             \x20 tokens           List bridge tokens\n\
             \x20 token            Select the token to bridge\n\
             \x20 to               Set or clear the recipient\n\
             \x20 amount           Amount to bridge\n\
             \x20 input            Amount to spend\n\
             \x20 from             Currency to spend\n\
             \x20 into             Currency to receive\n\
             \x20 switch           Swap input and output\n\
             \x20 expert           Toggle expert mode\n\
             \x20 slippage         Set slippage tolerance\n\
             \x20 status           Show the current bridge state\n\
             \x20 approve          Approve the bridge contract\n\
             \x20 bridge           Submit the bridge transaction\n\
             \x20 help [cmd]       Show help for a command\n\
             \x20 exit             Exit\n\
             \n\
             Type 'help <command>' for detailed help on a specific command."
                .to_string()
        }
    }
}
