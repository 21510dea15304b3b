mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use evm_bridge_core::commands::Command;
use evm_bridge_core::evm;
use evm_bridge_core::{BridgeConfig, BridgeSession, Collaborators, NoQuotes, SlippageTolerance};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zeroize::{Zeroize, Zeroizing};

#[derive(Parser)]
#[command(name = "evm-bridge", about = "Burn-bridge tokens between EVM networks", version)]
pub(crate) struct Cli {
    /// JSON-RPC endpoint of the chain the tokens are burned on
    #[arg(long, env = "BRIDGE_RPC_URL")]
    rpc_url: Option<String>,

    /// Read the private key from stdin (for scripting)
    #[arg(long)]
    private_key_stdin: bool,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Gas limit for the burn transaction
    #[arg(long)]
    gas_limit: Option<u64>,

    /// Enable expert mode (custom recipients)
    #[arg(long)]
    expert: bool,

    /// Slippage tolerance in basis points
    #[arg(long)]
    slippage_bips: Option<u16>,

    /// Network and token registry file (JSON)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Config file (default: <data_dir>/evm-bridge/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Allow connecting to non-HTTPS RPC URLs
    #[arg(long)]
    insecure: bool,
}

impl Cli {
    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => BridgeConfig::default_path(),
        }
    }

    /// The config file with command-line overrides applied.
    fn load_config(&self) -> Result<BridgeConfig> {
        let path = self.config_path()?;
        let mut config = BridgeConfig::load(&path)?;
        if let Some(url) = &self.rpc_url {
            config.rpc_url = Some(url.clone());
        }
        if let Some(gas_limit) = self.gas_limit {
            anyhow::ensure!(gas_limit > 0, "--gas-limit must be greater than 0");
            config.gas_limit = gas_limit;
        }
        if self.expert {
            config.settings.expert_mode = true;
        }
        if let Some(bips) = self.slippage_bips {
            config.settings.slippage = SlippageTolerance::from_bips(bips)?;
        }
        if let Some(registry) = &self.registry {
            config.registry = Some(registry.clone());
        }
        debug!(path = %path.display(), gas_limit = config.gas_limit, "configuration loaded");
        Ok(config)
    }
}

fn read_key_stdin() -> Result<Zeroizing<String>> {
    let mut key = String::new();
    std::io::stdin()
        .read_line(&mut key)
        .context("Failed to read private key from stdin")?;
    let trimmed = key.trim().to_string();
    key.zeroize();
    Ok(Zeroizing::new(trimmed))
}

/// Private key from stdin, `BRIDGE_PRIVATE_KEY`, or an interactive prompt.
fn read_private_key(cli: &Cli) -> Result<Zeroizing<String>> {
    if cli.private_key_stdin {
        return read_key_stdin();
    }
    if let Ok(key) = std::env::var("BRIDGE_PRIVATE_KEY") {
        return Ok(Zeroizing::new(key));
    }
    Ok(Zeroizing::new(
        rpassword::prompt_password("Private key: ").context("Failed to read private key")?,
    ))
}

/// Connect the signing client and build a session around it.
async fn open_session(cli: &Cli) -> Result<BridgeSession> {
    let config = cli.load_config()?;
    let rpc_url = config
        .rpc_url
        .clone()
        .context("No RPC URL configured. Use --rpc-url or set BRIDGE_RPC_URL.")?;
    let key = read_private_key(cli)?;
    let client = Arc::new(evm::connect(&rpc_url, &key, cli.insecure)?);
    drop(key);

    let collaborators = Collaborators {
        wallet: client.clone(),
        approver: client.clone(),
        names: client,
        quoter: Arc::new(NoQuotes),
    };
    let mut session = BridgeSession::from_config(&config, collaborators)?;
    session.connect().await?;
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,evm_bridge_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(cmd_str) = &cli.cmd {
        // One-shot mode
        run_oneshot(&cli, cmd_str).await
    } else {
        // REPL mode
        repl::run_repl(&cli).await
    }
}

async fn run_oneshot(cli: &Cli, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }
    if let Command::Help { command } = &command {
        println!("{}", evm_bridge_core::commands::help_text(command.as_deref()));
        return Ok(());
    }

    let mut session = open_session(cli).await?;
    let output = command.execute(&mut session, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
