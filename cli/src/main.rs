//! `poll`: command-line front end for the poll contract.

use anyhow::Context;
use clap::Parser;
use poll_client::{ClientConfig, PollClient, RefreshOutcome};
use poll_rpc::{LedgerRpc, SorobanRpcClient};
use poll_types::{AccountAddress, ContractId, ResultsSnapshot, TxHash, VoteOption};
use poll_utils::{init_logging, LogFormat};
use poll_wallet::WalletProviders;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poll", about = "Read and watch an on-chain two-option poll")]
struct Cli {
    /// JSON-RPC endpoint of the ledger RPC service.
    #[arg(long, env = "POLL_RPC_URL")]
    rpc_url: Option<String>,

    /// Network passphrase transactions are built for.
    #[arg(long, env = "POLL_NETWORK_PASSPHRASE")]
    network_passphrase: Option<String>,

    /// Poll contract identifier.
    #[arg(long, env = "POLL_CONTRACT_ID")]
    contract_id: Option<ContractId>,

    /// Funded account used as the source of read-only calls.
    #[arg(long, env = "POLL_FALLBACK_ACCOUNT")]
    fallback_account: Option<AccountAddress>,

    /// Block explorer base URL.
    #[arg(long, env = "POLL_EXPLORER_URL")]
    explorer_url: Option<String>,

    /// Results polling period in milliseconds.
    #[arg(long, env = "POLL_REFRESH_INTERVAL_MS")]
    refresh_interval_ms: Option<u64>,

    /// Upper bound on a single RPC request, in seconds.
    #[arg(long, env = "POLL_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "POLL_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "POLL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "POLL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Read the current results once.
    Results,
    /// Poll results until interrupted, printing every new snapshot.
    Watch,
    /// Query the status of a submitted transaction.
    #[command(name = "tx-status")]
    TxStatus {
        /// Transaction hash, 64 hex characters.
        hash: TxHash,
    },
    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    /// File config (or defaults), overridden by flags and env vars.
    fn resolve_config(&self) -> anyhow::Result<ClientConfig> {
        let base = match &self.config {
            Some(path) => ClientConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ClientConfig::default(),
        };

        let config = ClientConfig {
            rpc_url: self.rpc_url.clone().unwrap_or(base.rpc_url),
            network_passphrase: self
                .network_passphrase
                .clone()
                .unwrap_or(base.network_passphrase),
            contract_id: self.contract_id.clone().unwrap_or(base.contract_id),
            fallback_account: self
                .fallback_account
                .clone()
                .unwrap_or(base.fallback_account),
            explorer_url: self.explorer_url.clone().unwrap_or(base.explorer_url),
            refresh_interval_ms: self.refresh_interval_ms.unwrap_or(base.refresh_interval_ms),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(base.request_timeout_secs),
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            ..base
        };
        config.validate()?;
        Ok(config)
    }
}

fn print_snapshot(snapshot: &ResultsSnapshot) {
    let (share_a, share_b) = snapshot.shares();
    println!("Option A: {:>6} votes ({share_a}%)", snapshot.a);
    println!("Option B: {:>6} votes ({share_b}%)", snapshot.b);
    let leader = match snapshot.leading() {
        Some(VoteOption::A) => "Option A",
        Some(VoteOption::B) => "Option B",
        None => "tied",
    };
    println!("Total:    {:>6} votes, {leader}", snapshot.total());
    println!("Ledger:   {}", snapshot.ledger);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }

        Command::Results => {
            let client = PollClient::connect_rpc(config, WalletProviders::new())?;
            match client.refresh().await {
                RefreshOutcome::Updated(snapshot) => print_snapshot(&snapshot),
                outcome => anyhow::bail!("could not read results ({outcome:?}); see logs"),
            }
        }

        Command::Watch => {
            let client = PollClient::connect_rpc(config, WalletProviders::new())?;
            tracing::info!(
                rpc = %client.config().rpc_url,
                contract = %client.config().contract_id,
                "watching poll results"
            );
            println!("Contract: {}", client.explorer_contract_url());

            let mut updates = client.subscribe();
            let polling = client.start_polling();

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("received SIGINT, shutting down");
                        break;
                    }
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let latest = *updates.borrow_and_update();
                        if let Some(snapshot) = latest {
                            println!();
                            print_snapshot(&snapshot);
                        }
                    }
                }
            }

            polling.stop().await;
        }

        Command::TxStatus { hash } => {
            let rpc = SorobanRpcClient::new(config.rpc_url.clone(), config.request_timeout())?;
            let status = rpc
                .transaction_status(&hash)
                .await
                .with_context(|| format!("failed to query transaction {hash}"))?;
            println!("Status: {:?}", status.status);
            if let Some(ledger) = status.ledger {
                println!("Ledger: {ledger}");
            }
            println!("Explorer: {}", config.explorer_tx_url(&hash));
        }
    }

    Ok(())
}
