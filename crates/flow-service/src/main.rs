use anyhow::{Context, Result};
use clap::Parser;
use flow_account::{new_account_key, random_private_key};
use flow_client::HttpAccessClient;
use flow_config::{read_file, ConfigLoader, FlowConfig};
use flow_delivery::{transaction_id, SealWaiter, Session, StdoutProgress};
use flow_types::{AccessClient, Identifier};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod print;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Initialize tracing
	setup_tracing(&cli.log_level)?;

	match &cli.command {
		Command::Account => show_account(&cli).await,
		Command::Block => show_block(&cli).await,
		Command::Wait {
			tx_id,
			timeout,
			fail_on_expired,
		} => wait(&cli, tx_id, *timeout, *fail_on_expired).await,
		Command::Send {
			script,
			args,
			gas_limit,
		} => send(&cli, script, args, *gas_limit).await,
		Command::Keygen { weight } => keygen(*weight),
		Command::Validate => validate_config(&cli).await.map(|_| ()),
	}
}

async fn load_config(cli: &Cli) -> Result<FlowConfig> {
	info!("Loading configuration from: {:?}", cli.config);
	ConfigLoader::new()
		.with_file(&cli.config)
		.with_account(&cli.account)
		.load()
		.await
		.context("Failed to load configuration")
}

async fn connect(cli: &Cli) -> Result<Session> {
	let config = load_config(cli).await?;
	Session::from_config(&config, &cli.account, cli.network)
		.await
		.with_context(|| format!("Failed to resolve account {} on {}", cli.account, cli.network))
}

async fn show_account(cli: &Cli) -> Result<()> {
	let session = connect(cli).await?;
	print::print_account(&mut std::io::stdout(), session.account())?;
	Ok(())
}

async fn show_block(cli: &Cli) -> Result<()> {
	let client = HttpAccessClient::for_network(cli.network)?;
	let block = client
		.get_latest_block(true)
		.await
		.context("Failed to fetch latest sealed block")?;

	print::print_block(&mut std::io::stdout(), &block)?;
	Ok(())
}

async fn wait(cli: &Cli, tx_id: &str, timeout: Option<u64>, fail_on_expired: bool) -> Result<()> {
	let id = Identifier::from_hex(tx_id).context("Invalid transaction id")?;
	let client = HttpAccessClient::for_network(cli.network)?;

	let mut waiter = SealWaiter::new(Arc::new(client))
		.with_fail_on_expired(fail_on_expired)
		.with_progress(Arc::new(StdoutProgress));
	if let Some(secs) = timeout {
		waiter = waiter.with_timeout(Duration::from_secs(secs));
	}

	let cancel = cancel_on_shutdown();
	let result = waiter
		.wait(&id, &cancel)
		.await
		.with_context(|| format!("Failed waiting for transaction {}", id))?;

	print::print_transaction_result(&mut std::io::stdout(), &result)?;
	Ok(())
}

async fn send(
	cli: &Cli,
	script_path: &std::path::Path,
	args: &[String],
	gas_limit: u64,
) -> Result<()> {
	let script = read_file(script_path)
		.await
		.with_context(|| format!("Failed to read script {:?}", script_path))?;

	let mut arguments = Vec::with_capacity(args.len());
	for arg in args {
		serde_json::from_str::<serde_json::Value>(arg)
			.with_context(|| format!("Argument is not valid JSON: {}", arg))?;
		arguments.push(arg.as_bytes().to_vec());
	}

	let session = connect(cli).await?;
	let tx = session
		.prepare(&script, arguments, gas_limit)
		.await
		.context("Failed to build transaction")?;
	print::print_transaction(&mut std::io::stdout(), &transaction_id(&tx), &tx)?;

	let id = session.send(&tx).await.context("Failed to send transaction")?;

	let cancel = cancel_on_shutdown();
	let result = session
		.wait_for_seal(&id, &cancel)
		.await
		.with_context(|| format!("Failed waiting for transaction {}", id))?;

	print::print_transaction_result(&mut std::io::stdout(), &result)?;
	if result.is_failed() {
		anyhow::bail!("Transaction {} failed", id);
	}
	Ok(())
}

fn keygen(weight: u32) -> Result<()> {
	let private_key = random_private_key();
	let key = new_account_key(&private_key, weight);

	println!("Private key: {}", private_key.to_hex());
	print::print_account_key(&mut std::io::stdout(), &key)?;
	Ok(())
}

async fn validate_config(cli: &Cli) -> Result<FlowConfig> {
	info!("Validating configuration file: {:?}", cli.config);

	let config = load_config(cli).await?;

	info!("Configuration is valid");
	for (name, account) in &config.accounts {
		info!("  Account: {} ({})", name, account.address);
	}
	for (name, contract) in &config.contracts {
		info!("  Contract: {} ({})", name, contract.source());
	}
	if config.account(&cli.account).is_none() {
		warn!("Selected account {} is not defined", cli.account);
	}

	Ok(config)
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

/// Token cancelled on Ctrl+C or SIGTERM.
fn cancel_on_shutdown() -> CancellationToken {
	let cancel = CancellationToken::new();
	let trigger = cancel.clone();

	tokio::spawn(async move {
		shutdown_signal().await;
		info!("Shutdown signal received, stopping");
		trigger.cancel();
	});

	cancel
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			warn!("Failed to install Ctrl+C handler: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!("Failed to install signal handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
