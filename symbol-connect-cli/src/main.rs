//! Symbol Connect CLI
//!
//! Developer tools for the Symbol wallet provider discovery protocol.

mod wallet;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use symbol_connect_bus::InMemorySignalBus;
use symbol_connect_core::traits::{EventListener, SignalBus};
use symbol_connect_core::types::{same_provider, InfoField, ProviderDetail, ProviderHandle};
use symbol_connect_core::validation::check_field;
use symbol_connect_core::ConnectError;
use symbol_connect_discovery::{announce_provider, ProviderAnnouncer};
use symbol_connect_extension::SymbolExtension;

use crate::wallet::DemoWallet;

/// Symbol Connect - wallet provider discovery for Symbol dapps
#[derive(Parser)]
#[command(name = "symbol-connect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a wallet identity record
    Validate {
        /// JSON file holding an info object or a `{ "info": {..} }` detail
        file: PathBuf,
    },

    /// Run discovery between demo wallets and a dapp on an in-process bus
    Simulate {
        /// Number of demo wallets
        #[arg(short, long, default_value = "1", env = "SYMBOL_CONNECT_WALLETS")]
        wallets: usize,
        /// Which side starts first
        #[arg(short, long, value_enum, default_value_t = StartOrder::DappFirst)]
        order: StartOrder,
        /// Give up if no wallet answers within this many milliseconds
        #[arg(short, long, default_value = "1000", env = "SYMBOL_CONNECT_TIMEOUT_MS")]
        timeout_ms: u64,
    },
}

/// Which side of the rendezvous comes up first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StartOrder {
    /// The dapp requests before any wallet is ready
    DappFirst,
    /// Wallets announce before the dapp requests
    WalletFirst,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "symbol_connect=debug,info"
    } else {
        "symbol_connect=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Simulate {
            wallets,
            order,
            timeout_ms,
        } => cmd_simulate(wallets, order, Duration::from_millis(timeout_ms)).await,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALIDATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Reads an identity record, accepting either a bare info object or a detail
/// wrapping one under `info`.
fn load_identity(path: &Path) -> Result<Value> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let value: Value = serde_json::from_reader(file).context("File is not valid JSON")?;

    Ok(match value {
        Value::Object(mut map) if map.contains_key("info") => map.remove("info").unwrap_or_default(),
        other => other,
    })
}

/// Verdict for each identity field, in declaration order.
fn field_verdicts(info: &Value) -> Vec<(InfoField, Result<(), ConnectError>)> {
    InfoField::ALL
        .iter()
        .map(|&field| {
            let verdict = match info.get(field.as_str()) {
                Some(Value::String(value)) => check_field(field, value),
                _ => Err(ConnectError::InvalidProviderInfo {
                    field,
                    reason: "must be a string".into(),
                }),
            };
            (field, verdict)
        })
        .collect()
}

fn cmd_validate(path: &Path) -> Result<()> {
    println!("{} {}", "🔍 Validating:".cyan().bold(), path.display());

    let info = load_identity(path)?;
    if !info.is_object() {
        bail!("Identity record must be a JSON object");
    }

    let verdicts = field_verdicts(&info);
    for (field, verdict) in &verdicts {
        match verdict {
            Ok(()) => println!("   {} {}", "✓".green(), field),
            Err(err) => println!("   {} {} {}", "✗".red(), field, err.to_string().dimmed()),
        }
    }

    let failures = verdicts.iter().filter(|(_, verdict)| verdict.is_err()).count();
    if failures > 0 {
        bail!("Identity record is invalid ({failures} field(s) rejected)");
    }

    println!("\n{}", "✅ Identity record is valid".green().bold());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIMULATE
// ═══════════════════════════════════════════════════════════════════════════════

/// A running demo wallet and its announcer.
type StartedWallet = (Arc<DemoWallet>, ProviderAnnouncer);

fn start_wallets(bus: &Arc<dyn SignalBus>, count: usize) -> Result<Vec<StartedWallet>> {
    (1..=count)
        .map(|index| {
            let wallet = Arc::new(DemoWallet::new());
            let detail = ProviderDetail::new(DemoWallet::info(index), wallet.clone());
            let announcer = announce_provider(bus, detail)
                .with_context(|| format!("Demo wallet {index} failed to announce"))?;
            println!(
                "   {} {} ({})",
                "↑".cyan(),
                announcer.detail().info().name,
                announcer.detail().info().rdns.dimmed()
            );
            Ok((wallet, announcer))
        })
        .collect()
}

async fn cmd_simulate(wallets: usize, order: StartOrder, timeout: Duration) -> Result<()> {
    println!(
        "{} {} wallet(s), {:?}",
        "🔌 Simulating discovery with".cyan().bold(),
        wallets,
        order
    );

    let bus: Arc<dyn SignalBus> = Arc::new(InMemorySignalBus::new());
    let mut extension = SymbolExtension::new(Arc::clone(&bus));

    let (registered, started) = match order {
        StartOrder::WalletFirst => {
            let started = start_wallets(&bus, wallets)?;
            let registered = tokio::time::timeout(timeout, extension.register_provider()).await;
            (registered, started)
        }
        StartOrder::DappFirst => {
            let register = tokio::time::timeout(timeout, extension.register_provider());
            let start = async {
                // Let the dapp attach its listener before any wallet comes up.
                tokio::task::yield_now().await;
                start_wallets(&bus, wallets)
            };
            let (registered, started) = tokio::join!(register, start);
            (registered, started?)
        }
    };

    let provider = match registered {
        Ok(provider) => provider?,
        Err(_) => bail!("No wallet answered within {}ms", timeout.as_millis()),
    };
    println!("\n{}", "✅ Provider bound".green().bold());
    println!("   {} {}", "Connected:".dimmed(), provider.is_connected());

    extension.request_account_permission().await?;

    match extension.get_account_info().await? {
        Some(account) => {
            println!("   {} {}", "Public key:".dimmed(), account.public_key);
            println!("   {} {}", "Network type:".dimmed(), account.network_type);
        }
        None => println!("   {}", "Account not shared".yellow()),
    }

    match extension.get_chain_info().await? {
        Some(chain) => {
            println!("   {} {:?}", "Network:".dimmed(), chain.network_identifier);
            println!("   {} {}", "Generation hash:".dimmed(), chain.generation_hash);
        }
        None => println!("   {}", "Chain not connected".yellow()),
    }

    let permissions = extension.get_permissions().await?;
    println!("   {} {:?}", "Permissions:".dimmed(), permissions);

    let bound_wallet = started.iter().find(|(wallet, _)| {
        let handle: ProviderHandle = wallet.clone();
        same_provider(&handle, &provider)
    });
    if let Some((wallet, _)) = bound_wallet {
        let on_disconnect: EventListener =
            Arc::new(|_: &Value| println!("\n{}", "🔌 Wallet disconnected".yellow()));
        extension.add_disconnect_listener(on_disconnect.clone())?;
        wallet.disconnect();
        extension.remove_disconnect_listener(&on_disconnect)?;

        println!("   {} {}", "Connected:".dimmed(), extension.is_connected());
        if extension.get_chain_info().await?.is_none() {
            println!("   {}", "Chain not connected".yellow());
        }
    }

    for (_, announcer) in started {
        announcer.withdraw();
    }
    Ok(())
}
