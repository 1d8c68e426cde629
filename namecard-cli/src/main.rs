//! namecard CLI
//!
//! Resolve wallet addresses to ENS identities from the command line.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use namecard_api::{ApiConfig, ApiServer};
use namecard_core::constants::{DEFAULT_ETH_RPC_URL, DEFAULT_IPFS_GATEWAY_HOST};
use namecard_core::types::{Network, ResolveOptions};
use namecard_ens::EnsConfig;
use namecard_ipfs::IpfsConfig;
use namecard_registry::{ProviderRegistry, RegistryConfig};

/// namecard - wallet address to identity resolution
#[derive(Parser)]
#[command(name = "namecard")]
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
    /// Resolve an address to its domain and text records
    Resolve {
        /// Wallet address (0x-prefixed)
        address: String,
        /// Identity provider
        #[arg(long, default_value = "ens")]
        provider: String,
        /// Text records to fetch, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
        /// Network for Infura endpoints
        #[arg(long, env = "NETWORK")]
        network: Option<Network>,
        /// Infura project id
        #[arg(long, env = "INFURA_ID")]
        infura_id: Option<String>,
        /// Ethereum RPC URL
        #[arg(long, env = "ETH_RPC_URL")]
        rpc_url: Option<String>,
        /// IPFS gateway host
        #[arg(long, env = "IPFS_GATEWAY_HOST")]
        gateway: Option<String>,
        /// Deadline for the whole resolution
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Normalize a raw avatar record value to an HTTP(S) URL
    Avatar {
        /// Avatar record value (https://, ipfs:// or eip155:1/erc721:...)
        value: String,
        /// Ethereum RPC URL
        #[arg(long, env = "ETH_RPC_URL")]
        rpc_url: Option<String>,
        /// IPFS gateway host
        #[arg(long, env = "IPFS_GATEWAY_HOST")]
        gateway: Option<String>,
    },

    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "namecard=debug,info"
    } else {
        "namecard=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Resolve {
            address,
            provider,
            fields,
            network,
            infura_id,
            rpc_url,
            gateway,
            timeout_ms,
        } => {
            let options = ResolveOptions {
                network,
                credential_id: infura_id,
                timeout_ms,
            };
            cmd_resolve(&address, &provider, fields, options, rpc_url, gateway).await
        }
        Commands::Avatar { value, rpc_url, gateway } => cmd_avatar(&value, rpc_url, gateway).await,
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
    }
}

fn registry(rpc_url: Option<String>, gateway: Option<String>) -> ProviderRegistry {
    let config = RegistryConfig {
        ens: EnsConfig::new(rpc_url.unwrap_or_else(|| DEFAULT_ETH_RPC_URL.into())),
        ipfs: IpfsConfig::new(gateway.unwrap_or_else(|| DEFAULT_IPFS_GATEWAY_HOST.into())),
    };
    ProviderRegistry::new(config)
}

/// Resolve an address to an identity
async fn cmd_resolve(
    address: &str,
    provider: &str,
    fields: Option<Vec<String>>,
    options: ResolveOptions,
    rpc_url: Option<String>,
    gateway: Option<String>,
) -> Result<()> {
    println!("{} {}", "🔍 Resolving:".cyan().bold(), address);

    let record = registry(rpc_url, gateway)
        .resolve(address, provider, fields, options)
        .await
        .context("Failed to resolve identity")?;

    match record {
        Some(record) => {
            println!("\n{} {}", "✅ Identity:".green().bold(), record.domain);
            for (key, value) in &record.text_records {
                let value = value.as_deref().unwrap_or("(not set)");
                println!("   {} {}", format!("{}:", key).dimmed(), value);
            }
            println!("\n{}", serde_json::to_string_pretty(&record)?);
        }
        None => println!("\n{}", "⚠️  No identity found for this address.".yellow()),
    }

    Ok(())
}

/// Normalize an avatar value
async fn cmd_avatar(value: &str, rpc_url: Option<String>, gateway: Option<String>) -> Result<()> {
    println!("{} {}", "🖼  Resolving avatar:".cyan().bold(), value);

    let avatar = registry(rpc_url, gateway)
        .resolve_avatar(value, "ens", ResolveOptions::default())
        .await
        .context("Failed to resolve avatar")?;

    match avatar {
        Some(url) => println!("\n{} {}", "✅ Avatar URL:".green().bold(), url),
        None => println!("\n{}", "⚠️  Avatar could not be resolved.".yellow()),
    }

    Ok(())
}

/// Run API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting namecard API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let config = ApiConfig::from_env();
    let server = ApiServer::new(config);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .context("Invalid bind address")?;
    server.run(addr).await?;

    Ok(())
}
