//! Client configuration.
//!
//! [`ClientArgs`] is the command-line and environment surface; it is
//! validated into a [`ClientConfig`], which is what the clients consume.

use core::time::Duration;

use alloy_primitives::Address;
use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Chain id of the Lisk Sepolia testnet the contracts are deployed on.
pub const DEFAULT_CHAIN_ID: u64 = 4202;
pub const DEFAULT_GAS_LIMIT: u64 = 500_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_LOG_BLOCK_STEP: u64 = 100;

/// Connection and contract settings, read from flags or the environment.
#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// HTTP or websocket RPC endpoint.
    #[arg(long, env = "BLOCKCHAIN_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: Url,
    /// Websocket endpoint used for `eth_subscribe`.
    #[arg(long, env = "BLOCKCHAIN_WS_URL")]
    pub ws_url: Option<Url>,
    #[arg(long, env = "CHAIN_ID", default_value_t = DEFAULT_CHAIN_ID)]
    pub chain_id: u64,
    /// Required by every command that talks to the contracts.
    #[arg(long = "nft-address", env = "INVOICE_NFT_CONTRACT_ADDRESS")]
    pub invoice_nft_address: Option<Address>,
    #[arg(long = "pool-address", env = "INVOICE_POOL_CONTRACT_ADDRESS")]
    pub invoice_pool_address: Option<Address>,
    /// Fixed gas limit for transactions. `0` lets the node estimate it.
    #[arg(long, env = "GAS_LIMIT", default_value_t = DEFAULT_GAS_LIMIT)]
    pub gas_limit: u64,
    /// Blocks to wait for before a receipt is accepted. Must be at least 1.
    #[arg(long, env = "CONFIRMATIONS", default_value_t = 1)]
    pub confirmations: u64,
    /// Seconds to wait for a receipt. `0` waits forever.
    #[arg(long, env = "TX_TIMEOUT_SECS", default_value_t = 120)]
    pub tx_timeout_secs: u64,
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
    /// Maximum number of blocks per `eth_getLogs` request.
    #[arg(long, env = "LOG_BLOCK_STEP", default_value_t = DEFAULT_LOG_BLOCK_STEP)]
    pub log_block_step: u64,
}

#[derive(Parser)]
struct EnvOnly {
    #[command(flatten)]
    args: ClientArgs,
}

impl ClientArgs {
    /// Reads the arguments from the environment alone.
    pub fn from_env() -> Result<Self> {
        EnvOnly::try_parse_from(["receiv3"])
            .map(|parsed| parsed.args)
            .map_err(|e| Error::Config(e.to_string()))
    }
}

/// How transactions are submitted and awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSettings {
    pub gas_limit: Option<u64>,
    pub confirmations: u64,
    pub timeout: Option<Duration>,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            gas_limit: Some(DEFAULT_GAS_LIMIT),
            confirmations: 1,
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// How logs are fetched by subscribers and listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    pub poll_interval: Duration,
    pub block_step: u64,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            block_step: DEFAULT_LOG_BLOCK_STEP,
        }
    }
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub rpc_url: Url,
    pub ws_url: Option<Url>,
    pub chain_id: u64,
    pub invoice_nft_address: Address,
    pub invoice_pool_address: Address,
    pub tx: TxSettings,
    pub events: EventSettings,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        ClientArgs::from_env()?.try_into()
    }
}

impl TryFrom<ClientArgs> for ClientConfig {
    type Error = Error;

    fn try_from(args: ClientArgs) -> Result<Self> {
        let invoice_nft_address = contract_address(
            args.invoice_nft_address,
            "INVOICE_NFT_CONTRACT_ADDRESS",
        )?;
        let invoice_pool_address = contract_address(
            args.invoice_pool_address,
            "INVOICE_POOL_CONTRACT_ADDRESS",
        )?;
        if args.confirmations == 0 {
            return Err(Error::Config("CONFIRMATIONS must be at least 1".into()));
        }
        if args.log_block_step == 0 {
            return Err(Error::Config("LOG_BLOCK_STEP must be at least 1".into()));
        }
        if args.poll_interval_ms == 0 {
            return Err(Error::Config("POLL_INTERVAL_MS must be at least 1".into()));
        }
        if let Some(ws_url) = &args.ws_url {
            if !matches!(ws_url.scheme(), "ws" | "wss") {
                return Err(Error::Config(format!(
                    "BLOCKCHAIN_WS_URL must use ws:// or wss://, got {ws_url}"
                )));
            }
        }

        Ok(Self {
            rpc_url: args.rpc_url,
            ws_url: args.ws_url,
            chain_id: args.chain_id,
            invoice_nft_address,
            invoice_pool_address,
            tx: TxSettings {
                gas_limit: (args.gas_limit != 0).then_some(args.gas_limit),
                confirmations: args.confirmations,
                timeout: (args.tx_timeout_secs != 0)
                    .then(|| Duration::from_secs(args.tx_timeout_secs)),
            },
            events: EventSettings {
                poll_interval: Duration::from_millis(args.poll_interval_ms),
                block_step: args.log_block_step,
            },
        })
    }
}

fn contract_address(address: Option<Address>, var: &str) -> Result<Address> {
    match address {
        None => Err(Error::Config(format!("{var} is not set"))),
        Some(address) if address.is_zero() => {
            Err(Error::Config(format!("{var} must not be the zero address")))
        }
        Some(address) => Ok(address),
    }
}
