//! Typed client for the Receiv3 invoice-financing contracts.
//!
//! [`InvoiceNftClient`] wraps the `InvoiceNFT` contract (tokenized
//! invoices) and [`InvoicePoolClient`] the `InvoicePool` contract (funding
//! pools). Each exposes a reader trait for calls, a writer trait for
//! transactions, and a subscriber for logs.
//!
//! ```no_run
//! use receiv3_client::{ClientConfig, InvoiceReader, Receiv3Client};
//!
//! # async fn run() -> receiv3_client::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let provider = receiv3_client::provider::connect(&config).await?;
//! let client = Receiv3Client::new(provider, &config);
//! let minted = client.invoice.total_minted().await?;
//! println!("{minted} invoices minted");
//! # Ok(())
//! # }
//! ```

use alloy_provider::Provider;
use alloy_transport::Transport;

pub mod config;
pub mod error;
pub mod events;
pub mod invoice;
pub mod metadata;
pub mod pool;
pub mod provider;
pub mod revert;
mod tx;
pub mod types;

pub use config::{ClientArgs, ClientConfig, EventSettings, TxSettings};
pub use error::{Error, ErrorKind, Result};
pub use invoice::{InvoiceNftClient, InvoiceReader, InvoiceSubscriber, InvoiceWriter};
pub use pool::{InvoicePoolClient, PoolReader, PoolSubscriber, PoolWriter};
pub use receiv3_bindings as bindings;
pub use revert::{ContractKind, ContractRevert, RevertReason};

/// Both contract clients sharing one provider.
#[derive(Clone)]
pub struct Receiv3Client<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    pub invoice: InvoiceNftClient<T, P>,
    pub pool: InvoicePoolClient<T, P>,
}

impl<T, P> Receiv3Client<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    pub fn new(provider: P, config: &ClientConfig) -> Self {
        Self {
            invoice: InvoiceNftClient::new(config.invoice_nft_address, provider.clone())
                .with_tx_settings(config.tx)
                .with_event_settings(config.events),
            pool: InvoicePoolClient::new(config.invoice_pool_address, provider)
                .with_tx_settings(config.tx)
                .with_event_settings(config.events),
        }
    }
}
