//! Client for the `InvoiceNFT` contract.

use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_transport::Transport;
use receiv3_bindings::InvoiceNFT;

use crate::config::{EventSettings, TxSettings};
use crate::revert::ContractKind;

pub mod reader;
pub mod subscriber;
pub mod writer;

pub use reader::InvoiceReader;
pub use subscriber::InvoiceSubscriber;
pub use writer::InvoiceWriter;

const CONTRACT: ContractKind = ContractKind::InvoiceNft;

/// Reads, transacts with and watches a deployed `InvoiceNFT`.
///
/// Reads go through [`InvoiceReader`], transactions through
/// [`InvoiceWriter`]. Writers need a provider with a wallet filler.
#[derive(Clone)]
pub struct InvoiceNftClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    instance: InvoiceNFT::InvoiceNFTInstance<T, P>,
    tx: TxSettings,
    events: EventSettings,
}

impl<T, P> InvoiceNftClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            instance: InvoiceNFT::new(address, provider),
            tx: TxSettings::default(),
            events: EventSettings::default(),
        }
    }

    #[must_use]
    pub fn with_tx_settings(mut self, tx: TxSettings) -> Self {
        self.tx = tx;
        self
    }

    #[must_use]
    pub fn with_event_settings(mut self, events: EventSettings) -> Self {
        self.events = events;
        self
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    /// The raw contract binding, for calls this client does not wrap.
    pub fn instance(&self) -> &InvoiceNFT::InvoiceNFTInstance<T, P> {
        &self.instance
    }

    pub fn subscriber(&self) -> InvoiceSubscriber<T, P> {
        InvoiceSubscriber::new(self.instance.provider().clone(), self.address(), self.events)
    }
}
