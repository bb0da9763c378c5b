//! Client for the `InvoicePool` contract.

use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_transport::Transport;
use receiv3_bindings::InvoicePool;

use crate::config::{EventSettings, TxSettings};
use crate::revert::ContractKind;

pub mod reader;
pub mod subscriber;
pub mod writer;

pub use reader::PoolReader;
pub use subscriber::PoolSubscriber;
pub use writer::PoolWriter;

const CONTRACT: ContractKind = ContractKind::InvoicePool;

/// Reads, transacts with and watches a deployed `InvoicePool`.
///
/// Reads go through [`PoolReader`], transactions through
/// [`PoolWriter`]. Writers need a provider with a wallet filler.
#[derive(Clone)]
pub struct InvoicePoolClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    instance: InvoicePool::InvoicePoolInstance<T, P>,
    tx: TxSettings,
    events: EventSettings,
}

impl<T, P> InvoicePoolClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            instance: InvoicePool::new(address, provider),
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
    pub fn instance(&self) -> &InvoicePool::InvoicePoolInstance<T, P> {
        &self.instance
    }

    pub fn subscriber(&self) -> PoolSubscriber<T, P> {
        PoolSubscriber::new(self.instance.provider().clone(), self.address(), self.events)
    }
}
