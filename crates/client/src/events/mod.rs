//! Log decoding, historical queries and live event streams.

use core::fmt;
use core::marker::PhantomData;

use alloy_primitives::{Address, TxHash, B256};
use alloy_provider::Provider;
use alloy_pubsub::Subscription;
use alloy_rpc_types::{Filter, Log};
use alloy_sol_types::{SolEvent, SolEventInterface};
use alloy_transport::Transport;
use futures::{Stream, StreamExt};
use receiv3_bindings::{InvoiceNFT, InvoicePool};
use receiv3_logging::{debug, warn};
use serde::Serialize;

use crate::config::EventSettings;
use crate::error::Result;
use crate::revert::ContractKind;

mod listener;
mod store;

pub use listener::{EventListener, LogSource, ProviderSource};
pub use store::CursorStore;

pub type InvoiceNftEvent = InvoiceNFT::InvoiceNFTEvents;
pub type InvoicePoolEvent = InvoicePool::InvoicePoolEvents;

/// The event enum of one of the contracts.
pub trait ContractEvent:
    SolEventInterface + Serialize + fmt::Debug + Send + Sync + 'static
{
    const CONTRACT: ContractKind;

    /// `topic0` of every event the contract declares.
    const TOPICS: &'static [B256];

    /// Decodes `log`, returning `Ok(None)` when its `topic0` is not one of
    /// [`Self::TOPICS`].
    fn decode_rpc_log(log: &Log) -> Result<Option<DecodedLog<Self>>> {
        let Some(topic0) = log.topics().first() else {
            return Ok(None);
        };
        if !Self::TOPICS.contains(topic0) {
            return Ok(None);
        }

        let event = Self::decode_raw_log(log.topics(), &log.data().data, true)?;
        Ok(Some(DecodedLog::new(event, log)))
    }
}

impl ContractEvent for InvoiceNftEvent {
    const CONTRACT: ContractKind = ContractKind::InvoiceNft;
    const TOPICS: &'static [B256] = &[
        InvoiceNFT::Approval::SIGNATURE_HASH,
        InvoiceNFT::ApprovalForAll::SIGNATURE_HASH,
        InvoiceNFT::BatchMetadataUpdate::SIGNATURE_HASH,
        InvoiceNFT::InvoiceBurned::SIGNATURE_HASH,
        InvoiceNFT::InvoiceMinted::SIGNATURE_HASH,
        InvoiceNFT::InvoiceStatusChanged::SIGNATURE_HASH,
        InvoiceNFT::MetadataUpdate::SIGNATURE_HASH,
        InvoiceNFT::Paused::SIGNATURE_HASH,
        InvoiceNFT::RoleAdminChanged::SIGNATURE_HASH,
        InvoiceNFT::RoleGranted::SIGNATURE_HASH,
        InvoiceNFT::RoleRevoked::SIGNATURE_HASH,
        InvoiceNFT::ShipmentVerified::SIGNATURE_HASH,
        InvoiceNFT::Transfer::SIGNATURE_HASH,
        InvoiceNFT::Unpaused::SIGNATURE_HASH,
    ];
}

impl ContractEvent for InvoicePoolEvent {
    const CONTRACT: ContractKind = ContractKind::InvoicePool;
    const TOPICS: &'static [B256] = &[
        InvoicePool::DisbursementRecorded::SIGNATURE_HASH,
        InvoicePool::ExcessRepaymentRecorded::SIGNATURE_HASH,
        InvoicePool::InvestmentRecorded::SIGNATURE_HASH,
        InvoicePool::InvestorReturnRecorded::SIGNATURE_HASH,
        InvoicePool::Paused::SIGNATURE_HASH,
        InvoicePool::PoolClosed::SIGNATURE_HASH,
        InvoicePool::PoolCreated::SIGNATURE_HASH,
        InvoicePool::PoolDefaulted::SIGNATURE_HASH,
        InvoicePool::PoolFilled::SIGNATURE_HASH,
        InvoicePool::RepaymentRecorded::SIGNATURE_HASH,
        InvoicePool::RoleAdminChanged::SIGNATURE_HASH,
        InvoicePool::RoleGranted::SIGNATURE_HASH,
        InvoicePool::RoleRevoked::SIGNATURE_HASH,
        InvoicePool::Unpaused::SIGNATURE_HASH,
    ];
}

/// A decoded event together with where it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedLog<E> {
    pub event: E,
    pub address: Address,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<TxHash>,
    pub log_index: Option<u64>,
}

impl<E> DecodedLog<E> {
    pub fn new(event: E, log: &Log) -> Self {
        Self {
            event,
            address: log.address(),
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
        }
    }

    /// Decodes a single event type, the way a typed filter query does.
    pub fn decode_typed(log: &Log) -> Result<Self>
    where
        E: SolEvent,
    {
        let decoded = log.log_decode::<E>()?;
        Ok(Self::new(decoded.inner.data, log))
    }
}

/// A block range for historical log queries.
///
/// `to_block: None` means the latest block at query time. Ranges are
/// fetched in windows of at most `step` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    pub from_block: u64,
    pub to_block: Option<u64>,
    pub step: u64,
}

impl EventQuery {
    #[must_use]
    pub fn new(from_block: u64, to_block: Option<u64>) -> Self {
        Self {
            from_block,
            to_block,
            step: crate::config::DEFAULT_LOG_BLOCK_STEP,
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step.max(1);
        self
    }

    /// Splits `from_block..=to` into request windows.
    #[must_use]
    pub fn chunks(&self, to: u64) -> BlockChunks {
        BlockChunks {
            next: self.from_block,
            end: to,
            step: self.step.max(1),
            done: self.from_block > to,
        }
    }
}

/// Inclusive, non-overlapping `(from, to)` windows covering a block range.
#[derive(Debug, Clone)]
pub struct BlockChunks {
    next: u64,
    end: u64,
    step: u64,
    done: bool,
}

impl Iterator for BlockChunks {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let from = self.next;
        let to = from.saturating_add(self.step - 1).min(self.end);
        if to == self.end {
            self.done = true;
        } else {
            self.next = to + 1;
        }
        Some((from, to))
    }
}

/// Historical queries and live streams for the events of one contract.
pub struct LogSubscriber<T, P, E> {
    provider: P,
    address: Address,
    settings: EventSettings,
    _phantom: PhantomData<fn() -> (T, E)>,
}

impl<T, P: Clone, E> Clone for LogSubscriber<T, P, E> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            address: self.address,
            settings: self.settings,
            _phantom: PhantomData,
        }
    }
}

impl<T, P, E> LogSubscriber<T, P, E>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
    E: ContractEvent,
{
    pub fn new(provider: P, address: Address, settings: EventSettings) -> Self {
        Self {
            provider,
            address,
            settings,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// An [`EventQuery`] using the configured block step.
    #[must_use]
    pub fn range(&self, from_block: u64, to_block: Option<u64>) -> EventQuery {
        EventQuery::new(from_block, to_block).with_step(self.settings.block_step)
    }

    fn filter(&self) -> Filter {
        Filter::new()
            .address(self.address)
            .event_signature(E::TOPICS.to_vec())
    }

    /// Fetches and decodes every event of the contract in `query`.
    pub async fn query(&self, query: EventQuery) -> Result<Vec<DecodedLog<E>>> {
        let logs = self.fetch(self.filter(), query).await?;
        let mut events = Vec::with_capacity(logs.len());
        for log in logs {
            match E::decode_rpc_log(&log)? {
                Some(event) => events.push(event),
                None => debug!(
                    "Skipping log with unknown topic in tx {:?}",
                    log.transaction_hash
                ),
            }
        }
        Ok(events)
    }

    /// Fetches and decodes a single event type in `query`.
    pub async fn query_event<Ev: SolEvent>(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<Ev>>> {
        let filter = Filter::new()
            .address(self.address)
            .event_signature(Ev::SIGNATURE_HASH);
        self.fetch(filter, query)
            .await?
            .iter()
            .map(DecodedLog::decode_typed)
            .collect()
    }

    async fn fetch(&self, filter: Filter, query: EventQuery) -> Result<Vec<Log>> {
        let to = match query.to_block {
            Some(to) => to,
            None => self.provider.get_block_number().await?,
        };

        let mut logs = Vec::new();
        for (from, to) in query.chunks(to) {
            debug!(
                "Querying {} logs of {} in blocks {from}..={to}",
                E::CONTRACT,
                self.address
            );
            let window = filter.clone().from_block(from).to_block(to);
            logs.extend(
                self.provider
                    .get_logs(&window)
                    .await?
                    .into_iter()
                    .filter(|log| !log.removed),
            );
        }
        Ok(logs)
    }

    /// Polls for new events starting at `from_block`, or at the chain head
    /// when `None`.
    pub fn watch(&self, from_block: Option<u64>) -> EventListener<ProviderSource<T, P>, E> {
        EventListener::new(
            ProviderSource::new(self.provider.clone()),
            self.address,
            from_block,
            self.settings,
        )
    }

    /// Opens an `eth_subscribe("logs")` subscription. Requires a
    /// websocket provider.
    pub async fn subscribe(&self) -> Result<Subscription<Log>> {
        Ok(self.provider.subscribe_logs(&self.filter()).await?)
    }

    /// Like [`Self::subscribe`], decoding each log.
    pub async fn subscribe_events(&self) -> Result<impl Stream<Item = Result<DecodedLog<E>>>> {
        let subscription = self.subscribe().await?;
        Ok(subscription.into_stream().filter_map(|log| async move {
            match E::decode_rpc_log(&log) {
                Ok(Some(event)) => Some(Ok(event)),
                Ok(None) => None,
                Err(err) => {
                    warn!("Failed to decode {} log: {err}", E::CONTRACT);
                    Some(Err(err))
                }
            }
        }))
    }
}
