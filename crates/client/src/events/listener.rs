use core::marker::PhantomData;
use core::time::Duration;
use std::collections::VecDeque;
use std::sync::Arc;

use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types::{Filter, Log};
use alloy_transport::{Transport, TransportResult};
use async_trait::async_trait;
use futures::Stream;
use receiv3_logging::{debug, info, warn};
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use super::{ContractEvent, CursorStore, DecodedLog};
use crate::config::EventSettings;
use crate::error::Result;

const MAX_RETRIES: usize = 5;

/// Exponential backoff of 2s, 4s, 8s ... capped at `N` attempts.
fn get_exponential_backoff<const N: usize>() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2).factor(1000).take(N)
}

/// The chain head and log queries an [`EventListener`] polls.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn block_number(&self) -> TransportResult<u64>;

    async fn logs(&self, filter: &Filter) -> TransportResult<Vec<Log>>;
}

/// [`LogSource`] backed by an RPC provider.
pub struct ProviderSource<T, P> {
    provider: P,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, P> ProviderSource<T, P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<T, P> LogSource for ProviderSource<T, P>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    async fn block_number(&self) -> TransportResult<u64> {
        self.provider.get_block_number().await
    }

    async fn logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
        self.provider.get_logs(filter).await
    }
}

/// Where a listener starts given the requested block and the last block
/// recorded in its cursor. A stored cursor always resumes right after the
/// recorded block unless the requested block lies further ahead.
fn resume_from(requested: Option<u64>, last: Option<u64>) -> Option<u64> {
    match last {
        Some(last) => Some(requested.unwrap_or(0).max(last.saturating_add(1))),
        None => requested,
    }
}

/// The inclusive window of at most `step` blocks starting at `from`, or
/// `None` when `from` is past `head`.
fn window(from: u64, head: u64, step: u64) -> Option<(u64, u64)> {
    if from > head {
        return None;
    }
    Some((from, from.saturating_add(step.max(1) - 1).min(head)))
}

/// Decodes `logs`, dropping removed logs and skipping ones that are not
/// events of `E`.
fn decode_logs<E: ContractEvent>(logs: &[Log]) -> Vec<DecodedLog<E>> {
    logs.iter()
        .filter(|log| !log.removed)
        .filter_map(|log| match E::decode_rpc_log(log) {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                debug!("Skipping log with unknown topic at block {:?}", log.block_number);
                None
            }
            Err(err) => {
                warn!(
                    "Skipping undecodable {} log in tx {:?}: {err}",
                    E::CONTRACT,
                    log.transaction_hash
                );
                None
            }
        })
        .collect()
}

/// Polls the node for new events of one contract.
///
/// Each poll fetches at most `block_step` blocks after the last processed
/// block. When caught up with the chain head the listener sleeps for
/// `poll_interval`. Failed RPC calls are retried with exponential backoff
/// before the error is surfaced; the listener stays usable afterwards.
pub struct EventListener<S, E> {
    source: S,
    address: Address,
    next_block: Option<u64>,
    settings: EventSettings,
    queue: VecDeque<DecodedLog<E>>,
    cursor: Option<Arc<CursorStore>>,
}

impl<S, E> EventListener<S, E>
where
    S: LogSource,
    E: ContractEvent,
{
    /// `from_block: None` starts at the chain head seen by the first poll.
    #[must_use]
    pub fn new(
        source: S,
        address: Address,
        from_block: Option<u64>,
        settings: EventSettings,
    ) -> Self {
        Self {
            source,
            address,
            next_block: from_block,
            settings,
            queue: VecDeque::new(),
            cursor: None,
        }
    }

    /// Persists progress in `store`, resuming after the stored block.
    #[must_use]
    pub fn with_cursor(mut self, store: Arc<CursorStore>) -> Self {
        let last = store.get(&self.cursor_key());
        self.next_block = resume_from(self.next_block, last);
        if let Some(next) = last.and(self.next_block) {
            info!("Resuming {} listener at block {next}", E::CONTRACT);
        }
        self.cursor = Some(store);
        self
    }

    fn cursor_key(&self) -> String {
        format!("LAST_BLOCK_NUMBER_{}_{}", E::CONTRACT, self.address)
    }

    /// The first block not yet fetched, `None` until the first poll when
    /// following the chain head.
    #[must_use]
    pub fn next_block(&self) -> Option<u64> {
        self.next_block
    }

    /// Waits for the next event.
    pub async fn next_event(&mut self) -> Result<DecodedLog<E>> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(event);
            }
            self.poll().await?;
        }
    }

    /// Fetches one window of logs into the queue, or sleeps if there are no
    /// new blocks.
    async fn poll(&mut self) -> Result<()> {
        let source = &self.source;
        let head = Retry::spawn(get_exponential_backoff::<MAX_RETRIES>(), || async move {
            source.block_number().await
        })
        .await?;

        let from = *self.next_block.get_or_insert(head);
        let Some((from, to)) = window(from, head, self.settings.block_step) else {
            tokio::time::sleep(self.settings.poll_interval).await;
            return Ok(());
        };
        debug!(
            "Querying {} events of {} in blocks {from}..={to}",
            E::CONTRACT,
            self.address
        );

        let filter = Filter::new()
            .address(self.address)
            .event_signature(E::TOPICS.to_vec())
            .from_block(from)
            .to_block(to);
        let filter = &filter;
        let logs = Retry::spawn(get_exponential_backoff::<MAX_RETRIES>(), || async move {
            source.logs(filter).await
        })
        .await?;

        self.queue.extend(decode_logs::<E>(&logs));
        self.next_block = Some(to.saturating_add(1));
        if let Some(store) = &self.cursor {
            store.set(&self.cursor_key(), to)?;
        }
        Ok(())
    }

    /// Turns the listener into an endless stream of events. RPC failures
    /// are yielded as errors and polling continues.
    pub fn into_stream(self) -> impl Stream<Item = Result<DecodedLog<E>>> {
        futures::stream::unfold(self, |mut listener| async move {
            let next = listener.next_event().await;
            Some((next, listener))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use alloy_primitives::{Bytes, LogData, B256, U256};
    use alloy_sol_types::SolEvent;
    use alloy_transport::TransportErrorKind;
    use futures::StreamExt;
    use receiv3_bindings::InvoicePool;

    use super::*;
    use crate::events::InvoicePoolEvent;

    const POOL: Address = Address::new([0x42; 20]);

    #[derive(Default)]
    struct FakeChain {
        head: Mutex<u64>,
        logs: Mutex<Vec<Log>>,
        windows: Mutex<Vec<(u64, u64)>>,
        failures: Mutex<usize>,
    }

    impl FakeChain {
        fn new(head: u64, logs: Vec<Log>) -> Arc<Self> {
            Arc::new(Self {
                head: Mutex::new(head),
                logs: Mutex::new(logs),
                ..Default::default()
            })
        }

        fn windows(&self) -> Vec<(u64, u64)> {
            self.windows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LogSource for Arc<FakeChain> {
        async fn block_number(&self) -> TransportResult<u64> {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(TransportErrorKind::custom_str("node unavailable"));
            }
            Ok(*self.head.lock().unwrap())
        }

        async fn logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
            let from = filter.get_from_block().unwrap();
            let to = filter.get_to_block().unwrap();
            self.windows.lock().unwrap().push((from, to));
            let logs = self.logs.lock().unwrap();
            Ok(logs
                .iter()
                .filter(|log| log.block_number.is_some_and(|n| (from..=to).contains(&n)))
                .cloned()
                .collect())
        }
    }

    fn closed(block: u64, token_id: u64) -> Log {
        let event = InvoicePool::PoolClosed {
            tokenId: U256::from(token_id),
        };
        pool_log(block, event.encode_log_data())
    }

    fn pool_log(block: u64, data: LogData) -> Log {
        Log {
            inner: alloy_primitives::Log {
                address: POOL,
                data,
            },
            block_number: Some(block),
            transaction_hash: Some(B256::with_last_byte(1)),
            log_index: Some(0),
            ..Default::default()
        }
    }

    fn settings(block_step: u64) -> EventSettings {
        EventSettings {
            poll_interval: Duration::from_secs(5),
            block_step,
        }
    }

    fn listener(
        chain: &Arc<FakeChain>,
        from: Option<u64>,
        step: u64,
    ) -> EventListener<Arc<FakeChain>, InvoicePoolEvent> {
        EventListener::new(Arc::clone(chain), POOL, from, settings(step))
    }

    fn token_id(log: &DecodedLog<InvoicePoolEvent>) -> U256 {
        match &log.event {
            InvoicePoolEvent::PoolClosed(event) => event.tokenId,
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn backoff_is_bounded() {
        let delays: Vec<_> = get_exponential_backoff::<3>().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
    }

    #[test]
    fn window_is_bounded_by_head_and_step() {
        assert_eq!(window(10, 9, 5), None);
        assert_eq!(window(10, 10, 5), Some((10, 10)));
        assert_eq!(window(10, 100, 5), Some((10, 14)));
        assert_eq!(window(10, 12, 0), Some((10, 10)));
        assert_eq!(
            window(u64::MAX - 1, u64::MAX, 10),
            Some((u64::MAX - 1, u64::MAX))
        );
    }

    #[test]
    fn stored_cursor_wins_over_earlier_start() {
        assert_eq!(resume_from(None, None), None);
        assert_eq!(resume_from(Some(7), None), Some(7));
        assert_eq!(resume_from(None, Some(500)), Some(501));
        assert_eq!(resume_from(Some(100), Some(500)), Some(501));
        assert_eq!(resume_from(Some(1_000), Some(500)), Some(1_000));
    }

    #[test]
    fn removed_and_undecodable_logs_are_skipped() {
        let mut removed = closed(5, 1);
        removed.removed = true;
        let truncated = LogData::new_unchecked(
            vec![
                InvoicePool::PoolCreated::SIGNATURE_HASH,
                B256::with_last_byte(2),
            ],
            Bytes::from(vec![0_u8; 16]),
        );
        let unknown = LogData::new_unchecked(vec![B256::repeat_byte(0xab)], Bytes::new());
        let logs = vec![
            removed,
            pool_log(5, truncated),
            pool_log(5, unknown),
            closed(5, 4),
        ];

        let decoded = decode_logs::<InvoicePoolEvent>(&logs);
        assert_eq!(decoded.len(), 1);
        assert_eq!(token_id(&decoded[0]), U256::from(4));
    }

    #[tokio::test]
    async fn starts_at_head_without_cursor() {
        let chain = FakeChain::new(50, vec![closed(40, 1), closed(50, 2)]);
        let mut listener = listener(&chain, None, 100);
        assert_eq!(listener.next_block(), None);

        let event = listener.next_event().await.unwrap();
        assert_eq!(token_id(&event), U256::from(2));
        assert_eq!(chain.windows(), vec![(50, 50)]);
        assert_eq!(listener.next_block(), Some(51));
    }

    #[tokio::test]
    async fn resumes_after_stored_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CursorStore::open(dir.path().join("cursor.json")).unwrap());
        let chain = FakeChain::new(1_000, vec![closed(400, 1), closed(700, 2)]);

        let key = listener(&chain, None, 1_000).cursor_key();
        store.set(&key, 500).unwrap();

        let mut listener = listener(&chain, None, 1_000).with_cursor(Arc::clone(&store));
        assert_eq!(listener.next_block(), Some(501));

        let event = listener.next_event().await.unwrap();
        assert_eq!(token_id(&event), U256::from(2));
        assert_eq!(chain.windows(), vec![(501, 1_000)]);
        assert_eq!(store.get(&key), Some(1_000));

        // a restarted listener picks up where this one stopped
        let reopened = Arc::new(CursorStore::open(store.path()).unwrap());
        let restarted = EventListener::<_, InvoicePoolEvent>::new(
            Arc::clone(&chain),
            POOL,
            Some(0),
            settings(1_000),
        )
        .with_cursor(reopened);
        assert_eq!(restarted.next_block(), Some(1_001));
    }

    #[tokio::test]
    async fn windows_advance_by_step() {
        let chain = FakeChain::new(25, vec![closed(24, 9)]);
        let mut listener = listener(&chain, Some(0), 10);

        let event = listener.next_event().await.unwrap();
        assert_eq!(token_id(&event), U256::from(9));
        assert_eq!(chain.windows(), vec![(0, 9), (10, 19), (20, 25)]);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_when_caught_up() {
        let chain = FakeChain::new(10, Vec::new());
        let mut listener = listener(&chain, Some(11), 100);

        let start = tokio::time::Instant::now();
        listener.poll().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(chain.windows().is_empty());
        assert_eq!(listener.next_block(), Some(11));
    }

    #[tokio::test(start_paused = true)]
    async fn stream_continues_after_errors() {
        let chain = FakeChain::new(3, vec![closed(3, 6)]);
        *chain.failures.lock().unwrap() = MAX_RETRIES + 1;

        let stream = listener(&chain, Some(3), 100).into_stream();
        futures::pin_mut!(stream);

        assert!(stream.next().await.unwrap().is_err());
        let event = stream.next().await.unwrap().unwrap();
        assert_eq!(token_id(&event), U256::from(6));
    }
}
