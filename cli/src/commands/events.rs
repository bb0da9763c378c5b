use std::path::PathBuf;
use std::sync::Arc;

use alloy_provider::Provider;
use alloy_transport::Transport;
use clap::Subcommand;
use color_eyre::Result;
use futures::{pin_mut, Stream, StreamExt};
use serde::Serialize;
use receiv3_client::events::{ContractEvent, CursorStore, DecodedLog, LogSubscriber};
use receiv3_client::Receiv3Client;
use receiv3_logging::{info, warn};

use super::Contract;

#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    /// Print the events emitted in a block range.
    Query {
        #[arg(long, value_enum)]
        contract: Contract,
        #[arg(long)]
        from: u64,
        /// Defaults to the latest block.
        #[arg(long)]
        to: Option<u64>,
    },
    /// Poll for new events until interrupted.
    Watch {
        #[arg(long, value_enum)]
        contract: Contract,
        /// Defaults to the latest block, or to the block after the one
        /// stored in `--cursor-file`.
        #[arg(long)]
        from: Option<u64>,
        /// JSON file storing the last processed block, to resume from.
        #[arg(long)]
        cursor_file: Option<PathBuf>,
    },
    /// Follow new events over a websocket subscription.
    Subscribe {
        #[arg(long, value_enum)]
        contract: Contract,
    },
}

impl EventsCommand {
    /// Whether the command needs a websocket connection.
    #[must_use]
    pub fn requires_ws(&self) -> bool {
        matches!(self, Self::Subscribe { .. })
    }
}

pub async fn execute<T, P>(command: EventsCommand, client: &Receiv3Client<T, P>) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    match command {
        EventsCommand::Query { contract, from, to } => match contract {
            Contract::Nft => query(&client.invoice.subscriber(), from, to).await,
            Contract::Pool => query(&client.pool.subscriber(), from, to).await,
        },
        EventsCommand::Watch {
            contract,
            from,
            cursor_file,
        } => {
            let cursor = cursor_file.map(CursorStore::open).transpose()?.map(Arc::new);
            match contract {
                Contract::Nft => watch(&client.invoice.subscriber(), from, cursor).await,
                Contract::Pool => watch(&client.pool.subscriber(), from, cursor).await,
            }
        }
        EventsCommand::Subscribe { contract } => match contract {
            Contract::Nft => subscribe(&client.invoice.subscriber()).await,
            Contract::Pool => subscribe(&client.pool.subscriber()).await,
        },
    }
}

async fn query<T, P, E>(
    subscriber: &LogSubscriber<T, P, E>,
    from: u64,
    to: Option<u64>,
) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
    E: ContractEvent,
{
    let events = subscriber.query(subscriber.range(from, to)).await?;
    info!("Found {} {} events", events.len(), E::CONTRACT);
    for event in &events {
        print_event(event)?;
    }
    Ok(())
}

async fn watch<T, P, E>(
    subscriber: &LogSubscriber<T, P, E>,
    from: Option<u64>,
    cursor: Option<Arc<CursorStore>>,
) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
    E: ContractEvent,
{
    let mut listener = subscriber.watch(from);
    if let Some(cursor) = cursor {
        listener = listener.with_cursor(cursor);
    }
    match listener.next_block() {
        Some(block) => info!("Watching {} events from block {block}", E::CONTRACT),
        None => info!("Watching {} events from the latest block", E::CONTRACT),
    }
    follow(listener.into_stream()).await
}

async fn subscribe<T, P, E>(subscriber: &LogSubscriber<T, P, E>) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
    E: ContractEvent,
{
    info!("Subscribing to {} events", E::CONTRACT);
    follow(subscriber.subscribe_events().await?).await
}

/// Prints events until the stream ends or Ctrl-C is pressed. Errors are
/// logged and do not stop the stream.
async fn follow<E: Serialize>(
    stream: impl Stream<Item = receiv3_client::Result<DecodedLog<E>>>,
) -> Result<()> {
    pin_mut!(stream);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                return Ok(());
            }
            next = stream.next() => match next {
                Some(Ok(event)) => print_event(&event)?,
                Some(Err(err)) => warn!("{err}"),
                None => return Ok(()),
            },
        }
    }
}

/// Prints `event` as a single line of JSON.
fn print_event<E: Serialize>(event: &DecodedLog<E>) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
