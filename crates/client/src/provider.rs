//! Provider construction.

use alloy_network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::{BoxTransport, Transport};
use receiv3_logging::{debug, info};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Connects a read-only provider to `config.rpc_url`.
///
/// The scheme of the URL picks the transport (`http(s)://` or `ws(s)://`).
/// Fails if the node reports a chain id other than `config.chain_id`.
pub async fn connect(config: &ClientConfig) -> Result<impl Provider<BoxTransport> + Clone> {
    info!("Connecting to {}", config.rpc_url);
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .on_builtin(config.rpc_url.as_str())
        .await?;

    ensure_chain_id(&provider, config.chain_id).await?;
    Ok(provider)
}

/// Connects a provider that signs and fills transactions with `signer`.
pub async fn connect_with_signer(
    config: &ClientConfig,
    signer: PrivateKeySigner,
) -> Result<impl Provider<BoxTransport> + Clone> {
    info!(
        "Connecting to {} as {}",
        config.rpc_url,
        signer.address()
    );
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_builtin(config.rpc_url.as_str())
        .await?;

    ensure_chain_id(&provider, config.chain_id).await?;
    Ok(provider)
}

/// Connects to `config.ws_url` for `eth_subscribe` based subscriptions.
pub async fn connect_ws(config: &ClientConfig) -> Result<impl Provider<BoxTransport> + Clone> {
    let ws_url = config
        .ws_url
        .as_ref()
        .ok_or_else(|| Error::Config("BLOCKCHAIN_WS_URL is not set".into()))?;

    info!("Connecting to {ws_url}");
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .on_builtin(ws_url.as_str())
        .await?;

    ensure_chain_id(&provider, config.chain_id).await?;
    Ok(provider)
}

async fn ensure_chain_id<T, P>(provider: &P, expected: u64) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let actual = provider.get_chain_id().await?;
    debug!("Node reports chain id {actual}");
    if actual == expected {
        Ok(())
    } else {
        Err(Error::ChainIdMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;
    use url::Url;

    use super::*;
    use crate::config::{EventSettings, TxSettings};
    use crate::error::ErrorKind;

    fn config(rpc_url: &str) -> ClientConfig {
        ClientConfig {
            rpc_url: Url::parse(rpc_url).unwrap(),
            ws_url: None,
            chain_id: 4202,
            invoice_nft_address: Address::repeat_byte(0x01),
            invoice_pool_address: Address::repeat_byte(0x02),
            tx: TxSettings::default(),
            events: EventSettings::default(),
        }
    }

    #[tokio::test]
    async fn unreachable_node() {
        match connect(&config("http://127.0.0.1:1")).await {
            Err(err) => assert_eq!(err.kind(), ErrorKind::Transport),
            Ok(_) => panic!("connected to a closed port"),
        }
    }

    #[tokio::test]
    async fn websocket_url_is_required() {
        match connect_ws(&config("http://127.0.0.1:8545")).await {
            Err(Error::Config(message)) => assert!(message.contains("BLOCKCHAIN_WS_URL")),
            Err(err) => panic!("unexpected error {err}"),
            Ok(_) => panic!("connected without a websocket url"),
        }
    }
}
