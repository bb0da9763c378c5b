use alloy_contract::SolCallBuilder;
use alloy_primitives::TxHash;
use alloy_provider::Provider;
use alloy_rpc_types::{BlockId, TransactionReceipt};
use alloy_sol_types::SolCall;
use alloy_transport::Transport;
use receiv3_logging::{debug, info, warn};

use crate::config::TxSettings;
use crate::error::{ContractResultExt, Error, Result};
use crate::revert::ContractKind;
use crate::types::TxOutcome;

/// Submits `call`, waits for its receipt and rejects failed receipts.
///
/// A failed receipt is replayed with `eth_call` from the same sender at the
/// block it was mined in to recover the revert reason.
pub(crate) async fn send<T, P, C>(
    call: SolCallBuilder<T, &P, C>,
    settings: &TxSettings,
    contract: ContractKind,
) -> Result<TransactionReceipt>
where
    T: Transport + Clone,
    P: Provider<T>,
    C: SolCall + Unpin,
{
    let call = match settings.gas_limit {
        Some(gas) => call.gas(gas),
        None => call,
    };

    let pending = call.send().await.for_contract(contract)?;
    let tx_hash = *pending.tx_hash();
    debug!("Submitted {} to {contract}, txHash: {tx_hash}", C::SIGNATURE);

    let receipt = pending
        .with_required_confirmations(settings.confirmations)
        .with_timeout(settings.timeout)
        .get_receipt()
        .await?;

    if !receipt.inner.status() {
        warn!("{} reverted on chain, txHash: {tx_hash}", C::SIGNATURE);
        let block = receipt.block_number.map_or_else(BlockId::latest, BlockId::number);
        let replay = call
            .from(receipt.from)
            .block(block)
            .call()
            .await
            .map(drop)
            .for_contract(contract);
        return Err(failed_receipt(tx_hash, replay));
    }

    info!(
        "{} mined in block {:?}, txHash: {tx_hash}",
        C::SIGNATURE,
        receipt.block_number
    );
    Ok(receipt)
}

/// The error for a mined transaction with a failed status, keeping the
/// revert if the replay produced one.
fn failed_receipt(tx_hash: TxHash, replay: Result<()>) -> Error {
    let revert = match replay {
        Err(Error::Revert(revert)) => Some(revert),
        Err(err) => {
            debug!("Replaying {tx_hash} did not return revert data: {err}");
            None
        }
        Ok(()) => None,
    };
    Error::Reverted { tx_hash, revert }
}

/// Like [`send`], reduced to a [`TxOutcome`].
pub(crate) async fn execute<T, P, C>(
    call: SolCallBuilder<T, &P, C>,
    settings: &TxSettings,
    contract: ContractKind,
) -> Result<TxOutcome>
where
    T: Transport + Clone,
    P: Provider<T>,
    C: SolCall + Unpin,
{
    send(call, settings, contract)
        .await
        .map(|receipt| TxOutcome::from(&receipt))
}

#[cfg(test)]
mod tests {
    use alloy_json_rpc::ErrorPayload;
    use alloy_primitives::{hex, B256};
    use alloy_sol_types::SolError;
    use alloy_transport::RpcError;
    use receiv3_bindings::InvoicePool;

    use super::*;
    use crate::error::ErrorKind;

    const TX: TxHash = B256::repeat_byte(0x5a);

    fn replay_error(json: &str) -> Error {
        let payload: ErrorPayload = serde_json::from_str(json).unwrap();
        Error::from_transport(RpcError::ErrorResp(payload), ContractKind::InvoicePool)
    }

    #[test]
    fn failed_receipt_keeps_replayed_revert() {
        let data = hex::encode_prefixed(InvoicePool::EnforcedPause {}.abi_encode());
        let replay = replay_error(&format!(
            r#"{{"code":3,"message":"execution reverted","data":"{data}"}}"#
        ));

        let err = failed_receipt(TX, Err(replay));
        assert_eq!(err.kind(), ErrorKind::Revert);
        assert!(matches!(err, Error::Reverted { tx_hash, .. } if tx_hash == TX));
        let revert = err.as_revert().unwrap();
        assert_eq!(revert.contract, ContractKind::InvoicePool);
        assert!(revert.reason.is_paused());
        let message = err.to_string();
        assert!(message.starts_with(&format!("transaction {TX} reverted on chain: ")));
        assert!(message.contains("EnforcedPause"), "{message}");
    }

    #[test]
    fn failed_receipt_without_reason() {
        let err = failed_receipt(TX, Ok(()));
        assert!(err.as_revert().is_none());
        assert_eq!(err.to_string(), format!("transaction {TX} reverted on chain"));

        let unreachable = replay_error(r#"{"code":-32000,"message":"header not found"}"#);
        let err = failed_receipt(TX, Err(unreachable));
        assert_eq!(err.kind(), ErrorKind::Revert);
        assert!(err.as_revert().is_none());
    }
}
