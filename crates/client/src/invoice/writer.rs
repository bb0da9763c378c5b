use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::Log;
use alloy_transport::Transport;
use async_trait::async_trait;
use receiv3_bindings::InvoiceNFT;
use receiv3_logging::info;

use super::{InvoiceNftClient, CONTRACT};
use crate::error::{Error, Result};
use crate::tx;
use crate::types::{InvoiceStatus, MintInvoiceRequest, MintedInvoice, TxOutcome};

/// State-changing transactions on `InvoiceNFT`.
///
/// Every method waits for the receipt and fails with
/// [`Error::Reverted`] if the transaction was mined but reverted.
#[async_trait]
pub trait InvoiceWriter: Send + Sync {
    /// Mints an invoice NFT. Requires `MINTER_ROLE`.
    async fn mint_invoice(&self, request: MintInvoiceRequest) -> Result<MintedInvoice>;
    /// Requires `ORACLE_ROLE`.
    async fn update_status(&self, token_id: U256, status: InvoiceStatus) -> Result<TxOutcome>;
    /// Requires `ORACLE_ROLE`.
    async fn verify_shipment(&self, token_id: U256) -> Result<TxOutcome>;
    async fn burn_invoice(&self, token_id: U256, reason: String) -> Result<TxOutcome>;
    async fn burn(&self, token_id: U256) -> Result<TxOutcome>;
    async fn approve(&self, to: Address, token_id: U256) -> Result<TxOutcome>;
    async fn set_approval_for_all(&self, operator: Address, approved: bool) -> Result<TxOutcome>;
    async fn transfer_from(&self, from: Address, to: Address, token_id: U256)
        -> Result<TxOutcome>;
    /// Uses the `bytes` overload when `data` is set.
    async fn safe_transfer_from(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
        data: Option<Bytes>,
    ) -> Result<TxOutcome>;
    async fn grant_role(&self, role: B256, account: Address) -> Result<TxOutcome>;
    async fn revoke_role(&self, role: B256, account: Address) -> Result<TxOutcome>;
    async fn renounce_role(&self, role: B256, caller_confirmation: Address) -> Result<TxOutcome>;
    async fn pause(&self) -> Result<TxOutcome>;
    async fn unpause(&self) -> Result<TxOutcome>;
}

/// Finds the token id in the `InvoiceMinted` log emitted by `contract`.
pub(crate) fn minted_token_id(logs: &[Log], contract: Address) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .find_map(|log| log.log_decode::<InvoiceNFT::InvoiceMinted>().ok())
        .map(|log| log.inner.data.tokenId)
}

#[async_trait]
impl<T, P> InvoiceWriter for InvoiceNftClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    async fn mint_invoice(&self, request: MintInvoiceRequest) -> Result<MintedInvoice> {
        info!(
            "Minting invoice {} for {} to {}",
            request.invoice_number, request.amount, request.to
        );

        let call = InvoiceNFT::mintInvoiceCall::from(request);
        let receipt = tx::send(self.instance.call_builder(&call), &self.tx, CONTRACT).await?;

        let token_id = minted_token_id(receipt.inner.logs(), self.address()).ok_or(
            Error::MissingEvent {
                tx_hash: receipt.transaction_hash,
                event: "InvoiceMinted",
            },
        )?;

        info!(
            "Minted invoice {} as token {token_id}, txHash: {}",
            call.invoiceNumber, receipt.transaction_hash
        );
        Ok(MintedInvoice {
            token_id,
            outcome: TxOutcome::from(&receipt),
        })
    }

    async fn update_status(&self, token_id: U256, status: InvoiceStatus) -> Result<TxOutcome> {
        info!("Updating status of invoice {token_id} to {status}");
        tx::execute(
            self.instance.updateStatus(token_id, status.into()),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn verify_shipment(&self, token_id: U256) -> Result<TxOutcome> {
        info!("Verifying shipment of invoice {token_id}");
        tx::execute(self.instance.verifyShipment(token_id), &self.tx, CONTRACT).await
    }

    async fn burn_invoice(&self, token_id: U256, reason: String) -> Result<TxOutcome> {
        info!("Burning invoice {token_id}: {reason}");
        tx::execute(
            self.instance.burnInvoice(token_id, reason),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn burn(&self, token_id: U256) -> Result<TxOutcome> {
        info!("Burning token {token_id}");
        tx::execute(self.instance.burn(token_id), &self.tx, CONTRACT).await
    }

    async fn approve(&self, to: Address, token_id: U256) -> Result<TxOutcome> {
        tx::execute(self.instance.approve(to, token_id), &self.tx, CONTRACT).await
    }

    async fn set_approval_for_all(&self, operator: Address, approved: bool) -> Result<TxOutcome> {
        tx::execute(
            self.instance.setApprovalForAll(operator, approved),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<TxOutcome> {
        info!("Transferring token {token_id} from {from} to {to}");
        tx::execute(
            self.instance.transferFrom(from, to, token_id),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn safe_transfer_from(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
        data: Option<Bytes>,
    ) -> Result<TxOutcome> {
        info!("Safely transferring token {token_id} from {from} to {to}");
        match data {
            Some(data) => {
                tx::execute(
                    self.instance.safeTransferFrom_1(from, to, token_id, data),
                    &self.tx,
                    CONTRACT,
                )
                .await
            }
            None => {
                tx::execute(
                    self.instance.safeTransferFrom_0(from, to, token_id),
                    &self.tx,
                    CONTRACT,
                )
                .await
            }
        }
    }

    async fn grant_role(&self, role: B256, account: Address) -> Result<TxOutcome> {
        info!("Granting role {role} to {account} on {CONTRACT}");
        tx::execute(self.instance.grantRole(role, account), &self.tx, CONTRACT).await
    }

    async fn revoke_role(&self, role: B256, account: Address) -> Result<TxOutcome> {
        info!("Revoking role {role} from {account} on {CONTRACT}");
        tx::execute(self.instance.revokeRole(role, account), &self.tx, CONTRACT).await
    }

    async fn renounce_role(&self, role: B256, caller_confirmation: Address) -> Result<TxOutcome> {
        info!("Renouncing role {role} for {caller_confirmation} on {CONTRACT}");
        tx::execute(
            self.instance.renounceRole(role, caller_confirmation),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn pause(&self) -> Result<TxOutcome> {
        info!("Pausing {CONTRACT}");
        tx::execute(self.instance.pause(), &self.tx, CONTRACT).await
    }

    async fn unpause(&self) -> Result<TxOutcome> {
        info!("Unpausing {CONTRACT}");
        tx::execute(self.instance.unpause(), &self.tx, CONTRACT).await
    }
}
