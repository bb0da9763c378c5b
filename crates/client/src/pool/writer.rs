use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use async_trait::async_trait;
use receiv3_logging::info;

use super::{InvoicePoolClient, CONTRACT};
use crate::error::Result;
use crate::tx;
use crate::types::{Repayment, TxOutcome};

/// State-changing transactions on `InvoicePool`.
///
/// The `record_*` methods and `mark_defaulted` require `OPERATOR_ROLE`;
/// fee, wallet and pause management require the admin role.
#[async_trait]
pub trait PoolWriter: Send + Sync {
    /// Opens a pool for a fundable invoice.
    async fn create_pool(&self, token_id: U256) -> Result<TxOutcome>;
    async fn record_investment(
        &self,
        token_id: U256,
        investor: Address,
        amount: U256,
    ) -> Result<TxOutcome>;
    async fn record_disbursement(&self, token_id: U256) -> Result<TxOutcome>;
    /// `repayment.investor_returns` must follow the order of
    /// `getPoolInvestments`.
    async fn record_repayment(&self, token_id: U256, repayment: Repayment) -> Result<TxOutcome>;
    async fn record_excess_repayment(
        &self,
        token_id: U256,
        recipient: Address,
        amount: U256,
    ) -> Result<TxOutcome>;
    async fn mark_defaulted(&self, token_id: U256) -> Result<TxOutcome>;
    async fn set_platform_fee(&self, fee_bps: U256) -> Result<TxOutcome>;
    async fn set_platform_wallet(&self, wallet: Address) -> Result<TxOutcome>;
    async fn grant_role(&self, role: B256, account: Address) -> Result<TxOutcome>;
    async fn revoke_role(&self, role: B256, account: Address) -> Result<TxOutcome>;
    async fn renounce_role(&self, role: B256, caller_confirmation: Address) -> Result<TxOutcome>;
    async fn pause(&self) -> Result<TxOutcome>;
    async fn unpause(&self) -> Result<TxOutcome>;
}

#[async_trait]
impl<T, P> PoolWriter for InvoicePoolClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    async fn create_pool(&self, token_id: U256) -> Result<TxOutcome> {
        info!("Creating pool for invoice {token_id}");
        tx::execute(self.instance.createPool(token_id), &self.tx, CONTRACT).await
    }

    async fn record_investment(
        &self,
        token_id: U256,
        investor: Address,
        amount: U256,
    ) -> Result<TxOutcome> {
        info!("Recording investment of {amount} by {investor} in pool {token_id}");
        tx::execute(
            self.instance.recordInvestment(token_id, investor, amount),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn record_disbursement(&self, token_id: U256) -> Result<TxOutcome> {
        info!("Recording disbursement of pool {token_id}");
        tx::execute(
            self.instance.recordDisbursement(token_id),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn record_repayment(&self, token_id: U256, repayment: Repayment) -> Result<TxOutcome> {
        info!(
            "Recording repayment of {} to {} investors of pool {token_id}",
            repayment.total_amount,
            repayment.investor_returns.len()
        );
        tx::execute(
            self.instance.recordRepayment(
                token_id,
                repayment.total_amount,
                repayment.investor_returns,
            ),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn record_excess_repayment(
        &self,
        token_id: U256,
        recipient: Address,
        amount: U256,
    ) -> Result<TxOutcome> {
        info!("Recording excess repayment of {amount} to {recipient} for pool {token_id}");
        tx::execute(
            self.instance.recordExcessRepayment(token_id, recipient, amount),
            &self.tx,
            CONTRACT,
        )
        .await
    }

    async fn mark_defaulted(&self, token_id: U256) -> Result<TxOutcome> {
        info!("Marking pool {token_id} as defaulted");
        tx::execute(self.instance.markDefaulted(token_id), &self.tx, CONTRACT).await
    }

    async fn set_platform_fee(&self, fee_bps: U256) -> Result<TxOutcome> {
        info!("Setting platform fee to {fee_bps} bps");
        tx::execute(self.instance.setPlatformFee(fee_bps), &self.tx, CONTRACT).await
    }

    async fn set_platform_wallet(&self, wallet: Address) -> Result<TxOutcome> {
        info!("Setting platform wallet to {wallet}");
        tx::execute(
            self.instance.setPlatformWallet(wallet),
            &self.tx,
            CONTRACT,
        )
        .await
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
