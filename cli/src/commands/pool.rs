use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use clap::Subcommand;
use color_eyre::Result;
use receiv3_client::types::Repayment;
use receiv3_client::{PoolReader, PoolWriter, Receiv3Client};
use serde_json::json;

use super::print_json;

#[derive(Subcommand, Debug)]
pub enum PoolCommand {
    /// Show the pool of an invoice.
    Get { token_id: U256 },
    /// List the investments in a pool.
    Investments { token_id: U256 },
    /// Amount still needed to fill a pool.
    Capacity { token_id: U256 },
    /// List the pools an investor has invested in.
    Investor { investor: Address },
    /// Platform fee, fee wallet and linked invoice contract.
    Info,
    /// Open a funding pool for a fundable invoice.
    Create { token_id: U256 },
    /// Record an off-chain investment.
    Invest {
        token_id: U256,
        #[arg(long)]
        investor: Address,
        #[arg(long)]
        amount: U256,
    },
    /// Record the disbursement of a filled pool to the exporter.
    Disburse { token_id: U256 },
    /// Record the buyer's repayment and each investor's return.
    Repay {
        token_id: U256,
        #[arg(long)]
        total: U256,
        /// Comma separated, in the order of `pool investments`.
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        returns: Vec<U256>,
    },
    /// Record a repayment exceeding the investors' returns.
    Excess {
        token_id: U256,
        #[arg(long)]
        recipient: Address,
        #[arg(long)]
        amount: U256,
    },
    /// Mark a pool as defaulted.
    MarkDefaulted { token_id: U256 },
    /// Set the platform fee in basis points.
    SetFee { fee_bps: U256 },
    SetWallet { wallet: Address },
    Pause,
    Unpause,
}

impl PoolCommand {
    #[must_use]
    pub fn requires_signer(&self) -> bool {
        !matches!(
            self,
            Self::Get { .. }
                | Self::Investments { .. }
                | Self::Capacity { .. }
                | Self::Investor { .. }
                | Self::Info
        )
    }
}

pub async fn execute<T, P>(command: PoolCommand, client: &Receiv3Client<T, P>) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    let pool = &client.pool;
    match command {
        PoolCommand::Get { token_id } => print_json(&pool.get_pool(token_id).await?),
        PoolCommand::Investments { token_id } => {
            print_json(&pool.get_pool_investments(token_id).await?)
        }
        PoolCommand::Capacity { token_id } => print_json(&json!({
            "tokenId": token_id,
            "remainingCapacity": pool.get_remaining_capacity(token_id).await?,
        })),
        PoolCommand::Investor { investor } => {
            print_json(&pool.get_investor_pools(investor).await?)
        }
        PoolCommand::Info => print_json(&json!({
            "address": pool.address(),
            "invoiceNFT": pool.invoice_nft().await?,
            "platformFeeBps": pool.platform_fee_bps().await?,
            "platformWallet": pool.platform_wallet().await?,
            "paused": pool.paused().await?,
        })),
        PoolCommand::Create { token_id } => print_json(&pool.create_pool(token_id).await?),
        PoolCommand::Invest {
            token_id,
            investor,
            amount,
        } => print_json(&pool.record_investment(token_id, investor, amount).await?),
        PoolCommand::Disburse { token_id } => {
            print_json(&pool.record_disbursement(token_id).await?)
        }
        PoolCommand::Repay {
            token_id,
            total,
            returns,
        } => {
            let repayment = Repayment {
                total_amount: total,
                investor_returns: returns,
            };
            print_json(&pool.record_repayment(token_id, repayment).await?)
        }
        PoolCommand::Excess {
            token_id,
            recipient,
            amount,
        } => print_json(
            &pool
                .record_excess_repayment(token_id, recipient, amount)
                .await?,
        ),
        PoolCommand::MarkDefaulted { token_id } => {
            print_json(&pool.mark_defaulted(token_id).await?)
        }
        PoolCommand::SetFee { fee_bps } => print_json(&pool.set_platform_fee(fee_bps).await?),
        PoolCommand::SetWallet { wallet } => {
            print_json(&pool.set_platform_wallet(wallet).await?)
        }
        PoolCommand::Pause => print_json(&pool.pause().await?),
        PoolCommand::Unpause => print_json(&pool.unpause().await?),
    }
}
