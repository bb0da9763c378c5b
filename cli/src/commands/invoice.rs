use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use clap::{Args, Subcommand};
use color_eyre::Result;
use receiv3_client::types::{InvoiceStatus, MintInvoiceRequest};
use receiv3_client::{InvoiceReader, InvoiceWriter, Receiv3Client};
use serde_json::json;

use super::{parse_timestamp, print_json};

#[derive(Subcommand, Debug)]
pub enum InvoiceCommand {
    /// Show an invoice.
    Get { token_id: U256 },
    /// Look up the token id of an invoice number.
    Find { invoice_number: String },
    /// List the token ids minted to an exporter.
    Exporter { exporter: Address },
    /// Whether the invoice can back a funding pool.
    Fundable { token_id: U256 },
    /// Show the current owner and token URI.
    Owner { token_id: U256 },
    /// Collection name, symbol, supply and pause state.
    Info,
    /// Mint a new invoice NFT.
    Mint(MintArgs),
    /// Set the status of an invoice.
    UpdateStatus {
        token_id: U256,
        /// Status name (e.g. `funded`) or numeric code.
        status: InvoiceStatus,
    },
    /// Mark the invoice's shipment as verified.
    VerifyShipment { token_id: U256 },
    /// Burn an invoice, recording the reason on-chain.
    Burn {
        token_id: U256,
        #[arg(long)]
        reason: String,
    },
    /// Transfer an invoice NFT.
    Transfer {
        token_id: U256,
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        /// Use `safeTransferFrom`.
        #[arg(long)]
        safe: bool,
        /// Data passed to the receiver of a safe transfer.
        #[arg(long, requires = "safe")]
        data: Option<Bytes>,
    },
    /// Approve an account to transfer one invoice.
    Approve { to: Address, token_id: U256 },
    /// Pause minting, status updates and transfers.
    Pause,
    Unpause,
}

#[derive(Args, Debug, Clone)]
pub struct MintArgs {
    /// Recipient of the token, usually the exporter.
    #[arg(long)]
    pub to: Address,
    #[arg(long)]
    pub number: String,
    /// Face value in the smallest unit of the settlement token.
    #[arg(long)]
    pub amount: U256,
    #[arg(long)]
    pub advance: U256,
    /// Interest rate in basis points.
    #[arg(long)]
    pub interest_bps: U256,
    /// `YYYY-MM-DD` or a unix timestamp.
    #[arg(long, value_parser = parse_timestamp)]
    pub issue_date: U256,
    /// `YYYY-MM-DD` or a unix timestamp.
    #[arg(long, value_parser = parse_timestamp)]
    pub due_date: U256,
    #[arg(long)]
    pub buyer_country: String,
    #[arg(long)]
    pub document_hash: String,
    /// Token URI of the metadata document.
    #[arg(long)]
    pub uri: String,
}

impl From<MintArgs> for MintInvoiceRequest {
    fn from(args: MintArgs) -> Self {
        Self {
            to: args.to,
            invoice_number: args.number,
            amount: args.amount,
            advance_amount: args.advance,
            interest_rate: args.interest_bps,
            issue_date: args.issue_date,
            due_date: args.due_date,
            buyer_country: args.buyer_country,
            document_hash: args.document_hash,
            uri: args.uri,
        }
    }
}

impl InvoiceCommand {
    #[must_use]
    pub fn requires_signer(&self) -> bool {
        !matches!(
            self,
            Self::Get { .. }
                | Self::Find { .. }
                | Self::Exporter { .. }
                | Self::Fundable { .. }
                | Self::Owner { .. }
                | Self::Info
        )
    }
}

pub async fn execute<T, P>(command: InvoiceCommand, client: &Receiv3Client<T, P>) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    let nft = &client.invoice;
    match command {
        InvoiceCommand::Get { token_id } => print_json(&nft.get_invoice(token_id).await?),
        InvoiceCommand::Find { invoice_number } => {
            let token_id = nft.get_token_id_by_invoice_number(&invoice_number).await?;
            print_json(&json!({ "invoiceNumber": invoice_number, "tokenId": token_id }))
        }
        InvoiceCommand::Exporter { exporter } => {
            print_json(&nft.get_exporter_invoices(exporter).await?)
        }
        InvoiceCommand::Fundable { token_id } => print_json(&json!({
            "tokenId": token_id,
            "fundable": nft.is_fundable(token_id).await?,
        })),
        InvoiceCommand::Owner { token_id } => print_json(&json!({
            "tokenId": token_id,
            "owner": nft.owner_of(token_id).await?,
            "approved": nft.get_approved(token_id).await?,
            "tokenURI": nft.token_uri(token_id).await?,
        })),
        InvoiceCommand::Info => print_json(&json!({
            "address": nft.address(),
            "name": nft.name().await?,
            "symbol": nft.symbol().await?,
            "totalMinted": nft.total_minted().await?,
            "paused": nft.paused().await?,
        })),
        InvoiceCommand::Mint(args) => print_json(&nft.mint_invoice(args.into()).await?),
        InvoiceCommand::UpdateStatus { token_id, status } => {
            print_json(&nft.update_status(token_id, status).await?)
        }
        InvoiceCommand::VerifyShipment { token_id } => {
            print_json(&nft.verify_shipment(token_id).await?)
        }
        InvoiceCommand::Burn { token_id, reason } => {
            print_json(&nft.burn_invoice(token_id, reason).await?)
        }
        InvoiceCommand::Transfer {
            token_id,
            from,
            to,
            safe,
            data,
        } => {
            let outcome = if safe {
                nft.safe_transfer_from(from, to, token_id, data).await?
            } else {
                nft.transfer_from(from, to, token_id).await?
            };
            print_json(&outcome)
        }
        InvoiceCommand::Approve { to, token_id } => print_json(&nft.approve(to, token_id).await?),
        InvoiceCommand::Pause => print_json(&nft.pause().await?),
        InvoiceCommand::Unpause => print_json(&nft.unpause().await?),
    }
}
