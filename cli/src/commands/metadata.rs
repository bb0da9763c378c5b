use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use color_eyre::{eyre::Context, Result};
use receiv3_client::metadata::{InvoiceMetadataInput, NftMetadata};
use receiv3_logging::info;

#[derive(Args, Debug, Clone)]
pub struct MetadataArgs {
    /// Off-chain invoice id.
    #[arg(long)]
    pub invoice_id: String,
    #[arg(long)]
    pub exporter_id: String,
    #[arg(long)]
    pub number: String,
    #[arg(long)]
    pub amount: f64,
    #[arg(long, default_value = "USD")]
    pub currency: String,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    pub issue_date: NaiveDate,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    pub due_date: NaiveDate,
    #[arg(long)]
    pub buyer_name: String,
    #[arg(long)]
    pub buyer_country: String,
    #[arg(long)]
    pub document_hash: Option<String>,
    /// Annual interest rate in percent.
    #[arg(long)]
    pub interest_rate: Option<f64>,
    #[arg(long)]
    pub advance_amount: Option<f64>,
    /// Write the document to a file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl From<&MetadataArgs> for InvoiceMetadataInput {
    fn from(args: &MetadataArgs) -> Self {
        Self {
            invoice_id: args.invoice_id.clone(),
            exporter_id: args.exporter_id.clone(),
            invoice_number: args.number.clone(),
            amount: args.amount,
            currency: args.currency.clone(),
            issue_date: args.issue_date,
            due_date: args.due_date,
            buyer_name: args.buyer_name.clone(),
            buyer_country: args.buyer_country.clone(),
            document_hash: args.document_hash.clone(),
            interest_rate: args.interest_rate,
            advance_amount: args.advance_amount,
        }
    }
}

pub fn execute(args: &MetadataArgs) -> Result<()> {
    let document = NftMetadata::for_invoice(&args.into()).to_json()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, document)
                .with_context(|| format!("Writing metadata to {}", path.display()))?;
            info!("Metadata written to {}", path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}
