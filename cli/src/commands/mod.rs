use alloy_primitives::U256;
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use color_eyre::Result;
use serde::Serialize;

pub mod events;
pub mod invoice;
pub mod metadata;
pub mod pool;
pub mod role;

pub use events::EventsCommand;
pub use invoice::InvoiceCommand;
pub use metadata::MetadataArgs;
pub use pool::PoolCommand;
pub use role::RoleCommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read and manage invoice NFTs.
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Read and manage funding pools.
    #[command(subcommand)]
    Pool(PoolCommand),
    /// Inspect and manage access-control roles.
    #[command(subcommand)]
    Role(RoleCommand),
    /// Query or follow contract events.
    #[command(subcommand)]
    Events(EventsCommand),
    /// Render the ERC-721 metadata document for an invoice.
    Metadata(MetadataArgs),
}

impl Commands {
    /// Whether the command sends a transaction.
    #[must_use]
    pub fn requires_signer(&self) -> bool {
        match self {
            Self::Invoice(command) => command.requires_signer(),
            Self::Pool(command) => command.requires_signer(),
            Self::Role(command) => command.requires_signer(),
            Self::Events(_) | Self::Metadata(_) => false,
        }
    }
}

/// Which of the two contracts a command targets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contract {
    Nft,
    Pool,
}

pub(crate) fn print_json<S: Serialize>(value: &S) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses a `YYYY-MM-DD` date (midnight UTC) or a unix timestamp in
/// seconds.
pub fn parse_timestamp(value: &str) -> std::result::Result<U256, String> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value
            .parse::<U256>()
            .map_err(|e| format!("invalid timestamp `{value}`: {e}"));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date `{value}`: {e}"))?;
    let seconds = date
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc().timestamp())
        .ok_or_else(|| format!("invalid date `{value}`"))?;
    u64::try_from(seconds)
        .map(U256::from)
        .map_err(|_| format!("date `{value}` is before 1970-01-01"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(parse_timestamp("1705276800"), Ok(U256::from(1_705_276_800u64)));
        assert_eq!(parse_timestamp("2024-01-15"), Ok(U256::from(1_705_276_800u64)));
        assert_eq!(parse_timestamp("1970-01-01"), Ok(U256::ZERO));
        assert!(parse_timestamp("1969-12-31").is_err());
        assert!(parse_timestamp("15/01/2024").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
