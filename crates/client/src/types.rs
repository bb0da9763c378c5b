use core::fmt;
use core::str::FromStr;

use alloy_primitives::{Address, TxHash, B256, U256};
use alloy_rpc_types::TransactionReceipt;
use receiv3_bindings::{roles, InvoiceNFT, InvoicePool};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle of an invoice NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum InvoiceStatus {
    Active = 0,
    Funded = 1,
    Matured = 2,
    Repaid = 3,
    Defaulted = 4,
}

impl InvoiceStatus {
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Funded,
        Self::Matured,
        Self::Repaid,
        Self::Defaulted,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Funded => "funded",
            Self::Matured => "matured",
            Self::Repaid => "repaid",
            Self::Defaulted => "defaulted",
        }
    }
}

/// Lifecycle of a funding pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PoolStatus {
    Open = 0,
    Filled = 1,
    Disbursed = 2,
    Closed = 3,
    Defaulted = 4,
}

impl PoolStatus {
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::Filled,
        Self::Disbursed,
        Self::Closed,
        Self::Defaulted,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Filled => "filled",
            Self::Disbursed => "disbursed",
            Self::Closed => "closed",
            Self::Defaulted => "defaulted",
        }
    }
}

macro_rules! status_conversions {
    ($ty:ident, $kind:literal) => {
        impl TryFrom<u8> for $ty {
            type Error = Error;

            fn try_from(code: u8) -> Result<Self> {
                Self::ALL
                    .into_iter()
                    .find(|status| *status as u8 == code)
                    .ok_or(Error::UnknownStatus { kind: $kind, code })
            }
        }

        impl From<$ty> for u8 {
            fn from(status: $ty) -> u8 {
                status as u8
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            /// Accepts the lowercase name or the numeric code.
            fn from_str(s: &str) -> Result<Self> {
                if let Ok(code) = s.parse::<u8>() {
                    return Self::try_from(code);
                }
                Self::ALL
                    .into_iter()
                    .find(|status| status.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| Error::Config(format!("unknown {} status `{s}`", $kind)))
            }
        }
    };
}

status_conversions!(InvoiceStatus, "invoice");
status_conversions!(PoolStatus, "pool");

/// Access-control roles used by the two contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    DefaultAdmin,
    Minter,
    Oracle,
    Operator,
}

impl Role {
    pub const ALL: [Self; 4] = [
        Self::DefaultAdmin,
        Self::Minter,
        Self::Oracle,
        Self::Operator,
    ];

    /// The `bytes32` role identifier.
    #[must_use]
    pub fn id(self) -> B256 {
        match self {
            Self::DefaultAdmin => roles::DEFAULT_ADMIN_ROLE,
            Self::Minter => roles::MINTER_ROLE,
            Self::Oracle => roles::ORACLE_ROLE,
            Self::Operator => roles::OPERATOR_ROLE,
        }
    }

    /// Name of the Solidity constant holding the role id.
    #[must_use]
    pub fn constant_name(self) -> &'static str {
        match self {
            Self::DefaultAdmin => "DEFAULT_ADMIN_ROLE",
            Self::Minter => "MINTER_ROLE",
            Self::Oracle => "ORACLE_ROLE",
            Self::Operator => "OPERATOR_ROLE",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Self::DefaultAdmin => "admin",
            Self::Minter => "minter",
            Self::Oracle => "oracle",
            Self::Operator => "operator",
        }
    }

    /// Looks up a role by its id.
    #[must_use]
    pub fn from_id(id: B256) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_name())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| {
                role.constant_name().eq_ignore_ascii_case(s)
                    || role.short_name().eq_ignore_ascii_case(s)
                    || (*role == Self::DefaultAdmin && s.eq_ignore_ascii_case("default_admin"))
            })
            .ok_or_else(|| Error::UnknownRole(s.to_owned()))
    }
}

/// An invoice as stored by the `InvoiceNFT` contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub amount: U256,
    pub advance_amount: U256,
    /// Basis points.
    pub interest_rate: U256,
    /// Unix seconds.
    pub issue_date: U256,
    /// Unix seconds.
    pub due_date: U256,
    pub exporter: Address,
    pub buyer_country: String,
    pub document_hash: String,
    pub status: InvoiceStatus,
    pub shipment_verified: bool,
}

impl TryFrom<InvoiceNFT::Invoice> for Invoice {
    type Error = Error;

    fn try_from(raw: InvoiceNFT::Invoice) -> Result<Self> {
        Ok(Self {
            invoice_number: raw.invoiceNumber,
            amount: raw.amount,
            advance_amount: raw.advanceAmount,
            interest_rate: raw.interestRate,
            issue_date: raw.issueDate,
            due_date: raw.dueDate,
            exporter: raw.exporter,
            buyer_country: raw.buyerCountry,
            document_hash: raw.documentHash,
            status: InvoiceStatus::try_from(raw.status)?,
            shipment_verified: raw.shipmentVerified,
        })
    }
}

impl TryFrom<InvoiceNFT::invoicesReturn> for Invoice {
    type Error = Error;

    fn try_from(raw: InvoiceNFT::invoicesReturn) -> Result<Self> {
        Ok(Self {
            invoice_number: raw.invoiceNumber,
            amount: raw.amount,
            advance_amount: raw.advanceAmount,
            interest_rate: raw.interestRate,
            issue_date: raw.issueDate,
            due_date: raw.dueDate,
            exporter: raw.exporter,
            buyer_country: raw.buyerCountry,
            document_hash: raw.documentHash,
            status: InvoiceStatus::try_from(raw.status)?,
            shipment_verified: raw.shipmentVerified,
        })
    }
}

/// A funding pool as stored by the `InvoicePool` contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub token_id: U256,
    pub target_amount: U256,
    pub funded_amount: U256,
    pub investor_count: U256,
    pub interest_rate: U256,
    pub due_date: U256,
    pub exporter: Address,
    pub status: PoolStatus,
    pub opened_at: U256,
    pub filled_at: U256,
    pub disbursed_at: U256,
    pub closed_at: U256,
}

impl Pool {
    /// Amount still accepted before the pool is filled.
    #[must_use]
    pub fn remaining_capacity(&self) -> U256 {
        self.target_amount.saturating_sub(self.funded_amount)
    }
}

impl TryFrom<InvoicePool::Pool> for Pool {
    type Error = Error;

    fn try_from(raw: InvoicePool::Pool) -> Result<Self> {
        Ok(Self {
            token_id: raw.tokenId,
            target_amount: raw.targetAmount,
            funded_amount: raw.fundedAmount,
            investor_count: raw.investorCount,
            interest_rate: raw.interestRate,
            due_date: raw.dueDate,
            exporter: raw.exporter,
            status: PoolStatus::try_from(raw.status)?,
            opened_at: raw.openedAt,
            filled_at: raw.filledAt,
            disbursed_at: raw.disbursedAt,
            closed_at: raw.closedAt,
        })
    }
}

impl TryFrom<InvoicePool::poolsReturn> for Pool {
    type Error = Error;

    fn try_from(raw: InvoicePool::poolsReturn) -> Result<Self> {
        Ok(Self {
            token_id: raw.tokenId,
            target_amount: raw.targetAmount,
            funded_amount: raw.fundedAmount,
            investor_count: raw.investorCount,
            interest_rate: raw.interestRate,
            due_date: raw.dueDate,
            exporter: raw.exporter,
            status: PoolStatus::try_from(raw.status)?,
            opened_at: raw.openedAt,
            filled_at: raw.filledAt,
            disbursed_at: raw.disbursedAt,
            closed_at: raw.closedAt,
        })
    }
}

/// A single investor position in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub investor: Address,
    pub amount: U256,
    pub expected_return: U256,
    pub actual_return: U256,
    pub claimed: bool,
    pub invested_at: U256,
}

impl From<InvoicePool::Investment> for Investment {
    fn from(raw: InvoicePool::Investment) -> Self {
        Self {
            investor: raw.investor,
            amount: raw.amount,
            expected_return: raw.expectedReturn,
            actual_return: raw.actualReturn,
            claimed: raw.claimed,
            invested_at: raw.investedAt,
        }
    }
}

impl From<InvoicePool::poolInvestmentsReturn> for Investment {
    fn from(raw: InvoicePool::poolInvestmentsReturn) -> Self {
        Self {
            investor: raw.investor,
            amount: raw.amount,
            expected_return: raw.expectedReturn,
            actual_return: raw.actualReturn,
            claimed: raw.claimed,
            invested_at: raw.investedAt,
        }
    }
}

/// Arguments of `InvoiceNFT.mintInvoice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintInvoiceRequest {
    /// Receiver of the token, normally the exporter.
    pub to: Address,
    pub invoice_number: String,
    pub amount: U256,
    pub advance_amount: U256,
    /// Basis points, `1000` is 10%.
    pub interest_rate: U256,
    pub issue_date: U256,
    pub due_date: U256,
    pub buyer_country: String,
    pub document_hash: String,
    /// Token URI pointing at the metadata document.
    pub uri: String,
}

impl From<MintInvoiceRequest> for InvoiceNFT::mintInvoiceCall {
    fn from(request: MintInvoiceRequest) -> Self {
        Self {
            to: request.to,
            invoiceNumber: request.invoice_number,
            amount: request.amount,
            advanceAmount: request.advance_amount,
            interestRate: request.interest_rate,
            issueDate: request.issue_date,
            dueDate: request.due_date,
            buyerCountry: request.buyer_country,
            documentHash: request.document_hash,
            uri: request.uri,
        }
    }
}

/// A buyer repayment distributed over the investors of a pool.
///
/// `investor_returns` is ordered like the pool's investments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repayment {
    pub total_amount: U256,
    pub investor_returns: Vec<U256>,
}

/// Summary of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl From<&TransactionReceipt> for TxOutcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            // Receipts report gas as u128; no block gas limit comes close to u64::MAX
            gas_used: u64::try_from(receipt.gas_used).unwrap_or(u64::MAX),
        }
    }
}

/// Result of a successful `mintInvoice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedInvoice {
    pub token_id: U256,
    #[serde(flatten)]
    pub outcome: TxOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_status_codes() {
        for (code, status) in InvoiceStatus::ALL.into_iter().enumerate() {
            let code = u8::try_from(code).unwrap();
            assert_eq!(InvoiceStatus::try_from(code).unwrap(), status);
            assert_eq!(u8::from(status), code);
        }
        assert!(matches!(
            InvoiceStatus::try_from(5),
            Err(Error::UnknownStatus { kind: "invoice", code: 5 })
        ));
    }

    #[test]
    fn pool_status_codes() {
        assert_eq!(PoolStatus::try_from(2).unwrap(), PoolStatus::Disbursed);
        assert_eq!(u8::from(PoolStatus::Defaulted), 4);
        assert!(PoolStatus::try_from(u8::MAX).is_err());
    }

    #[test]
    fn status_from_str() {
        assert_eq!("funded".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Funded);
        assert_eq!("REPAID".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Repaid);
        assert_eq!("3".parse::<PoolStatus>().unwrap(), PoolStatus::Closed);
        assert!("settled".parse::<PoolStatus>().is_err());
        assert!("9".parse::<PoolStatus>().is_err());
    }

    #[test]
    fn role_parsing() {
        assert_eq!("MINTER_ROLE".parse::<Role>().unwrap(), Role::Minter);
        assert_eq!("oracle".parse::<Role>().unwrap(), Role::Oracle);
        assert_eq!("default_admin".parse::<Role>().unwrap(), Role::DefaultAdmin);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::DefaultAdmin);
        assert!(matches!(
            "burner".parse::<Role>(),
            Err(Error::UnknownRole(name)) if name == "burner"
        ));
    }

    #[test]
    fn role_ids() {
        assert_eq!(Role::DefaultAdmin.id(), B256::ZERO);
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(B256::repeat_byte(1)), None);
    }

    #[test]
    fn invoice_mirror_rejects_unknown_status() {
        let raw = InvoiceNFT::Invoice {
            invoiceNumber: "INV-7".into(),
            amount: U256::from(1_000_000_u64),
            advanceAmount: U256::from(800_000_u64),
            interestRate: U256::from(1000),
            issueDate: U256::from(1_700_000_000_u64),
            dueDate: U256::from(1_707_776_000_u64),
            exporter: Address::repeat_byte(0x11),
            buyerCountry: "DE".into(),
            documentHash: "QmHash".into(),
            status: 1,
            shipmentVerified: true,
        };

        let invoice = Invoice::try_from(raw.clone()).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Funded);
        assert_eq!(invoice.invoice_number, "INV-7");
        assert!(invoice.shipment_verified);

        let broken = InvoiceNFT::Invoice { status: 7, ..raw };
        assert!(Invoice::try_from(broken).is_err());
    }

    #[test]
    fn pool_remaining_capacity_saturates() {
        let raw = InvoicePool::Pool {
            tokenId: U256::from(1),
            targetAmount: U256::from(100),
            fundedAmount: U256::from(150),
            investorCount: U256::from(2),
            interestRate: U256::from(1000),
            dueDate: U256::ZERO,
            exporter: Address::ZERO,
            status: 1,
            openedAt: U256::ZERO,
            filledAt: U256::ZERO,
            disbursedAt: U256::ZERO,
            closedAt: U256::ZERO,
        };
        let pool = Pool::try_from(raw).unwrap();
        assert_eq!(pool.status, PoolStatus::Filled);
        assert_eq!(pool.remaining_capacity(), U256::ZERO);
    }

    #[test]
    fn pool_getter_and_mapping_decode_alike() {
        use alloy_sol_types::{SolCall, SolValue};

        let raw = InvoicePool::Pool {
            tokenId: U256::from(12),
            targetAmount: U256::from(8_000_000_000_u64),
            fundedAmount: U256::from(2_500_000_000_u64),
            investorCount: U256::from(3),
            interestRate: U256::from(1000),
            dueDate: U256::from(1_709_251_200_u64),
            exporter: Address::repeat_byte(0x22),
            status: 0,
            openedAt: U256::from(1_704_067_200_u64),
            filledAt: U256::ZERO,
            disbursedAt: U256::ZERO,
            closedAt: U256::ZERO,
        };
        let data = (raw,).abi_encode_params();

        let decoded = InvoicePool::getPoolCall::abi_decode_returns(&data, true).unwrap();
        let pool = Pool::try_from(decoded._0).unwrap();
        assert_eq!(pool.token_id, U256::from(12));
        assert_eq!(pool.status, PoolStatus::Open);
        assert_eq!(pool.remaining_capacity(), U256::from(5_500_000_000_u64));

        // The public mapping returns the same static fields as a flat tuple
        let mapping = InvoicePool::poolsCall::abi_decode_returns(&data, true).unwrap();
        assert_eq!(Pool::try_from(mapping).unwrap(), pool);
    }

    #[test]
    fn mint_request_maps_every_argument() {
        let request = MintInvoiceRequest {
            to: Address::repeat_byte(0xaa),
            invoice_number: "INV-2024-001".into(),
            amount: U256::from(10_000_000_000_u64),
            advance_amount: U256::from(8_000_000_000_u64),
            interest_rate: U256::from(1000),
            issue_date: U256::from(1),
            due_date: U256::from(2),
            buyer_country: "US".into(),
            document_hash: "0xdoc".into(),
            uri: "ipfs://meta".into(),
        };
        let call = InvoiceNFT::mintInvoiceCall::from(request.clone());
        assert_eq!(call.to, request.to);
        assert_eq!(call.invoiceNumber, request.invoice_number);
        assert_eq!(call.advanceAmount, request.advance_amount);
        assert_eq!(call.dueDate, request.due_date);
        assert_eq!(call.uri, request.uri);
    }
}
