use alloy_primitives::TxHash;

use crate::revert::{ContractKind, ContractRevert};

/// Errors returned by the contract clients.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The node could not be reached or answered with an RPC error.
    #[error(transparent)]
    Transport(#[from] alloy_transport::TransportError),
    /// Call data or return data did not match the ABI.
    #[error(transparent)]
    SolTypes(#[from] alloy_sol_types::Error),
    #[error(transparent)]
    DynAbi(#[from] alloy_dyn_abi::Error),
    /// The contract reverted the call during simulation or gas estimation.
    #[error(transparent)]
    Revert(Box<ContractRevert>),
    /// The transaction was mined but its receipt carries a failed status.
    /// `revert` is the reason recovered by replaying the call, if any.
    #[error(
        "transaction {tx_hash} reverted on chain{}",
        revert_suffix(.revert.as_deref())
    )]
    Reverted {
        tx_hash: TxHash,
        revert: Option<Box<ContractRevert>>,
    },
    #[error(transparent)]
    PendingTransaction(#[from] alloy_provider::PendingTransactionError),
    /// A mined receipt did not contain the event the operation relies on.
    #[error("receipt of {tx_hash} has no {event} log")]
    MissingEvent {
        tx_hash: TxHash,
        event: &'static str,
    },
    #[error("unknown {kind} status code {code}")]
    UnknownStatus { kind: &'static str, code: u8 },
    #[error("unknown role `{0}`")]
    UnknownRole(String),
    /// The role exists but the contract does not define it.
    #[error("{role} is not defined on {contract}")]
    UnsupportedRole {
        role: crate::types::Role,
        contract: ContractKind,
    },
    #[error(transparent)]
    Contract(alloy_contract::Error),
    #[error("chain id mismatch: configured {expected}, node reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Abi,
    Revert,
    Other,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::PendingTransaction(_) => ErrorKind::Transport,
            Self::SolTypes(_) | Self::DynAbi(_) => ErrorKind::Abi,
            Self::Revert(_) | Self::Reverted { .. } => ErrorKind::Revert,
            _ => ErrorKind::Other,
        }
    }

    /// Returns the decoded revert, if the node rejected the call or a
    /// replay of a failed transaction recovered one.
    #[must_use]
    pub fn as_revert(&self) -> Option<&ContractRevert> {
        match self {
            Self::Revert(revert)
            | Self::Reverted {
                revert: Some(revert),
                ..
            } => Some(revert.as_ref()),
            _ => None,
        }
    }

    /// Classifies a contract call failure, decoding revert data against
    /// the custom errors of `contract`.
    pub(crate) fn from_contract(err: alloy_contract::Error, contract: ContractKind) -> Self {
        match err {
            alloy_contract::Error::TransportError(err) => Self::from_transport(err, contract),
            alloy_contract::Error::AbiError(err) => Self::DynAbi(err),
            alloy_contract::Error::PendingTransactionError(err) => Self::PendingTransaction(err),
            other => Self::Contract(other),
        }
    }

    pub(crate) fn from_transport(
        err: alloy_transport::TransportError,
        contract: ContractKind,
    ) -> Self {
        match ContractRevert::from_transport(&err, contract) {
            Some(revert) => revert.into(),
            None => Self::Transport(err),
        }
    }
}

fn revert_suffix(revert: Option<&ContractRevert>) -> String {
    revert.map_or_else(String::new, |revert| format!(": {}", revert.reason))
}

impl From<ContractRevert> for Error {
    fn from(revert: ContractRevert) -> Self {
        Self::Revert(Box::new(revert))
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Attaches contract context to raw `alloy_contract` results.
pub(crate) trait ContractResultExt<T> {
    fn for_contract(self, contract: ContractKind) -> Result<T>;
}

impl<T> ContractResultExt<T> for core::result::Result<T, alloy_contract::Error> {
    fn for_contract(self, contract: ContractKind) -> Result<T> {
        self.map_err(|err| Error::from_contract(err, contract))
    }
}

#[cfg(test)]
mod tests {
    use alloy_provider::{PendingTransactionError, WatchTxError};

    use super::*;

    #[test]
    fn receipt_timeouts_are_transport_errors() {
        let err = alloy_contract::Error::PendingTransactionError(
            PendingTransactionError::TxWatcher(WatchTxError::Timeout),
        );
        let err = Error::from_contract(err, ContractKind::InvoicePool);
        assert!(matches!(err, Error::PendingTransaction(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.as_revert().is_none());
    }

    #[test]
    fn unknown_contract_errors_stay_other() {
        let err = Error::from_contract(
            alloy_contract::Error::UnknownFunction("getInvoices".into()),
            ContractKind::InvoiceNft,
        );
        assert!(matches!(err, Error::Contract(_)));
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
