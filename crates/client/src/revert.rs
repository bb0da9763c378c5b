//! Decoding of revert data returned by the node.

use core::fmt;

use alloy_primitives::{Bytes, Selector, U256};
use alloy_sol_types::{Panic, Revert, SolError, SolInterface};
use alloy_transport::{RpcError, TransportError};
use receiv3_bindings::InvoiceNFT::InvoiceNFTErrors;
use receiv3_bindings::InvoicePool::InvoicePoolErrors;

/// The contract a call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    InvoiceNft,
    InvoicePool,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvoiceNft => f.write_str("InvoiceNFT"),
            Self::InvoicePool => f.write_str("InvoicePool"),
        }
    }
}

/// Why a contract call reverted.
#[derive(Debug)]
pub enum RevertReason {
    /// `Error(string)`, raised by `require` with a message.
    Message(String),
    /// `Panic(uint256)` with the compiler's panic code.
    Panic(U256),
    InvoiceNft(InvoiceNFTErrors),
    InvoicePool(InvoicePoolErrors),
    /// Revert data that matches none of the known errors. `selector` is
    /// `None` when the revert carried no data at all.
    Unknown { selector: Option<Selector> },
}

impl RevertReason {
    /// Decodes raw revert data, trying the standard `Error`/`Panic`
    /// encodings before the custom errors of `contract`.
    #[must_use]
    pub fn decode(data: &[u8], contract: ContractKind) -> Self {
        if let Ok(revert) = Revert::abi_decode(data, true) {
            return Self::Message(revert.reason);
        }
        if let Ok(panic) = Panic::abi_decode(data, true) {
            return Self::Panic(panic.code);
        }

        let custom = match contract {
            ContractKind::InvoiceNft => InvoiceNFTErrors::abi_decode(data, true)
                .map(Self::InvoiceNft)
                .ok(),
            ContractKind::InvoicePool => InvoicePoolErrors::abi_decode(data, true)
                .map(Self::InvoicePool)
                .ok(),
        };

        custom.unwrap_or_else(|| Self::Unknown {
            selector: data.get(..4).map(Selector::from_slice),
        })
    }

    /// The caller lacks the role required by the function.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvoiceNft(InvoiceNFTErrors::AccessControlUnauthorizedAccount(_))
                | Self::InvoicePool(InvoicePoolErrors::AccessControlUnauthorizedAccount(_))
        )
    }

    /// The contract is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(
            self,
            Self::InvoiceNft(InvoiceNFTErrors::EnforcedPause(_))
                | Self::InvoicePool(InvoicePoolErrors::EnforcedPause(_))
        )
    }
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Panic(code) => write!(f, "panic with code {code:#x}"),
            Self::InvoiceNft(err) => write!(f, "{err:?}"),
            Self::InvoicePool(err) => write!(f, "{err:?}"),
            Self::Unknown {
                selector: Some(selector),
            } => write!(f, "unknown error with selector {selector}"),
            Self::Unknown { selector: None } => f.write_str("no revert data"),
        }
    }
}

/// A decoded on-chain revert.
#[derive(Debug, thiserror::Error)]
#[error("{contract} reverted: {reason}")]
pub struct ContractRevert {
    pub contract: ContractKind,
    pub reason: RevertReason,
    /// Raw revert data as returned by the node.
    pub data: Bytes,
}

impl ContractRevert {
    #[must_use]
    pub fn new(contract: ContractKind, data: Bytes) -> Self {
        Self {
            contract,
            reason: RevertReason::decode(&data, contract),
            data,
        }
    }

    /// Extracts a revert from an RPC error response.
    ///
    /// Nodes report reverts either with the encoded data in the error
    /// payload or, for plain `require` failures on some clients, only in
    /// the message as `execution reverted: <reason>`.
    pub(crate) fn from_transport(err: &TransportError, contract: ContractKind) -> Option<Self> {
        let RpcError::ErrorResp(payload) = err else {
            return None;
        };

        if let Some(data) = payload.as_revert_data() {
            return Some(Self::new(contract, data));
        }

        let message = payload.message.strip_prefix("execution reverted")?;
        let message = message.trim_start_matches(':').trim();
        let reason = if message.is_empty() {
            RevertReason::Unknown { selector: None }
        } else {
            RevertReason::Message(message.to_owned())
        };

        Some(Self {
            contract,
            reason,
            data: Bytes::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_json_rpc::ErrorPayload;
    use alloy_primitives::{hex, Address, B256};
    use receiv3_bindings::{InvoiceNFT, InvoicePool};

    use super::*;
    use crate::error::{Error, ErrorKind};

    fn rpc_error(json: &str) -> TransportError {
        let payload: ErrorPayload = serde_json::from_str(json).unwrap();
        RpcError::ErrorResp(payload)
    }

    #[test]
    fn error_string() {
        let data = Revert {
            reason: "Invoice number already exists".into(),
        }
        .abi_encode();
        let reason = RevertReason::decode(&data, ContractKind::InvoiceNft);
        assert!(matches!(
            reason,
            RevertReason::Message(ref m) if m == "Invoice number already exists"
        ));
        assert_eq!(reason.to_string(), "Invoice number already exists");
    }

    #[test]
    fn panic_code() {
        let data = Panic {
            code: U256::from(0x11),
        }
        .abi_encode();
        let reason = RevertReason::decode(&data, ContractKind::InvoicePool);
        assert!(matches!(reason, RevertReason::Panic(code) if code == U256::from(0x11)));
        assert_eq!(reason.to_string(), "panic with code 0x11");
    }

    #[test]
    fn custom_nft_error() {
        let data = InvoiceNFT::ERC721NonexistentToken {
            tokenId: U256::from(5),
        }
        .abi_encode();
        assert_eq!(data[..4], hex!("7e273289"));

        match RevertReason::decode(&data, ContractKind::InvoiceNft) {
            RevertReason::InvoiceNft(InvoiceNFTErrors::ERC721NonexistentToken(err)) => {
                assert_eq!(err.tokenId, U256::from(5));
            }
            other => panic!("unexpected reason {other:?}"),
        }
    }

    #[test]
    fn access_control_and_pause() {
        let data = InvoicePool::AccessControlUnauthorizedAccount {
            account: Address::repeat_byte(0x33),
            neededRole: receiv3_bindings::roles::OPERATOR_ROLE,
        }
        .abi_encode();
        let reason = RevertReason::decode(&data, ContractKind::InvoicePool);
        assert!(reason.is_unauthorized());
        assert!(!reason.is_paused());

        let data = InvoiceNFT::EnforcedPause {}.abi_encode();
        let reason = RevertReason::decode(&data, ContractKind::InvoiceNft);
        assert!(reason.is_paused());
        assert!(!reason.is_unauthorized());
    }

    #[test]
    fn foreign_and_empty_data() {
        // Only the pool declares the reentrancy guard error
        let data = InvoicePool::ReentrancyGuardReentrantCall {}.abi_encode();
        let reason = RevertReason::decode(&data, ContractKind::InvoiceNft);
        assert!(matches!(
            reason,
            RevertReason::Unknown { selector: Some(s) } if s == Selector::from(hex!("3ee5aeb5"))
        ));

        let reason = RevertReason::decode(&[], ContractKind::InvoiceNft);
        assert!(matches!(reason, RevertReason::Unknown { selector: None }));
        assert_eq!(reason.to_string(), "no revert data");
    }

    #[test]
    fn revert_data_in_rpc_error() {
        let data = hex::encode_prefixed(
            InvoiceNFT::AccessControlUnauthorizedAccount {
                account: Address::repeat_byte(0x01),
                neededRole: B256::ZERO,
            }
            .abi_encode(),
        );
        let err = rpc_error(&format!(
            r#"{{"code":3,"message":"execution reverted","data":"{data}"}}"#
        ));

        let err = Error::from_transport(err, ContractKind::InvoiceNft);
        assert_eq!(err.kind(), ErrorKind::Revert);
        let revert = err.as_revert().unwrap();
        assert_eq!(revert.contract, ContractKind::InvoiceNft);
        assert!(revert.reason.is_unauthorized());
        assert!(!revert.data.is_empty());
    }

    #[test]
    fn revert_message_without_data() {
        let err = rpc_error(
            r#"{"code":-32000,"message":"execution reverted: Invoice not fundable"}"#,
        );
        let err = Error::from_transport(err, ContractKind::InvoicePool);
        let revert = err.as_revert().unwrap();
        assert!(matches!(
            revert.reason,
            RevertReason::Message(ref m) if m == "Invoice not fundable"
        ));
        assert_eq!(err.to_string(), "InvoicePool reverted: Invoice not fundable");
    }

    #[test]
    fn other_rpc_errors_stay_transport() {
        let err = rpc_error(
            r#"{"code":-32000,"message":"insufficient funds for gas * price + value"}"#,
        );
        let err = Error::from_transport(err, ContractKind::InvoiceNft);
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.as_revert().is_none());
    }
}
