//! `AccessControl` role identifiers used by both contracts.
//!
//! Every non-admin role id is `keccak256` of the constant's name, matching the
//! `bytes32 public constant X_ROLE = keccak256("X_ROLE")` declarations on chain.

use alloy_primitives::{b256, keccak256, B256};

/// Admin of every other role. `AccessControl` reserves the zero word for it.
pub const DEFAULT_ADMIN_ROLE: B256 = B256::ZERO;

/// May call `mintInvoice` on the NFT contract.
pub const MINTER_ROLE: B256 =
    b256!("9f2df0fed2c77648de5860a4cc508cd0818c85b8b8a1ab4ceeef8d981c8956a6");

/// May verify shipments and update invoice statuses.
pub const ORACLE_ROLE: B256 =
    b256!("68e79a7bf1e0bc45d0a330c573bc367f9cf464fd326078812f301165fbda4ef1");

/// May record pool bookkeeping on the pool contract.
pub const OPERATOR_ROLE: B256 =
    b256!("97667070c54ef182b0f5858b034beac1b6f3089aa2d3188bb1e8929f4fa9b929");

/// Computes the id of a role declared as `keccak256(name)`.
#[must_use]
pub fn role_id(name: &str) -> B256 {
    keccak256(name.as_bytes())
}
