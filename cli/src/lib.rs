pub mod commands;
pub mod signer;
