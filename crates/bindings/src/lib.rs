//! Contract bindings for the Receiv3 invoice-financing protocol.
//!
//! Both interfaces mirror the deployed ABIs exactly, so call selectors and
//! event topics produced here are the ones the live contracts expect.

pub mod invoice_nft;
pub mod invoice_pool;
pub mod roles;

pub use invoice_nft::InvoiceNFT;
pub use invoice_pool::InvoicePool;
