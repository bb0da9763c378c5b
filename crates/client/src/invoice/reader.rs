use alloy_primitives::{Address, FixedBytes, B256, U256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use async_trait::async_trait;

use super::{InvoiceNftClient, CONTRACT};
use crate::error::{ContractResultExt, Error, Result};
use crate::types::{Invoice, Role};

/// Read-only calls on `InvoiceNFT`.
#[async_trait]
pub trait InvoiceReader: Send + Sync {
    async fn get_invoice(&self, token_id: U256) -> Result<Invoice>;
    /// Reads the public `invoices` mapping directly.
    async fn invoices(&self, token_id: U256) -> Result<Invoice>;
    /// Whether the invoice can back a funding pool.
    async fn is_fundable(&self, token_id: U256) -> Result<bool>;
    async fn get_exporter_invoices(&self, exporter: Address) -> Result<Vec<U256>>;
    async fn exporter_invoice_at(&self, exporter: Address, index: U256) -> Result<U256>;
    async fn get_token_id_by_invoice_number(&self, invoice_number: &str) -> Result<U256>;
    async fn invoice_number_to_token_id(&self, invoice_number: &str) -> Result<U256>;
    async fn total_minted(&self) -> Result<U256>;
    async fn token_uri(&self, token_id: U256) -> Result<String>;
    async fn owner_of(&self, token_id: U256) -> Result<Address>;
    async fn balance_of(&self, owner: Address) -> Result<U256>;
    async fn get_approved(&self, token_id: U256) -> Result<Address>;
    async fn is_approved_for_all(&self, owner: Address, operator: Address) -> Result<bool>;
    async fn name(&self) -> Result<String>;
    async fn symbol(&self) -> Result<String>;
    async fn supports_interface(&self, interface_id: FixedBytes<4>) -> Result<bool>;
    async fn paused(&self) -> Result<bool>;
    async fn has_role(&self, role: B256, account: Address) -> Result<bool>;
    async fn get_role_admin(&self, role: B256) -> Result<B256>;
    /// Reads the role id from the contract's `*_ROLE()` getter.
    async fn role_id(&self, role: Role) -> Result<B256>;
}

#[async_trait]
impl<T, P> InvoiceReader for InvoiceNftClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    async fn get_invoice(&self, token_id: U256) -> Result<Invoice> {
        let raw = self
            .instance
            .getInvoice(token_id)
            .call()
            .await
            .for_contract(CONTRACT)?
            ._0;
        Invoice::try_from(raw)
    }

    async fn invoices(&self, token_id: U256) -> Result<Invoice> {
        let raw = self
            .instance
            .invoices(token_id)
            .call()
            .await
            .for_contract(CONTRACT)?;
        Invoice::try_from(raw)
    }

    async fn is_fundable(&self, token_id: U256) -> Result<bool> {
        self.instance
            .isFundable(token_id)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn get_exporter_invoices(&self, exporter: Address) -> Result<Vec<U256>> {
        self.instance
            .getExporterInvoices(exporter)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn exporter_invoice_at(&self, exporter: Address, index: U256) -> Result<U256> {
        self.instance
            .exporterInvoices(exporter, index)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn get_token_id_by_invoice_number(&self, invoice_number: &str) -> Result<U256> {
        self.instance
            .getTokenIdByInvoiceNumber(invoice_number.to_owned())
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn invoice_number_to_token_id(&self, invoice_number: &str) -> Result<U256> {
        self.instance
            .invoiceNumberToTokenId(invoice_number.to_owned())
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn total_minted(&self) -> Result<U256> {
        self.instance
            .totalMinted()
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn token_uri(&self, token_id: U256) -> Result<String> {
        self.instance
            .tokenURI(token_id)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn owner_of(&self, token_id: U256) -> Result<Address> {
        self.instance
            .ownerOf(token_id)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.instance
            .balanceOf(owner)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn get_approved(&self, token_id: U256) -> Result<Address> {
        self.instance
            .getApproved(token_id)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn is_approved_for_all(&self, owner: Address, operator: Address) -> Result<bool> {
        self.instance
            .isApprovedForAll(owner, operator)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn name(&self) -> Result<String> {
        self.instance
            .name()
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn symbol(&self) -> Result<String> {
        self.instance
            .symbol()
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn supports_interface(&self, interface_id: FixedBytes<4>) -> Result<bool> {
        self.instance
            .supportsInterface(interface_id)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn paused(&self) -> Result<bool> {
        self.instance
            .paused()
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn has_role(&self, role: B256, account: Address) -> Result<bool> {
        self.instance
            .hasRole(role, account)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn get_role_admin(&self, role: B256) -> Result<B256> {
        self.instance
            .getRoleAdmin(role)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn role_id(&self, role: Role) -> Result<B256> {
        let id = match role {
            Role::DefaultAdmin => self.instance.DEFAULT_ADMIN_ROLE().call().await.map(|r| r._0),
            Role::Minter => self.instance.MINTER_ROLE().call().await.map(|r| r._0),
            Role::Oracle => self.instance.ORACLE_ROLE().call().await.map(|r| r._0),
            Role::Operator => {
                return Err(Error::UnsupportedRole {
                    role,
                    contract: CONTRACT,
                })
            }
        };
        id.for_contract(CONTRACT)
    }
}
