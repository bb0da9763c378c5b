use alloy_primitives::{Address, FixedBytes, B256, U256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use async_trait::async_trait;

use super::{InvoicePoolClient, CONTRACT};
use crate::error::{ContractResultExt, Error, Result};
use crate::types::{Investment, Pool, Role};

/// Read-only calls on `InvoicePool`.
#[async_trait]
pub trait PoolReader: Send + Sync {
    async fn get_pool(&self, token_id: U256) -> Result<Pool>;
    /// Reads the public `pools` mapping directly.
    async fn pools(&self, token_id: U256) -> Result<Pool>;
    /// Investments in the order they were recorded.
    async fn get_pool_investments(&self, token_id: U256) -> Result<Vec<Investment>>;
    async fn pool_investment_at(&self, token_id: U256, index: U256) -> Result<Investment>;
    async fn get_remaining_capacity(&self, token_id: U256) -> Result<U256>;
    async fn get_investor_pools(&self, investor: Address) -> Result<Vec<U256>>;
    async fn investor_pool_at(&self, investor: Address, index: U256) -> Result<U256>;
    /// Platform fee in basis points.
    async fn platform_fee_bps(&self) -> Result<U256>;
    async fn platform_wallet(&self) -> Result<Address>;
    /// Address of the `InvoiceNFT` the pool is bound to.
    async fn invoice_nft(&self) -> Result<Address>;
    async fn paused(&self) -> Result<bool>;
    async fn has_role(&self, role: B256, account: Address) -> Result<bool>;
    async fn get_role_admin(&self, role: B256) -> Result<B256>;
    async fn role_id(&self, role: Role) -> Result<B256>;
    async fn supports_interface(&self, interface_id: FixedBytes<4>) -> Result<bool>;
}

#[async_trait]
impl<T, P> PoolReader for InvoicePoolClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    async fn get_pool(&self, token_id: U256) -> Result<Pool> {
        let raw = self
            .instance
            .getPool(token_id)
            .call()
            .await
            .for_contract(CONTRACT)?
            ._0;
        Pool::try_from(raw)
    }

    async fn pools(&self, token_id: U256) -> Result<Pool> {
        let raw = self
            .instance
            .pools(token_id)
            .call()
            .await
            .for_contract(CONTRACT)?;
        Pool::try_from(raw)
    }

    async fn get_pool_investments(&self, token_id: U256) -> Result<Vec<Investment>> {
        let raw = self
            .instance
            .getPoolInvestments(token_id)
            .call()
            .await
            .for_contract(CONTRACT)?
            ._0;
        Ok(raw.into_iter().map(Investment::from).collect())
    }

    async fn pool_investment_at(&self, token_id: U256, index: U256) -> Result<Investment> {
        self.instance
            .poolInvestments(token_id, index)
            .call()
            .await
            .map(Investment::from)
            .for_contract(CONTRACT)
    }

    async fn get_remaining_capacity(&self, token_id: U256) -> Result<U256> {
        self.instance
            .getRemainingCapacity(token_id)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn get_investor_pools(&self, investor: Address) -> Result<Vec<U256>> {
        self.instance
            .getInvestorPools(investor)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn investor_pool_at(&self, investor: Address, index: U256) -> Result<U256> {
        self.instance
            .investorPools(investor, index)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn platform_fee_bps(&self) -> Result<U256> {
        self.instance
            .platformFeeBps()
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn platform_wallet(&self) -> Result<Address> {
        self.instance
            .platformWallet()
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }

    async fn invoice_nft(&self) -> Result<Address> {
        self.instance
            .invoiceNFT()
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
            Role::Operator => self.instance.OPERATOR_ROLE().call().await.map(|r| r._0),
            Role::Minter | Role::Oracle => {
                return Err(Error::UnsupportedRole {
                    role,
                    contract: CONTRACT,
                })
            }
        };
        id.for_contract(CONTRACT)
    }

    async fn supports_interface(&self, interface_id: FixedBytes<4>) -> Result<bool> {
        self.instance
            .supportsInterface(interface_id)
            .call()
            .await
            .map(|r| r._0)
            .for_contract(CONTRACT)
    }
}
