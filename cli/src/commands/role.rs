use alloy_primitives::{Address, B256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use clap::Subcommand;
use color_eyre::Result;
use receiv3_client::types::{Role, TxOutcome};
use receiv3_client::{InvoiceReader, InvoiceWriter, PoolReader, PoolWriter, Receiv3Client};
use serde_json::json;

use super::{print_json, Contract};

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    /// Show the role ids and their admin roles.
    List {
        #[arg(long, value_enum)]
        contract: Contract,
    },
    /// Check whether an account holds a role.
    Has {
        #[arg(long, value_enum)]
        contract: Contract,
        /// `admin`, `minter`, `oracle` or `operator`.
        role: Role,
        account: Address,
    },
    Grant {
        #[arg(long, value_enum)]
        contract: Contract,
        role: Role,
        account: Address,
    },
    Revoke {
        #[arg(long, value_enum)]
        contract: Contract,
        role: Role,
        account: Address,
    },
    /// Give up a role held by the signer.
    Renounce {
        #[arg(long, value_enum)]
        contract: Contract,
        role: Role,
        /// Must be the signer's own address.
        account: Address,
    },
}

impl RoleCommand {
    #[must_use]
    pub fn requires_signer(&self) -> bool {
        !matches!(self, Self::List { .. } | Self::Has { .. })
    }
}

enum RoleTx {
    Grant,
    Revoke,
    Renounce,
}

pub async fn execute<T, P>(command: RoleCommand, client: &Receiv3Client<T, P>) -> Result<()>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    match command {
        RoleCommand::List { contract } => {
            let roles: &[Role] = match contract {
                Contract::Nft => &[Role::DefaultAdmin, Role::Minter, Role::Oracle],
                Contract::Pool => &[Role::DefaultAdmin, Role::Operator],
            };
            let mut entries = Vec::with_capacity(roles.len());
            for &role in roles {
                let (id, admin) = match contract {
                    Contract::Nft => {
                        let id = InvoiceReader::role_id(&client.invoice, role).await?;
                        (id, InvoiceReader::get_role_admin(&client.invoice, id).await?)
                    }
                    Contract::Pool => {
                        let id = PoolReader::role_id(&client.pool, role).await?;
                        (id, PoolReader::get_role_admin(&client.pool, id).await?)
                    }
                };
                let admin = Role::from_id(admin)
                    .map_or_else(|| admin.to_string(), |r| r.constant_name().to_owned());
                entries.push(json!({
                    "role": role.constant_name(),
                    "id": id,
                    "admin": admin,
                }));
            }
            print_json(&entries)
        }
        RoleCommand::Has {
            contract,
            role,
            account,
        } => {
            let has_role = match contract {
                Contract::Nft => {
                    let id = InvoiceReader::role_id(&client.invoice, role).await?;
                    InvoiceReader::has_role(&client.invoice, id, account).await?
                }
                Contract::Pool => {
                    let id = PoolReader::role_id(&client.pool, role).await?;
                    PoolReader::has_role(&client.pool, id, account).await?
                }
            };
            print_json(&json!({
                "role": role.constant_name(),
                "account": account,
                "hasRole": has_role,
            }))
        }
        RoleCommand::Grant {
            contract,
            role,
            account,
        } => print_json(&send(client, contract, RoleTx::Grant, role, account).await?),
        RoleCommand::Revoke {
            contract,
            role,
            account,
        } => print_json(&send(client, contract, RoleTx::Revoke, role, account).await?),
        RoleCommand::Renounce {
            contract,
            role,
            account,
        } => print_json(&send(client, contract, RoleTx::Renounce, role, account).await?),
    }
}

async fn send<T, P>(
    client: &Receiv3Client<T, P>,
    contract: Contract,
    tx: RoleTx,
    role: Role,
    account: Address,
) -> Result<TxOutcome>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    let outcome = match contract {
        Contract::Nft => {
            let nft = &client.invoice;
            let id: B256 = InvoiceReader::role_id(nft, role).await?;
            match tx {
                RoleTx::Grant => InvoiceWriter::grant_role(nft, id, account).await?,
                RoleTx::Revoke => InvoiceWriter::revoke_role(nft, id, account).await?,
                RoleTx::Renounce => InvoiceWriter::renounce_role(nft, id, account).await?,
            }
        }
        Contract::Pool => {
            let pool = &client.pool;
            let id: B256 = PoolReader::role_id(pool, role).await?;
            match tx {
                RoleTx::Grant => PoolWriter::grant_role(pool, id, account).await?,
                RoleTx::Revoke => PoolWriter::revoke_role(pool, id, account).await?,
                RoleTx::Renounce => PoolWriter::renounce_role(pool, id, account).await?,
            }
        }
    };
    Ok(outcome)
}
