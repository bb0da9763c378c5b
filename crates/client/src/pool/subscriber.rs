use alloy_provider::Provider;
use alloy_transport::Transport;
use receiv3_bindings::InvoicePool;

use crate::error::Result;
use crate::events::{DecodedLog, EventQuery, InvoicePoolEvent, LogSubscriber};

/// Event queries and streams for `InvoicePool`.
pub type PoolSubscriber<T, P> = LogSubscriber<T, P, InvoicePoolEvent>;

impl<T, P> LogSubscriber<T, P, InvoicePoolEvent>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    pub async fn pools_created(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::PoolCreated>>> {
        self.query_event(query).await
    }

    pub async fn pools_filled(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::PoolFilled>>> {
        self.query_event(query).await
    }

    pub async fn investments(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::InvestmentRecorded>>> {
        self.query_event(query).await
    }

    pub async fn disbursements(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::DisbursementRecorded>>> {
        self.query_event(query).await
    }

    pub async fn repayments(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::RepaymentRecorded>>> {
        self.query_event(query).await
    }

    pub async fn excess_repayments(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::ExcessRepaymentRecorded>>> {
        self.query_event(query).await
    }

    pub async fn investor_returns(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::InvestorReturnRecorded>>> {
        self.query_event(query).await
    }

    pub async fn pools_defaulted(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::PoolDefaulted>>> {
        self.query_event(query).await
    }

    pub async fn pools_closed(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoicePool::PoolClosed>>> {
        self.query_event(query).await
    }
}
