use alloy_provider::Provider;
use alloy_transport::Transport;
use receiv3_bindings::InvoiceNFT;

use crate::error::Result;
use crate::events::{DecodedLog, EventQuery, InvoiceNftEvent, LogSubscriber};

/// Event queries and streams for `InvoiceNFT`.
pub type InvoiceSubscriber<T, P> = LogSubscriber<T, P, InvoiceNftEvent>;

impl<T, P> LogSubscriber<T, P, InvoiceNftEvent>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    pub async fn invoice_minted(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoiceNFT::InvoiceMinted>>> {
        self.query_event(query).await
    }

    pub async fn status_changed(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoiceNFT::InvoiceStatusChanged>>> {
        self.query_event(query).await
    }

    pub async fn shipment_verified(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoiceNFT::ShipmentVerified>>> {
        self.query_event(query).await
    }

    pub async fn invoice_burned(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoiceNFT::InvoiceBurned>>> {
        self.query_event(query).await
    }

    pub async fn transfers(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoiceNFT::Transfer>>> {
        self.query_event(query).await
    }

    pub async fn role_granted(
        &self,
        query: EventQuery,
    ) -> Result<Vec<DecodedLog<InvoiceNFT::RoleGranted>>> {
        self.query_event(query).await
    }
}
