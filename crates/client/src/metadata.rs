//! ERC-721 metadata documents for invoice NFTs.
//!
//! The document is uploaded (e.g. to IPFS) by the caller and its URI is
//! passed as `uri` when minting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One entry of the `attributes` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
}

impl NftAttribute {
    fn new(trait_type: &str, value: impl Into<Value>) -> Self {
        Self {
            trait_type: trait_type.to_owned(),
            value: value.into(),
            display_type: None,
        }
    }

    fn display(mut self, display_type: &str) -> Self {
        self.display_type = Some(display_type.to_owned());
        self
    }
}

/// Off-chain invoice details rendered into the metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceMetadataInput {
    pub invoice_id: String,
    pub exporter_id: String,
    pub invoice_number: String,
    /// Face value in currency units.
    pub amount: f64,
    pub currency: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub buyer_name: String,
    pub buyer_country: String,
    pub document_hash: Option<String>,
    /// Percent, e.g. `10.0`.
    pub interest_rate: Option<f64>,
    pub advance_amount: Option<f64>,
}

/// The JSON document behind an invoice token URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    pub attributes: Vec<NftAttribute>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

impl NftMetadata {
    #[must_use]
    pub fn for_invoice(input: &InvoiceMetadataInput) -> Self {
        let mut attributes = vec![
            NftAttribute::new("Invoice Number", input.invoice_number.as_str()),
            NftAttribute::new("Amount", input.amount).display("number"),
            NftAttribute::new("Currency", input.currency.as_str()),
            NftAttribute::new(
                "Issue Date",
                input.issue_date.format(DATE_FORMAT).to_string(),
            )
            .display("date"),
            NftAttribute::new("Due Date", input.due_date.format(DATE_FORMAT).to_string())
                .display("date"),
            NftAttribute::new("Buyer", input.buyer_name.as_str()),
            NftAttribute::new("Buyer Country", input.buyer_country.as_str()),
        ];

        if let Some(rate) = input.interest_rate {
            attributes.push(NftAttribute::new("Interest Rate", rate).display("number"));
        }
        if let Some(advance) = input.advance_amount {
            attributes.push(NftAttribute::new("Advance Amount", advance).display("number"));
        }

        let properties = BTreeMap::from([
            ("invoice_id".to_owned(), Value::from(input.invoice_id.as_str())),
            ("exporter_id".to_owned(), Value::from(input.exporter_id.as_str())),
            (
                "document_hash".to_owned(),
                Value::from(input.document_hash.clone()),
            ),
        ]);

        Self {
            name: format!("Invoice #{}", input.invoice_number),
            description: format!(
                "NFT representing invoice {} from exporter to {}",
                input.invoice_number, input.buyer_name
            ),
            image: None,
            external_url: None,
            attributes,
            properties,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> InvoiceMetadataInput {
        InvoiceMetadataInput {
            invoice_id: "6f1c2a4e-0d7b-4b8e-9a51-3c2f0f6d1a10".into(),
            exporter_id: "b1d0e2f3-1111-4222-8333-944455566677".into(),
            invoice_number: "INV-2024-001".into(),
            amount: 10_000.0,
            currency: "USD".into(),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            buyer_name: "Acme GmbH".into(),
            buyer_country: "DE".into(),
            document_hash: Some("QmDocHash".into()),
            interest_rate: None,
            advance_amount: None,
        }
    }

    #[test]
    fn base_attributes() {
        let metadata = NftMetadata::for_invoice(&input());
        assert_eq!(metadata.name, "Invoice #INV-2024-001");
        assert_eq!(
            metadata.description,
            "NFT representing invoice INV-2024-001 from exporter to Acme GmbH"
        );

        let traits: Vec<_> = metadata
            .attributes
            .iter()
            .map(|a| a.trait_type.as_str())
            .collect();
        assert_eq!(
            traits,
            [
                "Invoice Number",
                "Amount",
                "Currency",
                "Issue Date",
                "Due Date",
                "Buyer",
                "Buyer Country"
            ]
        );
        assert_eq!(metadata.attributes[3].value, Value::from("2024-01-15"));
        assert_eq!(metadata.attributes[3].display_type.as_deref(), Some("date"));
        assert_eq!(metadata.attributes[2].display_type, None);
    }

    #[test]
    fn optional_attributes_are_appended() {
        let mut input = input();
        input.interest_rate = Some(10.0);
        input.advance_amount = Some(8_000.0);

        let metadata = NftMetadata::for_invoice(&input);
        assert_eq!(metadata.attributes.len(), 9);
        assert_eq!(metadata.attributes[7].trait_type, "Interest Rate");
        assert_eq!(metadata.attributes[8].trait_type, "Advance Amount");
        assert_eq!(metadata.attributes[8].value, Value::from(8_000.0));
    }

    #[test]
    fn json_layout() {
        let mut input = input();
        input.document_hash = None;
        let document = NftMetadata::for_invoice(&input).to_json().unwrap();
        let json: Value = serde_json::from_str(&document).unwrap();

        assert!(json.get("image").is_none());
        assert_eq!(json["attributes"][1]["trait_type"], "Amount");
        assert_eq!(json["attributes"][1]["value"], 10_000.0);
        assert_eq!(json["attributes"][1]["display_type"], "number");
        assert!(json["attributes"][0].get("display_type").is_none());
        assert_eq!(json["properties"]["invoice_id"], "6f1c2a4e-0d7b-4b8e-9a51-3c2f0f6d1a10");
        assert!(json["properties"]["document_hash"].is_null());
    }
}
