//! Invoice schema types.
//!
//! These structs mirror the schema registered with the hosted extraction
//! agent, one struct per nesting level. Every field is optional: the remote
//! service omits anything it could not read from the document, and absent
//! structure must never fail record construction.
//!
//! Monetary fields are kept as raw JSON values rather than `f64` because the
//! service has been observed returning amounts both as numbers and as
//! strings; coercion is owned by the formatting layer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Information about the seller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seller {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
}

/// Information about the client being billed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

/// Individual line item in the invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_price: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_worth: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_percentage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_worth: Option<Value>,
}

/// VAT summary for a specific VAT percentage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VatSummaryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_percentage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_worth: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_worth: Option<Value>,
}

/// Summary of the invoice amounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vat_summary: Vec<VatSummaryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_net_worth: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_vat: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_gross_worth: Option<Value>,
}

/// Complete invoice as returned by the extraction service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// Issue date as printed on the invoice, formatted MM/DD/YYYY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<Seller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl Invoice {
    /// JSON Schema document handed to the extraction service when the agent
    /// is registered. This is configuration data, not validated locally.
    pub fn data_schema() -> Value {
        json!({
            "type": "object",
            "title": "Invoice",
            "description": "Complete invoice model.",
            "properties": {
                "invoice_number": {"type": "string"},
                "issue_date": {
                    "type": "string",
                    "description": "Formatted as MM/DD/YYYY"
                },
                "seller": {
                    "type": "object",
                    "description": "Information about the seller.",
                    "properties": {
                        "name": {"type": "string"},
                        "address": {"type": "string"},
                        "tax_id": {"type": "string"},
                        "iban": {"type": "string"}
                    }
                },
                "client": {
                    "type": "object",
                    "description": "Information about the client.",
                    "properties": {
                        "name": {"type": "string"},
                        "address": {"type": "string"},
                        "tax_id": {"type": "string"}
                    }
                },
                "items": {
                    "type": "array",
                    "description": "Individual items in the invoice.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "item_number": {"type": "string"},
                            "description": {"type": "string"},
                            "quantity": {"type": "number"},
                            "unit_of_measure": {"type": "string"},
                            "net_price": {"type": "number"},
                            "net_worth": {"type": "number"},
                            "vat_percentage": {"type": "string"},
                            "gross_worth": {"type": "number"}
                        }
                    }
                },
                "summary": {
                    "type": "object",
                    "description": "Summary of the invoice amounts.",
                    "properties": {
                        "vat_summary": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "vat_percentage": {"type": "string"},
                                    "net_worth": {"type": "number"},
                                    "vat": {"type": "number"},
                                    "gross_worth": {"type": "number"}
                                }
                            }
                        },
                        "total_net_worth": {"type": "number"},
                        "total_vat": {"type": "number"},
                        "total_gross_worth": {"type": "number"}
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_invoice() {
        let raw = json!({
            "invoice_number": "INV-1",
            "issue_date": "01/15/2024",
            "seller": {"name": "Acme", "address": "1 Main St", "tax_id": "123", "iban": "DE00"},
            "client": {"name": "Globex", "address": "2 Side St", "tax_id": "456"},
            "items": [{
                "item_number": "1",
                "description": "Widget",
                "quantity": 2.0,
                "unit_of_measure": "pcs",
                "net_price": 40.0,
                "net_worth": 80.0,
                "vat_percentage": "10%",
                "gross_worth": 88.0
            }],
            "summary": {
                "vat_summary": [{"vat_percentage": "10%", "net_worth": 80.0, "vat": 8.0, "gross_worth": 88.0}],
                "total_net_worth": 80.0,
                "total_vat": 8.0,
                "total_gross_worth": 88.0
            }
        });

        let invoice: Invoice = serde_json::from_value(raw).unwrap();
        assert_eq!(invoice.invoice_number.as_deref(), Some("INV-1"));
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.summary.unwrap().vat_summary.len(), 1);
    }

    #[test]
    fn test_deserialize_sparse_invoice() {
        // The service omits anything it could not read.
        let invoice: Invoice = serde_json::from_value(json!({"seller": {}, "summary": {}})).unwrap();
        assert!(invoice.invoice_number.is_none());
        assert!(invoice.seller.unwrap().name.is_none());
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn test_string_amounts_are_accepted() {
        let invoice: Invoice = serde_json::from_value(json!({
            "summary": {"total_gross_worth": "1,234.50 EUR"}
        }))
        .unwrap();
        let total = invoice.summary.unwrap().total_gross_worth.unwrap();
        assert!(total.is_string());
    }

    #[test]
    fn test_data_schema_shape() {
        let schema = Invoice::data_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["items"]["items"]["properties"]["gross_worth"].is_object());
    }
}
