use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One requested line, as supplied by the client. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InvoicedItem {
    pub description: String,
    /// Decimal as a string to avoid floating-point issues, e.g. "2.5"
    #[schema(value_type = String)]
    pub quantity: BigDecimal,
    /// Decimal as a string to avoid floating-point issues, e.g. "9.99"
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
}

/// A priced line in the computed invoice.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InvoiceLine {
    pub description: String,
    #[schema(value_type = String)]
    pub quantity: BigDecimal,
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
    #[schema(value_type = String)]
    pub total: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InvoiceHeader {
    pub number: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TaxLine {
    #[schema(value_type = String)]
    pub rate: BigDecimal,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
}

/// The output of applying a rule-set to the invoiced items. Fields stay
/// unset when no rule produced them. Never mutated after the engine
/// returns it; the renderer and the HTTP response both consume it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InvoiceContext {
    pub header: InvoiceHeader,
    pub items: Vec<InvoiceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub subtotal: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<TaxLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub total: Option<BigDecimal>,
}

impl InvoiceContext {
    /// File name the rendered PDF is saved under: `YYYYMMDD-NNNN-invoice.pdf`.
    pub fn pdf_file_name(&self) -> String {
        format!(
            "{}-{:04}-invoice.pdf",
            self.header.timestamp.format("%Y%m%d"),
            self.header.number
        )
    }
}
