// src/models/invoice.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Completed,
    Cancelled,
}

// Cabeçalho da fatura (com o nome do cliente já resolvido no SELECT)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    #[schema(example = "INV-000042")]
    pub order_number: String,
    pub customer_id: Option<Uuid>,
    #[schema(example = "Niran Wongsa")]
    pub customer_name: Option<String>,
    pub sales_account_id: Option<Uuid>,
    #[schema(example = 1500.0)]
    pub subtotal: Decimal,
    #[schema(example = 105.0)]
    pub vat_amount: Decimal,
    #[schema(example = 1605.0)]
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Option<Uuid>,
    #[schema(example = "Cola 325ml")]
    pub product_name: String,
    #[schema(example = 10)]
    pub quantity: i32,
    #[schema(example = 15.0)]
    pub unit_price: Decimal,
    #[schema(example = 9.5)]
    pub unit_cost: Decimal,
    #[schema(example = 150.0)]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub header: Invoice,
    pub items: Vec<InvoiceItem>,
}

// --- Payloads do terminal de vendas ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 100000, message = "Quantidade fora do limite."))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, message = "O carrinho está vazio."), nested)]
    pub items: Vec<CheckoutLine>,
}

// Orçamento do carrinho: mesmas linhas do checkout, sem cliente
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[validate(length(min = 1, message = "O carrinho está vazio."), nested)]
    pub items: Vec<CheckoutLine>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "snake_case")]
#[into_params(parameter_in = Query)]
pub struct InvoiceQuery {
    pub status: Option<InvoiceStatus>,
    pub customer_id: Option<Uuid>,
    /// Mês no formato `YYYY-MM`
    pub month: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32) -> CheckoutLine {
        CheckoutLine { product_id: Uuid::new_v4(), quantity }
    }

    #[test]
    fn line_quantity_is_bounded() {
        assert!(line(1).validate().is_ok());
        assert!(line(100000).validate().is_ok());
        assert!(line(0).validate().is_err());
        assert!(line(100001).validate().is_err());
        assert!(line(i32::MAX).validate().is_err());
    }

    #[test]
    fn checkout_validates_every_line() {
        let payload = CheckoutPayload { customer_id: None, items: vec![line(2), line(i32::MAX)] };
        let errors = payload.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));

        let empty = QuotePayload { items: vec![] };
        assert!(empty.validate().is_err());
    }
}
