// src/models/stock_in.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_not_negative};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stock_in_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum StockInStatus {
    Pending,
    Received,
    Cancelled,
}

// Lote de recebimento (cabeçalho)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockInBatch {
    pub id: Uuid,
    #[schema(example = "SI-000007")]
    pub batch_number: String,
    #[schema(example = "Siam Beverage Co.")]
    pub supplier: String,
    #[schema(value_type = String, format = Date, example = "2026-10-20")]
    pub expected_date: NaiveDate,
    pub status: StockInStatus,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
    pub received_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockInItem {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    #[schema(example = 48)]
    pub quantity: i32,
    #[schema(example = 9.25)]
    pub unit_cost: Decimal,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockInDetail {
    #[serde(flatten)]
    pub batch: StockInBatch,
    pub items: Vec<StockInItem>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockInLinePayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 100000, message = "Quantidade fora do limite."))]
    pub quantity: i32,
    #[validate(custom(function = "validate_not_negative"))]
    pub unit_cost: Decimal,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockInPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub supplier: String,
    #[schema(value_type = String, format = Date, example = "2026-10-20")]
    pub expected_date: NaiveDate,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    #[validate(length(min = 1, message = "Informe ao menos um item."), nested)]
    pub items: Vec<StockInLinePayload>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockInQuery {
    /// `pending` devolve a lista de recebimentos pendentes
    pub status: Option<StockInStatus>,
}
