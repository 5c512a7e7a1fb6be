// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_not_negative};

// --- Produto (catálogo + saldo) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Siam Beverage Co.")]
    pub company: String,
    #[schema(example = "Cola 325ml")]
    pub name: String,
    #[schema(example = "Drinks")]
    pub category: String,
    #[schema(example = 15.0)]
    pub price: Decimal,
    #[schema(example = 9.5)]
    pub cost: Decimal,
    #[schema(example = 120)]
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Ajuste manual (histórico) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub id: Uuid,
    pub product_id: Uuid,
    #[schema(example = -2)]
    pub delta: i32,
    #[schema(example = "Damaged")]
    pub reason: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentResult {
    pub product: Product,
    pub adjustment: StockAdjustment,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub company: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)] // Sem custo informado, assume 0
    pub cost: Decimal,

    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[serde(default)]
    pub stock_quantity: i32,

    #[validate(url(message = "URL de imagem inválida."))]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub company: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub category: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,

    #[validate(url(message = "URL de imagem inválida."))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCostPayload {
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 9.75)]
    pub cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostUpdateEntry {
    pub product_id: Uuid,
    #[validate(custom(function = "validate_not_negative"))]
    pub cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCostPayload {
    #[validate(length(min = 1, message = "Informe ao menos um produto."), nested)]
    pub items: Vec<CostUpdateEntry>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    /// Positivo soma, negativo subtrai
    #[validate(range(min = -100000, max = 100000, message = "Ajuste fora do limite."))]
    #[schema(example = -2)]
    pub delta: i32,

    #[validate(length(min = 1, max = 500, message = "Informe o motivo do ajuste."))]
    #[schema(example = "Damaged")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Busca por nome, categoria ou empresa
    pub q: Option<String>,
    pub category: Option<String>,
}
