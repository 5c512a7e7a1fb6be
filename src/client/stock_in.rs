// src/client/stock_in.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    client::{ApiClient, ClientError, ClientResult},
    models::{
        product::{BulkCostPayload, CostUpdateEntry, Product, UpdateCostPayload},
        stock_in::{CreateStockInPayload, StockInDetail, StockInLinePayload},
    },
};

/// Mesmo teto que o servidor aceita por linha.
pub const MAX_LINE_QUANTITY: i32 = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub note: Option<String>,
}

/// Como a segunda fase (custos) terminou.
#[derive(Debug, Clone, PartialEq)]
pub enum CostSync {
    Bulk,
    PerItem { updated: usize, failed: Vec<Uuid> },
}

#[derive(Debug, Clone)]
pub struct StockInOutcome {
    pub batch: StockInDetail,
    pub cost_sync: CostSync,
}

/// Formulário de recebimento: uma linha por produto.
#[derive(Debug, Clone)]
pub struct StockInDraft {
    pub supplier: String,
    pub expected_date: NaiveDate,
    pub note: Option<String>,
    lines: Vec<DraftLine>,
}

impl StockInDraft {
    pub fn new(supplier: impl Into<String>, expected_date: NaiveDate) -> Self {
        Self { supplier: supplier.into(), expected_date, note: None, lines: Vec::new() }
    }

    /// Produto repetido soma a quantidade e fica com o último custo informado.
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: i32,
        unit_cost: Decimal,
        note: Option<String>,
    ) -> ClientResult<()> {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                    ClientError::Validation(format!("Quantity for {} is too large.", product.name))
                })?;
                line.unit_cost = unit_cost;
                if note.is_some() {
                    line.note = note;
                }
            }
            None => self.lines.push(DraftLine {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity,
                unit_cost,
                note,
            }),
        }
        Ok(())
    }

    pub fn update_line(&mut self, product_id: Uuid, quantity: i32, unit_cost: Decimal) -> bool {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                line.unit_cost = unit_cost;
                true
            }
            None => false,
        }
    }

    pub fn remove_line(&mut self, product_id: Uuid) -> Option<DraftLine> {
        let index = self.lines.iter().position(|l| l.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.supplier.trim().is_empty() {
            return Err(ClientError::Validation("Supplier is required.".into()));
        }
        if self.lines.is_empty() {
            return Err(ClientError::Validation("Add at least one product.".into()));
        }
        for line in &self.lines {
            if line.quantity <= 0 {
                return Err(ClientError::Validation(format!(
                    "Quantity for {} must be greater than zero.",
                    line.product_name
                )));
            }
            if line.quantity > MAX_LINE_QUANTITY {
                return Err(ClientError::Validation(format!(
                    "Quantity for {} cannot exceed {}.",
                    line.product_name, MAX_LINE_QUANTITY
                )));
            }
            if line.unit_cost.is_sign_negative() && !line.unit_cost.is_zero() {
                return Err(ClientError::Validation(format!(
                    "Cost for {} cannot be negative.",
                    line.product_name
                )));
            }
        }
        Ok(())
    }

    pub fn to_payload(&self) -> CreateStockInPayload {
        CreateStockInPayload {
            supplier: self.supplier.trim().to_string(),
            expected_date: self.expected_date,
            note: self.note.clone(),
            items: self
                .lines
                .iter()
                .map(|l| StockInLinePayload {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_cost: l.unit_cost,
                    note: l.note.clone(),
                })
                .collect(),
        }
    }

    /// Fase 1 grava o lote; fase 2 atualiza o custo dos produtos.
    /// Falha na fase 2 nunca derruba o envio: só muda o `CostSync`.
    pub async fn submit(&self, client: &ApiClient) -> ClientResult<StockInOutcome> {
        self.validate()?;

        let batch: StockInDetail = client.post("/warehouse/stock-in", &self.to_payload()).await?;
        let cost_sync = self.sync_costs(client).await;

        Ok(StockInOutcome { batch, cost_sync })
    }

    async fn sync_costs(&self, client: &ApiClient) -> CostSync {
        let bulk = BulkCostPayload {
            items: self
                .lines
                .iter()
                .map(|l| CostUpdateEntry { product_id: l.product_id, cost: l.unit_cost })
                .collect(),
        };

        match client.put::<Vec<Product>, _>("/warehouse/products/cost", &bulk).await {
            Ok(_) => return CostSync::Bulk,
            Err(e) => tracing::warn!("Atualização de custo em lote falhou, tentando item a item: {}", e),
        }

        let mut updated = 0;
        let mut failed = Vec::new();
        for line in &self.lines {
            let path = format!("/warehouse/products/{}/cost", line.product_id);
            match client
                .patch::<Product, _>(&path, &UpdateCostPayload { cost: line.unit_cost })
                .await
            {
                Ok(_) => updated += 1,
                Err(e) => {
                    tracing::warn!("Custo de {} não atualizado: {}", line.product_name, e);
                    failed.push(line.product_id);
                }
            }
        }
        CostSync::PerItem { updated, failed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::serve;
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{patch, post, put},
        Json, Router,
    };
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            company: "Siam Beverage Co.".into(),
            name: name.into(),
            category: "Drinks".into(),
            price: Decimal::new(15, 0),
            cost: Decimal::new(9, 0),
            stock_quantity: 10,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn draft(products: &[&Product]) -> StockInDraft {
        let mut draft = StockInDraft::new("Siam Beverage Co.", NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        for p in products {
            draft.add_line(p, 12, Decimal::new(925, 2), None).unwrap();
        }
        draft
    }

    fn batch_json(payload: &Value) -> Value {
        let id = Uuid::new_v4();
        json!({
            "id": id,
            "batchNumber": "SI-000001",
            "supplier": payload["supplier"],
            "expectedDate": payload["expectedDate"],
            "status": "pending",
            "note": null,
            "createdBy": null,
            "receivedAt": null,
            "createdAt": Utc::now(),
            "items": []
        })
    }

    type Calls = Arc<Mutex<Vec<String>>>;

    /// `bulk_ok`: o PUT em lote responde 200; `fail_patch`: produto cujo PATCH falha.
    fn warehouse(calls: Calls, bulk_ok: bool, fail_patch: Option<Uuid>) -> Router {
        let c1 = calls.clone();
        let c2 = calls.clone();
        let c3 = calls;
        Router::new()
            .route(
                "/warehouse/stock-in",
                post(move |Json(payload): Json<Value>| async move {
                    c1.lock().unwrap().push("create".into());
                    (StatusCode::CREATED, Json(batch_json(&payload)))
                }),
            )
            .route(
                "/warehouse/products/cost",
                put(move || async move {
                    c2.lock().unwrap().push("bulk".into());
                    if bulk_ok {
                        (StatusCode::OK, Json(json!([])))
                    } else {
                        (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
                    }
                }),
            )
            .route(
                "/warehouse/products/{id}/cost",
                patch(move |Path(id): Path<Uuid>| async move {
                    c3.lock().unwrap().push(format!("patch {id}"));
                    if Some(id) == fail_patch {
                        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Product not found." })));
                    }
                    let mut p = product("patched");
                    p.id = id;
                    (StatusCode::OK, Json(serde_json::to_value(p).unwrap()))
                }),
            )
    }

    #[test]
    fn same_product_merges_into_one_line() {
        let cola = product("Cola");
        let mut draft = draft(&[&cola]);
        draft.add_line(&cola, 3, Decimal::new(950, 2), Some("dented".into())).unwrap();

        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].quantity, 15);
        assert_eq!(draft.lines()[0].unit_cost, Decimal::new(950, 2));
        assert_eq!(draft.lines()[0].note.as_deref(), Some("dented"));

        assert!(draft.update_line(cola.id, 5, Decimal::ONE));
        assert_eq!(draft.lines()[0].quantity, 5);
        assert!(draft.remove_line(cola.id).is_some());
        assert!(draft.lines().is_empty());
    }

    #[test]
    fn merging_past_i32_max_is_rejected() {
        let cola = product("Cola");
        let mut draft = draft(&[&cola]);
        let err = draft.add_line(&cola, i32::MAX, Decimal::ONE, None).unwrap_err();

        assert!(matches!(err, ClientError::Validation(ref m) if m.contains("too large")));
        assert_eq!(draft.lines()[0].quantity, 12);
        assert_eq!(draft.lines()[0].unit_cost, Decimal::new(925, 2));
    }

    #[test]
    fn validation_rules() {
        let cola = product("Cola");

        let mut no_supplier = draft(&[&cola]);
        no_supplier.supplier = "  ".into();
        assert!(matches!(no_supplier.validate(), Err(ClientError::Validation(_))));

        assert!(draft(&[]).validate().is_err());

        let mut zero = draft(&[&cola]);
        zero.update_line(cola.id, 0, Decimal::ONE);
        assert!(zero.validate().is_err());

        let mut huge = draft(&[&cola]);
        huge.update_line(cola.id, MAX_LINE_QUANTITY + 1, Decimal::ONE);
        assert!(huge.validate().is_err());

        let mut negative = draft(&[&cola]);
        negative.update_line(cola.id, 1, Decimal::new(-1, 0));
        assert!(negative.validate().is_err());

        assert!(draft(&[&cola]).validate().is_ok());
    }

    #[tokio::test]
    async fn bulk_cost_update_when_available() {
        let calls: Calls = Default::default();
        let client = serve(warehouse(calls.clone(), true, None)).await;
        let (cola, water) = (product("Cola"), product("Water"));

        let outcome = draft(&[&cola, &water]).submit(&client).await.unwrap();

        assert_eq!(outcome.cost_sync, CostSync::Bulk);
        assert_eq!(outcome.batch.batch.batch_number, "SI-000001");
        assert_eq!(*calls.lock().unwrap(), vec!["create", "bulk"]);
    }

    #[tokio::test]
    async fn falls_back_to_per_item_updates() {
        let calls: Calls = Default::default();
        let (cola, water) = (product("Cola"), product("Water"));
        let client = serve(warehouse(calls.clone(), false, Some(water.id))).await;

        let outcome = draft(&[&cola, &water]).submit(&client).await.unwrap();

        assert_eq!(outcome.cost_sync, CostSync::PerItem { updated: 1, failed: vec![water.id] });
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[1], "bulk");
        assert_eq!(calls[2], format!("patch {}", cola.id));
    }

    #[tokio::test]
    async fn invalid_drafts_never_reach_the_server() {
        let calls: Calls = Default::default();
        let client = serve(warehouse(calls.clone(), true, None)).await;

        let err = draft(&[]).submit(&client).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(calls.lock().unwrap().is_empty());
    }
}
