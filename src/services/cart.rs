// src/services/cart.rs

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;

/// Multiplicador do IVA usado pelo terminal de vendas (7%).
pub const VAT_MULTIPLIER: Decimal = Decimal::from_parts(107, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    /// `subtotal × 1.07`
    pub total: Decimal,
}

/// Resposta de `POST /sale/cart/quote`: linhas com o preço atual do catálogo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartQuote {
    fn from(cart: &Cart) -> Self {
        Self { lines: cart.lines().to_vec(), totals: cart.totals() }
    }
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl CartTotals {
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let subtotal = round_money(subtotal);
        let total = round_money(subtotal * VAT_MULTIPLIER);
        Self { subtotal, vat_amount: total - subtotal, total }
    }
}

/// Carrinho do terminal de vendas. Uma linha por produto, na ordem em que entrou.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona a linha; se o produto já estiver no carrinho, soma a quantidade
    /// (o preço passa a ser o mais recente).
    ///
    /// Devolve `false` e deixa o carrinho intacto para quantidade `<= 0` ou
    /// soma acima de `i32::MAX`.
    pub fn add(&mut self, line: CartLine) -> bool {
        if line.quantity <= 0 {
            return false;
        }
        match self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => match existing.quantity.checked_add(line.quantity) {
                Some(quantity) => {
                    existing.quantity = quantity;
                    existing.unit_price = line.unit_price;
                    existing.name = line.name;
                    true
                }
                None => false,
            },
            None => {
                self.lines.push(line);
                true
            }
        }
    }

    /// Quantidade `<= 0` remove a linha. Devolve `false` se o produto não estava no carrinho.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove(product_id).is_some();
        }
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product_id: Uuid) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| l.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    pub fn get(&self, product_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    /// Σ preço × quantidade
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total com IVA, calculado como na tela de vendas: `subtotal × 1.07`.
    pub fn vat_total(&self) -> Decimal {
        self.subtotal() * VAT_MULTIPLIER
    }

    pub fn vat_amount(&self) -> Decimal {
        self.vat_total() - self.subtotal()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from_subtotal(self.subtotal())
    }
}
