// src/common/sanitize.rs

//! Coerção defensiva de JSON vindo da rede.
//!
//! Nenhuma função aqui falha: campo ausente, tipo errado ou número não finito
//! viram `0`, `None`, `""` ou lista vazia.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

static NULL: Value = Value::Null;

/// Campo de um objeto, ou `Null` se não existir (ou se `value` nem for objeto).
pub fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

pub fn number_or_none(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn number_or_zero(value: &Value) -> f64 {
    number_or_none(value).unwrap_or(0.0)
}

pub fn text_or_empty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Payload de lista: qualquer coisa que não seja array vira lista vazia.
pub fn list_or_empty(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Agregados SQL (`SUM`, `AVG`) voltam `NULL` quando não há linhas.
pub fn decimal_or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().filter(|n| n.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_numbers_fall_back_to_zero() {
        assert_eq!(number_or_zero(&json!(12.5)), 12.5);
        assert_eq!(number_or_zero(&json!("42")), 42.0);
        assert_eq!(number_or_zero(&json!("abc")), 0.0);
        assert_eq!(number_or_zero(&json!("NaN")), 0.0);
        assert_eq!(number_or_zero(&json!("inf")), 0.0);
        assert_eq!(number_or_zero(&json!(null)), 0.0);
        assert_eq!(number_or_zero(&json!({"v": 1})), 0.0);
        assert_eq!(number_or_zero(&json!([1, 2])), 0.0);
    }

    #[test]
    fn optional_numbers_use_none() {
        assert_eq!(number_or_none(&json!(" 7 ")), Some(7.0));
        assert_eq!(number_or_none(&json!(true)), None);
        assert_eq!(number_or_none(&json!("")), None);
    }

    #[test]
    fn missing_fields_read_as_null() {
        let row = json!({ "name": "Cola" });
        assert!(field(&row, "total").is_null());
        assert_eq!(number_or_zero(field(&row, "total")), 0.0);
        assert!(field(&json!(3), "name").is_null());
        assert_eq!(text_or_empty(field(&row, "name")), "Cola");
        assert_eq!(text_or_empty(field(&row, "missing")), "");
    }

    #[test]
    fn non_array_payloads_become_empty_lists() {
        assert!(list_or_empty(json!({"error": "boom"})).is_empty());
        assert!(list_or_empty(json!(null)).is_empty());
        assert!(list_or_empty(json!("[]")).is_empty());
        assert_eq!(list_or_empty(json!([1, 2, 3])).len(), 3);
    }

    #[test]
    fn null_aggregates_are_zero() {
        assert_eq!(decimal_or_zero(None), Decimal::ZERO);
        assert_eq!(decimal_to_f64(Decimal::new(1999, 2)), 19.99);
    }
}
