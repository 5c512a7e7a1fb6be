pub mod account_repo;
pub use account_repo::AccountRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod stock_in_repo;
pub use stock_in_repo::StockInRepository;
pub mod analytics_repo;
pub use analytics_repo::AnalyticsRepository;

/// Termo de busca → padrão `%termo%` para `LIKE ... ESCAPE '\'`, em minúsculas.
/// `%`, `_` e `\` digitados pelo usuário valem como texto.
pub fn contains_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_in_the_search_are_literal() {
        assert_eq!(contains_pattern(Some("50%")).as_deref(), Some("%50\\%%"));
        assert_eq!(contains_pattern(Some(" Cola_325 ")).as_deref(), Some("%cola\\_325%"));
        assert_eq!(contains_pattern(Some("a\\b")).as_deref(), Some("%a\\\\b%"));
        assert!(contains_pattern(Some("   ")).is_none());
        assert!(contains_pattern(None).is_none());
    }
}
