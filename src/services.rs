pub mod account_service;
pub mod analytics_service;
pub mod auth;
pub mod cart;
pub mod customer_service;
pub mod document_service;
pub mod mock_auth;
pub mod oauth;
pub mod product_service;
pub mod sales_service;
pub mod session;
pub mod stock_in_service;
#[cfg(test)]
pub mod test_support;
