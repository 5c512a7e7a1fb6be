pub mod account;
pub mod analytics;
pub mod auth;
pub mod customer;
pub mod invoice;
pub mod product;
pub mod stock_in;
