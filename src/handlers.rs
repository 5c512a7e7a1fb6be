// src/handlers.rs

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod customers;
pub mod documents;
pub mod mock;
pub mod oauth;
pub mod products;
pub mod sales;
pub mod stock_in;
