// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Mock ---
        handlers::mock::health,
        handlers::mock::mock_login,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,
        handlers::oauth::google_login,
        handlers::oauth::google_callback,

        // --- Accounts ---
        handlers::accounts::list_accounts,
        handlers::accounts::create_account,
        handlers::accounts::update_account,
        handlers::accounts::delete_account,
        handlers::accounts::toggle_account_status,

        // --- Warehouse ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::update_product_cost,
        handlers::products::bulk_update_cost,
        handlers::products::adjust_stock,

        // --- Stock In ---
        handlers::stock_in::list_batches,
        handlers::stock_in::create_batch,
        handlers::stock_in::get_batch,
        handlers::stock_in::receive_batch,
        handlers::stock_in::cancel_batch,

        // --- Sales ---
        handlers::sales::list_sale_products,
        handlers::sales::quote_cart,
        handlers::sales::checkout,
        handlers::sales::list_invoices,
        handlers::sales::get_invoice,
        handlers::sales::cancel_invoice,
        handlers::documents::invoice_pdf,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Analytics ---
        handlers::analytics::get_summary,
        handlers::analytics::get_monthly_sales,
        handlers::analytics::get_dead_stock,
        handlers::analytics::get_top_products,
        handlers::analytics::get_top_customers,
        handlers::analytics::get_top_companies,
        handlers::analytics::get_leaderboard,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::AccountStatus,
            models::auth::Account,
            models::auth::LoginUserPayload,
            models::auth::SessionUser,
            models::auth::AuthResponse,
            models::auth::MockLoginPayload,
            models::auth::MockLoginResponse,

            // --- Accounts ---
            models::account::CreateAccountPayload,
            models::account::UpdateAccountPayload,
            models::account::AccountSortField,
            models::account::SortOrder,
            models::account::AccountPage,

            // --- Products ---
            models::product::Product,
            models::product::StockAdjustment,
            models::product::AdjustmentResult,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::product::UpdateCostPayload,
            models::product::CostUpdateEntry,
            models::product::BulkCostPayload,
            models::product::AdjustStockPayload,

            // --- Stock In ---
            models::stock_in::StockInStatus,
            models::stock_in::StockInBatch,
            models::stock_in::StockInItem,
            models::stock_in::StockInDetail,
            models::stock_in::StockInLinePayload,
            models::stock_in::CreateStockInPayload,

            // --- Sales ---
            models::invoice::InvoiceStatus,
            models::invoice::Invoice,
            models::invoice::InvoiceItem,
            models::invoice::InvoiceDetail,
            models::invoice::CheckoutLine,
            models::invoice::CheckoutPayload,
            models::invoice::QuotePayload,
            services::cart::CartLine,
            services::cart::CartTotals,
            services::cart::CartQuote,

            // --- Customers ---
            models::customer::Customer,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Analytics ---
            models::analytics::AnalyticsSummary,
            models::analytics::MonthlySalesPoint,
            models::analytics::DeadStockEntry,
            models::analytics::RankedEntry,
        )
    ),
    tags(
        (name = "Mock", description = "Health check e login de demonstração"),
        (name = "Auth", description = "Login, sessão e Google OAuth"),
        (name = "Accounts", description = "Contas e papéis (Role Access)"),
        (name = "Warehouse", description = "Catálogo, custos e ajustes de estoque"),
        (name = "Stock In", description = "Recebimento de mercadoria"),
        (name = "Sales", description = "Terminal de vendas e faturas"),
        (name = "Customers", description = "Cadastro de clientes"),
        (name = "Analytics", description = "Indicadores do painel do dono")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_area_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/login",
            "/auth/google/callback",
            "/admin/accounts/{id}/toggle-status",
            "/warehouse/products/cost",
            "/warehouse/stock-in/{id}/receive",
            "/sale/checkout",
            "/sale/invoices/{id}/pdf",
            "/analytics/leaderboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
