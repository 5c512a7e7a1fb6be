// src/router.rs

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// CORS restrito à origem do frontend, com cookies.
fn cors_layer(frontend_base: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT_LANGUAGE])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_base) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("Origem do frontend inválida para CORS: {}", frontend_base);
            layer
        }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_public = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/google", get(handlers::oauth::google_login))
        .route("/google/callback", get(handlers::oauth::google_callback));

    let auth_private = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let admin_routes = Router::new()
        .route(
            "/accounts",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route(
            "/accounts/{id}",
            put(handlers::accounts::update_account).delete(handlers::accounts::delete_account),
        )
        .route(
            "/accounts/{id}/toggle-status",
            post(handlers::accounts::toggle_account_status),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let warehouse_routes = Router::new()
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/products/cost", put(handlers::products::bulk_update_cost))
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/products/{id}/cost", patch(handlers::products::update_product_cost))
        .route("/products/{id}/adjust", post(handlers::products::adjust_stock))
        .route(
            "/stock-in",
            get(handlers::stock_in::list_batches).post(handlers::stock_in::create_batch),
        )
        .route("/stock-in/{id}", get(handlers::stock_in::get_batch))
        .route("/stock-in/{id}/receive", post(handlers::stock_in::receive_batch))
        .route("/stock-in/{id}/cancel", post(handlers::stock_in::cancel_batch))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let sale_routes = Router::new()
        .route("/products", get(handlers::sales::list_sale_products))
        .route("/cart/quote", post(handlers::sales::quote_cart))
        .route("/checkout", post(handlers::sales::checkout))
        .route("/invoices", get(handlers::sales::list_invoices))
        .route("/invoices/{id}", get(handlers::sales::get_invoice))
        .route("/invoices/{id}/cancel", post(handlers::sales::cancel_invoice))
        .route("/invoices/{id}/pdf", get(handlers::documents::invoice_pdf))
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let analytics_routes = Router::new()
        .route("/summary", get(handlers::analytics::get_summary))
        .route("/monthly-sales", get(handlers::analytics::get_monthly_sales))
        .route("/dead-stock", get(handlers::analytics::get_dead_stock))
        .route("/top-products", get(handlers::analytics::get_top_products))
        .route("/top-customers", get(handlers::analytics::get_top_customers))
        .route("/top-companies", get(handlers::analytics::get_top_companies))
        .route("/leaderboard", get(handlers::analytics::get_leaderboard))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let cors = cors_layer(&app_state.config.frontend_base());

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::mock::health))
        .route("/login", post(handlers::mock::mock_login))
        .nest("/auth", auth_public.merge(auth_private))
        .nest("/admin", admin_routes)
        .nest("/warehouse", warehouse_routes)
        .nest("/sale", sale_routes)
        .nest("/analytics", analytics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
