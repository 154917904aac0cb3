//! # Routes
//!
//! Axum router for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET  /products - Public product list (search/category/sort)
///   - GET  /products/featured - Featured products (max 12)
///   - GET  /products/{slug} - Single product
/// - Admin:
///   - GET/POST /admin/categories
///   - GET  /admin/products
///   - GET  /admin/enquiries
///   - GET  /admin/orders/export - CSV or JSON
///   - PUT  /admin/users/{id}
/// - Auth:
///   - GET  /auth/check-email, /auth/session, /auth/user
///   - POST /auth/create-profile, /auth/demo-login, /auth/login, /auth/logout
/// - Checkout:
///   - POST /checkout/create-order, /checkout/create-payment,
///          /checkout/update-profile, /create-payment-intent
/// - Orders:
///   - GET  /orders, /orders/{orderNumber}
/// - Misc:
///   - GET/PUT /profile, POST /enquiries, GET /news, POST /webhook/stripe
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_routes = Router::new()
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route("/products", get(handlers::products::admin_list))
        .route("/enquiries", get(handlers::enquiries::admin_list))
        .route("/orders/export", get(handlers::orders::export))
        .route("/users/{id}", put(handlers::users::update));

    let auth_routes = Router::new()
        .route("/check-email", get(handlers::auth::check_email))
        .route("/create-profile", post(handlers::auth::create_profile))
        .route("/demo-login", post(handlers::auth::demo_login))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/session", get(handlers::auth::session))
        .route("/user", get(handlers::auth::user));

    let checkout_routes = Router::new()
        .route("/create-order", post(handlers::checkout::create_order))
        .route("/create-payment", post(handlers::checkout::create_payment))
        .route("/update-profile", post(handlers::checkout::update_profile));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/admin", admin_routes)
        .nest("/auth", auth_routes)
        .nest("/checkout", checkout_routes)
        .route(
            "/create-payment-intent",
            post(handlers::checkout::create_payment_intent),
        )
        .route("/products", get(handlers::products::list))
        .route("/products/featured", get(handlers::products::featured))
        .route("/products/{slug}", get(handlers::products::by_slug))
        .route("/orders", get(handlers::orders::list))
        .route("/orders/{order_number}", get(handlers::orders::by_number))
        .route(
            "/profile",
            get(handlers::profile::get).put(handlers::profile::update),
        )
        .route("/enquiries", post(handlers::enquiries::create))
        .route("/news", get(handlers::news::search))
        .route("/webhook/stripe", post(handlers::webhook::stripe))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
