//! Admin API: CRUD over route rules, the site default and catalog backgrounds.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::AppState;

pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(list_routes).post(create_route))
        .route("/admin/routes/{id}", get(get_route).put(update_route).delete(delete_route))
        .route(
            "/admin/site-default",
            get(get_site_default).put(put_site_default).delete(delete_site_default),
        )
        .route("/admin/categories", get(list_categories))
        .route("/admin/categories/{slug}", put(put_category).delete(delete_category))
        .route("/admin/products", get(list_products))
        .route("/admin/products/{slug}", put(put_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
