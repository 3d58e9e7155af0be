use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::background::{BackgroundFields, RouteBackgroundRule, SiteDefaultBackground};
use crate::config::validation::{validate_background, validate_route_rule, validate_slug};
use crate::config::ValidationError;
use crate::http::{ApiError, AppState};
use crate::observability::metrics;
use crate::store::{ProductBackground, StoreError, StoredRule};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub route_rules: usize,
    pub active_route_rules: usize,
    pub categories: usize,
    pub products: usize,
    pub site_default: bool,
}

#[derive(Serialize)]
pub struct CategoryEntry {
    pub slug: String,
    pub background: BackgroundFields,
}

#[derive(Serialize)]
pub struct ProductEntry {
    pub slug: String,
    #[serde(flatten)]
    pub product: ProductBackground,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let snapshot = state.store.snapshot();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        route_rules: snapshot.rule_count(),
        active_route_rules: snapshot.rules().len(),
        categories: snapshot.category_count(),
        products: snapshot.product_count(),
        site_default: snapshot.site_default().is_some(),
    })
}

// Route rules

pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<StoredRule>> {
    Json(state.store.list_rules())
}

pub async fn get_route(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<StoredRule>, ApiError> {
    Ok(Json(state.store.get_rule(id)?))
}

pub async fn create_route(
    State(state): State<AppState>,
    Json(rule): Json<RouteBackgroundRule>,
) -> Result<(StatusCode, Json<StoredRule>), ApiError> {
    validate_route_rule(&rule)?;
    let stored = state.store.insert_rule(rule);
    metrics::record_admin_write("route_rule");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(rule): Json<RouteBackgroundRule>,
) -> Result<Json<StoredRule>, ApiError> {
    validate_route_rule(&rule)?;
    let stored = state.store.update_rule(id, rule)?;
    metrics::record_admin_write("route_rule");
    Ok(Json(stored))
}

pub async fn delete_route(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.store.delete_rule(id)?;
    metrics::record_admin_write("route_rule");
    Ok(StatusCode::NO_CONTENT)
}

// Site default

pub async fn get_site_default(State(state): State<AppState>) -> Json<Option<SiteDefaultBackground>> {
    Json(state.store.site_default())
}

pub async fn put_site_default(
    State(state): State<AppState>,
    Json(background): Json<SiteDefaultBackground>,
) -> Result<Json<SiteDefaultBackground>, ApiError> {
    validate_background(&background, "site_default")?;
    state.store.set_site_default(background.clone());
    metrics::record_admin_write("site_default");
    Ok(Json(background))
}

pub async fn delete_site_default(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.store.clear_site_default()?;
    metrics::record_admin_write("site_default");
    Ok(StatusCode::NO_CONTENT)
}

// Catalog

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryEntry>> {
    let entries = state
        .store
        .list_categories()
        .into_iter()
        .map(|(slug, background)| CategoryEntry { slug, background })
        .collect();
    Json(entries)
}

pub async fn put_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(background): Json<BackgroundFields>,
) -> Result<Json<CategoryEntry>, ApiError> {
    validate_slug(&slug, "slug")?;
    validate_background(&background, "category")?;
    state.store.put_category(&slug, background.clone());
    metrics::record_admin_write("category");
    Ok(Json(CategoryEntry { slug, background }))
}

pub async fn delete_category(State(state): State<AppState>, Path(slug): Path<String>) -> Result<StatusCode, ApiError> {
    state.store.delete_category(&slug)?;
    metrics::record_admin_write("category");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<ProductEntry>> {
    let entries = state
        .store
        .list_products()
        .into_iter()
        .map(|(slug, product)| ProductEntry { slug, product })
        .collect();
    Json(entries)
}

pub async fn put_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(product): Json<ProductBackground>,
) -> Result<Json<ProductEntry>, ApiError> {
    validate_slug(&slug, "slug")?;
    validate_background(&product.background, "product.background")?;
    state.store.put_product(&slug, product.clone()).map_err(|e| match e {
        StoreError::CategoryNotFound(category) => ApiError::Validation(vec![ValidationError::UnknownCategory {
            field: "product.category".to_string(),
            slug: category,
        }]),
        other => other.into(),
    })?;
    metrics::record_admin_write("product");
    Ok(Json(ProductEntry { slug, product }))
}

pub async fn delete_product(State(state): State<AppState>, Path(slug): Path<String>) -> Result<StatusCode, ApiError> {
    state.store.delete_product(&slug)?;
    metrics::record_admin_write("product");
    Ok(StatusCode::NO_CONTENT)
}
