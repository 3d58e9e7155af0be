//! Public endpoints.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::background::{ResolvedBackground, Tier};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::EntityRef;

/// Query string for `GET /api/background`.
#[derive(Debug, Deserialize)]
pub struct BackgroundQuery {
    /// Navigation path, used as given.
    pub path: String,

    /// Viewport width; when present the response carries `image_url`.
    pub width: Option<u32>,

    /// Category slug of the page's entity.
    pub category: Option<String>,

    /// Product slug of the page's entity.
    pub product: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BackgroundResponse {
    #[serde(flatten)]
    pub background: ResolvedBackground,

    /// Which precedence level decided.
    pub tier: Tier,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl BackgroundQuery {
    fn entity(&self) -> Result<Option<EntityRef>, ApiError> {
        match (&self.category, &self.product) {
            (Some(_), Some(_)) => Err(ApiError::BadRequest(
                "category and product cannot both be given".to_string(),
            )),
            (Some(slug), None) => Ok(Some(EntityRef::Category(slug.clone()))),
            (None, Some(slug)) => Ok(Some(EntityRef::Product(slug.clone()))),
            (None, None) => Ok(None),
        }
    }
}

/// Resolve the background for a page.
pub async fn get_background(
    State(state): State<AppState>,
    Query(query): Query<BackgroundQuery>,
) -> Result<Json<BackgroundResponse>, ApiError> {
    let entity = query.entity()?;
    let (background, tier) = state.store.resolve(&query.path, entity.as_ref());
    metrics::record_resolution(tier);

    let image_url = query
        .width
        .and_then(|width| background.image_for_width(width))
        .map(str::to_string);

    tracing::debug!(
        path = %query.path,
        entity = ?entity,
        tier = %tier,
        width = ?query.width,
        "Background served"
    );

    Ok(Json(BackgroundResponse {
        background,
        tier,
        image_url,
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
