//! Category endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use super::common::{Created, Listing};
use crate::db::{Category, NewCategory};
use crate::http::error::ApiError;
use crate::http::extractors::JsonObject;
use crate::http::server::AppState;
use crate::models::BodyFields;

/// GET /categories
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Listing<Category>>, ApiError> {
    let categories = state.categories.list().await?;
    Ok(Json(Listing::new(categories)))
}

/// POST /categories
///
/// The category name comes from `title`; its slug is derived from it.
async fn create_category(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<Created<i32>>), ApiError> {
    let fields = BodyFields::new(&body);
    let category = NewCategory::from_title(fields.required_str("title")?, fields.required_i32("order")?);
    let slug = category.slug.clone();

    let id = state.categories.create(category).await?;

    tracing::info!(category_id = id, %slug, "category created");
    Ok((
        StatusCode::CREATED,
        Json(Created::new("category created", id).with_slug(slug)),
    ))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/categories", get(list_categories).post(create_category))
}
