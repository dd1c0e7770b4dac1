//! Legacy index endpoints
//!
//! Flat listing kept for older front ends. Categories go in as a list or
//! comma string and always come back as a list.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use super::common::{Created, Listing};
use crate::db::{IndexEntry, NewIndexEntry};
use crate::http::error::ApiError;
use crate::http::extractors::JsonObject;
use crate::http::server::AppState;
use crate::models::BodyFields;

#[derive(Debug, Serialize)]
pub struct IndexEntryResponse {
    pub id: String,
    pub img: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub categories: Vec<String>,
    pub prod: bool,
}

impl From<IndexEntry> for IndexEntryResponse {
    fn from(e: IndexEntry) -> Self {
        Self {
            id: e.id,
            img: e.img,
            title: e.title,
            summary: e.summary,
            categories: e.categories,
            prod: e.prod,
        }
    }
}

/// GET /index
async fn list_index(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Listing<IndexEntryResponse>>, ApiError> {
    let entries = state.index.list().await?;
    Ok(Json(Listing::new(
        entries.into_iter().map(IndexEntryResponse::from).collect(),
    )))
}

/// POST /index
async fn create_index_entry(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<Created<String>>), ApiError> {
    let fields = BodyFields::new(&body);
    let entry = NewIndexEntry::new(
        fields.optional_str("id")?,
        fields.required_str("img")?,
        fields.required_str("title")?,
        fields.required_str("abstract")?,
        fields.required_categories("categories")?,
        fields.required_bool("prod")?,
    );

    let id = state.index.create(entry).await?;

    tracing::info!(entry_id = %id, "index entry created");
    Ok((
        StatusCode::CREATED,
        Json(Created::new("index entry created", id)),
    ))
}

/// Index routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/index", get(list_index).post(create_index_entry))
}
