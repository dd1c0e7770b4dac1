//! Post endpoints
//!
//! - GET    /posts           list summaries, newest first
//! - GET    /posts/{id}      full post
//! - POST   /posts           create
//! - PATCH  /posts/{id}      partial update of allow-listed fields
//! - DELETE /posts/{id}      remove

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Ack, Created, Item, Listing};
use crate::db::{NewPost, Post, PostFilter, PostSummary};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonObject, ListQuery, PostId};
use crate::http::server::AppState;
use crate::models::{BodyFields, PostPatch, ValidationError};

/// Query parameters for listing posts
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Only published posts when true
    pub published: Option<bool>,
}

/// Post summary as returned by the listing
#[derive(Debug, Serialize)]
pub struct PostSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub thumbnail_url: String,
    pub published_at: DateTime<Utc>,
    pub categories: String,
}

impl From<PostSummary> for PostSummaryResponse {
    fn from(p: PostSummary) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            summary: p.summary,
            thumbnail_url: p.thumbnail_url,
            published_at: p.published_at,
            categories: p.categories,
        }
    }
}

/// Full post
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub thumbnail_url: String,
    pub categories: String,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub content: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            summary: p.summary,
            thumbnail_url: p.thumbnail_url,
            categories: p.categories,
            is_published: p.is_published,
            published_at: p.published_at,
            content: p.content,
        }
    }
}

/// Validate a creation body into a post ready for insertion.
fn new_post_from_body(fields: BodyFields<'_>) -> Result<NewPost, ValidationError> {
    let id = fields
        .optional_str("id")?
        .map(|raw| {
            Uuid::parse_str(&raw).map_err(|e| ValidationError::InvalidFormat {
                field: "id",
                reason: e.to_string(),
            })
        })
        .transpose()?;

    Ok(NewPost::new(
        id,
        fields.required_str("title")?,
        fields.required_str("abstract")?,
        fields.required_str("img")?,
        fields.required_categories("categories")?,
        fields.required_bool("prod")?,
        fields.required_str_or("content", "body")?,
    ))
}

/// GET /posts
async fn list_posts(
    State(state): State<Arc<AppState>>,
    ListQuery(params): ListQuery<ListParams>,
) -> Result<Json<Listing<PostSummaryResponse>>, ApiError> {
    let filter = PostFilter {
        published_only: params.published.unwrap_or(false),
    };
    let posts = state.posts.list(filter).await?;

    Ok(Json(Listing::new(
        posts.into_iter().map(PostSummaryResponse::from).collect(),
    )))
}

/// GET /posts/{id}
async fn get_post(
    State(state): State<Arc<AppState>>,
    PostId(id): PostId,
) -> Result<Json<Item<PostResponse>>, ApiError> {
    let post = state.posts.get(id).await?.ok_or_else(|| ApiError::NotFound {
        resource: "post",
        id: id.to_string(),
    })?;

    Ok(Json(Item::new(PostResponse::from(post))))
}

/// POST /posts
async fn create_post(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<Created<Uuid>>), ApiError> {
    let post = new_post_from_body(BodyFields::new(&body))?;
    let id = state.posts.create(post).await?;

    tracing::info!(post_id = %id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(Created::new("post created", id)),
    ))
}

/// PATCH /posts/{id}
async fn update_post(
    State(state): State<Arc<AppState>>,
    PostId(id): PostId,
    JsonObject(body): JsonObject,
) -> Result<Json<Ack>, ApiError> {
    let patch = PostPatch::from_json(&body)?;

    if !state.posts.update(id, &patch).await? {
        return Err(ApiError::NotFound {
            resource: "post",
            id: id.to_string(),
        });
    }

    tracing::info!(post_id = %id, "post updated");
    Ok(Json(Ack::new("post updated")))
}

/// DELETE /posts/{id}
async fn delete_post(
    State(state): State<Arc<AppState>>,
    PostId(id): PostId,
) -> Result<Json<Ack>, ApiError> {
    if !state.posts.delete(id).await? {
        return Err(ApiError::NotFound {
            resource: "post",
            id: id.to_string(),
        });
    }

    tracing::info!(post_id = %id, "post deleted");
    Ok(Json(Ack::new("post deleted")))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
}
