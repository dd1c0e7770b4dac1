//! Newsletter signup endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use super::common::Ack;
use crate::http::error::ApiError;
use crate::http::extractors::JsonObject;
use crate::http::server::AppState;
use crate::models::{BodyFields, ValidationError};
use crate::newsletter::{ProviderError, Subscriber};

/// POST /subscribe_newsletter
async fn subscribe(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<Json<Ack>, ApiError> {
    let fields = BodyFields::new(&body);
    let email = fields.required_str("email")?;
    if email.trim().is_empty() {
        return Err(ValidationError::Empty { field: "email" }.into());
    }

    let subscriber = Subscriber::new(
        email,
        fields.optional_str("fname")?,
        fields.optional_str("lname")?,
    );

    match state.newsletter.subscribe(&subscriber).await {
        Ok(subscribed) => {
            tracing::info!(
                member_id = subscribed.member_id.as_deref().unwrap_or(""),
                status = %subscribed.status,
                "newsletter subscription forwarded"
            );
            Ok(Json(Ack::new("subscribed to the newsletter")))
        }
        Err(err) => {
            match &err {
                ProviderError::AlreadySubscribed { .. } => {
                    tracing::info!("newsletter address already subscribed")
                }
                ProviderError::Rejected { message } => {
                    tracing::warn!(%message, "newsletter provider rejected subscription")
                }
                ProviderError::Unreachable => {
                    tracing::error!("newsletter provider unreachable")
                }
            }
            Err(err.into())
        }
    }
}

/// Newsletter routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/subscribe_newsletter", post(subscribe))
}
