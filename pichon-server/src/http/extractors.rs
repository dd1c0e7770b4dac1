//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::ApiError;
use crate::models::ValidationError;

/// Extract a post id from the path.
///
/// An id that is not a UUID cannot name a post, so it is a 404 rather
/// than a validation error.
pub struct PostId(pub Uuid);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound {
                resource: "post",
                id: String::new(),
            })?;

        let uuid = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound {
            resource: "post",
            id,
        })?;

        Ok(Self(uuid))
    }
}

/// Extract query parameters.
///
/// A value that does not parse is a 400 in the usual error body.
pub struct ListQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ListQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "query",
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(params))
    }
}

/// Extract a JSON object body.
///
/// Fields are read one by one afterwards so a missing field is reported
/// by name.
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value): Json<Value> = Json::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: rejection.body_text(),
            })
        })?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ApiError::Validation(ValidationError::MalformedBody {
                reason: "expected an object".to_string(),
            })),
        }
    }
}
