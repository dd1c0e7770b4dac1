//! Success envelopes shared by all resources
//!
//! Every body carries `"status": "success"` next to its payload.

use serde::Serialize;

const SUCCESS: &str = "success";

/// `{status, data, count}` for collection reads
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub status: &'static str,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> Listing<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            status: SUCCESS,
            count: data.len(),
            data,
        }
    }
}

/// `{status, data}` for single reads
#[derive(Debug, Serialize)]
pub struct Item<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Item<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: SUCCESS,
            data,
        }
    }
}

/// `{status, message}` for writes that return nothing else
#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS,
            message: message.into(),
        }
    }
}

/// `{status, message, id, slug?}` for creations
#[derive(Debug, Serialize)]
pub struct Created<I> {
    pub status: &'static str,
    pub message: String,
    pub id: I,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl<I> Created<I> {
    pub fn new(message: impl Into<String>, id: I) -> Self {
        Self {
            status: SUCCESS,
            message: message.into(),
            id,
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: String) -> Self {
        self.slug = Some(slug);
        self
    }
}

/// Request helpers for router tests
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::db::MemoryStore;
    use crate::http::server::{build_router, cors_layer, AppState};
    use crate::newsletter::MockMailingList;
    use crate::config::HttpConfig;

    pub struct TestApp {
        pub router: Router,
        pub store: MemoryStore,
        pub newsletter: Arc<MockMailingList>,
    }

    impl TestApp {
        pub fn new() -> Self {
            let store = MemoryStore::new();
            let newsletter = Arc::new(MockMailingList::new());
            let state = AppState::in_memory(store.clone(), newsletter.clone());
            Self {
                router: build_router(state, cors_layer(&HttpConfig::default())),
                store,
                newsletter,
            }
        }

        pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(json) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(json.to_string())),
                None => builder.body(Body::empty()),
            }
            .unwrap();

            self.raw(request).await
        }

        pub async fn raw(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, json)
        }

        pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Method::GET, uri, None).await
        }

        pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            self.send(Method::POST, uri, Some(body)).await
        }

        pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            self.send(Method::PATCH, uri, Some(body)).await
        }

        pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Method::DELETE, uri, None).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_counts_items() {
        let body = serde_json::to_value(Listing::new(vec![1, 2, 3])).unwrap();
        assert_eq!(body, json!({"status": "success", "data": [1, 2, 3], "count": 3}));
    }

    #[test]
    fn created_omits_missing_slug() {
        let body = serde_json::to_value(Created::new("done", 7)).unwrap();
        assert_eq!(body, json!({"status": "success", "message": "done", "id": 7}));

        let body = serde_json::to_value(Created::new("done", 7).with_slug("x_y".into())).unwrap();
        assert_eq!(body["slug"], "x_y");
    }
}
