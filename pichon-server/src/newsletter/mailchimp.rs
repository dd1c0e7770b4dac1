//! Mailchimp Marketing API client
//!
//! Direct REST integration, API v3:
//! - `POST /lists/{list_id}/members` to add a subscriber
//! - `GET /ping` as a credentials check

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{mentions_subscribed, MailingList, ProviderError, Subscribed, Subscriber};

/// Default timeout for provider calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error title Mailchimp uses for an address already on the list
const MEMBER_EXISTS: &str = "Member Exists";

/// Mailchimp connection settings
#[derive(Clone)]
pub struct MailchimpConfig {
    pub api_key: String,
    /// Data-center prefix, e.g. `us21`
    pub data_center: String,
    pub list_id: String,
    pub timeout: Duration,
}

impl fmt::Debug for MailchimpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailchimpConfig")
            .field("api_key", &"<redacted>")
            .field("data_center", &self.data_center)
            .field("list_id", &self.list_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Member creation payload
#[derive(Debug, Serialize)]
struct MemberRequest<'a> {
    email_address: &'a str,
    status: &'static str,
    merge_fields: MergeFields<'a>,
}

#[derive(Debug, Serialize)]
struct MergeFields<'a> {
    #[serde(rename = "FNAME")]
    first_name: &'a str,
    #[serde(rename = "LNAME")]
    last_name: &'a str,
}

impl<'a> From<&'a Subscriber> for MemberRequest<'a> {
    fn from(s: &'a Subscriber) -> Self {
        Self {
            email_address: &s.email,
            status: "subscribed",
            merge_fields: MergeFields {
                first_name: &s.first_name,
                last_name: &s.last_name,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MemberResponse {
    id: Option<String>,
    status: Option<String>,
}

/// Mailchimp error body (RFC 7807 problem detail)
#[derive(Debug, Default, Deserialize)]
struct ProblemDetail {
    title: Option<String>,
    detail: Option<String>,
}

/// Turn a non-2xx response into a ProviderError.
///
/// The structured title decides first; the wording of the detail is only
/// consulted when the title says nothing.
fn classify_rejection(status: StatusCode, problem: ProblemDetail) -> ProviderError {
    let message = match (&problem.title, &problem.detail) {
        (Some(title), Some(detail)) => format!("{}: {}", title, detail),
        (None, Some(text)) | (Some(text), None) => text.clone(),
        (None, None) => format!("mailing list provider answered {}", status),
    };

    let exists = problem.title.as_deref() == Some(MEMBER_EXISTS);
    if exists || mentions_subscribed(&message) {
        ProviderError::AlreadySubscribed { message }
    } else {
        ProviderError::Rejected { message }
    }
}

/// Mailchimp Marketing API client
#[derive(Clone)]
pub struct MailchimpClient {
    http: Client,
    base_url: String,
    api_key: String,
    list_id: String,
}

impl MailchimpClient {
    /// Build a client for the configured data center.
    pub fn new(config: MailchimpConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: format!("https://{}.api.mailchimp.com/3.0", config.data_center),
            api_key: config.api_key,
            list_id: config.list_id,
        })
    }

    /// Point the client at another API root (staging proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn members_url(&self) -> String {
        format!("{}/lists/{}/members", self.base_url, self.list_id)
    }

    async fn reject(response: Response) -> ProviderError {
        let status = response.status();
        let problem = response.json::<ProblemDetail>().await.unwrap_or_default();
        let err = classify_rejection(status, problem);
        tracing::warn!(%status, error = %err, "mailing list provider rejected request");
        err
    }
}

fn unreachable(err: reqwest::Error) -> ProviderError {
    tracing::warn!(error = %err, "mailing list provider unreachable");
    ProviderError::Unreachable
}

#[async_trait]
impl MailingList for MailchimpClient {
    async fn subscribe(&self, subscriber: &Subscriber) -> Result<Subscribed, ProviderError> {
        let response = self
            .http
            .post(self.members_url())
            .basic_auth("pichon", Some(&self.api_key))
            .json(&MemberRequest::from(subscriber))
            .send()
            .await
            .map_err(unreachable)?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let member = response.json::<MemberResponse>().await.unwrap_or_default();
        tracing::info!(member_id = ?member.id, "newsletter member added");
        Ok(Subscribed {
            member_id: member.id,
            status: member.status.unwrap_or_else(|| "subscribed".to_string()),
        })
    }

    async fn ping(&self) -> Result<(), ProviderError> {
        let response = self
            .http
            .get(format!("{}/ping", self.base_url))
            .basic_auth("pichon", Some(&self.api_key))
            .send()
            .await
            .map_err(unreachable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::reject(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> MailchimpConfig {
        MailchimpConfig {
            api_key: "secret-us21".into(),
            data_center: "us21".into(),
            list_id: "abc123".into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn problem(title: Option<&str>, detail: Option<&str>) -> ProblemDetail {
        ProblemDetail {
            title: title.map(str::to_owned),
            detail: detail.map(str::to_owned),
        }
    }

    #[test]
    fn payload_shape() {
        let subscriber = Subscriber::new("ana@example.com".into(), Some("Ana".into()), None);
        let body = serde_json::to_value(MemberRequest::from(&subscriber)).unwrap();
        assert_eq!(
            body,
            json!({
                "email_address": "ana@example.com",
                "status": "subscribed",
                "merge_fields": {"FNAME": "Ana", "LNAME": ""}
            })
        );
    }

    #[test]
    fn urls_follow_data_center() {
        let client = MailchimpClient::new(config()).unwrap();
        assert_eq!(client.base_url(), "https://us21.api.mailchimp.com/3.0");
        assert_eq!(
            client.members_url(),
            "https://us21.api.mailchimp.com/3.0/lists/abc123/members"
        );

        let client = client.with_base_url("http://localhost:9000/3.0/");
        assert_eq!(client.members_url(), "http://localhost:9000/3.0/lists/abc123/members");
    }

    #[test]
    fn debug_redacts_api_key() {
        let printed = format!("{:?}", config());
        assert!(!printed.contains("secret-us21"));
    }

    #[test]
    fn member_exists_title_is_conflict() {
        let err = classify_rejection(
            StatusCode::BAD_REQUEST,
            problem(
                Some("Member Exists"),
                Some("ana@example.com is already a list member."),
            ),
        );
        assert!(matches!(err, ProviderError::AlreadySubscribed { .. }));
    }

    #[test]
    fn subscribed_wording_is_conflict_without_title() {
        let err = classify_rejection(
            StatusCode::BAD_REQUEST,
            problem(None, Some("Este correo ya está suscrito")),
        );
        assert!(matches!(err, ProviderError::AlreadySubscribed { .. }));
    }

    #[test]
    fn other_rejections_are_plain() {
        let err = classify_rejection(
            StatusCode::BAD_REQUEST,
            problem(Some("Invalid Resource"), Some("Please provide a valid email address.")),
        );
        assert_eq!(
            err,
            ProviderError::Rejected {
                message: "Invalid Resource: Please provide a valid email address.".into()
            }
        );

        let err = classify_rejection(StatusCode::BAD_GATEWAY, ProblemDetail::default());
        assert_eq!(
            err.to_string(),
            "mailing list provider answered 502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn connection_failure_is_unreachable() {
        // Nothing listens on port 9 (discard) on the loopback interface.
        let client = MailchimpClient::new(MailchimpConfig {
            timeout: Duration::from_secs(2),
            ..config()
        })
        .unwrap()
        .with_base_url("http://127.0.0.1:9/3.0");

        let subscriber = Subscriber::new("ana@example.com".into(), None, None);
        assert_eq!(
            client.subscribe(&subscriber).await,
            Err(ProviderError::Unreachable)
        );
    }
}
