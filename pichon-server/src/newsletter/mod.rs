//! Newsletter forwarding
//!
//! Subscriber state lives with the email-marketing provider. This module
//! only builds the subscriber payload and classifies what came back:
//! - Real implementation over the Mailchimp Marketing API
//! - Mock implementation for testing

pub mod mailchimp;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

pub use mailchimp::{MailchimpClient, MailchimpConfig};

/// Signup forwarded to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Subscriber {
    /// Missing names are sent as empty strings.
    pub fn new(email: String, first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            email,
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
        }
    }
}

/// Provider acknowledgement of a new member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribed {
    pub member_id: Option<String>,
    pub status: String,
}

/// Provider rejection or transport failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The address is already on the list.
    #[error("{message}")]
    AlreadySubscribed { message: String },

    /// Any other refusal from the provider.
    #[error("{message}")]
    Rejected { message: String },

    /// The provider could not be reached. Not retried.
    #[error("could not connect to the mailing list provider")]
    Unreachable,
}

/// True when a provider message talks about an existing subscription.
///
/// Fallback for responses that carry no structured error title.
pub fn mentions_subscribed(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("subscribed") || lower.contains("suscrito")
}

/// Trait for mailing list providers (testable)
#[async_trait]
pub trait MailingList: Send + Sync {
    async fn subscribe(&self, subscriber: &Subscriber) -> Result<Subscribed, ProviderError>;

    /// Check that the provider answers and accepts our credentials.
    async fn ping(&self) -> Result<(), ProviderError>;
}

/// Mock mailing list for testing
///
/// Returns queued outcomes in order, then plain success.
#[derive(Default)]
pub struct MockMailingList {
    outcomes: Mutex<VecDeque<Result<Subscribed, ProviderError>>>,
    received: Mutex<Vec<Subscriber>>,
}

impl MockMailingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next `subscribe` call.
    pub fn push_outcome(&self, outcome: Result<Subscribed, ProviderError>) {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    /// Subscribers passed to `subscribe` so far.
    pub fn received(&self) -> Vec<Subscriber> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl MailingList for MockMailingList {
    async fn subscribe(&self, subscriber: &Subscriber) -> Result<Subscribed, ProviderError> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(subscriber.clone());

        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        next.unwrap_or_else(|| {
            Ok(Subscribed {
                member_id: None,
                status: "subscribed".to_string(),
            })
        })
    }

    async fn ping(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_default_to_empty() {
        let s = Subscriber::new("a@b.c".into(), None, None);
        assert_eq!(s.first_name, "");
        assert_eq!(s.last_name, "");
    }

    #[test]
    fn subscribed_wording_is_detected() {
        assert!(mentions_subscribed("a@b.c is already subscribed"));
        assert!(mentions_subscribed("El usuario ya está SUSCRITO"));
        assert!(!mentions_subscribed("Invalid Resource"));
    }

    #[tokio::test]
    async fn mock_returns_queued_outcomes_then_success() {
        let mock = MockMailingList::new();
        mock.push_outcome(Err(ProviderError::Unreachable));

        let subscriber = Subscriber::new("a@b.c".into(), Some("Ana".into()), None);
        assert_eq!(
            mock.subscribe(&subscriber).await,
            Err(ProviderError::Unreachable)
        );
        assert!(mock.subscribe(&subscriber).await.is_ok());
        assert_eq!(mock.received().len(), 2);
    }
}
