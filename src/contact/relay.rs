//! Mail relay client
//!
//! The relay is the only outbound network dependency. [`MailRelay`] is the
//! seam the dispatcher talks to; [`MailgunRelay`] is the production client.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::RelaySettings;
use crate::contact::types::{OutboundMessage, RelayReceipt};
use crate::error::{RelayError, Result};

/// Credentials the relay authenticates a send with
#[derive(Debug, Clone, Copy)]
pub struct RelayAuth<'a> {
    pub api_key: &'a str,
    pub sending_domain: &'a str,
}

/// Something that can transmit an email
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Send one message. Called at most once per contact invocation.
    async fn send(
        &self,
        auth: RelayAuth<'_>,
        message: &OutboundMessage,
    ) -> std::result::Result<RelayReceipt, RelayError>;
}

/// Mailgun HTTP API client
pub struct MailgunRelay {
    /// HTTP client
    http_client: reqwest::Client,

    /// API base, e.g. `https://api.mailgun.net`
    base_url: String,
}

impl MailgunRelay {
    /// Create a new Mailgun client
    pub fn new(settings: &RelaySettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self, domain: &str) -> String {
        format!("{}/v3/{}/messages", self.base_url, domain)
    }
}

#[async_trait]
impl MailRelay for MailgunRelay {
    async fn send(
        &self,
        auth: RelayAuth<'_>,
        message: &OutboundMessage,
    ) -> std::result::Result<RelayReceipt, RelayError> {
        let form = [
            ("from", message.from.as_str()),
            ("to", message.to.as_str()),
            ("subject", message.subject.as_str()),
            ("text", message.text.as_str()),
            ("h:Reply-To", message.reply_to.as_str()),
        ];

        let response = self
            .http_client
            .post(self.messages_url(auth.sending_domain))
            .basic_auth("api", Some(auth.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| RelayError::MalformedResponse {
                message: e.to_string(),
            })
        } else {
            Err(RelayError::Rejected {
                status: status.as_u16(),
                message: body.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let relay = MailgunRelay::new(&RelaySettings {
            base_url: "https://api.eu.mailgun.net/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            relay.messages_url("mg.example.com"),
            "https://api.eu.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_transport_error() {
        let relay = MailgunRelay::new(&RelaySettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let message = OutboundMessage {
            from: "Candidate MCP Server <noreply@mg.test>".to_string(),
            to: "jane@example.com".to_string(),
            subject: "Hi".to_string(),
            text: "Interested".to_string(),
            reply_to: "a@b.test".to_string(),
        };
        let auth = RelayAuth {
            api_key: "key",
            sending_domain: "mg.test",
        };

        let err = relay.send(auth, &message).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}
