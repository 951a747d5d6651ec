//! Contact dispatcher
//!
//! Executes `contact_candidate`: composes an outbound message from
//! validated arguments, hands it to the relay exactly once, and turns the
//! outcome into a normal response. Relay failures never escape as errors.

use std::sync::Arc;

use lettre::message::Mailbox;
use lettre::Address;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{mailgun::SENDER_LOCAL_PART, CompleteCredentials, Config, ContactCredentials};
use crate::contact::relay::{MailRelay, RelayAuth};
use crate::contact::types::{ContactArgs, OutboundMessage, RelayReceipt};
use crate::error::RelayError;
use crate::mcp::types::CapabilityResponse;

/// Terminal state of one contact invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The relay accepted the message
    Succeeded {
        candidate: String,
        recipient: String,
        receipt: RelayReceipt,
    },

    /// The relay (or message composition) failed
    Failed { candidate: String, reason: String },
}

impl DispatchOutcome {
    /// Whether the relay accepted the message
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Succeeded { .. })
    }

    /// Render the outcome; both variants produce a regular response
    pub fn into_response(self) -> CapabilityResponse {
        match self {
            DispatchOutcome::Succeeded {
                candidate,
                recipient,
                ..
            } => CapabilityResponse::text(format!(
                "Email sent to {} at {} successfully.",
                candidate, recipient
            )),
            DispatchOutcome::Failed { candidate, reason } => CapabilityResponse::text(format!(
                "Failed to send email to {}: {}",
                candidate, reason
            )),
        }
    }
}

/// Executor for the contact capability
///
/// Holds no per-call state; every invocation is an independent
/// Idle → Sending → Succeeded/Failed sequence.
pub struct ContactDispatcher {
    candidate_name: String,
    sender_name: String,
    credentials: ContactCredentials,
    relay: Arc<dyn MailRelay>,
}

impl ContactDispatcher {
    /// Create a dispatcher from startup configuration
    pub fn new(config: &Config, relay: Arc<dyn MailRelay>) -> Self {
        Self {
            candidate_name: config.candidate.name.clone(),
            sender_name: config.server.name.clone(),
            credentials: config.contact.clone(),
            relay,
        }
    }

    /// Build the outbound message for validated arguments
    pub fn compose(
        &self,
        credentials: CompleteCredentials<'_>,
        args: &ContactArgs,
    ) -> Result<OutboundMessage, RelayError> {
        let address = Address::new(SENDER_LOCAL_PART, credentials.sending_domain).map_err(|e| {
            RelayError::InvalidSender {
                domain: credentials.sending_domain.to_string(),
                message: e.to_string(),
            }
        })?;
        let from = Mailbox::new(Some(self.sender_name.clone()), address);

        Ok(OutboundMessage {
            from: from.to_string(),
            to: credentials.contact_email.to_string(),
            subject: args.subject.clone(),
            text: args.message.clone(),
            reply_to: args.reply_address.clone(),
        })
    }

    /// Send one message through the relay
    pub async fn dispatch(&self, args: &ContactArgs) -> DispatchOutcome {
        match self.try_dispatch(args).await {
            Ok((recipient, receipt)) => {
                info!(recipient = %recipient, relay_id = %receipt.id, "Contact email sent");
                DispatchOutcome::Succeeded {
                    candidate: self.candidate_name.clone(),
                    recipient,
                    receipt,
                }
            }
            Err(e) => {
                warn!(error = %e, "Contact email failed");
                DispatchOutcome::Failed {
                    candidate: self.candidate_name.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_dispatch(&self, args: &ContactArgs) -> Result<(String, RelayReceipt), RelayError> {
        let credentials = self.credentials.complete().ok_or(RelayError::MissingCredentials)?;
        let message = self.compose(credentials, args)?;

        debug!(to = %message.to, reply_to = %message.reply_to, "Sending contact email");
        let auth = RelayAuth {
            api_key: credentials.api_key,
            sending_domain: credentials.sending_domain,
        };
        let receipt = self.relay.send(auth, &message).await?;

        Ok((message.to, receipt))
    }

    /// Tool entry point. Arguments have already passed the schema check.
    pub async fn execute(&self, args: Value) -> CapabilityResponse {
        let outcome = match serde_json::from_value::<ContactArgs>(args) {
            Ok(args) => self.dispatch(&args).await,
            Err(e) => DispatchOutcome::Failed {
                candidate: self.candidate_name.clone(),
                reason: format!("invalid arguments: {}", e),
            },
        };
        outcome.into_response()
    }
}
