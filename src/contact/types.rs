//! Contact tool argument and message types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Arguments accepted by the `contact_candidate` tool
///
/// `reply_address` is passed through verbatim; it is not checked for
/// email syntax.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct ContactArgs {
    /// Subject line of the email
    #[validate(length(min = 1))]
    pub subject: String,

    /// Body of the email
    #[validate(length(min = 1))]
    pub message: String,

    /// Address the candidate should reply to
    #[validate(length(min = 1))]
    pub reply_address: String,
}

/// A message ready to hand to the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub reply_to: String,
}

/// Relay acknowledgement for an accepted message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelayReceipt {
    /// Relay-assigned message ID
    #[serde(default)]
    pub id: String,

    /// Relay status message
    #[serde(default)]
    pub message: String,
}
