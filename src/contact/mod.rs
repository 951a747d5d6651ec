//! Contact capability
//!
//! Argument types, the mail relay client, and the dispatcher that sends an
//! email to the candidate on an agent's behalf.

pub mod dispatcher;
pub mod relay;
pub mod types;

pub use dispatcher::{ContactDispatcher, DispatchOutcome};
pub use relay::{MailRelay, MailgunRelay, RelayAuth};
pub use types::{ContactArgs, OutboundMessage, RelayReceipt};
