//! Capability descriptors
//!
//! Every capability, active or not, is described once at startup. Only the
//! binder decides which descriptors become reachable.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::warn;
use validator::Validate;

use crate::capability::facts::{Fact, FACTS};
use crate::capability::registry::CONTACT_TOOL_NAME;
use crate::config::Config;
use crate::contact::{ContactArgs, ContactDispatcher};
use crate::mcp::types::CapabilityResponse;

type ArgCheck = fn(&Value) -> Result<(), String>;

/// JSON Schema advertised for a tool plus the check enforcing it
#[derive(Clone)]
pub struct ArgumentSchema {
    schema: Value,
    check: ArgCheck,
}

impl ArgumentSchema {
    /// Schema for a capability that takes no arguments
    pub fn empty() -> Self {
        Self {
            schema: json!({"type": "object", "properties": {}}),
            check: accept_any,
        }
    }

    /// Schema derived from an argument struct
    pub fn of<T>() -> Self
    where
        T: JsonSchema + DeserializeOwned + Validate,
    {
        let schema = match serde_json::to_value(schemars::schema_for!(T)) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(
                    error = %e,
                    schema = std::any::type_name::<T>(),
                    "Failed to serialize argument schema, advertising a bare object"
                );
                json!({"type": "object"})
            }
        };
        Self {
            schema,
            check: check_args::<T>,
        }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Check caller-supplied arguments before an executor sees them
    pub fn validate(&self, args: &Value) -> Result<(), String> {
        (self.check)(args)
    }
}

impl fmt::Debug for ArgumentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSchema")
            .field("schema", &self.schema)
            .finish()
    }
}

fn accept_any(_args: &Value) -> Result<(), String> {
    Ok(())
}

fn check_args<T>(args: &Value) -> Result<(), String>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(args.clone()).map_err(|e| e.to_string())?;
    parsed.validate().map_err(|e| e.to_string())
}

/// Pure reader for one fact
#[derive(Debug, Clone)]
pub struct FactReader {
    value: Option<String>,
    placeholder: &'static str,
}

impl FactReader {
    /// Blank values are treated as absent
    pub fn new(value: Option<String>, placeholder: &'static str) -> Self {
        Self {
            value: value.filter(|v| !v.trim().is_empty()),
            placeholder,
        }
    }

    /// The fact's text, or the placeholder when absent
    pub fn read(&self) -> CapabilityResponse {
        CapabilityResponse::text(self.value.as_deref().unwrap_or(self.placeholder))
    }
}

/// What runs when a capability is invoked
#[derive(Clone)]
pub enum Executor {
    Read(FactReader),
    Contact(Arc<ContactDispatcher>),
}

impl Executor {
    pub async fn execute(&self, args: Value) -> CapabilityResponse {
        match self {
            Executor::Read(reader) => reader.read(),
            Executor::Contact(dispatcher) => dispatcher.execute(args).await,
        }
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executor::Read(reader) => f.debug_tuple("Read").field(reader).finish(),
            Executor::Contact(_) => f.write_str("Contact"),
        }
    }
}

/// Registration payload shared by resources and tools
#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub argument_schema: ArgumentSchema,
    pub executor: Executor,
}

/// A descriptor tagged with how it is exposed
#[derive(Debug, Clone)]
pub enum Bindable {
    /// Read-only, addressed by URI, no arguments
    Resource {
        uri: String,
        descriptor: CapabilityDescriptor,
    },

    /// Invoked by name with validated arguments
    Tool(CapabilityDescriptor),
}

impl Bindable {
    pub fn descriptor(&self) -> &CapabilityDescriptor {
        match self {
            Bindable::Resource { descriptor, .. } => descriptor,
            Bindable::Tool(descriptor) => descriptor,
        }
    }
}

/// The resource and tool exposing one fact
#[derive(Debug, Clone)]
pub struct FactPair {
    pub fact: Fact,
    pub resource: Bindable,
    pub tool: Bindable,
}

impl FactPair {
    fn build(fact: Fact, config: &Config) -> Self {
        let spec = fact.spec();
        let candidate = &config.candidate;
        let reader = FactReader::new(fact.value(candidate).map(str::to_string), spec.placeholder);
        let description = format!("Get the {} of the candidate {}", spec.label, candidate.name);

        let resource = Bindable::Resource {
            uri: spec.resource_uri.to_string(),
            descriptor: CapabilityDescriptor {
                name: spec.resource_name.to_string(),
                description: Some(format!("The {} of the candidate {}", spec.label, candidate.name)),
                argument_schema: ArgumentSchema::empty(),
                executor: Executor::Read(reader.clone()),
            },
        };
        let tool = Bindable::Tool(CapabilityDescriptor {
            name: spec.tool_name.to_string(),
            description: Some(description),
            argument_schema: ArgumentSchema::empty(),
            executor: Executor::Read(reader),
        });

        Self {
            fact,
            resource,
            tool,
        }
    }

    /// Resource first, then tool
    pub fn into_halves(self) -> [Bindable; 2] {
        [self.resource, self.tool]
    }
}

/// Every capability the server could expose
#[derive(Debug, Clone)]
pub struct CapabilityCatalog {
    /// One pair per fact, in table order
    pub pairs: Vec<FactPair>,
    pub contact: Bindable,
}

impl CapabilityCatalog {
    /// Describe all capabilities. Construction has no side effects.
    pub fn build(config: &Config, dispatcher: Arc<ContactDispatcher>) -> Self {
        let pairs = FACTS
            .iter()
            .map(|spec| FactPair::build(spec.fact, config))
            .collect();

        let contact = Bindable::Tool(CapabilityDescriptor {
            name: CONTACT_TOOL_NAME.to_string(),
            description: Some(format!(
                "Contact the candidate {} by email",
                config.candidate.name
            )),
            argument_schema: ArgumentSchema::of::<ContactArgs>(),
            executor: Executor::Contact(dispatcher),
        });

        Self { pairs, contact }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{MailRelay, OutboundMessage, RelayAuth, RelayReceipt};
    use crate::error::RelayError;
    use async_trait::async_trait;

    struct NoopRelay;

    #[async_trait]
    impl MailRelay for NoopRelay {
        async fn send(
            &self,
            _auth: RelayAuth<'_>,
            _message: &OutboundMessage,
        ) -> Result<RelayReceipt, RelayError> {
            Ok(RelayReceipt::default())
        }
    }

    fn catalog(config: &Config) -> CapabilityCatalog {
        let dispatcher = Arc::new(ContactDispatcher::new(config, Arc::new(NoopRelay)));
        CapabilityCatalog::build(config, dispatcher)
    }

    #[test]
    fn test_all_pairs_built_for_empty_profile() {
        let catalog = catalog(&Config::default());
        assert_eq!(catalog.pairs.len(), 6);
        assert_eq!(catalog.contact.descriptor().name, CONTACT_TOOL_NAME);
    }

    #[test]
    fn test_pair_halves_share_content() {
        let mut config = Config::default();
        config.candidate.resume_url = Some("https://x.test/r.pdf".to_string());
        let pair = catalog(&config)
            .pairs
            .into_iter()
            .find(|p| p.fact == Fact::ResumeUrl)
            .unwrap();

        let [resource, tool] = pair.into_halves();
        assert!(matches!(resource, Bindable::Resource { ref uri, .. } if uri == "candidate-info://resume-url"));
        assert_eq!(tool.descriptor().name, "get_resume_url");

        let from_resource = tokio_test::block_on(resource.descriptor().executor.execute(Value::Null));
        let from_tool = tokio_test::block_on(tool.descriptor().executor.execute(json!({})));
        assert_eq!(from_resource, from_tool);
        assert_eq!(from_tool, CapabilityResponse::text("https://x.test/r.pdf"));
    }

    #[test]
    fn test_reader_placeholder() {
        let reader = FactReader::new(None, "Resume text not available");
        assert_eq!(reader.read(), CapabilityResponse::text("Resume text not available"));
    }

    #[test]
    fn test_blank_reader_value_reads_placeholder() {
        let reader = FactReader::new(Some(String::new()), "Website text not available");
        assert_eq!(reader.read(), CapabilityResponse::text("Website text not available"));
    }

    #[test]
    fn test_absent_fact_reads_placeholder() {
        let catalog = catalog(&Config::default());
        let tool = &catalog.pairs[0].tool;
        assert_eq!(tool.descriptor().name, "get_resume_text");

        let response = tokio_test::block_on(tool.descriptor().executor.execute(json!({})));
        assert_eq!(response, CapabilityResponse::text("Resume text not available"));
    }

    #[test]
    fn test_tool_description_names_candidate() {
        let mut config = Config::default();
        config.candidate.name = "Jane Doe".to_string();
        let catalog = catalog(&config);
        assert_eq!(
            catalog.pairs[0].tool.descriptor().description.as_deref(),
            Some("Get the resume text of the candidate Jane Doe")
        );
    }

    #[test]
    fn test_contact_schema_requires_arguments() {
        let schema = ArgumentSchema::of::<ContactArgs>();
        let required = schema.schema()["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);

        assert!(schema
            .validate(&json!({"subject": "Hi", "message": "Interested", "reply_address": "a@b.test"}))
            .is_ok());
        assert!(schema
            .validate(&json!({"subject": "Hi", "message": "", "reply_address": "a@b.test"}))
            .is_err());
        assert!(schema.validate(&json!({"subject": "Hi"})).is_err());
    }

    #[test]
    fn test_contact_schema_lists_properties() {
        let schema = ArgumentSchema::of::<ContactArgs>();
        let properties = schema.schema()["properties"].as_object().unwrap();
        for field in ["subject", "message", "reply_address"] {
            assert_eq!(properties[field]["type"], "string");
        }
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let schema = ArgumentSchema::empty();
        assert!(schema.validate(&Value::Null).is_ok());
        assert!(schema.validate(&json!({"extra": 1})).is_ok());
    }
}
