//! Capability binder
//!
//! Registers the active part of a [`CapabilityCatalog`] with a transport.
//! A fact's resource and tool are registered together or not at all.

use tracing::{debug, info};

use crate::capability::descriptors::{Bindable, CapabilityCatalog};
use crate::capability::registry::{ActiveSet, CapabilityName};
use crate::error::{CandidateMcpError, RegistrationError, Result};
use crate::mcp::transport::Transport;

/// Register every active capability, fact pairs first and contact last
///
/// Fails only when the transport already holds one of the names, which
/// means the catalog was assembled wrongly.
pub fn bind<T>(transport: &mut T, catalog: CapabilityCatalog, active: &ActiveSet) -> Result<()>
where
    T: Transport + ?Sized,
{
    for pair in catalog.pairs {
        if !active.contains(CapabilityName::Fact(pair.fact)) {
            debug!(fact = %pair.fact, "Fact absent, pair not registered");
            continue;
        }

        let fact = pair.fact;
        let halves = pair.into_halves();
        // Both names must be free before either half is registered
        for half in &halves {
            ensure_free(transport, half)?;
        }
        for half in halves {
            register(transport, half)?;
        }
        info!(fact = %fact, "Registered resource and tool");
    }

    if active.contains(CapabilityName::Contact) {
        ensure_free(transport, &catalog.contact)?;
        register(transport, catalog.contact)?;
        info!("Registered contact tool");
    } else {
        debug!("Contact credentials incomplete, contact tool not registered");
    }

    Ok(())
}

fn ensure_free<T>(transport: &T, bindable: &Bindable) -> Result<()>
where
    T: Transport + ?Sized,
{
    match bindable {
        Bindable::Resource { uri, .. } if transport.has_resource(uri) => {
            Err(CandidateMcpError::Registration(RegistrationError::DuplicateResource {
                uri: uri.clone(),
            }))
        }
        Bindable::Tool(descriptor) if transport.has_tool(&descriptor.name) => {
            Err(CandidateMcpError::Registration(RegistrationError::DuplicateTool {
                name: descriptor.name.clone(),
            }))
        }
        _ => Ok(()),
    }
}

fn register<T>(transport: &mut T, bindable: Bindable) -> Result<()>
where
    T: Transport + ?Sized,
{
    match bindable {
        Bindable::Resource { uri, descriptor } => transport.register_resource(uri, descriptor),
        Bindable::Tool(descriptor) => transport.register_tool(descriptor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::capability::descriptors::CapabilityDescriptor;
    use crate::capability::facts::{Fact, FACTS};
    use crate::capability::registry::{compute_active_set, CONTACT_TOOL_NAME};
    use crate::config::{CandidateProfile, Config, ContactCredentials};
    use crate::contact::{ContactDispatcher, MailRelay, OutboundMessage, RelayAuth, RelayReceipt};
    use crate::error::RelayError;

    struct NoopRelay;

    #[async_trait]
    impl MailRelay for NoopRelay {
        async fn send(
            &self,
            _auth: RelayAuth<'_>,
            _message: &OutboundMessage,
        ) -> std::result::Result<RelayReceipt, RelayError> {
            Ok(RelayReceipt::default())
        }
    }

    /// Transport that records registrations in order
    #[derive(Default)]
    struct RecordingTransport {
        log: Vec<String>,
    }

    impl Transport for RecordingTransport {
        fn has_resource(&self, uri: &str) -> bool {
            self.log.iter().any(|entry| entry == &format!("resource:{}", uri))
        }

        fn has_tool(&self, name: &str) -> bool {
            self.log.iter().any(|entry| entry == &format!("tool:{}", name))
        }

        fn register_resource(&mut self, uri: String, _descriptor: CapabilityDescriptor) -> Result<()> {
            self.log.push(format!("resource:{}", uri));
            Ok(())
        }

        fn register_tool(&mut self, descriptor: CapabilityDescriptor) -> Result<()> {
            self.log.push(format!("tool:{}", descriptor.name));
            Ok(())
        }
    }

    fn full_credentials() -> ContactCredentials {
        ContactCredentials {
            relay_api_key: Some("key-123".to_string()),
            relay_sending_domain: Some("mg.example.com".to_string()),
            contact_email: Some("jane@example.com".to_string()),
        }
    }

    fn bind_config(config: &Config) -> (RecordingTransport, Result<()>) {
        let dispatcher = Arc::new(ContactDispatcher::new(config, Arc::new(NoopRelay)));
        let catalog = CapabilityCatalog::build(config, dispatcher);
        let active = compute_active_set(&config.candidate, &config.contact);
        let mut transport = RecordingTransport::default();
        let result = bind(&mut transport, catalog, &active);
        (transport, result)
    }

    fn profile_from_mask(mask: u8) -> CandidateProfile {
        let mut profile = CandidateProfile::new("Jane Doe");
        for (bit, fact) in Fact::ALL.into_iter().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            let value = Some(format!("value-{}", bit));
            match fact {
                Fact::ResumeText => profile.resume_text = value,
                Fact::ResumeUrl => profile.resume_url = value,
                Fact::LinkedinUrl => profile.linkedin_url = value,
                Fact::GithubUrl => profile.github_url = value,
                Fact::WebsiteUrl => profile.website_url = value,
                Fact::WebsiteText => profile.website_text = value,
            }
        }
        profile
    }

    #[test]
    fn test_pairing_holds_for_every_profile() {
        for mask in 0..64u8 {
            let config = Config {
                candidate: profile_from_mask(mask),
                ..Config::default()
            };
            let (transport, result) = bind_config(&config);
            result.unwrap();

            for (bit, spec) in FACTS.iter().enumerate() {
                let has_resource = transport.has_resource(spec.resource_uri);
                let has_tool = transport.has_tool(spec.tool_name);
                assert_eq!(has_resource, has_tool, "mask {:06b}, fact {}", mask, spec.fact);
                assert_eq!(has_tool, mask & (1 << bit) != 0);
            }
            assert!(!transport.has_tool(CONTACT_TOOL_NAME));
        }
    }

    #[test]
    fn test_registration_order() {
        let config = Config {
            candidate: profile_from_mask(0b100001),
            contact: full_credentials(),
            ..Config::default()
        };
        let (transport, result) = bind_config(&config);
        result.unwrap();

        assert_eq!(
            transport.log,
            vec![
                "resource:candidate-info://resume-text",
                "tool:get_resume_text",
                "resource:candidate-info://website-text",
                "tool:get_website_text",
                "tool:contact_candidate",
            ]
        );
    }

    #[test]
    fn test_duplicate_tool_aborts_without_partial_pair() {
        let config = Config {
            candidate: profile_from_mask(0b000010),
            ..Config::default()
        };
        let dispatcher = Arc::new(ContactDispatcher::new(&config, Arc::new(NoopRelay)));
        let catalog = CapabilityCatalog::build(&config, dispatcher);
        let active = compute_active_set(&config.candidate, &config.contact);

        let mut transport = RecordingTransport::default();
        transport.log.push("tool:get_resume_url".to_string());

        let err = bind(&mut transport, catalog, &active).unwrap_err();
        assert!(matches!(
            err,
            CandidateMcpError::Registration(RegistrationError::DuplicateTool { .. })
        ));
        assert!(!transport.has_resource("candidate-info://resume-url"));
    }
}
