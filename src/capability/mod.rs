//! Capability gating and registration
//!
//! Facts and credentials in, a deterministic set of registered resources
//! and tools out.

pub mod binder;
pub mod descriptors;
pub mod facts;
pub mod registry;

pub use binder::bind;
pub use descriptors::{ArgumentSchema, Bindable, CapabilityCatalog, CapabilityDescriptor, Executor, FactPair, FactReader};
pub use facts::{Fact, FactSpec, FACTS};
pub use registry::{compute_active_set, ActiveSet, CapabilityName, CONTACT_TOOL_NAME};
