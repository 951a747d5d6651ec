//! Registration surface the binder talks to

use crate::capability::descriptors::CapabilityDescriptor;
use crate::error::Result;

/// A session layer capabilities can be registered with
///
/// Implementations route requests to registered descriptors, enforce each
/// tool's argument schema, and reject duplicate names.
pub trait Transport {
    fn has_resource(&self, uri: &str) -> bool;

    fn has_tool(&self, name: &str) -> bool;

    fn register_resource(&mut self, uri: String, descriptor: CapabilityDescriptor) -> Result<()>;

    fn register_tool(&mut self, descriptor: CapabilityDescriptor) -> Result<()>;
}
