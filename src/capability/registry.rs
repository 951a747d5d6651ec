//! Capability registry
//!
//! Decides, from configuration alone, which capabilities are reachable.

use std::collections::BTreeSet;
use std::fmt;

use crate::capability::facts::Fact;
use crate::config::{CandidateProfile, ContactCredentials};

/// Name of the side-effecting contact tool
pub const CONTACT_TOOL_NAME: &str = "contact_candidate";

/// A gateable capability: a fact pair or the contact tool
///
/// Ordering follows registration order, with contact last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityName {
    Fact(Fact),
    Contact,
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityName::Fact(fact) => write!(f, "{}", fact),
            CapabilityName::Contact => f.write_str(CONTACT_TOOL_NAME),
        }
    }
}

/// The set of capabilities to expose
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet(BTreeSet<CapabilityName>);

impl ActiveSet {
    pub fn contains(&self, name: CapabilityName) -> bool {
        self.0.contains(&name)
    }

    /// Capabilities in registration order
    pub fn iter(&self) -> impl Iterator<Item = CapabilityName> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CapabilityName> for ActiveSet {
    fn from_iter<I: IntoIterator<Item = CapabilityName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ActiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        let names: Vec<String> = self.iter().map(|name| name.to_string()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Compute the active set
///
/// A fact pair is active iff the fact is present. Contact is active iff all
/// three credentials are present.
pub fn compute_active_set(profile: &CandidateProfile, credentials: &ContactCredentials) -> ActiveSet {
    let facts = Fact::ALL
        .into_iter()
        .filter(|fact| fact.value(profile).is_some())
        .map(CapabilityName::Fact);

    let contact = credentials
        .is_complete()
        .then_some(CapabilityName::Contact);

    facts.chain(contact).collect()
}
