//! Configuration management for the Candidate MCP Server
//!
//! Assembles the candidate profile, server identity and contact credentials
//! from defaults, an optional JSON config file and environment variables.
//! Everything here is built once at startup and read-only afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CandidateMcpError, ConfigError, Result};

/// Default server name advertised during `initialize`
pub const DEFAULT_SERVER_NAME: &str = "Candidate MCP Server";

/// Default candidate name when none is configured
pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "CANDIDATE_MCP_CONFIG";

/// Facts about the candidate exposed to agents
///
/// Every optional field is either `None` or a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub name: String,
    pub resume_text: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub website_text: Option<String>,
}

impl CandidateProfile {
    /// Create a profile with only a name; blank names fall back to the default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: non_blank(Some(name.into())).unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string()),
            resume_text: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
            website_url: None,
            website_text: None,
        }
    }

    /// Drop blank optional values so absence has a single representation
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(Some(self.name)).unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string()),
            resume_text: non_blank(self.resume_text),
            resume_url: non_blank(self.resume_url),
            linkedin_url: non_blank(self.linkedin_url),
            github_url: non_blank(self.github_url),
            website_url: non_blank(self.website_url),
            website_text: non_blank(self.website_text),
        }
    }
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_NAME)
    }
}

/// Server name and version reported to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Credentials needed to send mail on the candidate's behalf
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactCredentials {
    pub relay_api_key: Option<String>,
    pub relay_sending_domain: Option<String>,
    pub contact_email: Option<String>,
}

/// A fully populated credential set, borrowed from [`ContactCredentials`]
#[derive(Debug, Clone, Copy)]
pub struct CompleteCredentials<'a> {
    pub api_key: &'a str,
    pub sending_domain: &'a str,
    pub contact_email: &'a str,
}

impl ContactCredentials {
    /// All three credentials, or `None` if any is missing
    pub fn complete(&self) -> Option<CompleteCredentials<'_>> {
        Some(CompleteCredentials {
            api_key: present(&self.relay_api_key)?,
            sending_domain: present(&self.relay_sending_domain)?,
            contact_email: present(&self.contact_email)?,
        })
    }

    /// Whether the contact capability can be offered
    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }

    fn normalized(self) -> Self {
        Self {
            relay_api_key: non_blank(self.relay_api_key),
            relay_sending_domain: non_blank(self.relay_sending_domain),
            contact_email: non_blank(self.contact_email),
        }
    }
}

/// HTTP settings for the mail relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            base_url: mailgun::API_BASE_URL.to_string(),
            timeout_secs: mailgun::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Configuration for the Candidate MCP Server
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerIdentity,
    pub candidate: CandidateProfile,
    pub contact: ContactCredentials,
    pub relay: RelaySettings,
}

impl Config {
    /// Load configuration from the config file (if any) and the process environment
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();

        let file = match resolve_config_path(explicit_path, env) {
            Some(path) => ConfigFile::read(&path)?,
            None => ConfigFile::default(),
        };

        Self::from_parts(file, env)
    }

    /// Merge a parsed config file with environment lookups; the environment wins
    pub fn from_parts<F>(file: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |var: &str, fallback: Option<String>| non_blank(env(var)).or(non_blank(fallback));

        let defaults = ServerIdentity::default();
        let server = ServerIdentity {
            name: pick("SERVER_NAME", file.server.name).unwrap_or(defaults.name),
            version: pick("SERVER_VERSION", file.server.version).unwrap_or(defaults.version),
        };

        let section = file.candidate;
        let resume_text = match pick("RESUME_TEXT", section.resume_text) {
            Some(text) => Some(text),
            None => match pick("RESUME_TEXT_FILE", section.resume_text_file) {
                Some(path) => Some(read_text_file(Path::new(&path))?),
                None => None,
            },
        };

        let candidate = CandidateProfile {
            name: pick("CANDIDATE_NAME", section.name).unwrap_or_default(),
            resume_text,
            resume_url: pick("RESUME_URL", section.resume_url),
            linkedin_url: pick("LINKEDIN_URL", section.linkedin_url),
            github_url: pick("GITHUB_URL", section.github_url),
            website_url: pick("WEBSITE_URL", section.website_url),
            website_text: pick("WEBSITE_TEXT", section.website_text),
        }
        .normalized();

        let contact = ContactCredentials {
            relay_api_key: pick("MAILGUN_API_KEY", file.contact.relay_api_key),
            relay_sending_domain: pick("MAILGUN_DOMAIN", file.contact.relay_sending_domain),
            contact_email: pick("CONTACT_EMAIL", file.contact.contact_email),
        }
        .normalized();

        let relay_defaults = RelaySettings::default();
        let timeout_secs = match non_blank(env("RELAY_TIMEOUT_SECS")) {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                CandidateMcpError::Config(ConfigError::InvalidValue {
                    var: "RELAY_TIMEOUT_SECS".to_string(),
                    message: e.to_string(),
                })
            })?,
            None => file.relay.timeout_secs.unwrap_or(relay_defaults.timeout_secs),
        };
        let relay = RelaySettings {
            base_url: pick("MAILGUN_API_BASE", file.relay.base_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(relay_defaults.base_url),
            timeout_secs,
        };

        Ok(Self {
            server,
            candidate,
            contact,
            relay,
        })
    }
}

/// On-disk configuration file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub candidate: CandidateSection,
    pub contact: ContactCredentials,
    pub relay: RelaySection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSection {
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateSection {
    pub name: Option<String>,
    pub resume_text: Option<String>,
    pub resume_text_file: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub website_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaySection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Read and parse a JSON config file
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CandidateMcpError::Config(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }));
        }

        let raw = read_text_file(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            CandidateMcpError::Config(ConfigError::Malformed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })
    }
}

/// Pick the config file: explicit path, then `CANDIDATE_MCP_CONFIG`, then the
/// default path when it exists
pub fn resolve_config_path<F>(explicit_path: Option<&Path>, env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    if let Some(path) = non_blank(env(CONFIG_PATH_VAR)) {
        return Some(PathBuf::from(path));
    }
    default_config_path().filter(|path| path.exists())
}

/// `~/.candidate-mcp/config.json`, if a home directory exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".candidate-mcp").join("config.json"))
}

fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CandidateMcpError::Config(ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Borrow a value only if it is non-blank
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Mailgun relay constants
pub mod mailgun {
    /// Base URL for the Mailgun HTTP API (US region)
    pub const API_BASE_URL: &str = "https://api.mailgun.net";

    /// Local part of the synthesized sender address
    pub const SENDER_LOCAL_PART: &str = "noreply";

    /// Request timeout for relay calls
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}
