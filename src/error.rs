//! Error types for the Candidate MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Candidate MCP Server
#[derive(Error, Debug)]
pub enum CandidateMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Capability registration errors (startup only)
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Argument validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Mail relay errors
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Malformed config file {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Capability registration errors
///
/// These indicate a defect in how capabilities were assembled, never a
/// runtime condition, so they abort startup.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Resource already registered: {uri}")]
    DuplicateResource { uri: String },

    #[error("Tool already registered: {name}")]
    DuplicateTool { name: String },
}

/// Argument validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

/// Mail relay errors
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("relay rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed relay response: {message}")]
    MalformedResponse { message: String },

    #[error("invalid sender address for domain {domain}: {message}")]
    InvalidSender { domain: String, message: String },

    #[error("contact credentials are not configured")]
    MissingCredentials,
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Unknown resource: {uri}")]
    UnknownResource { uri: String },

    #[error("Invalid request parameters: {message}")]
    InvalidParams { message: String },
}

/// Result type alias for Candidate MCP operations
pub type Result<T> = std::result::Result<T, CandidateMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistrationError::DuplicateTool {
            name: "get_resume_url".to_string(),
        };
        assert!(err.to_string().contains("get_resume_url"));
    }

    #[test]
    fn test_error_conversion() {
        let relay_err = RelayError::MissingCredentials;
        let err: CandidateMcpError = relay_err.into();
        assert!(matches!(err, CandidateMcpError::Relay(_)));
    }

    #[test]
    fn test_rejected_display_carries_reason() {
        let err = RelayError::Rejected {
            status: 401,
            message: "Forbidden".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("Forbidden"));
    }
}
