//! Candidate MCP Server Library
//!
//! A Model Context Protocol (MCP) server that exposes facts about a job
//! candidate (resume, profile links, personal site) and, when mail relay
//! credentials are configured, lets an agent email the candidate.

pub mod capability;
pub mod config;
pub mod contact;
pub mod error;
pub mod mcp;

pub use config::Config;
pub use error::{CandidateMcpError, Result};
