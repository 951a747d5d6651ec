//! MCP (Model Context Protocol) module
//!
//! Implements the MCP server protocol for tool and resource access.

pub mod server;
pub mod transport;
pub mod types;

pub use server::{create_server, McpServer};
pub use transport::Transport;
