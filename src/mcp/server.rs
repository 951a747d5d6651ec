//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::capability::{bind, compute_active_set, CapabilityCatalog, CapabilityDescriptor};
use crate::config::{Config, ServerIdentity};
use crate::contact::{ContactDispatcher, MailRelay};
use crate::error::{CandidateMcpError, McpError, RegistrationError, Result, ValidationError};
use crate::mcp::transport::Transport;
use crate::mcp::types::*;

/// MIME type of every resource this server exposes
const RESOURCE_MIME_TYPE: &str = "text/plain";

struct RegisteredResource {
    uri: String,
    descriptor: CapabilityDescriptor,
}

/// MCP Server for candidate facts
pub struct McpServer {
    /// Name and version reported on initialize
    identity: ServerIdentity,

    /// Registered resources, in registration order
    resources: Vec<RegisteredResource>,

    /// Registered tools, in registration order
    tools: Vec<CapabilityDescriptor>,

    /// Whether initialized
    initialized: bool,
}

/// Build a server with every active capability bound
pub fn create_server(config: &Config, relay: Arc<dyn MailRelay>) -> Result<McpServer> {
    let active = compute_active_set(&config.candidate, &config.contact);
    info!(active = %active, "Computed active capabilities");

    let dispatcher = Arc::new(ContactDispatcher::new(config, relay));
    let catalog = CapabilityCatalog::build(config, dispatcher);

    let mut server = McpServer::new(config.server.clone());
    bind(&mut server, catalog, &active)?;
    Ok(server)
}

impl McpServer {
    /// Create a server with nothing registered
    pub fn new(identity: ServerIdentity) -> Self {
        Self {
            identity,
            resources: Vec::new(),
            tools: Vec::new(),
            initialized: false,
        }
    }

    /// Registered tool names, in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Registered resource URIs, in registration order
    pub fn resource_uris(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.uri.as_str()).collect()
    }

    /// Whether the client has sent `notifications/initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server on stdio
    pub async fn run_stdio(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        info!(
            tools = self.tools.len(),
            resources = self.resources.len(),
            "Serving MCP on stdio"
        );

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            match self.handle_message(&line).await {
                Ok(Some(response)) => {
                    let mut response_str = serde_json::to_string(&response)?;
                    response_str.push('\n');
                    stdout.write_all(response_str.as_bytes()).await?;
                    stdout.flush().await?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    error!("Error handling message: {}", e);
                }
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one incoming JSON-RPC message
    pub async fn handle_message(&mut self, message: &str) -> Result<Option<JsonRpcResponse>> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                return Ok(Some(JsonRpcResponse::error(
                    RequestId::Number(0),
                    JsonRpcError::parse_error(e.to_string()),
                )));
            }
        };

        let Some(id) = request.id.clone() else {
            if request.method == methods::INITIALIZED {
                self.initialized = true;
            } else {
                debug!(method = %request.method, "Ignoring notification");
            }
            return Ok(None);
        };

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(),
            methods::PING => Ok(serde_json::json!({})),
            methods::LIST_TOOLS => self.handle_list_tools(),
            methods::CALL_TOOL => self.handle_call_tool(request.params.as_ref()).await,
            methods::LIST_RESOURCES => self.handle_list_resources(),
            methods::READ_RESOURCE => self.handle_read_resource(request.params.as_ref()).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Ok(Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        }))
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> std::result::Result<Value, JsonRpcError> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: self.identity.name.clone(),
                version: self.identity.version.clone(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                resources: Some(ResourcesCapability::default()),
            },
        };

        to_result(&result)
    }

    /// Tool definitions for `tools/list`
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|descriptor| Tool {
                name: descriptor.name.clone(),
                description: descriptor.description.clone(),
                input_schema: descriptor.argument_schema.schema().clone(),
            })
            .collect()
    }

    /// Resource definitions for `resources/list`
    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .map(|registered| Resource {
                uri: registered.uri.clone(),
                name: registered.descriptor.name.clone(),
                description: registered.descriptor.description.clone(),
                mime_type: Some(RESOURCE_MIME_TYPE.to_string()),
            })
            .collect()
    }

    fn handle_list_tools(&self) -> std::result::Result<Value, JsonRpcError> {
        to_result(&ListToolsResult {
            tools: self.list_tools(),
        })
    }

    fn handle_list_resources(&self) -> std::result::Result<Value, JsonRpcError> {
        to_result(&ListResourcesResult {
            resources: self.list_resources(),
        })
    }

    /// Handle call tool request
    ///
    /// Unknown tools and arguments failing the tool's schema are request
    /// errors; anything the executor returns is a successful result.
    async fn handle_call_tool(&self, params: Option<&Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;

        let descriptor = self
            .tools
            .iter()
            .find(|t| t.name == params.name)
            .ok_or_else(|| {
                JsonRpcError::invalid_params(
                    McpError::UnknownTool {
                        name: params.name.clone(),
                    }
                    .to_string(),
                )
            })?;

        if let Err(message) = descriptor.argument_schema.validate(&params.arguments) {
            let err = ValidationError::InvalidArguments {
                tool: descriptor.name.clone(),
                message,
            };
            debug!(error = %err, "Rejected tool call");
            return Err(JsonRpcError::invalid_params(err.to_string()));
        }

        debug!(tool = %descriptor.name, "Calling tool");
        let response = descriptor.executor.execute(params.arguments).await;
        to_result(&response)
    }

    /// Handle read resource request
    async fn handle_read_resource(&self, params: Option<&Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: ReadResourceParams = parse_params(params)?;

        let registered = self
            .resources
            .iter()
            .find(|r| r.uri == params.uri)
            .ok_or_else(|| {
                JsonRpcError::invalid_params(
                    McpError::UnknownResource {
                        uri: params.uri.clone(),
                    }
                    .to_string(),
                )
            })?;

        debug!(uri = %registered.uri, "Reading resource");
        let response = registered.descriptor.executor.execute(Value::Null).await;
        to_result(&ReadResourceResult {
            contents: vec![ResourceContents {
                uri: registered.uri.clone(),
                mime_type: Some(RESOURCE_MIME_TYPE.to_string()),
                text: response.joined_text(),
            }],
        })
    }
}

impl Transport for McpServer {
    fn has_resource(&self, uri: &str) -> bool {
        self.resources.iter().any(|r| r.uri == uri)
    }

    fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    fn register_resource(&mut self, uri: String, descriptor: CapabilityDescriptor) -> Result<()> {
        if self.has_resource(&uri) {
            return Err(CandidateMcpError::Registration(RegistrationError::DuplicateResource { uri }));
        }
        debug!(uri = %uri, "Registering resource");
        self.resources.push(RegisteredResource { uri, descriptor });
        Ok(())
    }

    fn register_tool(&mut self, descriptor: CapabilityDescriptor) -> Result<()> {
        if self.has_tool(&descriptor.name) {
            return Err(CandidateMcpError::Registration(RegistrationError::DuplicateTool {
                name: descriptor.name,
            }));
        }
        debug!(tool = %descriptor.name, "Registering tool");
        self.tools.push(descriptor);
        Ok(())
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: Option<&Value>,
) -> std::result::Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| {
        JsonRpcError::invalid_params(
            McpError::InvalidParams {
                message: "missing params".to_string(),
            }
            .to_string(),
        )
    })?;

    serde_json::from_value(params.clone()).map_err(|e| {
        JsonRpcError::invalid_params(McpError::InvalidParams { message: e.to_string() }.to_string())
    })
}

fn to_result<T: serde::Serialize>(value: &T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
