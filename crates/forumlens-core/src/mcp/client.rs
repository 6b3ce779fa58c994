//! MCP client for the browser-automation tool server
//!
//! Spawns the tool server script as a child process and drives it over the
//! rmcp stdio transport. One client owns at most one session; a fresh
//! client is needed after `close`.

use std::fmt::Display;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Implementation,
        RawContent, Tool,
    },
    service::{RunningService, ServiceError},
    transport::{ConfigureCommandExt, TokioChildProcess},
    RoleClient, ServiceExt,
};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;

use crate::logging::Logger;

use super::error::{McpError, McpResult};
use super::launch::{LaunchPlan, LaunchRegistry, ServerKind};

/// Name plus human-readable description of a server-side tool
///
/// Produced by `tools/list`, consumed read-only for discovery. Order is
/// server-defined and not guaranteed stable across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

impl From<Tool> for ToolDescriptor {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

/// The two car-forum sites the server knows how to extract comments from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForumSite {
    /// dongchedi.com
    Dongchedi,
    /// club.autohome.com.cn
    Autohome,
}

impl ForumSite {
    /// The server-side extraction tool for this site
    pub fn tool_name(self) -> &'static str {
        match self {
            ForumSite::Dongchedi => "extract_dcd_by_url",
            ForumSite::Autohome => "extract_qczj_by_url",
        }
    }
}

/// One URL or several, for comment extraction
///
/// The two server-side tool signatures differ by argument key (`url` vs
/// `urls`), not just arity, so the request shape is decided by the variant
/// alone, never by the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSet {
    Single(String),
    Many(Vec<String>),
}

impl UrlSet {
    /// Build the argument mapping the extraction tools expect
    pub fn into_arguments(self) -> Value {
        match self {
            UrlSet::Single(url) => serde_json::json!({ "url": url }),
            UrlSet::Many(urls) => serde_json::json!({ "urls": urls }),
        }
    }
}

impl From<&str> for UrlSet {
    fn from(url: &str) -> Self {
        UrlSet::Single(url.to_string())
    }
}

impl From<String> for UrlSet {
    fn from(url: String) -> Self {
        UrlSet::Single(url)
    }
}

impl From<Vec<String>> for UrlSet {
    fn from(urls: Vec<String>) -> Self {
        UrlSet::Many(urls)
    }
}

impl From<Vec<&str>> for UrlSet {
    fn from(urls: Vec<&str>) -> Self {
        UrlSet::Many(urls.into_iter().map(str::to_string).collect())
    }
}

/// Extract the first content block's text payload
///
/// The server makes no guarantee on block count; an empty result or a
/// non-text first block is a `MalformedResult`, never an index fault.
pub fn first_text(result: &CallToolResult) -> McpResult<String> {
    let block = result
        .content
        .first()
        .ok_or(McpError::MalformedResult("result carried no content blocks"))?;
    match &block.raw {
        RawContent::Text(text) => Ok(text.text.clone()),
        _ => Err(McpError::MalformedResult("first content block is not text")),
    }
}

/// Client for the browser-automation MCP tool server
///
/// State machine: `Disconnected -> connect -> Connected -> close ->
/// Disconnected`. A failed `connect` leaves the client disconnected;
/// operations outside `Connected` fail with `NotConnected` without
/// touching any transport.
pub struct McpClient {
    session: Option<RunningService<RoleClient, ClientInfo>>,
    logger: Arc<dyn Logger>,
    call_timeout: Option<Duration>,
}

impl McpClient {
    /// Create a disconnected client
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            session: None,
            logger,
            call_timeout: None,
        }
    }

    /// Set a per-call deadline applied to every round trip
    pub fn with_call_timeout(mut self, deadline: Duration) -> Self {
        self.call_timeout = Some(deadline);
        self
    }

    /// Whether a session is live
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Connect using the default launch registry (`.js` -> node, `.py` -> python)
    pub async fn connect(&mut self, server_script: impl AsRef<Path>) -> McpResult<()> {
        self.connect_with(server_script, &LaunchRegistry::default())
            .await
    }

    /// Connect using a caller-supplied launch registry
    pub async fn connect_with(
        &mut self,
        server_script: impl AsRef<Path>,
        registry: &LaunchRegistry,
    ) -> McpResult<()> {
        let plan = registry.resolve(server_script)?;
        self.spawn_and_attach(plan).await
    }

    /// Connect with an explicitly chosen launch kind, bypassing suffix lookup
    pub async fn connect_kind(
        &mut self,
        server_script: impl AsRef<Path>,
        kind: ServerKind,
    ) -> McpResult<()> {
        let plan = LaunchPlan {
            command: kind.interpreter().to_string(),
            script: server_script.as_ref().to_path_buf(),
        };
        self.spawn_and_attach(plan).await
    }

    /// Attach to a server over an already-established duplex stream
    ///
    /// For embedders that run the server themselves (and for tests, which
    /// pair the client with an in-process stub over `tokio::io::duplex`).
    pub async fn connect_stream<S>(&mut self, stream: S) -> McpResult<()>
    where
        S: AsyncRead + AsyncWrite + Send + Sync + Unpin + 'static,
    {
        if self.session.is_some() {
            return Err(McpError::AlreadyConnected);
        }

        let session = Self::client_info()
            .serve(stream)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        self.logger.info("[McpClient] Connected and initialized (stream)");
        self.session = Some(session);
        Ok(())
    }

    async fn spawn_and_attach(&mut self, plan: LaunchPlan) -> McpResult<()> {
        if self.session.is_some() {
            return Err(McpError::AlreadyConnected);
        }

        self.logger.info(&format!(
            "[McpClient] Launching tool server: {} {}",
            plan.command,
            plan.script.display()
        ));

        let transport = TokioChildProcess::new(Command::new(&plan.command).configure(|cmd| {
            cmd.arg(&plan.script);
        }))
        .map_err(|e| {
            McpError::ConnectionFailed(format!("failed to spawn '{}': {}", plan.command, e))
        })?;

        let session = Self::client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        self.logger.info("[McpClient] Connected and initialized");
        self.session = Some(session);
        Ok(())
    }

    fn client_info() -> ClientInfo {
        ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "forumlens-core".to_string(),
                title: Some("Forumlens".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
        }
    }

    fn session(&self) -> McpResult<&RunningService<RoleClient, ClientInfo>> {
        self.session.as_ref().ok_or(McpError::NotConnected)
    }

    /// Run one round trip under the configured deadline, if any
    ///
    /// Returns the inner outcome untouched so callers can map the
    /// transport error themselves.
    async fn bounded<T, E, F>(&self, op: &str, fut: F) -> McpResult<Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        match self.call_timeout {
            Some(deadline) => {
                tokio::time::timeout(deadline, fut)
                    .await
                    .map_err(|_| McpError::Timeout {
                        tool: op.to_string(),
                        deadline,
                    })
            }
            None => Ok(fut.await),
        }
    }

    fn invocation_error(op: &str, e: impl Display) -> McpError {
        McpError::Invocation {
            tool: op.to_string(),
            message: e.to_string(),
        }
    }

    /// List the tools the server currently exposes
    pub async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        let session = self.session()?;
        let result = self
            .bounded("tools/list", session.list_tools(Default::default()))
            .await?
            .map_err(|e| Self::invocation_error("tools/list", e))?;

        self.logger
            .debug(&format!("[McpClient] Listed {} tools", result.tools.len()));

        Ok(result.tools.into_iter().map(ToolDescriptor::from).collect())
    }

    /// Invoke a named tool with an argument mapping
    ///
    /// The argument shape is server-validated; the client makes no
    /// assumptions beyond serializing the mapping. Server-reported tool
    /// failures (`isError`) and transport faults both surface as
    /// `Invocation` errors for the caller to log, retry, or abort.
    pub async fn invoke(&self, name: &str, arguments: Value) -> McpResult<CallToolResult> {
        let session = self.session()?;
        self.logger.debug(&format!("[McpClient] Calling tool: {}", name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        let result = match self.bounded(name, session.call_tool(params)).await? {
            Ok(result) => result,
            // the SDK refuses to deserialize a tool result it considers
            // invalid (e.g. empty content with no structured payload); that
            // is a malformed result, not a transport fault
            Err(ServiceError::UnexpectedResponse { .. }) => {
                return Err(McpError::MalformedResult(
                    "response did not deserialize as a tool result",
                ))
            }
            Err(e) => return Err(Self::invocation_error(name, e)),
        };

        if result.is_error.unwrap_or(false) {
            let message = first_text(&result)
                .unwrap_or_else(|_| "tool reported an error without detail".to_string());
            return Err(McpError::Invocation {
                tool: name.to_string(),
                message,
            });
        }

        Ok(result)
    }

    /// Open a page in the controlled browser
    pub async fn navigate_to(&self, url: &str) -> McpResult<CallToolResult> {
        self.invoke("navigate_page", serde_json::json!({ "type": "url", "url": url }))
            .await
    }

    /// Capture a DOM snapshot of the current page to `file_path`
    ///
    /// The path is passed through to the server, which does the writing.
    pub async fn capture_snapshot(&self, file_path: impl AsRef<Path>) -> McpResult<CallToolResult> {
        let path = file_path.as_ref().to_string_lossy().into_owned();
        self.invoke("take_snapshot", serde_json::json!({ "filePath": path }))
            .await
    }

    /// Extract forum comments from one URL or several
    ///
    /// Returns the first text payload of the tool result.
    pub async fn extract_comments(
        &self,
        site: ForumSite,
        urls: impl Into<UrlSet>,
    ) -> McpResult<String> {
        let result = self
            .invoke(site.tool_name(), urls.into().into_arguments())
            .await?;
        first_text(&result)
    }

    /// Implementation info reported by the server during the handshake
    pub fn server_info(&self) -> Option<&Implementation> {
        self.session
            .as_ref()
            .and_then(|s| s.peer_info())
            .map(|info| &info.server_info)
    }

    /// Tear down the session and the server subprocess
    ///
    /// Idempotent: the session is taken out and cancelled exactly once;
    /// further calls are no-ops.
    pub async fn close(&mut self) -> McpResult<()> {
        if let Some(session) = self.session.take() {
            self.logger.info("[McpClient] Closing connection");
            session
                .cancel()
                .await
                .map_err(|e| McpError::ConnectionFailed(format!("shutdown: {}", e)))?;
        }
        Ok(())
    }
}
