//! Forumlens Core
//!
//! A typed client boundary around a browser-automation MCP tool server.
//! The server is an out-of-process script (the chrome-devtools MCP build)
//! spawned over stdio; the wire protocol is owned by the official rmcp
//! SDK. This crate owns everything around it: launch-kind resolution,
//! session lifecycle, generic tool invocation with typed errors, and the
//! fixed convenience calls for opening pages, capturing DOM snapshots and
//! extracting car-forum comments.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use forumlens_core::{ClientConfig, ConsoleLogger, ForumSite, McpClient};
//!
//! let config = ClientConfig::load_user()?;
//! let mut client = McpClient::new(Arc::new(ConsoleLogger::new()));
//! client.connect_with(&config.server_script, &config.launch_registry()).await?;
//!
//! let comments = client
//!     .extract_comments(ForumSite::Autohome, vec!["https://a", "https://b"])
//!     .await?;
//!
//! client.close().await?;
//! ```

pub mod config;
pub mod logging;
pub mod mcp;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigError, ConfigResult};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, SharedLogger};

pub use mcp::{
    first_text, CallToolResult, ForumSite, LaunchPlan, LaunchRegistry, McpClient, McpError,
    McpResult, ServerKind, ToolDescriptor, UrlSet,
};
