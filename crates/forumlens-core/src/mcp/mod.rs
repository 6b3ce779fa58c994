//! MCP (Model Context Protocol) client module
//!
//! Uses the official rmcp SDK to drive a browser-automation tool server
//! spawned as a child process over stdio. The wire protocol lives entirely
//! in the SDK; this module owns the typed boundary around it: launch-kind
//! resolution, session lifecycle, generic invocation, and the fixed
//! convenience calls the demo driver needs.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use forumlens_core::logging::ConsoleLogger;
//! use forumlens_core::mcp::{ForumSite, McpClient};
//!
//! let mut client = McpClient::new(Arc::new(ConsoleLogger::new()));
//! client.connect("./chrome-devtools-mcp/build/src/index.js").await?;
//!
//! for tool in client.list_tools().await? {
//!     println!("{}: {}", tool.name, tool.description);
//! }
//!
//! client.navigate_to("https://www.dongchedi.com/community/145").await?;
//! let comments = client
//!     .extract_comments(ForumSite::Dongchedi, "https://www.dongchedi.com/ugc/article/1853526256983114")
//!     .await?;
//! println!("{comments}");
//!
//! client.close().await?;
//! ```

mod client;
mod error;
mod launch;

pub use client::{first_text, ForumSite, McpClient, ToolDescriptor, UrlSet};
pub use error::{McpError, McpResult};
pub use launch::{LaunchPlan, LaunchRegistry, ServerKind};

// Re-export rmcp types that consumers of `invoke` might need
pub use rmcp::model::{CallToolResult, Content, RawContent};
