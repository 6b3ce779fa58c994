//! Client error taxonomy

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the MCP client
///
/// Every failure is returned to the caller as a typed value; the client
/// itself never prints-and-continues. Callers compose logging on top.
#[derive(Error, Debug)]
pub enum McpError {
    /// The server script path has no registered launch command
    #[error("unsupported server script '{path}': no launch command registered for this suffix")]
    UnsupportedServerScript { path: PathBuf },

    /// Spawning the server subprocess or the initialize handshake failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// `connect` was called while a session is already live
    #[error("already connected; a client drives at most one session")]
    AlreadyConnected,

    /// An operation was issued before `connect` or after `close`
    #[error("not connected to a tool server")]
    NotConnected,

    /// The transport faulted or the server reported the tool call as failed
    #[error("tool '{tool}' failed: {message}")]
    Invocation { tool: String, message: String },

    /// The per-call deadline elapsed before the server answered
    #[error("tool '{tool}' timed out after {deadline:?}")]
    Timeout { tool: String, deadline: Duration },

    /// The result carried no usable first content block
    #[error("malformed tool result: {0}")]
    MalformedResult(&'static str),
}

pub type McpResult<T> = Result<T, McpError>;
