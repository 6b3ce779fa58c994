//! Launch-kind resolution for tool server scripts
//!
//! The server is an out-of-process script started with an interpreter plus
//! a single path argument. Which interpreter to use is decided here, once,
//! through an explicit registry; the client never sniffs string suffixes
//! mid-connect and never spawns anything for an unrecognized script.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::{McpError, McpResult};

/// Built-in launch kinds for the two supported server script flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    /// JavaScript server, launched with `node`
    Node,
    /// Python server, launched with `python`
    Python,
}

impl ServerKind {
    /// The interpreter command for this kind
    pub fn interpreter(self) -> &'static str {
        match self {
            ServerKind::Node => "node",
            ServerKind::Python => "python",
        }
    }

    /// The script suffix this kind is registered under by default
    pub fn suffix(self) -> &'static str {
        match self {
            ServerKind::Node => "js",
            ServerKind::Python => "py",
        }
    }
}

/// A resolved launch: interpreter command plus the script to hand it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub command: String,
    pub script: PathBuf,
}

/// Registry mapping script suffixes to interpreter commands
///
/// Defaults cover `.js` -> `node` and `.py` -> `python`. Embedders may
/// register further suffixes (or shadow the defaults) before connecting.
#[derive(Debug, Clone)]
pub struct LaunchRegistry {
    commands: HashMap<String, String>,
}

impl Default for LaunchRegistry {
    fn default() -> Self {
        let mut commands = HashMap::new();
        for kind in [ServerKind::Node, ServerKind::Python] {
            commands.insert(kind.suffix().to_string(), kind.interpreter().to_string());
        }
        Self { commands }
    }
}

impl LaunchRegistry {
    /// Registry with the built-in suffixes only
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no entries at all
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register (or shadow) the interpreter command for a suffix
    pub fn register(&mut self, suffix: impl Into<String>, command: impl Into<String>) -> &mut Self {
        self.commands.insert(suffix.into(), command.into());
        self
    }

    /// Resolve a server script path to a launch plan
    ///
    /// Pure lookup; nothing is spawned here. An unknown or missing suffix
    /// fails with `UnsupportedServerScript`.
    pub fn resolve(&self, script: impl AsRef<Path>) -> McpResult<LaunchPlan> {
        let script = script.as_ref();
        let suffix = script
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| McpError::UnsupportedServerScript {
                path: script.to_path_buf(),
            })?;

        let command = self
            .commands
            .get(suffix)
            .ok_or_else(|| McpError::UnsupportedServerScript {
                path: script.to_path_buf(),
            })?;

        Ok(LaunchPlan {
            command: command.clone(),
            script: script.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_resolves_to_node() {
        let plan = LaunchRegistry::default()
            .resolve("./chrome-devtools-mcp/build/src/index.js")
            .unwrap();
        assert_eq!(plan.command, "node");
        assert_eq!(plan.script, PathBuf::from("./chrome-devtools-mcp/build/src/index.js"));
    }

    #[test]
    fn py_resolves_to_python() {
        let plan = LaunchRegistry::default().resolve("server.py").unwrap();
        assert_eq!(plan.command, "python");
    }

    #[test]
    fn unknown_suffix_is_a_configuration_error() {
        let err = LaunchRegistry::default().resolve("server.rb").unwrap_err();
        assert!(matches!(err, McpError::UnsupportedServerScript { .. }));
    }

    #[test]
    fn missing_suffix_is_a_configuration_error() {
        let err = LaunchRegistry::default().resolve("server").unwrap_err();
        assert!(matches!(err, McpError::UnsupportedServerScript { .. }));
    }

    #[test]
    fn registered_suffixes_shadow_defaults() {
        let mut registry = LaunchRegistry::default();
        registry.register("py", "python3").register("mjs", "node");

        assert_eq!(registry.resolve("s.py").unwrap().command, "python3");
        assert_eq!(registry.resolve("s.mjs").unwrap().command, "node");
        // untouched default still resolves
        assert_eq!(registry.resolve("s.js").unwrap().command, "node");
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        assert!(LaunchRegistry::empty().resolve("s.js").is_err());
    }
}
