//! In-process stub tool server for integration tests
//!
//! Speaks the newline-delimited JSON-RPC framing of the stdio transport
//! over one half of a `tokio::io::duplex` pair, so round trips run without
//! spawning a real server script. Every `tools/call` it sees is recorded
//! for the test to assert on.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::task::JoinHandle;

/// One observed tools/call: tool name plus the argument mapping
pub type ObservedCall = (String, Value);

/// How the stub answers
pub struct StubBehavior {
    /// Tools advertised by `tools/list`: (name, description)
    pub tools: Vec<(&'static str, &'static str)>,
    /// Raw result returned for every `tools/call`
    pub call_result: Value,
    /// Never answer `tools/call`, leaving the caller waiting
    pub silent_calls: bool,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            tools: vec![("navigate_page", "Open a URL in the browser")],
            call_result: json!({ "content": [{ "type": "text", "text": "ok" }] }),
            silent_calls: false,
        }
    }
}

impl StubBehavior {
    pub fn with_call_result(mut self, result: Value) -> Self {
        self.call_result = result;
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent_calls = true;
        self
    }
}

pub struct StubServer {
    pub calls: Arc<Mutex<Vec<ObservedCall>>>,
    _task: JoinHandle<()>,
}

impl StubServer {
    pub fn observed(&self) -> Vec<ObservedCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Spawn the stub; the returned stream is the client's side of the pair
pub fn spawn(behavior: StubBehavior) -> (DuplexStream, StubServer) {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let task = tokio::spawn(serve(server_side, behavior, calls.clone()));
    (client_side, StubServer { calls, _task: task })
}

async fn serve(stream: DuplexStream, behavior: StubBehavior, calls: Arc<Mutex<Vec<ObservedCall>>>) {
    let (read, mut write) = tokio::io::split(stream);
    let mut lines = BufReader::new(read).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let msg: Value = match serde_json::from_str(&line) {
            Ok(msg) => msg,
            Err(_) => continue,
        };

        // Notifications (no id) get no reply
        let Some(id) = msg.get("id").cloned() else {
            continue;
        };
        let method = msg.get("method").and_then(Value::as_str).unwrap_or("");

        let result = match method {
            "initialize" => {
                // echo whatever protocol version the client asked for
                let requested = msg
                    .pointer("/params/protocolVersion")
                    .cloned()
                    .unwrap_or(json!("2024-11-05"));
                json!({
                    "protocolVersion": requested,
                    "capabilities": { "tools": {} },
                    "serverInfo": { "name": "stub-tool-server", "version": "0.0.0" }
                })
            }
            "tools/list" => {
                let tools: Vec<Value> = behavior
                    .tools
                    .iter()
                    .map(|(name, description)| {
                        json!({
                            "name": name,
                            "description": description,
                            "inputSchema": { "type": "object" }
                        })
                    })
                    .collect();
                json!({ "tools": tools })
            }
            "tools/call" => {
                let name = msg
                    .pointer("/params/name")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                let arguments = msg.pointer("/params/arguments").cloned().unwrap_or(json!({}));
                calls.lock().unwrap().push((name, arguments));

                if behavior.silent_calls {
                    continue;
                }
                behavior.call_result.clone()
            }
            "ping" => json!({}),
            _ => json!({}),
        };

        let reply = json!({ "jsonrpc": "2.0", "id": id, "result": result });
        let mut out = serde_json::to_vec(&reply).expect("serialize stub reply");
        out.push(b'\n');
        if write.write_all(&out).await.is_err() {
            break;
        }
    }
}
