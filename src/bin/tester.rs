//! Smoke-test client for the rules server
//!
//! Spawns the server over piped stdio, initializes the MCP session, lists
//! the tools, and calls each one in turn. A failing tool call is reported
//! and the run continues; a failing connection or handshake aborts the run.

use std::process::Stdio;
use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crewai_rules_mcp::config::{Config, ConfigError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
enum TesterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to launch server process: {0}")]
    Spawn(std::io::Error),
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server closed the connection")]
    ConnectionClosed,
    #[error("timed out waiting for a response")]
    Timeout,
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("tool call failed: {0}")]
    ToolCall(String),
}

/// Scoped stdio session with a spawned server process. `kill_on_drop`
/// guarantees the child is released on every exit path.
struct ServerConnection {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    next_id: i64,
}

impl ServerConnection {
    async fn spawn(config: &Config) -> Result<Self, TesterError> {
        let mut child = Command::new(&config.server_command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(TesterError::Spawn)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TesterError::Protocol("server stdin was not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TesterError::Protocol("server stdout was not captured".to_string()))?;

        Ok(Self {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
            next_id: 0,
        })
    }

    async fn send(&mut self, payload: &Value) -> Result<(), TesterError> {
        self.stdin.write_all(payload.to_string().as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Issue one request and read lines until the response with the matching
    /// id arrives. Unrelated output is skipped.
    async fn request(&mut self, method: &str, params: Value) -> Result<Value, TesterError> {
        self.next_id += 1;
        let id = self.next_id;
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        }))
        .await?;

        loop {
            let line = tokio::time::timeout(REQUEST_TIMEOUT, self.lines.next_line())
                .await
                .map_err(|_| TesterError::Timeout)??
                .ok_or(TesterError::ConnectionClosed)?;

            if line.trim().is_empty() {
                continue;
            }
            let Ok(response) = serde_json::from_str::<Value>(&line) else {
                continue;
            };
            if response.get("id") == Some(&json!(id)) {
                return Ok(response);
            }
        }
    }

    async fn notify(&mut self, method: &str) -> Result<(), TesterError> {
        self.send(&json!({ "jsonrpc": "2.0", "method": method })).await
    }

    async fn initialize(&mut self) -> Result<(), TesterError> {
        let response = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "clientInfo": {
                        "name": "crewai-rules-tester",
                        "version": env!("CARGO_PKG_VERSION")
                    },
                    "capabilities": {}
                }),
            )
            .await?;

        if let Some(error) = response.get("error") {
            return Err(TesterError::Protocol(format!("initialize failed: {error}")));
        }
        if !response["result"]["serverInfo"].is_object() {
            return Err(TesterError::Protocol(
                "initialize result is missing serverInfo".to_string(),
            ));
        }

        self.notify("notifications/initialized").await
    }

    async fn list_tools(&mut self) -> Result<Vec<(String, String)>, TesterError> {
        let response = self.request("tools/list", json!({})).await?;

        if let Some(error) = response.get("error") {
            return Err(TesterError::Protocol(format!("tools/list failed: {error}")));
        }

        let tools = response["result"]["tools"]
            .as_array()
            .ok_or_else(|| TesterError::Protocol("tools/list result has no tools".to_string()))?;

        Ok(tools
            .iter()
            .map(|tool| {
                (
                    tool["name"].as_str().unwrap_or_default().to_string(),
                    tool["description"].as_str().unwrap_or_default().to_string(),
                )
            })
            .collect())
    }

    async fn call_tool(&mut self, name: &str) -> Result<Value, TesterError> {
        let response = self
            .request("tools/call", json!({ "name": name, "arguments": {} }))
            .await?;

        if let Some(error) = response.get("error") {
            let message = error["message"].as_str().unwrap_or("unknown error");
            return Err(TesterError::ToolCall(message.to_string()));
        }

        Ok(response["result"].clone())
    }

    async fn shutdown(self) {
        let Self {
            mut child, stdin, ..
        } = self;

        // Closing stdin lets the server exit on EOF before we reap it.
        drop(stdin);
        if tokio::time::timeout(Duration::from_secs(2), child.wait())
            .await
            .is_err()
        {
            let _ = child.kill().await;
        }
    }
}

/// Display strings for one tool result: JSON text content is pretty-printed,
/// anything else falls back to raw text.
fn render_tool_result(result: &Value) -> Vec<String> {
    let content = match result.get("content").and_then(Value::as_array) {
        Some(content) if !content.is_empty() => content,
        _ => return vec!["No content in response".to_string()],
    };

    content
        .iter()
        .map(|block| match block.get("text").and_then(Value::as_str) {
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(parsed) => serde_json::to_string_pretty(&parsed)
                    .unwrap_or_else(|_| text.to_string()),
                Err(_) => text.to_string(),
            },
            None => block.to_string(),
        })
        .collect()
}

async fn exercise(connection: &mut ServerConnection) -> Result<(), TesterError> {
    connection.initialize().await?;
    println!("Session initialized");

    let tools = connection.list_tools().await?;
    println!("Found {} tools:", tools.len());
    for (name, description) in &tools {
        println!("  - {name}: {description}");
    }

    let mut failures = 0usize;
    for (name, _) in &tools {
        println!("\nCalling tool: {name}");
        match connection.call_tool(name).await {
            Ok(result) => {
                for rendered in render_tool_result(&result) {
                    println!("{rendered}");
                }
            }
            Err(error) => {
                failures += 1;
                println!("Error calling tool '{name}': {error}");
            }
        }
    }

    if failures == 0 {
        println!("\nAll {} tool calls completed successfully", tools.len());
    } else {
        println!("\n{failures} of {} tool calls failed", tools.len());
    }
    Ok(())
}

async fn run() -> Result<(), TesterError> {
    let config = Config::from_env()?;
    println!(
        "Testing CrewAI rules MCP server: {}",
        config.server_command.display()
    );

    let mut connection = ServerConnection::spawn(&config).await?;
    let outcome = exercise(&mut connection).await;
    connection.shutdown().await;
    outcome
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Test run failed: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_tool_result;

    #[test]
    fn renders_json_text_content_pretty() {
        let result = json!({
            "content": [{ "type": "text", "text": "{\"success\":true,\"instructions\":[\"a\"]}" }]
        });

        let rendered = render_tool_result(&result);
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].contains("\"success\": true"));
        assert!(rendered[0].contains('\n'));
    }

    #[test]
    fn falls_back_to_raw_text_for_non_json() {
        let result = json!({
            "content": [{ "type": "text", "text": "plain advice" }]
        });

        assert_eq!(render_tool_result(&result), vec!["plain advice"]);
    }

    #[test]
    fn reports_missing_content() {
        assert_eq!(
            render_tool_result(&json!({})),
            vec!["No content in response"]
        );
        assert_eq!(
            render_tool_result(&json!({ "content": [] })),
            vec!["No content in response"]
        );
    }
}
