//! Stdio transport for the MCP endpoint
//!
//! Carries newline-delimited JSON-RPC over stdin/stdout, one request handled
//! to completion before the next line is read. Batch payloads are processed
//! item by item; an all-notification batch produces no output line.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

pub async fn serve_stdio(state: AppState) -> std::io::Result<()> {
    serve(state, tokio::io::stdin(), tokio::io::stdout()).await
}

pub async fn serve<R, W>(state: AppState, reader: R, writer: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut writer = writer;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = handle_line(&state, &line) else {
            continue;
        };

        writer.write_all(response.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("stdio session closed");
    Ok(())
}

/// Handle one transport line. Returns `None` when nothing must be written
/// back (notifications).
pub fn handle_line(state: &AppState, line: &str) -> Option<Value> {
    let payload: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(_) => return Some(json_rpc_error(None, -32700, "Parse error")),
    };

    if let Some(batch) = payload.as_array() {
        if batch.is_empty() {
            return Some(Value::Array(vec![json_rpc_error(
                None,
                -32600,
                "Invalid Request",
            )]));
        }

        let responses: Vec<Value> = batch
            .iter()
            .filter_map(|item| handle_json_rpc_value(state, item.clone()))
            .collect();

        if responses.is_empty() {
            return None;
        }

        return Some(Value::Array(responses));
    }

    handle_json_rpc_value(state, payload)
}
