//! Stdio server that reads JSON-RPC 2.0 requests line by line from stdin
//! and writes one response line per request to stdout.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::errors::{MemberLensError, Result};
use crate::lens::MemberLens;

use super::tools::{get_tool_definitions, handle_tool_call};
use super::transport::{ErrorCode, JsonRpcRequest, JsonRpcResponse};

/// Runtime counters for the server.
struct ServerStats {
    started_at: Instant,
    total_requests: AtomicU64,
    tool_calls: AtomicU64,
    errors: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
            tool_calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

/// Serves member resolution tools over stdio.
pub struct LensServer {
    lens: MemberLens,
    stats: ServerStats,
    tool_call_counts: Mutex<HashMap<String, u64>>,
}

impl LensServer {
    pub fn new(lens: MemberLens) -> Self {
        Self {
            lens,
            stats: ServerStats::new(),
            tool_call_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Runs until stdin is closed.
    pub async fn run(&self) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        info!("server listening on stdio");

        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line) else {
                continue;
            };

            let mut json_line = match serde_json::to_string(&response) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "failed to serialize response");
                    continue;
                }
            };
            json_line.push('\n');
            stdout.write_all(json_line.as_bytes()).await?;
            stdout.flush().await?;
        }

        info!(
            requests = self.stats.total_requests.load(Ordering::Relaxed),
            "stdin closed, server stopping"
        );
        Ok(())
    }

    /// Parses and handles one input line.
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(&request),
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Some(JsonRpcResponse::error(
                    Value::Null,
                    ErrorCode::ParseError,
                    format!("failed to parse JSON-RPC request: {}", e),
                ))
            }
        }
    }

    /// Dispatches a parsed request to the matching handler.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        debug!(method = %request.method, "request received");

        if request.is_notification() {
            return None;
        }
        let id = request.id.clone();

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": get_tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params.as_ref()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            _ => JsonRpcResponse::error(
                id,
                ErrorCode::MethodNotFound,
                format!("method not found: {}", request.method),
            ),
        };

        if response.is_error() {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
        }
        Some(response)
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "memberlens",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_call(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                ErrorCode::InvalidParams,
                "missing params for tools/call".to_string(),
            );
        };

        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(
                id,
                ErrorCode::InvalidParams,
                "missing 'name' in tools/call params".to_string(),
            );
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        self.stats.tool_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut counts) = self.tool_call_counts.lock() {
            *counts.entry(tool_name.to_string()).or_insert(0) += 1;
        }

        let server_stats = (tool_name == "members_status").then(|| self.server_stats_json());

        match handle_tool_call(&self.lens, tool_name, arguments, server_stats) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e @ MemberLensError::InvalidParams { .. }) => {
                JsonRpcResponse::error(id, ErrorCode::InvalidParams, e.to_string())
            }
            Err(e) => JsonRpcResponse::error(
                id,
                ErrorCode::InternalError,
                format!("tool execution failed: {}", e),
            ),
        }
    }

    /// Returns the current runtime statistics as JSON.
    pub fn server_stats_json(&self) -> Value {
        let tool_counts = self
            .tool_call_counts
            .lock()
            .map(|counts| json!(*counts))
            .unwrap_or(json!({}));

        json!({
            "uptime_secs": self.stats.started_at.elapsed().as_secs(),
            "total_requests": self.stats.total_requests.load(Ordering::Relaxed),
            "tool_calls": self.stats.tool_calls.load(Ordering::Relaxed),
            "errors": self.stats.errors.load(Ordering::Relaxed),
            "tool_call_counts": tool_counts,
        })
    }
}
