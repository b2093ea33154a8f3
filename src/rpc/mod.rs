//! Stdio JSON-RPC 2.0 server for member resolution.
//!
//! Lets a bot's command-dispatch layer, or any other process, resolve member
//! references against the loaded rosters without linking this crate.

/// Server loop and request dispatch.
pub mod server;

/// Tool definitions and handlers.
pub mod tools;

/// JSON-RPC 2.0 message types.
pub mod transport;

pub use server::LensServer;
pub use tools::{get_tool_definitions, handle_tool_call, ToolDefinition};
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
