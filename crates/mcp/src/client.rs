//! Client side of the stdio tool protocol.
//!
//! One long-lived subprocess per client. Calls are serialized over the
//! session; a session that failed at the transport level is discarded and a
//! fresh subprocess is spawned on the next call.

use std::fmt;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use crate::error::ToolError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, ToolCallResult, PROTOCOL_VERSION};

/// Invoke a named tool with JSON arguments and get its JSON payload back.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, tool: &str, arguments: Value) -> Result<Value, ToolError>;
}

#[async_trait]
impl<T> ToolInvoker for Arc<T>
where
    T: ToolInvoker + ?Sized,
{
    async fn invoke(&self, tool: &str, arguments: Value) -> Result<Value, ToolError> {
        (**self).invoke(tool, arguments).await
    }
}

/// Program plus arguments used to launch the tool server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Split a command line on whitespace. No quoting support.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

struct Session {
    // Held for kill_on_drop.
    _child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl Session {
    async fn spawn(command: &ToolCommand) -> Result<Self, ToolError> {
        tracing::debug!(command = %command, "spawning tool server");

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolError::unavailable(format!("failed to start '{command}': {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ToolError::unavailable("tool server stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ToolError::unavailable("tool server stdout not captured"))?;

        let mut session = Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 0,
        };

        let info = session
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": { "name": "shopdesk-agent", "version": env!("CARGO_PKG_VERSION") }
                }),
            )
            .await?;
        session
            .send(&JsonRpcRequest::notification("notifications/initialized"))
            .await?;

        tracing::info!(
            command = %command,
            server = info["serverInfo"]["name"].as_str().unwrap_or("unknown"),
            "tool session established"
        );
        Ok(session)
    }

    async fn send(&mut self, message: &JsonRpcRequest) -> Result<(), ToolError> {
        let mut line = serde_json::to_vec(message).map_err(|e| ToolError::protocol(e.to_string()))?;
        line.push(b'\n');
        self.stdin
            .write_all(&line)
            .await
            .map_err(|e| ToolError::unavailable(format!("write to tool server failed: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| ToolError::unavailable(format!("write to tool server failed: {e}")))
    }

    async fn request(&mut self, method: &str, params: Value) -> Result<Value, ToolError> {
        self.next_id += 1;
        let id = json!(self.next_id);
        self.send(&JsonRpcRequest::new(self.next_id, method, params)).await?;

        loop {
            let line = self
                .stdout
                .next_line()
                .await
                .map_err(|e| ToolError::unavailable(format!("read from tool server failed: {e}")))?
                .ok_or_else(|| ToolError::unavailable("tool server closed its output"))?;
            if line.trim().is_empty() {
                continue;
            }

            let response: JsonRpcResponse = serde_json::from_str(&line)
                .map_err(|e| ToolError::protocol(format!("malformed message: {e}")))?;
            if response.id.as_ref() != Some(&id) {
                tracing::debug!(method, "skipping unrelated message from tool server");
                continue;
            }

            if let Some(error) = response.error {
                return Err(ToolError::Failed {
                    code: format!("rpc_{}", error.code),
                    message: error.message,
                });
            }
            return response
                .result
                .ok_or_else(|| ToolError::protocol("response carried neither result nor error"));
        }
    }
}

/// [`ToolInvoker`] backed by a tool server subprocess.
pub struct StdioToolClient {
    command: ToolCommand,
    timeout: Duration,
    session: Mutex<Option<Session>>,
}

impl StdioToolClient {
    /// No process is started until the first call.
    pub fn new(command: ToolCommand, timeout: Duration) -> Self {
        Self {
            command,
            timeout,
            session: Mutex::new(None),
        }
    }

    async fn call_in(
        slot: &mut Option<Session>,
        command: &ToolCommand,
        tool: &str,
        arguments: Value,
    ) -> Result<Value, ToolError> {
        if slot.is_none() {
            let session = Session::spawn(command).await?;
            *slot = Some(session);
        }
        let Some(session) = slot.as_mut() else {
            return Err(ToolError::unavailable("tool session missing"));
        };

        let raw = session
            .request("tools/call", json!({ "name": tool, "arguments": arguments }))
            .await?;
        let result: ToolCallResult = serde_json::from_value(raw)
            .map_err(|e| ToolError::protocol(format!("malformed tool result: {e}")))?;
        result.into_payload()
    }
}

impl fmt::Debug for StdioToolClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdioToolClient")
            .field("command", &self.command)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolInvoker for StdioToolClient {
    async fn invoke(&self, tool: &str, arguments: Value) -> Result<Value, ToolError> {
        let mut slot = self.session.lock().await;

        let call = Self::call_in(&mut slot, &self.command, tool, arguments);
        let result = tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(ToolError::unavailable(format!(
                    "tool '{tool}' did not answer within {} ms",
                    self.timeout.as_millis()
                )))
            });

        if let Err(err) = &result {
            if err.poisons_session() {
                tracing::warn!(tool, error = %err, "dropping tool session");
                *slot = None;
            } else {
                tracing::debug!(tool, error = %err, "tool reported failure");
            }
        }
        result
    }
}
