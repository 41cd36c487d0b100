//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use shopdesk_mcp::ToolCommand;

pub const BIND_VAR: &str = "SHOPDESK_BIND";
pub const SEED_FILE_VAR: &str = "SHOPDESK_SEED_FILE";
pub const TOOL_BACKEND_VAR: &str = "SHOPDESK_TOOL_BACKEND";
pub const MCP_COMMAND_VAR: &str = "SHOPDESK_MCP_COMMAND";
pub const TOOL_TIMEOUT_VAR: &str = "SHOPDESK_TOOL_TIMEOUT_MS";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_MCP_COMMAND: &str = "shopdesk-mcp";
const DEFAULT_TOOL_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

/// Where catalog operations run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolBackend {
    /// In-process store.
    Local,
    /// Tool server subprocess.
    Mcp(ToolCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// Seeds the in-process store. The tool server subprocess inherits the
    /// environment and reads the same variable itself.
    pub seed_file: Option<PathBuf>,
    pub backend: ToolBackend,
    pub tool_timeout: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = get(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(BIND_VAR, format!("'{bind_raw}': {e}")))?;

        let seed_file = get(SEED_FILE_VAR).map(PathBuf::from);

        let backend = match get(TOOL_BACKEND_VAR).as_deref().map(str::trim) {
            None | Some("local") => ToolBackend::Local,
            Some("mcp") => {
                let line = get(MCP_COMMAND_VAR).unwrap_or_else(|| DEFAULT_MCP_COMMAND.to_string());
                let command = ToolCommand::parse(&line)
                    .ok_or_else(|| ConfigError::invalid(MCP_COMMAND_VAR, "empty command"))?;
                ToolBackend::Mcp(command)
            }
            Some(other) => {
                return Err(ConfigError::invalid(
                    TOOL_BACKEND_VAR,
                    format!("'{other}' (expected 'local' or 'mcp')"),
                ));
            }
        };

        let tool_timeout = match get(TOOL_TIMEOUT_VAR) {
            None => Duration::from_millis(DEFAULT_TOOL_TIMEOUT_MS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => return Err(ConfigError::invalid(TOOL_TIMEOUT_VAR, "must be positive")),
                Ok(ms) => Duration::from_millis(ms),
                Err(e) => {
                    return Err(ConfigError::invalid(TOOL_TIMEOUT_VAR, format!("'{raw}': {e}")));
                }
            },
        };

        Ok(Self {
            bind,
            seed_file,
            backend,
            tool_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.seed_file, None);
        assert_eq!(cfg.backend, ToolBackend::Local);
        assert_eq!(cfg.tool_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn mcp_backend_parses_command_line() {
        let cfg = config(&[
            (TOOL_BACKEND_VAR, "mcp"),
            (MCP_COMMAND_VAR, "/opt/shopdesk/bin/shopdesk-mcp --seed /etc/catalog.json"),
            (TOOL_TIMEOUT_VAR, "250"),
        ])
        .unwrap();
        assert_eq!(
            cfg.backend,
            ToolBackend::Mcp(
                ToolCommand::new("/opt/shopdesk/bin/shopdesk-mcp")
                    .arg("--seed")
                    .arg("/etc/catalog.json")
            )
        );
        assert_eq!(cfg.tool_timeout, Duration::from_millis(250));
    }

    #[test]
    fn mcp_backend_defaults_to_binary_on_path() {
        let cfg = config(&[(TOOL_BACKEND_VAR, "mcp")]).unwrap();
        assert_eq!(cfg.backend, ToolBackend::Mcp(ToolCommand::new("shopdesk-mcp")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config(&[(BIND_VAR, "localhost")]),
            Err(ConfigError::Invalid { var: BIND_VAR, .. })
        ));
        assert!(matches!(
            config(&[(TOOL_BACKEND_VAR, "grpc")]),
            Err(ConfigError::Invalid { var: TOOL_BACKEND_VAR, .. })
        ));
        assert!(matches!(
            config(&[(TOOL_TIMEOUT_VAR, "soon")]),
            Err(ConfigError::Invalid { var: TOOL_TIMEOUT_VAR, .. })
        ));
        assert!(matches!(
            config(&[(TOOL_TIMEOUT_VAR, "0")]),
            Err(ConfigError::Invalid { var: TOOL_TIMEOUT_VAR, .. })
        ));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[(SEED_FILE_VAR, "  "), (TOOL_BACKEND_VAR, "")]).unwrap();
        assert_eq!(cfg.seed_file, None);
        assert_eq!(cfg.backend, ToolBackend::Local);
    }
}
