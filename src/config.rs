//! Process configuration.
//!
//! The agent reads its knobs from the environment (the deployment contract
//! inherited by this system); the orchestrator takes its bind address and
//! TLS material paths from command-line flags. Anything malformed or absent
//! falls back to a default — only the orchestrator's TLS material is allowed
//! to be fatal, and that happens at load time, not here.

use anyhow::{Result, anyhow};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RPC_PORT: u16 = 5000;

/// Agent-side configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Number of standard workers (`COMPUTING_POWER`, default 3). One
    /// delegated-computation worker always runs on top of these.
    pub computing_power: usize,
    /// Fixed backoff between failed polls (`IDLE_DELAY` ms, default 5000).
    pub idle_delay: Duration,
    /// Orchestrator base URL, assembled from `SERVER_HOST` (default
    /// `localhost`) and `SERVER_PORT` (default 5000).
    pub server_url: String,
    /// Trust root for the orchestrator's certificate (`CA_CERT`, default
    /// `certs/server.crt`).
    pub root_ca: PathBuf,
    /// Credential for the delegated computation service (`API_KEY`). Absent
    /// means the delegated worker fails every task with a missing-credential
    /// error instead of the process refusing to start.
    pub api_key: Option<String>,
    /// Chat-completion endpoint for delegated computation (`INFERENCE_URL`).
    pub inference_url: String,
    /// Model requested from the inference service (`INFERENCE_MODEL`).
    pub inference_model: String,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        let computing_power = env_parse("COMPUTING_POWER", 3usize);
        let idle_delay_ms = env_parse("IDLE_DELAY", 5000u64);
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env_parse("SERVER_PORT", DEFAULT_RPC_PORT);
        let api_key = std::env::var("API_KEY").ok().filter(|key| !key.is_empty());

        Self {
            computing_power,
            idle_delay: Duration::from_millis(idle_delay_ms),
            server_url: format!("https://{}:{}", host, port),
            root_ca: std::env::var("CA_CERT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("certs/server.crt")),
            api_key,
            inference_url: std::env::var("INFERENCE_URL").unwrap_or_else(|_| {
                "https://openai.api.proxyapi.ru/v1/chat/completions".to_string()
            }),
            inference_model: std::env::var("INFERENCE_MODEL")
                .unwrap_or_else(|_| "anthropic/claude-sonnet-4-20250514".to_string()),
        }
    }
}

/// Orchestrator-side configuration, parsed from command-line flags.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub bind_addr: SocketAddr,
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl OrchestratorConfig {
    /// Parses `--bind <addr:port> --cert <pem> --key <pem>`, all optional.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_RPC_PORT)),
            cert: PathBuf::from("certs/server.crt"),
            key: PathBuf::from("certs/server.key"),
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow!("--bind requires an <addr:port> value"))?;
                    config.bind_addr = value.parse()?;
                    i += 2;
                }
                "--cert" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow!("--cert requires a path"))?;
                    config.cert = PathBuf::from(value);
                    i += 2;
                }
                "--key" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow!("--key requires a path"))?;
                    config.key = PathBuf::from(value);
                    i += 2;
                }
                other => return Err(anyhow!("unknown flag: {}", other)),
            }
        }

        Ok(config)
    }
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orchestrator_defaults_when_no_flags() {
        let config = OrchestratorConfig::from_args(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), DEFAULT_RPC_PORT);
        assert_eq!(config.cert, PathBuf::from("certs/server.crt"));
    }

    #[test]
    fn orchestrator_parses_flags() {
        let args: Vec<String> = ["--bind", "127.0.0.1:6001", "--cert", "/tmp/c.pem", "--key", "/tmp/k.pem"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = OrchestratorConfig::from_args(&args).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:6001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.key, PathBuf::from("/tmp/k.pem"));
    }

    #[test]
    fn orchestrator_rejects_unknown_flag() {
        let args = vec!["--verbose".to_string()];
        assert!(OrchestratorConfig::from_args(&args).is_err());
    }

    #[test]
    fn orchestrator_rejects_missing_value() {
        let args = vec!["--bind".to_string()];
        assert!(OrchestratorConfig::from_args(&args).is_err());
    }
}
