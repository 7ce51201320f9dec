//! Daemon configuration from environment variables

use anyhow::{Context, Result};
use frontdesk_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use frontdesk_api_rpc::RpcServerConfig;
use frontdesk_core::application::QueuePolicy;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FRONTDESK_DB_PATH";
pub const ENV_RPC_HOST: &str = "FRONTDESK_RPC_HOST";
pub const ENV_RPC_PORT: &str = "FRONTDESK_RPC_PORT";
pub const ENV_LOG_FORMAT: &str = "FRONTDESK_LOG_FORMAT";

const DEFAULT_DB_PATH: &str = "~/.frontdesk/queue.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: String,
    pub rpc: RpcServerConfig,
    pub policy: QueuePolicy,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_db_path = lookup(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&raw_db_path).into_owned();

        let host = lookup(ENV_RPC_HOST).unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());
        let port = match lookup(ENV_RPC_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{}: invalid port '{}'", ENV_RPC_PORT, raw))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match lookup(ENV_LOG_FORMAT).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let policy = QueuePolicy::from_lookup(&lookup)?;

        Ok(Self {
            db_path,
            rpc: RpcServerConfig { host, port },
            policy,
            log_format,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.contains(":memory:")
    }

    /// Directory that must exist before SQLite can create the file
    pub fn db_dir(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            return None;
        }
        let path = self.db_path.trim_start_matches("sqlite:").trim_start_matches("//");
        PathBuf::from(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
    }
}
