use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

/// Where the user collection lives and how strictly keys are enforced.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
    /// When set, creating a user whose `id` is already taken fails with a conflict
    /// instead of appending a second record under the same key.
    #[serde(default)]
    pub reject_duplicate_ids: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { users_file: default_users_file(), reject_duplicate_ids: false }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 4010 }
fn default_users_file() -> PathBuf { PathBuf::from("users.json") }

fn config_path() -> PathBuf {
    std::env::var("CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Read the TOML file at `path`. `Ok(None)` means there is no such file.
pub fn load_from_file(path: &Path) -> Result<Option<AppConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
    };
    let cfg = parse(&content).with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`); without a file, fall back to env vars.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_from_path_or_env(&config_path())
    }

    /// A present but unreadable or malformed file is an error, not a fallback.
    pub fn load_from_path_or_env(path: &Path) -> Result<Self> {
        let mut cfg = match load_from_file(path)? {
            Some(cfg) => cfg,
            None => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config from `SERVER_HOST`, `SERVER_PORT`, `USERS_FILE`,
    /// `REJECT_DUPLICATE_IDS` and `TOKIO_WORKER_THREADS`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());
        if let Ok(file) = std::env::var("USERS_FILE") {
            cfg.storage.users_file = PathBuf::from(file);
        }
        if let Ok(flag) = std::env::var("REJECT_DUPLICATE_IDS") {
            cfg.storage.reject_duplicate_ids = matches!(flag.trim(), "1" | "true" | "yes");
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.users_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.users_file must not be empty"));
        }
        Ok(())
    }
}
