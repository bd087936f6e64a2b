use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub grpc_port: u16,
    pub worker_threads: Option<usize>,
    /// Upper bound applied to every RPC, also when the caller sends no `grpc-timeout`.
    pub request_timeout_secs: u64,
    pub reflection: bool,
    /// Serve the HTTP gateway from the same process as the gRPC server.
    pub embed_gateway: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            grpc_port: 50051,
            worker_threads: Some(4),
            request_timeout_secs: 30,
            reflection: true,
            embed_gateway: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub collection: String,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            name: "employee_db".into(),
            collection: "employees".into(),
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 10,
            max_pool_size: 10,
            min_pool_size: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub grpc_endpoint: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            grpc_endpoint: "http://127.0.0.1:50051".into(),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `$CONFIG_PATH`), apply environment overrides and
    /// validate. A missing or unreadable file falls back to defaults plus
    /// environment variables.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "config file not loaded; using defaults and environment");
                AppConfig::default()
            }
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env_overrides(|key| std::env::var(key).ok());
        self.server.normalize()?;
        self.database.normalize();
        self.database.validate()?;
        self.gateway.validate()?;
        Ok(())
    }

    /// Fill values from the environment. Only empty/unset values are taken
    /// from `MONGODB_URI`; ports and the gateway endpoint always override.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.database.url.trim().is_empty() {
            if let Some(url) = lookup("MONGODB_URI") {
                self.database.url = url;
            }
        }
        if let Some(port) = lookup("GRPC_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.grpc_port = port;
        }
        if let Some(port) = lookup("HTTP_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.gateway.port = port;
        }
        if let Some(endpoint) = lookup("GRPC_ENDPOINT") {
            self.gateway.grpc_endpoint = endpoint;
        }
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.grpc_port == 0 {
            return Err(anyhow!("server.grpc_port must be in 1..=65535"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("server.request_timeout_secs must be a positive number of seconds"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn grpc_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.grpc_port)
    }

    /// Endpoint a co-located client dials to reach this server. Wildcard
    /// binds map to the matching loopback address.
    pub fn local_grpc_endpoint(&self) -> String {
        let host = match self.host.trim() {
            "" | "0.0.0.0" => "127.0.0.1".to_string(),
            "::" | "[::]" => "[::1]".to_string(),
            h if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
            h => h.to_string(),
        };
        format!("http://{}:{}", host, self.grpc_port)
    }
}

impl DatabaseConfig {
    fn normalize(&mut self) {
        if self.url.trim().is_empty() {
            self.url = DEFAULT_MONGODB_URI.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.url must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name must not be empty"));
        }
        if self.collection.trim().is_empty() {
            return Err(anyhow!("database.collection must not be empty"));
        }
        if self.max_pool_size == 0 || self.min_pool_size > self.max_pool_size {
            return Err(anyhow!("database.max_pool_size must be >= 1 and >= min_pool_size"));
        }
        if self.connect_timeout_secs == 0 || self.server_selection_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive numbers of seconds"));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("gateway.port must be in 1..=65535"));
        }
        let lower = self.grpc_endpoint.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("gateway.grpc_endpoint must start with http:// or https://"));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(anyhow!("gateway timeouts must be positive numbers of seconds"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
