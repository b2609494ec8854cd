use serde::Deserialize;

/// Env var that overrides `api.token` (keeps the bearer token out of the config file).
pub const TOKEN_ENV: &str = "LIAISON_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Control-plane base URL, e.g. "http://127.0.0.1:8080".
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// page_size sent with the device/application/edge list requests.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_traffic_interval_secs")]
    pub traffic_interval_secs: u64,
    /// `limit` query parameter for the traffic metrics request.
    #[serde(default = "default_metrics_limit")]
    pub metrics_limit: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            traffic_interval_secs: default_traffic_interval_secs(),
            metrics_limit: default_metrics_limit(),
        }
    }
}

fn default_traffic_interval_secs() -> u64 {
    30
}

fn default_metrics_limit() -> u32 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of traffic series kept in the broadcast channel for /ws/traffic (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log app stats (ws clients, polls ok/failed) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let mut config = Self::load_from_path(&path)?;
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            config.api.token = Some(token);
        }
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"),
            "api.base_url must start with http:// or https://, got {:?}",
            self.api.base_url
        );
        anyhow::ensure!(
            self.api.request_timeout_secs > 0,
            "api.request_timeout_secs must be > 0, got {}",
            self.api.request_timeout_secs
        );
        anyhow::ensure!(
            self.api.page_size > 0,
            "api.page_size must be > 0, got {}",
            self.api.page_size
        );
        anyhow::ensure!(
            self.polling.traffic_interval_secs > 0,
            "polling.traffic_interval_secs must be > 0, got {}",
            self.polling.traffic_interval_secs
        );
        anyhow::ensure!(
            self.polling.metrics_limit > 0,
            "polling.metrics_limit must be > 0, got {}",
            self.polling.metrics_limit
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
