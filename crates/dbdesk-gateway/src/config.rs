use std::time::Duration;

pub const HOST_ENV: &str = "DBDESK_GATEWAY_HOST";
pub const PORT_ENV: &str = "DBDESK_GATEWAY_PORT";
pub const TIMEOUT_MS_ENV: &str = "DBDESK_GATEWAY_TIMEOUT_MS";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 19666;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Process-wide gateway settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Wall-clock budget for one query call. `None` disables the limit.
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(host) = lookup(HOST_ENV).filter(|host| !host.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| format!("invalid {PORT_ENV} '{port}': {e}"))?;
        }
        if let Some(timeout_ms) = lookup(TIMEOUT_MS_ENV) {
            let timeout_ms: u64 = timeout_ms
                .trim()
                .parse()
                .map_err(|e| format!("invalid {TIMEOUT_MS_ENV} '{timeout_ms}': {e}"))?;
            config.timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        }
        Ok(config)
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
