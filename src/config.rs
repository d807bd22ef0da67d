use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "VitalCircle";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the HTTP bind address.
pub const ADDR_ENV: &str = "VITALCIRCLE_ADDR";

/// Bind address used when `VITALCIRCLE_ADDR` is unset or unparsable.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";

/// Daily log entries retained per session (most recent first).
pub const LOG_RETENTION: usize = 5;

/// Nudges shown at once after ranking.
pub const MAX_NUDGES: usize = 6;

/// Live sessions held at once. Creation fails beyond this.
pub const MAX_SESSIONS: usize = 1000;

/// Default inactivity timeout: 15 minutes. Idle sessions are evicted on the next create.
pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 900;

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "vitalcircle_lib=info,vitalcircle=info,tower_http=warn"
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_addr_value(std::env::var(ADDR_ENV).ok().as_deref())
    }

    fn from_addr_value(value: Option<&str>) -> Self {
        let addr = value
            .and_then(|raw| match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(value = raw, "Ignoring invalid {ADDR_ENV}: {e}");
                    None
                }
            })
            .unwrap_or_else(default_addr);
        Self { addr }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8787))
}
