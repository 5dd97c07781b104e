//! Middleware connection settings
//!
//! The nodes take no command-line options. Which middleware to use and how to
//! reach it comes from an optional TOML file named by `CHATTER_CONFIG`,
//! followed by the usual ROS/Zenoh environment variables.
use crate::error::{ChatterError, ChatterResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an optional TOML config file
pub const CONFIG_ENV: &str = "CHATTER_CONFIG";

/// Transport implementation backing a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Zenoh network middleware
    #[default]
    Zenoh,
    /// In-process bus; only nodes in the same process can talk
    Local,
}

/// Zenoh session role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Peer,
    Client,
    Router,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Peer => "peer",
            SessionMode::Client => "client",
            SessionMode::Router => "router",
        }
    }
}

impl std::str::FromStr for SessionMode {
    type Err = ChatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peer" => Ok(SessionMode::Peer),
            "client" => Ok(SessionMode::Client),
            "router" => Ok(SessionMode::Router),
            other => Err(ChatterError::config(format!(
                "Unknown session mode '{}' (expected peer, client or router)",
                other
            ))),
        }
    }
}

/// Settings for opening a middleware session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MiddlewareConfig {
    pub backend: Backend,

    pub mode: SessionMode,

    /// Endpoints to connect to, e.g. `tcp/192.168.1.5:7447`
    pub connect: Vec<String>,

    /// Endpoints to listen on
    pub listen: Vec<String>,

    /// ROS domain; becomes the first key-expression segment
    pub domain_id: u32,

    /// Namespace that relative topic names resolve against
    pub namespace: String,

    /// Native Zenoh JSON5 config file, applied before the fields above
    pub zenoh_config: Option<PathBuf>,

    pub multicast_scouting: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Zenoh,
            mode: SessionMode::Peer,
            connect: Vec::new(),
            listen: Vec::new(),
            domain_id: 0,
            namespace: "/".to_string(),
            zenoh_config: None,
            multicast_scouting: true,
        }
    }
}

impl MiddlewareConfig {
    /// Config for the in-process bus
    pub fn local() -> Self {
        Self {
            backend: Backend::Local,
            ..Default::default()
        }
    }

    /// Defaults, then `CHATTER_CONFIG`, then environment overrides
    pub fn load() -> ChatterResult<Self> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Load config from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ChatterResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ChatterError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ChatterResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| ChatterError::config(format!("Failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ROS_DOMAIN_ID`, `ROS_NAMESPACE` and `ZENOH_*` overrides
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env<F>(mut self, lookup: F) -> ChatterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(domain) = lookup("ROS_DOMAIN_ID") {
            self.domain_id = domain.trim().parse().map_err(|_| {
                ChatterError::config(format!("ROS_DOMAIN_ID '{}' is not a number", domain))
            })?;
        }
        // Empty means unset
        if let Some(namespace) = lookup("ROS_NAMESPACE").filter(|ns| !ns.is_empty()) {
            self.namespace = namespace;
        }
        if let Some(mode) = lookup("ZENOH_MODE") {
            self.mode = mode.parse()?;
        }
        if let Some(connect) = lookup("ZENOH_CONNECT") {
            self.connect = split_endpoints(&connect);
        }
        if let Some(listen) = lookup("ZENOH_LISTEN") {
            self.listen = split_endpoints(&listen);
        }
        if let Some(path) = lookup("ZENOH_CONFIG") {
            self.zenoh_config = Some(PathBuf::from(path));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ChatterResult<()> {
        if !self.namespace.starts_with('/') {
            return Err(ChatterError::config(format!(
                "Namespace '{}' must be absolute",
                self.namespace
            )));
        }
        crate::communication::names::validate(&self.namespace)
            .map_err(|e| ChatterError::config(format!("Bad namespace: {}", e)))?;

        if self.mode == SessionMode::Client && self.connect.is_empty() && !self.multicast_scouting {
            return Err(ChatterError::config(
                "Client mode needs a connect endpoint when multicast scouting is off",
            ));
        }
        Ok(())
    }
}

fn split_endpoints(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
