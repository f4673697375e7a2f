use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::var("CODESCOPE_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("CODESCOPE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        }
    }
}

/// Where the prebuilt form client lives, if it is served at all. Unset in
/// development, where the client runs from its own dev server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticConfig {
    pub dir: Option<PathBuf>,
}

impl StaticConfig {
    fn from_env() -> Self {
        Self {
            dir: env::var("CODESCOPE_STATIC_DIR").ok().map(PathBuf::from),
        }
    }
}

/// Process-wide configuration, read from the environment once at startup and
/// never mutated. Provider credentials are read by the provider configs
/// themselves; their absence does not prevent startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub static_files: StaticConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::default(),
            static_files: StaticConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.server.host.trim().is_empty(),
            "server.host cannot be empty"
        );
        anyhow::ensure!(self.server.port > 0, "server.port must be > 0");
        if let Some(dir) = &self.static_files.dir {
            anyhow::ensure!(
                dir.is_dir(),
                "static_files.dir {:?} is not a directory",
                dir
            );
        }
        Ok(())
    }
}
