use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crate::layers::activation::Activation;

pub const CONFIG_ENV: &str = "LIFESTYLE_CONFIG";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifacts_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub hidden_activation: Activation,
    /// Targets whose output is minutes since midnight.
    pub clock_targets: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            artifacts_dir: PathBuf::from("."),
            allowed_origins: vec!["https://famcare7.vercel.app".to_string()],
            hidden_activation: Activation::default(),
            clock_targets: vec!["Wake_Up_Time".to_string(), "Sleep_Time".to_string()],
        }
    }
}

impl ServerConfig {
    /// Reads the JSON file named by `LIFESTYLE_CONFIG` (if any), then applies
    /// `HOST`, `PORT` and `ARTIFACTS_DIR` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => serde_json::from_reader::<File, ServerConfig>(
                File::open(&path).with_context(|| format!("opening config {path}"))?,
            )
            .with_context(|| format!("parsing config {path}"))?,
            Err(_) => ServerConfig::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port.parse().with_context(|| format!("invalid PORT {port:?}"))?;
        }
        if let Some(dir) = var("ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
