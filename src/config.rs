use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::tracing::TracingConfig;
use crate::{oracle::WalletApiConfig, primitives::WalletScriptType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_script_type")]
    pub script_type: WalletScriptType,
    #[serde(default)]
    pub wallet_api: WalletApiConfig,
    #[serde(default)]
    pub tracing: TracingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script_type: default_script_type(),
            wallet_api: WalletApiConfig::default(),
            tracing: TracingConfig::default(),
        }
    }
}

pub struct EnvOverride {
    pub wallet_api_url: Option<String>,
}

impl Config {
    /// Loads the YAML config, falling back to defaults when no file exists at
    /// `path`. The backend url can be overridden from the environment.
    pub fn from_path(
        path: impl AsRef<Path>,
        EnvOverride { wallet_api_url }: EnvOverride,
    ) -> anyhow::Result<Self> {
        let mut config = if path.as_ref().exists() {
            let config_file =
                std::fs::read_to_string(path).context("Couldn't read config file")?;
            serde_yaml::from_str(&config_file).context("Couldn't parse config file")?
        } else {
            Config::default()
        };

        if let Some(url) = wallet_api_url {
            config.wallet_api.url = url;
        }

        Ok(config)
    }
}

fn default_script_type() -> WalletScriptType {
    WalletScriptType::P2wpkh
}
