//! Persisted configuration (`<data_dir>/evm-bridge/config.json`).

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::registry::Registry;
use crate::settings::UserSettings;
use crate::submit::DEFAULT_GAS_LIMIT;

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    #[serde(default)]
    pub settings: UserSettings,
    /// Registry file replacing the built-in networks and tokens.
    #[serde(default)]
    pub registry: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            gas_limit: DEFAULT_GAS_LIMIT,
            settings: UserSettings::default(),
            registry: None,
        }
    }
}

impl BridgeConfig {
    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(crate::data_dir()?.join("config.json"))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| BridgeError::Config(format!("Invalid config {}: {e}", path.display())))?;
        if config.gas_limit == 0 {
            return Err(BridgeError::Config("gas_limit must be greater than 0".into()));
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    /// The configured registry file, or the built-in registry.
    pub fn load_registry(&self) -> Result<Registry> {
        match &self.registry {
            Some(path) => Registry::load(path),
            None => Ok(Registry::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{RecipientPolicy, SlippageTolerance};

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.gas_limit, 5_000_000);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = BridgeConfig {
            rpc_url: Some("https://polygon-rpc.com".into()),
            gas_limit: 3_000_000,
            settings: UserSettings {
                expert_mode: true,
                slippage: SlippageTolerance::from_bips(100).unwrap(),
                recipient_policy: RecipientPolicy::Always,
                exact_approval: true,
            },
            registry: None,
        };
        config.save(&path).unwrap();
        assert_eq!(BridgeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"settings": {"expert_mode": true}}"#).unwrap();
        let config = BridgeConfig::load(&path).unwrap();
        assert!(config.settings.expert_mode);
        assert_eq!(config.settings.slippage.bips(), 50);
        assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"settings": {"slippage": 9999}}"#).unwrap();
        assert!(matches!(BridgeConfig::load(&path), Err(BridgeError::Config(_))));
        std::fs::write(&path, r#"{"gas_limit": 0}"#).unwrap();
        assert!(matches!(BridgeConfig::load(&path), Err(BridgeError::Config(_))));
    }

    #[test]
    fn registry_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(
            &path,
            r#"{"networks": [{"chain_id": 31337, "display_name": "Anvil", "native_symbol": "ETH"}]}"#,
        )
        .unwrap();
        let config = BridgeConfig {
            registry: Some(path),
            ..Default::default()
        };
        let registry = config.load_registry().unwrap();
        assert_eq!(registry.network(31337).unwrap().display_name, "Anvil");
        assert!(BridgeConfig::default().load_registry().unwrap().network(137).is_some());
    }
}
