use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::OptimizationFlags;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 30 * 60,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_ms: u64,
    pub temperature: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 12_000,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub use_cache: bool,
    pub batch_requests: bool,
    pub smart_token_management: bool,
    pub template_reuse: bool,
    pub response_compression: bool,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            batch_requests: true,
            smart_token_management: true,
            template_reuse: true,
            response_compression: false,
        }
    }
}

impl OptimizationConfig {
    pub fn to_flags(&self) -> OptimizationFlags {
        OptimizationFlags {
            use_cache: self.use_cache,
            batch_requests: self.batch_requests,
            smart_token_management: self.smart_token_management,
            template_reuse: self.template_reuse,
            response_compression: self.response_compression,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cache: CacheConfig,
    pub provider: ProviderConfig,
    pub optimization: OptimizationConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(enabled) = env::var("FORGE_CACHE_ENABLED") {
            if let Ok(value) = enabled.parse::<bool>() {
                self.cache.enabled = value;
            }
        }
        if let Ok(ttl) = env::var("FORGE_CACHE_TTL_SECS") {
            if let Ok(value) = ttl.parse::<u64>() {
                self.cache.ttl_secs = value;
            }
        }
        if let Ok(api_base) = env::var("OPENAI_API_BASE") {
            if !api_base.trim().is_empty() {
                self.provider.api_base = api_base;
            }
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                self.provider.model = model;
            }
        }
        if let Ok(timeout) = env::var("FORGE_PROVIDER_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.provider.timeout_ms = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("FORGE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}
