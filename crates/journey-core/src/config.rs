use crate::error::{JourneyError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Where records are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// One JSON entry per collection under `.journey/data/`.
    #[default]
    Kv,
    /// Relational tables in a redb file, relative to `.journey/`.
    Redb {
        #[serde(default = "default_redb_file")]
        file: String,
    },
    /// Nothing survives the process.
    Memory,
}

fn default_redb_file() -> String {
    paths::DEFAULT_REDB_FILE.to_string()
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Kv => "kv",
            BackendConfig::Redb { .. } => "redb",
            BackendConfig::Memory => "memory",
        }
    }

    /// Parse a backend name as accepted by `journey init --backend`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "kv" => Some(BackendConfig::Kv),
            "redb" => Some(BackendConfig::Redb {
                file: default_redb_file(),
            }),
            "memory" => Some(BackendConfig::Memory),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// GenerateConfig
// ---------------------------------------------------------------------------

/// Upstream for the prompt pass-through endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the bearer key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_endpoint() -> String {
    "https://api.v0.dev/generate".to_string()
}

fn default_api_key_env() -> String {
    "V0_API_KEY".to_string()
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl GenerateConfig {
    /// The API key from the environment, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// SkillsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    /// Level shown as a full progress bar.
    #[serde(default = "default_max_level")]
    pub max_level: u32,
}

fn default_max_level() -> u32 {
    10
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            name: name.into(),
            backend: BackendConfig::default(),
            generate: GenerateConfig::default(),
            skills: SkillsConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(JourneyError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }
        if self.skills.max_level == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "skills.max_level must be at least 1".to_string(),
            });
        }
        if let BackendConfig::Redb { file } = &self.backend {
            if file.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "backend.file must not be empty".to_string(),
                });
            }
        }
        if matches!(self.backend, BackendConfig::Memory) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "memory backend: records are lost when the process exits".to_string(),
            });
        }
        if !self.generate.endpoint.starts_with("http://")
            && !self.generate.endpoint.starts_with("https://")
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "generate.endpoint must be an http(s) URL, got '{}'",
                    self.generate.endpoint
                ),
            });
        }
        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
