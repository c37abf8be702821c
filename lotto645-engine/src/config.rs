use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nombre de tirages récents examinés pour les numéros « non sortis ».
    pub recent_window: usize,
    /// Paires les plus fréquentes parmi lesquelles on tire une graine.
    pub top_pairs: usize,
    /// Une paire vue au plus ce nombre de fois est jugée incompatible.
    pub incompatible_max_count: u32,
    pub filter_trials: usize,
    pub strict_filter_trials: usize,
    pub weighted_attempts: usize,
    pub default_sum_min: u32,
    pub default_sum_max: u32,
    pub carryover_min_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_window: 15,
            top_pairs: 10,
            incompatible_max_count: 1,
            filter_trials: 100,
            strict_filter_trials: 200,
            weighted_attempts: 100,
            default_sum_min: 111,
            default_sum_max: 170,
            carryover_min_history: 15,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("lecture de la configuration : {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration JSON invalide : {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.recent_window, 15);
        assert_eq!(config.filter_trials, 100);
        assert_eq!(config.strict_filter_trials, 200);
        assert_eq!((config.default_sum_min, config.default_sum_max), (111, 170));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "recent_window": 10 }"#).unwrap();
        assert_eq!(config.recent_window, 10);
        assert_eq!(config.top_pairs, 10);
        assert_eq!(config.carryover_min_history, 15);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("lotto645-config-{}.json", std::process::id()));
        let config = EngineConfig { strict_filter_trials: 500, ..EngineConfig::default() };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
