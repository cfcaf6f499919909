//! Application configuration
//!
//! Compiled-in defaults; the planner reads no config files.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Default storage slot for the week plan
pub const DEFAULT_STORAGE_KEY: &str = "meal-plan";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Storage slot holding the plan envelope
    pub storage_key: String,
    /// Maximum log level
    pub log_level: log::Level,
    /// Override for the native store file
    #[cfg(not(target_arch = "wasm32"))]
    pub data_file: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: log::Level::Info,
            #[cfg(not(target_arch = "wasm32"))]
            data_file: None,
        }
    }
}

impl PlannerConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = level;
        self
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    /// Native store location: the override, else `<data_dir>/meal-planner/storage.json`
    ///
    /// Falls back to the working directory when the platform has no data dir.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn data_file_path(&self) -> PathBuf {
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meal-planner")
            .join("storage.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.storage_key, "meal-plan");
        assert_eq!(config.log_level, log::Level::Info);
    }

    #[test]
    fn test_builders() {
        let config = PlannerConfig::default()
            .with_storage_key("plan-test")
            .with_log_level(log::Level::Debug);
        assert_eq!(config.storage_key, "plan-test");
        assert_eq!(config.log_level, log::Level::Debug);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_data_file_path() {
        let default_path = PlannerConfig::default().data_file_path();
        assert!(default_path.ends_with("meal-planner/storage.json"));

        let custom = PlannerConfig::default().with_data_file("/tmp/plan.json");
        assert_eq!(custom.data_file_path(), PathBuf::from("/tmp/plan.json"));
    }
}
