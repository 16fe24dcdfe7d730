//! Host configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Runtime configuration shared across the service and workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory holding `templates.ron`, `categories.ron` and `config.toml`.
    pub data_dir: PathBuf,
    /// Root of the event log and inventory snapshots.
    pub save_dir: PathBuf,
    /// Buffer size of the notification bus and the persistence queue.
    pub event_capacity: usize,
    pub enable_persistence: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            save_dir: PathBuf::from("save"),
            event_capacity: 1024,
            enable_persistence: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables, loading `.env`
    /// first when present.
    ///
    /// Environment variables:
    /// - `INVENTORY_DATA_DIR` - content directory (default: `data`)
    /// - `INVENTORY_SAVE_DIR` - persistence directory (default: `save`)
    /// - `INVENTORY_EVENT_CAPACITY` - channel buffer size (default: 1024)
    /// - `INVENTORY_ENABLE_PERSISTENCE` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("INVENTORY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("INVENTORY_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Some(capacity) = parse::<usize>(&lookup, "INVENTORY_EVENT_CAPACITY") {
            config.event_capacity = capacity.max(1);
        }
        if let Some(enabled) = parse::<bool>(&lookup, "INVENTORY_ENABLE_PERSISTENCE") {
            config.enable_persistence = enabled;
        }

        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.enable_persistence = enabled;
        self
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, %value, "ignoring unparsable environment variable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("INVENTORY_DATA_DIR", "/srv/content"),
            ("INVENTORY_EVENT_CAPACITY", "0"),
            ("INVENTORY_ENABLE_PERSISTENCE", "false"),
        ]
        .into_iter()
        .collect();

        let config = RuntimeConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/content"));
        assert_eq!(config.save_dir, PathBuf::from("save"));
        assert_eq!(config.event_capacity, 1);
        assert!(!config.enable_persistence);
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let config = RuntimeConfig::from_lookup(|key| match key {
            "INVENTORY_EVENT_CAPACITY" => Some("lots".into()),
            _ => None,
        });
        assert_eq!(config, RuntimeConfig::default());
    }
}
