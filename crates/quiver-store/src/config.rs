use serde::{Deserialize, Serialize};

/// Configuration for the on-disk object store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory under the storage root holding one subdirectory per object.
    pub objects_dir: String,
    /// Permission bits for newly created object directories (unix only).
    pub dir_mode: u32,
    /// Whether record files are fsynced after each write.
    pub sync_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            objects_dir: "o".to_string(),
            dir_mode: 0o700,
            sync_writes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.objects_dir, "o");
        assert_eq!(c.dir_mode, 0o700);
        assert!(!c.sync_writes);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: StoreConfig = toml::from_str("sync_writes = true").unwrap();
        assert!(c.sync_writes);
        assert_eq!(c.objects_dir, "o");
        assert_eq!(c.dir_mode, 0o700);
    }

    #[test]
    fn empty_toml_is_default() {
        let c: StoreConfig = toml::from_str("").unwrap();
        assert_eq!(c, StoreConfig::default());
    }
}
