//! Service configuration.
//!
//! Read from TOML; every key has a default so an empty file (or no file at
//! all) yields a working local setup:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8000"
//!
//! [store]
//! path = "patients.json"
//!
//! [model]
//! path = "model.json"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use carebook_contracts::error::{CarebookError, CarebookResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub server: ServerSection,
    pub store: StoreSection,
    pub model: ModelSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// The JSON file holding every patient record.
    pub path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("patients.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    /// The decision-forest artifact used by `/predict`.
    pub path: PathBuf,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.json"),
        }
    }
}

impl ServiceConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `CarebookError::Config` if the TOML is malformed or names a
    /// key this service does not know.
    pub fn from_toml_str(s: &str) -> CarebookResult<Self> {
        toml::from_str(s).map_err(|e| CarebookError::Config {
            reason: format!("failed to parse service config: {e}"),
        })
    }

    pub fn from_file(path: &Path) -> CarebookResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CarebookError::Config {
            reason: format!("failed to read config file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn bind_addr(&self) -> CarebookResult<SocketAddr> {
        self.server.bind.parse().map_err(|e| CarebookError::Config {
            reason: format!("invalid bind address '{}': {e}", self.server.bind),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use carebook_contracts::error::CarebookError;

    use super::ServiceConfig;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.store.path, PathBuf::from("patients.json"));
        assert_eq!(config.model.path, PathBuf::from("model.json"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [store]
            path = "/var/lib/carebook/patients.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.path, PathBuf::from("/var/lib/carebook/patients.json"));
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let err = ServiceConfig::from_toml_str("[server]\nport = 8000\n").unwrap_err();
        assert!(matches!(err, CarebookError::Config { .. }), "got {err:?}");
    }

    #[test]
    fn bad_bind_address_is_reported() {
        let config = ServiceConfig::from_toml_str("[server]\nbind = \"localhost\"\n").unwrap();
        match config.bind_addr() {
            Err(CarebookError::Config { reason }) => assert!(reason.contains("localhost")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"0.0.0.0:9000\"").unwrap();

        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bind_addr().unwrap().port(), 9000);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ServiceConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CarebookError::Config { .. }));
    }
}
