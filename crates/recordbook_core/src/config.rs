//! Runtime configuration for hosts embedding the core.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use crate::repo::collection::IdPolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "recordbook.json";

/// Host-level settings: logging, persistence location and id policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when `None`.
    pub log_dir: Option<PathBuf>,
    /// JSON document used by save/load.
    pub data_file: PathBuf,
    pub id_policy: IdPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            id_policy: IdPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Checks settings without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::Logging)?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Logging(LoggingError::RelativeLogDir(
                    dir.clone(),
                )));
            }
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataFile);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Logging(LoggingError),
    EmptyDataFile,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::EmptyDataFile => write!(f, "data_file cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::EmptyDataFile => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::path::PathBuf;

    #[test]
    fn default_config_is_valid() {
        CoreConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_level = CoreConfig {
            log_level: "loud".to_string(),
            ..CoreConfig::default()
        };
        assert!(matches!(
            bad_level.validate(),
            Err(ConfigError::Logging(_))
        ));

        let empty_file = CoreConfig {
            data_file: PathBuf::new(),
            ..CoreConfig::default()
        };
        assert_eq!(empty_file.validate(), Err(ConfigError::EmptyDataFile));
    }
}
