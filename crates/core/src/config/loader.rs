//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File names looked up in the working directory, in order
const LOCAL_CANDIDATES: [&str; 2] = [".ridefare.toml", "ridefare.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed configuration
    pub schema: ConfigSchema,
    /// File the configuration came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is found.
    ///
    /// # Errors
    /// Fails when the explicit path is missing or any file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    /// Fails when the text is not valid TOML for [`ConfigSchema`] or holds invalid values.
    pub fn from_toml(text: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(text)?;
        schema.validate()?;
        Ok(Self { schema, path: None })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = LOCAL_CANDIDATES.iter().map(PathBuf::from);
    let user = dirs::config_dir().map(|dir| dir.join("ridefare").join("config.toml"));

    local.chain(user).find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {e}", path.display())).with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            crate::ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {e}", path.display()),
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.search.max_suggestions, 7);
        assert_eq!(config.schema.pricing.min_fare, 50);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[geocoder]\nuser_agent = \"ridefare-test/0.1\"\n\n[search]\ndebounce_ms = 250"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.path.as_deref(), Some(file.path()));
        assert_eq!(config.schema.geocoder.user_agent, "ridefare-test/0.1");
        assert_eq!(config.schema.search.debounce_ms, 250);
        assert_eq!(config.schema.search.retry_pause_ms, 500);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search\nmin_score = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        let err = Config::from_toml("[pricing]\nmin_fare = -5").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }
}
