//! CLI configuration

use crate::error::{CliError, CliResult};
use bloom_types::CompilerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
///
/// ```toml
/// strata = "strata.txt"
///
/// [compiler]
/// analysis_rounds = 4
/// dump_rewrite = true
/// dump_dir = "target/rewrites"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Compiler settings
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Default strata file, used when `--strata` is not given
    pub strata: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("bloom").join("config.toml"))
    }
}
