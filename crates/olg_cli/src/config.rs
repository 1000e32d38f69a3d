//! TOML configuration for the `olg` command-line front end.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults of the corresponding model.

use olg_core::newton::NewtonSettings;
use olg_core::short_run::ScanSettings;
use olg_core::steady_state::SteadyStateModel;
use olg_core::{ModelParameters, OlgError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OlgConfig {
    pub short_run: ShortRunConfig,
    pub steady_state: SteadyStateConfig,
    pub newton: NewtonSettings,
    pub scan: ScanSettings,
}

/// Parameters and wage for the short-run market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortRunConfig {
    pub alpha: f64,
    pub beta: f64,
    pub theta: f64,
    /// Wage used when the command line does not give one.
    pub wage: f64,
}

impl Default for ShortRunConfig {
    fn default() -> Self {
        let params = ModelParameters::short_run_default();
        Self {
            alpha: params.alpha(),
            beta: params.beta(),
            theta: params.theta(),
            wage: 1.0,
        }
    }
}

impl ShortRunConfig {
    pub fn parameters(&self) -> olg_core::Result<ModelParameters> {
        ModelParameters::new(self.alpha, self.beta, self.theta)
    }
}

/// Parameters and Newton starting point for the long-run model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteadyStateConfig {
    pub alpha: f64,
    pub beta: f64,
    pub theta: f64,
    pub initial_guess: f64,
}

impl Default for SteadyStateConfig {
    fn default() -> Self {
        let params = ModelParameters::steady_state_default();
        Self {
            alpha: params.alpha(),
            beta: params.beta(),
            theta: params.theta(),
            initial_guess: SteadyStateModel::DEFAULT_INITIAL_GUESS,
        }
    }
}

impl SteadyStateConfig {
    pub fn parameters(&self) -> olg_core::Result<ModelParameters> {
        ModelParameters::new(self.alpha, self.beta, self.theta)
    }
}

impl OlgConfig {
    /// Loads a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Checks every section without running a model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |section: &'static str| move |source| ConfigError::Invalid { section, source };

        self.short_run.parameters().map_err(invalid("short_run"))?;
        if !(self.short_run.wage.is_finite() && self.short_run.wage >= 0.0) {
            return Err(ConfigError::Invalid {
                section: "short_run",
                source: OlgError::Domain {
                    name: "wage",
                    value: self.short_run.wage,
                    reason: "must be non-negative and finite",
                },
            });
        }
        self.steady_state
            .parameters()
            .map_err(invalid("steady_state"))?;
        self.newton.validate().map_err(invalid("newton"))?;
        self.scan.validate().map_err(invalid("scan"))?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid [{section}] section: {source}")]
    Invalid {
        section: &'static str,
        source: OlgError,
    },
}

pub const EXAMPLE_CONFIG: &str = r#"# olg configuration file

[short_run]
alpha = 0.4
beta = 0.9
theta = 0.5
wage = 1.0

[steady_state]
alpha = 0.4
beta = 0.9
theta = 1.0
initial_guess = 0.2

[newton]
max_steps = 50
damping = 1.0
tolerance = 1e-10       # on |f(x)|
step_tolerance = 1.48e-8  # on the Newton step

[scan]
tolerance = 1e-4  # largest accepted |demand - supply|

[scan.grid]
lower = 0.0  # excluded
upper = 1.0  # excluded
step = 1e-4
"#;

#[cfg(test)]
mod tests {
    use super::{ConfigError, OlgConfig, EXAMPLE_CONFIG};
    use std::io::Write;

    #[test]
    fn example_config_matches_defaults() {
        let parsed: OlgConfig = toml::from_str(EXAMPLE_CONFIG).expect("example parses");
        assert_eq!(parsed, OlgConfig::default());
        parsed.validate().expect("defaults are valid");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: OlgConfig = toml::from_str("[steady_state]\ntheta = 2.0\n").expect("parses");
        assert_eq!(parsed.steady_state.theta, 2.0);
        assert_eq!(parsed.steady_state.alpha, 0.4);
        assert_eq!(parsed.short_run, OlgConfig::default().short_run);
        assert_eq!(parsed.newton.max_steps, 50);
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[short_run]\nwage = 0.5\n\n[newton]\nmax_steps = 10").expect("write");

        let config = OlgConfig::from_file(file.path()).expect("load");
        assert_eq!(config.short_run.wage, 0.5);
        assert_eq!(config.newton.max_steps, 10);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = OlgConfig::from_file(&dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(err, ConfigError::FileRead { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[newton]\nmax_steps = \"many\"").expect("write");
        let err = OlgConfig::from_file(file.path()).expect_err("bad type");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn validate_names_the_offending_section() {
        let mut config = OlgConfig::default();
        config.newton.damping = 0.0;
        let err = config.validate().expect_err("zero damping");
        assert!(err.to_string().contains("[newton]"));

        let mut config = OlgConfig::default();
        config.short_run.beta = 1.0;
        let err = config.validate().expect_err("beta on the boundary");
        assert!(err.to_string().contains("[short_run]"));

        let mut config = OlgConfig::default();
        config.short_run.wage = -1.0;
        assert!(config.validate().is_err());

        let mut config = OlgConfig::default();
        config.scan.tolerance = -1.0;
        let err = config.validate().expect_err("negative scan tolerance");
        assert!(err.to_string().contains("[scan]"));
        assert!(err.to_string().contains("tolerance"));

        let mut config = OlgConfig::default();
        config.scan.tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_without_path_uses_defaults() {
        assert_eq!(OlgConfig::load(None).expect("defaults"), OlgConfig::default());
    }
}
