use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `chargetrace.toml` - analysis defaults the CLI applies unless overridden
/// by flags.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub trend: TrendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Layout-line capacity of one report column per page.
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,

    /// Rated station power assumed when metadata carries none; drives the
    /// power-quality styling threshold.
    #[serde(default)]
    pub rated_power_fallback_kw: Option<f64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            lines_per_page: default_lines_per_page(),
            rated_power_fallback_kw: None,
        }
    }
}

fn default_lines_per_page() -> usize {
    48
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrendConfig {
    /// Emit one trend point per session row instead of hourly/daily buckets.
    #[serde(default)]
    pub per_row: bool,
}

impl Config {
    /// Load from a path; a missing file is the default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_default_config() {
        let config = Config::load_from(Path::new("/nonexistent/chargetrace.toml")).unwrap();
        assert_eq!(config.report.lines_per_page, 48);
        assert!(!config.trend.per_row);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[trend]\nper_row = true\n").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert!(config.trend.per_row);
        assert_eq!(config.report.lines_per_page, 48);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"report = nonsense").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(Error::Config(_))
        ));
    }
}
