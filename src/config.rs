use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::chart::ChartSettings;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "MOVIE_DASH_CONFIG";
/// Environment variable overriding [`DashboardConfig::data_path`].
pub const DATA_ENV: &str = "MOVIE_DASH_DATA";

/// Runtime settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file with the movie metadata.
    pub data_path: PathBuf,
    /// How many genres the box chart keeps.
    pub top_genres: usize,
    /// Bins in the score histogram.
    pub histogram_bins: usize,
    /// File name proposed by the export dialog.
    pub export_file_name: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: PathBuf::from("data/movie_metadata.csv"),
            top_genres: 10,
            histogram_bins: 20,
            export_file_name: "imdb_filtered_data.csv".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then the file named by `MOVIE_DASH_CONFIG`, then `MOVIE_DASH_DATA`.
    ///
    /// A config file that cannot be read is logged and ignored.
    pub fn load() -> Self {
        Self::resolve(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os(DATA_ENV).map(PathBuf::from),
        )
    }

    fn resolve(config_file: Option<PathBuf>, data_override: Option<PathBuf>) -> Self {
        let mut config = match config_file {
            Some(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("{e:#}; using default settings");
                Self::default()
            }),
            None => Self::default(),
        };
        if let Some(data_path) = data_override {
            config.data_path = data_path;
        }
        config
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            top_genres: self.top_genres,
            histogram_bins: self.histogram_bins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/movie_metadata.csv"));
        assert_eq!(config.chart_settings(), ChartSettings::default());
        assert_eq!(config.export_file_name, "imdb_filtered_data.csv");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        fs::write(&path, r#"{ "top_genres": 5 }"#).unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.top_genres, 5);
        assert_eq!(config.histogram_bins, 20);
    }

    #[test]
    fn test_data_override_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        fs::write(&path, r#"{ "data_path": "from/file.csv" }"#).unwrap();

        let config = DashboardConfig::resolve(Some(path.clone()), None);
        assert_eq!(config.data_path, PathBuf::from("from/file.csv"));

        let config = DashboardConfig::resolve(Some(path), Some("from/env.csv".into()));
        assert_eq!(config.data_path, PathBuf::from("from/env.csv"));
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(DashboardConfig::from_file(&path).is_err());
        assert_eq!(DashboardConfig::resolve(Some(path), None), DashboardConfig::default());
    }
}
