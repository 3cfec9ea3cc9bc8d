use std::path::PathBuf;

use thiserror::Error;

/// Non-fatal conditions reported by the data layer.
///
/// None of these stop the process. The loader pairs them with an empty
/// table, the filter engine with the unfiltered view.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("data file not found: {}", path.display())]
    DataSourceMissing { path: PathBuf },

    #[error("failed to load {}: {reason}", path.display())]
    DataLoadFailure { path: PathBuf, reason: String },

    #[error("filter could not be evaluated: {0}")]
    FilterFailure(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl DashboardError {
    pub fn load_failure(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        DashboardError::DataLoadFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
