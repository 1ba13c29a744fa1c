use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chart::Theme;
use crate::dataset::TIPS_DATASET;
use crate::error::{ReportError, ReportResult};

pub const DEFAULT_OUTPUT_PATH: &str = "seaborn_visualization.pdf";

/// Fixed parameters of one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: PathBuf,
    pub dataset_name: String,
    /// Rows shown by the dataset preview.
    pub preview_rows: usize,
    pub theme: Theme,
}

impl ReportConfig {
    #[must_use]
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(ReportError::InvalidData(
                "output path must not be empty".to_owned(),
            ));
        }
        if self.dataset_name.trim().is_empty() {
            return Err(ReportError::InvalidData(
                "dataset name must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            dataset_name: TIPS_DATASET.to_owned(),
            preview_rows: 5,
            theme: Theme::darkgrid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ReportConfig;

    #[test]
    fn defaults_target_the_tips_report() {
        let config = ReportConfig::default();
        assert_eq!(config.output_path, Path::new("seaborn_visualization.pdf"));
        assert_eq!(config.dataset_name, "tips");
        assert_eq!(config.preview_rows, 5);
        config.validate().expect("valid defaults");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ReportConfig =
            serde_json::from_str(r#"{"output_path":"out/report.pdf"}"#).expect("deserialize");
        assert_eq!(config.output_path, Path::new("out/report.pdf"));
        assert_eq!(config.dataset_name, "tips");
    }

    #[test]
    fn empty_output_path_is_rejected() {
        let config = ReportConfig::default().with_output_path("");
        assert!(config.validate().is_err());
    }
}
