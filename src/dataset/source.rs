use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dataset::TipsDataset;
use crate::error::{ReportError, ReportResult};

pub const TIPS_DATASET: &str = "tips";

const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/mwaskom/seaborn-data/master";

/// Provides a complete, immutable dataset by name, or fails.
pub trait DatasetSource {
    fn load(&self, name: &str) -> ReportResult<TipsDataset>;
}

impl<F> DatasetSource for F
where
    F: Fn(&str) -> ReportResult<TipsDataset>,
{
    fn load(&self, name: &str) -> ReportResult<TipsDataset> {
        self(name)
    }
}

/// `~/seaborn-data`, the cache directory shared with seaborn.
pub fn default_cache_dir() -> ReportResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("seaborn-data"))
        .ok_or_else(|| ReportError::DatasetUnavailable {
            name: TIPS_DATASET.to_owned(),
            reason: "home directory could not be resolved".to_owned(),
        })
}

/// Loads `<cache_dir>/<name>.csv`, downloading it first when allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDatasetSource {
    cache_dir: PathBuf,
    base_url: String,
    allow_download: bool,
}

impl CachedDatasetSource {
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            allow_download: cfg!(feature = "dataset-fetch"),
        }
    }

    /// Source rooted at [`default_cache_dir`].
    pub fn with_default_cache() -> ReportResult<Self> {
        Ok(Self::new(default_cache_dir()?))
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Disables network access even when the `dataset-fetch` feature is on.
    #[must_use]
    pub fn offline(mut self) -> Self {
        self.allow_download = false;
        self
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    #[must_use]
    pub fn cached_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{name}.csv"))
    }

    #[must_use]
    pub fn download_url(&self, name: &str) -> String {
        format!("{}/{name}.csv", self.base_url.trim_end_matches('/'))
    }

    fn unavailable(name: &str, reason: impl Into<String>) -> ReportError {
        ReportError::DatasetUnavailable {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    #[cfg(feature = "dataset-fetch")]
    fn download(&self, name: &str, path: &Path) -> ReportResult<()> {
        let url = self.download_url(name);
        tracing::info!(%url, "downloading dataset");
        let body = reqwest::blocking::get(&url)
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(|err| Self::unavailable(name, format!("download from {url} failed: {err}")))?;
        // Only a payload that parses is cached.
        TipsDataset::from_csv_reader(body.as_bytes())?;
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::write(path, body)?;
        Ok(())
    }

    #[cfg(not(feature = "dataset-fetch"))]
    fn download(&self, name: &str, path: &Path) -> ReportResult<()> {
        Err(Self::unavailable(
            name,
            format!(
                "not cached at {} and downloads are not compiled in",
                path.display()
            ),
        ))
    }
}

impl DatasetSource for CachedDatasetSource {
    fn load(&self, name: &str) -> ReportResult<TipsDataset> {
        if name != TIPS_DATASET {
            return Err(Self::unavailable(name, "only the `tips` dataset is supported"));
        }

        let path = self.cached_path(name);
        if !path.is_file() {
            if !self.allow_download {
                return Err(Self::unavailable(
                    name,
                    format!("not cached at {}", path.display()),
                ));
            }
            self.download(name, &path)?;
        }

        let dataset = TipsDataset::from_csv_path(&path)?;
        debug!(path = %path.display(), rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }
}
