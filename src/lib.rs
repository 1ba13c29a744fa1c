//! tips-report: a deterministic multi-page chart report over the restaurant
//! tips dataset.
//!
//! The crate is split into layers that only talk through narrow contracts:
//! `dataset` loads the table, `core` holds scales and estimators, `chart`
//! builds figures out of data-space artists, `render` turns them into pages,
//! and `report` sequences the panel steps into one output document.

pub mod chart;
pub mod core;
pub mod dataset;
pub mod error;
pub mod render;
pub mod report;
pub mod telemetry;

pub use dataset::{CachedDatasetSource, DatasetSource, TipsDataset};
pub use error::{ReportError, ReportResult};
pub use report::{ReportConfig, ReportPipeline, ReportSummary};
