use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::chart::Theme;
use crate::dataset::TipsDataset;
use crate::error::ReportResult;
use crate::render::RenderFrame;

/// Figures produced by one step, in construction order.
pub type PanelFigures = SmallVec<[RenderFrame; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Kde,
    Scatter,
    RelationalGrid,
    Box,
    Violin,
    Count,
    Heatmap,
    RegressionGrid,
    Bar,
}

/// One unit of chart construction in the report.
///
/// A step reads the shared dataset, builds one or two figures and hands them
/// back; it never touches the output document.
pub trait PanelStep {
    /// Stable identifier used in logs and summaries.
    fn name(&self) -> &'static str;

    fn chart_kinds(&self) -> &'static [ChartKind];

    /// Human-readable column-to-channel assignments.
    fn mapping(&self) -> &'static str;

    /// Console text written after the step's pages are appended.
    fn narration(&self) -> &'static str;

    fn render(&self, dataset: &TipsDataset, theme: &Theme) -> ReportResult<PanelFigures>;
}
