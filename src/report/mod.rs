//! The report pipeline: dataset in, one page per figure out, narration
//! after every step.

mod config;
pub mod narration;
mod panels;
mod pipeline;
mod step;

pub use config::{DEFAULT_OUTPUT_PATH, ReportConfig};
pub use panels::{
    AnnotatedBar, Categorical, Correlation, Distributions, Regression, Relationships,
    standard_steps,
};
pub use pipeline::{PipelineState, ReportPipeline, ReportSummary, StepSummary};
pub use step::{ChartKind, PanelFigures, PanelStep};
