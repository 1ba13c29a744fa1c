use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dataset::{DatasetSource, TipsDataset};
use crate::error::ReportResult;
use crate::render::{DocumentTarget, DocumentWriter};
use crate::report::config::ReportConfig;
use crate::report::narration;
use crate::report::panels::standard_steps;
use crate::report::step::PanelStep;

/// Progress of one [`ReportPipeline::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    NotStarted,
    /// `step` is zero based and counts steps out of `of`.
    InProgress { step: usize, of: usize },
    /// Every step finished; the document is being closed.
    Finalizing { pages: usize },
    Finalized { pages: usize },
    /// `step` is `None` when the run failed outside any step: before the
    /// first one or while finalizing.
    Failed { step: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    pub name: String,
    pub pages: usize,
}

/// Result of a finalized run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary<O> {
    pub path: PathBuf,
    pub pages: usize,
    pub steps: Vec<StepSummary>,
    /// Whatever the document writer returned from `finalize`.
    pub document: O,
}

/// Turns the tips dataset into an ordered, paginated report.
///
/// Steps run strictly in order. Each figure a step returns is appended as one
/// page and dropped before the next figure is appended; the step's narration
/// follows its pages. The first error aborts the run and leaves the document
/// unfinalized.
pub struct ReportPipeline {
    config: ReportConfig,
    steps: Vec<Box<dyn PanelStep>>,
    state: PipelineState,
}

impl ReportPipeline {
    /// Pipeline over the six standard chart steps.
    #[must_use]
    pub fn standard(config: ReportConfig) -> Self {
        Self::with_steps(config, standard_steps())
    }

    #[must_use]
    pub fn with_steps(config: ReportConfig, steps: Vec<Box<dyn PanelStep>>) -> Self {
        Self {
            config,
            steps,
            state: PipelineState::NotStarted,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn run<S, T, W>(
        &mut self,
        source: &S,
        target: &T,
        console: &mut W,
    ) -> ReportResult<ReportSummary<<T::Writer as DocumentWriter>::Output>>
    where
        S: DatasetSource + ?Sized,
        T: DocumentTarget + ?Sized,
        W: Write + ?Sized,
    {
        self.state = PipelineState::NotStarted;
        let result = self.execute(source, target, console);
        if let Err(err) = &result {
            let step = match self.state {
                PipelineState::InProgress { step, .. } => Some(step),
                _ => None,
            };
            warn!(error = %err, step, "report aborted");
            self.state = PipelineState::Failed { step };
        }
        result
    }

    fn execute<S, T, W>(
        &mut self,
        source: &S,
        target: &T,
        console: &mut W,
    ) -> ReportResult<ReportSummary<<T::Writer as DocumentWriter>::Output>>
    where
        S: DatasetSource + ?Sized,
        T: DocumentTarget + ?Sized,
        W: Write + ?Sized,
    {
        self.config.validate()?;
        let dataset: TipsDataset = source.load(&self.config.dataset_name)?;
        info!(
            dataset = %self.config.dataset_name,
            rows = dataset.len(),
            "dataset loaded"
        );
        narration::write_preview(console, &dataset, self.config.preview_rows)?;

        let mut writer = target.start(&self.config.output_path)?;
        debug!(path = %self.config.output_path.display(), "document started");

        let total = self.steps.len();
        let mut steps = Vec::with_capacity(total);
        for (index, step) in self.steps.iter().enumerate() {
            self.state = PipelineState::InProgress {
                step: index,
                of: total,
            };
            info!(step = step.name(), index = index + 1, of = total, "rendering step");

            let figures = step.render(&dataset, &self.config.theme)?;
            let pages = figures.len();
            for figure in figures {
                writer.append_page(&figure)?;
                debug!(
                    step = step.name(),
                    page = writer.page_count(),
                    width = figure.viewport.width,
                    height = figure.viewport.height,
                    "page appended"
                );
            }

            console.write_all(step.narration().as_bytes())?;
            console.flush()?;
            steps.push(StepSummary {
                name: step.name().to_owned(),
                pages,
            });
        }

        let pages = writer.page_count();
        self.state = PipelineState::Finalizing { pages };
        let document = writer.finalize()?;
        self.state = PipelineState::Finalized { pages };
        info!(
            path = %self.config.output_path.display(),
            pages,
            "report finalized"
        );

        Ok(ReportSummary {
            path: self.config.output_path.clone(),
            pages,
            steps,
            document,
        })
    }
}
