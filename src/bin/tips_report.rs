use std::io::{self, Write};
use std::process::ExitCode;

use tips_report::render::PdfDocumentTarget;
use tips_report::telemetry::init_default_tracing;
use tips_report::{CachedDatasetSource, ReportConfig, ReportPipeline, ReportResult};

fn run() -> ReportResult<()> {
    let source = CachedDatasetSource::with_default_cache()?;
    let target = PdfDocumentTarget::default();
    let stdout = io::stdout();
    let mut console = stdout.lock();

    let mut pipeline = ReportPipeline::standard(ReportConfig::default());
    let summary = pipeline.run(&source, &target, &mut console)?;
    writeln!(
        console,
        "All visualizations saved to '{}'",
        summary.path.display()
    )?;
    Ok(())
}

fn main() -> ExitCode {
    let _ = init_default_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tips-report: {err}");
            ExitCode::FAILURE
        }
    }
}
