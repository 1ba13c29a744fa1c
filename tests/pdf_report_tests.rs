#![cfg(feature = "cairo-backend")]

use std::path::Path;

use tips_report::dataset::TipsDataset;
use tips_report::error::ReportResult;
use tips_report::render::{PdfDocumentInfo, PdfDocumentTarget};
use tips_report::report::{ReportConfig, ReportPipeline};

fn fixture_source(_name: &str) -> ReportResult<TipsDataset> {
    TipsDataset::from_csv_path(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/tips_sample.csv"
    )))
}

#[test]
fn standard_report_writes_a_seven_page_pdf() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("seaborn_visualization.pdf");
    let config = ReportConfig::default().with_output_path(&path);
    let target = PdfDocumentTarget::new(PdfDocumentInfo::default());
    let mut console = Vec::new();

    let summary = ReportPipeline::standard(config)
        .run(&fixture_source, &target, &mut console)
        .expect("report runs");

    assert_eq!(summary.pages, 7);
    assert_eq!(summary.document.pages, 7);
    let bytes = std::fs::read(&path).expect("pdf written");
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&bytes).trim_end().ends_with("%%EOF"));
}
