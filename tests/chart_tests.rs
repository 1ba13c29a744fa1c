use std::path::Path;

use tips_report::chart::{Axes, Palette, Theme, countplot};
use tips_report::core::PlotRect;
use tips_report::dataset::{CategoricalColumn, NumericColumn, TipsDataset};
use tips_report::render::{NullRenderer, Renderer};
use tips_report::report::{Correlation, PanelStep, Regression, Relationships};

fn fixture() -> TipsDataset {
    TipsDataset::from_csv_path(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/tips_sample.csv"
    )))
    .expect("fixture")
}

#[test]
fn countplot_over_rows_differing_only_in_day() {
    let csv = "total_bill,tip,sex,smoker,day,time,size\n\
        12.50,2.00,Male,No,Thur,Lunch,2\n\
        12.50,2.00,Male,No,Fri,Lunch,2\n";
    let dataset = TipsDataset::from_csv_reader(csv.as_bytes()).expect("dataset");
    let mut ax = Axes::new(PlotRect::new(50.0, 30.0, 400.0, 300.0), &Theme::darkgrid());

    let counts = countplot(&mut ax, &dataset, CategoricalColumn::Day, None, Palette::Deep);

    assert_eq!(counts.non_empty_cells(), 2);
    assert_eq!(counts.get("Thur", None), 1);
    assert_eq!(counts.get("Fri", None), 1);
    assert_eq!(counts.get("Sat", None), 0);
    assert_eq!(counts.total(), 2);
}

#[test]
fn correlation_page_annotates_unit_diagonal() {
    let figures = Correlation
        .render(&fixture(), &Theme::darkgrid())
        .expect("render");
    let diagonal = figures[0]
        .texts()
        .filter(|text| text.text == "1.00")
        .count();
    assert_eq!(diagonal, 3);
    for label in NumericColumn::ALL.map(NumericColumn::name) {
        assert!(figures[0].texts().any(|text| text.text == label));
    }
}

#[test]
fn facet_pages_carry_templated_titles() {
    let theme = Theme::darkgrid();
    let relational = Relationships.render(&fixture(), &theme).expect("render");
    let facet_titles: Vec<&str> = relational[1]
        .texts()
        .map(|text| text.text.as_str())
        .filter(|text| text.starts_with("Time: "))
        .collect();
    assert_eq!(facet_titles, vec!["Time: Lunch", "Time: Dinner"]);

    let regression = Regression.render(&fixture(), &theme).expect("render");
    let titles: Vec<&str> = regression[0]
        .texts()
        .map(|text| text.text.as_str())
        .filter(|text| text.starts_with("Smoker: "))
        .collect();
    assert_eq!(
        titles,
        vec![
            "Smoker: Yes | Sex: Male",
            "Smoker: Yes | Sex: Female",
            "Smoker: No | Sex: Male",
            "Smoker: No | Sex: Female",
        ]
    );
}

#[test]
fn rendered_pages_pass_the_null_renderer() {
    let theme = Theme::darkgrid();
    let mut renderer = NullRenderer::default();
    for frame in Regression.render(&fixture(), &theme).expect("render") {
        renderer.render(&frame).expect("valid frame");
    }
}
