//! The six chart steps of the standard report, in execution order.

use smallvec::smallvec;
use tracing::debug;

use crate::chart::{
    Axes, AxisId, Colormap, Estimator, Figure, GridLines, HeatmapOptions, HistOptions,
    KdeOptions, LegendPlacement, Palette, ScatterMapping, SemanticMaps, SubplotLayout, Theme,
    bar_label, barplot, boxplot, countplot, heatmap, histplot, kdeplot, lmplot, named, relplot,
    scatterplot, violinplot,
};
use crate::core::CorrelationMatrix;
use crate::dataset::{CategoricalColumn, NumericColumn, TipsDataset};
use crate::error::{ReportError, ReportResult};
use crate::render::{LineStrokeStyle, RenderFrame};
use crate::report::narration;
use crate::report::step::{ChartKind, PanelFigures, PanelStep};

const BILL_LABEL: &str = "Total Bill ($)";
const TIP_LABEL: &str = "Tip ($)";
const DAY_LABEL: &str = "Day of week";

/// Steps of the standard report.
#[must_use]
pub fn standard_steps() -> Vec<Box<dyn PanelStep>> {
    vec![
        Box::new(Distributions),
        Box::new(Relationships),
        Box::new(Categorical),
        Box::new(Correlation),
        Box::new(Regression),
        Box::new(AnnotatedBar),
    ]
}

/// A `rows x cols` figure and one empty axes per cell.
fn subplot_figure(
    width_in: f64,
    height_in: f64,
    rows: usize,
    cols: usize,
    layout: &SubplotLayout,
    theme: &Theme,
) -> ReportResult<(Figure, Vec<Axes>)> {
    let figure = Figure::new(width_in, height_in, theme)?;
    let axes = figure
        .subplots(rows, cols, layout)?
        .into_iter()
        .map(|rect| Axes::new(rect, theme))
        .collect();
    Ok((figure, axes))
}

fn finish(mut figure: Figure, axes: &[Axes]) -> ReportResult<RenderFrame> {
    for ax in axes {
        figure.add_axes(ax)?;
    }
    Ok(figure.into_frame())
}

fn exactly<const N: usize>(axes: &mut [Axes]) -> ReportResult<&mut [Axes; N]> {
    let len = axes.len();
    axes.try_into().map_err(|_| {
        ReportError::InvalidData(format!("expected {N} subplots, figure has {len}"))
    })
}

/// Histogram with density overlay of the bill, filled density of the tip.
#[derive(Debug, Clone, Copy, Default)]
pub struct Distributions;

impl PanelStep for Distributions {
    fn name(&self) -> &'static str {
        "distributions"
    }

    fn chart_kinds(&self) -> &'static [ChartKind] {
        &[ChartKind::Histogram, ChartKind::Kde]
    }

    fn mapping(&self) -> &'static str {
        "x=total_bill (20 bins, kde); x=tip (filled kde)"
    }

    fn narration(&self) -> &'static str {
        narration::DISTRIBUTIONS
    }

    fn render(&self, dataset: &TipsDataset, theme: &Theme) -> ReportResult<PanelFigures> {
        let (figure, mut axes) = subplot_figure(12.0, 5.0, 1, 2, &SubplotLayout::tight(), theme)?;
        let [bill, tip] = exactly::<2>(&mut axes)?;

        let bins = histplot(
            bill,
            &dataset.column(NumericColumn::TotalBill),
            &HistOptions::new(20, named::SKYBLUE).with_kde(true),
        )?;
        debug!(bins = bins.len(), "bill histogram");
        bill.set_title("Distribution of Total Bill (Histogram + KDE)");
        bill.set_xlabel("Total_bill($)");
        bill.set_ylabel("Frequency");

        kdeplot(
            tip,
            &dataset.column(NumericColumn::Tip),
            &KdeOptions::new(named::LIGHTCORAL).filled(),
        )?;
        tip.set_title("Distribution of Tip Amount (KDE)");
        tip.set_xlabel("Tip Amount ($)");
        tip.set_ylabel("Density");

        Ok(smallvec![finish(figure, &axes)?])
    }
}

/// Scatter of bill against tip, then the same relation faceted by time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relationships;

impl Relationships {
    fn scatter(dataset: &TipsDataset, theme: &Theme) -> ReportResult<RenderFrame> {
        let (figure, mut axes) = subplot_figure(8.0, 6.0, 1, 1, &SubplotLayout::tight(), theme)?;
        let [ax] = exactly::<1>(&mut axes)?;
        let mapping = ScatterMapping::new(NumericColumn::TotalBill, NumericColumn::Tip)
            .with_hue(CategoricalColumn::Sex)
            .with_size(NumericColumn::Size, (20.0, 200.0))
            .with_alpha(0.7);
        let maps = SemanticMaps::build(dataset, &mapping, theme)?;
        scatterplot(ax, dataset, &mapping, &maps);
        ax.set_legend(maps.legend(LegendPlacement::UpperLeft));
        ax.set_title("Total Bill vs Tip (Colored by Sex, Sized by Party Size)");
        ax.set_xlabel(BILL_LABEL);
        ax.set_ylabel(TIP_LABEL);
        finish(figure, &axes)
    }

    fn faceted(dataset: &TipsDataset, theme: &Theme) -> ReportResult<RenderFrame> {
        let mapping = ScatterMapping::new(NumericColumn::TotalBill, NumericColumn::Tip)
            .with_hue(CategoricalColumn::Smoker)
            .with_size(NumericColumn::Size, (18.0, 72.0))
            .with_style(CategoricalColumn::Sex);
        let mut grid = relplot(dataset, &mapping, CategoricalColumn::Time, 4.0, 1.2, theme)?;
        grid.set_axis_labels(BILL_LABEL, TIP_LABEL);
        grid.set_titles("Time: {col_name}", theme.title_style());
        grid.suptitle(
            "Total Bill vs Tip by Time of Day and Smoker Status",
            theme.title_style().with_size(14.0).bold(),
        );
        grid.subplots_adjust_top(0.85)?;
        grid.into_frame()
    }
}

impl PanelStep for Relationships {
    fn name(&self) -> &'static str {
        "relationships"
    }

    fn chart_kinds(&self) -> &'static [ChartKind] {
        &[ChartKind::Scatter, ChartKind::RelationalGrid]
    }

    fn mapping(&self) -> &'static str {
        "x=total_bill y=tip hue=sex size=size; col=time hue=smoker size=size style=sex"
    }

    fn narration(&self) -> &'static str {
        narration::RELATIONSHIPS
    }

    fn render(&self, dataset: &TipsDataset, theme: &Theme) -> ReportResult<PanelFigures> {
        Ok(smallvec![
            Self::scatter(dataset, theme)?,
            Self::faceted(dataset, theme)?
        ])
    }
}

/// Box, split violin and count plots across the days of the week.
#[derive(Debug, Clone, Copy, Default)]
pub struct Categorical;

impl PanelStep for Categorical {
    fn name(&self) -> &'static str {
        "categorical"
    }

    fn chart_kinds(&self) -> &'static [ChartKind] {
        &[ChartKind::Box, ChartKind::Violin, ChartKind::Count]
    }

    fn mapping(&self) -> &'static str {
        "x=day y=total_bill hue=sex; x=day y=tip hue=smoker split; x=day hue=time"
    }

    fn narration(&self) -> &'static str {
        narration::CATEGORICAL
    }

    fn render(&self, dataset: &TipsDataset, theme: &Theme) -> ReportResult<PanelFigures> {
        let (figure, mut axes) = subplot_figure(15.0, 6.0, 1, 3, &SubplotLayout::tight(), theme)?;
        let [bills, tips, counts] = exactly::<3>(&mut axes)?;

        boxplot(
            bills,
            dataset,
            CategoricalColumn::Day,
            NumericColumn::TotalBill,
            Some(CategoricalColumn::Sex),
            Palette::Viridis,
        );
        bills.set_title("Total Bill by Day and Sex (Box Plot)");
        bills.set_xlabel(DAY_LABEL);
        bills.set_ylabel(BILL_LABEL);

        violinplot(
            tips,
            dataset,
            CategoricalColumn::Day,
            NumericColumn::Tip,
            CategoricalColumn::Smoker,
            true,
            Palette::Rocket,
        );
        tips.set_title("Tip amount by day and smoker (Violin Plot)");
        tips.set_xlabel(DAY_LABEL);
        tips.set_ylabel(TIP_LABEL);

        let tally = countplot(
            counts,
            dataset,
            CategoricalColumn::Day,
            Some(CategoricalColumn::Time),
            Palette::Pastel,
        );
        debug!(
            groups = tally.non_empty_cells(),
            total = tally.total(),
            "observations per day"
        );
        counts.set_title("Number of Observations per Day by Time");
        counts.set_xlabel(DAY_LABEL);
        counts.set_ylabel("Count");

        Ok(smallvec![finish(figure, &axes)?])
    }
}

/// Annotated heatmap of the pairwise correlation of the numeric columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct Correlation;

impl PanelStep for Correlation {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn chart_kinds(&self) -> &'static [ChartKind] {
        &[ChartKind::Heatmap]
    }

    fn mapping(&self) -> &'static str {
        "pearson(total_bill, tip, size) -> cell color and annotation"
    }

    fn narration(&self) -> &'static str {
        narration::CORRELATION
    }

    fn render(&self, dataset: &TipsDataset, theme: &Theme) -> ReportResult<PanelFigures> {
        let columns: Vec<(&str, Vec<f64>)> = NumericColumn::ALL
            .iter()
            .map(|column| (column.name(), dataset.column(*column)))
            .collect();
        let matrix = CorrelationMatrix::from_columns(&columns)?;

        let layout = SubplotLayout {
            left: 96.0,
            ..SubplotLayout::tight()
        };
        let (figure, mut axes) = subplot_figure(8.0, 7.0, 1, 1, &layout, theme)?;
        let [ax] = exactly::<1>(&mut axes)?;
        let colorbar = heatmap(
            ax,
            &matrix,
            &HeatmapOptions::new(Colormap::Coolwarm)
                .annotated(2)
                .with_linewidth(0.5),
        )?;
        ax.set_title("Correlation Matrix of Numerical Features in Tips Dataset");
        axes.push(colorbar);
        Ok(smallvec![finish(figure, &axes)?])
    }
}

/// Linear fits of tip on bill, one facet per smoker and sex combination.
#[derive(Debug, Clone, Copy, Default)]
pub struct Regression;

impl PanelStep for Regression {
    fn name(&self) -> &'static str {
        "regression"
    }

    fn chart_kinds(&self) -> &'static [ChartKind] {
        &[ChartKind::RegressionGrid]
    }

    fn mapping(&self) -> &'static str {
        "x=total_bill y=tip row=smoker col=sex"
    }

    fn narration(&self) -> &'static str {
        narration::REGRESSION
    }

    fn render(&self, dataset: &TipsDataset, theme: &Theme) -> ReportResult<PanelFigures> {
        let mut grid = lmplot(
            dataset,
            NumericColumn::TotalBill,
            NumericColumn::Tip,
            CategoricalColumn::Smoker,
            CategoricalColumn::Sex,
            4.0,
            1.2,
            0.6,
            theme,
        )?;
        grid.set_axis_labels(BILL_LABEL, TIP_LABEL);
        grid.set_titles("Smoker: {row_name} | Sex: {col_name}", theme.title_style());
        grid.subplots_adjust_top(0.85)?;
        grid.suptitle(
            "Regression of Tip vs Total Bill by Sex and Smoker Status",
            theme.title_style(),
        );
        Ok(smallvec![grid.into_frame()?])
    }
}

/// Summed bills per day with value labels and hand-set axes styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotatedBar;

impl PanelStep for AnnotatedBar {
    fn name(&self) -> &'static str {
        "annotated_bar"
    }

    fn chart_kinds(&self) -> &'static [ChartKind] {
        &[ChartKind::Bar]
    }

    fn mapping(&self) -> &'static str {
        "x=day y=sum(total_bill) hue=day"
    }

    fn narration(&self) -> &'static str {
        narration::ANNOTATED_BAR
    }

    fn render(&self, dataset: &TipsDataset, theme: &Theme) -> ReportResult<PanelFigures> {
        let (figure, mut axes) = subplot_figure(10.0, 6.0, 1, 1, &SubplotLayout::tight(), theme)?;
        let [ax] = exactly::<1>(&mut axes)?;
        let bars = barplot(
            ax,
            dataset,
            CategoricalColumn::Day,
            NumericColumn::TotalBill,
            Estimator::Sum,
            Palette::Crest,
        )?;
        ax.set_title_styled(
            "Total Bill Sum by Day (Customized with Matplotlib)",
            theme.title_style().with_size(16.0).with_color(named::DARKBLUE),
        );
        let label_style = theme.label_style().with_size(12.0);
        ax.set_label_styled(AxisId::X, "Day of the Week", label_style);
        ax.set_label_styled(AxisId::Y, "Total Bill Sum ($)", label_style);
        ax.set_ylim(0.0, 1500.0);
        ax.grid.y = Some(GridLines {
            color: theme.grid_color.with_alpha(0.7),
            width: theme.grid_width,
            style: LineStrokeStyle::Dashed,
        });
        bar_label(ax, &bars, 2, theme.text_style(theme.tick_font_size))?;
        Ok(smallvec![finish(figure, &axes)?])
    }
}
