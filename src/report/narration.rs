//! Console text of the report, one block per step.

use std::io::Write;

use crate::dataset::{DatasetPreview, TipsDataset};
use crate::error::ReportResult;

pub const DISTRIBUTIONS: &str = "\n--- 2. Univariate Distributions Explained ---\n\
`histplot` shows the frequency of values in bins, `kde=True` overlays a smooth density curve.\n\
`kdeplot` directly estimates the probability density function (PDF).\n\
These help us see the shape, central tendency, and spread of a single variable.\n\
Notice how the darkgrid theme already makes these plots look clean without extra styling.\n\
\n\n";

pub const RELATIONSHIPS: &str = "\n--- 3. Bivariate Relationships Explained ---\n\
`scatterplot` is fundamental for two continuous variables. Here, `hue` maps 'sex' to color,\n\
and `size` maps 'size' (party size) to the marker size, adding more dimensions to the plot easily.\n\
This allows us to see if different sexes tip differently or if larger parties tip more.\n\
\n\n\
`relplot` (Relational Plot) is a 'figure-level' function that creates a `FacetGrid` internally.\n\
`col='time'` creates separate columns for 'Lunch' and 'Dinner'.\n\
`hue='smoker'` colors points based on smoker status.\n\
`style='sex'` changes marker style based on sex. This showcases multi-variate analysis in one figure.\n\
\n\n";

pub const CATEGORICAL: &str = "\n--- 4. Categorical Data Plots Explained ---\n\
`boxplot` shows central tendency (median), spread (IQR), and outliers for numerical data across categories.\n\
`violinplot` combines box plot with KDE, showing the full distribution shape.\n\
`countplot` shows the number of observations in each category.\n\
The `hue` parameter is used consistently across these plots to add another categorical dimension for comparison.\n\
`palette` allows easy selection of color schemes.\n\
\n\n";

pub const CORRELATION: &str = "\n--- 5. Matrix Plots (Correlation Heatmap) Explained ---\n\
`heatmap` is excellent for visualizing matrices, such as correlation matrices.\n\
`annot=True` displays the correlation values on the map.\n\
`cmap` sets the color map, and `fmt` formats the annotation numbers.\n\
This quickly reveals strong positive (red) or negative (blue) correlations between variables.\n\
\n\n";

pub const REGRESSION: &str = "\n--- 6. Regression Plots Explained ---\n\
`lmplot` (Linear Model Plot) draws a scatter plot with a regression line and a confidence interval.\n\
Here, we use `col` and `row` to create a 2x2 grid, showing the regression for each combination of sex and smoker status.\n\
This helps identify if the linear relationship between bill and tip varies by these categories.\n\
\n\n";

pub const ANNOTATED_BAR: &str = "\n--- 7. Combining Charts with Manual Customization Explained ---\n\
This demonstrates how axes adjustments (title, axis labels, y limits, grid, bar labels)\n\
can be applied directly after a chart call to add further customization.\n\
\n\n";

const PREVIEW_HEADING: &str = "--- 1. Data Preview (from the tips table) ---";

/// Writes the `head` and `info` preview of `dataset`.
pub fn write_preview<W: Write + ?Sized>(
    console: &mut W,
    dataset: &TipsDataset,
    rows: usize,
) -> ReportResult<()> {
    let preview = DatasetPreview::new(dataset);
    writeln!(console, "{PREVIEW_HEADING}")?;
    writeln!(console, "{}", preview.head(rows))?;
    writeln!(console, "\n")?;
    writeln!(console, "{}", preview.info())?;
    writeln!(console, "\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CORRELATION, DISTRIBUTIONS, RELATIONSHIPS, write_preview};
    use crate::dataset::TipsDataset;

    #[test]
    fn blocks_open_with_their_section_heading() {
        assert!(DISTRIBUTIONS.starts_with("\n--- 2. Univariate Distributions Explained ---\n"));
        assert!(CORRELATION.contains("`annot=True`"));
        assert!(RELATIONSHIPS.contains("`relplot`"));
    }

    #[test]
    fn preview_lists_head_and_info() {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n\
            16.99,1.01,Female,No,Sun,Dinner,2\n";
        let dataset = TipsDataset::from_csv_reader(csv.as_bytes()).expect("dataset");
        let mut out = Vec::new();
        write_preview(&mut out, &dataset, 5).expect("preview");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("--- 1. Data Preview"));
        assert!(text.contains("16.99"));
        assert!(text.contains("total_bill"));
    }
}
