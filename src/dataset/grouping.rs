use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::core::primitives::{decimal_to_f64, f64_to_decimal};
use crate::dataset::{CategoricalColumn, NumericColumn, TipsDataset};
use crate::error::ReportResult;

/// Observation counts for every `(x, hue)` level pair, zero cells included.
///
/// Without a hue every cell is keyed by `(x_level, None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    x: CategoricalColumn,
    hue: Option<CategoricalColumn>,
    cells: IndexMap<(&'static str, Option<&'static str>), usize>,
}

impl CategoryCounts {
    #[must_use]
    pub fn tabulate(
        dataset: &TipsDataset,
        x: CategoricalColumn,
        hue: Option<CategoricalColumn>,
    ) -> Self {
        let hue_levels: Vec<Option<&'static str>> = match hue {
            Some(column) => column.levels().into_iter().map(Some).collect(),
            None => vec![None],
        };
        let mut cells: IndexMap<(&'static str, Option<&'static str>), usize> = x
            .levels()
            .into_iter()
            .flat_map(|x_level| hue_levels.iter().map(move |hue_level| ((x_level, *hue_level), 0)))
            .collect();
        for record in dataset.records() {
            let key = (x.label_of(record), hue.map(|column| column.label_of(record)));
            if let Some(count) = cells.get_mut(&key) {
                *count += 1;
            }
        }
        Self { x, hue, cells }
    }

    #[must_use]
    pub fn x_column(&self) -> CategoricalColumn {
        self.x
    }

    #[must_use]
    pub fn hue_column(&self) -> Option<CategoricalColumn> {
        self.hue
    }

    #[must_use]
    pub fn get(&self, x: &str, hue: Option<&str>) -> usize {
        self.cells
            .iter()
            .find(|((x_level, hue_level), _)| *x_level == x && *hue_level == hue)
            .map(|(_, count)| *count)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.cells.values().sum()
    }

    #[must_use]
    pub fn max_count(&self) -> usize {
        self.cells.values().copied().max().unwrap_or_default()
    }

    /// Cells in `x`-major, hue-minor level order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&'static str>, usize)> + '_ {
        self.cells
            .iter()
            .map(|((x, hue), count)| (*x, *hue, *count))
    }

    /// Number of cells holding at least one observation.
    #[must_use]
    pub fn non_empty_cells(&self) -> usize {
        self.cells.values().filter(|count| **count > 0).count()
    }
}

/// Exact per-level sums of a monetary column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySums {
    x: CategoricalColumn,
    value: NumericColumn,
    sums: IndexMap<&'static str, Decimal>,
}

impl CategorySums {
    pub fn tabulate(
        dataset: &TipsDataset,
        x: CategoricalColumn,
        value: NumericColumn,
    ) -> ReportResult<Self> {
        let mut sums: IndexMap<&'static str, Decimal> = x
            .levels()
            .into_iter()
            .map(|level| (level, Decimal::ZERO))
            .collect();
        for record in dataset.records() {
            let amount = f64_to_decimal(value.value(record), value.name())?;
            if let Some(sum) = sums.get_mut(x.label_of(record)) {
                *sum += amount;
            }
        }
        Ok(Self { x, value, sums })
    }

    #[must_use]
    pub fn x_column(&self) -> CategoricalColumn {
        self.x
    }

    #[must_use]
    pub fn value_column(&self) -> NumericColumn {
        self.value
    }

    #[must_use]
    pub fn get(&self, x: &str) -> Decimal {
        self.sums.get(x).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Decimal)> + '_ {
        self.sums.iter().map(|(x, sum)| (*x, *sum))
    }

    /// Sums converted for plotting, in level order.
    pub fn as_f64(&self) -> ReportResult<Vec<(&'static str, f64)>> {
        self.sums
            .iter()
            .map(|(x, sum)| Ok((*x, decimal_to_f64(*sum, "category sum")?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{CategoryCounts, CategorySums};
    use crate::dataset::{CategoricalColumn, NumericColumn, TipsDataset};

    fn dataset() -> TipsDataset {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n\
            10.10,1.00,Male,No,Thur,Lunch,2\n\
            20.20,2.00,Male,No,Thur,Dinner,2\n\
            0.10,0.50,Male,No,Thur,Lunch,2\n\
            5.00,1.00,Female,Yes,Sun,Dinner,3\n";
        TipsDataset::from_csv_reader(csv.as_bytes()).expect("dataset")
    }

    #[test]
    fn counts_include_every_level_pair() {
        let counts = CategoryCounts::tabulate(
            &dataset(),
            CategoricalColumn::Day,
            Some(CategoricalColumn::Time),
        );
        assert_eq!(counts.iter().count(), 8);
        assert_eq!(counts.get("Thur", Some("Lunch")), 2);
        assert_eq!(counts.get("Fri", Some("Lunch")), 0);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.max_count(), 2);
        assert_eq!(counts.non_empty_cells(), 3);
    }

    #[test]
    fn counts_without_hue_have_one_cell_per_level() {
        let counts = CategoryCounts::tabulate(&dataset(), CategoricalColumn::Sex, None);
        let cells: Vec<_> = counts.iter().collect();
        assert_eq!(cells, vec![("Male", None, 3), ("Female", None, 1)]);
    }

    #[test]
    fn sums_are_exact_in_cents() {
        let sums = CategorySums::tabulate(&dataset(), CategoricalColumn::Day, NumericColumn::TotalBill)
            .expect("sums");
        assert_eq!(sums.get("Thur"), Decimal::new(3040, 2));
        assert_eq!(sums.get("Sat"), Decimal::ZERO);
        let plotted = sums.as_f64().expect("f64");
        assert_eq!(plotted.len(), 4);
        assert_eq!(plotted[3].0, "Sun");
        assert!((plotted[3].1 - 5.0).abs() <= 1e-12);
    }
}
