//! The restaurant tips table and the sources that provide it.
//!
//! Categorical columns are closed enums; their declared order is the order
//! used on axes, in legends and in facet grids.

mod grouping;
mod preview;
mod source;

pub use grouping::{CategoryCounts, CategorySums};
pub use preview::DatasetPreview;
pub use source::{CachedDatasetSource, DatasetSource, TIPS_DATASET, default_cache_dir};

use std::fmt;
use std::fs::File;
use std::hash::Hash;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// A categorical column whose levels have a fixed display order.
pub trait Category: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Column name in the source table.
    const COLUMN: &'static str;
    /// Every level, in display order.
    const LEVELS: &'static [Self];

    fn label(self) -> &'static str;

    fn position(self) -> usize {
        Self::LEVELS
            .iter()
            .position(|level| *level == self)
            .unwrap_or_default()
    }
}

macro_rules! category_enum {
    ($name:ident, $column:literal, [$($variant:ident => $label:literal),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Category for $name {
            const COLUMN: &'static str = $column;
            const LEVELS: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

category_enum!(Sex, "sex", [Male => "Male", Female => "Female"]);
category_enum!(Smoker, "smoker", [Yes => "Yes", No => "No"]);
category_enum!(Day, "day", [Thur => "Thur", Fri => "Fri", Sat => "Sat", Sun => "Sun"]);
category_enum!(Meal, "time", [Lunch => "Lunch", Dinner => "Dinner"]);

/// One observed restaurant bill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TipRecord {
    pub total_bill: f64,
    pub tip: f64,
    pub sex: Sex,
    pub smoker: Smoker,
    pub day: Day,
    pub time: Meal,
    pub size: u32,
}

/// Numeric columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    TotalBill,
    Tip,
    Size,
}

impl NumericColumn {
    pub const ALL: [Self; 3] = [Self::TotalBill, Self::Tip, Self::Size];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TotalBill => "total_bill",
            Self::Tip => "tip",
            Self::Size => "size",
        }
    }

    #[must_use]
    pub fn value(self, record: &TipRecord) -> f64 {
        match self {
            Self::TotalBill => record.total_bill,
            Self::Tip => record.tip,
            Self::Size => f64::from(record.size),
        }
    }
}

/// Categorical columns, addressable at runtime by charts and facet grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalColumn {
    Sex,
    Smoker,
    Day,
    Time,
}

impl CategoricalColumn {
    pub const ALL: [Self; 4] = [Self::Sex, Self::Smoker, Self::Day, Self::Time];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sex => Sex::COLUMN,
            Self::Smoker => Smoker::COLUMN,
            Self::Day => Day::COLUMN,
            Self::Time => Meal::COLUMN,
        }
    }

    /// Level labels in display order.
    #[must_use]
    pub fn levels(self) -> Vec<&'static str> {
        fn labels<C: Category>() -> Vec<&'static str> {
            C::LEVELS.iter().map(|level| level.label()).collect()
        }
        match self {
            Self::Sex => labels::<Sex>(),
            Self::Smoker => labels::<Smoker>(),
            Self::Day => labels::<Day>(),
            Self::Time => labels::<Meal>(),
        }
    }

    #[must_use]
    pub fn level_count(self) -> usize {
        match self {
            Self::Sex => Sex::LEVELS.len(),
            Self::Smoker => Smoker::LEVELS.len(),
            Self::Day => Day::LEVELS.len(),
            Self::Time => Meal::LEVELS.len(),
        }
    }

    #[must_use]
    pub fn level_index(self, record: &TipRecord) -> usize {
        match self {
            Self::Sex => record.sex.position(),
            Self::Smoker => record.smoker.position(),
            Self::Day => record.day.position(),
            Self::Time => record.time.position(),
        }
    }

    #[must_use]
    pub fn label_of(self, record: &TipRecord) -> &'static str {
        match self {
            Self::Sex => record.sex.label(),
            Self::Smoker => record.smoker.label(),
            Self::Day => record.day.label(),
            Self::Time => record.time.label(),
        }
    }
}

/// Immutable in-memory tips table.
#[derive(Debug, Clone, PartialEq)]
pub struct TipsDataset {
    records: Vec<TipRecord>,
}

impl TipsDataset {
    pub const COLUMNS: [&'static str; 7] =
        ["total_bill", "tip", "sex", "smoker", "day", "time", "size"];

    pub fn from_records(records: Vec<TipRecord>) -> ReportResult<Self> {
        if records.is_empty() {
            return Err(ReportError::InvalidData("dataset has no rows".to_owned()));
        }
        Ok(Self { records })
    }

    /// Parses CSV with the header `total_bill,tip,sex,smoker,day,time,size`.
    pub fn from_csv_reader<R: Read>(reader: R) -> ReportResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in Self::COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(ReportError::InvalidData(format!(
                    "missing column `{column}`"
                )));
            }
        }

        let records = reader
            .deserialize::<TipRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(records)
    }

    pub fn from_csv_path(path: &Path) -> ReportResult<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    #[must_use]
    pub fn records(&self) -> &[TipRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.records.iter().map(|record| column.value(record)).collect()
    }

    /// Copy of the rows for which `predicate` holds, `None` when no row
    /// matches.
    #[must_use]
    pub fn subset(&self, predicate: impl Fn(&TipRecord) -> bool) -> Option<Self> {
        let records: Vec<TipRecord> = self
            .records
            .iter()
            .copied()
            .filter(|record| predicate(record))
            .collect();
        (!records.is_empty()).then_some(Self { records })
    }

    /// Rows for which `predicate` holds, in table order.
    pub fn filter<'a>(
        &'a self,
        predicate: impl Fn(&TipRecord) -> bool + 'a,
    ) -> impl Iterator<Item = &'a TipRecord> + 'a {
        self.records.iter().filter(move |record| predicate(record))
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoricalColumn, Category, Day, NumericColumn, Sex, TipsDataset};

    const SAMPLE: &str = "total_bill,tip,sex,smoker,day,time,size\n\
        16.99,1.01,Female,No,Sun,Dinner,2\n\
        10.34,1.66,Male,No,Sat,Dinner,3\n";

    #[test]
    fn parses_typed_rows() {
        let dataset = TipsDataset::from_csv_reader(SAMPLE.as_bytes()).expect("parse");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].sex, Sex::Female);
        assert_eq!(dataset.records()[1].day, Day::Sat);
        assert_eq!(dataset.column(NumericColumn::Size), vec![2.0, 3.0]);
    }

    #[test]
    fn rejects_unknown_category() {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n1.0,1.0,Other,No,Sun,Dinner,2\n";
        assert!(TipsDataset::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "total_bill,tip,sex,smoker,day,time\n1.0,1.0,Male,No,Sun,Dinner\n";
        let err = TipsDataset::from_csv_reader(csv.as_bytes()).expect_err("missing size");
        assert!(format!("{err}").contains("size"));
    }

    #[test]
    fn rejects_empty_table() {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n";
        assert!(TipsDataset::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn day_levels_follow_week_order() {
        let labels: Vec<_> = Day::LEVELS.iter().map(|day| day.label()).collect();
        assert_eq!(labels, vec!["Thur", "Fri", "Sat", "Sun"]);
        assert_eq!(Day::Sat.position(), 2);
    }

    #[test]
    fn categorical_columns_resolve_record_levels() {
        let dataset = TipsDataset::from_csv_reader(SAMPLE.as_bytes()).expect("parse");
        let first = &dataset.records()[0];
        assert_eq!(CategoricalColumn::Time.name(), "time");
        assert_eq!(CategoricalColumn::Day.label_of(first), "Sun");
        assert_eq!(CategoricalColumn::Day.level_index(first), 3);
        assert_eq!(CategoricalColumn::Sex.levels(), vec!["Male", "Female"]);
        assert_eq!(CategoricalColumn::Smoker.level_count(), 2);
    }
}
