use std::fmt::Write as _;

use crate::dataset::{TipRecord, TipsDataset};

/// Console-friendly snapshot of the loaded table: leading rows and a column
/// summary.
#[derive(Debug, Clone, Copy)]
pub struct DatasetPreview<'a> {
    dataset: &'a TipsDataset,
}

const DTYPES: [&str; 7] = [
    "float64", "float64", "category", "category", "category", "category", "int64",
];

impl<'a> DatasetPreview<'a> {
    #[must_use]
    pub fn new(dataset: &'a TipsDataset) -> Self {
        Self { dataset }
    }

    /// First `rows` rows as a right-aligned table with a leading row index.
    #[must_use]
    pub fn head(&self, rows: usize) -> String {
        let shown: Vec<&TipRecord> = self.dataset.records().iter().take(rows).collect();
        let cells: Vec<[String; 7]> = shown.iter().map(|record| row_cells(record)).collect();

        let index_width = shown.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = TipsDataset::COLUMNS
            .iter()
            .enumerate()
            .map(|(column, name)| {
                cells
                    .iter()
                    .map(|row| row[column].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{:index_width$}", "");
        for (name, width) in TipsDataset::COLUMNS.iter().zip(&widths) {
            let _ = write!(out, "  {name:>width$}");
        }
        for (index, row) in cells.iter().enumerate() {
            out.push('\n');
            let _ = write!(out, "{index:<index_width$}");
            for (value, width) in row.iter().zip(&widths) {
                let _ = write!(out, "  {value:>width$}");
            }
        }
        out
    }

    /// Row count plus name, non-null count and dtype of every column.
    #[must_use]
    pub fn info(&self) -> String {
        let rows = self.dataset.len();
        let mut out = String::new();
        let _ = writeln!(out, "RangeIndex: {rows} entries, 0 to {}", rows.saturating_sub(1));
        let _ = writeln!(out, "Data columns (total {} columns):", TipsDataset::COLUMNS.len());
        let _ = writeln!(out, " #   Column      Non-Null Count  Dtype");
        let _ = writeln!(out, "---  ------      --------------  -----");
        for (index, (name, dtype)) in TipsDataset::COLUMNS.iter().zip(DTYPES).enumerate() {
            let non_null = format!("{rows} non-null");
            let _ = writeln!(out, " {index:<3} {name:<11} {non_null:<15} {dtype}");
        }
        let _ = write!(out, "dtypes: category(4), float64(2), int64(1)");
        out
    }
}

fn row_cells(record: &TipRecord) -> [String; 7] {
    [
        format!("{:.2}", record.total_bill),
        format!("{:.2}", record.tip),
        record.sex.to_string(),
        record.smoker.to_string(),
        record.day.to_string(),
        record.time.to_string(),
        record.size.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::DatasetPreview;
    use crate::dataset::TipsDataset;

    fn dataset() -> TipsDataset {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n\
            16.99,1.01,Female,No,Sun,Dinner,2\n\
            10.34,1.66,Male,No,Sun,Dinner,3\n";
        TipsDataset::from_csv_reader(csv.as_bytes()).expect("dataset")
    }

    #[test]
    fn head_aligns_columns_under_headers() {
        let dataset = dataset();
        let head = DatasetPreview::new(&dataset).head(5);
        let lines: Vec<&str> = head.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("total_bill"));
        assert!(lines[1].starts_with('0'));
        assert!(lines[1].contains("16.99"));
        assert!(lines[2].contains("Male"));
        assert_eq!(lines[0].len(), lines[1].len());
    }

    #[test]
    fn info_lists_every_column() {
        let dataset = dataset();
        let info = DatasetPreview::new(&dataset).info();
        assert!(info.contains("RangeIndex: 2 entries, 0 to 1"));
        for column in TipsDataset::COLUMNS {
            assert!(info.contains(column));
        }
        assert!(info.contains("2 non-null"));
    }
}
