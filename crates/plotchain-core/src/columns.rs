// File: crates/plotchain-core/src/columns.rs
// Summary: Column source seam plus a CSV-backed implementation (header name or index references).

use std::io::Read;
use std::path::Path;

use crate::error::ColumnError;
use crate::series::XSeries;

/// A column's values with their inferred element type.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    /// Numeric iff every non-blank cell parses as `f64`. Blank cells become NaN.
    pub fn infer(cells: Vec<String>) -> Self {
        let numeric: Option<Vec<f64>> = cells
            .iter()
            .map(|c| {
                let c = c.trim();
                if c.is_empty() { Some(f64::NAN) } else { c.parse::<f64>().ok() }
            })
            .collect();
        match numeric {
            Some(v) if !cells.iter().all(|c| c.trim().is_empty()) => Column::Numeric(v),
            _ => Column::Text(cells),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_x(self) -> XSeries {
        match self {
            Column::Numeric(v) => XSeries::Numeric(v),
            Column::Text(v) => XSeries::Text(v),
        }
    }

    pub fn into_y(self, reference: &str) -> Result<Vec<f64>, ColumnError> {
        match self {
            Column::Numeric(v) => Ok(v),
            Column::Text(_) => Err(ColumnError::NotNumeric(reference.to_string())),
        }
    }
}

/// Anything that can hand out columns by reference.
pub trait ColumnSource {
    fn column(&self, reference: &str) -> Result<Column, ColumnError>;
}

/// CSV parsing knobs.
#[derive(Clone, Copy, Debug)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',', has_headers: true }
    }
}

/// Column-major view of a CSV table.
#[derive(Clone, Debug, Default)]
pub struct CsvColumns {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl CsvColumns {
    pub fn from_path(path: impl AsRef<Path>, opts: CsvOptions) -> Result<Self, ColumnError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file, opts)
    }

    pub fn from_reader<R: Read>(reader: R, opts: CsvOptions) -> Result<Self, ColumnError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(opts.has_headers)
            .delimiter(opts.delimiter)
            .flexible(true)
            .from_reader(reader);

        let mut headers = if opts.has_headers {
            rdr.headers()?.iter().map(|h| h.trim().to_string()).collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut rows = 0usize;
        for rec in rdr.records() {
            let rec = rec?;
            if rec.len() > columns.len() {
                columns.resize(rec.len(), vec![String::new(); rows]);
            }
            for (i, col) in columns.iter_mut().enumerate() {
                col.push(rec.get(i).unwrap_or("").to_string());
            }
            rows += 1;
        }
        headers.resize(columns.len(), String::new());
        tracing::debug!(columns = columns.len(), rows, "loaded csv");
        Ok(Self { headers, columns })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    fn index_of(&self, reference: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| !h.is_empty() && h == reference)
            .or_else(|| reference.trim().parse::<usize>().ok().filter(|&i| i < self.columns.len()))
    }
}

impl ColumnSource for CsvColumns {
    fn column(&self, reference: &str) -> Result<Column, ColumnError> {
        let idx = self
            .index_of(reference)
            .ok_or_else(|| ColumnError::Missing(reference.to_string()))?;
        Ok(Column::infer(self.columns[idx].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_before_indices() {
        let csv = "1,0\n10,20\n11,21\n";
        let cols = CsvColumns::from_reader(csv.as_bytes(), CsvOptions::default()).unwrap();
        // header "0" names the second column, so "0" must not mean index 0
        assert_eq!(cols.column("0").unwrap(), Column::Numeric(vec![20.0, 21.0]));
        assert_eq!(cols.column("1").unwrap(), Column::Numeric(vec![10.0, 11.0]));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let csv = "a,b\n1\n2,3,4\n";
        let cols = CsvColumns::from_reader(csv.as_bytes(), CsvOptions::default()).unwrap();
        assert_eq!(cols.row_count(), 2);
        assert_eq!(cols.headers(), &["a".to_string(), "b".to_string(), String::new()]);
        match cols.column("2").unwrap() {
            Column::Numeric(v) => {
                assert!(v[0].is_nan());
                assert_eq!(v[1], 4.0);
            }
            other => panic!("expected numeric column, got {other:?}"),
        }
    }
}
