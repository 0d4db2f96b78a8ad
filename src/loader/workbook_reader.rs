use crate::config::ColumnConfig;
use crate::error::{Result, SelloutError};
use crate::table::{Table, Value};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashSet;
use std::path::Path;

/// Reads the first worksheet of a workbook into a [`Table`].
///
/// The first row is the header. Configured text columns are coerced to text and configured NA
/// markers become missing values.
pub struct WorkbookReader {
    text_columns: Vec<String>,
    na_values: HashSet<String>,
}

impl WorkbookReader {
    pub fn new(config: &ColumnConfig) -> Self {
        Self {
            text_columns: config.text_columns.clone(),
            na_values: config.na_values.iter().cloned().collect(),
        }
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let load_error = |reason: String| SelloutError::FileLoad {
            path: path.to_path_buf(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| load_error(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| load_error("workbook has no worksheets".to_string()))?
            .map_err(|e| load_error(e.to_string()))?;

        // The range starts at the first used cell; blank leading columns still count.
        let first_column = range.start().map_or(0, |(_, column)| column as usize);
        let mut rows = range.rows();

        let Some(header) = rows.next() else {
            return Ok(Table::empty());
        };

        let mut table = Table::new(normalize_headers(header, first_column));

        for row in rows {
            if row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }
            let cells = std::iter::repeat(Value::Missing)
                .take(first_column)
                .chain(row.iter().map(|cell| self.cell_value(cell)));
            table.push_row(cells.collect());
        }

        for column in &self.text_columns {
            table.coerce_to_text(column);
        }

        Ok(table)
    }

    fn cell_value(&self, cell: &Data) -> Value {
        match cell {
            Data::Empty | Data::Error(_) => Value::Missing,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                if self.na_values.contains(s) {
                    Value::Missing
                } else {
                    Value::Text(s.clone())
                }
            }
            Data::Int(i) => Value::Int(*i),
            Data::Float(f) => Value::Float(*f),
            Data::Bool(b) => Value::Bool(*b),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(Value::DateTime)
                .unwrap_or_else(|| Value::Float(dt.as_f64())),
        }
    }
}

/// Names header cells: blanks become `Unnamed: {index}` and repeats get `.1`, `.2`, ...
///
/// `first_column` is the sheet column of `header[0]`; the columns before it are blank.
fn normalize_headers(header: &[Data], first_column: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(first_column + header.len());
    let mut seen: HashSet<String> = HashSet::new();

    let leading_blanks = std::iter::repeat(&Data::Empty).take(first_column);

    for (index, cell) in leading_blanks.chain(header).enumerate() {
        let raw = match cell {
            Data::Empty => String::new(),
            other => other.to_string(),
        };

        let base = if raw.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            raw
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}
