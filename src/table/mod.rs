use std::collections::HashMap;

pub mod value;

pub use value::Value;

/// An in-memory table: named columns and rows of [`Value`]s.
///
/// Every row has exactly one value per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a row, padding short rows with missing values and dropping extra cells.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A table without rows or without columns holds no data.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Whether the column at `index` is a float column: every present cell is a number and
    /// at least one is fractional or missing.
    pub fn is_float_column(&self, index: usize) -> bool {
        let mut has_number = false;
        let mut needs_float = false;

        for row in &self.rows {
            let cell = &row[index];
            if cell.is_missing() {
                needs_float = true;
            } else if cell.is_number() {
                has_number = true;
                needs_float |= !cell.is_whole_number();
            } else {
                return false;
            }
        }

        has_number && needs_float
    }

    /// Rewrites every cell of `name` as text. Returns false when the column does not exist.
    pub fn coerce_to_text(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };

        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[index], Value::Missing);
            row[index] = cell.into_text();
        }

        true
    }

    /// Stacks tables row-wise.
    ///
    /// The result holds the union of all columns in order of first appearance; rows from a
    /// table lacking a column get [`Value::Missing`] there. Rows keep their input order.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for table in &tables {
            for column in &table.columns {
                if !positions.contains_key(column) {
                    positions.insert(column.clone(), columns.len());
                    columns.push(column.clone());
                }
            }
        }

        let total_rows = tables.iter().map(|t| t.rows.len()).sum();
        let mut combined = Table {
            columns,
            rows: Vec::with_capacity(total_rows),
        };

        for table in tables {
            let targets: Vec<usize> = table.columns.iter().map(|c| positions[c]).collect();

            for row in table.rows {
                let mut combined_row = vec![Value::Missing; combined.columns.len()];
                for (value, &target) in row.into_iter().zip(&targets) {
                    combined_row[target] = value;
                }
                combined.rows.push(combined_row);
            }
        }

        combined
    }
}
