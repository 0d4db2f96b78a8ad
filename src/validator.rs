use crate::error::{Result, SelloutError};
use crate::table::Table;

/// Checks that every required column exists and has no missing values.
///
/// Columns are checked in the order given and the first failure is returned; for a single
/// column, existence is checked before nullness.
pub fn validate<S: AsRef<str>>(table: &Table, required_columns: &[S]) -> Result<()> {
    for column in required_columns {
        let column = column.as_ref();

        let mut values = table
            .column_values(column)
            .ok_or_else(|| SelloutError::MissingColumn {
                column: column.to_string(),
            })?;

        if values.any(|value| value.is_missing()) {
            return Err(SelloutError::NullValue {
                column: column.to_string(),
            });
        }
    }

    Ok(())
}
