use crate::error::{Result, SelloutError};
use crate::table::Table;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const OUTPUT_PREFIX: &str = "sellout_";
const OUTPUT_EXTENSION: &str = ".txt";

/// `sellout_{date}.txt`, with the date rendered exactly as given.
pub fn output_file_name(date: i64) -> String {
    format!("{}{}{}", OUTPUT_PREFIX, date, OUTPUT_EXTENSION)
}

/// Writes tables as tab-separated text files.
pub struct TsvExporter {
    output_directory: PathBuf,
}

impl TsvExporter {
    pub fn new<P: Into<PathBuf>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    pub fn output_path(&self, date: i64) -> PathBuf {
        self.output_directory.join(output_file_name(date))
    }

    /// Writes `table` to `sellout_{date}.txt`, replacing any previous file of that name.
    ///
    /// The data goes to a temporary file in the output directory first and is renamed into
    /// place once complete, so a failed export leaves nothing behind.
    pub fn export(&self, table: &Table, date: i64) -> Result<PathBuf> {
        let path = self.output_path(date);
        let export_error = |message: String| SelloutError::Export {
            path: path.clone(),
            message,
        };

        let mut temp_file =
            NamedTempFile::new_in(&self.output_directory).map_err(|e| export_error(e.to_string()))?;

        write_table(table, temp_file.as_file_mut()).map_err(|e| export_error(e.to_string()))?;
        temp_file
            .as_file_mut()
            .sync_all()
            .map_err(|e| export_error(e.to_string()))?;

        set_default_permissions(temp_file.path()).map_err(|e| export_error(e.to_string()))?;

        temp_file
            .persist(&path)
            .map_err(|e| export_error(e.error.to_string()))?;

        Ok(path)
    }
}

/// Serializes a table as tab-delimited text with a header line and no index column.
pub fn write_table<W: Write>(table: &Table, writer: W) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(table.columns())?;

    let float_columns: Vec<bool> = (0..table.column_count())
        .map(|index| table.is_float_column(index))
        .collect();

    for row in table.rows() {
        writer.write_record(row.iter().zip(&float_columns).map(|(value, &is_float)| {
            if is_float {
                value.to_float_field().into_owned()
            } else {
                value.to_field().into_owned()
            }
        }))?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
