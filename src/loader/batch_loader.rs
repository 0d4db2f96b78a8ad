use crate::loader::workbook_reader::WorkbookReader;
use crate::locator::SourceFile;
use crate::table::Table;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Result of one load attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded {
        file: PathBuf,
        rows: usize,
        columns: usize,
    },
    Failed {
        file: PathBuf,
        reason: String,
    },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

#[derive(Debug, Clone)]
pub struct LoadProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl LoadProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// The combined table plus what happened to every input file, in input order.
#[derive(Debug)]
pub struct LoadReport {
    pub table: Table,
    pub outcomes: Vec<LoadOutcome>,
    pub duration: Duration,
}

impl LoadReport {
    pub fn loaded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.loaded_count()
    }

    /// True when no file could be read at all.
    pub fn nothing_loaded(&self) -> bool {
        self.loaded_count() == 0
    }
}

pub struct BatchLoader {
    reader: WorkbookReader,
}

impl BatchLoader {
    pub fn new(reader: WorkbookReader) -> Self {
        Self { reader }
    }

    /// Reads every file in order and stacks the successful ones.
    ///
    /// A file that fails to read is recorded as [`LoadOutcome::Failed`] and skipped.
    pub fn load_files(
        &self,
        files: &[SourceFile],
        progress_callback: Option<&dyn Fn(&LoadProgress, &LoadOutcome)>,
    ) -> LoadReport {
        let mut progress = LoadProgress::new(files.len());
        let mut tables = Vec::new();
        let mut outcomes = Vec::with_capacity(files.len());

        for file in files {
            progress.current_file = Some(file.filename.clone());

            let outcome = match self.reader.read(&file.path) {
                Ok(table) => {
                    let outcome = LoadOutcome::Loaded {
                        file: file.path.clone(),
                        rows: table.row_count(),
                        columns: table.column_count(),
                    };
                    tables.push(table);
                    outcome
                }
                Err(e) => LoadOutcome::Failed {
                    file: file.path.clone(),
                    reason: e.to_string(),
                },
            };

            progress.files_processed += 1;
            if let Some(callback) = progress_callback {
                callback(&progress, &outcome);
            }
            outcomes.push(outcome);
        }

        LoadReport {
            table: Table::concat(tables),
            outcomes,
            duration: progress.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnConfig;
    use crate::table::Value;
    use rust_xlsxwriter::Workbook;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_workbook(path: &Path, header: &[&str], rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in header.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    fn source(path: PathBuf) -> SourceFile {
        SourceFile::new(path, 0)
    }

    fn loader() -> BatchLoader {
        BatchLoader::new(WorkbookReader::new(&ColumnConfig::default()))
    }

    #[test]
    fn test_failed_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let good_a = temp_dir.path().join("SO_Stock_A.xlsx");
        let broken = temp_dir.path().join("SO_Stock_B.xlsx");
        let good_c = temp_dir.path().join("SO_Stock_C.xlsx");

        write_workbook(&good_a, &["UPC", "Stock"], &[&["001", "1"], &["002", "2"]]);
        fs::write(&broken, b"garbage").unwrap();
        write_workbook(&good_c, &["UPC", "Stock"], &[&["003", "3"]]);

        let files = vec![source(good_a.clone()), source(broken.clone()), source(good_c)];
        let report = loader().load_files(&files, None);

        assert_eq!(report.table.row_count(), 3);
        assert_eq!(report.loaded_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(
            report.outcomes[0],
            LoadOutcome::Loaded {
                file: good_a,
                rows: 2,
                columns: 2
            }
        );
        assert!(matches!(&report.outcomes[1], LoadOutcome::Failed { file, .. } if *file == broken));
        assert_eq!(
            report.table.rows()[2][0],
            Value::Text("003".to_string())
        );
    }

    #[test]
    fn test_all_files_failing_gives_empty_table() {
        let temp_dir = TempDir::new().unwrap();
        let broken = temp_dir.path().join("SO_Stock_A.xlsx");
        fs::write(&broken, b"garbage").unwrap();
        let missing = temp_dir.path().join("SO_Stock_gone.xlsx");

        let report = loader().load_files(&[source(broken), source(missing)], None);

        assert!(report.nothing_loaded());
        assert!(report.table.is_empty());
        assert_eq!(report.failed_count(), 2);
    }

    #[test]
    fn test_progress_callback_sees_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("SO_Stock_A.xlsx");
        write_workbook(&good, &["UPC"], &[&["001"]]);
        let broken = temp_dir.path().join("SO_Stock_B.xlsx");
        fs::write(&broken, b"garbage").unwrap();

        let seen = RefCell::new(Vec::new());
        let callback = |progress: &LoadProgress, outcome: &LoadOutcome| {
            seen.borrow_mut()
                .push((progress.files_processed, outcome.is_loaded()));
        };

        loader().load_files(&[source(good), source(broken)], Some(&callback));

        assert_eq!(seen.into_inner(), vec![(1, true), (2, false)]);
    }
}
