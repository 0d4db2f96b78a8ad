pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod loader;
pub mod locator;
pub mod report;
pub mod table;
pub mod ui;
pub mod validator;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, ColumnConfig, Config, OutputConfig, SourceConfig, ValidationConfig};
pub use error::{Result, SelloutError, UserFriendlyError};

// Core functionality re-exports
pub use exporter::{output_file_name, TsvExporter};
pub use loader::{BatchLoader, LoadOutcome, LoadReport, WorkbookReader};
pub use locator::{FileLocator, SourceFile};
pub use report::{DryRunPlan, RunOutcome, RunReport};
pub use table::{Table, Value};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};
pub use validator::validate;

use std::path::{Path, PathBuf};

/// Runs the discover, load, validate and export pipeline for one chain and date.
pub struct SelloutExport {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl SelloutExport {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    /// Executes one run. Never fails: every outcome, including errors, is in the report.
    pub fn run(&self, chain_id: i64, date: i64) -> RunReport {
        let pattern = FileLocator::with_pattern(&self.config.source.prefix, &self.config.source.extension)
            .map(|locator| locator.pattern())
            .unwrap_or_default();
        let mut report = RunReport::new(chain_id, date, &self.config.source.directory, pattern);

        self.output_formatter.debug(&format!(
            "Processing chain {} for date {}",
            chain_id, date
        ));

        let outcome = match self.execute(date, &mut report) {
            Ok(outcome) => outcome,
            Err(e) if e.is_validation() => {
                self.output_formatter
                    .print_error_with_context(Some("Validation error"), &e);
                RunOutcome::ValidationFailed {
                    message: e.to_string(),
                }
            }
            Err(e) => {
                self.output_formatter
                    .print_error_with_context(Some("Unexpected error"), &e);
                RunOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };

        report.finish(outcome);
        report
    }

    fn execute(&self, date: i64, report: &mut RunReport) -> Result<RunOutcome> {
        // Step 1: Discover source workbooks
        let files = match self.locate_sources() {
            Ok(files) => files,
            Err(e @ SelloutError::Discovery { .. }) => {
                self.output_formatter.print_user_friendly_error(&e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        report.files_found = files.len();

        if files.is_empty() {
            self.output_formatter.error(&format!(
                "No files found to process ({} in {})",
                report.pattern,
                self.config.source.directory.display()
            ));
            return Ok(RunOutcome::NoSourceFiles);
        }

        self.output_formatter
            .debug(&format!("Found {} source files", files.len()));

        // Step 2: Load and combine
        let load_report = self.load_sources(&files);
        report.files = load_report.outcomes.clone();

        if load_report.nothing_loaded() {
            self.output_formatter
                .warning("No file was loaded successfully.");
        }

        let table = load_report.table;
        report.rows = table.row_count();
        report.columns = table.column_count();

        if table.is_empty() {
            self.output_formatter
                .error("The combined table is empty after loading the files.");
            return Ok(RunOutcome::EmptyResult);
        }

        // Step 3: Validate required columns when configured
        if self.config.validation_enabled() {
            self.output_formatter.start_operation("Validating required columns");
            validate(&table, &self.config.validation.required_columns)?;
            self.output_formatter.debug("All required columns are present and complete");
        }

        // Step 4: Export
        let path = self.export_table(&table, date)?;

        self.output_formatter.success(&format!(
            "Process completed successfully. Rows processed: {}",
            table.row_count()
        ));
        self.output_formatter
            .success(&format!("Generated file: {}", output_file_name(date)));

        Ok(RunOutcome::Exported {
            path,
            rows: table.row_count(),
        })
    }

    /// Lists the source workbooks this run would load.
    pub fn locate_sources(&self) -> Result<Vec<SourceFile>> {
        self.output_formatter.start_operation("Searching for source files");

        let locator = FileLocator::new(&self.config.source)?;
        locator.locate(&self.config.source.directory)
    }

    /// Discovers the source files and describes the run without loading or writing anything.
    pub fn plan(&self, chain_id: i64, date: i64) -> Result<DryRunPlan> {
        let locator = FileLocator::new(&self.config.source)?;
        let files = locator.locate(&self.config.source.directory)?;

        Ok(DryRunPlan {
            chain_id,
            date,
            source_directory: self.config.source.directory.clone(),
            pattern: locator.pattern(),
            text_columns: self.config.columns.text_columns.clone(),
            required_columns: self.config.validation.required_columns.clone(),
            output_path: self.output_path(date),
            files,
        })
    }

    fn load_sources(&self, files: &[SourceFile]) -> LoadReport {
        self.output_formatter.start_operation("Loading workbooks");

        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &loader::LoadProgress, outcome: &LoadOutcome| {
                ui::progress::update_load_progress(&pb, progress, outcome);
                self.progress_manager
                    .suspend(|| self.output_formatter.print_load_outcome(outcome));
            }
        };

        let loader = BatchLoader::new(WorkbookReader::new(&self.config.columns));
        let load_report = loader.load_files(files, Some(&progress_callback));

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!(
                "Loaded {} of {} files ({} failed)",
                load_report.loaded_count(),
                files.len(),
                load_report.failed_count()
            ),
            load_report.duration,
        );

        load_report
    }

    fn export_table(&self, table: &Table, date: i64) -> Result<PathBuf> {
        self.output_formatter.start_operation("Writing export file");

        let exporter = TsvExporter::new(&self.config.output.directory);
        exporter.export(table, date)
    }

    pub fn output_path(&self, date: i64) -> PathBuf {
        TsvExporter::new(&self.config.output.directory).output_path(date)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &SelloutError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: [&str; 3] = ["UPC", "Código Tienda", "Stock"];

    fn write_workbook(path: &Path, rows: &[[&str; 3]]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in HEADER.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    struct Fixture {
        source: TempDir,
        output: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                source: TempDir::new().unwrap(),
                output: TempDir::new().unwrap(),
            }
        }

        fn app(&self, required: &[&str]) -> SelloutExport {
            let mut config = Config::default();
            config.source.directory = self.source.path().to_path_buf();
            config.output.directory = self.output.path().to_path_buf();
            config.validation.required_columns = required.iter().map(|c| c.to_string()).collect();
            SelloutExport::new(config, OutputMode::Plain, 0, true)
        }

        fn output_file(&self, date: i64) -> PathBuf {
            self.output.path().join(output_file_name(date))
        }
    }

    #[test]
    fn test_end_to_end_export() {
        let fixture = Fixture::new();
        write_workbook(
            &fixture.source.path().join("SO_Stock_A.xlsx"),
            &[
                ["0012345", "T01", "4"],
                ["0012346", "T01", "5"],
                ["0012347", "T02", "6"],
            ],
        );
        write_workbook(
            &fixture.source.path().join("SO_Stock_B.xlsx"),
            &[["0099999", "T03", "1"], ["0099998", "T03", "2"]],
        );

        let report = fixture.app(&[]).run(7, 20240101);

        let expected = fixture.output_file(20240101);
        assert_eq!(
            report.outcome,
            RunOutcome::Exported {
                path: expected.clone(),
                rows: 5
            }
        );
        assert_eq!(report.chain_id, 7);
        assert_eq!(report.files_found, 2);

        let content = fs::read_to_string(&expected).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "UPC\tCódigo Tienda\tStock");
        assert_eq!(lines[1], "0012345\tT01\t4");
        assert_eq!(lines[5], "0099998\tT03\t2");
    }

    #[test]
    fn test_no_matching_files() {
        let fixture = Fixture::new();
        fs::write(fixture.source.path().join("SO_Ventas.xlsx"), b"x").unwrap();

        let report = fixture.app(&[]).run(7, 20240101);

        assert_eq!(report.outcome, RunOutcome::NoSourceFiles);
        assert!(!fixture.output_file(20240101).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_source_directory_means_no_files() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = Fixture::new();
        write_workbook(
            &fixture.source.path().join("SO_Stock_A.xlsx"),
            &[["001", "T01", "1"]],
        );
        let source = fixture.source.path();
        fs::set_permissions(source, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not restrict root.
        let readable = fs::read_dir(source).is_ok();
        let app = fixture.app(&[]);
        let located = app.locate_sources();
        let report = app.run(7, 20240101);
        fs::set_permissions(source, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert!(matches!(located, Err(SelloutError::Discovery { .. })));
        assert_eq!(report.outcome, RunOutcome::NoSourceFiles);
        assert_eq!(report.files_found, 0);
        assert!(!fixture.output_file(20240101).exists());
    }

    #[test]
    fn test_all_files_malformed() {
        let fixture = Fixture::new();
        fs::write(fixture.source.path().join("SO_Stock_A.xlsx"), b"garbage").unwrap();
        fs::write(fixture.source.path().join("SO_Stock_B.xlsx"), b"garbage").unwrap();

        let report = fixture.app(&[]).run(7, 20240101);

        assert_eq!(report.outcome, RunOutcome::EmptyResult);
        assert_eq!(report.failed_files(), 2);
        assert!(!fixture.output_file(20240101).exists());
    }

    #[test]
    fn test_malformed_files_contribute_no_rows() {
        let fixture = Fixture::new();
        write_workbook(
            &fixture.source.path().join("SO_Stock_A.xlsx"),
            &[["001", "T01", "1"], ["002", "T01", "2"]],
        );
        fs::write(fixture.source.path().join("SO_Stock_B.xlsx"), b"garbage").unwrap();

        let report = fixture.app(&[]).run(7, 20240101);

        assert!(matches!(report.outcome, RunOutcome::Exported { .. }));
        assert_eq!(report.rows, 2);
        assert_eq!(report.loaded_files(), 1);
        assert_eq!(report.failed_files(), 1);
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let fixture = Fixture::new();
        write_workbook(
            &fixture.source.path().join("SO_Stock_A.xlsx"),
            &[["001", "", "1"]],
        );

        let report = fixture.app(&["UPC", "Código Tienda"]).run(7, 20240101);

        match &report.outcome {
            RunOutcome::ValidationFailed { message } => assert!(message.contains("Código Tienda")),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(!fixture.output_file(20240101).exists());
    }

    #[test]
    fn test_validation_success_exports() {
        let fixture = Fixture::new();
        write_workbook(
            &fixture.source.path().join("SO_Stock_A.xlsx"),
            &[["001", "T01", "1"]],
        );

        let report = fixture.app(&["UPC"]).run(7, 20240101);
        assert!(matches!(report.outcome, RunOutcome::Exported { .. }));
    }

    #[test]
    fn test_rerun_overwrites_with_identical_content() {
        let fixture = Fixture::new();
        write_workbook(
            &fixture.source.path().join("SO_Stock_A.xlsx"),
            &[["001", "T01", "1"]],
        );
        let app = fixture.app(&[]);

        app.run(7, 20240101);
        let first = fs::read(fixture.output_file(20240101)).unwrap();
        app.run(7, 20240101);
        let second = fs::read(fixture.output_file(20240101)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unwritable_output_is_reported() {
        let fixture = Fixture::new();
        write_workbook(
            &fixture.source.path().join("SO_Stock_A.xlsx"),
            &[["001", "T01", "1"]],
        );
        let mut config = fixture.app(&[]).config().clone();
        config.output.directory = fixture.output.path().join("missing");
        let app = SelloutExport::new(config, OutputMode::Plain, 0, true);

        let report = app.run(7, 20240101);
        assert!(matches!(report.outcome, RunOutcome::Failed { .. }));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        SelloutExport::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[source]"));
        assert!(content.contains("prefix = \"SO_Stock\""));
    }
}
