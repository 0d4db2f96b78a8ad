use crate::error::{SelloutError, UserFriendlyError};
use crate::loader::LoadOutcome;
use crate::report::{DryRunPlan, RunOutcome, RunReport};
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    /// Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &SelloutError) {
        self.print_error_with_context(None, error);
    }

    /// Prints an error under a heading such as "Validation error", followed by a suggestion.
    pub fn print_error_with_context(&self, context: Option<&str>, error: &SelloutError) {
        let user_message = match context {
            Some(context) => format!("{}: {}", context, error.user_message()),
            None => error.user_message(),
        };
        self.error(&user_message);

        if self.quiet {
            return;
        }

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_load_outcome(&self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded { file, rows, .. } => self.info(&format!(
                "Loaded file: {} ({} rows)",
                display_name(file),
                rows
            )),
            LoadOutcome::Failed { file, reason } => self.error(&format!(
                "Failed to load file {}: {}",
                display_name(file),
                reason
            )),
        }
    }

    pub fn print_run_report(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    pub fn print_dry_run(&self, plan: &DryRunPlan) {
        if self.mode == OutputMode::Json {
            let json_output =
                serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json_output);
            return;
        }

        if self.quiet {
            return;
        }

        self.info("DRY RUN MODE - nothing will be written");
        self.print_separator();
        println!("  Chain:            {}", plan.chain_id);
        println!("  Source directory: {}", plan.source_directory.display());
        println!("  Pattern:          {}", plan.pattern);
        println!("  Text columns:     {}", plan.text_columns.join(", "));
        if !plan.required_columns.is_empty() {
            println!("  Required columns: {}", plan.required_columns.join(", "));
        }
        println!("  Output file:      {}", plan.output_path.display());
        self.print_separator();

        if plan.files.is_empty() {
            self.warning("No files found to process");
            return;
        }

        self.info(&format!("Files that would be loaded ({}):", plan.files.len()));
        for file in &plan.files {
            println!("  {} ({} bytes)", file.filename, file.size);
        }
        self.print_separator();
        self.success("Dry run completed successfully");
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (CHECKMARK, style(message).green().bold()),
                MessageType::Error => (CROSS, style(message).red().bold()),
                MessageType::Warning => (WARNING, style(message).yellow().bold()),
                MessageType::Info => (INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "[OK]",
                MessageType::Error => "[Error]",
                MessageType::Warning => "[Warning]",
                MessageType::Info => "[Info]",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &RunReport) {
        if self.quiet || self.verbose_level == 0 {
            return;
        }

        self.print_header("Run Summary");
        println!("  Chain:        {}", report.chain_id);
        println!("  Date:         {}", report.date);
        println!("  Directory:    {}", report.source_directory.display());
        println!("  Pattern:      {}", report.pattern);
        println!(
            "  Files:        {} found, {} loaded, {} failed",
            report.files_found,
            report.loaded_files(),
            report.failed_files()
        );
        println!("  Rows:         {}", report.rows);
        println!("  Columns:      {}", report.columns);
        println!("  Outcome:      {}", describe_outcome(&report.outcome));
        println!("  Time taken:   {}", format_duration(report.duration));
        self.print_separator();
    }

    fn print_plain_report(&self, report: &RunReport) {
        if self.quiet {
            return;
        }

        println!("REPORT: {}", describe_outcome(&report.outcome));
        println!("Chain: {}", report.chain_id);
        println!("Date: {}", report.date);
        println!(
            "Files: {} found, {} loaded, {} failed",
            report.files_found,
            report.loaded_files(),
            report.failed_files()
        );
        println!("Rows: {}", report.rows);
        println!("Duration: {:?}", report.duration);
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn describe_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Exported { path, rows } => {
            format!("exported {} rows to {}", rows, path.display())
        }
        RunOutcome::NoSourceFiles => "no files found".to_string(),
        RunOutcome::EmptyResult => "empty result, nothing exported".to_string(),
        RunOutcome::ValidationFailed { message } => format!("validation failed: {}", message),
        RunOutcome::Failed { message } => format!("failed: {}", message),
    }
}
