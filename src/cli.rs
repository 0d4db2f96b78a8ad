use crate::config::{CliOverrides, Config};
use crate::error::{Result, SelloutError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sellout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Consolidate sell-out stock workbooks into a tab-separated export")]
#[command(
    long_about = "Sellout finds every *SO_Stock*.xlsx workbook in a directory, stacks their rows \
                  into one table and writes it to sellout_<DATE>.txt as tab-separated text."
)]
#[command(after_help = "EXAMPLES:\n  \
    sellout 7 20240101\n  \
    sellout 7 20240101 --directory ./extracts --output-dir ./out\n  \
    sellout 7 20240101 --require UPC,\"Código Tienda\"\n  \
    sellout 7 20240101 --dry-run -v")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Retail chain identifier
    #[arg(value_parser = parse_chain_id, required_unless_present = "generate_config")]
    pub chain_id: Option<i64>,

    /// Run date as YYYYMMDD, used to name the output file
    #[arg(value_parser = parse_date, required_unless_present = "generate_config")]
    pub date: Option<i64>,

    /// Directory holding the source workbooks (defaults to the executable's directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Directory the export file is written to (defaults to the current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Substring the source file names must contain
    #[arg(long)]
    pub prefix: Option<String>,

    /// Extension the source file names must end with
    #[arg(long)]
    pub extension: Option<String>,

    /// Columns that must exist and have no empty cells before exporting (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub require: Option<Vec<String>>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for messages and the run report
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the files that would be loaded without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a sample configuration file
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_directory(self.directory.clone())
            .with_output_dir(self.output_dir.clone())
            .with_prefix(self.prefix.clone())
            .with_extension(self.extension.clone())
            .with_required_columns(self.require.clone())
    }

    /// The chain id and date of a pipeline run.
    pub fn run_arguments(&self) -> Result<(i64, i64)> {
        match (self.chain_id, self.date) {
            (Some(chain_id), Some(date)) => Ok((chain_id, date)),
            (None, _) => Err(SelloutError::InvalidArgument {
                message: "chain_id is required".to_string(),
            }),
            (_, None) => Err(SelloutError::InvalidArgument {
                message: "date is required".to_string(),
            }),
        }
    }
}

pub fn parse_chain_id(s: &str) -> std::result::Result<i64, String> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| "chain_id must be an integer".to_string())
}

pub fn parse_date(s: &str) -> std::result::Result<i64, String> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| "date must be an integer (YYYYMMDD)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id("7"), Ok(7));
        assert_eq!(parse_chain_id(" 12 "), Ok(12));
        assert_eq!(
            parse_chain_id("abc"),
            Err("chain_id must be an integer".to_string())
        );
        assert!(parse_chain_id("7.5").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("20240101"), Ok(20240101));
        assert!(parse_date("2024-01-01").is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "sellout",
            "7",
            "20240101",
            "--directory",
            "/data/in",
            "--require",
            "UPC,Código Tienda",
        ])
        .unwrap();

        assert_eq!(cli.run_arguments().unwrap(), (7, 20240101));
        assert_eq!(cli.directory, Some(PathBuf::from("/data/in")));
        assert_eq!(
            cli.require,
            Some(vec!["UPC".to_string(), "Código Tienda".to_string()])
        );
    }

    #[test]
    fn test_non_integer_chain_id_is_rejected() {
        let error = Cli::try_parse_from(["sellout", "abc", "20240101"]).unwrap_err();
        assert!(error.to_string().contains("chain_id must be an integer"));
    }

    #[test]
    fn test_generate_config_needs_no_positionals() {
        let cli = Cli::try_parse_from(["sellout", "--generate-config"]).unwrap();
        assert!(cli.generate_config);
        assert!(cli.run_arguments().is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "sellout",
            "7",
            "20240101",
            "--prefix",
            "SO_Ventas",
            "--output-dir",
            "/tmp",
        ])
        .unwrap();

        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.source.prefix, "SO_Ventas");
        assert_eq!(config.output.directory, PathBuf::from("/tmp"));
    }
}
