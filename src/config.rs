use crate::error::{Result, SelloutError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "SO_Stock";
pub const DEFAULT_EXTENSION: &str = ".xlsx";
pub const UPC_COLUMN: &str = "UPC";
pub const STORE_CODE_COLUMN: &str = "Código Tienda";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub columns: ColumnConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub directory: PathBuf,
    pub prefix: String,
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Columns read as text regardless of how the cells are typed in the workbook.
    pub text_columns: Vec<String>,
    /// Text cell values that are treated as missing.
    pub na_values: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Columns that must exist and be fully populated before export. Empty disables validation.
    pub required_columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            directory: default_source_directory(),
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            text_columns: vec![UPC_COLUMN.to_string(), STORE_CODE_COLUMN.to_string()],
            na_values: [
                "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
                "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// The directory holding the running executable, which is where operators drop the extracts.
pub fn default_source_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SelloutError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SelloutError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| SelloutError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["sellout.toml", ".sellout.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.directory {
            self.source.directory = directory.clone();
        }

        if let Some(ref prefix) = cli_args.prefix {
            self.source.prefix = prefix.clone();
        }

        if let Some(ref extension) = cli_args.extension {
            self.source.extension = extension.clone();
        }

        if let Some(ref required) = cli_args.required_columns {
            self.validation.required_columns = required
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = output_dir.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let is_bare_name = |s: &str| !s.contains('/') && !s.contains('\\');

        if !is_bare_name(&self.source.prefix) || !is_bare_name(&self.source.extension) {
            return Err(SelloutError::Config {
                message: "Search prefix and extension must not contain path separators"
                    .to_string(),
            });
        }

        if self.source.extension.is_empty() {
            return Err(SelloutError::Config {
                message: "A file extension must be specified".to_string(),
            });
        }

        if self.columns.text_columns.iter().any(|c| c.is_empty()) {
            return Err(SelloutError::Config {
                message: "Text column names must not be empty".to_string(),
            });
        }

        if self.validation.required_columns.iter().any(|c| c.is_empty()) {
            return Err(SelloutError::Config {
                message: "Required column names must not be empty".to_string(),
            });
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(SelloutError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn validation_enabled(&self) -> bool {
        !self.validation.required_columns.is_empty()
    }

    /// Sample configuration with every default spelled out.
    ///
    /// The source directory is machine-specific, so it is left out and resolves at run time.
    /// The output directory is written relative to where the tool runs.
    pub fn create_sample_config() -> String {
        let mut defaults = Self::default();
        defaults.output.directory = PathBuf::from(".");

        let Ok(mut sample) = toml::Value::try_from(defaults) else {
            return String::new();
        };

        if let Some(source) = sample.get_mut("source").and_then(|v| v.as_table_mut()) {
            source.remove("directory");
        }

        toml::to_string_pretty(&sample).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub prefix: Option<String>,
    pub extension: Option<String>,
    pub required_columns: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_required_columns(mut self, columns: Option<Vec<String>>) -> Self {
        self.required_columns = columns;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.prefix, "SO_Stock");
        assert_eq!(config.source.extension, ".xlsx");
        assert!(config.columns.text_columns.contains(&"UPC".to_string()));
        assert!(config
            .columns
            .text_columns
            .contains(&"Código Tienda".to_string()));
        assert!(config.columns.na_values.contains(&"NULL".to_string()));
        assert!(!config.validation_enabled());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.source.extension.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.prefix = "../SO_Stock".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.validation.required_columns = vec!["".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_round_trip() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(Config::create_sample_config().as_bytes())
            .unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        let defaults = Config::default();
        assert_eq!(loaded_config.source.prefix, DEFAULT_PREFIX);
        assert_eq!(loaded_config.columns.na_values, defaults.columns.na_values);
        assert_eq!(loaded_config.source.directory, defaults.source.directory);
        assert_eq!(loaded_config.output.directory, PathBuf::from("."));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[validation]\nrequired_columns = [\"UPC\"]\n").unwrap();
        assert_eq!(config.validation.required_columns, vec!["UPC"]);
        assert_eq!(config.source.prefix, DEFAULT_PREFIX);
        assert!(config.validation_enabled());
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here/sellout.toml");
        assert!(matches!(result, Err(SelloutError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_directory(Some(PathBuf::from("/data/extracts")))
            .with_prefix(Some("SO_Ventas".to_string()))
            .with_required_columns(Some(vec![" UPC ".to_string(), "".to_string()]));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.source.directory, PathBuf::from("/data/extracts"));
        assert_eq!(config.source.prefix, "SO_Ventas");
        assert_eq!(config.source.extension, ".xlsx");
        assert_eq!(config.validation.required_columns, vec!["UPC"]);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[source]"));
        assert!(sample.contains("[columns]"));
        assert!(sample.contains("[validation]"));
        assert!(sample.contains("[output]"));
        assert_eq!(sample.matches("directory").count(), 1);
        assert!(sample.contains("directory = \".\""));
    }
}
