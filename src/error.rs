use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelloutError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot list files in {}: {source}", directory.display())]
    Discovery {
        directory: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to load {}: {reason}", path.display())]
    FileLoad { path: PathBuf, reason: String },

    #[error("Column '{column}' does not exist in the combined table")]
    MissingColumn { column: String },

    #[error("Column '{column}' contains missing values")]
    NullValue { column: String },

    #[error("Failed to write {}: {message}", path.display())]
    Export { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl SelloutError {
    /// Validation failures are expected outcomes of a run, everything else is unexpected.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SelloutError::MissingColumn { .. } | SelloutError::NullValue { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for SelloutError {
    fn user_message(&self) -> String {
        match self {
            SelloutError::Discovery { directory, source } => {
                format!("Could not list files in {}: {}", directory.display(), source)
            }
            SelloutError::FileLoad { path, reason } => {
                format!("Loading {} failed: {}", path.display(), reason)
            }
            SelloutError::MissingColumn { column } => {
                format!("The column '{}' does not exist in the data", column)
            }
            SelloutError::NullValue { column } => {
                format!("The column '{}' contains null values", column)
            }
            SelloutError::Export { path, message } => {
                format!("Could not write {}: {}", path.display(), message)
            }
            SelloutError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            SelloutError::Discovery { .. } => Some(
                "Check that the source directory exists and is readable, or pass another one with --directory.".to_string()
            ),
            SelloutError::FileLoad { .. } => Some(
                "Make sure the file is a valid workbook and is not open in another program.".to_string()
            ),
            SelloutError::MissingColumn { .. } => Some(
                "Check the header row of the source workbooks or adjust the required columns with --require.".to_string()
            ),
            SelloutError::NullValue { .. } => Some(
                "Fill in the empty cells in the source workbooks before exporting.".to_string()
            ),
            SelloutError::Export { .. } => Some(
                "Ensure the output directory exists and is writable, or choose another one with --output-dir.".to_string()
            ),
            SelloutError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for SelloutError {
    fn from(error: toml::de::Error) -> Self {
        SelloutError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SelloutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = SelloutError::MissingColumn {
            column: "UPC".to_string(),
        };
        assert!(error.user_message().contains("'UPC'"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_validation_classification() {
        assert!(SelloutError::NullValue {
            column: "UPC".to_string()
        }
        .is_validation());
        assert!(!SelloutError::Config {
            message: "bad".to_string()
        }
        .is_validation());
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = SelloutError::from(toml_error);
        assert!(matches!(error, SelloutError::Config { .. }));
    }
}
