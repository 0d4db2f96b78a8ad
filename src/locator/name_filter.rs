use crate::config::SourceConfig;
use crate::error::{Result, SelloutError};
use regex::Regex;
use std::path::Path;

/// Matches file names against the glob `*{prefix}*{extension}`.
pub struct NameFilter {
    prefix: String,
    extension: String,
    pattern: Regex,
}

impl NameFilter {
    pub fn new(prefix: &str, extension: &str) -> Result<Self> {
        let source = format!(
            r"^.*{}.*{}$",
            regex::escape(prefix),
            regex::escape(extension)
        );

        let pattern = Regex::new(&source).map_err(|e| SelloutError::Config {
            message: format!("Invalid search pattern '{}': {}", source, e),
        })?;

        Ok(Self {
            prefix: prefix.to_string(),
            extension: extension.to_string(),
            pattern,
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Self::new(&config.prefix, &config.extension)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        // Shell wildcards never match a leading dot.
        if name.starts_with('.') {
            return false;
        }

        self.pattern.is_match(name)
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.matches_name(name))
    }

    pub fn glob(&self) -> String {
        format!("*{}*{}", self.prefix, self.extension)
    }
}
