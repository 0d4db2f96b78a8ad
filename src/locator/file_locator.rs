use crate::config::SourceConfig;
use crate::error::{Result, SelloutError};
use crate::locator::name_filter::NameFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl SourceFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            filename,
            size,
        }
    }
}

/// Finds source workbooks sitting directly inside one directory.
pub struct FileLocator {
    filter: NameFilter,
}

impl FileLocator {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            filter: NameFilter::from_config(config)?,
        })
    }

    pub fn with_pattern(prefix: &str, extension: &str) -> Result<Self> {
        Ok(Self {
            filter: NameFilter::new(prefix, extension)?,
        })
    }

    pub fn pattern(&self) -> String {
        self.filter.glob()
    }

    /// Lists matching files sorted by name.
    ///
    /// A directory that does not exist simply has no matches. Any other listing failure is
    /// returned as [`SelloutError::Discovery`].
    pub fn locate<P: AsRef<Path>>(&self, directory: P) -> Result<Vec<SourceFile>> {
        let directory = directory.as_ref();

        if !directory.exists() {
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut files = Vec::new();

        for entry in walker {
            let entry = entry.map_err(|source| SelloutError::Discovery {
                directory: directory.to_path_buf(),
                source,
            })?;

            if !self.filter.matches(entry.path()) || !entry.path().is_file() {
                continue;
            }

            let size = std::fs::metadata(entry.path()).map(|m| m.len()).unwrap_or(0);
            files.push(SourceFile::new(entry.into_path(), size));
        }

        Ok(files)
    }
}
