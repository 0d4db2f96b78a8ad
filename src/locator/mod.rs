pub mod file_locator;
pub mod name_filter;

pub use file_locator::{FileLocator, SourceFile};
pub use name_filter::NameFilter;
