pub mod batch_loader;
pub mod workbook_reader;

pub use batch_loader::{BatchLoader, LoadOutcome, LoadProgress, LoadReport};
pub use workbook_reader::WorkbookReader;
