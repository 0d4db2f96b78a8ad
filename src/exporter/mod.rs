pub mod tsv_exporter;

pub use tsv_exporter::{output_file_name, TsvExporter};
