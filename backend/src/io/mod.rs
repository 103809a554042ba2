//! File boundaries of a run: catalog CSV in, overlap table out.

pub mod export;
pub mod loaders;

pub use export::{export_overlaps, write_overlaps, write_table, ExportError};
pub use loaders::{load_catalog, read_sections, read_time_slots};
