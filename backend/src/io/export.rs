//! Comma-delimited export of fixed-arity tables.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::models::{OverlapPair, OVERLAP_COLUMNS};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A record does not have as many fields as the header.
    #[error("row {row} has {found} fields, header has {expected}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `header` followed by `rows`.
///
/// Rows are numbered from 1 in [`ExportError::SchemaMismatch`]. Returns the
/// number of data rows written.
pub fn write_table<W, R, S>(writer: W, header: &[&str], rows: R) -> Result<usize, ExportError>
where
    W: Write,
    R: IntoIterator,
    R::Item: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(header)?;

    let mut written = 0;
    for (idx, row) in rows.into_iter().enumerate() {
        let fields = row.as_ref();
        if fields.len() != header.len() {
            return Err(ExportError::SchemaMismatch {
                row: idx + 1,
                expected: header.len(),
                found: fields.len(),
            });
        }
        out.write_record(fields.iter().map(AsRef::<str>::as_ref))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Write the `overlapping_sections` table to any writer.
pub fn write_overlaps<W: Write>(writer: W, pairs: &[OverlapPair]) -> Result<usize, ExportError> {
    write_table(writer, &OVERLAP_COLUMNS, pairs.iter().map(OverlapPair::to_record))
}

/// Export the overlap table to `path`.
///
/// The table is rendered in memory first, so a failed export never leaves a
/// truncated file behind.
pub fn export_overlaps<P: AsRef<Path>>(path: P, pairs: &[OverlapPair]) -> Result<usize, ExportError> {
    let mut buffer = Vec::new();
    let written = write_overlaps(&mut buffer, pairs)?;
    fs::write(path.as_ref(), buffer)?;
    info!(
        "Exported {} overlapping pairs to {}",
        written,
        path.as_ref().display()
    );
    Ok(written)
}
