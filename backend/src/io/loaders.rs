//! CSV loaders for the `section` and `time_slot` relations.
//!
//! Files carry a header row with the relation's column names; extra columns
//! are ignored and empty optional fields read as missing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;

use crate::models::{Catalog, SectionRow, TimeSlotRow};

fn read_rows<T: DeserializeOwned, R: Read>(reader: R, what: &str) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (idx, rec) in rdr.deserialize().enumerate() {
        // Line 1 is the header.
        let row: T = rec.with_context(|| format!("bad {} record on line {}", what, idx + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_sections<R: Read>(reader: R) -> Result<Vec<SectionRow>> {
    read_rows(reader, "section")
}

pub fn read_time_slots<R: Read>(reader: R) -> Result<Vec<TimeSlotRow>> {
    read_rows(reader, "time_slot")
}

/// Load a catalog from a `section` CSV and a `time_slot` CSV.
pub fn load_catalog<P: AsRef<Path>, Q: AsRef<Path>>(sections: P, time_slots: Q) -> Result<Catalog> {
    let sections = sections.as_ref();
    let time_slots = time_slots.as_ref();

    let section_rows = read_sections(
        File::open(sections).with_context(|| format!("opening {}", sections.display()))?,
    )
    .with_context(|| format!("reading {}", sections.display()))?;
    let slot_rows = read_time_slots(
        File::open(time_slots).with_context(|| format!("opening {}", time_slots.display()))?,
    )
    .with_context(|| format!("reading {}", time_slots.display()))?;

    debug!(
        "Loaded {} sections and {} time slot rows",
        section_rows.len(),
        slot_rows.len()
    );
    Ok(Catalog::new(section_rows, slot_rows))
}
