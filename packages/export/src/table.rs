//! CSV attribute-table round-trip.
//!
//! Column names and order come from the [`TractAttributes`] field order;
//! floats are written with full round-trip precision so re-reading the
//! table reproduces identical scores and bins.

use std::io::{Read, Write};
use std::path::Path;

use heat_vuln_tract_models::TractAttributes;

use crate::ExportError;

/// Writes the attribute table to a CSV file, creating parent directories
/// as needed.
///
/// # Errors
///
/// * If the file cannot be created or a row fails to serialize.
pub fn write_attribute_table(path: &Path, rows: &[TractAttributes]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_rows(file, rows)?;
    log::info!("Wrote {} attribute rows to {}", rows.len(), path.display());
    Ok(())
}

/// Reads an attribute table previously written by
/// [`write_attribute_table`].
///
/// # Errors
///
/// * If the file cannot be opened or a row fails to parse.
pub fn read_attribute_table(path: &Path) -> Result<Vec<TractAttributes>, ExportError> {
    let file = std::fs::File::open(path)?;
    read_rows(file)
}

fn write_rows<W: Write>(writer: W, rows: &[TractAttributes]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn read_rows<R: Read>(reader: R) -> Result<Vec<TractAttributes>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
