//! CSV files on either side of the cleaning pass.
//!
//! The raw file is the hand-off between harvesting and cleaning. Both files
//! always start with their header row, even when no records follow.

use crate::error::{MalformedRecordError, Result};
use crate::models::{CANONICAL_FIELDS, CanonicalCourseRecord, RAW_FIELDS, RawCourseRecord};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

fn write_records<W, T>(writer: W, header: &[&str], records: &[T]) -> Result<()>
where
    W: Write,
    T: Serialize,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(header)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_raw<W: Write>(writer: W, records: &[RawCourseRecord]) -> Result<()> {
    write_records(writer, &RAW_FIELDS, records)
}

pub fn write_cleaned<W: Write>(writer: W, records: &[CanonicalCourseRecord]) -> Result<()> {
    write_records(writer, &CANONICAL_FIELDS, records)
}

/// Reads a raw CSV by column name.
///
/// Each data row becomes its own `Result`, so one bad row does not affect the
/// others. A row whose cell count differs from the header's is an `Arity`
/// error; its cells cannot be matched to columns. A raw column absent from the
/// header is a `MissingField` on every row. Column order and extra header
/// columns do not matter.
pub fn read_raw<R: Read>(reader: R) -> Result<Vec<Result<RawCourseRecord, MalformedRecordError>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let positions: Vec<Option<usize>> = RAW_FIELDS
        .iter()
        .map(|field| headers.iter().position(|h| h.trim() == *field))
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.len() != headers.len() {
            rows.push(Err(MalformedRecordError::Arity {
                expected: headers.len(),
                found: record.len(),
            }));
            continue;
        }

        let cells: Result<Vec<String>, MalformedRecordError> = RAW_FIELDS
            .iter()
            .zip(&positions)
            .map(|(field, position)| {
                position
                    .and_then(|i| record.get(i))
                    .map(str::to_string)
                    .ok_or(MalformedRecordError::MissingField(*field))
            })
            .collect();
        rows.push(cells.and_then(RawCourseRecord::from_cells));
    }

    Ok(rows)
}

pub fn read_cleaned<R: Read>(reader: R) -> Result<Vec<CanonicalCourseRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let records = csv_reader
        .deserialize()
        .collect::<std::result::Result<Vec<CanonicalCourseRecord>, csv::Error>>()?;
    Ok(records)
}

pub fn save_raw(path: impl AsRef<Path>, records: &[RawCourseRecord]) -> Result<()> {
    write_raw(File::create(path)?, records)
}

pub fn load_raw(path: impl AsRef<Path>) -> Result<Vec<Result<RawCourseRecord, MalformedRecordError>>> {
    read_raw(File::open(path)?)
}

pub fn save_cleaned(path: impl AsRef<Path>, records: &[CanonicalCourseRecord]) -> Result<()> {
    write_cleaned(File::create(path)?, records)
}

pub fn load_cleaned(path: impl AsRef<Path>) -> Result<Vec<CanonicalCourseRecord>> {
    read_cleaned(File::open(path)?)
}
