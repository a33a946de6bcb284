use super::record::decode;
use crate::io::compression::open_reader;
use crate::io::error::Error;
use crate::model::record::DistanceRecord;
use std::io::BufRead;
use std::path::Path;

const FORMAT: &str = "interactions";

/// Reads encoded records from a stream. Blank lines are ignored.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the offending line number for malformed records.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<DistanceRecord>, Error> {
    let mut records = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::from_io(e, None))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = decode(&line)
            .map_err(|details| Error::parse(FORMAT, None, line_idx + 1, details))?;
        records.push(record);
    }

    Ok(records)
}

/// Reads a plain or gzip-compressed interactions file.
pub fn open(path: &Path) -> Result<Vec<DistanceRecord>, Error> {
    let reader = open_reader(path)?;
    read(reader).map_err(|e| e.with_path(path))
}
