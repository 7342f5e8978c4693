//! Decoding record sets used to populate the indexes at startup.
//!
//! A record source is a JSON array of objects. Decoding is plain serde; no
//! schema checks happen beyond what the record type's `Deserialize` does.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Decode a JSON array of records from `reader`.
pub fn records_from_reader<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let records: Vec<T> = serde_json::from_reader(reader)?;
    tracing::info!(count = records.len(), source = "reader", "loaded records");
    Ok(records)
}

/// Decode a JSON array of records from a string.
pub fn records_from_str<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let records: Vec<T> = serde_json::from_str(json)?;
    tracing::info!(count = records.len(), source = "str", "loaded records");
    Ok(records)
}

/// Read and decode a JSON array of records from the file at `path`.
pub fn records_from_path<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)?;
    let records: Vec<T> = serde_json::from_reader(BufReader::new(file))?;
    tracing::info!(count = records.len(), source = %path.display(), "loaded records");
    Ok(records)
}
