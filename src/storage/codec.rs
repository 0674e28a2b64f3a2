//! Entities to and from the string values held by the backing store.
//!
//! Collections are stored as JSON arrays with camelCase field names.
//! Calendar days are written as `YYYY-MM-DD` and timestamps as RFC 3339, so
//! both sort lexically. Decoding restores typed dates; optional dates that were
//! absent stay `None`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn deserialize<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}
