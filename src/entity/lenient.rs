//! Field decoders for stored records that older clients wrote with `null`
//! (or nothing at all) where a value belongs.
//!
//! Each one pairs with `#[serde(default)]` on the field, so a missing key and
//! a `null` decode the same way.

use serde::{Deserialize, Deserializer};

/// `null` decodes as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A whole percentage from any JSON number; `null` is 0.
pub fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.filter(|p| p.is_finite()).map_or(0, |p| p.round() as i32))
}

pub fn category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

pub fn currency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_currency))
}

pub fn default_category() -> String {
    "Other".to_string()
}

pub fn default_currency() -> String {
    "USD".to_string()
}
