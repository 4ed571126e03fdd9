//! Forgiving field decoders for model-produced JSON.
//!
//! Extraction and turn replies come from an LLM, which routinely writes
//! `null` or `""` for fields it has nothing to say about. These decoders read
//! such values as "unset" instead of failing the whole document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::types::ItemStatus;

/// `null` reads as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Case-insensitive status; empty, `null` or unknown labels read as observed.
pub(crate) fn item_status<'de, D>(deserializer: D) -> Result<ItemStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.trim().to_lowercase().parse().unwrap_or_default())
}

/// `YYYY-MM-DD`; blank or malformed dates read as unset.
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
}

/// RFC 3339 timestamp normalized to UTC; blank or malformed values read as unset.
pub(crate) fn optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc)))
}
