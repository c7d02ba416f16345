//! Serde helpers for the remote service's JSON quirks.

use serde::{Deserialize, Deserializer};

/// Deserialize `null` (or a missing field, with `#[serde(default)]`) as the
/// type's default value.
///
/// The analytics endpoint reports SQL aggregates as `null` when no rows
/// matched, and nullable text columns come through the same way.
///
/// # Errors
///
/// Returns the underlying deserializer error when the value is present but
/// has the wrong shape.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
