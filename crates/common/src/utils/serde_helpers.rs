//! Serde helpers for lenient text input.

use serde::{Deserialize, Deserializer};

/// Deserialize a string that treats `null` as empty.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
