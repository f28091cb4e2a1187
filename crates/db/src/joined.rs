//! Normalization of relation payloads that may arrive as one row or many.
//!
//! JSON relation columns written by older clients hold either a single
//! object or an array of objects. Readers decode through [`Joined`] once and
//! only ever see a `Vec<T>` afterwards.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;

/// A related payload holding either one row or a list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Joined<T> {
    /// Array form.
    Many(Vec<T>),
    /// Single-object form.
    One(T),
}

impl<T> Joined<T> {
    /// Flatten into a list, preserving order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

impl<T: DeserializeOwned> Joined<T> {
    /// Decode a JSON column into a list. `null` decodes to an empty list.
    pub fn decode(value: &JsonValue) -> Result<Vec<T>, serde_json::Error> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value::<Self>(value.clone())?.into_vec())
    }
}
