//! Ordered, uniquely-named `{name, value}` lists used for labels and annotations.
//!
//! Both serialize as JSON arrays of objects. Order is kept as inserted;
//! uniqueness of names is enforced on insertion and on deserialization.

use crate::types::AcIdentifier;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("duplicate {kind} name: {name}")]
    Duplicate { kind: &'static str, name: String },
}

/// A single named value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: AcIdentifier,
    pub value: String,
}

impl NameValue {
    pub fn new(name: AcIdentifier, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

macro_rules! name_value_list {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name(Vec<NameValue>);

        impl $name {
            pub fn new() -> Self {
                Self(Vec::new())
            }

            /// Value stored under `name`, if any.
            pub fn get(&self, name: &str) -> Option<&str> {
                self.0
                    .iter()
                    .find(|e| e.name.as_str() == name)
                    .map(|e| e.value.as_str())
            }

            pub fn contains(&self, name: &str) -> bool {
                self.get(name).is_some()
            }

            /// Overwrite the value for `name`, or append it when absent.
            pub fn set(&mut self, name: AcIdentifier, value: impl Into<String>) {
                let value = value.into();
                match self.0.iter_mut().find(|e| e.name == name) {
                    Some(existing) => existing.value = value,
                    None => self.0.push(NameValue::new(name, value)),
                }
            }

            /// Append a new entry, rejecting a name that is already present.
            pub fn push(
                &mut self,
                name: AcIdentifier,
                value: impl Into<String>,
            ) -> Result<(), LabelError> {
                if self.contains(&name) {
                    return Err(LabelError::Duplicate {
                        kind: $kind,
                        name: name.into_inner(),
                    });
                }
                self.0.push(NameValue::new(name, value));
                Ok(())
            }

            pub fn iter(&self) -> std::slice::Iter<'_, NameValue> {
                self.0.iter()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Build from entries, failing on the first duplicate name.
            pub fn from_entries(
                entries: impl IntoIterator<Item = NameValue>,
            ) -> Result<Self, LabelError> {
                let mut out = Self::new();
                for entry in entries {
                    out.push(entry.name, entry.value)?;
                }
                Ok(out)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let entries = Vec::<NameValue>::deserialize(deserializer)?;
                Self::from_entries(entries).map_err(serde::de::Error::custom)
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a NameValue;
            type IntoIter = std::slice::Iter<'a, NameValue>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

name_value_list!(
    /// Descriptive tags such as `os`, `arch` and `version`.
    Labels,
    "label"
);

name_value_list!(
    /// Free-form metadata such as `build-date` or `authors`.
    Annotations,
    "annotation"
);
