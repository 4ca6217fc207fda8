use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ModelSchema;
use crate::domain::FieldValue;

/// Immutable set of field values for one prediction at one instant.
///
/// Serialises as a flat JSON object, which is exactly what the prediction
/// endpoint expects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSnapshot {
    fields: BTreeMap<String, FieldValue>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a copy with `name` set to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns a copy without `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.remove(name);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Stringified value, or empty when absent.
    pub fn display_value(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Union of `self` and `other`; `other` wins on overlapping names.
    pub fn merged_with(&self, other: &InputSnapshot) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(other.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { fields }
    }

    /// Keeps only the fields named in `names`.
    pub fn restricted_to(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(k, _)| names.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Applies the schema's categorical aliases (`"LF"` -> `"Low Fat"` etc.)
    /// and trims surrounding whitespace from text values.
    pub fn normalized(&self, schema: &ModelSchema) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| {
                let value = match (value, schema.field(name)) {
                    (FieldValue::Text(raw), Some(spec)) => {
                        FieldValue::Text(spec.normalize(raw.trim()).to_string())
                    }
                    (FieldValue::Text(raw), None) => FieldValue::Text(raw.trim().to_string()),
                    (other, _) => other.clone(),
                };
                (name.clone(), value)
            })
            .collect();
        Self { fields }
    }
}
