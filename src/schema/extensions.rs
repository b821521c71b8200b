//! Per-element extension storage.
//!
//! Extensions are a keyed tree. Leaves are either host data (JSON) or a rule
//! list placed there by the binder.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::rules::{RuleDeclaration, RuleInstance};

#[derive(Debug, Clone)]
pub enum ExtensionValue {
    Data(Value),
    Rules(Vec<RuleInstance>),
    Nested(Extensions),
}

#[derive(Debug, Clone, Default)]
pub struct Extensions {
    entries: BTreeMap<String, ExtensionValue>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ExtensionValue> {
        self.entries.get(key)
    }

    pub fn insert_data(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), ExtensionValue::Data(value));
    }

    /// Rule list stored at `path`, if any.
    pub fn rules_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&[RuleInstance]> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for key in parents {
            match current.entries.get(key.as_ref())? {
                ExtensionValue::Nested(nested) => current = nested,
                _ => return None,
            }
        }
        match current.entries.get(last.as_ref())? {
            ExtensionValue::Rules(rules) => Some(rules),
            _ => None,
        }
    }

    /// Store `rules` at `path`, creating intermediate levels. Host data objects
    /// met on the way become nested levels, keeping their entries.
    pub fn set_rules<S: AsRef<str>>(&mut self, path: &[S], rules: Vec<RuleInstance>) {
        match path {
            [] => {}
            [last] => {
                self.entries
                    .insert(last.as_ref().to_string(), ExtensionValue::Rules(rules));
            }
            [first, rest @ ..] => {
                let key = first.as_ref().to_string();
                let mut nested = match self.entries.remove(&key) {
                    Some(ExtensionValue::Nested(nested)) => nested,
                    Some(ExtensionValue::Data(Value::Object(map))) => Extensions::from_map(map),
                    _ => Extensions::default(),
                };
                nested.set_rules(rest, rules);
                self.entries.insert(key, ExtensionValue::Nested(nested));
            }
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        Extensions {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, ExtensionValue::Data(v)))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Extensions::from_map(Map::deserialize(deserializer)?))
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            match value {
                ExtensionValue::Data(data) => map.serialize_entry(key, data)?,
                ExtensionValue::Nested(nested) => map.serialize_entry(key, nested)?,
                ExtensionValue::Rules(rules) => {
                    let declarations: Vec<&RuleDeclaration> =
                        rules.iter().map(RuleInstance::declaration).collect();
                    map.serialize_entry(key, &declarations)?
                }
            }
        }
        map.end()
    }
}
