//! Schema model: JSON → Rust types, plus the per-element extension slot.

pub mod extensions;
pub mod types;

pub use extensions::{ExtensionValue, Extensions};
pub use types::*;

use crate::error::ModelError;

/// Deserialize a schema JSON string into a `Schema`.
pub fn parse_schema(json: &str) -> Result<Schema, ModelError> {
    serde_json::from_str::<Schema>(json).map_err(ModelError::Schema)
}

impl Schema {
    pub fn from_json(json: &str) -> Result<Schema, ModelError> {
        parse_schema(json)
    }
}
