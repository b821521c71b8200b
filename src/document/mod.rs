//! Document model: JSON → Rust types, operation separation and value coercion.

pub mod fragments;
pub mod types;
pub mod values;

pub use fragments::FragmentGraph;
pub use types::*;
pub use values::{coerce_variable_values, value_from_ast, VariableValues};

use crate::error::ModelError;

/// Deserialize a document JSON string into a `Document`.
pub fn parse_document(json: &str) -> Result<Document, ModelError> {
    serde_json::from_str::<Document>(json).map_err(ModelError::Document)
}

impl Document {
    pub fn from_json(json: &str) -> Result<Document, ModelError> {
        parse_document(json)
    }
}
