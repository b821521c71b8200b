//! Options for binding and request validation.
//!
//! Both derive `Deserialize` with per-field defaults so a host can embed them
//! in its own configuration.

use serde::{Deserialize, Serialize};

use crate::schema::types::default_extension_path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindOptions {
    /// Extension slot rule lists are stored under, e.g. `["validation", "rules"]`.
    #[serde(default = "default_extension_path")]
    pub extension_path: Vec<String>,
}

impl Default for BindOptions {
    fn default() -> Self {
        BindOptions {
            extension_path: default_extension_path(),
        }
    }
}

impl BindOptions {
    pub fn with_extension_path<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Self {
        BindOptions {
            extension_path: path.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_warnings_key() -> String {
    "validation_warnings".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Response extension key field-scoped warnings are reported under.
    #[serde(default = "default_warnings_key")]
    pub warnings_key: String,
    /// Prune selections that are known to fail validation.
    #[serde(default = "default_true")]
    pub redact_warnings: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            warnings_key: default_warnings_key(),
            redact_warnings: true,
        }
    }
}
