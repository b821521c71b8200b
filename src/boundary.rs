//! Request boundary: decides what a host does with validation results.
//!
//! Abort-worthy errors reject the request. Everything else becomes a
//! field-scoped warning: reported in the response extensions and used to
//! redact the selections it names while the rest of the response resolves.

use serde_json::{Map, Value, json};

use crate::config::ValidationOptions;
use crate::document::{Document, Selection, VariableValues};
use crate::error::{RequestFailure, ValidationDirectiveError};
use crate::path::Path;
use crate::redact::redact_resolved_selections;
use crate::rules::ExecutionContext;
use crate::schema::Schema;
use crate::validate::validate;

#[derive(Debug, Default)]
pub struct Classification {
    pub abort: Vec<ValidationDirectiveError>,
    pub warnings: Vec<ValidationDirectiveError>,
}

/// Split errors into abort-worthy ones and field-scoped warnings.
pub fn classify(errors: Vec<ValidationDirectiveError>) -> Classification {
    let (abort, warnings) = errors
        .into_iter()
        .partition(ValidationDirectiveError::is_abort_worthy);
    Classification { abort, warnings }
}

/// `[{ "message": .., "fields": [[key, ..], ..] }, ..]`
pub fn warnings_extension(warnings: &[ValidationDirectiveError]) -> Value {
    Value::Array(
        warnings
            .iter()
            .map(|w| json!({ "message": w.message, "fields": w.field_paths }))
            .collect(),
    )
}

/// Validation state for one request, kept across its execution.
#[derive(Debug)]
pub struct RequestValidation {
    warnings: Vec<ValidationDirectiveError>,
    options: ValidationOptions,
}

impl RequestValidation {
    /// Validate a request and fail it when any abort-worthy error applies.
    ///
    /// With an `operation_name` the document is first reduced to that
    /// operation and the fragments it uses; an unknown name validates nothing.
    pub async fn run(
        schema: &Schema,
        document: &Document,
        context: &ExecutionContext,
        variables: Option<&VariableValues>,
        operation_name: Option<&str>,
        options: &ValidationOptions,
    ) -> Result<Self, RequestFailure> {
        let separated;
        let query = match operation_name {
            Some(name) => {
                separated = document.separate_operation(name).unwrap_or_default();
                &separated
            }
            None => document,
        };

        let errors = validate(schema, query, context, variables, operation_name, options).await?;
        let Classification { abort, warnings } = classify(errors);

        tracing::debug!(
            target: "directive_validation::boundary",
            aborting = abort.len(),
            warnings = warnings.len(),
            "request classified"
        );

        let warnings = RequestFailure::raise_abort(abort, warnings)?;
        Ok(RequestValidation {
            warnings,
            options: options.clone(),
        })
    }

    pub fn warnings(&self) -> &[ValidationDirectiveError] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ValidationDirectiveError> {
        self.warnings
    }

    /// Call while the field at `path` resolves, before its children do.
    pub fn redact(&self, path: &Path, selections: &mut Vec<Selection>) {
        if self.options.redact_warnings {
            redact_resolved_selections(path, selections, &self.warnings);
        }
    }

    /// Response extensions to merge into the result; empty without warnings.
    pub fn extensions(&self) -> Map<String, Value> {
        response_extensions(&self.warnings, &self.options)
    }
}

impl RequestFailure {
    /// Extensions for the error response, carrying the warnings raised
    /// alongside the failure.
    pub fn extensions(&self, options: &ValidationOptions) -> Map<String, Value> {
        response_extensions(self.warnings(), options)
    }
}

fn response_extensions(
    warnings: &[ValidationDirectiveError],
    options: &ValidationOptions,
) -> Map<String, Value> {
    let mut extensions = Map::new();
    if !warnings.is_empty() {
        extensions.insert(options.warnings_key.clone(), warnings_extension(warnings));
    }
    extensions
}
