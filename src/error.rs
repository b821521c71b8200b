//! Error types shared across binding, traversal, execution and the request boundary.

use std::sync::Arc;

use crate::document::OperationKind;
use crate::path::Path;

/// Extension code carried by every rule failure.
pub const CONSTRAINT_VALIDATION_CODE: &str = "ERR_GRAPHQL_CONSTRAINT_VALIDATION";
/// Code of the combined failure raised when several abort-worthy errors apply.
pub const BAD_USER_INPUT_CODE: &str = "BAD_USER_INPUT";

/// Failure to decode a schema or document model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("[S001] Failed to parse schema JSON: {0}")]
    Schema(#[source] serde_json::Error),
    #[error("[D001] Failed to parse document JSON: {0}")]
    Document(#[source] serde_json::Error),
}

impl ModelError {
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Schema(_) => "S001",
            ModelError::Document(_) => "D001",
        }
    }
}

/// Failure to instantiate a rule from its declaration.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("[R001] ValidationRule {name} has not been registered")]
    NotRegistered { name: String },
    #[error("[R002] Failed to canonicalize declaration of rule {name}: {source}")]
    Canonicalization {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RuleError {
    pub fn code(&self) -> &'static str {
        match self {
            RuleError::NotRegistered { .. } => "R001",
            RuleError::Canonicalization { .. } => "R002",
        }
    }
}

/// Traversal setup failure. These escape `validate` instead of becoming data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("[Q001] Query validation could not be performed for operation of type {0}")]
    UnsupportedOperationKind(OperationKind),
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::UnsupportedOperationKind(_) => "Q001",
        }
    }
}

/// A failed rule, tagged with every path the rule was invoked at.
#[derive(Debug, Clone)]
pub struct ValidationDirectiveError {
    pub message: String,
    pub field_paths: Vec<Path>,
    /// Set when the rule itself faulted instead of declaring a failure.
    pub throwable: bool,
    pub code: &'static str,
    cause: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ValidationDirectiveError {
    pub fn new(message: impl Into<String>, field_paths: Vec<Path>, throwable: bool) -> Self {
        ValidationDirectiveError {
            message: message.into(),
            field_paths,
            throwable,
            code: CONSTRAINT_VALIDATION_CODE,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: anyhow::Error) -> Self {
        let boxed: Box<dyn std::error::Error + Send + Sync> = cause.into();
        self.cause = Some(Arc::from(boxed));
        self
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Faulted rules, and failures on a root field or inside its arguments,
    /// reject the whole request.
    pub fn is_abort_worthy(&self) -> bool {
        self.throwable || self.field_paths.iter().any(Path::is_top_level)
    }

    /// `message (a.b, c.d)`, as used in the combined failure message.
    pub fn annotated_message(&self) -> String {
        let fields: Vec<String> = self.field_paths.iter().map(Path::dotted).collect();
        format!("{} ({})", self.message, fields.join(", "))
    }
}

impl std::fmt::Display for ValidationDirectiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationDirectiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Several abort-worthy errors folded into one user-input failure.
///
/// The message names the abort-worthy errors only; warnings raised by the
/// same request ride along in `warnings`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AggregateUserInputFailure {
    pub message: String,
    pub code: &'static str,
    pub errors: Vec<ValidationDirectiveError>,
    pub warnings: Vec<ValidationDirectiveError>,
}

/// What the request boundary raises when validation rejects a request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestFailure {
    #[error("{error}")]
    Single {
        #[source]
        error: ValidationDirectiveError,
        warnings: Vec<ValidationDirectiveError>,
    },
    #[error(transparent)]
    Aggregate(AggregateUserInputFailure),
    /// The request could not be traversed at all.
    #[error(transparent)]
    Traversal(#[from] ValidationError),
}

impl RequestFailure {
    /// Fail with the abort-worthy errors, carrying the request's `warnings`
    /// along. Hands `warnings` back when there is nothing to raise.
    pub fn raise_abort(
        abort: Vec<ValidationDirectiveError>,
        warnings: Vec<ValidationDirectiveError>,
    ) -> Result<Vec<ValidationDirectiveError>, Self> {
        let abort = match <[ValidationDirectiveError; 1]>::try_from(abort) {
            Ok([error]) => return Err(RequestFailure::Single { error, warnings }),
            Err(abort) => abort,
        };
        if abort.is_empty() {
            return Ok(warnings);
        }
        let message = abort
            .iter()
            .map(ValidationDirectiveError::annotated_message)
            .collect::<Vec<_>>()
            .join("\n");
        Err(RequestFailure::Aggregate(AggregateUserInputFailure {
            message,
            code: BAD_USER_INPUT_CODE,
            errors: abort,
            warnings,
        }))
    }

    pub fn code(&self) -> &'static str {
        match self {
            RequestFailure::Single { error, .. } => error.code,
            RequestFailure::Aggregate(e) => e.code,
            RequestFailure::Traversal(e) => e.code(),
        }
    }

    /// Field-scoped warnings raised alongside the failure.
    pub fn warnings(&self) -> &[ValidationDirectiveError] {
        match self {
            RequestFailure::Single { warnings, .. } => warnings,
            RequestFailure::Aggregate(e) => &e.warnings,
            RequestFailure::Traversal(_) => &[],
        }
    }
}
