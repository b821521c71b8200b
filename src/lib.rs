//! Declarative validation rules for GraphQL-style schemas.
//!
//! Rules are declared on schema elements, bound once into the schema's
//! extensions, discovered per request by walking the operation against the
//! bound schema, and executed once per distinct rule instance.

pub mod bind;
pub mod boundary;
pub mod config;
pub mod document;
pub mod error;
pub mod path;
pub mod redact;
pub mod rules;
pub mod schema;
pub mod traverse;
pub mod validate;

pub use bind::bind_schema;
pub use boundary::{Classification, RequestValidation, classify, warnings_extension};
pub use config::{BindOptions, ValidationOptions};
pub use error::{
    AggregateUserInputFailure, ModelError, RequestFailure, RuleError, ValidationDirectiveError,
    ValidationError,
};
pub use path::{Path, PathKey, add_path};
pub use redact::redact_resolved_selections;
pub use rules::{
    ExecutionContext, RuleCatalog, RuleDeclaration, RuleInstance, RuleOutcome, ValidationRule,
};
pub use validate::validate;
