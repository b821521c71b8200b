//! Rule discovery: walk an operation against a bound schema.
//!
//! Three cooperating walkers report every static occurrence of a rule
//! together with the path it was found at:
//!
//! - `query`: operations, output fields, arguments and fragments
//! - `input`: input-object values supplied to arguments
//! - `list`: lists of input objects, one index segment per element

pub mod context;
pub mod input;
pub mod list;
pub mod query;

pub use context::{RuleFoundCallback, TraversalContext};
pub use query::root_type;

use crate::document::{Document, VariableValues};
use crate::error::ValidationError;
use crate::path::Path;
use crate::rules::RuleInstance;
use crate::schema::Schema;

/// Walk `document` and report each rule occurrence to `on_rule_found`.
///
/// With an `operation_name` only that operation is walked. Fails when an
/// operation's kind has no root type in the schema.
pub fn traverse(
    schema: &Schema,
    document: &Document,
    variables: Option<&VariableValues>,
    operation_name: Option<&str>,
    on_rule_found: impl FnMut(&RuleInstance, &Path),
) -> Result<(), ValidationError> {
    let mut on_rule_found = on_rule_found;
    let mut ctx = TraversalContext::new(schema, document, &mut on_rule_found);
    query::walk_document(&mut ctx, variables, operation_name)
}
