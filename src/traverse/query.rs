//! Operation walk: fields, arguments and fragments.
//!
//! Output-field paths are keyed by field name (not alias) and qualified by the
//! enclosing type. Argument segments are flagged as input. Fragments push a
//! type frame but never add a path segment.

use super::context::TraversalContext;
use super::input::walk_input_object;
use super::list::walk_list;
use crate::document::{
    coerce_variable_values, value_from_ast, ArgumentNode, FieldNode, OperationDefinition,
    OperationKind, Selection, VariableValues,
};
use crate::error::ValidationError;
use crate::path::Path;
use crate::schema::{FieldDefinition, Schema, TypeDefinition};

/// Walk every operation, or only the one named `operation_name`.
pub fn walk_document(
    ctx: &mut TraversalContext<'_, '_>,
    raw_variables: Option<&VariableValues>,
    operation_name: Option<&str>,
) -> Result<(), ValidationError> {
    let document = ctx.document();
    for operation in document.operations() {
        if let Some(name) = operation_name {
            if operation.name.as_deref() != Some(name) {
                continue;
            }
        }
        walk_operation(ctx, operation, raw_variables)?;
    }
    Ok(())
}

pub fn walk_operation<'s>(
    ctx: &mut TraversalContext<'s, '_>,
    operation: &'s OperationDefinition,
    raw_variables: Option<&VariableValues>,
) -> Result<(), ValidationError> {
    let root = root_type(ctx.schema(), operation.operation)
        .ok_or(ValidationError::UnsupportedOperationKind(operation.operation))?;

    let variables =
        coerce_variable_values(ctx.schema(), &operation.variable_definitions, raw_variables);
    ctx.set_variables(variables);

    let before = ctx.discoveries();
    ctx.push_type(Some(root));
    walk_selections(ctx, &operation.selection_set, None);
    ctx.pop_type();

    tracing::debug!(
        target: "directive_validation::traverse",
        operation = operation.name.as_deref().unwrap_or("<anonymous>"),
        kind = %operation.operation,
        discovered = ctx.discoveries() - before,
        "operation walked"
    );
    Ok(())
}

/// Root type for an operation kind; `None` when the schema does not define one.
pub fn root_type(schema: &Schema, kind: OperationKind) -> Option<&TypeDefinition> {
    let name = match kind {
        OperationKind::Query => schema.query_type.as_deref(),
        OperationKind::Mutation => schema.mutation_type.as_deref(),
        OperationKind::Subscription => schema.subscription_type.as_deref(),
    }?;
    schema.get_type(name)
}

fn walk_selections<'s>(
    ctx: &mut TraversalContext<'s, '_>,
    selections: &'s [Selection],
    parent: Option<&Path>,
) {
    for selection in selections {
        match selection {
            Selection::Field(field) => walk_field(ctx, field, parent),
            Selection::InlineFragment(inline) => {
                let ty = match &inline.type_condition {
                    Some(name) => ctx.schema().get_type(name),
                    None => ctx.current_type(),
                };
                ctx.push_type(ty);
                walk_selections(ctx, &inline.selection_set, parent);
                ctx.pop_type();
            }
            Selection::FragmentSpread(spread) => {
                let Some(fragment) = ctx.document().fragment(&spread.name) else {
                    continue;
                };
                if !ctx.enter_fragment(&fragment.name) {
                    continue;
                }
                ctx.push_type(ctx.schema().get_type(&fragment.type_condition));
                walk_selections(ctx, &fragment.selection_set, parent);
                ctx.pop_type();
                ctx.leave_fragment();
            }
        }
    }
}

fn walk_field<'s>(ctx: &mut TraversalContext<'s, '_>, node: &'s FieldNode, parent: Option<&Path>) {
    let parent_type = ctx.current_type();
    // Unresolvable fields are pruned together with their subtree.
    let Some(def) = parent_type.and_then(|t| t.field(&node.name)) else {
        return;
    };
    let typename = parent_type.map(TypeDefinition::name);
    let path = match parent {
        Some(prev) => prev.field(&node.name, typename),
        None => Path::root(node.name.as_str(), typename),
    };

    ctx.report(def.rules(ctx.rule_path()), &path);

    for argument in &node.arguments {
        walk_argument(ctx, def, argument, &path);
    }

    ctx.push_type(ctx.schema().get_type(def.ty.named_type()));
    walk_selections(ctx, &node.selection_set, Some(&path));
    ctx.pop_type();
}

fn walk_argument<'s>(
    ctx: &mut TraversalContext<'s, '_>,
    field: &'s FieldDefinition,
    node: &ArgumentNode,
    field_path: &Path,
) {
    let Some(def) = field.argument(&node.name) else {
        return;
    };
    let path = field_path.input(&node.name, Some(def.ty.named_type()));
    ctx.report(def.rules(ctx.rule_path()), &path);

    let Some(value) = value_from_ast(&node.value, &def.ty, ctx.schema(), ctx.variables()) else {
        return;
    };
    let value_ty = def.ty.strip_non_null();
    if let Some(input) = ctx.schema().input_object_of(value_ty) {
        if !value.is_null() {
            walk_input_object(ctx, input, &value, &path);
        }
    } else if let Some(item_ty) = value_ty.list_item() {
        walk_list(ctx, item_ty, &value, &path);
    }
}
