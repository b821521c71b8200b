//! Input-object walk over a concrete argument value.

use serde_json::Value;

use super::context::TraversalContext;
use super::list::walk_list;
use crate::path::Path;
use crate::schema::InputObjectType;

/// Visit each declared field of `input` that is present in `value`.
///
/// Fields absent from the value are skipped; a present `null` still reports
/// the field's own rules but is not descended into.
pub fn walk_input_object<'s>(
    ctx: &mut TraversalContext<'s, '_>,
    input: &'s InputObjectType,
    value: &Value,
    parent: &Path,
) {
    let Some(fields) = value.as_object() else {
        return;
    };

    for field in &input.fields {
        let Some(field_value) = fields.get(&field.name) else {
            continue;
        };
        let path = parent.input(&field.name, Some(field.ty.named_type()));
        ctx.report(field.rules(ctx.rule_path()), &path);

        let value_ty = field.ty.strip_non_null();
        if let Some(nested) = ctx.schema().input_object_of(value_ty) {
            if !field_value.is_null() {
                walk_input_object(ctx, nested, field_value, &path);
            }
        } else if let Some(item_ty) = value_ty.list_item() {
            walk_list(ctx, item_ty, field_value, &path);
        }
    }
}
