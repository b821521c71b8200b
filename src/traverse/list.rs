//! List walk: one index segment per element of an input-object list.

use serde_json::Value;

use super::context::TraversalContext;
use super::input::walk_input_object;
use crate::path::Path;
use crate::schema::TypeRef;

/// Descend into each element of `value` when `item_ty` is an input object.
///
/// Scalar and enum elements carry no rules of their own. Nested lists are not
/// descended either.
pub fn walk_list<'s>(
    ctx: &mut TraversalContext<'s, '_>,
    item_ty: &TypeRef,
    value: &Value,
    parent: &Path,
) {
    let Some(items) = value.as_array() else {
        return;
    };
    let Some(input) = ctx.schema().input_object_of(item_ty.strip_non_null()) else {
        return;
    };

    for (idx, element) in items.iter().enumerate() {
        walk_input_object(ctx, input, element, &parent.index(idx));
    }
}
