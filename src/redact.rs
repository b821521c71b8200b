//! Response field redaction.
//!
//! While a field resolves, drop those of its child selections that a
//! field-scoped warning already names, so the executor never resolves them.

use crate::document::Selection;
use crate::error::ValidationDirectiveError;
use crate::path::{Path, PathKey};

/// Remove child selections of the field at `current` that match a warning path.
///
/// `current` is the live response path; its list indices are ignored. Only
/// field selections are candidates for removal.
pub fn redact_resolved_selections(
    current: &Path,
    selections: &mut Vec<Selection>,
    warnings: &[ValidationDirectiveError],
) {
    if warnings.is_empty() {
        return;
    }

    let live = current.string_keys();
    let candidates: Vec<Vec<PathKey>> = warnings
        .iter()
        .flat_map(|w| &w.field_paths)
        .map(Path::to_vec)
        .filter(|keys| keys.len() > live.len() && starts_with(keys, &live))
        .collect();
    if candidates.is_empty() {
        return;
    }

    let before = selections.len();
    selections.retain(|selection| {
        let Some(field) = selection.as_field() else {
            return true;
        };
        !candidates.iter().any(|keys| is_child(keys, &live, &field.name))
    });

    if selections.len() != before {
        tracing::debug!(
            target: "directive_validation::redact",
            path = %current,
            removed = before - selections.len(),
            "redacted selections"
        );
    }
}

fn starts_with(keys: &[PathKey], prefix: &[&str]) -> bool {
    keys.iter()
        .zip(prefix)
        .all(|(key, name)| key.as_name() == Some(*name))
}

/// `keys` is exactly `parent` followed by `child`.
fn is_child(keys: &[PathKey], parent: &[&str], child: &str) -> bool {
    keys.len() == parent.len() + 1
        && starts_with(keys, parent)
        && keys.last().and_then(PathKey::as_name) == Some(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FieldNode, InlineFragment};

    fn names(selections: &[Selection]) -> Vec<&str> {
        selections
            .iter()
            .filter_map(Selection::as_field)
            .map(|f| f.name.as_str())
            .collect()
    }

    fn warning(path: Path) -> ValidationDirectiveError {
        ValidationDirectiveError::new("invalid", vec![path], false)
    }

    #[test]
    fn removes_only_the_warned_child() {
        let mut selections: Vec<Selection> = vec![
            FieldNode::new("name").into(),
            FieldNode::new("email").into(),
            FieldNode::new("age").into(),
        ];
        let warnings = vec![warning(Path::root("user", None).field("email", None))];

        redact_resolved_selections(&Path::root("user", None), &mut selections, &warnings);
        assert_eq!(names(&selections), vec!["name", "age"]);
    }

    #[test]
    fn live_list_indices_are_ignored() {
        let mut selections: Vec<Selection> = vec![FieldNode::new("email").into()];
        let warnings = vec![warning(Path::root("users", None).field("email", None))];
        let live = Path::root("users", None).index(3);

        redact_resolved_selections(&live, &mut selections, &warnings);
        assert!(selections.is_empty());
    }

    #[test]
    fn deeper_and_equal_paths_do_not_match() {
        let mut selections: Vec<Selection> = vec![
            FieldNode::new("profile").into(),
            InlineFragment::on("User").with_selection(FieldNode::new("email")).into(),
        ];
        let user = Path::root("user", None);
        let warnings = vec![
            warning(user.clone()),
            warning(user.field("profile", None).field("bio", None)),
        ];

        redact_resolved_selections(&user, &mut selections, &warnings);
        assert_eq!(selections.len(), 2);
    }
}
