//! Literal-to-value conversion and variable coercion.
//!
//! Both are lenient: a value that does not fit its declared type is passed
//! through as-is rather than reported. Ordinary document validation owns
//! those failures; here we only need the concrete value rules look at.

use serde_json::{Map, Value};

use super::types::{ValueNode, VariableDefinition};
use crate::schema::{Schema, TypeRef};

pub type VariableValues = Map<String, Value>;

/// Resolve a literal (or variable reference) against its declared type.
///
/// Returns `None` when the value is undefined: a variable that was neither
/// supplied nor defaulted.
pub fn value_from_ast(
    node: &ValueNode,
    ty: &TypeRef,
    schema: &Schema,
    variables: &VariableValues,
) -> Option<Value> {
    match (node, ty) {
        (ValueNode::Variable(name), _) => variables.get(name).cloned(),
        (ValueNode::Null, _) => Some(Value::Null),
        (_, TypeRef::NonNull(inner)) => value_from_ast(node, inner, schema, variables),
        (ValueNode::List(items), TypeRef::List(item_ty)) => Some(Value::Array(
            items
                .iter()
                .map(|item| value_from_ast(item, item_ty, schema, variables).unwrap_or(Value::Null))
                .collect(),
        )),
        (_, TypeRef::List(item_ty)) => {
            value_from_ast(node, item_ty, schema, variables).map(|v| Value::Array(vec![v]))
        }
        (ValueNode::Object(fields), TypeRef::Named(name)) => match schema.input_object(name) {
            Some(input) => {
                let mut out = Map::new();
                for field in &input.fields {
                    let value = fields
                        .get(&field.name)
                        .and_then(|v| value_from_ast(v, &field.ty, schema, variables))
                        .or_else(|| field.default_value.clone());
                    if let Some(value) = value {
                        out.insert(field.name.clone(), value);
                    }
                }
                Some(Value::Object(out))
            }
            None => literal_to_json(node, variables),
        },
        _ => literal_to_json(node, variables),
    }
}

/// Convert a literal without type information.
pub fn literal_to_json(node: &ValueNode, variables: &VariableValues) -> Option<Value> {
    let value = match node {
        ValueNode::Variable(name) => return variables.get(name).cloned(),
        ValueNode::Null => Value::Null,
        ValueNode::Int(i) => Value::from(*i),
        ValueNode::Float(f) => Value::from(*f),
        ValueNode::String(s) | ValueNode::Enum(s) => Value::String(s.clone()),
        ValueNode::Boolean(b) => Value::Bool(*b),
        ValueNode::List(items) => Value::Array(
            items
                .iter()
                .map(|item| literal_to_json(item, variables).unwrap_or(Value::Null))
                .collect(),
        ),
        ValueNode::Object(fields) => Value::Object(
            fields
                .iter()
                .filter_map(|(k, v)| literal_to_json(v, variables).map(|v| (k.clone(), v)))
                .collect(),
        ),
    };
    Some(value)
}

/// Coerce caller-supplied raw variables against the operation's declarations.
///
/// Supplied values are coerced against their type; missing ones fall back to
/// the declared default; anything else stays absent.
pub fn coerce_variable_values(
    schema: &Schema,
    definitions: &[VariableDefinition],
    raw: Option<&VariableValues>,
) -> VariableValues {
    let empty = VariableValues::new();
    let mut coerced = VariableValues::new();

    for def in definitions {
        let supplied = raw.and_then(|raw| raw.get(&def.name));
        let value = match supplied {
            Some(value) => Some(coerce_input_value(value, &def.ty, schema)),
            None => def
                .default_value
                .as_ref()
                .and_then(|d| value_from_ast(d, &def.ty, schema, &empty)),
        };
        if let Some(value) = value {
            coerced.insert(def.name.clone(), value);
        }
    }

    coerced
}

/// Coerce a raw JSON input value against `ty`: single values supplied for a
/// list become one-element lists; input objects keep declared fields only and
/// get their defaults filled in.
pub fn coerce_input_value(value: &Value, ty: &TypeRef, schema: &Schema) -> Value {
    match (value, ty) {
        (Value::Null, _) => Value::Null,
        (_, TypeRef::NonNull(inner)) => coerce_input_value(value, inner, schema),
        (Value::Array(items), TypeRef::List(item_ty)) => Value::Array(
            items
                .iter()
                .map(|item| coerce_input_value(item, item_ty, schema))
                .collect(),
        ),
        (_, TypeRef::List(item_ty)) => Value::Array(vec![coerce_input_value(value, item_ty, schema)]),
        (Value::Object(fields), TypeRef::Named(name)) => match schema.input_object(name) {
            Some(input) => {
                let mut out = Map::new();
                for field in &input.fields {
                    let value = match fields.get(&field.name) {
                        Some(v) => Some(coerce_input_value(v, &field.ty, schema)),
                        None => field.default_value.clone(),
                    };
                    if let Some(value) = value {
                        out.insert(field.name.clone(), value);
                    }
                }
                Value::Object(out)
            }
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InputObjectType, InputValueDefinition};
    use serde_json::json;

    fn ty(notation: &str) -> TypeRef {
        TypeRef::parse(notation).unwrap()
    }

    fn schema() -> Schema {
        Schema::new().with_type(
            InputObjectType::new("UserInput")
                .with_field(InputValueDefinition::new("email", ty("String!")))
                .with_field(InputValueDefinition::new("role", ty("String")).with_default(json!("member")))
                .with_field(InputValueDefinition::new("tags", ty("[String!]"))),
        )
    }

    #[test]
    fn object_literal_gets_defaults_and_resolves_variables() {
        let node = ValueNode::from_json(&json!({ "tags": "solo" }));
        let ValueNode::Object(mut fields) = node else { unreachable!() };
        fields.insert("email".into(), ValueNode::variable("mail"));
        let mut vars = VariableValues::new();
        vars.insert("mail".into(), json!("a@b.c"));

        let value = value_from_ast(&ValueNode::Object(fields), &ty("UserInput!"), &schema(), &vars);
        assert_eq!(
            value,
            Some(json!({ "email": "a@b.c", "role": "member", "tags": ["solo"] }))
        );
    }

    #[test]
    fn missing_variable_is_undefined() {
        let value = value_from_ast(
            &ValueNode::variable("nope"),
            &ty("UserInput"),
            &schema(),
            &VariableValues::new(),
        );
        assert_eq!(value, None);
    }

    #[test]
    fn explicit_null_is_defined() {
        let value = value_from_ast(&ValueNode::Null, &ty("UserInput"), &schema(), &VariableValues::new());
        assert_eq!(value, Some(Value::Null));
    }

    #[test]
    fn variables_are_coerced_and_defaulted() {
        let defs = vec![
            VariableDefinition::new("input", ty("[UserInput!]!")),
            VariableDefinition::new("limit", ty("Int")).with_default(ValueNode::Int(10)),
            VariableDefinition::new("unused", ty("String")),
        ];
        let raw = json!({ "input": { "email": "x@y.z", "extra": true } });
        let coerced = coerce_variable_values(&schema(), &defs, raw.as_object());

        assert_eq!(
            Value::Object(coerced),
            json!({
                "input": [{ "email": "x@y.z", "role": "member" }],
                "limit": 10
            })
        );
    }
}
