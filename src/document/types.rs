//! Owned document model: operations, fragments, selections and literal values.
//!
//! This is the serde target for an already-parsed query document. No GraphQL
//! text is read or written here.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::TypeRef;

// =============================================================================
// TOP-LEVEL DOCUMENT
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: OperationDefinition) -> Self {
        self.definitions.push(Definition::Operation(operation));
        self
    }

    pub fn with_fragment(mut self, fragment: FragmentDefinition) -> Self {
        self.definitions.push(Definition::Fragment(fragment));
        self
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Fragment(frag) => Some(frag),
            Definition::Operation(_) => None,
        })
    }

    pub fn operation(&self, name: &str) -> Option<&OperationDefinition> {
        self.operations().find(|op| op.name.as_deref() == Some(name))
    }

    pub fn fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinition {
    pub operation: OperationKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub variable_definitions: Vec<VariableDefinition>,
    #[serde(default)]
    pub selection_set: Vec<Selection>,
}

impl OperationDefinition {
    pub fn new(operation: OperationKind) -> Self {
        OperationDefinition {
            operation,
            name: None,
            variable_definitions: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_variable(mut self, variable: VariableDefinition) -> Self {
        self.variable_definitions.push(variable);
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub default_value: Option<ValueNode>,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        VariableDefinition {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: ValueNode) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentDefinition {
    pub name: String,
    pub type_condition: String,
    #[serde(default)]
    pub selection_set: Vec<Selection>,
}

impl FragmentDefinition {
    pub fn new(name: impl Into<String>, type_condition: impl Into<String>) -> Self {
        FragmentDefinition {
            name: name.into(),
            type_condition: type_condition.into(),
            selection_set: Vec::new(),
        }
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }
}

// =============================================================================
// SELECTIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Selection {
    Field(FieldNode),
    InlineFragment(InlineFragment),
    FragmentSpread(FragmentSpread),
}

impl Selection {
    pub fn as_field(&self) -> Option<&FieldNode> {
        match self {
            Selection::Field(field) => Some(field),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    #[serde(default)]
    pub alias: Option<String>,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentNode>,
    #[serde(default)]
    pub selection_set: Vec<Selection>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>) -> Self {
        FieldNode {
            alias: None,
            name: name.into(),
            arguments: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: ValueNode) -> Self {
        self.arguments.push(ArgumentNode {
            name: name.into(),
            value,
        });
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }

    /// The key this field's result appears under.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl From<FieldNode> for Selection {
    fn from(field: FieldNode) -> Self {
        Selection::Field(field)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentNode {
    pub name: String,
    pub value: ValueNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragment {
    #[serde(default)]
    pub type_condition: Option<String>,
    #[serde(default)]
    pub selection_set: Vec<Selection>,
}

impl InlineFragment {
    pub fn on(type_condition: impl Into<String>) -> Self {
        InlineFragment {
            type_condition: Some(type_condition.into()),
            selection_set: Vec::new(),
        }
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }
}

impl From<InlineFragment> for Selection {
    fn from(fragment: InlineFragment) -> Self {
        Selection::InlineFragment(fragment)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentSpread {
    pub name: String,
}

impl From<FragmentSpread> for Selection {
    fn from(spread: FragmentSpread) -> Self {
        Selection::FragmentSpread(spread)
    }
}

// =============================================================================
// LITERAL VALUES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueNode {
    Variable(String),
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<ValueNode>),
    Object(BTreeMap<String, ValueNode>),
}

impl ValueNode {
    pub fn variable(name: impl Into<String>) -> Self {
        ValueNode::Variable(name.into())
    }

    /// Literal node for a plain JSON value. Strings become string literals,
    /// never enums or variables.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ValueNode::Null,
            Value::Bool(b) => ValueNode::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ValueNode::Int(i),
                None => ValueNode::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => ValueNode::String(s.clone()),
            Value::Array(items) => ValueNode::List(items.iter().map(ValueNode::from_json).collect()),
            Value::Object(map) => ValueNode::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), ValueNode::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for ValueNode {
    fn from(value: Value) -> Self {
        ValueNode::from_json(&value)
    }
}
