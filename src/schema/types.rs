//! Owned schema model: the type tree rules are declared on.
//!
//! This is the serde target for schema JSON. Type references use GraphQL type
//! notation (`"[UserInput!]!"`), everything else is plain structure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extensions::Extensions;
use crate::rules::{RuleDeclaration, RuleInstance};

/// Where the binder stores rule lists when not told otherwise.
pub const DEFAULT_EXTENSION_PATH: &[&str] = &["validation", "rules"];

pub(crate) fn default_extension_path() -> Vec<String> {
    DEFAULT_EXTENSION_PATH.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// SCHEMA
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub query_type: Option<String>,
    #[serde(default)]
    pub mutation_type: Option<String>,
    #[serde(default)]
    pub subscription_type: Option<String>,
    #[serde(with = "type_list")]
    pub types: BTreeMap<String, TypeDefinition>,
    /// Extension slot the rule lists of this schema live in.
    #[serde(skip, default = "default_extension_path")]
    pub rule_extension_path: Vec<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Schema {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types: BTreeMap::new(),
            rule_extension_path: default_extension_path(),
        }
    }
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_type(mut self, name: impl Into<String>) -> Self {
        self.query_type = Some(name.into());
        self
    }

    pub fn with_mutation_type(mut self, name: impl Into<String>) -> Self {
        self.mutation_type = Some(name.into());
        self
    }

    pub fn with_subscription_type(mut self, name: impl Into<String>) -> Self {
        self.subscription_type = Some(name.into());
        self
    }

    pub fn with_type(mut self, def: impl Into<TypeDefinition>) -> Self {
        let def = def.into();
        self.types.insert(def.name().to_string(), def);
        self
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        self.get_type(name).and_then(TypeDefinition::as_input_object)
    }

    /// Named type of `ty` when it is an input object.
    pub fn input_object_of(&self, ty: &TypeRef) -> Option<&InputObjectType> {
        match ty {
            TypeRef::Named(name) => self.input_object(name),
            _ => None,
        }
    }
}

mod type_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::TypeDefinition;

    pub fn serialize<S: Serializer>(
        types: &BTreeMap<String, TypeDefinition>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(types.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, TypeDefinition>, D::Error> {
        let list = Vec::<TypeDefinition>::deserialize(deserializer)?;
        Ok(list
            .into_iter()
            .map(|def| (def.name().to_string(), def))
            .collect())
    }
}

// =============================================================================
// TYPE DEFINITIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeDefinition {
    Object(ObjectType),
    Interface(ObjectType),
    InputObject(InputObjectType),
    Scalar(ScalarType),
    Enum(EnumType),
    Union(UnionType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Object(t) | TypeDefinition::Interface(t) => &t.name,
            TypeDefinition::InputObject(t) => &t.name,
            TypeDefinition::Scalar(t) => &t.name,
            TypeDefinition::Enum(t) => &t.name,
            TypeDefinition::Union(t) => &t.name,
        }
    }

    /// Output fields, for object and interface types.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        match self {
            TypeDefinition::Object(t) | TypeDefinition::Interface(t) => t.field(name),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeDefinition::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        match self {
            TypeDefinition::InputObject(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectType {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl From<ObjectType> for TypeDefinition {
    fn from(t: ObjectType) -> Self {
        TypeDefinition::Object(t)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputObjectType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<InputValueDefinition>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        InputObjectType {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: InputValueDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&InputValueDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl From<InputObjectType> for TypeDefinition {
    fn from(t: InputObjectType) -> Self {
        TypeDefinition::InputObject(t)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalarType {
    pub name: String,
}

impl From<ScalarType> for TypeDefinition {
    fn from(t: ScalarType) -> Self {
        TypeDefinition::Scalar(t)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionType {
    pub name: String,
    #[serde(default)]
    pub possible_types: Vec<String>,
}

// =============================================================================
// FIELDS AND INPUT VALUES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub arguments: Vec<InputValueDefinition>,
    /// Rule annotations as authored.
    #[serde(default)]
    pub directives: Vec<RuleDeclaration>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        FieldDefinition {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            directives: Vec::new(),
            extensions: Extensions::default(),
        }
    }

    pub fn with_argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_directive(mut self, directive: RuleDeclaration) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|a| a.name == name)
    }

    pub fn rules(&self, extension_path: &[String]) -> &[RuleInstance] {
        self.extensions.rules_at(extension_path).unwrap_or_default()
    }
}

/// An argument or an input-object field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValueDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub directives: Vec<RuleDeclaration>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl InputValueDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        InputValueDefinition {
            name: name.into(),
            ty,
            default_value: None,
            directives: Vec::new(),
            extensions: Extensions::default(),
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_directive(mut self, directive: RuleDeclaration) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn rules(&self, extension_path: &[String]) -> &[RuleInstance] {
        self.extensions.rules_at(extension_path).unwrap_or_default()
    }
}

// =============================================================================
// TYPE REFERENCES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(of: TypeRef) -> Self {
        TypeRef::List(Box::new(of))
    }

    pub fn non_null(of: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(of))
    }

    /// Parse GraphQL type notation, e.g. `[UserInput!]!`.
    pub fn parse(notation: &str) -> Result<Self, String> {
        let trimmed = notation.trim();
        if let Some(inner) = trimmed.strip_suffix('!') {
            let inner = TypeRef::parse(inner)?;
            if matches!(inner, TypeRef::NonNull(_)) {
                return Err(format!("Invalid type reference '{}': double non-null", notation));
            }
            return Ok(TypeRef::non_null(inner));
        }
        if let Some(rest) = trimmed.strip_prefix('[') {
            let Some(inner) = rest.strip_suffix(']') else {
                return Err(format!("Invalid type reference '{}': unclosed list", notation));
            };
            return Ok(TypeRef::list(TypeRef::parse(inner)?));
        }
        let valid = !trimmed.is_empty()
            && trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !trimmed.starts_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(format!("Invalid type reference '{}'", notation));
        }
        Ok(TypeRef::named(trimmed))
    }

    /// Innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn strip_non_null(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Item type when this (nullable or not) is a list.
    pub fn list_item(&self) -> Option<&TypeRef> {
        match self.strip_non_null() {
            TypeRef::List(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = String;

    fn try_from(notation: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&notation)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.to_string()
    }
}
