//! The rule execution contract and rule instances.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::hash::RuleHash;
use crate::schema::{FieldDefinition, InputValueDefinition};

/// The host's request-scoped context. Rules downcast it to the host's type.
pub type ExecutionContext = dyn Any + Send + Sync;

/// A rule annotation as authored on a schema element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDeclaration {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl RuleDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        RuleDeclaration {
            name: name.into(),
            args: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// Deserialize the arguments into a rule's own argument struct.
    pub fn args_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.args.clone()))
    }
}

/// What a rule execution produced.
#[derive(Debug)]
pub enum RuleOutcome {
    Pass,
    /// Failed without a message of its own.
    Reject,
    Fail(String),
    /// A result shape the orchestrator does not understand. Logged and treated as a pass.
    Unrecognized(Value),
    /// The rule's own logic failed.
    Fault(anyhow::Error),
}

impl RuleOutcome {
    pub fn fail(message: impl Into<String>) -> Self {
        RuleOutcome::Fail(message.into())
    }

    pub fn fault(err: impl Into<anyhow::Error>) -> Self {
        RuleOutcome::Fault(err.into())
    }

    /// Map a dynamically shaped result: null/true pass, false rejects, a string fails.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(true) => RuleOutcome::Pass,
            Value::Bool(false) => RuleOutcome::Reject,
            Value::String(message) => RuleOutcome::Fail(message),
            other => RuleOutcome::Unrecognized(other),
        }
    }
}

impl From<bool> for RuleOutcome {
    fn from(ok: bool) -> Self {
        if ok { RuleOutcome::Pass } else { RuleOutcome::Reject }
    }
}

impl From<Option<String>> for RuleOutcome {
    fn from(message: Option<String>) -> Self {
        message.map_or(RuleOutcome::Pass, RuleOutcome::Fail)
    }
}

impl<E: Into<anyhow::Error>> From<Result<RuleOutcome, E>> for RuleOutcome {
    fn from(result: Result<RuleOutcome, E>) -> Self {
        result.unwrap_or_else(RuleOutcome::fault)
    }
}

/// A validation rule. Implementations are built by a [`RuleCatalog`](super::RuleCatalog)
/// constructor from their declaration and shared by every element declaring them identically.
#[async_trait]
pub trait ValidationRule: Send + Sync {
    async fn execute(&self, context: &ExecutionContext) -> RuleOutcome;

    /// Rewrite the object field this rule is bound to. Called once at bind time.
    fn applied_to_object_field(&self, field: FieldDefinition) -> FieldDefinition {
        field
    }

    fn applied_to_input_object_field(&self, field: InputValueDefinition) -> InputValueDefinition {
        field
    }

    fn applied_to_argument(&self, argument: InputValueDefinition) -> InputValueDefinition {
        argument
    }
}

struct RuleInstanceInner {
    hash: RuleHash,
    declaration: RuleDeclaration,
    rule: Arc<dyn ValidationRule>,
}

/// A memoized rule for one (name, args) declaration.
#[derive(Clone)]
pub struct RuleInstance {
    inner: Arc<RuleInstanceInner>,
}

impl RuleInstance {
    pub(crate) fn new(hash: RuleHash, declaration: RuleDeclaration, rule: Arc<dyn ValidationRule>) -> Self {
        RuleInstance {
            inner: Arc::new(RuleInstanceInner {
                hash,
                declaration,
                rule,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.declaration.name
    }

    pub fn args(&self) -> &Map<String, Value> {
        &self.inner.declaration.args
    }

    pub fn declaration(&self) -> &RuleDeclaration {
        &self.inner.declaration
    }

    pub fn hash(&self) -> &RuleHash {
        &self.inner.hash
    }

    pub fn rule(&self) -> &dyn ValidationRule {
        self.inner.rule.as_ref()
    }

    /// Reference identity, as opposed to the content-hash equality of `==`.
    pub fn same_instance(&self, other: &RuleInstance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for RuleInstance {
    fn eq(&self, other: &Self) -> bool {
        self.inner.hash == other.inner.hash
    }
}

impl Eq for RuleInstance {}

impl fmt::Debug for RuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleInstance")
            .field("name", &self.name())
            .field("args", self.args())
            .field("hash", &self.inner.hash)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_results_map_to_outcomes() {
        assert!(matches!(RuleOutcome::from_json(Value::Null), RuleOutcome::Pass));
        assert!(matches!(RuleOutcome::from_json(json!(true)), RuleOutcome::Pass));
        assert!(matches!(RuleOutcome::from_json(json!(false)), RuleOutcome::Reject));
        assert!(matches!(
            RuleOutcome::from_json(json!("too long")),
            RuleOutcome::Fail(m) if m == "too long"
        ));
        assert!(matches!(
            RuleOutcome::from_json(json!(42)),
            RuleOutcome::Unrecognized(_)
        ));
    }

    #[test]
    fn results_with_errors_become_faults() {
        let result: Result<RuleOutcome, std::io::Error> =
            Err(std::io::Error::other("lookup failed"));
        assert!(matches!(RuleOutcome::from(result), RuleOutcome::Fault(_)));
    }

    #[test]
    fn declaration_args_deserialize() {
        #[derive(Deserialize)]
        struct Length {
            max: usize,
        }
        let decl = RuleDeclaration::new("maxLength").with_arg("max", 10);
        assert_eq!(decl.args_as::<Length>().unwrap().max, 10);
        assert_eq!(decl.arg("max"), Some(&json!(10)));
    }
}
