use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use directive_validation::document::{Document, VariableValues};
use directive_validation::schema::{Schema, TypeRef};
use directive_validation::*;
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// Rules
// =============================================================================

/// Arguments of the `check` rule: what its execution should produce.
#[derive(Debug, Default, Deserialize)]
pub struct CheckArgs {
    /// Dynamic result, mapped through `RuleOutcome::from_json`.
    #[serde(default)]
    pub result: Value,
    /// Raise a fault with this message instead.
    #[serde(default)]
    pub fault: Option<String>,
    #[serde(default)]
    pub panic: bool,
}

/// Scripted rule that counts its executions.
pub struct Check {
    args: CheckArgs,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl ValidationRule for Check {
    async fn execute(&self, _context: &ExecutionContext) -> RuleOutcome {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.args.panic {
            panic!("check rule panicked");
        }
        if let Some(message) = &self.args.fault {
            return RuleOutcome::fault(anyhow::anyhow!(message.clone()));
        }
        RuleOutcome::from_json(self.args.result.clone())
    }
}

/// Host context used by the `authenticated` rule.
pub struct Viewer {
    pub user_id: Option<String>,
}

pub struct Authenticated;

#[async_trait]
impl ValidationRule for Authenticated {
    async fn execute(&self, context: &ExecutionContext) -> RuleOutcome {
        match context.downcast_ref::<Viewer>() {
            Some(Viewer { user_id: Some(_) }) => RuleOutcome::Pass,
            _ => RuleOutcome::fail("not authenticated"),
        }
    }
}

pub struct IsEmail;

#[async_trait]
impl ValidationRule for IsEmail {
    async fn execute(&self, _context: &ExecutionContext) -> RuleOutcome {
        RuleOutcome::fail("invalid email")
    }
}

/// Catalog with `check`, `authenticated` and `isEmail`, plus the shared `check` run counter.
pub fn catalog() -> (RuleCatalog, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let mut catalog = RuleCatalog::new();
    catalog.register("check", move |decl: &RuleDeclaration| Check {
        args: decl.args_as().unwrap_or_default(),
        runs: counter.clone(),
    });
    catalog.register("authenticated", |_: &RuleDeclaration| Authenticated);
    catalog.register("isEmail", |_: &RuleDeclaration| IsEmail);
    (catalog, runs)
}

pub fn check(result: impl Into<Value>) -> RuleDeclaration {
    RuleDeclaration::new("check").with_arg("result", result)
}

pub fn runs(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

// =============================================================================
// Schema and documents
// =============================================================================

pub fn ty(notation: &str) -> TypeRef {
    TypeRef::parse(notation).expect("valid type notation")
}

pub fn user_schema() -> Schema {
    Schema::from_json(include_str!("../fixtures/user_schema.json")).expect("fixture schema parses")
}

/// The user fixture schema bound against [`catalog`].
pub fn bound_user_schema() -> (Schema, Arc<AtomicUsize>) {
    let (catalog, runs) = catalog();
    let schema = bind_schema(&user_schema(), &catalog, &BindOptions::default()).expect("binds");
    (schema, runs)
}

pub fn create_user_document() -> Document {
    Document::from_json(include_str!("../fixtures/create_user.json")).expect("fixture document parses")
}

pub fn anonymous() -> Viewer {
    Viewer { user_id: None }
}

pub fn variables(value: Value) -> VariableValues {
    match value {
        Value::Object(map) => map,
        _ => panic!("variables must be a JSON object"),
    }
}

// =============================================================================
// Assertions
// =============================================================================

/// Dotted field paths of an error, in recorded order.
pub fn dotted_paths(err: &ValidationDirectiveError) -> Vec<String> {
    err.field_paths.iter().map(Path::dotted).collect()
}

/// Assert that exactly one error carries `message`, and return it.
pub fn assert_has_error<'a>(
    errors: &'a [ValidationDirectiveError],
    message: &str,
) -> &'a ValidationDirectiveError {
    let matching: Vec<_> = errors.iter().filter(|e| e.message == message).collect();
    assert_eq!(
        matching.len(),
        1,
        "expected one error '{}', got: {:?}",
        message,
        errors.iter().map(|e| &e.message).collect::<Vec<_>>()
    );
    matching[0]
}
