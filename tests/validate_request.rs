//! Integration tests for rule discovery and execution through `validate`.

#[allow(dead_code)]
mod helpers;

use directive_validation::document::{
    Document, FieldNode, OperationDefinition, OperationKind, ValueNode, VariableDefinition,
};
use directive_validation::schema::{FieldDefinition, ObjectType, Schema};
use directive_validation::*;
use helpers::*;
use serde_json::json;
use std::error::Error as _;

async fn run(
    schema: &Schema,
    document: &Document,
    vars: Option<&document::VariableValues>,
    operation_name: Option<&str>,
) -> Vec<ValidationDirectiveError> {
    validate(
        schema,
        document,
        &anonymous(),
        vars,
        operation_name,
        &ValidationOptions::default(),
    )
    .await
    .expect("operation kind is supported")
}

fn query(selection: FieldNode) -> Document {
    Document::new().with_operation(OperationDefinition::new(OperationKind::Query).with_selection(selection))
}

fn create_user(input: serde_json::Value) -> Document {
    Document::new().with_operation(
        OperationDefinition::new(OperationKind::Mutation).with_selection(
            FieldNode::new("createUser")
                .with_argument("input", ValueNode::from_json(&input))
                .with_selection(FieldNode::new("name")),
        ),
    )
}

#[tokio::test]
async fn create_user_with_invalid_email() {
    let (schema, _) = bound_user_schema();
    let vars = variables(json!({ "email": "not-an-email" }));
    let errors = run(&schema, &create_user_document(), Some(&vars), None).await;

    assert_eq!(errors.len(), 1);
    let err = &errors[0];
    assert_eq!(err.message, "invalid email");
    assert!(!err.throwable);
    assert_eq!(err.code, "ERR_GRAPHQL_CONSTRAINT_VALIDATION");
    assert_eq!(dotted_paths(err), vec!["createUser.input.email"]);
    assert!(err.is_abort_worthy());
}

#[tokio::test]
async fn undefined_variable_fields_are_not_validated() {
    let (schema, _) = bound_user_schema();
    let errors = run(&schema, &create_user_document(), None, None).await;
    assert!(errors.is_empty());
}

#[tokio::test]
async fn declared_failure_carries_message_and_path() {
    let (schema, _) = bound_user_schema();
    let errors = run(&schema, &create_user(json!({ "name": "x", "email": "a@b.c" })), None, None).await;

    let err = assert_has_error(&errors, "too long");
    assert!(!err.throwable);
    assert_eq!(dotted_paths(err), vec!["createUser.input.name"]);
    let last = err.field_paths[0].clone();
    assert!(last.is_input());
    assert_eq!(last.typename(), Some("String"));
}

#[tokio::test]
async fn rule_fault_becomes_throwable_error() {
    let (schema, _) = bound_user_schema();
    let errors = run(&schema, &create_user(json!({ "email": "a@b.c", "age": 7 })), None, None).await;

    let err = assert_has_error(&errors, "age service unavailable");
    assert!(err.throwable);
    assert_eq!(dotted_paths(err), vec!["createUser.input.age"]);
    assert_eq!(
        err.source().map(ToString::to_string).as_deref(),
        Some("age service unavailable")
    );
}

#[tokio::test]
async fn shared_rule_executes_once_with_every_path() {
    let (schema, runs_before) = bound_user_schema();
    let document = Document::new().with_operation(
        OperationDefinition::new(OperationKind::Query)
            .with_selection(FieldNode::new("users").with_selection(FieldNode::new("email")))
            .with_selection(
                FieldNode::new("user")
                    .with_argument("id", ValueNode::String("1".into()))
                    .with_selection(FieldNode::new("email"))
                    .with_selection(FieldNode::new("friends").with_selection(FieldNode::new("email"))),
            ),
    );
    let errors = run(&schema, &document, None, None).await;

    assert_eq!(runs(&runs_before), 1);
    let err = assert_has_error(&errors, "email is private");
    assert_eq!(
        dotted_paths(err),
        vec!["users.email", "user.email", "user.friends.email"]
    );
    assert!(!err.is_abort_worthy());
}

#[tokio::test]
async fn passing_rules_produce_no_errors() {
    let (catalog, runs_before) = catalog();
    let schema = Schema::new().with_query_type("Query").with_type(
        ObjectType::new("Query")
            .with_field(FieldDefinition::new("ok", ty("String")).with_directive(check(true)))
            .with_field(FieldDefinition::new("fine", ty("String")).with_directive(check(serde_json::Value::Null))),
    );
    let schema = bind_schema(&schema, &catalog, &BindOptions::default()).unwrap();
    let document = Document::new().with_operation(
        OperationDefinition::new(OperationKind::Query)
            .with_selection(FieldNode::new("ok"))
            .with_selection(FieldNode::new("fine")),
    );

    assert!(run(&schema, &document, None, None).await.is_empty());
    assert_eq!(runs(&runs_before), 2);
}

#[tokio::test]
async fn unrecognized_result_is_treated_as_pass() {
    let (catalog, _) = catalog();
    let schema = Schema::new().with_query_type("Query").with_type(
        ObjectType::new("Query")
            .with_field(FieldDefinition::new("odd", ty("String")).with_directive(check(json!({ "ok": 1 })))),
    );
    let schema = bind_schema(&schema, &catalog, &BindOptions::default()).unwrap();
    assert!(run(&schema, &query(FieldNode::new("odd")), None, None).await.is_empty());
}

#[tokio::test]
async fn panicking_rule_is_contained() {
    let (catalog, _) = catalog();
    let schema = Schema::new().with_query_type("Query").with_type(
        ObjectType::new("Query").with_field(
            FieldDefinition::new("boom", ty("String"))
                .with_directive(RuleDeclaration::new("check").with_arg("panic", true)),
        ),
    );
    let schema = bind_schema(&schema, &catalog, &BindOptions::default()).unwrap();
    let errors = run(&schema, &query(FieldNode::new("boom")), None, None).await;

    let err = assert_has_error(&errors, "check rule panicked");
    assert!(err.throwable);
}

#[tokio::test]
async fn context_is_handed_to_rules() {
    let (schema, _) = bound_user_schema();
    let document = query(FieldNode::new("me").with_selection(FieldNode::new("name")));

    let errors = run(&schema, &document, None, None).await;
    let err = assert_has_error(&errors, "not authenticated");
    assert!(err.is_abort_worthy());

    let viewer = Viewer {
        user_id: Some("u1".into()),
    };
    let errors = validate(&schema, &document, &viewer, None, None, &ValidationOptions::default())
        .await
        .unwrap();
    assert!(errors.is_empty());
}

#[tokio::test]
async fn lists_of_input_objects_are_walked_per_element() {
    let (schema, _) = bound_user_schema();
    let document = Document::new().with_operation(
        OperationDefinition::new(OperationKind::Mutation)
            .with_variable(VariableDefinition::new("input", ty("[UserInput!]!")))
            .with_selection(
                FieldNode::new("createUsers")
                    .with_argument("input", ValueNode::variable("input"))
                    .with_selection(FieldNode::new("name")),
            ),
    );
    let vars = variables(json!({
        "input": [
            { "email": "a" },
            { "email": "b", "name": "n", "address": { "city": "Oslo" } }
        ]
    }));
    let errors = run(&schema, &document, Some(&vars), None).await;

    let email = assert_has_error(&errors, "invalid email");
    assert_eq!(
        dotted_paths(email),
        vec!["createUsers.input.0.email", "createUsers.input.1.email"]
    );
    let city = assert_has_error(&errors, "Directive validation check failed");
    assert_eq!(dotted_paths(city), vec!["createUsers.input.1.address.city"]);
    assert_eq!(
        dotted_paths(assert_has_error(&errors, "too long")),
        vec!["createUsers.input.1.name"]
    );
}

#[tokio::test]
async fn operation_name_limits_the_walk() {
    let (schema, _) = bound_user_schema();
    let document = Document::new()
        .with_operation(
            OperationDefinition::new(OperationKind::Query)
                .named("Me")
                .with_selection(FieldNode::new("me")),
        )
        .with_operation(
            OperationDefinition::new(OperationKind::Query)
                .named("Users")
                .with_selection(FieldNode::new("users").with_selection(FieldNode::new("email"))),
        );

    let errors = run(&schema, &document, None, Some("Users")).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "email is private");

    let errors = run(&schema, &document, None, None).await;
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn missing_root_type_escapes_as_error() {
    let (schema, _) = bound_user_schema();
    let document = Document::new().with_operation(
        OperationDefinition::new(OperationKind::Subscription).with_selection(FieldNode::new("userAdded")),
    );
    let err = validate(&schema, &document, &anonymous(), None, None, &ValidationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, ValidationError::UnsupportedOperationKind(OperationKind::Subscription));
    assert_eq!(err.code(), "Q001");
}

#[tokio::test]
async fn argument_rules_follow_field_depth() {
    let (schema, _) = bound_user_schema();
    let document = query(
        FieldNode::new("account")
            .with_argument("id", ValueNode::String("1".into()))
            .with_selection(
                FieldNode::new("posts")
                    .with_argument("filter", ValueNode::from_json(&json!({ "q": "rust" })))
                    .with_selection(FieldNode::new("title")),
            ),
    );
    let errors = run(&schema, &document, None, None).await;
    assert_eq!(errors.len(), 3);

    let id = assert_has_error(&errors, "bad id");
    assert_eq!(dotted_paths(id), vec!["account.id"]);
    assert_eq!(id.field_paths[0].typename(), Some("ID"));
    assert!(id.is_abort_worthy());

    let filter = assert_has_error(&errors, "bad filter");
    assert_eq!(dotted_paths(filter), vec!["account.posts.filter"]);
    assert!(filter.field_paths[0].is_input());
    assert!(!filter.is_abort_worthy());

    let q = assert_has_error(&errors, "bad q");
    assert_eq!(dotted_paths(q), vec!["account.posts.filter.q"]);
    assert!(!q.is_abort_worthy());

    let Classification { abort, warnings } = classify(errors);
    assert_eq!(abort.len(), 1);
    assert_eq!(warnings.len(), 2);
}

#[tokio::test]
async fn custom_extension_path_is_read_back() {
    let (catalog, _) = catalog();
    let options = BindOptions::with_extension_path(["constraints", "rules"]);
    let schema = bind_schema(&user_schema(), &catalog, &options).unwrap();
    assert_eq!(schema.rule_extension_path, vec!["constraints", "rules"]);

    let vars = variables(json!({ "email": "not-an-email" }));
    let errors = run(&schema, &create_user_document(), Some(&vars), None).await;

    let err = assert_has_error(&errors, "invalid email");
    assert_eq!(dotted_paths(err), vec!["createUser.input.email"]);
    assert!(err.is_abort_worthy());
}
