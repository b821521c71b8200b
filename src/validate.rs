//! Validation orchestrator.
//!
//! Discovers every rule occurrence in the request, then executes each distinct
//! rule instance once, sequentially, in discovery order. Only failing outcomes
//! are returned, each carrying every path its rule was found at.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;

use crate::config::ValidationOptions;
use crate::document::{Document, VariableValues};
use crate::error::{ValidationDirectiveError, ValidationError};
use crate::path::Path;
use crate::rules::{ExecutionContext, RuleHash, RuleInstance, RuleOutcome};
use crate::schema::Schema;
use crate::traverse::traverse;

/// Rule instances in discovery order, each with the paths it was found at.
#[derive(Debug, Default)]
pub struct RuleInvocations {
    entries: Vec<(RuleInstance, Vec<Path>)>,
    by_hash: HashMap<RuleHash, usize>,
}

impl RuleInvocations {
    pub fn record(&mut self, rule: &RuleInstance, path: &Path) {
        match self.by_hash.get(rule.hash()) {
            Some(&idx) => self.entries[idx].1.push(path.clone()),
            None => {
                self.by_hash.insert(rule.hash().clone(), self.entries.len());
                self.entries.push((rule.clone(), vec![path.clone()]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self, hash: &RuleHash) -> Option<&[Path]> {
        self.by_hash.get(hash).map(|&idx| self.entries[idx].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleInstance, &[Path])> {
        self.entries.iter().map(|(rule, paths)| (rule, paths.as_slice()))
    }
}

/// Collect rule occurrences for `document` without executing anything.
pub fn collect_invocations(
    schema: &Schema,
    document: &Document,
    variables: Option<&VariableValues>,
    operation_name: Option<&str>,
) -> Result<RuleInvocations, ValidationError> {
    let mut invocations = RuleInvocations::default();
    traverse(schema, document, variables, operation_name, |rule, path| {
        invocations.record(rule, path);
    })?;
    Ok(invocations)
}

/// Validate one request.
///
/// Rule failures come back as data, never as `Err`. The only error is a
/// document/schema mismatch: an operation whose kind has no root type.
/// `_options` only shape what the request boundary does with the result.
pub async fn validate(
    schema: &Schema,
    document: &Document,
    context: &ExecutionContext,
    variables: Option<&VariableValues>,
    operation_name: Option<&str>,
    _options: &ValidationOptions,
) -> Result<Vec<ValidationDirectiveError>, ValidationError> {
    let invocations = collect_invocations(schema, document, variables, operation_name)?;

    let mut errors = Vec::new();
    for (rule, paths) in invocations.iter() {
        let outcome = execute_rule(rule, context).await;
        if let Some(err) = outcome_to_error(rule, outcome, paths) {
            errors.push(err);
        }
    }

    tracing::debug!(
        target: "directive_validation::validate",
        operation = operation_name.unwrap_or("<all>"),
        rules = invocations.len(),
        errors = errors.len(),
        "validation complete"
    );

    Ok(errors)
}

/// Run a rule, turning a panic in its future into a fault.
async fn execute_rule(rule: &RuleInstance, context: &ExecutionContext) -> RuleOutcome {
    match AssertUnwindSafe(rule.rule().execute(context)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| format!("Directive validation {} panicked", rule.name()));
            RuleOutcome::Fault(anyhow::anyhow!(message))
        }
    }
}

fn outcome_to_error(
    rule: &RuleInstance,
    outcome: RuleOutcome,
    paths: &[Path],
) -> Option<ValidationDirectiveError> {
    match outcome {
        RuleOutcome::Pass => None,
        RuleOutcome::Reject => Some(ValidationDirectiveError::new(
            format!("Directive validation {} failed", rule.name()),
            paths.to_vec(),
            false,
        )),
        RuleOutcome::Fail(message) => Some(ValidationDirectiveError::new(message, paths.to_vec(), false)),
        RuleOutcome::Unrecognized(value) => {
            tracing::warn!(
                target: "directive_validation::validate",
                rule = rule.name(),
                result = %value,
                "unrecognized rule execution result, treating as pass"
            );
            None
        }
        RuleOutcome::Fault(err) => {
            tracing::warn!(
                target: "directive_validation::validate",
                rule = rule.name(),
                error = %err,
                "rule execution faulted"
            );
            Some(match err.downcast::<ValidationDirectiveError>() {
                Ok(mut passthrough) => {
                    if passthrough.field_paths.is_empty() {
                        passthrough.field_paths = paths.to_vec();
                    }
                    passthrough
                }
                Err(err) => ValidationDirectiveError::new(err.to_string(), paths.to_vec(), true).with_cause(err),
            })
        }
    }
}
