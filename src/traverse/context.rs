//! Traversal state shared by the query, input and list walkers.

use crate::document::{Document, VariableValues};
use crate::path::Path;
use crate::rules::RuleInstance;
use crate::schema::{Schema, TypeDefinition};

/// Called once per static occurrence of a rule.
pub type RuleFoundCallback<'cb> = dyn FnMut(&RuleInstance, &Path) + 'cb;

pub struct TraversalContext<'s, 'cb> {
    schema: &'s Schema,
    document: &'s Document,
    variables: VariableValues,
    /// Enclosing output type per open field/fragment; `None` when the type is unknown.
    type_stack: Vec<Option<&'s TypeDefinition>>,
    /// Fragment spreads currently being expanded.
    fragment_stack: Vec<&'s str>,
    discoveries: usize,
    on_rule_found: &'cb mut RuleFoundCallback<'cb>,
}

impl<'s, 'cb> TraversalContext<'s, 'cb> {
    pub fn new(
        schema: &'s Schema,
        document: &'s Document,
        on_rule_found: &'cb mut RuleFoundCallback<'cb>,
    ) -> Self {
        TraversalContext {
            schema,
            document,
            variables: VariableValues::new(),
            type_stack: Vec::new(),
            fragment_stack: Vec::new(),
            discoveries: 0,
            on_rule_found,
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn document(&self) -> &'s Document {
        self.document
    }

    pub fn variables(&self) -> &VariableValues {
        &self.variables
    }

    pub fn set_variables(&mut self, variables: VariableValues) {
        self.variables = variables;
    }

    pub fn rule_path(&self) -> &'s [String] {
        &self.schema.rule_extension_path
    }

    pub fn current_type(&self) -> Option<&'s TypeDefinition> {
        self.type_stack.last().copied().flatten()
    }

    pub fn push_type(&mut self, ty: Option<&'s TypeDefinition>) {
        self.type_stack.push(ty);
    }

    pub fn pop_type(&mut self) {
        self.type_stack.pop();
    }

    /// Returns false when `name` is already being expanded further up.
    pub fn enter_fragment(&mut self, name: &'s str) -> bool {
        if self.fragment_stack.contains(&name) {
            return false;
        }
        self.fragment_stack.push(name);
        true
    }

    pub fn leave_fragment(&mut self) {
        self.fragment_stack.pop();
    }

    /// Report every rule in `rules` as found at `path`.
    pub fn report(&mut self, rules: &[RuleInstance], path: &Path) {
        for rule in rules {
            self.discoveries += 1;
            (self.on_rule_found)(rule, path);
        }
    }

    pub fn discoveries(&self) -> usize {
        self.discoveries
    }
}
