//! Schema binding: rule declarations → rule instances in each element's extensions.
//!
//! Visits every object/interface field, every argument and every input-object
//! field. Declarations naming a rule the catalog does not know are skipped so
//! rule annotations can live next to unrelated schema metadata.

use crate::config::BindOptions;
use crate::error::RuleError;
use crate::rules::{RuleCatalog, RuleDeclaration, RuleInstance};
use crate::schema::{FieldDefinition, InputValueDefinition, Schema, TypeDefinition};

/// Return a copy of `schema` with rule instances stored at `options.extension_path`.
pub fn bind_schema(
    schema: &Schema,
    catalog: &RuleCatalog,
    options: &BindOptions,
) -> Result<Schema, RuleError> {
    let mut binder = Binder {
        catalog,
        path: &options.extension_path,
        bound_elements: 0,
    };

    let mut bound = schema.clone();
    bound.rule_extension_path = options.extension_path.clone();

    for def in bound.types.values_mut() {
        match def {
            TypeDefinition::Object(t) | TypeDefinition::Interface(t) => {
                t.fields = std::mem::take(&mut t.fields)
                    .into_iter()
                    .map(|field| binder.bind_object_field(field))
                    .collect::<Result<_, _>>()?;
            }
            TypeDefinition::InputObject(t) => {
                t.fields = std::mem::take(&mut t.fields)
                    .into_iter()
                    .map(|field| binder.bind_input_object_field(field))
                    .collect::<Result<_, _>>()?;
            }
            TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) | TypeDefinition::Union(_) => {}
        }
    }

    tracing::debug!(
        target: "directive_validation::bind",
        bound_elements = binder.bound_elements,
        extension_path = %options.extension_path.join("."),
        "schema bound"
    );

    Ok(bound)
}

struct Binder<'a> {
    catalog: &'a RuleCatalog,
    path: &'a [String],
    bound_elements: usize,
}

impl Binder<'_> {
    fn resolve(&mut self, directives: &[RuleDeclaration]) -> Result<Vec<RuleInstance>, RuleError> {
        let rules = directives
            .iter()
            .filter(|d| self.catalog.has_rule(&d.name))
            .map(|d| self.catalog.create_rule(d))
            .collect::<Result<Vec<_>, _>>()?;
        if !rules.is_empty() {
            self.bound_elements += 1;
        }
        Ok(rules)
    }

    fn bind_object_field(&mut self, field: FieldDefinition) -> Result<FieldDefinition, RuleError> {
        let rules = self.resolve(&field.directives)?;
        let mut field = field;
        if !rules.is_empty() {
            field.extensions.set_rules(self.path, rules.clone());
            field = rules
                .iter()
                .fold(field, |f, rule| rule.rule().applied_to_object_field(f));
        }

        field.arguments = std::mem::take(&mut field.arguments)
            .into_iter()
            .map(|arg| self.bind_argument(arg))
            .collect::<Result<_, _>>()?;
        Ok(field)
    }

    fn bind_argument(&mut self, argument: InputValueDefinition) -> Result<InputValueDefinition, RuleError> {
        let rules = self.resolve(&argument.directives)?;
        if rules.is_empty() {
            return Ok(argument);
        }
        let mut argument = argument;
        argument.extensions.set_rules(self.path, rules.clone());
        Ok(rules
            .iter()
            .fold(argument, |a, rule| rule.rule().applied_to_argument(a)))
    }

    fn bind_input_object_field(
        &mut self,
        field: InputValueDefinition,
    ) -> Result<InputValueDefinition, RuleError> {
        let rules = self.resolve(&field.directives)?;
        if rules.is_empty() {
            return Ok(field);
        }
        let mut field = field;
        field.extensions.set_rules(self.path, rules.clone());
        Ok(rules
            .iter()
            .fold(field, |f, rule| rule.rule().applied_to_input_object_field(f)))
    }
}
