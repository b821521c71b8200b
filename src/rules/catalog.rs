//! The rule catalog: rule names to constructors, plus memoized instances.
//!
//! Built once at startup and then shared by reference. Registration is
//! first-wins per name; instances are created on first use and reused for
//! every declaration with the same content hash.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::hash::{declaration_hash, RuleHash};
use super::rule::{RuleDeclaration, RuleInstance, ValidationRule};
use crate::error::RuleError;

pub type RuleConstructor =
    Arc<dyn Fn(&RuleDeclaration) -> Arc<dyn ValidationRule> + Send + Sync>;

#[derive(Default)]
pub struct RuleCatalog {
    constructors: HashMap<String, RuleConstructor>,
    instances: Mutex<HashMap<RuleHash, RuleInstance>>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule type. Returns false (and keeps the existing constructor)
    /// when the name is already taken.
    pub fn register<F, R>(&mut self, name: impl Into<String>, constructor: F) -> bool
    where
        F: Fn(&RuleDeclaration) -> R + Send + Sync + 'static,
        R: ValidationRule + 'static,
    {
        let constructor: RuleConstructor =
            Arc::new(move |decl: &RuleDeclaration| Arc::new(constructor(decl)) as Arc<dyn ValidationRule>);
        self.register_constructor(name, constructor)
    }

    pub fn register_constructor(
        &mut self,
        name: impl Into<String>,
        constructor: RuleConstructor,
    ) -> bool {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            tracing::debug!(
                target: "directive_validation::rules",
                rule = %name,
                "rule already registered; keeping first registration"
            );
            return false;
        }
        self.constructors.insert(name, constructor);
        true
    }

    /// Register several rules at once. Returns how many names were new.
    pub fn register_rules<I, S>(&mut self, rules: I) -> usize
    where
        I: IntoIterator<Item = (S, RuleConstructor)>,
        S: Into<String>,
    {
        rules
            .into_iter()
            .map(|(name, constructor)| self.register_constructor(name, constructor))
            .filter(|added| *added)
            .count()
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Return the shared instance for `declaration`, constructing it on first use.
    pub fn create_rule(&self, declaration: &RuleDeclaration) -> Result<RuleInstance, RuleError> {
        let Some(constructor) = self.constructors.get(&declaration.name) else {
            return Err(RuleError::NotRegistered {
                name: declaration.name.clone(),
            });
        };

        let hash = declaration_hash(declaration)?;
        if let Some(existing) = self.lock_instances().get(&hash) {
            return Ok(existing.clone());
        }

        // Constructors may instantiate other rules, so build without the lock held.
        let built = RuleInstance::new(hash.clone(), declaration.clone(), constructor(declaration));
        let instance = self.lock_instances().entry(hash).or_insert(built).clone();
        Ok(instance)
    }

    /// Number of distinct instances created so far.
    pub fn instance_count(&self) -> usize {
        self.lock_instances().len()
    }

    fn lock_instances(&self) -> MutexGuard<'_, HashMap<RuleHash, RuleInstance>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RuleCatalog")
            .field("rules", &names)
            .field("instances", &self.instance_count())
            .finish()
    }
}
