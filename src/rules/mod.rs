//! Rule declarations, the execution contract, and the rule catalog.

pub mod catalog;
pub mod hash;
pub mod rule;

pub use catalog::{RuleCatalog, RuleConstructor};
pub use hash::{declaration_hash, RuleHash};
pub use rule::{ExecutionContext, RuleDeclaration, RuleInstance, RuleOutcome, ValidationRule};
