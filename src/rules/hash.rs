//! Content hashing of rule declarations.
//!
//! A declaration is encoded as RFC 8785 canonical JSON via `serde_jcs` and
//! hashed with SHA-256. Two declarations hash equally iff their name and args
//! are structurally equal, whatever order the args were authored in. Missing
//! args serialize as `{}`.

use std::fmt;

use sha2::{Digest, Sha256};

use super::rule::RuleDeclaration;
use crate::error::RuleError;

/// Lowercase hex SHA-256 of a canonical declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleHash(String);

impl RuleHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn declaration_hash(declaration: &RuleDeclaration) -> Result<RuleHash, RuleError> {
    let canonical =
        serde_jcs::to_string(declaration).map_err(|source| RuleError::Canonicalization {
            name: declaration.name.clone(),
            source,
        })?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(RuleHash(digest.iter().map(|b| format!("{b:02x}")).collect()))
}
