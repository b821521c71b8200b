//! Backward-linked traversal paths.
//!
//! A `Path` is one traversal step (output field, argument, input field or list
//! index) chained to the step before it. Paths are immutable and cheap to
//! clone; the traversal creates a fresh one per step and errors keep the ones
//! they were raised at.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathKey {
    Name(String),
    Index(usize),
}

impl PathKey {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PathKey::Name(name) => Some(name),
            PathKey::Index(_) => None,
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Name(name) => f.write_str(name),
            PathKey::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl From<&str> for PathKey {
    fn from(name: &str) -> Self {
        PathKey::Name(name.to_string())
    }
}

impl From<String> for PathKey {
    fn from(name: String) -> Self {
        PathKey::Name(name)
    }
}

impl From<usize> for PathKey {
    fn from(idx: usize) -> Self {
        PathKey::Index(idx)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct PathNode {
    key: PathKey,
    typename: Option<String>,
    is_input: bool,
    prev: Option<Path>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(Arc<PathNode>);

/// Append a step to `prev` (or start a new chain when `prev` is `None`).
pub fn add_path(
    prev: Option<&Path>,
    key: impl Into<PathKey>,
    typename: Option<&str>,
    is_input: bool,
) -> Path {
    Path(Arc::new(PathNode {
        key: key.into(),
        typename: typename.map(str::to_string),
        is_input,
        prev: prev.cloned(),
    }))
}

impl Path {
    pub fn root(key: impl Into<PathKey>, typename: Option<&str>) -> Self {
        add_path(None, key, typename, false)
    }

    /// Output-field step below `self`.
    pub fn field(&self, name: &str, typename: Option<&str>) -> Self {
        add_path(Some(self), name, typename, false)
    }

    /// Argument or input-field step below `self`.
    pub fn input(&self, name: &str, typename: Option<&str>) -> Self {
        add_path(Some(self), name, typename, true)
    }

    pub fn index(&self, idx: usize) -> Self {
        add_path(Some(self), idx, None, false)
    }

    pub fn key(&self) -> &PathKey {
        &self.0.key
    }

    pub fn typename(&self) -> Option<&str> {
        self.0.typename.as_deref()
    }

    pub fn is_input(&self) -> bool {
        self.0.is_input
    }

    pub fn prev(&self) -> Option<&Path> {
        self.0.prev.as_ref()
    }

    /// Iterate from this step back to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Path> {
        std::iter::successors(Some(self), |p| p.prev())
    }

    /// True if this step or any step before it belongs to an input subtree.
    ///
    /// Argument steps are flagged as input too, so `createUser.input` already
    /// counts; `field_depth` relies on that to treat a root field's arguments
    /// as top-level.
    pub fn has_input(&self) -> bool {
        self.ancestors().any(Path::is_input)
    }

    /// Keys from the root down to this step.
    pub fn to_vec(&self) -> Vec<PathKey> {
        let mut keys: Vec<PathKey> = self.ancestors().map(|p| p.key().clone()).collect();
        keys.reverse();
        keys
    }

    /// Keys from the root down, with list indices dropped.
    pub fn string_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.ancestors().filter_map(|p| p.key().as_name()).collect();
        keys.reverse();
        keys
    }

    /// Number of output-field steps, ignoring anything inside an argument subtree.
    pub fn field_depth(&self) -> usize {
        self.ancestors()
            .filter(|p| !p.has_input() && p.key().as_name().is_some())
            .count()
    }

    /// A root field, or a location inside one of its arguments.
    pub fn is_top_level(&self) -> bool {
        self.field_depth() <= 1
    }

    /// Keys joined with `.`, indices included.
    pub fn dotted(&self) -> String {
        self.to_vec()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.to_vec().iter().enumerate() {
            match key {
                PathKey::Index(idx) => write!(f, "[{}]", idx)?,
                PathKey::Name(name) if i == 0 => f.write_str(name)?,
                PathKey::Name(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_vec().serialize(serializer)
    }
}
