//! Per-case content: property name to stringified value.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ResolutionError;

/// Content key holding the class the content belongs to.
pub const CLASS_ID_KEY: &str = "classID";

/// How a missing value is treated by [`ContentStore::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Missing `classID`, class mismatch, or missing name is an error.
    Strict,
    /// The same conditions yield an empty string.
    Lenient,
}

/// Flat mapping from property name to its stringified value.
///
/// Lookups are always scoped by an expected class id, so a property of the
/// same name on another class never leaks through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentStore {
    values: BTreeMap<String, String>,
}

impl ContentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `content` JSON object.
    ///
    /// Strings pass through; integers, floats, and booleans are stringified.
    /// Values of any other JSON type are dropped.
    pub fn from_json(content: &Map<String, Value>) -> Self {
        let mut store = Self::new();
        for (name, value) in content {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    warn!(property = %name, "dropping content value that is not a string, number, or boolean");
                    continue;
                }
            };
            store.values.insert(name.clone(), text);
        }
        store
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The `classID` entry, if present.
    pub fn class_id(&self) -> Option<&str> {
        self.values.get(CLASS_ID_KEY).map(String::as_str)
    }

    /// Value of `name`, provided the content belongs to `class_id`.
    ///
    /// In [`LookupMode::Strict`] each failure is reported distinctly; in
    /// [`LookupMode::Lenient`] every failure yields an empty string.
    pub fn get(
        &self,
        class_id: &str,
        name: &str,
        mode: LookupMode,
    ) -> Result<String, ResolutionError> {
        match self.lookup(class_id, name) {
            Ok(value) => Ok(value.to_string()),
            Err(_) if mode == LookupMode::Lenient => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    fn lookup(&self, class_id: &str, name: &str) -> Result<&str, ResolutionError> {
        let stored = self
            .class_id()
            .ok_or_else(|| ResolutionError::MissingClassId { name: name.into() })?;
        if stored != class_id {
            return Err(ResolutionError::ClassMismatch {
                name: name.into(),
                stored: stored.into(),
                requested: class_id.into(),
            });
        }
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ResolutionError::MissingName { name: name.into() })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }
}
