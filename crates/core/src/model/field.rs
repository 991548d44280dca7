use std::collections::BTreeMap;

use serde::Serialize;

use super::component::{Component, make_key};
use crate::error::{DxError, Result};

/// Metadata and current value of one editable case property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Property name (e.g. `"Name"`).
    pub id: String,
    /// Owning class.
    pub class_id: String,
    /// Display label.
    pub label: String,
    /// Declared type, as sent by the server.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Current value.
    pub data: String,
    /// Pretty-printed JSON this entry was built from.
    #[serde(skip)]
    pub json: String,
    /// Server-managed property.
    pub is_special: bool,
    /// Part of the class key.
    pub is_class_key: bool,
    /// Set once the operator edits the value.
    pub is_dirty: bool,
}

impl Field {
    /// Composite key `class_id.id`.
    pub fn key(&self) -> String {
        make_key(&self.class_id, &self.id)
    }
}

/// Field metadata keyed by composite key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: BTreeMap<String, Field>,
}

impl FieldCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the field's composite key; a later entry with the same
    /// key replaces the earlier one.
    pub fn insert(&mut self, field: Field) -> Option<Field> {
        self.fields.insert(field.key(), field)
    }

    /// Field by composite key.
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// True when `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    /// Fields the operator has edited.
    pub fn dirty(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|f| f.is_dirty)
    }

    /// Record an operator edit: replace the value and mark the field dirty.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| DxError::UnknownField { key: key.into() })?;
        field.data = value.into();
        field.is_dirty = true;
        Ok(())
    }
}

impl FromIterator<Field> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for field in iter {
            catalog.insert(field);
        }
        catalog
    }
}

/// Returns true if the field should be rendered with an editable control.
pub fn is_editable(component: &Component, field: &Field) -> bool {
    !(component.is_readonly || component.is_disabled || field.is_special || field.is_class_key)
}
