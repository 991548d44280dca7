//! Case, field, and component model produced from one DX response.

mod case;
mod component;
mod field;
mod paragraph;

pub use case::{Action, Assignment, CaseInfo, CaseType};
pub use component::{Component, ComponentKind, ComponentMap, make_key};
pub use field::{Field, FieldCatalog, is_editable};
pub use paragraph::{Paragraph, ParagraphMap};

pub(crate) use component::{debug_string, debug_string_with_ref};

use serde::Serialize;

use crate::error::Result;

/// Field catalog, paragraphs, component map, and root key for one
/// case/action.
///
/// Rebuilt wholesale from every response that carries UI resources. Once
/// assembled, the only mutation the bundle allows is a field edit through
/// [`ResourceBundle::editor`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceBundle {
    fields: FieldCatalog,
    #[serde(skip_serializing_if = "ParagraphMap::is_empty")]
    paragraphs: ParagraphMap,
    components: ComponentMap,
    root_key: String,
}

impl ResourceBundle {
    /// Bundle from its parts.
    pub fn new(fields: FieldCatalog, components: ComponentMap, root_key: String) -> Self {
        Self {
            fields,
            paragraphs: ParagraphMap::new(),
            components,
            root_key,
        }
    }

    /// Attach the paragraphs the components were resolved against.
    #[must_use]
    pub fn with_paragraphs(mut self, paragraphs: ParagraphMap) -> Self {
        self.paragraphs = paragraphs;
        self
    }

    /// The field catalog.
    pub fn fields(&self) -> &FieldCatalog {
        &self.fields
    }

    /// Paragraphs by name.
    pub fn paragraphs(&self) -> &ParagraphMap {
        &self.paragraphs
    }

    /// The flat component map.
    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    /// Key of the root component.
    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// The root component, when its key is present in the map.
    pub fn root(&self) -> Option<&Component> {
        self.components.get(&self.root_key)
    }

    /// Narrow write access for the presentation layer.
    pub fn editor(&mut self) -> FieldEditor<'_> {
        FieldEditor {
            fields: &mut self.fields,
        }
    }
}

/// Write capability over a bundle's field values and dirty flags.
#[derive(Debug)]
pub struct FieldEditor<'a> {
    fields: &'a mut FieldCatalog,
}

impl FieldEditor<'_> {
    /// Current value of a field.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|f| f.data.as_str())
    }

    /// Replace a field's value and mark it dirty.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.fields.set_value(key, value)
    }
}
