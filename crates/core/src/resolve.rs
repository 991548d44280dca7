//! Expansion of the symbolic name and label prefixes found in component
//! configuration.
//!
//! | raw value       | result                                                  |
//! |-----------------|---------------------------------------------------------|
//! | `"@P .Name"`    | content value of `Name`, or `"Name"` without deref      |
//! | `"@L Hello"`    | `"Hello"`                                               |
//! | `"@FL .Name"`   | catalog label of field `<class_id>.Name`                |
//! | `"@PARAGRAPH P"`| content of paragraph `P` (instructions only)            |
//! | anything else   | returned unchanged                                      |

use crate::content::{ContentStore, LookupMode};
use crate::error::ResolutionError;
use crate::model::{FieldCatalog, ParagraphMap, make_key};

/// Indirect property reference.
pub const PROPERTY_PREFIX: &str = "@P ";
/// Literal label.
pub const LABEL_PREFIX: &str = "@L ";
/// Label borrowed from a field in the catalog.
pub const FIELD_LABEL_PREFIX: &str = "@FL ";
/// Instructions taken from a named paragraph.
pub const PARAGRAPH_PREFIX: &str = "@PARAGRAPH ";
/// Reference context naming an explicit class.
pub const CLASS_CONTEXT_PREFIX: &str = "@CLASS ";

/// What [`resolve_name`] produces for a property reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMode {
    /// The property's current value, looked up strictly in content.
    Dereference,
    /// The property's name itself.
    PropertyName,
}

/// Property name after a prefix, without the leading `.` the server writes.
fn property_name<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    raw.strip_prefix(prefix)
        .map(|rest| rest.strip_prefix('.').unwrap_or(rest))
}

/// Resolve a name-valued attribute.
pub fn resolve_name(
    raw: &str,
    content: &ContentStore,
    class_id: &str,
    mode: NameMode,
) -> Result<String, ResolutionError> {
    let Some(name) = property_name(raw, PROPERTY_PREFIX) else {
        return Ok(raw.to_string());
    };
    match mode {
        NameMode::Dereference => content.get(class_id, name, LookupMode::Strict),
        NameMode::PropertyName => Ok(name.to_string()),
    }
}

/// Resolve a label-valued attribute.
///
/// `@FL` references are keyed against `class_id`, the class of the component
/// being built.
pub fn resolve_label(
    raw: &str,
    fields: &FieldCatalog,
    class_id: &str,
) -> Result<String, ResolutionError> {
    if let Some(label) = raw.strip_prefix(LABEL_PREFIX) {
        return Ok(label.to_string());
    }
    if let Some(field_id) = property_name(raw, FIELD_LABEL_PREFIX) {
        let key = make_key(class_id, field_id);
        return fields
            .get(&key)
            .map(|f| f.label.clone())
            .ok_or(ResolutionError::UnknownField { key });
    }
    Ok(raw.to_string())
}

/// Resolve the `instructions` attribute of a view or region.
pub fn resolve_instructions(
    raw: &str,
    paragraphs: &ParagraphMap,
) -> Result<String, ResolutionError> {
    let Some(name) = raw.strip_prefix(PARAGRAPH_PREFIX) else {
        return Ok(raw.to_string());
    };
    paragraphs
        .get(name)
        .map(|p| p.content.clone())
        .ok_or_else(|| ResolutionError::UnknownParagraph { name: name.into() })
}

/// Class named by a `@CLASS <name>` context, or `None` for any other form.
pub fn class_context(context: &str) -> Option<&str> {
    context
        .strip_prefix(CLASS_CONTEXT_PREFIX)
        .filter(|class| !class.is_empty())
}
