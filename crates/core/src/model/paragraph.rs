use std::collections::BTreeMap;

use serde::Serialize;

/// Rich-text block a view or region can show as its instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    /// Paragraph name.
    pub name: String,
    /// Owning class.
    pub class_id: String,
    /// HTML content, as sent.
    pub content: String,
}

/// Paragraphs keyed by the name `@PARAGRAPH` references use.
pub type ParagraphMap = BTreeMap<String, Paragraph>;
