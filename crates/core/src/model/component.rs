use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tag::Tagged;

/// Kind of a form component, as named by the `type` tag in DX JSON.
///
/// The first two variants carry the [`Tagged`] two-tier default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Never resolved.
    #[default]
    Unspecified,
    /// Resolved, but the tag names a kind the explorer does not model.
    Unknown,
    /// Points at another component by key.
    Reference,
    /// Named grouping of children inside a view or template.
    Region,
    /// Root of a class-scoped subtree.
    View,
    /// Multi-line text field.
    TextArea,
    /// Single-line text field.
    TextInput,
    /// Default form template (appears as a view's `template`).
    DefaultForm,
}

impl Tagged for ComponentKind {
    const VARIANTS: &'static [Self] = &[
        Self::Unspecified,
        Self::Unknown,
        Self::Reference,
        Self::Region,
        Self::View,
        Self::TextArea,
        Self::TextInput,
        Self::DefaultForm,
    ];
    const TAGS: &'static [&'static str] = &[
        "Unspecified",
        "Unknown",
        "Reference",
        "Region",
        "View",
        "TextArea",
        "TextInput",
        "DefaultForm",
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl ComponentKind {
    /// True for kinds bound to a field in the catalog.
    pub fn is_input(self) -> bool {
        matches!(self, Self::TextArea | Self::TextInput)
    }

    /// True when a view with this template can have its children rendered.
    pub fn is_supported_template(self) -> bool {
        !matches!(self, Self::Unspecified | Self::Unknown)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Creates a key from a class id and a name, e.g. `"The-Class-ID.TheName"`.
pub fn make_key(class_id: &str, name: &str) -> String {
    format!("{class_id}.{name}")
}

/// A resolved node of the server-described form tree.
///
/// `key` identifies this component; for references and inputs it identifies
/// the referenced component or bound field instead. Children are owned; a
/// reference's target is not, and is looked up by key in a [`ComponentMap`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Component {
    /// Resolved kind.
    pub kind: ComponentKind,
    /// Resolved name.
    pub name: String,
    /// Owning class, inherited from the parent unless overridden.
    pub class_id: String,
    /// Composite key `class_id.name`.
    pub key: String,
    /// Resolved label (inputs only).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Resolved instructions (views and regions only).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instructions: String,
    /// Pretty-printed JSON this node was built from.
    #[serde(skip)]
    pub json: String,
    /// Human-readable one-line summary.
    pub debug_string: String,
    /// Why this node is unusable, when it declares an unsupported construct.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broken: Option<String>,
    /// Input is shown but cannot be edited.
    pub is_readonly: bool,
    /// Input must be non-empty before submission.
    pub is_required: bool,
    /// Input is disabled.
    pub is_disabled: bool,
    /// Referenced kind (references) or template (views).
    pub ref_kind: ComponentKind,
    /// Owned children, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
}

impl Component {
    /// True when the node declares an unsupported construct.
    pub fn is_broken(&self) -> bool {
        self.broken.is_some()
    }

    /// Diagnostic message for a broken node.
    pub fn broken_reason(&self) -> Option<&str> {
        self.broken.as_deref()
    }
}

/// Flat lookup of components by composite key.
pub type ComponentMap = BTreeMap<String, Component>;

/// `"<Kind>: <name>"`
pub(crate) fn debug_string(kind: ComponentKind, name: &str) -> String {
    format!("{kind}: {name}")
}

/// `"<Kind>: <name> [<RefKind>]"`
pub(crate) fn debug_string_with_ref(
    kind: ComponentKind,
    name: &str,
    ref_kind: ComponentKind,
) -> String {
    format!("{kind}: {name} [{ref_kind}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_strings() {
        assert_eq!(
            debug_string(ComponentKind::Region, "Fields"),
            "Region: Fields"
        );
        assert_eq!(
            debug_string_with_ref(
                ComponentKind::View,
                "MainView",
                ComponentKind::DefaultForm
            ),
            "View: MainView [DefaultForm]"
        );
    }

    #[test]
    fn template_support() {
        assert!(ComponentKind::DefaultForm.is_supported_template());
        assert!(!ComponentKind::Unspecified.is_supported_template());
        assert!(!ComponentKind::Unknown.is_supported_template());
    }

    #[test]
    fn kind_serializes_as_tag() {
        let json = serde_json::to_string(&ComponentKind::TextInput).unwrap();
        assert_eq!(json, "\"TextInput\"");
    }
}
