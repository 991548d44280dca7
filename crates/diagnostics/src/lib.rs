//! Diagnostics for the DX explorer.
//!
//! Provides [`Diagnostic`] and [`Severity`] types used to report errors,
//! warnings, and informational messages from response assembly, tree walks,
//! and submission checks. Diagnostic codes are defined in the [`codes`]
//! module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the response cannot be used, or the form cannot be submitted.
    Error,
    /// Warning: part of the form degrades but the rest stays usable.
    Warn,
    /// Informational note.
    Info,
}

/// A diagnostic message produced while assembling or inspecting a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"DX1301"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Composite key or JSON path of the element this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            path,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self::new(id, Severity::Error, message, path)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, path)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self::new(id, Severity::Info, message, path)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"key"`, `"target"`, `"context"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }

    /// True for `Error` severity.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::MALFORMED_INPUT => {
            "The response is missing a required key, or a key holds the wrong JSON type. \
             The whole document is rejected and the previous snapshot is kept."
        }
        codes::CONTENT_MISSING_CLASS_ID => {
            "A property reference was resolved against case content that carries no `classID` entry."
        }
        codes::CONTENT_CLASS_MISMATCH => {
            "A property reference was resolved for one class while the case content belongs to another."
        }
        codes::CONTENT_MISSING_PROPERTY => {
            "An `@P` property reference names a property that is not present in the case content."
        }
        codes::UNKNOWN_FIELD_LABEL => {
            "An `@FL` label reference names a field that is not present in the field catalog."
        }
        codes::UNKNOWN_PARAGRAPH => {
            "An `@PARAGRAPH` instruction names a paragraph that is not present in `uiResources.resources.paragraphs`."
        }
        codes::CONSTRUCTION_FAILED => {
            "A component resolved to an empty name or class id, so it cannot be keyed."
        }
        codes::UNSUPPORTED_CONTEXT => {
            "A reference declares a context other than `@CLASS <name>`. The reference is kept \
             but marked broken, and neither rendering nor walks descend into it."
        }
        codes::UNSUPPORTED_ROOT => {
            "The root pointer must use context `caseInfo.content` and type `view`."
        }
        codes::UNKNOWN_COMPONENT_TYPE => {
            "A component declares a type the explorer does not model. It is kept as a \
             placeholder and marked broken."
        }
        codes::UNSUPPORTED_TEMPLATE => {
            "A view declares no template or an unknown one, so its children are not rendered."
        }
        codes::UNSUPPORTED_APPLICATION => {
            "The `/casetypes` response is not flagged `applicationIsConstellationCompatible`, \
             or it lists no case types."
        }
        codes::MISSING_REFERENCE_TARGET => {
            "A reference points at a component key that is absent from the component map."
        }
        codes::REFERENCE_CYCLE => {
            "Following a reference leads back to a component already on the current path. \
             The walk stops at the repeated key."
        }
        codes::REQUIRED_FIELD_EMPTY => {
            "A required input is bound to a field with no value, so the action cannot be submitted."
        }
        codes::REQUIRED_FIELD_MISSING => {
            "A required input has no matching entry in the field catalog, so it can never be satisfied."
        }
        codes::USAGE => "The requested operation does not apply to the current session state.",
        _ => return None,
    };
    Some(text)
}
