//! Typed error types for response assembly and form resolution.

use dx_explorer_diagnostics::codes;

/// A symbolic reference that could not be resolved in strict mode.
///
/// Each variant is a distinct, reportable condition.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// The content store carries no `classID` entry.
    #[error("could not resolve `{name}`: content has no classID")]
    MissingClassId {
        /// The property that was being resolved.
        name: String,
    },

    /// The content store belongs to a different class than the one requested.
    #[error("could not resolve `{name}`: content classID is {stored:?}, expected {requested:?}")]
    ClassMismatch {
        /// The property that was being resolved.
        name: String,
        /// The class id stored in content.
        stored: String,
        /// The class id the caller asked for.
        requested: String,
    },

    /// The property is absent from content.
    #[error("could not resolve `{name}`: not found in content")]
    MissingName {
        /// The property that was being resolved.
        name: String,
    },

    /// A `@FL` label reference names a field absent from the catalog.
    #[error("could not resolve label: field {key} is not in the field catalog")]
    UnknownField {
        /// Composite key of the missing field.
        key: String,
    },

    /// An `@PARAGRAPH` instruction names a paragraph the response does not carry.
    #[error("could not resolve instructions: paragraph {name} is not in the resources")]
    UnknownParagraph {
        /// Paragraph name after the prefix.
        name: String,
    },
}

/// Broad classification of a [`DxError`], mirroring how callers react to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required key is absent or has the wrong type.
    MalformedInput,
    /// A macro or content reference could not be resolved.
    Resolution,
    /// A component resolved to an unusable identity.
    Construction,
    /// The document uses a construct the engine does not understand.
    UnsupportedConstruct,
    /// The caller asked for something the current state cannot provide.
    Usage,
}

/// Errors produced while turning a DX response into a model snapshot.
///
/// Any of these aborts the current document; the caller keeps its previous
/// snapshot.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DxError {
    /// The body is not JSON at all.
    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A required key is absent, or holds the wrong JSON type.
    #[error("malformed input at {path}: {reason}")]
    MalformedInput {
        /// Dotted path of the offending key.
        path: String,
        /// What was expected there.
        reason: String,
    },

    /// A strict-mode reference could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A component was rejected after its per-kind attributes were resolved.
    #[error("failed to make component ({reason}) from JSON:\n{json}")]
    Construction {
        /// Which identity attribute was unusable.
        reason: String,
        /// Pretty-printed JSON of the rejected node.
        json: String,
    },

    /// The root pointer uses a context or type the engine does not support.
    #[error("root component uses unsupported {what}: {value}")]
    UnsupportedRoot {
        /// `"context"` or `"type"`.
        what: &'static str,
        /// The value found in the document.
        value: String,
    },

    /// A `/casetypes` response the explorer cannot drive.
    #[error("Not constellation compatible and/or no case types defined.")]
    NotConstellationCompatible,

    /// A token response without an `access_token`.
    #[error("No access token received.")]
    NoAccessToken,

    /// A write targeted a field that does not exist in the catalog.
    #[error("unknown field: {key}")]
    UnknownField {
        /// Composite key that was requested.
        key: String,
    },

    /// An operation does not apply to the current state.
    #[error("{0}")]
    Usage(String),
}

impl DxError {
    /// Shorthand for [`DxError::MalformedInput`].
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidJson(_) | Self::MalformedInput { .. } | Self::NoAccessToken => {
                ErrorKind::MalformedInput
            }
            Self::Resolution(_) => ErrorKind::Resolution,
            Self::Construction { .. } => ErrorKind::Construction,
            Self::UnsupportedRoot { .. } | Self::NotConstellationCompatible => {
                ErrorKind::UnsupportedConstruct
            }
            Self::UnknownField { .. } | Self::Usage(_) => ErrorKind::Usage,
        }
    }

    /// Stable diagnostic code for this error (see [`dx_explorer_diagnostics::explain`]).
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) | Self::MalformedInput { .. } | Self::NoAccessToken => {
                codes::MALFORMED_INPUT
            }
            Self::Resolution(r) => match r {
                ResolutionError::MissingClassId { .. } => codes::CONTENT_MISSING_CLASS_ID,
                ResolutionError::ClassMismatch { .. } => codes::CONTENT_CLASS_MISMATCH,
                ResolutionError::MissingName { .. } => codes::CONTENT_MISSING_PROPERTY,
                ResolutionError::UnknownField { .. } => codes::UNKNOWN_FIELD_LABEL,
                ResolutionError::UnknownParagraph { .. } => codes::UNKNOWN_PARAGRAPH,
            },
            Self::Construction { .. } => codes::CONSTRUCTION_FAILED,
            Self::UnsupportedRoot { .. } => codes::UNSUPPORTED_ROOT,
            Self::NotConstellationCompatible => codes::UNSUPPORTED_APPLICATION,
            Self::UnknownField { .. } | Self::Usage(_) => codes::USAGE,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = DxError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_errors_convert_and_classify() {
        let err: DxError = ResolutionError::MissingName {
            name: "Foo".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert_eq!(err.code(), codes::CONTENT_MISSING_PROPERTY);
        assert!(err.to_string().contains("Foo"));
    }

    #[test]
    fn unsupported_root_is_unsupported_construct() {
        let err = DxError::UnsupportedRoot {
            what: "context",
            value: "caseInfo.other".into(),
        };
        assert_eq!(err.kind(), ErrorKind::UnsupportedConstruct);
        assert_eq!(
            err.to_string(),
            "root component uses unsupported context: caseInfo.other"
        );
    }

    #[test]
    fn invalid_json_is_malformed_input() {
        let err: DxError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.code(), codes::MALFORMED_INPUT);
    }
}
