//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every code has an entry in [`crate::explain`].

// ── Input ───────────────────────────────────────────────────────────────

/// A required key is absent or has the wrong JSON type.
pub const MALFORMED_INPUT: &str = "DX1001";

// ── Resolution ──────────────────────────────────────────────────────────

/// The content store has no `classID` entry.
pub const CONTENT_MISSING_CLASS_ID: &str = "DX1101";
/// The content store belongs to a different class than requested.
pub const CONTENT_CLASS_MISMATCH: &str = "DX1102";
/// A `@P` property reference names a property absent from content.
pub const CONTENT_MISSING_PROPERTY: &str = "DX1103";
/// A `@FL` label reference names a field absent from the catalog.
pub const UNKNOWN_FIELD_LABEL: &str = "DX1104";
/// An `@PARAGRAPH` instruction names a paragraph absent from the resources.
pub const UNKNOWN_PARAGRAPH: &str = "DX1105";

// ── Construction ────────────────────────────────────────────────────────

/// A component resolved to an empty name or class id, or has no kind.
pub const CONSTRUCTION_FAILED: &str = "DX1201";

// ── Unsupported constructs ──────────────────────────────────────────────

/// A reference declares a context form other than `@CLASS`.
pub const UNSUPPORTED_CONTEXT: &str = "DX1301";
/// The root pointer uses an unsupported context or type.
pub const UNSUPPORTED_ROOT: &str = "DX1302";
/// A component declares a type the engine does not model.
pub const UNKNOWN_COMPONENT_TYPE: &str = "DX1303";
/// A view declares no template, or one the engine does not model.
pub const UNSUPPORTED_TEMPLATE: &str = "DX1304";
/// The application does not expose constellation-compatible case types.
pub const UNSUPPORTED_APPLICATION: &str = "DX1305";

// ── References ──────────────────────────────────────────────────────────

/// A reference points at a key absent from the component map.
pub const MISSING_REFERENCE_TARGET: &str = "DX1401";
/// A reference leads back to a component already on the current path.
pub const REFERENCE_CYCLE: &str = "DX1402";

// ── Submission ──────────────────────────────────────────────────────────

/// A required input is bound to a field with no value.
pub const REQUIRED_FIELD_EMPTY: &str = "DX1501";
/// A required input has no matching entry in the field catalog.
pub const REQUIRED_FIELD_MISSING: &str = "DX1502";

// ── Usage ───────────────────────────────────────────────────────────────

/// The caller asked for something the current state cannot provide.
pub const USAGE: &str = "DX1901";

/// Every code defined in this module, in numeric order.
pub const ALL: &[&str] = &[
    MALFORMED_INPUT,
    CONTENT_MISSING_CLASS_ID,
    CONTENT_CLASS_MISMATCH,
    CONTENT_MISSING_PROPERTY,
    UNKNOWN_FIELD_LABEL,
    UNKNOWN_PARAGRAPH,
    CONSTRUCTION_FAILED,
    UNSUPPORTED_CONTEXT,
    UNSUPPORTED_ROOT,
    UNKNOWN_COMPONENT_TYPE,
    UNSUPPORTED_TEMPLATE,
    UNSUPPORTED_APPLICATION,
    MISSING_REFERENCE_TARGET,
    REFERENCE_CYCLE,
    REQUIRED_FIELD_EMPTY,
    REQUIRED_FIELD_MISSING,
    USAGE,
];
