//! DX API explorer core library.
//!
//! Turns one DX API response body into a case model, a field catalog, and a
//! resolved component tree, and decides whether the open form may be
//! submitted. The main entry points are [`parse_dx_response`] for assembly,
//! [`validate_component`] for the submission check, and [`Session`] for
//! driving a login → case → assignment → action flow.
//!
//! Nothing here performs I/O. Request builders in [`request`] describe the
//! HTTP calls; executing them is the caller's job.

#![warn(missing_docs)]

/// Response assembly: case info, assignments, content, UI resources.
pub mod assemble;
/// Field catalog construction.
pub mod catalog;
/// Class-scoped case content with strict and lenient lookup.
pub mod content;
/// Error types.
pub mod error;
/// Lenient JSON helpers.
pub mod json;
/// Case, field, and component model types.
pub mod model;
/// HTTP request descriptors for DX API calls.
pub mod request;
/// `@P`, `@L`, `@FL`, and `@CLASS` expansion.
pub mod resolve;
/// Explorer session state machine.
pub mod session;
/// Submission body construction.
pub mod submit;
/// Case-insensitive tag lookup for closed enumerations.
pub mod tag;
/// Component tree construction.
pub mod tree;
/// Submission checks.
pub mod validate;
/// Reference-following walks and structural diagnostics.
pub mod walk;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Assembly
pub use assemble::{DxResponse, assemble, parse_access_token, parse_case_types, parse_dx_response};

// Model
pub use content::{ContentStore, LookupMode};
pub use model::{
    Action, Assignment, CaseInfo, CaseType, Component, ComponentKind, ComponentMap, Field,
    FieldCatalog, FieldEditor, Paragraph, ParagraphMap, ResourceBundle, make_key,
};

// Errors
pub use error::{DxError, ErrorKind, ResolutionError};

// Diagnostics (re-exported from the diagnostics crate)
pub use dx_explorer_diagnostics::{Diagnostic, Severity, codes};

// Checks and walks
pub use submit::submission_body;
pub use validate::{missing_required, validate_component};
pub use walk::{FormInput, StepKind, WalkStep, form_inputs, inspect, walk};

// Session
pub use request::{Call, HttpMethod, HttpRequest};
pub use session::{NetResponse, Session, SessionStatus};
pub use tag::Tagged;
