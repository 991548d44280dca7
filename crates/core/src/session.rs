//! Explorer session: what the operator has open, and how each completed DX
//! call moves it forward.
//!
//! The session never talks to the network. A transport executes the
//! [`HttpRequest`]s the session describes and hands back a [`NetResponse`];
//! [`Session::apply`] folds that into the session. A response that fails to
//! parse leaves the previous snapshot untouched and sets the flash message.

use dx_explorer_config::ExplorerConfig;
use serde::Serialize;
use tracing::{debug, warn};

use crate::assemble::{DxResponse, parse_access_token, parse_case_types, parse_dx_response};
use crate::error::{DxError, Result};
use crate::model::{CaseInfo, CaseType, FieldEditor, ResourceBundle};
use crate::request::{self, Call, HttpRequest};
use crate::submit::submission_body;
use crate::validate::validate_component;

/// Flash shown when the open form blocks submission.
pub const VALIDATION_FAILED: &str = "Validation failed. Did you fill out all required fields?";

/// Where the operator is in the login → case → assignment → action flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No access token yet.
    #[default]
    LoggedOut,
    /// Logged in; no case open.
    LoggedIn,
    /// A case is open.
    OpenCase,
    /// An assignment of the open case is open.
    OpenAssignment,
    /// An action's form is open and can be submitted.
    OpenAction,
}

/// Outcome of executing one [`HttpRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetResponse {
    /// The exchange did not complete (connection refused, timeout, ...).
    Failed(String),
    /// A response body was received.
    Received {
        /// Response body.
        body: String,
        /// `eTag` response header, empty when absent.
        etag: String,
    },
}

/// State of one explorer session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    status: SessionStatus,
    access_token: String,
    case_types: Vec<CaseType>,
    case_info: CaseInfo,
    resources: ResourceBundle,
    open_assignment_id: String,
    open_action_id: String,
    etag: String,
    flash: String,
}

impl Session {
    /// A logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Case types from the last successful refresh.
    pub fn case_types(&self) -> &[CaseType] {
        &self.case_types
    }

    /// The current case snapshot.
    pub fn case_info(&self) -> &CaseInfo {
        &self.case_info
    }

    /// The current form resources.
    pub fn resources(&self) -> &ResourceBundle {
        &self.resources
    }

    /// Field edits for the open form.
    pub fn editor(&mut self) -> FieldEditor<'_> {
        self.resources.editor()
    }

    /// Open assignment id, empty when none.
    pub fn open_assignment_id(&self) -> &str {
        &self.open_assignment_id
    }

    /// Open action id, empty when none.
    pub fn open_action_id(&self) -> &str {
        &self.open_action_id
    }

    /// Etag of the last opened assignment or action.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Message for the operator from the last call, usually an error.
    pub fn flash(&self) -> &str {
        &self.flash
    }

    /// Describe `call` for the transport.
    ///
    /// Every call but [`Call::Login`] needs an access token. Submitting goes
    /// through [`Session::prepare_submit`] instead, which validates first.
    pub fn request(&self, config: &ExplorerConfig, call: &Call) -> Result<HttpRequest> {
        let token = self.access_token.as_str();
        match call {
            Call::Login => request::login(config),
            Call::SubmitAssignmentAction { .. } => Err(DxError::Usage(
                "submit requests are built by prepare_submit".into(),
            )),
            _ if token.is_empty() => Err(DxError::Usage(format!(
                "cannot {} before logging in",
                call.verb()
            ))),
            Call::RefreshCaseTypes => Ok(request::refresh_case_types(config, token)),
            Call::CreateCase { case_type_id } => {
                Ok(request::create_case(config, token, case_type_id))
            }
            Call::OpenAssignment { assignment_id } => {
                Ok(request::open_assignment(config, token, assignment_id))
            }
            Call::OpenAssignmentAction {
                assignment_id,
                action_id,
            } => Ok(request::open_assignment_action(
                config,
                token,
                assignment_id,
                action_id,
            )),
        }
    }

    /// Validate the open form and describe its submission.
    ///
    /// Fails with [`VALIDATION_FAILED`] (also set as the flash) when a
    /// required input in the root component's own subtree is empty.
    pub fn prepare_submit(&mut self, config: &ExplorerConfig) -> Result<HttpRequest> {
        if self.status != SessionStatus::OpenAction {
            return Err(DxError::Usage("no assignment action is open".into()));
        }
        let root = self.resources.root().ok_or_else(|| {
            DxError::Usage(format!(
                "root component {} is not in the component map",
                self.resources.root_key()
            ))
        })?;
        if !validate_component(root, self.resources.components(), self.resources.fields()) {
            self.flash = VALIDATION_FAILED.to_string();
            return Err(DxError::Usage(VALIDATION_FAILED.into()));
        }
        let body = submission_body(self.resources.fields());
        Ok(request::submit_assignment_action(
            config,
            &self.access_token,
            &self.open_assignment_id,
            &self.open_action_id,
            &self.etag,
            body.as_ref(),
        ))
    }

    /// Fold a completed call into the session. Returns false when the call
    /// failed; [`Session::flash`] then says why.
    pub fn apply(&mut self, call: &Call, response: &NetResponse) -> bool {
        self.flash.clear();
        let (body, etag) = match response {
            NetResponse::Failed(message) => {
                warn!(call = call.verb(), %message, "DX call failed");
                self.flash = message.clone();
                return false;
            }
            NetResponse::Received { body, etag } => (body.as_str(), etag.as_str()),
        };

        let outcome = match call {
            Call::Login => parse_access_token(body).map(|token| {
                self.access_token = token;
                self.status = SessionStatus::LoggedIn;
            }),
            Call::RefreshCaseTypes => {
                self.case_types.clear();
                match parse_case_types(body) {
                    Ok(types) => {
                        self.case_types = types;
                        Ok(())
                    }
                    Err(DxError::NotConstellationCompatible) => {
                        self.flash = DxError::NotConstellationCompatible.to_string();
                        return false;
                    }
                    Err(e) => Err(e),
                }
            }
            Call::CreateCase { .. } => parse_dx_response(body).map(|resp| {
                self.install(resp);
                self.status = SessionStatus::OpenCase;
            }),
            Call::OpenAssignment { assignment_id } => parse_dx_response(body).map(|resp| {
                self.install(resp);
                self.etag = etag.to_string();
                self.open_assignment_id = assignment_id.clone();
                self.status = SessionStatus::OpenAssignment;
            }),
            Call::OpenAssignmentAction {
                assignment_id,
                action_id,
            } => parse_dx_response(body).map(|resp| {
                self.install(resp);
                self.etag = etag.to_string();
                self.open_assignment_id = assignment_id.clone();
                self.open_action_id = action_id.clone();
                self.status = SessionStatus::OpenAction;
            }),
            Call::SubmitAssignmentAction { assignment_id, .. } => {
                parse_dx_response(body).map(|resp| {
                    self.install(resp);
                    self.open_assignment_id = assignment_id.clone();
                    self.open_action_id.clear();
                    self.status = SessionStatus::OpenCase;
                })
            }
        };

        match outcome {
            Ok(()) => {
                debug!(call = call.verb(), status = ?self.status, "applied DX response");
                true
            }
            Err(e) => {
                warn!(call = call.verb(), code = e.code(), error = %e, "could not apply DX response");
                self.flash = format!("Failed to {}: {e}", call.verb());
                false
            }
        }
    }

    /// Replace the case snapshot. Resources are replaced only when the
    /// response carried them.
    fn install(&mut self, response: DxResponse) {
        self.case_info = response.case_info;
        if let Some(resources) = response.resources {
            self.resources = resources;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExplorerConfig {
        ExplorerConfig {
            server: "https://dx.example.com".into(),
            dx_api_path: "/api/v2".into(),
            token_endpoint: "/token".into(),
            ..Default::default()
        }
    }

    fn received(body: &str) -> NetResponse {
        NetResponse::Received {
            body: body.into(),
            etag: String::new(),
        }
    }

    #[test]
    fn login_sets_token_and_status() {
        let mut s = Session::new();
        assert!(s.apply(&Call::Login, &received(r#"{"access_token": "abc"}"#)));
        assert_eq!(s.status(), SessionStatus::LoggedIn);
        let req = s.request(&config(), &Call::RefreshCaseTypes).unwrap();
        assert_eq!(req.endpoint, "/api/v2/casetypes");
    }

    #[test]
    fn login_without_token_flashes() {
        let mut s = Session::new();
        assert!(!s.apply(&Call::Login, &received("{}")));
        assert_eq!(s.flash(), "Failed to login: No access token received.");
        assert_eq!(s.status(), SessionStatus::LoggedOut);
    }

    #[test]
    fn transport_failure_flashes_verbatim() {
        let mut s = Session::new();
        assert!(!s.apply(&Call::Login, &NetResponse::Failed("Connection".into())));
        assert_eq!(s.flash(), "Connection");
    }

    #[test]
    fn incompatible_app_flash_has_no_prefix() {
        let mut s = Session::new();
        assert!(!s.apply(&Call::RefreshCaseTypes, &received(r#"{"caseTypes": []}"#)));
        assert_eq!(
            s.flash(),
            "Not constellation compatible and/or no case types defined."
        );
        assert!(s.case_types().is_empty());
    }

    #[test]
    fn requests_need_a_token() {
        let s = Session::new();
        let err = s
            .request(&config(), &Call::OpenAssignment { assignment_id: "A-1".into() })
            .unwrap_err();
        assert!(err.to_string().contains("before logging in"));
        assert!(s.request(&config(), &Call::Login).is_ok());
    }

    #[test]
    fn submit_requires_an_open_action() {
        let mut s = Session::new();
        assert!(s.prepare_submit(&config()).is_err());
    }
}
