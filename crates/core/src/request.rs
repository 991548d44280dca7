//! Descriptors for the DX API calls the explorer makes.
//!
//! Nothing here performs I/O. Each builder returns an [`HttpRequest`] that a
//! transport can execute verbatim; the endpoint is relative to
//! [`ExplorerConfig::server`]. Ids in path segments are percent-encoded,
//! since assignment ids carry spaces and `!`.

use std::fmt;

use dx_explorer_config::ExplorerConfig;
use serde::Serialize;
use serde_json::{Value, json};
use urlencoding::encode;

use crate::error::{DxError, Result};
use crate::json::pretty;
use crate::tag::Tagged;

/// HTTP verb, with the same two-tier default as [`crate::model::ComponentKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Never set.
    #[default]
    Unspecified,
    /// Set from a tag that names no known verb.
    Unknown,
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `CONNECT`
    Connect,
}

impl Tagged for HttpMethod {
    const VARIANTS: &'static [Self] = &[
        Self::Unspecified,
        Self::Unknown,
        Self::Get,
        Self::Head,
        Self::Options,
        Self::Trace,
        Self::Put,
        Self::Delete,
        Self::Post,
        Self::Patch,
        Self::Connect,
    ];
    const TAGS: &'static [&'static str] = &[
        "Unspecified",
        "Unknown",
        "Get",
        "Head",
        "Options",
        "Trace",
        "Put",
        "Delete",
        "Post",
        "Patch",
        "Connect",
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl HttpMethod {
    /// Method name as sent on the wire.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Unknown => "UNKNOWN",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Which DX API call a request or response belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    /// OAuth 2 password grant.
    Login,
    /// List the application's case types.
    RefreshCaseTypes,
    /// Create a case of the given type.
    CreateCase {
        /// Case type to instantiate.
        case_type_id: String,
    },
    /// Open an assignment.
    OpenAssignment {
        /// Assignment to open.
        assignment_id: String,
    },
    /// Open one action of an assignment, fetching its form.
    OpenAssignmentAction {
        /// Owning assignment.
        assignment_id: String,
        /// Action to open.
        action_id: String,
    },
    /// Submit the form of an open action.
    SubmitAssignmentAction {
        /// Owning assignment.
        assignment_id: String,
        /// Action being submitted.
        action_id: String,
    },
}

impl Call {
    /// Phrase used in failure messages, as in `"Failed to <verb>: ..."`.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::RefreshCaseTypes => "refresh cases",
            Self::CreateCase { .. } => "create case",
            Self::OpenAssignment { .. } => "open assignment",
            Self::OpenAssignmentAction { .. } => "open assignment action",
            Self::SubmitAssignmentAction { .. } => "submit assignment action",
        }
    }
}

/// Credentials attached to a request. Secrets are never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Auth {
    /// HTTP basic auth with the OAuth client credentials.
    Basic {
        /// OAuth 2 client id.
        client_id: String,
        /// OAuth 2 client secret.
        #[serde(skip_serializing)]
        client_secret: String,
    },
    /// Bearer token from a previous login.
    Bearer {
        /// Access token.
        #[serde(skip_serializing)]
        token: String,
    },
}

/// A fully described HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpRequest {
    /// The call this request performs.
    pub call: Call,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Scheme and host.
    pub server: String,
    /// Path (and query) relative to `server`.
    pub endpoint: String,
    /// Extra headers, in the order they are sent.
    pub headers: Vec<(String, String)>,
    /// Request body, when the call sends one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// MIME type of `body`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<&'static str>,
    /// Authentication scheme.
    pub auth: Auth,
}

impl HttpRequest {
    /// Absolute URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.server, self.endpoint)
    }

    /// One-line summary, e.g. `"GET - https://host/prweb/api/v2/casetypes"`.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.method, self.url())
    }
}

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const APPLICATION_JSON: &str = "application/json";

/// OAuth 2 password-grant login against the token endpoint.
pub fn login(config: &ExplorerConfig) -> Result<HttpRequest> {
    let body = serde_urlencoded::to_string([
        ("grant_type", "password"),
        ("username", config.user_id.as_str()),
        ("password", config.password.as_str()),
    ])
    .map_err(|e| DxError::Usage(format!("cannot encode login form: {e}")))?;
    Ok(HttpRequest {
        call: Call::Login,
        method: HttpMethod::Post,
        server: config.server.clone(),
        endpoint: config.token_endpoint.clone(),
        headers: vec![("Accept".into(), APPLICATION_JSON.into())],
        body: Some(body),
        content_type: Some(FORM_URLENCODED),
        auth: Auth::Basic {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        },
    })
}

/// Common shape of every bearer-authenticated DX API call. `path` is
/// appended to `dx_api_path` and must already be encoded.
fn dx_call(
    config: &ExplorerConfig,
    token: &str,
    call: Call,
    method: HttpMethod,
    path: &str,
) -> HttpRequest {
    let endpoint = format!("{}{path}", config.dx_api_path);
    HttpRequest {
        call,
        method,
        server: config.server.clone(),
        endpoint,
        headers: Vec::new(),
        body: None,
        content_type: None,
        auth: Auth::Bearer {
            token: token.to_string(),
        },
    }
}

/// `GET <dx_api_path>/casetypes`
pub fn refresh_case_types(config: &ExplorerConfig, token: &str) -> HttpRequest {
    dx_call(
        config,
        token,
        Call::RefreshCaseTypes,
        HttpMethod::Get,
        "/casetypes",
    )
}

/// `POST <dx_api_path>/cases` with `{"caseTypeID": ...}`.
pub fn create_case(config: &ExplorerConfig, token: &str, case_type_id: &str) -> HttpRequest {
    let mut req = dx_call(
        config,
        token,
        Call::CreateCase {
            case_type_id: case_type_id.to_string(),
        },
        HttpMethod::Post,
        "/cases",
    );
    req.body = Some(pretty(&json!({ "caseTypeID": case_type_id })));
    req.content_type = Some(APPLICATION_JSON);
    req
}

/// `GET <dx_api_path>/assignments/<id>`
pub fn open_assignment(config: &ExplorerConfig, token: &str, assignment_id: &str) -> HttpRequest {
    dx_call(
        config,
        token,
        Call::OpenAssignment {
            assignment_id: assignment_id.to_string(),
        },
        HttpMethod::Get,
        &format!("/assignments/{}", encode(assignment_id)),
    )
}

fn action_path(assignment_id: &str, action_id: &str) -> String {
    format!(
        "/assignments/{}/actions/{}",
        encode(assignment_id),
        encode(action_id)
    )
}

/// `GET <dx_api_path>/assignments/<id>/actions/<action>`
pub fn open_assignment_action(
    config: &ExplorerConfig,
    token: &str,
    assignment_id: &str,
    action_id: &str,
) -> HttpRequest {
    dx_call(
        config,
        token,
        Call::OpenAssignmentAction {
            assignment_id: assignment_id.to_string(),
            action_id: action_id.to_string(),
        },
        HttpMethod::Get,
        &action_path(assignment_id, action_id),
    )
}

/// `PATCH <dx_api_path>/assignments/<id>/actions/<action>` guarded by the
/// etag from the open call. The body is omitted when `content` is `None`;
/// the request is still sent so the server advances the flow.
pub fn submit_assignment_action(
    config: &ExplorerConfig,
    token: &str,
    assignment_id: &str,
    action_id: &str,
    etag: &str,
    content: Option<&Value>,
) -> HttpRequest {
    let mut req = dx_call(
        config,
        token,
        Call::SubmitAssignmentAction {
            assignment_id: assignment_id.to_string(),
            action_id: action_id.to_string(),
        },
        HttpMethod::Patch,
        &action_path(assignment_id, action_id),
    );
    req.headers.push(("if-match".into(), etag.to_string()));
    req.body = content.map(pretty);
    req.content_type = Some(APPLICATION_JSON);
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExplorerConfig {
        ExplorerConfig {
            user_id: "operator@acme".into(),
            password: "p&ss word".into(),
            server: "https://dx.example.com".into(),
            dx_api_path: "/prweb/api/application/v2".into(),
            token_endpoint: "/prweb/PRRestService/oauth2/v1/token".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn wire_names_are_uppercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::from_tag("get").as_wire(), "GET");
    }

    #[test]
    fn login_posts_encoded_form_with_basic_auth() {
        let req = login(&config()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.url(),
            "https://dx.example.com/prweb/PRRestService/oauth2/v1/token"
        );
        assert_eq!(
            req.body.as_deref(),
            Some("grant_type=password&username=operator%40acme&password=p%26ss+word")
        );
        assert_eq!(req.content_type, Some(FORM_URLENCODED));
        assert!(matches!(req.auth, Auth::Basic { ref client_id, .. } if client_id == "client"));
    }

    #[test]
    fn dx_endpoints() {
        let cfg = config();
        assert_eq!(
            refresh_case_types(&cfg, "t").endpoint,
            "/prweb/api/application/v2/casetypes"
        );
        assert_eq!(
            open_assignment_action(&cfg, "t", "ASSIGN-WORKLIST C-1!FLOW", "Edit").endpoint,
            "/prweb/api/application/v2/assignments/ASSIGN-WORKLIST%20C-1%21FLOW/actions/Edit"
        );
        assert_eq!(
            open_assignment(&cfg, "t", "ASSIGN-WORKLIST ACME-WORK C-1!CREATE_FLOW").url(),
            "https://dx.example.com/prweb/api/application/v2/assignments/\
             ASSIGN-WORKLIST%20ACME-WORK%20C-1%21CREATE_FLOW"
        );
    }

    #[test]
    fn create_case_sends_pretty_json() {
        let req = create_case(&config(), "t", "Acme-Work-Claim");
        assert_eq!(
            req.body.as_deref(),
            Some("{\n  \"caseTypeID\": \"Acme-Work-Claim\"\n}")
        );
        assert_eq!(req.summary(), "POST - https://dx.example.com/prweb/api/application/v2/cases");
    }

    #[test]
    fn submit_carries_etag() {
        let req = submit_assignment_action(&config(), "t", "A-1", "Edit", "\"20240101\"", None);
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.headers, vec![("if-match".to_string(), "\"20240101\"".to_string())]);
        assert_eq!(req.body, None);
    }

    #[test]
    fn secrets_are_not_serialized() {
        let text = serde_json::to_string(&login(&config()).unwrap()).unwrap();
        assert!(!text.contains("secret"));
        let text = serde_json::to_string(&refresh_case_types(&config(), "tok123")).unwrap();
        assert!(!text.contains("tok123"));
    }
}
