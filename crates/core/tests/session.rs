//! Session flow from login to submission, driven by canned transport
//! responses.

mod common;

use common::{ACTION_ID, ASSIGNMENT_ID, ROOT_KEY, action_response, case_response};
use dx_explorer_config::ExplorerConfig;
use dx_explorer_core::session::VALIDATION_FAILED;
use dx_explorer_core::{Call, HttpMethod, NetResponse, Session, SessionStatus};

fn config() -> ExplorerConfig {
    ExplorerConfig {
        user_id: "operator".into(),
        password: "secret".into(),
        server: "https://dx.example.com".into(),
        dx_api_path: "/prweb/api/application/v2".into(),
        token_endpoint: "/prweb/PRRestService/oauth2/v1/token".into(),
        client_id: "client".into(),
        client_secret: "client-secret".into(),
        ..Default::default()
    }
}

fn received(body: impl Into<String>, etag: &str) -> NetResponse {
    NetResponse::Received {
        body: body.into(),
        etag: etag.into(),
    }
}

fn open_action_call() -> Call {
    Call::OpenAssignmentAction {
        assignment_id: ASSIGNMENT_ID.into(),
        action_id: ACTION_ID.into(),
    }
}

/// A session with the fixture action open.
fn session_with_open_action() -> Session {
    let mut s = Session::new();
    assert!(s.apply(&Call::Login, &received(r#"{"access_token": "tok"}"#, "")));
    assert!(
        s.apply(&open_action_call(), &received(action_response(), "\"E2\"")),
        "flash: {}",
        s.flash()
    );
    s
}

#[test]
fn full_flow_reaches_submission() {
    let cfg = config();
    let mut s = Session::new();
    assert_eq!(s.status(), SessionStatus::LoggedOut);

    let login = s.request(&cfg, &Call::Login).unwrap();
    assert_eq!(login.method, HttpMethod::Post);
    assert!(s.apply(&Call::Login, &received(r#"{"access_token": "tok"}"#, "")));
    assert_eq!(s.status(), SessionStatus::LoggedIn);

    let types = r#"{"applicationIsConstellationCompatible": true,
                    "caseTypes": [{"ID": "Acme-Work-Claim", "name": "Claim"}]}"#;
    assert!(s.apply(&Call::RefreshCaseTypes, &received(types, "")));
    assert_eq!(s.case_types()[0].id, "Acme-Work-Claim");

    let create = Call::CreateCase {
        case_type_id: "Acme-Work-Claim".into(),
    };
    assert_eq!(s.request(&cfg, &create).unwrap().method, HttpMethod::Post);
    assert!(s.apply(&create, &received(case_response(), "")));
    assert_eq!(s.status(), SessionStatus::OpenCase);
    assert_eq!(s.case_info().business_id, "C-1");

    let open = Call::OpenAssignment {
        assignment_id: ASSIGNMENT_ID.into(),
    };
    assert!(s.apply(&open, &received(case_response(), "\"E1\"")));
    assert_eq!(s.status(), SessionStatus::OpenAssignment);
    assert_eq!(s.etag(), "\"E1\"");
    assert_eq!(s.open_assignment_id(), ASSIGNMENT_ID);

    assert!(s.apply(&open_action_call(), &received(action_response(), "\"E2\"")));
    assert_eq!(s.status(), SessionStatus::OpenAction);
    assert_eq!(s.open_action_id(), ACTION_ID);
    assert_eq!(s.resources().root_key(), ROOT_KEY);

    s.editor()
        .set("Acme-Work-Claim.Notes", "Call back on Monday")
        .unwrap();
    let submit = s.prepare_submit(&cfg).unwrap();
    assert_eq!(submit.method, HttpMethod::Patch);
    assert_eq!(
        submit.headers,
        vec![("if-match".to_string(), "\"E2\"".to_string())]
    );
    let body: serde_json::Value = serde_json::from_str(submit.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"content": {"Notes": "Call back on Monday"}})
    );

    let call = Call::SubmitAssignmentAction {
        assignment_id: ASSIGNMENT_ID.into(),
        action_id: ACTION_ID.into(),
    };
    assert!(s.apply(&call, &received(case_response(), "")));
    assert_eq!(s.status(), SessionStatus::OpenCase);
    assert!(s.open_action_id().is_empty());
    assert_eq!(
        s.resources().root_key(),
        ROOT_KEY,
        "a response without uiResources keeps the previous form"
    );
}

#[test]
fn empty_required_input_blocks_submit() {
    let mut s = session_with_open_action();
    let err = s.prepare_submit(&config()).unwrap_err();
    assert_eq!(err.to_string(), VALIDATION_FAILED);
    assert_eq!(s.flash(), VALIDATION_FAILED);
}

#[test]
fn required_input_behind_reference_is_not_enforced() {
    // CustomerName is required but reachable only through a reference.
    let mut s = session_with_open_action();
    s.editor().set("Acme-Work-Claim.Notes", "ok").unwrap();
    let customer = s.resources().fields().get("Acme-Work-Claim.CustomerName").unwrap();
    assert!(customer.data.is_empty());
    assert!(s.prepare_submit(&config()).is_ok());
}

#[test]
fn editing_unknown_field_fails() {
    let mut s = session_with_open_action();
    assert!(s.editor().set("Acme-Work-Claim.Ghost", "x").is_err());
}

#[test]
fn failed_parse_keeps_previous_snapshot() {
    let mut s = session_with_open_action();
    let before = s.resources().clone();

    assert!(!s.apply(&open_action_call(), &received("{\"data\": {}}", "\"E3\"")));
    assert!(
        s.flash().starts_with("Failed to open assignment action: "),
        "flash: {}",
        s.flash()
    );
    assert_eq!(s.status(), SessionStatus::OpenAction);
    assert_eq!(s.etag(), "\"E2\"");
    assert_eq!(s.resources(), &before);
}

#[test]
fn flash_clears_on_next_success() {
    let mut s = session_with_open_action();
    assert!(s.prepare_submit(&config()).is_err());
    assert!(!s.flash().is_empty());
    assert!(s.apply(&open_action_call(), &received(action_response(), "\"E4\"")));
    assert!(s.flash().is_empty());
}
