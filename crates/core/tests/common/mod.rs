//! Shared fixtures for `dx_explorer_core` integration tests.

#![allow(unreachable_pub)]

use serde_json::{Value, json};

pub const CLASS_ID: &str = "Acme-Work-Claim";
pub const ROOT_KEY: &str = "Acme-Work-Claim.EnterDetails";
pub const ASSIGNMENT_ID: &str = "ASSIGN-WORKLIST ACME-WORK C-1!CREATE_FLOW";
pub const ACTION_ID: &str = "EnterDetails";

// ─── Case info ───────────────────────────────────────────────────────────────

/// `data.caseInfo` of a freshly created claim.
pub fn case_info() -> Value {
    json!({
        "ID": "ACME-WORK C-1",
        "businessID": "C-1",
        "caseTypeID": CLASS_ID,
        "caseTypeName": "Claim",
        "createTime": "2024-05-01T10:00:00.000Z",
        "createdBy": "operator",
        "lastUpdateTime": "2024-05-01T10:05:00.000Z",
        "lastUpdatedBy": "operator",
        "name": "Claim",
        "owner": "operator",
        "status": "New",
        "assignments": [{
            "ID": ASSIGNMENT_ID,
            "name": "Enter details",
            "canPerform": "true",
            "actions": [{"ID": ACTION_ID, "name": "Enter details", "type": "FlowAction"}]
        }],
        "content": {
            "classID": CLASS_ID,
            "pyID": "C-1",
            "CustomerName": "",
            "Amount": 125.5,
            "Urgent": true,
            "pyViewName": "Details",
            "Nested": {"a": 1}
        }
    })
}

/// Response to create-case or open-assignment: case info only.
#[allow(dead_code)]
pub fn case_response() -> String {
    json!({"data": {"caseInfo": case_info()}}).to_string()
}

// ─── UI resources ────────────────────────────────────────────────────────────

/// Response to open-assignment-action.
///
/// The root view holds a required `Notes` input and a reference to the
/// `Details` view, which holds a second required input, a read-only special
/// field, and a component type the explorer does not model.
pub fn action_document() -> Value {
    json!({
        "data": {"caseInfo": case_info()},
        "uiResources": {
            "resources": {
                "fields": {
                    "CustomerName": [{"classID": CLASS_ID, "type": "Text", "label": "Customer name"}],
                    "Notes": [{"classID": CLASS_ID, "type": "Text", "label": "Notes"}],
                    "pyID": [{"classID": CLASS_ID, "type": "Identifier", "label": "Case ID",
                              "isSpecial": true}],
                    "Amount": [{"classID": CLASS_ID, "type": "Decimal", "label": "Amount"}],
                    "Placeholder": [{"type": "Unknown"}]
                },
                "views": {
                    "EnterDetails": [{
                        "type": "View", "name": "EnterDetails", "classID": CLASS_ID,
                        "config": {"template": "DefaultForm"},
                        "children": [{
                            "type": "Region", "name": "Main",
                            "children": [
                                {"type": "reference",
                                 "config": {"name": "@P .pyViewName", "type": "view"}},
                                {"type": "TextArea",
                                 "config": {"value": "@P .Notes", "label": "@FL .Notes",
                                            "required": true}}
                            ]
                        }]
                    }],
                    "Details": [{
                        "type": "View", "name": "Details", "classID": CLASS_ID,
                        "config": {"template": "DefaultForm"},
                        "children": [{
                            "type": "Region", "name": "Fields",
                            "children": [
                                {"type": "TextInput",
                                 "config": {"value": "@P .CustomerName", "label": "@L Customer",
                                            "required": true}},
                                {"type": "TextInput",
                                 "config": {"value": "@P .pyID", "label": "@FL .pyID",
                                            "readOnly": "true"}},
                                {"type": "Currency", "config": {"value": "@P .Amount"}}
                            ]
                        }]
                    }]
                }
            },
            "root": {
                "type": "reference",
                "config": {"context": "caseInfo.content", "name": "EnterDetails", "type": "view"}
            }
        }
    })
}

#[allow(dead_code)]
pub fn action_response() -> String {
    action_document().to_string()
}

/// The smallest document with UI resources: one view and its root pointer.
#[allow(dead_code)]
pub fn minimal_document() -> Value {
    json!({
        "data": {"caseInfo": {
            "ID": "C-9", "businessID": "C-9", "caseTypeID": "Case", "caseTypeName": "Case",
            "createTime": "", "createdBy": "", "lastUpdateTime": "", "lastUpdatedBy": "",
            "name": "Case", "owner": "", "status": "New",
            "assignments": [],
            "content": {"classID": "Case"}
        }},
        "uiResources": {
            "resources": {
                "fields": {},
                "views": {"MainView": [{"type": "View", "name": "MainView", "classID": "Case"}]}
            },
            "root": {"config": {"context": "caseInfo.content", "name": "MainView", "type": "view"}}
        }
    })
}
