use std::collections::BTreeMap;

use serde::Serialize;

use crate::content::ContentStore;

/// A flow action available on an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Action id (e.g. `"EnterDetails"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Action type as sent by the server (e.g. `"FlowAction"`).
    #[serde(rename = "type")]
    pub action_type: String,
}

/// A unit of work routed to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Assignment id (the instance key of the assignment).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the operator may perform this assignment.
    pub can_perform: bool,
    /// Actions keyed by action id.
    pub actions: BTreeMap<String, Action>,
}

/// A case type the server allows the operator to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseType {
    /// Case type id (the work class).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Case metadata, its assignments, and its content.
///
/// Rebuilt wholesale from every case-bearing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseInfo {
    /// Server-assigned case id (instance key).
    pub id: String,
    /// Business-facing id (e.g. `"C-123"`).
    pub business_id: String,
    /// Case type.
    pub case_type: CaseType,
    /// Creation timestamp, as sent.
    pub create_time: String,
    /// Operator that created the case.
    pub created_by: String,
    /// Last update timestamp, as sent.
    pub last_update_time: String,
    /// Operator that last updated the case.
    pub last_updated_by: String,
    /// Case name.
    pub name: String,
    /// Owning operator.
    pub owner: String,
    /// Case status (e.g. `"New"`).
    pub status: String,
    /// Assignments keyed by assignment id.
    pub assignments: BTreeMap<String, Assignment>,
    /// Case content.
    pub content: ContentStore,
}

impl CaseInfo {
    /// Action by assignment id and action id.
    pub fn action(&self, assignment_id: &str, action_id: &str) -> Option<&Action> {
        self.assignments.get(assignment_id)?.actions.get(action_id)
    }
}
