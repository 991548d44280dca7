//! Top-level parsing of DX API response bodies.
//!
//! A case-bearing response is assembled in a fixed order: case metadata,
//! assignments and actions, content, then (when `uiResources` is present)
//! fields, paragraphs, views, and the root pointer. Fields and paragraphs
//! come before views because `@FL` labels and `@PARAGRAPH` instructions read
//! them; content comes before all three because names and initial values
//! read it.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::build_field_catalog;
use crate::content::ContentStore;
use crate::error::{DxError, ResolutionError, Result};
use crate::json::{
    flag, optional_array, optional_object, optional_str, required_object, required_str,
};
use crate::model::{
    Action, Assignment, CaseInfo, CaseType, ComponentMap, FieldCatalog, Paragraph, ParagraphMap,
    ResourceBundle, make_key,
};
use crate::tree::TreeBuilder;

/// The only root context the explorer can render.
pub const ROOT_CONTEXT: &str = "caseInfo.content";
/// The only root type the explorer can render.
pub const ROOT_TYPE: &str = "view";

/// Model snapshot produced from one case-bearing response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DxResponse {
    /// Case metadata, assignments, and content.
    pub case_info: CaseInfo,
    /// Present when the response carried `uiResources`.
    pub resources: Option<ResourceBundle>,
}

/// Parse and assemble a response body.
pub fn parse_dx_response(body: &str) -> Result<DxResponse> {
    let doc: Value = serde_json::from_str(body)?;
    assemble(&doc)
}

/// Assemble an already-parsed response document.
pub fn assemble(doc: &Value) -> Result<DxResponse> {
    let data = required_object(doc, "data", "")?;
    let info = required_object(data, "caseInfo", "data")?;
    let case_info = parse_case_info(info)?;

    let resources = match doc.get("uiResources") {
        None | Some(Value::Null) => None,
        Some(ui) => Some(parse_ui_resources(ui, &case_info.content)?),
    };
    debug!(
        case = %case_info.id,
        assignments = case_info.assignments.len(),
        has_resources = resources.is_some(),
        "assembled DX response"
    );
    Ok(DxResponse {
        case_info,
        resources,
    })
}

fn parse_case_info(info: &Value) -> Result<CaseInfo> {
    const AT: &str = "data.caseInfo";
    let mut case_info = CaseInfo {
        id: required_str(info, "ID", AT)?,
        business_id: required_str(info, "businessID", AT)?,
        case_type: CaseType {
            id: required_str(info, "caseTypeID", AT)?,
            name: required_str(info, "caseTypeName", AT)?,
        },
        create_time: required_str(info, "createTime", AT)?,
        created_by: required_str(info, "createdBy", AT)?,
        last_update_time: required_str(info, "lastUpdateTime", AT)?,
        last_updated_by: required_str(info, "lastUpdatedBy", AT)?,
        name: required_str(info, "name", AT)?,
        owner: required_str(info, "owner", AT)?,
        status: required_str(info, "status", AT)?,
        ..Default::default()
    };

    for assignment in optional_array(info, "assignments", AT)? {
        let assignment = parse_assignment(assignment)?;
        case_info
            .assignments
            .insert(assignment.id.clone(), assignment);
    }

    if let Some(content) = optional_object(info, "content", AT)? {
        case_info.content = ContentStore::from_json(content);
    }
    Ok(case_info)
}

fn parse_assignment(json: &Value) -> Result<Assignment> {
    const AT: &str = "data.caseInfo.assignments";
    let mut assignment = Assignment {
        id: required_str(json, "ID", AT)?,
        name: required_str(json, "name", AT)?,
        can_perform: flag(json, "canPerform"),
        ..Default::default()
    };
    let at = format!("{AT}.actions");
    for action in optional_array(json, "actions", AT)? {
        let action = Action {
            id: required_str(action, "ID", &at)?,
            name: required_str(action, "name", &at)?,
            action_type: required_str(action, "type", &at)?,
        };
        assignment.actions.insert(action.id.clone(), action);
    }
    Ok(assignment)
}

fn parse_ui_resources(ui: &Value, content: &ContentStore) -> Result<ResourceBundle> {
    let resources = required_object(ui, "resources", "uiResources")?;
    let empty = Map::new();

    let fields_json = optional_object(resources, "fields", "uiResources.resources")?;
    let fields = build_field_catalog(fields_json.unwrap_or(&empty), content)?;

    let paragraphs_json = optional_object(resources, "paragraphs", "uiResources.resources")?;
    let paragraphs = parse_paragraphs(paragraphs_json.unwrap_or(&empty))?;

    let views_json = optional_object(resources, "views", "uiResources.resources")?;
    let components = build_views(views_json.unwrap_or(&empty), content, &fields, &paragraphs)?;

    let root_key = root_key(ui, content)?;
    if !components.contains_key(&root_key) {
        warn!(root = %root_key, "root component is not in the component map");
    }
    Ok(ResourceBundle::new(fields, components, root_key).with_paragraphs(paragraphs))
}

/// Paragraphs keyed by resource name; the first entry of each group wins.
fn parse_paragraphs(paragraphs: &Map<String, Value>) -> Result<ParagraphMap> {
    let mut out = ParagraphMap::new();
    for (name, entries) in paragraphs {
        let at = format!("uiResources.resources.paragraphs.{name}");
        let Some(first) = entries
            .as_array()
            .ok_or_else(|| DxError::malformed(&at, "expected an array"))?
            .first()
        else {
            continue;
        };
        let paragraph = Paragraph {
            name: optional_str(first, "name", &at)?.unwrap_or_else(|| name.clone()),
            class_id: optional_str(first, "classID", &at)?.unwrap_or_default(),
            content: required_str(first, "content", &at)?,
        };
        out.insert(name.clone(), paragraph);
    }
    debug!(paragraphs = out.len(), "parsed paragraphs");
    Ok(out)
}

fn build_views(
    views: &Map<String, Value>,
    content: &ContentStore,
    fields: &FieldCatalog,
    paragraphs: &ParagraphMap,
) -> Result<ComponentMap> {
    let mut builder = TreeBuilder::new(content, fields).with_paragraphs(paragraphs);
    for (name, entries) in views {
        let at = format!("uiResources.resources.views.{name}");
        let entries = entries
            .as_array()
            .ok_or_else(|| DxError::malformed(&at, "expected an array"))?;
        for entry in entries {
            builder.build(entry, "")?;
        }
    }
    Ok(builder.finish())
}

fn root_key(ui: &Value, content: &ContentStore) -> Result<String> {
    const AT: &str = "uiResources.root.config";
    let root = required_object(ui, "root", "uiResources")?;
    let config = required_object(root, "config", "uiResources.root")?;

    let context = required_str(config, "context", AT)?;
    if context != ROOT_CONTEXT {
        return Err(DxError::UnsupportedRoot {
            what: "context",
            value: context,
        });
    }
    let name = required_str(config, "name", AT)?;
    let root_type = required_str(config, "type", AT)?;
    if root_type != ROOT_TYPE {
        return Err(DxError::UnsupportedRoot {
            what: "type",
            value: root_type,
        });
    }

    let class_id = content
        .class_id()
        .ok_or_else(|| ResolutionError::MissingClassId { name: name.clone() })?;
    Ok(make_key(class_id, &name))
}

/// Case types from a `/casetypes` response body.
///
/// The application must declare itself constellation compatible and list its
/// case types; anything else is [`DxError::NotConstellationCompatible`].
pub fn parse_case_types(body: &str) -> Result<Vec<CaseType>> {
    let doc: Value = serde_json::from_str(body)?;
    let compatible = doc
        .get("applicationIsConstellationCompatible")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let Some(items) = doc.get("caseTypes").filter(|_| compatible) else {
        return Err(DxError::NotConstellationCompatible);
    };
    let items = items
        .as_array()
        .ok_or_else(|| DxError::malformed("caseTypes", "expected an array"))?;
    items
        .iter()
        .map(|item| {
            Ok(CaseType {
                id: required_str(item, "ID", "caseTypes")?,
                name: required_str(item, "name", "caseTypes")?,
            })
        })
        .collect()
}

/// Access token from an OAuth 2 token response body.
pub fn parse_access_token(body: &str) -> Result<String> {
    let doc: Value = serde_json::from_str(body)?;
    match doc.get("access_token") {
        Some(Value::String(token)) => Ok(token.clone()),
        Some(_) => Err(DxError::malformed("access_token", "expected a string")),
        None => Err(DxError::NoAccessToken),
    }
}
