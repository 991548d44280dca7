//! PATCH body for submitting an assignment action.

use serde_json::{Map, Value, json};

use crate::model::FieldCatalog;

/// `{"content": {<field id>: <data>, ...}}` for every dirty field that the
/// server lets clients write, or `None` when nothing was edited.
///
/// Special fields and class keys are never sent even when dirty.
pub fn submission_body(fields: &FieldCatalog) -> Option<Value> {
    let content: Map<String, Value> = fields
        .dirty()
        .filter(|f| !f.is_special && !f.is_class_key)
        .map(|f| (f.id.clone(), Value::String(f.data.clone())))
        .collect();
    if content.is_empty() {
        None
    } else {
        Some(json!({ "content": content }))
    }
}
