//! Field catalog construction from `uiResources.resources.fields`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::content::{ContentStore, LookupMode};
use crate::error::{DxError, Result};
use crate::json::{flag, pretty, required_str};
use crate::model::{Field, FieldCatalog};

/// Build the field catalog.
///
/// `fields` maps each property name to an array of entries (the server repeats
/// a property once per grouping it appears in). Entries whose `type` is
/// `"Unknown"` are malformed placeholders and are skipped. Each field's value
/// is seeded from content with a lenient lookup; later entries with the same
/// composite key replace earlier ones.
pub fn build_field_catalog(
    fields: &Map<String, Value>,
    content: &ContentStore,
) -> Result<FieldCatalog> {
    let mut catalog = FieldCatalog::new();
    for (id, entries) in fields {
        let at = format!("uiResources.resources.fields.{id}");
        let entries = entries
            .as_array()
            .ok_or_else(|| DxError::malformed(&at, "expected an array"))?;

        for entry in entries {
            let field_type = required_str(entry, "type", &at)?;
            if field_type.eq_ignore_ascii_case("unknown") {
                warn!(field = %id, "skipping field entry of unknown type");
                continue;
            }

            let class_id = required_str(entry, "classID", &at)?;
            let data = content.get(&class_id, id, LookupMode::Lenient)?;
            catalog.insert(Field {
                id: id.clone(),
                label: required_str(entry, "label", &at)?,
                field_type,
                data,
                json: pretty(entry),
                is_special: flag(entry, "isSpecial"),
                is_class_key: flag(entry, "isClassKey"),
                is_dirty: false,
                class_id,
            });
        }
    }
    debug!(fields = catalog.len(), "built field catalog");
    Ok(catalog)
}
