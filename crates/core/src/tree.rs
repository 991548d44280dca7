//! Recursive construction of resolved components from view JSON.

use serde_json::Value;
use tracing::{debug, warn};

use crate::content::ContentStore;
use crate::error::{DxError, Result};
use crate::json::{flag, optional_array, optional_str, pretty, required_object, required_str};
use crate::model::{
    Component, ComponentKind, ComponentMap, FieldCatalog, ParagraphMap, debug_string,
    debug_string_with_ref, make_key,
};
use crate::resolve::{NameMode, class_context, resolve_instructions, resolve_label, resolve_name};
use crate::tag::Tagged;

/// Builds component trees against one response's content and field catalog,
/// registering every keyed node into a flat [`ComponentMap`].
///
/// Reference nodes are not registered: their key names their target, and
/// registering them would shadow the target in the map.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    content: &'a ContentStore,
    fields: &'a FieldCatalog,
    paragraphs: &'a ParagraphMap,
    components: ComponentMap,
}

static NO_PARAGRAPHS: ParagraphMap = ParagraphMap::new();

impl<'a> TreeBuilder<'a> {
    /// Builder over a content store and the already-built field catalog.
    pub fn new(content: &'a ContentStore, fields: &'a FieldCatalog) -> Self {
        Self {
            content,
            fields,
            paragraphs: &NO_PARAGRAPHS,
            components: ComponentMap::new(),
        }
    }

    /// Resolve `@PARAGRAPH` instructions against `paragraphs`.
    #[must_use]
    pub fn with_paragraphs(mut self, paragraphs: &'a ParagraphMap) -> Self {
        self.paragraphs = paragraphs;
        self
    }

    /// Build one node and its subtree.
    ///
    /// `parent_class_id` is empty for a top-level view entry. Any failure
    /// aborts the whole subtree; nothing from a failed node is registered.
    pub fn build(&mut self, json: &Value, parent_class_id: &str) -> Result<Component> {
        let mut map = ComponentMap::new();
        let component = self.build_node(json, parent_class_id, &mut map)?;
        self.components.append(&mut map);
        Ok(component)
    }

    /// Components registered so far.
    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    /// Finish building and hand back the component map.
    pub fn finish(self) -> ComponentMap {
        self.components
    }

    fn build_node(
        &self,
        json: &Value,
        parent_class_id: &str,
        registry: &mut ComponentMap,
    ) -> Result<Component> {
        let type_tag = required_str(json, "type", "component")?;
        let mut c = Component {
            kind: ComponentKind::from_tag(&type_tag),
            json: pretty(json),
            ..Default::default()
        };

        match c.kind {
            ComponentKind::Unknown => {
                c.class_id = parent_class_id.to_string();
                c.name = type_tag.clone();
                c.broken = Some(format!("Unsupported component type: {type_tag}"));
                warn!(component_type = %type_tag, "unsupported component type");
                c.debug_string = debug_string(c.kind, &c.name);
            }
            ComponentKind::Reference => {
                c.class_id = parent_class_id.to_string();
                let config = required_object(json, "config", "component")?;
                let raw_name = required_str(config, "name", "component.config")?;
                c.name = resolve_name(&raw_name, self.content, &c.class_id, NameMode::Dereference)?;
                c.ref_kind =
                    ComponentKind::from_tag(&required_str(config, "type", "component.config")?);

                if let Some(context) = optional_str(config, "context", "component.config")? {
                    match class_context(&context) {
                        Some(class_id) => c.class_id = class_id.to_string(),
                        None => {
                            warn!(name = %c.name, %context, "reference uses unsupported context");
                            c.broken = Some(format!("Unsupported context: {context}"));
                        }
                    }
                }
                c.debug_string = debug_string_with_ref(c.kind, &c.name, c.ref_kind);
            }
            ComponentKind::Region => {
                c.class_id = parent_class_id.to_string();
                let raw_name = match non_empty_str(json, "name", "component")? {
                    Some(name) => name,
                    None => {
                        let config = required_object(json, "config", "component")?;
                        match non_empty_str(config, "id", "component.config")? {
                            Some(id) => id,
                            None => required_str(config, "name", "component.config")?,
                        }
                    }
                };
                c.name = resolve_name(&raw_name, self.content, &c.class_id, NameMode::Dereference)?;
                c.instructions = self.instructions(json)?;
                c.debug_string = debug_string(c.kind, &c.name);
            }
            ComponentKind::View => {
                c.class_id = required_str(json, "classID", "component")?;
                let raw_name = required_str(json, "name", "component")?;
                c.name = resolve_name(&raw_name, self.content, &c.class_id, NameMode::Dereference)?;
                if let Some(config) = json.get("config")
                    && let Some(template) = optional_str(config, "template", "component.config")?
                {
                    c.ref_kind = ComponentKind::from_tag(&template);
                }
                c.instructions = self.instructions(json)?;
                c.debug_string = debug_string_with_ref(c.kind, &c.name, c.ref_kind);
            }
            ComponentKind::TextArea | ComponentKind::TextInput => {
                c.class_id = parent_class_id.to_string();
                let config = required_object(json, "config", "component")?;
                let raw_value = required_str(config, "value", "component.config")?;
                c.name = resolve_name(&raw_value, self.content, &c.class_id, NameMode::PropertyName)?;
                let raw_label = required_str(config, "label", "component.config")?;
                c.label = resolve_label(&raw_label, self.fields, &c.class_id)?;
                c.is_disabled = flag(config, "disabled");
                c.is_readonly = flag(config, "readOnly");
                c.is_required = flag(config, "required");
                c.debug_string = debug_string(c.kind, &c.label);
            }
            ComponentKind::Unspecified | ComponentKind::DefaultForm => {}
        }

        let reason = if c.name.is_empty() {
            Some("empty name")
        } else if c.class_id.is_empty() {
            Some("empty class id")
        } else if c.kind == ComponentKind::Unspecified {
            Some("unspecified type")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(DxError::Construction {
                reason: reason.to_string(),
                json: c.json,
            });
        }
        c.key = make_key(&c.class_id, &c.name);

        for child in optional_array(json, "children", "component")? {
            let built = self.build_node(child, &c.class_id, registry)?;
            c.children.push(built);
        }

        if c.kind != ComponentKind::Reference {
            debug!(key = %c.key, kind = %c.kind, "registered component");
            registry.insert(c.key.clone(), c.clone());
        }
        Ok(c)
    }

    /// Optional `config.instructions`, resolved; empty when absent.
    fn instructions(&self, json: &Value) -> Result<String> {
        let Some(config) = json.get("config") else {
            return Ok(String::new());
        };
        match non_empty_str(config, "instructions", "component.config")? {
            Some(raw) => Ok(resolve_instructions(&raw, self.paragraphs)?),
            None => Ok(String::new()),
        }
    }
}

/// An optional string attribute, with `""` treated as absent.
fn non_empty_str(json: &Value, key: &str, at: &str) -> Result<Option<String>> {
    Ok(optional_str(json, key, at)?.filter(|s| !s.is_empty()))
}
