//! Submission checks over a resolved component tree.
//!
//! Only the literal subtree is checked: reference nodes are not followed into
//! their targets, so a required input reachable only through a reference is
//! not enforced here. Rendering and the walks in [`crate::walk`] do follow
//! references.

use dx_explorer_diagnostics::{Diagnostic, codes};
use tracing::warn;

use crate::model::{Component, ComponentMap, FieldCatalog};

/// True when every required, bound input in `component`'s subtree has a
/// non-empty value. Stops at the first failure.
///
/// A required input with no catalog entry can never be satisfied and fails.
#[allow(clippy::only_used_in_recursion)]
pub fn validate_component(
    component: &Component,
    components: &ComponentMap,
    fields: &FieldCatalog,
) -> bool {
    is_satisfied(component, fields)
        && component
            .children
            .iter()
            .all(|child| validate_component(child, components, fields))
}

fn is_satisfied(component: &Component, fields: &FieldCatalog) -> bool {
    if !component.kind.is_input() || !component.is_required {
        return true;
    }
    match fields.get(&component.key) {
        Some(field) => !field.data.is_empty(),
        None => {
            warn!(key = %component.key, "required input has no field in the catalog");
            false
        }
    }
}

/// Every input in `component`'s subtree that blocks submission, in document
/// order. Empty exactly when [`validate_component`] returns true.
pub fn missing_required(component: &Component, fields: &FieldCatalog) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    collect_missing(component, fields, &mut out);
    out
}

fn collect_missing(component: &Component, fields: &FieldCatalog, out: &mut Vec<Diagnostic>) {
    if component.kind.is_input() && component.is_required {
        match fields.get(&component.key) {
            Some(field) if field.data.is_empty() => out.push(Diagnostic::error(
                codes::REQUIRED_FIELD_EMPTY,
                format!("{} is required", display_name(component)),
                Some(component.key.clone()),
            )),
            Some(_) => {}
            None => out.push(Diagnostic::error(
                codes::REQUIRED_FIELD_MISSING,
                format!(
                    "{} is required but has no field in the catalog",
                    display_name(component)
                ),
                Some(component.key.clone()),
            )),
        }
    }
    for child in &component.children {
        collect_missing(child, fields, out);
    }
}

fn display_name(component: &Component) -> &str {
    if component.label.is_empty() {
        &component.key
    } else {
        &component.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentKind, Field};

    fn input(key: &str, required: bool) -> Component {
        Component {
            kind: ComponentKind::TextInput,
            key: key.into(),
            label: key.into(),
            is_required: required,
            ..Default::default()
        }
    }

    fn view(children: Vec<Component>) -> Component {
        Component {
            kind: ComponentKind::View,
            key: "Case.MainView".into(),
            children,
            ..Default::default()
        }
    }

    fn catalog(data: &str) -> FieldCatalog {
        [Field {
            id: "Name".into(),
            class_id: "Case".into(),
            label: "Name".into(),
            data: data.into(),
            ..Default::default()
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn required_empty_field_blocks_submission() {
        let root = view(vec![input("Case.Name", true)]);
        let mut fields = catalog("");
        let map = ComponentMap::new();
        assert!(!validate_component(&root, &map, &fields));
        assert_eq!(missing_required(&root, &fields).len(), 1);

        fields.set_value("Case.Name", "Acme").unwrap();
        assert!(validate_component(&root, &map, &fields));
        assert!(missing_required(&root, &fields).is_empty());
    }

    #[test]
    fn optional_empty_field_never_fails() {
        let root = view(vec![input("Case.Name", false)]);
        assert!(validate_component(&root, &ComponentMap::new(), &catalog("")));
    }

    #[test]
    fn required_input_without_field_fails() {
        let root = view(vec![input("Case.Ghost", true)]);
        let fields = catalog("Acme");
        assert!(!validate_component(&root, &ComponentMap::new(), &fields));
        let missing = missing_required(&root, &fields);
        assert_eq!(missing[0].id, codes::REQUIRED_FIELD_MISSING);
    }

    #[test]
    fn references_are_not_followed() {
        let target = view(vec![input("Case.Name", true)]);
        let mut map = ComponentMap::new();
        map.insert(target.key.clone(), target);
        let reference = Component {
            kind: ComponentKind::Reference,
            key: "Case.MainView".into(),
            ..Default::default()
        };
        let root = Component {
            kind: ComponentKind::View,
            key: "Case.Outer".into(),
            children: vec![reference],
            ..Default::default()
        };
        assert!(validate_component(&root, &map, &catalog("")));
    }
}
