//! Reference-following traversals of a resolved component tree.
//!
//! Unlike [`crate::validate`], these walks step through non-broken reference
//! nodes into their targets in the flat component map. A target that is
//! absent from the map is reported and skipped. A reference whose key is
//! already on the current path (the root included) is reported as a cycle
//! and not followed again.

use std::collections::{BTreeMap, HashSet};

use dx_explorer_diagnostics::{Diagnostic, codes};
use serde::Serialize;
use tracing::warn;

use crate::model::{Component, ComponentKind, ComponentMap, Field, FieldCatalog, is_editable};

/// What a [`WalkStep`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A component was visited.
    Node,
    /// The reference's target key is absent from the component map.
    MissingTarget,
    /// The reference's target is already on the current path.
    Cycle,
}

/// One line of a debug walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkStep<'a> {
    /// Nesting depth; references add one level for their target.
    pub depth: usize,
    /// The visited component, or the reference for non-`Node` steps.
    pub component: &'a Component,
    /// What happened at this step.
    pub kind: StepKind,
}

/// Depth-first debug walk from `root`.
pub fn walk<'a>(root: &'a Component, components: &'a ComponentMap) -> Vec<WalkStep<'a>> {
    let mut walker = DebugWalker {
        components,
        active: HashSet::from([root.key.as_str()]),
        steps: Vec::new(),
    };
    walker.visit(root, 0);
    walker.steps
}

struct DebugWalker<'a> {
    components: &'a ComponentMap,
    active: HashSet<&'a str>,
    steps: Vec<WalkStep<'a>>,
}

impl<'a> DebugWalker<'a> {
    fn visit(&mut self, component: &'a Component, depth: usize) {
        self.steps.push(WalkStep {
            depth,
            component,
            kind: StepKind::Node,
        });
        if component.kind == ComponentKind::Reference && !component.is_broken() {
            self.follow(component, depth + 1);
        }
        for child in &component.children {
            self.visit(child, depth + 1);
        }
    }

    fn follow(&mut self, reference: &'a Component, depth: usize) {
        let kind = match target(reference, self.components, &self.active) {
            Ok(found) => {
                self.active.insert(&reference.key);
                self.visit(found, depth);
                self.active.remove(reference.key.as_str());
                return;
            }
            Err(kind) => kind,
        };
        self.steps.push(WalkStep {
            depth,
            component: reference,
            kind,
        });
    }
}

/// Reference target lookup shared by both walks.
fn target<'a>(
    reference: &Component,
    components: &'a ComponentMap,
    active: &HashSet<&str>,
) -> Result<&'a Component, StepKind> {
    if active.contains(reference.key.as_str()) {
        warn!(key = %reference.key, "reference cycle");
        return Err(StepKind::Cycle);
    }
    components.get(&reference.key).ok_or_else(|| {
        warn!(key = %reference.key, "reference target is missing");
        StepKind::MissingTarget
    })
}

/// Structural diagnostics for the tree reachable from `root`: broken nodes,
/// views whose children cannot be rendered, missing targets, and cycles.
pub fn inspect(root: &Component, components: &ComponentMap) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for step in walk(root, components) {
        let c = step.component;
        let path = Some(c.key.clone());
        match step.kind {
            StepKind::Node => {
                if let Some(reason) = c.broken_reason() {
                    let (code, what) = if c.kind == ComponentKind::Reference {
                        (codes::UNSUPPORTED_CONTEXT, "context")
                    } else {
                        (codes::UNKNOWN_COMPONENT_TYPE, "type")
                    };
                    let mut diag = Diagnostic::warn(code, reason, path);
                    // Broken reasons read "<summary>: <offending value>".
                    if let Some((_, value)) = reason.split_once(": ") {
                        diag = diag.with_context(context(&[(what, value)]));
                    }
                    out.push(diag);
                } else if c.kind == ComponentKind::View && !c.ref_kind.is_supported_template() {
                    out.push(Diagnostic::info(
                        codes::UNSUPPORTED_TEMPLATE,
                        format!("view {} has no supported template", c.name),
                        path,
                    ));
                }
            }
            StepKind::MissingTarget => out.push(
                Diagnostic::warn(
                    codes::MISSING_REFERENCE_TARGET,
                    format!("reference target {} is not in the component map", c.key),
                    path,
                )
                .with_context(context(&[
                    ("target", c.key.as_str()),
                    ("depth", step.depth.to_string().as_str()),
                ])),
            ),
            StepKind::Cycle => out.push(
                Diagnostic::warn(
                    codes::REFERENCE_CYCLE,
                    format!("reference to {} leads back to itself", c.key),
                    path,
                )
                .with_context(context(&[
                    ("target", c.key.as_str()),
                    ("depth", step.depth.to_string().as_str()),
                ])),
            ),
        }
    }
    out
}

fn context(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

/// An input a renderer would draw for the form.
#[derive(Debug, Clone, Copy)]
pub struct FormInput<'a> {
    /// The input component.
    pub component: &'a Component,
    /// Its bound field, when present in the catalog.
    pub field: Option<&'a Field>,
    /// Whether the renderer offers an editable control.
    pub editable: bool,
}

/// Inputs reachable from `root` the way the form is rendered: references are
/// followed, and the children of a view without a supported template are
/// skipped.
pub fn form_inputs<'a>(
    root: &'a Component,
    components: &'a ComponentMap,
    fields: &'a FieldCatalog,
) -> Vec<FormInput<'a>> {
    let mut walker = FormWalker {
        components,
        fields,
        active: HashSet::from([root.key.as_str()]),
        inputs: Vec::new(),
    };
    walker.visit(root);
    walker.inputs
}

struct FormWalker<'a> {
    components: &'a ComponentMap,
    fields: &'a FieldCatalog,
    active: HashSet<&'a str>,
    inputs: Vec<FormInput<'a>>,
}

impl<'a> FormWalker<'a> {
    fn visit(&mut self, component: &'a Component) {
        match component.kind {
            ComponentKind::Reference => {
                if component.is_broken() {
                    return;
                }
                if let Ok(found) = target(component, self.components, &self.active) {
                    self.active.insert(&component.key);
                    self.visit(found);
                    self.active.remove(component.key.as_str());
                }
            }
            ComponentKind::TextArea | ComponentKind::TextInput => {
                let field = self.fields.get(&component.key);
                self.inputs.push(FormInput {
                    component,
                    field,
                    editable: field.is_some_and(|f| is_editable(component, f)),
                });
            }
            _ => {
                if component.kind == ComponentKind::View
                    && !component.ref_kind.is_supported_template()
                {
                    return;
                }
                for child in &component.children {
                    self.visit(child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(key: &str, children: Vec<Component>) -> Component {
        Component {
            kind: ComponentKind::View,
            key: key.into(),
            name: key.rsplit('.').next().unwrap_or(key).into(),
            ref_kind: ComponentKind::DefaultForm,
            children,
            ..Default::default()
        }
    }

    fn reference(key: &str) -> Component {
        Component {
            kind: ComponentKind::Reference,
            key: key.into(),
            ..Default::default()
        }
    }

    fn input(key: &str) -> Component {
        Component {
            kind: ComponentKind::TextInput,
            key: key.into(),
            ..Default::default()
        }
    }

    fn map(views: &[&Component]) -> ComponentMap {
        views.iter().map(|v| (v.key.clone(), (*v).clone())).collect()
    }

    #[test]
    fn walk_follows_references() {
        let details = view("Case.Details", vec![input("Case.Name")]);
        let root = view("Case.Main", vec![reference("Case.Details")]);
        let components = map(&[&root, &details]);

        let steps = walk(&root, &components);
        let keys: Vec<_> = steps.iter().map(|s| (s.depth, s.component.key.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                (0, "Case.Main"),
                (1, "Case.Details"),
                (2, "Case.Details"),
                (3, "Case.Name"),
            ]
        );
        assert!(steps.iter().all(|s| s.kind == StepKind::Node));
    }

    #[test]
    fn missing_target_is_reported_not_fatal() {
        let root = view("Case.Main", vec![reference("Case.Gone"), input("Case.Name")]);
        let components = map(&[&root]);
        let steps = walk(&root, &components);
        assert!(steps.iter().any(|s| s.kind == StepKind::MissingTarget));
        assert_eq!(steps.last().unwrap().component.key, "Case.Name");

        let diags = inspect(&root, &components);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].id, codes::MISSING_REFERENCE_TARGET);
    }

    #[test]
    fn self_reference_terminates() {
        let root = view("Case.Main", vec![reference("Case.Main")]);
        let components = map(&[&root]);
        let steps = walk(&root, &components);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].kind, StepKind::Cycle);
    }

    #[test]
    fn mutual_references_terminate() {
        let a = view("Case.A", vec![reference("Case.B")]);
        let b = view("Case.B", vec![reference("Case.A")]);
        let components = map(&[&a, &b]);
        let steps = walk(&a, &components);
        assert_eq!(steps.iter().filter(|s| s.kind == StepKind::Cycle).count(), 1);
        let fields = FieldCatalog::new();
        assert!(form_inputs(&a, &components, &fields).is_empty());
    }

    #[test]
    fn broken_reference_is_not_followed() {
        let details = view("Case.Details", vec![input("Case.Name")]);
        let mut broken = reference("Case.Details");
        broken.broken = Some("Unsupported context: @BADFORM x".into());
        let root = view("Case.Main", vec![broken]);
        let components = map(&[&root, &details]);

        assert_eq!(walk(&root, &components).len(), 2);
        let diags = inspect(&root, &components);
        assert_eq!(diags[0].id, codes::UNSUPPORTED_CONTEXT);
        assert!(form_inputs(&root, &components, &FieldCatalog::new()).is_empty());
    }

    #[test]
    fn form_inputs_skip_views_without_template() {
        let mut bare = view("Case.Bare", vec![input("Case.Hidden")]);
        bare.ref_kind = ComponentKind::Unspecified;
        let root = view("Case.Main", vec![input("Case.Name"), reference("Case.Bare")]);
        let components = map(&[&root, &bare]);

        let fields: FieldCatalog = [Field {
            id: "Name".into(),
            class_id: "Case".into(),
            ..Default::default()
        }]
        .into_iter()
        .collect();
        let inputs = form_inputs(&root, &components, &fields);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].component.key, "Case.Name");
        assert!(inputs[0].editable);

        let diags = inspect(&root, &components);
        assert!(diags.iter().any(|d| d.id == codes::UNSUPPORTED_TEMPLATE));
    }
}
