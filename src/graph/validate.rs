use crate::error::GraphError;
use crate::flow::{FlowDefinition, FlowNode, FollowupResponse, NodeKind, SCENARIO_KEY, Sets};
use ahash::AHashSet;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// A non-fatal finding about the loaded graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphWarning {
    /// Router nodes have no resolution rule that the live session can apply.
    UnresolvedRouter { node_id: String },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphWarning::UnresolvedRouter { node_id } => write!(
                f,
                "router node '{}' has no live resolution rule; sessions that reach it stop there",
                node_id
            ),
        }
    }
}

/// One id reference made by a node.
pub(super) struct Reference<'a> {
    pub target: &'a str,
    pub context: String,
    /// `true` for references a session can follow, `false` for `sets` keys.
    pub is_transition: bool,
}

/// Collects every id a node refers to, in declaration order.
pub(super) fn references(node: &FlowNode) -> Vec<Reference<'_>> {
    let mut refs = Vec::new();

    for opt in node.selectable_options() {
        if let Some(next) = &opt.next {
            refs.push(Reference {
                target: next,
                context: format!("the next of option '{}'", opt.value),
                is_transition: true,
            });
        }
        push_sets(&mut refs, &opt.sets, &format!("option '{}'", opt.value));
    }

    match &node.kind {
        NodeKind::MultiChoice(multi) => refs.push(Reference {
            target: &multi.next,
            context: "the fixed next".to_string(),
            is_transition: true,
        }),
        NodeKind::Helper(helper) => {
            if let FollowupResponse::FreeText(text) = &helper.followup.response {
                refs.push(Reference {
                    target: &text.default_next,
                    context: "the followup default_next".to_string(),
                    is_transition: true,
                });
            }
        }
        NodeKind::Verdict(verdict) => {
            for (name, assessment) in [
                ("if_not_category1", &verdict.assessments.if_not_category1),
                ("if_possibly_category1", &verdict.assessments.if_possibly_category1),
            ] {
                refs.push(Reference {
                    target: &assessment.next,
                    context: format!("the next of assessment '{}'", name),
                    is_transition: true,
                });
                push_sets(&mut refs, &assessment.sets, &format!("assessment '{}'", name));
            }
        }
        NodeKind::SingleChoice(_)
        | NodeKind::Result(_)
        | NodeKind::Redirect(_)
        | NodeKind::Router => {}
    }

    refs
}

fn push_sets<'a>(refs: &mut Vec<Reference<'a>>, sets: &'a Sets, owner: &str) {
    for key in sets.keys().filter(|k| k.as_str() != SCENARIO_KEY) {
        refs.push(Reference {
            target: key,
            context: format!("a sets key of {}", owner),
            is_transition: false,
        });
    }
}

/// Checks referential integrity of a whole document before it is indexed.
pub(super) struct GraphValidator<'a> {
    definition: &'a FlowDefinition,
}

impl<'a> GraphValidator<'a> {
    pub(super) fn new(definition: &'a FlowDefinition) -> Self {
        Self { definition }
    }

    /// Returns the non-fatal warnings, or the first fatal error in id order.
    pub(super) fn validate(&self) -> Result<Vec<GraphWarning>, GraphError> {
        let mut warnings = Vec::new();

        for (key, node) in self.definition.nodes.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            if key != &node.id {
                return Err(GraphError::NodeIdMismatch {
                    key: key.clone(),
                    id: node.id.clone(),
                });
            }
            self.check_unique_values(node)?;
            for reference in references(node) {
                self.require_node(reference.target, &node.id, reference.context)?;
            }
            if matches!(node.kind, NodeKind::Router) {
                warnings.push(GraphWarning::UnresolvedRouter {
                    node_id: node.id.clone(),
                });
            }
        }

        let scenarios = self
            .definition
            .scenarios
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0));
        for (scenario_id, scenario) in scenarios {
            if !self.definition.nodes.contains_key(&scenario.start) {
                return Err(GraphError::ScenarioStartNotFound {
                    scenario_id: scenario_id.clone(),
                    missing_node_id: scenario.start.clone(),
                });
            }
        }

        Ok(warnings)
    }

    fn check_unique_values(&self, node: &FlowNode) -> Result<(), GraphError> {
        let mut seen = AHashSet::new();
        for opt in node.selectable_options() {
            if !seen.insert(opt.value.as_str()) {
                return Err(GraphError::DuplicateOptionValue {
                    node_id: node.id.clone(),
                    value: opt.value.clone(),
                });
            }
        }
        Ok(())
    }

    fn require_node(&self, target: &str, source: &str, context: String) -> Result<(), GraphError> {
        if self.definition.nodes.contains_key(target) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound {
                missing_node_id: target.to_string(),
                source_node_id: source.to_string(),
                context,
            })
        }
    }
}
