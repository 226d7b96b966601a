use crate::error::{GraphError, NavigationError};
use crate::flow::{FlowDefinition, FlowMetadata, FlowNode, NodeKind, ResultKind};
use crate::report::ResultView;
use ahash::AHashMap;
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};

mod edge;
mod validate;

pub use edge::{Edge, EdgeKind, EdgeTarget};
pub use validate::GraphWarning;

use validate::{GraphValidator, references};

/// A named entry point into the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub id: String,
    pub label: String,
    pub start_node_id: String,
}

/// The validated, immutable decision graph.
///
/// A `FlowGraph` can only be obtained through [`FlowGraph::new`], which rejects
/// any document with a dangling reference. Every lookup afterwards is read-only,
/// so one graph can back any number of sessions.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    nodes: AHashMap<String, FlowNode>,
    scenarios: AHashMap<String, Scenario>,
    tiers: AHashMap<String, u32>,
    metadata: Option<FlowMetadata>,
    edges: AHashMap<String, Vec<Edge>>,
    warnings: Vec<GraphWarning>,
}

impl FlowGraph {
    /// Validates a document and indexes it.
    pub fn new(definition: FlowDefinition) -> Result<Self, GraphError> {
        let warnings = GraphValidator::new(&definition).validate()?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let edges = definition
            .nodes
            .values()
            .map(|node| (node.id.clone(), edge::derive_edges(node)))
            .collect();

        let scenarios = definition
            .scenarios
            .into_iter()
            .map(|(id, scenario)| {
                let entry = Scenario {
                    id: id.clone(),
                    label: scenario.label,
                    start_node_id: scenario.start,
                };
                (id, entry)
            })
            .collect();

        tracing::debug!(
            nodes = definition.nodes.len(),
            warnings = warnings.len(),
            "flow graph loaded"
        );

        Ok(Self {
            nodes: definition.nodes,
            scenarios,
            tiers: definition.tiers,
            metadata: definition.metadata,
            edges,
            warnings,
        })
    }

    /// Loads and validates the embedded customs-classification document.
    pub fn builtin() -> Result<Self, GraphError> {
        Self::new(FlowDefinition::builtin()?)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Self::new(FlowDefinition::from_json(json)?)
    }

    pub fn get_node(&self, id: &str) -> Result<&FlowNode, NavigationError> {
        self.nodes
            .get(id)
            .ok_or_else(|| NavigationError::NodeNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All node ids, sorted.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get_scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// All scenarios, sorted by id.
    pub fn scenarios(&self) -> Vec<&Scenario> {
        self.scenarios
            .values()
            .sorted_by(|a, b| a.id.cmp(&b.id))
            .collect()
    }

    /// Display label for a scenario id. Unknown ids are echoed back, and no
    /// scenario at all yields an empty string.
    pub fn scenario_label(&self, scenario: Option<&str>) -> String {
        match scenario {
            None => String::new(),
            Some(id) => self
                .scenarios
                .get(id)
                .map_or_else(|| id.to_string(), |s| s.label.clone()),
        }
    }

    pub fn metadata(&self) -> Option<&FlowMetadata> {
        self.metadata.as_ref()
    }

    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    /// The ordering rank of a node's tier, if it has one the document ranks.
    pub fn tier_rank(&self, node_id: &str) -> Option<u32> {
        let tier = self.nodes.get(node_id)?.tier.as_ref()?;
        self.tiers.get(tier).copied()
    }

    pub fn get_outgoing_edges(&self, node_id: &str) -> Result<&[Edge], NavigationError> {
        self.get_node(node_id)?;
        Ok(self.edges.get(node_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Lookahead preview: the highest-weighted outgoing edge, or the first one
    /// when no option declares a weight. Never used to drive a transition.
    pub fn predict_next_edge(&self, node_id: &str) -> Result<Option<&Edge>, NavigationError> {
        Ok(edge::predict(self.get_outgoing_edges(node_id)?))
    }

    /// Every node a session can reach from `start` through live transitions.
    pub fn reachable_from(&self, start: &str) -> Result<BTreeSet<String>, NavigationError> {
        self.get_node(start)?;
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([start.to_string()]);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let node = self.get_node(&id)?;
            for reference in references(node).into_iter().filter(|r| r.is_transition) {
                if !seen.contains(reference.target) {
                    queue.push_back(reference.target.to_string());
                }
            }
        }
        Ok(seen)
    }

    /// Sorted ids of nodes not reachable from any of `starts`.
    pub fn unreachable_from<'a, I>(&self, starts: I) -> Result<Vec<String>, NavigationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut reachable = BTreeSet::new();
        for start in starts {
            reachable.extend(self.reachable_from(start)?);
        }
        Ok(self
            .nodes
            .keys()
            .filter(|id| !reachable.contains(*id))
            .cloned()
            .sorted()
            .collect())
    }

    /// The summary view of a result or redirect node. A redirect always shows
    /// as an edge case with its own title (or "Redirect") and no summary text.
    pub fn result_view(&self, node_id: &str) -> Option<ResultView> {
        let node = self.nodes.get(node_id)?;
        match &node.kind {
            NodeKind::Result(result) => Some(ResultView {
                node_id: node.id.clone(),
                result_type: result.result_type,
                title: result.title.clone(),
                summary: result.summary.clone(),
                explanation: result.explanation.clone(),
                requirements: result.requirements.clone(),
                actions: result.actions.clone(),
                warnings: result.warnings.clone(),
                recommendations: result.recommendations.clone(),
                why_complex: result.why_complex.clone(),
            }),
            NodeKind::Redirect(redirect) => Some(ResultView {
                node_id: node.id.clone(),
                result_type: ResultKind::EdgeCase,
                title: redirect.title.clone().unwrap_or_else(|| "Redirect".to_string()),
                summary: String::new(),
                explanation: String::new(),
                requirements: redirect.requirements.clone(),
                actions: redirect.actions.clone(),
                warnings: redirect.warnings.clone(),
                recommendations: redirect.recommendations.clone(),
                why_complex: redirect.why_complex.clone(),
            }),
            _ => None,
        }
    }
}
