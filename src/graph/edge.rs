use crate::flow::{FlowNode, NodeKind};
use serde::Serialize;
use std::fmt;

/// How an edge was derived from its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// One per `single_choice` option that declares a `next`.
    Option,
    /// The fixed `next` of a `multi_choice` node.
    Default,
    /// The synthetic edge of a `router` node.
    Router,
}

/// Where an edge leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTarget {
    Node(String),
    /// Sentinel target of router edges; routers have no statically known successor.
    Dynamic,
}

impl EdgeTarget {
    pub fn node_id(&self) -> Option<&str> {
        match self {
            EdgeTarget::Node(id) => Some(id),
            EdgeTarget::Dynamic => None,
        }
    }
}

impl fmt::Display for EdgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeTarget::Node(id) => write!(f, "{}", id),
            EdgeTarget::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A derived transition between two graph positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: EdgeTarget,
    pub label: Option<String>,
    /// The option value that selects this edge.
    pub via: Option<String>,
    pub weight: Option<f64>,
    pub kind: EdgeKind,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if let Some(via) = &self.via {
            write!(f, " [{}]", via)?;
        }
        if let Some(weight) = self.weight {
            write!(f, " (weight {})", weight)?;
        }
        Ok(())
    }
}

/// Derives the outgoing edges of a single node.
pub(super) fn derive_edges(node: &FlowNode) -> Vec<Edge> {
    match &node.kind {
        NodeKind::SingleChoice(question) => question
            .options
            .iter()
            .filter_map(|opt| {
                opt.next.as_ref().map(|next| Edge {
                    from: node.id.clone(),
                    to: EdgeTarget::Node(next.clone()),
                    label: Some(opt.label.clone()),
                    via: Some(opt.value.clone()),
                    weight: opt.weight,
                    kind: EdgeKind::Option,
                })
            })
            .collect(),
        NodeKind::MultiChoice(multi) => vec![Edge {
            from: node.id.clone(),
            to: EdgeTarget::Node(multi.next.clone()),
            label: None,
            via: None,
            weight: None,
            kind: EdgeKind::Default,
        }],
        NodeKind::Router => vec![Edge {
            from: node.id.clone(),
            to: EdgeTarget::Dynamic,
            label: None,
            via: None,
            weight: None,
            kind: EdgeKind::Router,
        }],
        NodeKind::Helper(_)
        | NodeKind::Verdict(_)
        | NodeKind::Result(_)
        | NodeKind::Redirect(_) => Vec::new(),
    }
}

/// Picks the highest-weighted edge, or the first edge when no weights are declared.
/// Ties keep the earliest declared edge.
pub(super) fn predict(edges: &[Edge]) -> Option<&Edge> {
    let weighted = edges
        .iter()
        .filter_map(|edge| edge.weight.map(|w| (w, edge)))
        .reduce(|best, candidate| if candidate.0 > best.0 { candidate } else { best });

    match weighted {
        Some((_, edge)) => Some(edge),
        None => edges.first(),
    }
}
