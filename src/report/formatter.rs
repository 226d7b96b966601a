use super::{Report, ReportRow, TrailEntry, short_label};
use crate::flow::FlowNode;
use crate::graph::FlowGraph;
use crate::session::{AnswerValue, Session};
use itertools::Itertools;

/// Turns stored answers back into the labels the user picked.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Human-readable form of one stored answer. Values that match no option
    /// (free text, `sets` literals, unknown nodes) are shown as-is.
    pub fn summarize_answer(graph: &FlowGraph, node_id: &str, value: &AnswerValue) -> String {
        let Ok(node) = graph.get_node(node_id) else {
            return Self::raw(value);
        };

        match value {
            AnswerValue::Choice(v) => Self::option_label(node, v)
                .map(str::to_string)
                .unwrap_or_else(|| v.clone()),
            AnswerValue::Selection(values) => {
                let labels = values
                    .iter()
                    .filter_map(|v| Self::option_label(node, v))
                    .join(", ");
                if labels.is_empty() {
                    values.join(", ")
                } else {
                    labels
                }
            }
        }
    }

    /// Breadcrumbs: every history node that holds an answer.
    pub fn trail(graph: &FlowGraph, session: &Session) -> Vec<TrailEntry> {
        session
            .history
            .iter()
            .filter_map(|id| {
                let value = session.answers.get(id)?;
                Some(TrailEntry {
                    node_id: id.clone(),
                    label: short_label(id).to_string(),
                    value: Self::summarize_answer(graph, id, value),
                })
            })
            .collect()
    }

    /// The copyable report. A scenario row replaces the answer stored under
    /// `movement_key`, and rows repeating an earlier (label, value) pair are
    /// dropped.
    pub fn report(graph: &FlowGraph, session: &Session, movement_key: &str) -> Report {
        let scenario_label = graph.scenario_label(session.scenario.as_deref());
        let has_scenario = !scenario_label.is_empty();

        let scenario_row = has_scenario.then(|| ReportRow {
            node_id: movement_key.to_string(),
            label: short_label(movement_key).to_string(),
            value: scenario_label,
        });

        let trail_rows = Self::trail(graph, session)
            .into_iter()
            .unique_by(|entry| (entry.label.clone(), entry.value.clone()))
            .filter(|entry| !(has_scenario && entry.node_id == movement_key))
            .map(|entry| ReportRow {
                node_id: entry.node_id,
                label: entry.label,
                value: entry.value,
            });

        Report {
            rows: scenario_row.into_iter().chain(trail_rows).collect(),
        }
    }

    fn option_label<'a>(node: &'a FlowNode, value: &str) -> Option<&'a str> {
        if value.is_empty() {
            return None;
        }
        node.selectable_options()
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label.as_str())
    }

    fn raw(value: &AnswerValue) -> String {
        match value {
            AnswerValue::Choice(v) => v.clone(),
            AnswerValue::Selection(values) => values.join(", "),
        }
    }
}
