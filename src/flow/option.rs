use serde::Deserialize;
use std::collections::BTreeMap;

/// Answer-key side effects written when an option or assessment is chosen.
///
/// The key `scenario` is reserved: it updates the session's scenario instead
/// of being stored as an answer.
pub type Sets = BTreeMap<String, String>;

/// The reserved `sets` key that switches the session scenario.
pub const SCENARIO_KEY: &str = "scenario";

/// A selectable answer on a choice node or an option-driven helper followup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowOption {
    pub label: String,
    pub value: String,
    /// Absent on terminal choices; selecting such an option is not a transition.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub adds_complexity: i32,
    #[serde(default)]
    pub sets: Sets,
    #[serde(default)]
    pub explanation: Option<String>,
    /// Ranking hint for `FlowGraph::predict_next_edge`. Never drives a transition.
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Finds the option with the given value.
pub fn find_option<'a>(options: &'a [FlowOption], value: &str) -> Option<&'a FlowOption> {
    options.iter().find(|opt| opt.value == value)
}
