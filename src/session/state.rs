use super::answer::Answers;
use serde::{Deserialize, Serialize};

/// Display preference carried with the session. The engine never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Procedural,
    Reality,
}

/// The mutable record of one walk through the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub current_node_id: String,
    /// Visited node ids. Never holds the same id twice in a row.
    pub history: Vec<String>,
    pub answers: Answers,
    pub scenario: Option<String>,
    /// Always within `[0, max_complexity]`.
    pub complexity: u32,
    /// The last submitted free text, read by verdict evaluation.
    pub user_input: String,
    /// Set by a rewind, cleared by the next forward answer.
    pub just_edited: bool,
    pub entry_tone: Option<String>,
    pub view_mode: ViewMode,
}

impl Session {
    pub(crate) fn empty(start: &str) -> Self {
        Self {
            current_node_id: start.to_string(),
            history: Vec::new(),
            answers: Answers::new(),
            scenario: None,
            complexity: 0,
            user_input: String::new(),
            just_edited: false,
            entry_tone: None,
            view_mode: ViewMode::default(),
        }
    }

    pub fn position_of(&self, node_id: &str) -> Option<usize> {
        self.history.iter().position(|id| id == node_id)
    }
}

/// How `SessionMachine::start` seeds a fresh session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Start node; the machine's default start when `None`.
    pub node_id: Option<String>,
    pub scenario: Option<String>,
    /// Pre-recorded answer for the movement selector.
    pub movement_preset: Option<String>,
    pub entry_tone: Option<String>,
}

impl StartOptions {
    pub fn at(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }

    pub fn movement_preset(mut self, value: impl Into<String>) -> Self {
        self.movement_preset = Some(value.into());
        self
    }

    pub fn entry_tone(mut self, tone: impl Into<String>) -> Self {
        self.entry_tone = Some(tone.into());
        self
    }
}
