use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored answer, keyed in `Answers` by the node id that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// An option value, a literal written through `sets`, or submitted free text.
    Choice(String),
    /// The selected values of a multi-choice node, in the order given.
    Selection(Vec<String>),
}

/// Answers keyed by node id.
pub type Answers = BTreeMap<String, AnswerValue>;

impl AnswerValue {
    /// The scalar value of a single-choice, `sets` or free-text answer.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(value) => Some(value),
            AnswerValue::Selection(_) => None,
        }
    }

    pub fn as_selection(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Selection(values) => Some(values),
            AnswerValue::Choice(_) => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Choice(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Choice(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        AnswerValue::Selection(values)
    }
}
