use thiserror::Error;

/// Errors that can occur while loading and validating a flow document.
///
/// Every variant is fatal: a graph that fails validation must never be
/// handed to a `SessionMachine`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Failed to parse flow JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read flow document '{path}': {message}")]
    Io { path: String, message: String },

    #[error(
        "Node '{missing_node_id}' not found, which is referenced by {context} on node '{source_node_id}'"
    )]
    NodeNotFound {
        missing_node_id: String,
        source_node_id: String,
        context: String,
    },

    #[error("Node is stored under key '{key}' but declares id '{id}'")]
    NodeIdMismatch { key: String, id: String },

    #[error("Node '{node_id}' declares option value '{value}' more than once")]
    DuplicateOptionValue { node_id: String, value: String },

    #[error("Scenario '{scenario_id}' starts at node '{missing_node_id}', which does not exist")]
    ScenarioStartNotFound {
        scenario_id: String,
        missing_node_id: String,
    },
}

/// Errors raised by session transitions and graph lookups at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Unknown node: {0}")]
    NodeNotFound(String),

    #[error("Invalid transition on node '{node_id}': {reason}")]
    InvalidTransition { node_id: String, reason: String },

    #[error("Cannot rewind to '{0}': node is not in the session history")]
    NoOpRewind(String),
}

impl NavigationError {
    /// `NodeNotFound` means the caller asked for something the graph never
    /// contained. The other variants leave the session untouched and the
    /// caller may simply carry on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NavigationError::NodeNotFound(_))
    }

    pub(crate) fn invalid(node_id: &str, reason: impl Into<String>) -> Self {
        NavigationError::InvalidTransition {
            node_id: node_id.to_string(),
            reason: reason.into(),
        }
    }
}
