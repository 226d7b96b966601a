use super::definition::FlowDefinition;
use crate::error::GraphError;
use std::fs;
use std::path::Path;

/// The Windsor Framework questionnaire shipped with the crate.
const BUILTIN_FLOW_JSON: &str = include_str!("../../data/windsor_flow.json");

impl FlowDefinition {
    /// Parses a flow document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::JsonParseError(e.to_string()))
    }

    /// Loads a flow document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GraphError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// The embedded customs-classification document.
    pub fn builtin() -> Result<Self, GraphError> {
        Self::from_json(BUILTIN_FLOW_JSON)
    }
}
