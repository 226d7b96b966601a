//! Prelude module for convenient imports
//!
//! Re-exports the types needed to load a graph, drive a session and read its
//! results.
//!
//! # Example
//!
//! ```rust,no_run
//! use windsor_path::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let definition = FlowDefinition::from_file("path/to/flow.json")?;
//! let graph = FlowGraph::new(definition)?;
//!
//! let mut machine = SessionMachine::builder(&graph)
//!     .max_complexity(20)
//!     .build()?;
//! machine.start(StartOptions::default().scenario("gb_to_ni"))?;
//!
//! if let Some(edge) = machine.predict_next()? {
//!     println!("Likely next: {}", edge);
//! }
//! # Ok(())
//! # }
//! ```

// Graph loading
pub use crate::flow::{FlowDefinition, FlowNode, NodeKind, NodeType};
pub use crate::graph::{Edge, EdgeKind, EdgeTarget, FlowGraph, GraphWarning, Scenario};

// Session
pub use crate::session::{
    AnswerValue, Answers, ComplexityBand, Session, SessionBuilder, SessionMachine, StartOptions,
    ViewMode,
};

// Derived views
pub use crate::report::{Report, ReportFormatter, ResultView, TrailEntry};
pub use crate::risk::{Dimension, RiskProfile, RiskProfileCalculator, RiskTone};
pub use crate::verdict::{VerdictEvaluator, VerdictOutcome};

// Error types
pub use crate::error::{GraphError, NavigationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
