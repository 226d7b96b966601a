//! # Windsor Path - Guided Decision-Graph Engine
//!
//! **Windsor Path** drives a guided questionnaire over a validated decision graph.
//! The bundled document walks a trader through the UK/EU customs rules for goods
//! moving into Northern Ireland, but the engine itself knows nothing about
//! customs: any document in the same JSON format can be loaded.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Graph**: Parse a flow document with `FlowDefinition::from_json` (or use
//!     the embedded one) and hand it to `FlowGraph::new`. Every reference is checked
//!     up front; a graph with a dangling link is never constructed.
//! 2.  **Start a Session**: Build a `SessionMachine` over the graph. The machine owns
//!     the session record and is the only thing that mutates it.
//! 3.  **Answer**: Feed answers through `answer_single`, `answer_multi`,
//!     `answer_helper_option`, `submit_text` and `resolve_verdict`. Rejected calls
//!     return an error and leave the session untouched.
//! 4.  **Revise**: `go_back_to` rewinds to any earlier node, dropping the answers
//!     recorded after it.
//! 5.  **Read**: Query the complexity band, the risk profile, the breadcrumb trail,
//!     the copyable report or the result view at any point.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use windsor_path::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let graph = FlowGraph::builtin()?;
//!     let mut machine = SessionMachine::new(&graph)?;
//!
//!     machine.answer_single("movement_type", "gb_to_ni")?;
//!     machine.answer_multi("sector_gate", &["sps"])?;
//!     machine.answer_single("ukims_auth", "yes")?;
//!
//!     println!("Now at: {}", machine.session().current_node_id);
//!     println!("Complexity: {} ({})", machine.complexity(), machine.complexity_band().status());
//!
//!     let risk = machine.risk_profile();
//!     println!("Overall risk: {} ({})", risk.overall, risk.tone);
//!
//!     println!("{}", machine.report().to_text());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flow;
pub mod graph;
pub mod prelude;
pub mod report;
pub mod risk;
pub mod session;
pub mod verdict;
