//! The session state machine.
//!
//! A [`SessionMachine`] owns one [`Session`] and is the only thing allowed to
//! mutate it. Every transition validates everything it needs before touching
//! the record, so a rejected call leaves the session exactly as it was.

use crate::error::NavigationError;
use crate::flow::{
    Assessment, FlowNode, FlowOption, FollowupResponse, NodeKind, SCENARIO_KEY, Sets,
    find_option,
};
use crate::graph::{Edge, FlowGraph};
use crate::report::{Report, ReportFormatter, TrailEntry};
use crate::risk::{RiskProfile, RiskProfileCalculator};
use crate::verdict::VerdictEvaluator;

mod answer;
pub mod complexity;
mod state;

pub use answer::{AnswerValue, Answers};
pub use complexity::{ComplexityBand, MAX_COMPLEXITY};
pub use state::{Session, StartOptions, ViewMode};

/// Node a fresh session opens on.
pub const DEFAULT_START: &str = "movement_type";
/// Answer key (and node id) of the movement selector that drives the scenario.
pub const MOVEMENT_KEY: &str = "movement_type";

pub struct SessionBuilder<'g> {
    graph: &'g FlowGraph,
    default_start: String,
    movement_key: String,
    max_complexity: u32,
}

impl<'g> SessionBuilder<'g> {
    pub fn new(graph: &'g FlowGraph) -> Self {
        Self {
            graph,
            default_start: DEFAULT_START.to_string(),
            movement_key: MOVEMENT_KEY.to_string(),
            max_complexity: MAX_COMPLEXITY,
        }
    }

    pub fn default_start(mut self, node_id: impl Into<String>) -> Self {
        self.default_start = node_id.into();
        self
    }

    pub fn movement_key(mut self, key: impl Into<String>) -> Self {
        self.movement_key = key.into();
        self
    }

    pub fn max_complexity(mut self, ceiling: u32) -> Self {
        self.max_complexity = ceiling;
        self
    }

    /// Fails with `NodeNotFound` if the default start is not in the graph.
    pub fn build(self) -> Result<SessionMachine<'g>, NavigationError> {
        let start_node = self.graph.get_node(&self.default_start)?;
        let mut machine = SessionMachine {
            graph: self.graph,
            start_node,
            movement_key: self.movement_key,
            max_complexity: self.max_complexity,
            session: Session::empty(&self.default_start),
        };
        machine.reset();
        Ok(machine)
    }
}

/// Drives one session over a validated graph.
pub struct SessionMachine<'g> {
    graph: &'g FlowGraph,
    start_node: &'g FlowNode,
    movement_key: String,
    max_complexity: u32,
    session: Session,
}

impl<'g> SessionMachine<'g> {
    pub fn builder(graph: &'g FlowGraph) -> SessionBuilder<'g> {
        SessionBuilder::new(graph)
    }

    /// A machine with the default configuration, positioned at `movement_type`.
    pub fn new(graph: &'g FlowGraph) -> Result<Self, NavigationError> {
        SessionBuilder::new(graph).build()
    }

    // --- Queries ---

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn graph(&self) -> &'g FlowGraph {
        self.graph
    }

    pub fn current_node(&self) -> Result<&'g FlowNode, NavigationError> {
        self.graph.get_node(&self.session.current_node_id)
    }

    pub fn complexity(&self) -> u32 {
        self.session.complexity
    }

    pub fn max_complexity(&self) -> u32 {
        self.max_complexity
    }

    pub fn complexity_band(&self) -> ComplexityBand {
        ComplexityBand::classify(self.session.complexity, self.session.scenario.is_some())
    }

    pub fn complexity_percent(&self) -> f64 {
        complexity::percent(self.session.complexity, self.max_complexity)
    }

    pub fn scenario_label(&self) -> String {
        self.graph.scenario_label(self.session.scenario.as_deref())
    }

    pub fn risk_profile(&self) -> RiskProfile {
        RiskProfileCalculator::calculate(&self.session.answers)
    }

    /// Preview of the likeliest next edge from the current node.
    pub fn predict_next(&self) -> Result<Option<&'g Edge>, NavigationError> {
        self.graph.predict_next_edge(&self.session.current_node_id)
    }

    pub fn trail(&self) -> Vec<TrailEntry> {
        ReportFormatter::trail(self.graph, &self.session)
    }

    pub fn report(&self) -> Report {
        ReportFormatter::report(self.graph, &self.session, &self.movement_key)
    }

    /// The assessment the current verdict node shows for the stored free text.
    pub fn evaluate_verdict(&self) -> Result<&'g Assessment, NavigationError> {
        VerdictEvaluator::evaluate(self.graph, &self.session.history, &self.session.user_input)
    }

    // --- Transitions ---

    /// Replaces the session with a fresh one positioned at `options.node_id`
    /// (or the default start).
    pub fn start(&mut self, options: StartOptions) -> Result<(), NavigationError> {
        let node = match options.node_id.as_deref() {
            Some(id) => self.graph.get_node(id).inspect_err(log_rejection)?,
            None => self.start_node,
        };

        let mut session = Session::empty(&node.id);
        if let Some(preset) = options.movement_preset {
            session
                .answers
                .insert(self.movement_key.clone(), AnswerValue::Choice(preset));
        }
        session.scenario = options.scenario;
        session.entry_tone = options.entry_tone;
        session.view_mode = ViewMode::Procedural;

        self.session = session;
        self.navigate(node);
        tracing::debug!(node = %node.id, scenario = ?self.session.scenario, "session started");
        Ok(())
    }

    /// Starts at a scenario's entry node with the scenario and movement answer preset.
    pub fn start_scenario(&mut self, scenario_id: &str) -> Result<(), NavigationError> {
        let scenario = self
            .graph
            .get_scenario(scenario_id)
            .ok_or_else(|| NavigationError::invalid(scenario_id, "unknown scenario"))
            .inspect_err(log_rejection)?;
        self.start(
            StartOptions::default()
                .at(scenario.start_node_id.clone())
                .scenario(scenario.id.clone())
                .movement_preset(scenario.id.clone()),
        )
    }

    pub fn answer_single(&mut self, node_id: &str, value: &str) -> Result<(), NavigationError> {
        let node = self.require_current(node_id)?;
        let NodeKind::SingleChoice(question) = &node.kind else {
            return Err(wrong_type(node, "answer_single"));
        };
        self.choose_option(node, &question.options, value)
    }

    /// Records every selected value and adds the sum of their complexity deltas.
    pub fn answer_multi<S: AsRef<str>>(
        &mut self,
        node_id: &str,
        values: &[S],
    ) -> Result<(), NavigationError> {
        let node = self.require_current(node_id)?;
        let NodeKind::MultiChoice(multi) = &node.kind else {
            return Err(wrong_type(node, "answer_multi"));
        };
        let target = self.graph.get_node(&multi.next).inspect_err(log_rejection)?;

        let selected: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        let delta: i32 = multi
            .options
            .iter()
            .filter(|opt| selected.contains(&opt.value))
            .map(|opt| opt.adds_complexity)
            .sum();

        self.session
            .answers
            .insert(node.id.clone(), AnswerValue::Selection(selected));
        self.session.complexity = complexity::add_delta(self.session.complexity, delta);
        self.session.just_edited = false;
        self.navigate(target);
        tracing::debug!(
            from = %node.id,
            to = %target.id,
            delta,
            complexity = self.session.complexity,
            "multi-choice recorded"
        );
        Ok(())
    }

    pub fn answer_helper_option(
        &mut self,
        node_id: &str,
        value: &str,
    ) -> Result<(), NavigationError> {
        let node = self.require_current(node_id)?;
        let NodeKind::Helper(helper) = &node.kind else {
            return Err(wrong_type(node, "answer_helper_option"));
        };
        match &helper.followup.response {
            FollowupResponse::Options(options) => self.choose_option(node, options, value),
            FollowupResponse::FreeText(_) => Err(reject(&node.id, "followup expects free text")),
        }
    }

    /// Stores the trimmed text and moves to the followup's default next.
    /// The text itself never changes where the session goes.
    pub fn submit_text(&mut self, node_id: &str, text: &str) -> Result<(), NavigationError> {
        let node = self.require_current(node_id)?;
        let NodeKind::Helper(helper) = &node.kind else {
            return Err(wrong_type(node, "submit_text"));
        };
        let FollowupResponse::FreeText(free_text) = &helper.followup.response else {
            return Err(reject(&node.id, "followup expects an option"));
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(reject(&node.id, "submitted text is empty"));
        }
        let target = self
            .graph
            .get_node(&free_text.default_next)
            .inspect_err(log_rejection)?;

        self.session
            .answers
            .insert(node.id.clone(), AnswerValue::Choice(text.to_string()));
        self.session.user_input = text.to_string();
        self.session.just_edited = false;
        self.navigate(target);
        tracing::debug!(from = %node.id, to = %target.id, "free text recorded");
        Ok(())
    }

    /// Applies an assessment of the current verdict node.
    pub fn advance_from_verdict(&mut self, assessment: &Assessment) -> Result<(), NavigationError> {
        let node = self.current_node().inspect_err(log_rejection)?;
        if !matches!(node.kind, NodeKind::Verdict(_)) {
            return Err(wrong_type(node, "advance_from_verdict"));
        }
        let target = self
            .graph
            .get_node(&assessment.next)
            .inspect_err(log_rejection)?;

        self.merge_sets(&assessment.sets);
        self.session.complexity =
            complexity::add_delta(self.session.complexity, assessment.adds_complexity);
        self.session.just_edited = false;
        self.navigate(target);
        tracing::debug!(
            from = %node.id,
            to = %target.id,
            delta = assessment.adds_complexity,
            "verdict applied"
        );
        Ok(())
    }

    /// Evaluates the current verdict and applies the resulting assessment.
    pub fn resolve_verdict(&mut self) -> Result<(), NavigationError> {
        let assessment = self.evaluate_verdict().inspect_err(log_rejection)?;
        self.advance_from_verdict(assessment)
    }

    /// Rewinds to an earlier node.
    ///
    /// History is cut just before the first occurrence of `target_id`, every
    /// answer recorded for the cut nodes is dropped, the scenario is re-derived
    /// from the movement answer and complexity is rebuilt from the surviving
    /// watermark only. Then the session re-enters `target_id`.
    pub fn go_back_to(&mut self, target_id: &str) -> Result<(), NavigationError> {
        let Some(index) = self.session.position_of(target_id) else {
            let err = NavigationError::NoOpRewind(target_id.to_string());
            log_rejection(&err);
            return Err(err);
        };
        let target = self.graph.get_node(target_id).inspect_err(log_rejection)?;

        let had_movement = self.session.answers.contains_key(&self.movement_key);
        let pruned = self.session.history.split_off(index);
        for id in &pruned {
            self.session.answers.remove(id);
        }

        let movement = self.session.answers.get(&self.movement_key);
        let movement_removed = had_movement && movement.is_none();
        self.session.scenario = match movement {
            Some(AnswerValue::Choice(value)) => Some(value.clone()),
            _ if movement_removed || target_id == self.movement_key => None,
            _ => self.session.scenario.take(),
        };

        self.session.complexity =
            complexity::recompute(self.graph, &self.session.history, self.max_complexity);
        self.session.just_edited = true;
        self.navigate(target);
        tracing::debug!(
            target = %target_id,
            pruned = pruned.len(),
            complexity = self.session.complexity,
            "rewound"
        );
        Ok(())
    }

    /// Steps back off the current node, forgetting only its own answer.
    /// Leaving the only node in history resets the session.
    pub fn go_back_from_result(&mut self) -> Result<(), NavigationError> {
        let len = self.session.history.len();
        if len < 2 {
            self.reset();
            return Ok(());
        }
        let previous = self
            .graph
            .get_node(&self.session.history[len - 2])
            .inspect_err(log_rejection)?;

        let left = self.session.current_node_id.clone();
        self.session.history.pop();
        self.session.answers.remove(&left);
        self.session.complexity =
            complexity::recompute(self.graph, &self.session.history, self.max_complexity);
        self.session.just_edited = true;
        self.navigate(previous);
        tracing::debug!(from = %left, to = %previous.id, "stepped back");
        Ok(())
    }

    /// Returns to the empty session at the default start node.
    pub fn reset(&mut self) {
        self.session = Session::empty(&self.start_node.id);
        self.navigate(self.start_node);
        tracing::debug!(node = %self.start_node.id, "session reset");
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.session.view_mode = mode;
    }

    // --- Internals ---

    fn require_current(&self, node_id: &str) -> Result<&'g FlowNode, NavigationError> {
        let node = self.graph.get_node(node_id).inspect_err(log_rejection)?;
        if node.id != self.session.current_node_id {
            return Err(reject(
                node_id,
                format!("the session is positioned at '{}'", self.session.current_node_id),
            ));
        }
        Ok(node)
    }

    fn choose_option(
        &mut self,
        node: &'g FlowNode,
        options: &'g [FlowOption],
        value: &str,
    ) -> Result<(), NavigationError> {
        let option = find_option(options, value)
            .ok_or_else(|| reject(&node.id, format!("no option with value '{}'", value)))?;
        let next = option
            .next
            .as_deref()
            .ok_or_else(|| reject(&node.id, format!("option '{}' leads nowhere", value)))?;
        let target = self.graph.get_node(next).inspect_err(log_rejection)?;

        self.session
            .answers
            .insert(node.id.clone(), AnswerValue::Choice(value.to_string()));
        self.merge_sets(&option.sets);
        self.session.complexity =
            complexity::add_delta(self.session.complexity, option.adds_complexity);
        self.session.just_edited = false;
        self.navigate(target);
        tracing::debug!(
            from = %node.id,
            to = %target.id,
            value,
            delta = option.adds_complexity,
            complexity = self.session.complexity,
            "answer recorded"
        );
        Ok(())
    }

    /// Writes `sets` into the answers. The scenario key moves the session
    /// scenario instead.
    fn merge_sets(&mut self, sets: &Sets) {
        for (key, value) in sets {
            if key == SCENARIO_KEY {
                self.session.scenario = Some(value.clone());
            } else {
                self.session
                    .answers
                    .insert(key.clone(), AnswerValue::Choice(value.clone()));
            }
        }
    }

    /// Enters `node`: push it unless it is already on top, then fold its base
    /// weight into the complexity watermark.
    fn navigate(&mut self, node: &FlowNode) {
        if matches!(node.kind, NodeKind::Router) {
            tracing::warn!(
                node = %node.id,
                "session entered a router node, which has no live resolution rule"
            );
        }
        let session = &mut self.session;
        if session.history.last() != Some(&node.id) {
            session.history.push(node.id.clone());
        }
        session.current_node_id = node.id.clone();
        session.complexity =
            complexity::watermark(session.complexity, node.complexity, self.max_complexity);
    }
}

fn reject(node_id: &str, reason: impl Into<String>) -> NavigationError {
    let err = NavigationError::invalid(node_id, reason);
    log_rejection(&err);
    err
}

fn wrong_type(node: &FlowNode, operation: &str) -> NavigationError {
    reject(
        &node.id,
        format!("{} cannot be applied to a {} node", operation, node.node_type()),
    )
}

fn log_rejection(err: &NavigationError) {
    if err.is_fatal() {
        tracing::error!(error = %err, "navigation failed");
    } else {
        tracing::debug!(error = %err, "transition rejected");
    }
}
