//! Free-text verdicts.
//!
//! A helper node may ask the user to describe their goods in their own words.
//! The verdict node that follows it turns that text into one of two canned
//! assessments by plain keyword matching. This is the only place the crate
//! reads unstructured input.

use crate::error::NavigationError;
use crate::flow::{Assessment, FollowupResponse, NodeKind, VerdictAssessments};
use crate::graph::FlowGraph;
use serde::Serialize;

/// Which of a verdict node's two assessments applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictOutcome {
    /// The safe default, also used whenever the input cannot be analysed.
    NotCategory1,
    PossiblyCategory1,
}

impl VerdictAssessments {
    pub fn get(&self, outcome: VerdictOutcome) -> &Assessment {
        match outcome {
            VerdictOutcome::NotCategory1 => &self.if_not_category1,
            VerdictOutcome::PossiblyCategory1 => &self.if_possibly_category1,
        }
    }
}

pub struct VerdictEvaluator;

impl VerdictEvaluator {
    /// Lowercases `text` and reports `PossiblyCategory1` if any trigger
    /// keyword occurs in it as a substring.
    pub fn classify<S: AsRef<str>>(text: &str, possibly: &[S]) -> VerdictOutcome {
        let lower = text.to_lowercase();
        if possibly.iter().any(|keyword| lower.contains(keyword.as_ref())) {
            VerdictOutcome::PossiblyCategory1
        } else {
            VerdictOutcome::NotCategory1
        }
    }

    /// Decides the outcome for the verdict node at the end of `history`.
    ///
    /// The trigger lists come from the node two positions back, which is the
    /// helper that collected the text. A missing helper or a helper without a
    /// text analysis yields `NotCategory1`.
    pub fn outcome(
        graph: &FlowGraph,
        history: &[String],
        free_text: &str,
    ) -> Result<VerdictOutcome, NavigationError> {
        Self::verdict_at_end(graph, history)?;

        let analysis = history
            .len()
            .checked_sub(2)
            .and_then(|idx| graph.get_node(&history[idx]).ok())
            .and_then(|helper| match &helper.kind {
                NodeKind::Helper(h) => match &h.followup.response {
                    FollowupResponse::FreeText(text) => Some(text),
                    FollowupResponse::Options(_) => None,
                },
                _ => None,
            });

        Ok(match analysis {
            Some(text) => Self::classify(free_text, &text.possibly),
            None => VerdictOutcome::NotCategory1,
        })
    }

    /// Resolves the assessment the verdict node at the end of `history` shows
    /// for `free_text`.
    pub fn evaluate<'g>(
        graph: &'g FlowGraph,
        history: &[String],
        free_text: &str,
    ) -> Result<&'g Assessment, NavigationError> {
        let outcome = Self::outcome(graph, history, free_text)?;
        let assessments = Self::verdict_at_end(graph, history)?;
        Ok(assessments.get(outcome))
    }

    fn verdict_at_end<'g>(
        graph: &'g FlowGraph,
        history: &[String],
    ) -> Result<&'g VerdictAssessments, NavigationError> {
        let current = history
            .last()
            .ok_or_else(|| NavigationError::invalid("", "history is empty"))?;
        match &graph.get_node(current)?.kind {
            NodeKind::Verdict(verdict) => Ok(&verdict.assessments),
            _ => Err(NavigationError::invalid(current, "not a verdict node")),
        }
    }
}
