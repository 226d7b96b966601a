//! The session complexity counter.
//!
//! Two mechanisms feed the same counter. Node base weights raise it as a
//! watermark (`max`) on every visit, and option or assessment deltas are added
//! straight in at the moment of selection. Deltas are not tracked per node, so
//! a rewind rebuilds the counter from the surviving history's watermark alone
//! and every delta accrued so far is dropped, on the pruned path and the
//! surviving one alike.

use crate::graph::FlowGraph;
use serde::Serialize;

/// Ceiling of the session complexity counter.
pub const MAX_COMPLEXITY: u32 = 15;

/// Raises `current` to `weight` if the node declares one, capped at `ceiling`.
pub fn watermark(current: u32, weight: Option<u32>, ceiling: u32) -> u32 {
    weight.map_or(current, |w| current.max(w)).min(ceiling)
}

/// Adds a signed delta, never going below zero.
pub fn add_delta(current: u32, delta: i32) -> u32 {
    (current as i64 + delta as i64).max(0).min(u32::MAX as i64) as u32
}

/// Watermark over every node in `history`, starting from zero.
/// Unknown ids contribute nothing.
pub fn recompute<S: AsRef<str>>(graph: &FlowGraph, history: &[S], ceiling: u32) -> u32 {
    history.iter().fold(0, |acc, id| {
        let weight = graph.get_node(id.as_ref()).ok().and_then(|n| n.complexity);
        watermark(acc, weight, ceiling)
    })
}

/// Coarse classification of the counter for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityBand {
    /// No scenario chosen yet.
    Pending,
    Simple,
    Moderate,
    Complex,
}

impl ComplexityBand {
    pub fn classify(complexity: u32, scenario_chosen: bool) -> Self {
        if !scenario_chosen {
            ComplexityBand::Pending
        } else if complexity <= 5 {
            ComplexityBand::Simple
        } else if complexity <= 10 {
            ComplexityBand::Moderate
        } else {
            ComplexityBand::Complex
        }
    }

    pub fn status(self) -> &'static str {
        match self {
            ComplexityBand::Pending => "Not enough information yet",
            ComplexityBand::Simple => "Simple scenario",
            ComplexityBand::Moderate => "Moderate complexity",
            ComplexityBand::Complex => "Complex scenario",
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            ComplexityBand::Pending => {
                "Answer a few questions and we’ll gauge whether this is straightforward or more complex."
            }
            ComplexityBand::Simple => "Looks straightforward with clear requirements.",
            ComplexityBand::Moderate => {
                "Some complexity is likely—consider double-checking with a broker."
            }
            ComplexityBand::Complex => {
                "Edge cases or specialized rules detected. A professional review is wise."
            }
        }
    }
}

/// Share of the ceiling used, as a percentage capped at 100.
pub fn percent(complexity: u32, ceiling: u32) -> f64 {
    if ceiling == 0 {
        return 100.0;
    }
    (complexity as f64 / ceiling as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watermark_never_lowers() {
        assert_eq!(watermark(5, Some(3), MAX_COMPLEXITY), 5);
        assert_eq!(watermark(5, Some(9), MAX_COMPLEXITY), 9);
        assert_eq!(watermark(5, None, MAX_COMPLEXITY), 5);
    }

    #[test]
    fn watermark_caps_at_ceiling() {
        assert_eq!(watermark(14, Some(20), MAX_COMPLEXITY), 15);
        assert_eq!(watermark(22, None, MAX_COMPLEXITY), 15);
    }

    #[test]
    fn negative_delta_floors_at_zero() {
        assert_eq!(add_delta(2, -5), 0);
        assert_eq!(add_delta(2, 4), 6);
    }

    #[test]
    fn bands() {
        assert_eq!(ComplexityBand::classify(12, false), ComplexityBand::Pending);
        assert_eq!(ComplexityBand::classify(5, true), ComplexityBand::Simple);
        assert_eq!(ComplexityBand::classify(6, true), ComplexityBand::Moderate);
        assert_eq!(ComplexityBand::classify(10, true), ComplexityBand::Moderate);
        assert_eq!(ComplexityBand::classify(11, true), ComplexityBand::Complex);
    }

    #[test]
    fn percent_is_capped() {
        assert_eq!(percent(0, MAX_COMPLEXITY), 0.0);
        assert_eq!(percent(15, MAX_COMPLEXITY), 100.0);
        assert_eq!(percent(30, MAX_COMPLEXITY), 100.0);
    }
}
