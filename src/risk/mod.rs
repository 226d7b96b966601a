//! The four-dimensional risk profile derived from a session's answers.
//!
//! Each dimension starts at a fixed baseline and is moved by an ordered list of
//! answer-keyed adjustments (see `rules.rs`). The overall score is the worst
//! dimension, never an average.

use crate::session::Answers;
use serde::Serialize;
use std::fmt;

mod rules;

use rules::RULES;

/// Upper bound of every dimension score.
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Audit,
    Documentary,
    Temporal,
    Judgment,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Audit,
        Dimension::Documentary,
        Dimension::Temporal,
        Dimension::Judgment,
    ];

    fn baseline(self) -> u32 {
        match self {
            Dimension::Audit => 15,
            Dimension::Documentary => 15,
            Dimension::Temporal => 10,
            Dimension::Judgment => 15,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Audit => "Audit",
            Dimension::Documentary => "Docs",
            Dimension::Temporal => "Temporal",
            Dimension::Judgment => "Judgment",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTone {
    Low,
    Moderate,
    High,
}

impl RiskTone {
    pub fn from_overall(overall: u32) -> Self {
        if overall >= 70 {
            RiskTone::High
        } else if overall >= 40 {
            RiskTone::Moderate
        } else {
            RiskTone::Low
        }
    }
}

impl fmt::Display for RiskTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTone::Low => write!(f, "low"),
            RiskTone::Moderate => write!(f, "moderate"),
            RiskTone::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RiskProfile {
    pub audit: u32,
    pub documentary: u32,
    pub temporal: u32,
    pub judgment: u32,
    pub overall: u32,
    pub tone: RiskTone,
    pub notes: Vec<String>,
}

impl RiskProfile {
    pub fn score(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Audit => self.audit,
            Dimension::Documentary => self.documentary,
            Dimension::Temporal => self.temporal,
            Dimension::Judgment => self.judgment,
        }
    }

    /// The first dimension holding the overall score.
    pub fn worst_dimension(&self) -> Dimension {
        Dimension::ALL
            .into_iter()
            .find(|d| self.score(*d) == self.overall)
            .unwrap_or(Dimension::Audit)
    }
}

pub struct RiskProfileCalculator;

impl RiskProfileCalculator {
    /// Computes the profile from scratch. Identical answers always give an
    /// identical profile, notes included.
    pub fn calculate(answers: &Answers) -> RiskProfile {
        let mut scores = Dimension::ALL.map(Dimension::baseline);
        let mut notes = Vec::new();

        for rule in RULES.iter().filter(|rule| rule.when.holds(answers)) {
            for adjustment in rule.adjustments {
                let slot = &mut scores[adjustment.dimension as usize];
                *slot = clamp_score(*slot as i64 + adjustment.amount as i64);
                if let Some(note) = adjustment.note {
                    notes.push(note.to_string());
                }
            }
        }

        let [audit, documentary, temporal, judgment] = scores;
        let overall = scores.into_iter().max().unwrap_or(0).min(MAX_SCORE);

        RiskProfile {
            audit,
            documentary,
            temporal,
            judgment,
            overall,
            tone: RiskTone::from_overall(overall),
            notes,
        }
    }
}

fn clamp_score(value: i64) -> u32 {
    value.clamp(0, MAX_SCORE as i64) as u32
}
