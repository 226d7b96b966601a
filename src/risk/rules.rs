use super::Dimension::{self, Audit, Documentary, Judgment, Temporal};
use crate::session::Answers;

/// When a rule fires.
pub(super) enum Condition {
    /// The answer under `key` is exactly `value`.
    Equals(&'static str, &'static str),
    /// The multi-choice answer under `key` contains `value`.
    Includes(&'static str, &'static str),
}

impl Condition {
    pub(super) fn holds(&self, answers: &Answers) -> bool {
        match self {
            Condition::Equals(key, value) => answers
                .get(*key)
                .and_then(|answer| answer.as_str())
                .is_some_and(|answer| answer == *value),
            Condition::Includes(key, value) => answers
                .get(*key)
                .and_then(|answer| answer.as_selection())
                .is_some_and(|selected| selected.iter().any(|v| v == *value)),
        }
    }
}

pub(super) struct Adjustment {
    pub dimension: Dimension,
    pub amount: i32,
    pub note: Option<&'static str>,
}

const fn bump(dimension: Dimension, amount: i32) -> Adjustment {
    Adjustment {
        dimension,
        amount,
        note: None,
    }
}

const fn noted(dimension: Dimension, amount: i32, note: &'static str) -> Adjustment {
    Adjustment {
        dimension,
        amount,
        note: Some(note),
    }
}

pub(super) struct RiskRule {
    pub when: Condition,
    pub adjustments: &'static [Adjustment],
}

use Condition::{Equals, Includes};

/// Applied top to bottom; the order fixes the order of the notes.
pub(super) const RULES: &[RiskRule] = &[
    // Movement
    RiskRule {
        when: Equals("movement_type", "row_to_ni"),
        adjustments: &[
            noted(Audit, 10, "Third-country origin often triggers extra scrutiny"),
            bump(Documentary, 10),
        ],
    },
    RiskRule {
        when: Equals("movement_type", "ni_to_gb"),
        adjustments: &[bump(Audit, -5), bump(Documentary, -5)],
    },
    // Sector
    RiskRule {
        when: Includes("sector_gate", "sps"),
        adjustments: &[
            noted(Documentary, 20, "SPS goods increase evidence burden"),
            bump(Audit, 10),
            bump(Judgment, 5),
        ],
    },
    RiskRule {
        when: Includes("sector_gate", "excise"),
        adjustments: &[
            noted(Audit, 15, "Excise goods see higher enforcement"),
            bump(Documentary, 10),
            bump(Temporal, 5),
        ],
    },
    RiskRule {
        when: Includes("sector_gate", "controlled"),
        adjustments: &[
            noted(Judgment, 20, "Controlled goods rely on correct classification"),
            bump(Documentary, 15),
        ],
    },
    // Authorisation
    RiskRule {
        when: Equals("ukims_auth", "yes"),
        adjustments: &[bump(Audit, -5), bump(Documentary, -5)],
    },
    RiskRule {
        when: Equals("ukims_auth", "no"),
        adjustments: &[
            noted(Audit, 20, "No UKIMS increases checks"),
            bump(Documentary, 15),
            bump(Judgment, 10),
        ],
    },
    RiskRule {
        when: Equals("ukims_auth", "unsure"),
        adjustments: &[
            noted(Audit, 10, "Unclear authorization status"),
            bump(Judgment, 10),
        ],
    },
    // Turnover
    RiskRule {
        when: Equals("turnover_check", "over_2m"),
        adjustments: &[
            noted(Audit, 10, "Higher turnover can target audits"),
            bump(Documentary, 10),
        ],
    },
    RiskRule {
        when: Equals("turnover_check", "unsure"),
        adjustments: &[bump(Judgment, 5)],
    },
    // Purpose
    RiskRule {
        when: Equals("goods_purpose", "process_ni"),
        adjustments: &[
            noted(Judgment, 20, "Processing claims require interpretation"),
            bump(Documentary, 10),
            bump(Temporal, 10),
        ],
    },
    RiskRule {
        when: Equals("goods_purpose", "sell_ni_gb"),
        adjustments: &[
            noted(Temporal, 25, "Relies on predicting customer behavior"),
            bump(Documentary, 15),
        ],
    },
    RiskRule {
        when: Equals("goods_purpose", "might_sell_eu"),
        adjustments: &[
            noted(Temporal, 30, "Uncertain destination"),
            bump(Audit, 10),
            bump(Judgment, 10),
        ],
    },
    // Approved purpose
    RiskRule {
        when: Equals("approved_purpose_check", "no"),
        adjustments: &[
            noted(Judgment, 15, "Not approved purpose increases interpretation risk"),
            bump(Audit, 10),
            bump(Temporal, 10),
            bump(Documentary, 15),
        ],
    },
    RiskRule {
        when: Equals("approved_purpose_check", "unsure"),
        adjustments: &[bump(Judgment, 10), bump(Temporal, 10)],
    },
    // Evidence
    RiskRule {
        when: Equals("evidence_check", "yes"),
        adjustments: &[
            bump(Documentary, 5),
            noted(Temporal, 10, "Need to monitor over time"),
        ],
    },
    RiskRule {
        when: Equals("evidence_check", "no"),
        adjustments: &[
            noted(Documentary, 25, "Evidence gap drives cost"),
            bump(Audit, 10),
            bump(Temporal, 20),
        ],
    },
    RiskRule {
        when: Equals("evidence_check", "unsure"),
        adjustments: &[bump(Documentary, 15), bump(Temporal, 15)],
    },
];
