//! Read-only presentation of a session: breadcrumbs, the copyable report and
//! result summaries.

use crate::flow::{ActionItem, Recommendation, RequirementBlock, ResultKind};
use itertools::Itertools;
use serde::Serialize;

mod formatter;

pub use formatter::ReportFormatter;

/// Short label used for a node in breadcrumbs and report rows.
pub fn short_label(node_id: &str) -> &'static str {
    match node_id {
        "movement_type" => "Movement",
        "sector_gate" => "Goods type",
        "ukims_auth" => "UKIMS status",
        "category1_check" => "Category 1",
        "turnover_check" => "Turnover",
        "goods_purpose" => "Purpose",
        "approved_purpose_check" => "Approved purpose",
        "evidence_check" => "Evidence",
        "ni_destination_check" => "Destination",
        _ => "Detail",
    }
}

/// "Coming up next" hint for a question card.
pub fn preview(node_id: &str) -> Option<&'static str> {
    let text = match node_id {
        "origin_check" | "destination_check" => {
            "We’ll ask about: authorization status, goods type, business turnover, and intended use."
        }
        "ukims_auth" => {
            "We’ll ask about: goods classification, business turnover, and end destination."
        }
        "category1_check" => "We’ll ask about: business turnover and what you’ll do with the goods.",
        "turnover_check" => "We’ll ask about: what you’ll do with the goods and proof of destination.",
        "goods_purpose" => "Almost done! 1-2 more questions about documentation and evidence.",
        "approved_purpose_check" | "evidence_check" => {
            "Final question coming up, then we’ll show your results."
        }
        _ => return None,
    };
    Some(text)
}

/// One answered step, in history order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailEntry {
    pub node_id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub node_id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `Label: value` lines, as copied to the clipboard.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{}: {}", row.label, row.value))
            .join("\n")
    }
}

/// A result or redirect node flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub node_id: String,
    pub result_type: ResultKind,
    pub title: String,
    pub summary: String,
    pub explanation: String,
    pub requirements: Vec<RequirementBlock>,
    pub actions: Vec<ActionItem>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub why_complex: Vec<String>,
}
