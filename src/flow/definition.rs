use super::option::{FlowOption, Sets};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The complete flow document: scenarios, nodes, tier ordering and metadata.
/// This is the unvalidated input to `FlowGraph::new`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowDefinition {
    #[serde(default)]
    pub scenarios: AHashMap<String, ScenarioDefinition>,
    pub nodes: AHashMap<String, FlowNode>,
    #[serde(default)]
    pub tiers: AHashMap<String, u32>,
    #[serde(default)]
    pub metadata: Option<FlowMetadata>,
}

/// A named entry point as written in the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioDefinition {
    pub label: String,
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetadata {
    pub version: String,
    pub source: String,
    pub last_updated: String,
    pub disclaimer: String,
}

/// A single position in the decision graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowNode {
    pub id: String,
    /// Base weight folded into the session complexity watermark on arrival.
    #[serde(default)]
    pub complexity: Option<u32>,
    /// Display-only ordering label, resolved through the document's `tiers` table.
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// The node payload, discriminated by the document's `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    SingleChoice(QuestionNode),
    MultiChoice(MultiChoiceNode),
    Helper(HelperNode),
    Verdict(VerdictNode),
    Result(ResultNode),
    Redirect(RedirectNode),
    Router,
}

/// Payload-free discriminant of `NodeKind`, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    SingleChoice,
    MultiChoice,
    Helper,
    Verdict,
    Result,
    Redirect,
    Router,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::SingleChoice => "single_choice",
            NodeType::MultiChoice => "multi_choice",
            NodeType::Helper => "helper",
            NodeType::Verdict => "verdict",
            NodeType::Result => "result",
            NodeType::Redirect => "redirect",
            NodeType::Router => "router",
        };
        f.pad(name)
    }
}

impl FlowNode {
    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::SingleChoice(_) => NodeType::SingleChoice,
            NodeKind::MultiChoice(_) => NodeType::MultiChoice,
            NodeKind::Helper(_) => NodeType::Helper,
            NodeKind::Verdict(_) => NodeType::Verdict,
            NodeKind::Result(_) => NodeType::Result,
            NodeKind::Redirect(_) => NodeType::Redirect,
            NodeKind::Router => NodeType::Router,
        }
    }

    /// The prompt shown for question-like nodes.
    pub fn prompt(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::SingleChoice(q) => Some(&q.prompt),
            NodeKind::MultiChoice(m) => Some(&m.prompt),
            NodeKind::Helper(h) => Some(&h.prompt),
            _ => None,
        }
    }

    /// Every option a user can pick on this node, whether declared directly
    /// or on a helper's followup.
    pub fn selectable_options(&self) -> &[FlowOption] {
        match &self.kind {
            NodeKind::SingleChoice(q) => &q.options,
            NodeKind::MultiChoice(m) => &m.options,
            NodeKind::Helper(h) => match &h.followup.response {
                FollowupResponse::Options(options) => options,
                FollowupResponse::FreeText(_) => &[],
            },
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionNode {
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub expectation: Option<Expectation>,
    #[serde(default)]
    pub learn_more: Option<LearnMore>,
    pub options: Vec<FlowOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultiChoiceNode {
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default)]
    pub help: Option<String>,
    pub options: Vec<FlowOption>,
    /// Multi-select never branches per option.
    pub next: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HelperNode {
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default)]
    pub explanation: Option<String>,
    pub followup: Followup,
}

/// The single followup question of a helper node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFollowup")]
pub struct Followup {
    pub prompt: String,
    pub response: FollowupResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FollowupResponse {
    Options(Vec<FlowOption>),
    FreeText(FreeTextFollowup),
}

/// A free-text followup. The text never affects the transition itself;
/// the keyword lists are only read by the verdict evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeTextFollowup {
    pub placeholder: Option<String>,
    pub hint: Option<String>,
    pub likely_not: Vec<String>,
    pub possibly: Vec<String>,
    pub default_next: String,
}

#[derive(Deserialize)]
struct RawFollowup {
    question: String,
    #[serde(default, rename = "type")]
    input_type: Option<String>,
    #[serde(default)]
    options: Option<Vec<FlowOption>>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    analysis: Option<RawAnalysis>,
}

#[derive(Deserialize)]
struct RawAnalysis {
    #[serde(default, alias = "likelyNot")]
    likely_not_category1: Vec<String>,
    #[serde(default, alias = "possibly")]
    possibly_category1: Vec<String>,
    #[serde(alias = "defaultNext")]
    default_next: String,
}

impl TryFrom<RawFollowup> for Followup {
    type Error = String;

    fn try_from(raw: RawFollowup) -> Result<Self, Self::Error> {
        let response = match (raw.options, raw.analysis) {
            (Some(options), None) => FollowupResponse::Options(options),
            (None, Some(analysis)) => FollowupResponse::FreeText(FreeTextFollowup {
                placeholder: raw.placeholder,
                hint: raw.hint,
                likely_not: analysis.likely_not_category1,
                possibly: analysis.possibly_category1,
                default_next: analysis.default_next,
            }),
            (Some(_), Some(_)) => {
                return Err(format!(
                    "followup '{}' declares both options and a text analysis",
                    raw.question
                ));
            }
            (None, None) => {
                return Err(format!(
                    "followup '{}' declares neither options nor a text analysis{}",
                    raw.question,
                    if raw.input_type.as_deref() == Some("text_input") {
                        " (text_input requires an analysis block)"
                    } else {
                        ""
                    }
                ));
            }
        };
        Ok(Followup {
            prompt: raw.question,
            response,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerdictNode {
    #[serde(rename = "assessment")]
    pub assessments: VerdictAssessments,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerdictAssessments {
    pub if_not_category1: Assessment,
    pub if_possibly_category1: Assessment,
}

/// A canned verdict outcome. Choosing it merges `sets`, adds
/// `adds_complexity` and moves to `next`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assessment {
    pub message: String,
    pub explanation: String,
    #[serde(default)]
    pub adds_complexity: i32,
    #[serde(default)]
    pub sets: Sets,
    pub next: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    NotAtRisk,
    AtRisk,
    EdgeCase,
    Simple,
    Moderate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultNode {
    pub result_type: ResultKind,
    pub title: String,
    pub summary: String,
    pub explanation: String,
    #[serde(default)]
    pub requirements: Vec<RequirementBlock>,
    #[serde(default)]
    pub actions: Vec<ActionItem>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub why_complex: Vec<String>,
}

/// Like a result, but every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RedirectNode {
    #[serde(default)]
    pub result_type: Option<ResultKind>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub requirements: Vec<RequirementBlock>,
    #[serde(default)]
    pub actions: Vec<ActionItem>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub why_complex: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementBlock {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    Immediate,
    BeforeFirstShipment,
    Ongoing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: ActionPriority,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expectation {
    pub typical_steps: String,
    pub common_triggers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LearnMore {
    pub title: String,
    pub content: String,
}
