//! Common test utilities: the embedded graph and a small hand-written flow.
use windsor_path::prelude::*;

/// A compact flow exercising every node type.
///
/// `start` branches three ways (weighted), `pick` is a multi-choice, `describe`
/// is a free-text helper feeding the `judge` verdict, `hub` is a router and
/// `orphan` is a redirect nothing links to.
#[allow(dead_code)]
pub const MINI_FLOW_JSON: &str = r#"{
    "scenarios": {
        "fast": { "label": "Fast lane", "start": "pick" }
    },
    "tiers": { "entry": 0, "detail": 1 },
    "metadata": {
        "version": "test",
        "source": "unit fixtures",
        "last_updated": "2026-01-01",
        "disclaimer": "Not advice."
    },
    "nodes": {
        "start": {
            "id": "start",
            "type": "single_choice",
            "complexity": 1,
            "tier": "entry",
            "question": "Which lane?",
            "options": [
                { "label": "Fast", "value": "fast", "next": "pick", "weight": 0.2, "sets": { "scenario": "fast" } },
                { "label": "Slow", "value": "slow", "next": "describe", "weight": 0.7, "adds_complexity": 3 },
                { "label": "Routed", "value": "route", "next": "hub", "weight": 0.7 },
                { "label": "Not sure", "value": "unsure" }
            ]
        },
        "pick": {
            "id": "pick",
            "type": "multi_choice",
            "complexity": 2,
            "tier": "detail",
            "question": "Pick what applies",
            "options": [
                { "label": "Alpha", "value": "a", "adds_complexity": 2 },
                { "label": "Beta", "value": "b", "adds_complexity": 4 },
                { "label": "Gamma", "value": "c" }
            ],
            "next": "done"
        },
        "describe": {
            "id": "describe",
            "type": "helper",
            "complexity": 4,
            "question": "Tell us more",
            "followup": {
                "question": "What is it made of?",
                "type": "text_input",
                "placeholder": "e.g. timber",
                "analysis": {
                    "likely_not_category1": ["wood"],
                    "possibly_category1": ["steel", "dual-use"],
                    "default_next": "judge"
                }
            }
        },
        "judge": {
            "id": "judge",
            "type": "verdict",
            "complexity": 3,
            "assessment": {
                "if_not_category1": {
                    "message": "Looks fine",
                    "explanation": "Nothing on the list",
                    "sets": { "pick": "none" },
                    "next": "done"
                },
                "if_possibly_category1": {
                    "message": "Needs a closer look",
                    "explanation": "Matches a listed material",
                    "adds_complexity": 20,
                    "next": "done"
                }
            }
        },
        "hub": { "id": "hub", "type": "router" },
        "done": {
            "id": "done",
            "type": "result",
            "complexity": 2,
            "result_type": "simple",
            "title": "Done",
            "summary": "All set",
            "explanation": "Nothing else to do",
            "warnings": ["Keep records"]
        },
        "orphan": { "id": "orphan", "type": "redirect", "summary": "Handled elsewhere" }
    }
}"#;

#[allow(dead_code)]
pub fn builtin_graph() -> FlowGraph {
    FlowGraph::builtin().expect("embedded flow document must be valid")
}

#[allow(dead_code)]
pub fn mini_graph() -> FlowGraph {
    FlowGraph::from_json(MINI_FLOW_JSON).expect("mini flow must be valid")
}

/// Answers the builtin questionnaire down to the not-at-risk result:
/// GB to NI, SPS goods, no UKIMS authorisation, no Category 1, low turnover,
/// selling in NI/GB, with evidence.
#[allow(dead_code)]
pub fn walk_to_not_at_risk(machine: &mut SessionMachine<'_>) {
    machine.answer_single("movement_type", "gb_to_ni").unwrap();
    machine.answer_multi("sector_gate", &["sps"]).unwrap();
    machine.answer_single("ukims_auth", "no").unwrap();
    machine.answer_single("category1_check", "no").unwrap();
    machine.answer_single("turnover_check", "under_2m").unwrap();
    machine.answer_single("goods_purpose", "sell_ni_gb").unwrap();
    machine.answer_single("evidence_check", "yes").unwrap();
}

#[allow(dead_code)]
pub fn answers(pairs: &[(&str, &str)]) -> Answers {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), AnswerValue::from(*v)))
        .collect()
}
