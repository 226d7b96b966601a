//! Graph loading, validation and edge derivation.
mod common;
use common::*;
use windsor_path::prelude::*;

fn with_node_replaced(id: &str, node: serde_json::Value) -> String {
    let mut doc: serde_json::Value = serde_json::from_str(MINI_FLOW_JSON).unwrap();
    doc["nodes"][id] = node;
    doc.to_string()
}

#[cfg(test)]
mod loading_tests {
    use super::*;

    #[test]
    fn test_builtin_document_loads() {
        let graph = builtin_graph();
        assert!(graph.contains("movement_type"));
        assert!(graph.contains("category1_verdict"));
        assert!(graph.warnings().is_empty());
        assert_eq!(graph.scenarios().len(), 4);
        assert!(graph.metadata().is_some());
    }

    #[test]
    fn test_builtin_scenario_starts_resolve() {
        let graph = builtin_graph();
        for scenario in graph.scenarios() {
            assert!(
                graph.contains(&scenario.start_node_id),
                "scenario '{}' starts nowhere",
                scenario.id
            );
        }
        assert_eq!(
            graph.get_scenario("ni_to_gb").unwrap().start_node_id,
            "ni_to_gb_flow"
        );
    }

    #[test]
    fn test_node_types_are_parsed() {
        let graph = mini_graph();
        let types: Vec<_> = ["start", "pick", "describe", "judge", "hub", "done", "orphan"]
            .iter()
            .map(|id| graph.get_node(id).unwrap().node_type())
            .collect();
        assert_eq!(
            types,
            vec![
                NodeType::SingleChoice,
                NodeType::MultiChoice,
                NodeType::Helper,
                NodeType::Verdict,
                NodeType::Router,
                NodeType::Result,
                NodeType::Redirect,
            ]
        );
    }

    #[test]
    fn test_router_is_reported_as_warning() {
        let graph = mini_graph();
        assert_eq!(
            graph.warnings(),
            &[GraphWarning::UnresolvedRouter {
                node_id: "hub".to_string()
            }]
        );
    }

    #[test]
    fn test_tier_rank_resolves_through_table() {
        let graph = mini_graph();
        assert_eq!(graph.tier_rank("start"), Some(0));
        assert_eq!(graph.tier_rank("pick"), Some(1));
        assert_eq!(graph.tier_rank("done"), None);
        assert_eq!(graph.tier_rank("missing"), None);
    }

    #[test]
    fn test_scenario_label_fallbacks() {
        let graph = mini_graph();
        assert_eq!(graph.scenario_label(Some("fast")), "Fast lane");
        assert_eq!(graph.scenario_label(Some("ni_to_eu")), "ni_to_eu");
        assert_eq!(graph.scenario_label(None), "");
    }

    #[test]
    fn test_get_node_unknown_is_fatal() {
        let graph = mini_graph();
        let err = graph.get_node("nowhere").unwrap_err();
        assert_eq!(err, NavigationError::NodeNotFound("nowhere".to_string()));
        assert!(err.is_fatal());
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dangling_option_next_is_rejected() {
        let doc = with_node_replaced(
            "start",
            json!({
                "id": "start", "type": "single_choice", "question": "Q",
                "options": [{ "label": "Go", "value": "go", "next": "ghost" }]
            }),
        );
        match FlowGraph::from_json(&doc) {
            Err(GraphError::NodeNotFound {
                missing_node_id,
                source_node_id,
                ..
            }) => {
                assert_eq!(missing_node_id, "ghost");
                assert_eq!(source_node_id, "start");
            }
            other => panic!("expected NodeNotFound, got {:?}", other.map(|g| g.len())),
        }
    }

    #[test]
    fn test_dangling_default_next_is_rejected() {
        let doc = with_node_replaced(
            "describe",
            json!({
                "id": "describe", "type": "helper", "question": "Q",
                "followup": {
                    "question": "What?",
                    "analysis": { "possibly_category1": [], "default_next": "ghost" }
                }
            }),
        );
        assert!(matches!(
            FlowGraph::from_json(&doc),
            Err(GraphError::NodeNotFound { missing_node_id, .. }) if missing_node_id == "ghost"
        ));
    }

    #[test]
    fn test_dangling_assessment_next_is_rejected() {
        let doc = with_node_replaced(
            "judge",
            json!({
                "id": "judge", "type": "verdict",
                "assessment": {
                    "if_not_category1": { "message": "m", "explanation": "e", "next": "done" },
                    "if_possibly_category1": { "message": "m", "explanation": "e", "next": "ghost" }
                }
            }),
        );
        assert!(matches!(
            FlowGraph::from_json(&doc),
            Err(GraphError::NodeNotFound { source_node_id, .. }) if source_node_id == "judge"
        ));
    }

    #[test]
    fn test_sets_key_must_name_a_node() {
        let doc = with_node_replaced(
            "start",
            json!({
                "id": "start", "type": "single_choice", "question": "Q",
                "options": [{
                    "label": "Go", "value": "go", "next": "done",
                    "sets": { "scenario": "anything", "not_a_node": "x" }
                }]
            }),
        );
        assert!(matches!(
            FlowGraph::from_json(&doc),
            Err(GraphError::NodeNotFound { missing_node_id, .. }) if missing_node_id == "not_a_node"
        ));
    }

    #[test]
    fn test_key_and_id_must_agree() {
        let doc = with_node_replaced(
            "orphan",
            json!({ "id": "somebody_else", "type": "redirect" }),
        );
        assert_eq!(
            FlowGraph::from_json(&doc).unwrap_err(),
            GraphError::NodeIdMismatch {
                key: "orphan".to_string(),
                id: "somebody_else".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_option_values_are_rejected() {
        let doc = with_node_replaced(
            "start",
            json!({
                "id": "start", "type": "single_choice", "question": "Q",
                "options": [
                    { "label": "A", "value": "same", "next": "done" },
                    { "label": "B", "value": "same", "next": "pick" }
                ]
            }),
        );
        assert!(matches!(
            FlowGraph::from_json(&doc),
            Err(GraphError::DuplicateOptionValue { value, .. }) if value == "same"
        ));
    }

    #[test]
    fn test_scenario_start_must_exist() {
        let mut doc: serde_json::Value = serde_json::from_str(MINI_FLOW_JSON).unwrap();
        doc["scenarios"]["broken"] = json!({ "label": "Broken", "start": "nowhere" });
        assert_eq!(
            FlowGraph::from_json(&doc.to_string()).unwrap_err(),
            GraphError::ScenarioStartNotFound {
                scenario_id: "broken".to_string(),
                missing_node_id: "nowhere".to_string()
            }
        );
    }

    #[test]
    fn test_followup_needs_exactly_one_response_kind() {
        let neither = with_node_replaced(
            "describe",
            json!({
                "id": "describe", "type": "helper", "question": "Q",
                "followup": { "question": "What?", "type": "text_input" }
            }),
        );
        assert!(matches!(
            FlowGraph::from_json(&neither),
            Err(GraphError::JsonParseError(_))
        ));

        let both = with_node_replaced(
            "describe",
            json!({
                "id": "describe", "type": "helper", "question": "Q",
                "followup": {
                    "question": "What?",
                    "options": [{ "label": "A", "value": "a", "next": "done" }],
                    "analysis": { "default_next": "done" }
                }
            }),
        );
        assert!(matches!(
            FlowGraph::from_json(&both),
            Err(GraphError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(
            FlowGraph::from_json("{ not json"),
            Err(GraphError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        assert!(matches!(
            FlowDefinition::from_file("does/not/exist.json"),
            Err(GraphError::Io { .. })
        ));
    }
}

#[cfg(test)]
mod edge_tests {
    use super::*;

    #[test]
    fn test_single_choice_edges_follow_options_with_next() {
        let graph = mini_graph();
        let edges = graph.get_outgoing_edges("start").unwrap();
        let vias: Vec<_> = edges.iter().filter_map(|e| e.via.as_deref()).collect();
        assert_eq!(vias, vec!["fast", "slow", "route"]);
        assert!(edges.iter().all(|e| e.kind == EdgeKind::Option));
    }

    #[test]
    fn test_multi_choice_has_single_default_edge() {
        let graph = mini_graph();
        let edges = graph.get_outgoing_edges("pick").unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::Default);
        assert_eq!(edges[0].to, EdgeTarget::Node("done".to_string()));
    }

    #[test]
    fn test_router_edge_is_dynamic() {
        let graph = mini_graph();
        let edges = graph.get_outgoing_edges("hub").unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, EdgeTarget::Dynamic);
        assert_eq!(edges[0].to.node_id(), None);
    }

    #[test]
    fn test_terminal_nodes_have_no_edges() {
        let graph = mini_graph();
        for id in ["describe", "judge", "done", "orphan"] {
            assert!(graph.get_outgoing_edges(id).unwrap().is_empty(), "{}", id);
        }
    }

    #[test]
    fn test_edges_of_unknown_node_fail() {
        let graph = mini_graph();
        assert!(graph.get_outgoing_edges("ghost").unwrap_err().is_fatal());
    }

    #[test]
    fn test_prediction_prefers_weight_then_declaration_order() {
        let graph = mini_graph();
        let predicted = graph.predict_next_edge("start").unwrap().unwrap();
        assert_eq!(predicted.via.as_deref(), Some("slow"));
    }

    #[test]
    fn test_prediction_without_weights_takes_first_edge() {
        let graph = builtin_graph();
        let predicted = graph.predict_next_edge("movement_type").unwrap().unwrap();
        assert_eq!(predicted.via.as_deref(), Some("gb_to_ni"));
        assert_eq!(graph.predict_next_edge("done_never").ok(), None);
        assert_eq!(graph.predict_next_edge("not_at_risk_result").unwrap(), None);
    }
}

#[cfg(test)]
mod reachability_tests {
    use super::*;

    #[test]
    fn test_reachable_from_follows_every_transition() {
        let graph = mini_graph();
        let reachable = graph.reachable_from("start").unwrap();
        for id in ["start", "pick", "describe", "judge", "hub", "done"] {
            assert!(reachable.contains(id), "{} should be reachable", id);
        }
        assert!(!reachable.contains("orphan"));
    }

    #[test]
    fn test_unreachable_from_lists_orphans() {
        let graph = mini_graph();
        assert_eq!(graph.unreachable_from(["start"]).unwrap(), vec!["orphan"]);
    }

    #[test]
    fn test_builtin_dead_ends_are_known() {
        let graph = builtin_graph();
        let mut starts = vec!["movement_type"];
        starts.extend(graph.scenarios().iter().map(|s| s.start_node_id.as_str()));
        let unreachable = graph.unreachable_from(starts).unwrap();
        assert!(unreachable.contains(&"ni_destination_check".to_string()));
        assert!(!unreachable.contains(&"category1_verdict".to_string()));
    }
}

#[cfg(test)]
mod result_view_tests {
    use super::*;
    use windsor_path::flow::ResultKind;

    #[test]
    fn test_result_node_view() {
        let graph = mini_graph();
        let view = graph.result_view("done").unwrap();
        assert_eq!(view.result_type, ResultKind::Simple);
        assert_eq!(view.title, "Done");
        assert_eq!(view.warnings, vec!["Keep records".to_string()]);
    }

    #[test]
    fn test_redirect_becomes_edge_case() {
        let graph = mini_graph();
        let view = graph.result_view("orphan").unwrap();
        assert_eq!(view.result_type, ResultKind::EdgeCase);
        assert_eq!(view.title, "Redirect");
        assert!(view.summary.is_empty());
    }

    #[test]
    fn test_question_nodes_have_no_view() {
        let graph = mini_graph();
        assert!(graph.result_view("start").is_none());
        assert!(graph.result_view("ghost").is_none());
    }
}
