//! Risk profile rules against stored answer maps.
mod common;
use common::*;
use windsor_path::prelude::*;

#[cfg(test)]
mod risk_tests {
    use super::*;

    #[test]
    fn test_empty_answers_give_baseline() {
        let profile = RiskProfileCalculator::calculate(&Answers::new());
        assert_eq!(
            (profile.audit, profile.documentary, profile.temporal, profile.judgment),
            (15, 15, 10, 15)
        );
        assert_eq!(profile.overall, 15);
        assert_eq!(profile.tone, RiskTone::Low);
        assert!(profile.notes.is_empty());
    }

    #[test]
    fn test_rest_of_world_movement() {
        let profile = RiskProfileCalculator::calculate(&answers(&[("movement_type", "row_to_ni")]));
        assert_eq!(profile.audit, 25);
        assert_eq!(profile.documentary, 25);
        assert_eq!(
            profile.notes,
            vec!["Third-country origin often triggers extra scrutiny".to_string()]
        );
    }

    #[test]
    fn test_sector_rules_read_multi_choice() {
        let mut given = Answers::new();
        given.insert(
            "sector_gate".to_string(),
            AnswerValue::Selection(vec!["excise".to_string(), "controlled".to_string()]),
        );
        let profile = RiskProfileCalculator::calculate(&given);
        assert_eq!(profile.audit, 30);
        assert_eq!(profile.documentary, 40);
        assert_eq!(profile.temporal, 15);
        assert_eq!(profile.judgment, 35);
        assert_eq!(profile.overall, 40);
        assert_eq!(profile.tone, RiskTone::Moderate);
        assert_eq!(profile.worst_dimension(), Dimension::Documentary);
        assert_eq!(
            profile.notes,
            vec![
                "Excise goods see higher enforcement".to_string(),
                "Controlled goods rely on correct classification".to_string(),
            ]
        );
    }

    #[test]
    fn test_scalar_answer_does_not_match_includes_rule() {
        let profile = RiskProfileCalculator::calculate(&answers(&[("sector_gate", "sps")]));
        assert_eq!(profile.documentary, 15);
    }

    #[test]
    fn test_reductions_clamp_at_zero_and_ceiling() {
        let profile = RiskProfileCalculator::calculate(&answers(&[
            ("movement_type", "ni_to_gb"),
            ("ukims_auth", "yes"),
        ]));
        assert_eq!(profile.audit, 5);
        assert_eq!(profile.documentary, 5);

        let mut heavy = answers(&[
            ("movement_type", "row_to_ni"),
            ("ukims_auth", "no"),
            ("turnover_check", "over_2m"),
            ("goods_purpose", "might_sell_eu"),
            ("approved_purpose_check", "no"),
            ("evidence_check", "no"),
        ]);
        heavy.insert(
            "sector_gate".to_string(),
            AnswerValue::Selection(vec!["sps".into(), "excise".into(), "controlled".into()]),
        );
        let profile = RiskProfileCalculator::calculate(&heavy);
        assert_eq!(profile.audit, 100);
        assert_eq!(profile.documentary, 100);
        assert_eq!(profile.overall, 100);
        assert_eq!(profile.tone, RiskTone::High);
    }

    #[test]
    fn test_high_tone_threshold() {
        let profile = RiskProfileCalculator::calculate(&answers(&[
            ("goods_purpose", "sell_ni_gb"),
            ("evidence_check", "no"),
        ]));
        // temporal 10 + 25 + 20, documentary 15 + 15 + 25
        assert_eq!(profile.temporal, 55);
        assert_eq!(profile.documentary, 55);
        assert_eq!(profile.tone, RiskTone::Moderate);

        let profile = RiskProfileCalculator::calculate(&answers(&[
            ("goods_purpose", "might_sell_eu"),
            ("evidence_check", "no"),
            ("approved_purpose_check", "unsure"),
        ]));
        assert_eq!(profile.temporal, 70);
        assert_eq!(profile.tone, RiskTone::High);
        assert_eq!(profile.worst_dimension(), Dimension::Temporal);
    }

    #[test]
    fn test_unknown_answers_are_ignored() {
        let profile = RiskProfileCalculator::calculate(&answers(&[
            ("category1_helper", "solar panels"),
            ("ukims_auth", "maybe"),
        ]));
        assert_eq!(profile, RiskProfileCalculator::calculate(&Answers::new()));
    }

    #[test]
    fn test_answers_from_json() {
        let given: Answers = serde_json::from_str(
            r#"{ "movement_type": "gb_to_ni", "sector_gate": ["sps"], "ukims_auth": "unsure" }"#,
        )
        .unwrap();
        let profile = RiskProfileCalculator::calculate(&given);
        assert_eq!(profile.audit, 35);
        assert_eq!(profile.judgment, 30);
        assert_eq!(profile.notes.len(), 2);
    }

    #[test]
    fn test_dimension_labels() {
        let labels: Vec<_> = Dimension::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["Audit", "Docs", "Temporal", "Judgment"]);
    }
}
