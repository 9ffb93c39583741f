use crate::model::{AnalysisOutcome, QualityMeasurement};
use crate::policy::schema::{DatasetPolicy, QualityIndicatorDef};

/// Result of evaluating a dataset's quality indicators against one outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityAssessment {
    /// Warning texts of the indicators that fired, in policy order.
    pub warnings: Vec<String>,
    pub degraded: bool,
}

/// Evaluate the policy's quality indicators against the outcome's measurements.
///
/// Indicators restricted to other planning contexts are skipped. The upstream
/// `qualityDegraded` flag counts as degraded even when no indicator fires.
pub fn assess(
    outcome: &AnalysisOutcome,
    policy: Option<&DatasetPolicy>,
    context: Option<&str>,
) -> QualityAssessment {
    let warnings: Vec<String> = policy
        .map(|p| {
            p.quality_indicators
                .iter()
                .filter(|qi| qi.applies_to(context))
                .filter(|qi| indicator_fires(qi, &outcome.quality_measurement))
                .map(|qi| qi.warning_text.clone())
                .collect()
        })
        .unwrap_or_default();

    QualityAssessment {
        degraded: outcome.quality_degraded || !warnings.is_empty(),
        warnings,
    }
}

fn indicator_fires(indicator: &QualityIndicatorDef, measurements: &[QualityMeasurement]) -> bool {
    let Some(measurement) = measurements
        .iter()
        .find(|qm| qm.quality_dimension_id == indicator.quality_dimension_id)
    else {
        return false;
    };

    let value = measurement.value_text();
    indicator
        .threshold_values()
        .iter()
        .any(|threshold| *threshold == value)
}

/// Append warnings that are not already present, keeping existing order.
pub fn merge_warnings(existing: &[String], derived: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for warning in derived {
        if !merged.contains(warning) {
            merged.push(warning.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> DatasetPolicy {
        DatasetPolicy {
            dataset_id: "flom".into(),
            title: None,
            legally_binding: false,
            quality_indicators: vec![QualityIndicatorDef {
                quality_dimension_id: "egnethet_reguleringsplan".into(),
                warning_threshold: "0 OR 1".into(),
                warning_text: "Lite egnet".into(),
                contexts: vec![],
            }],
        }
    }

    fn outcome_with(value: serde_json::Value) -> AnalysisOutcome {
        AnalysisOutcome {
            quality_measurement: vec![QualityMeasurement {
                quality_dimension_id: "egnethet_reguleringsplan".into(),
                quality_dimension_name: Some("Reguleringsplan".into()),
                value,
                comment: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_indicator_fires_on_threshold_value() {
        let assessment = assess(&outcome_with(json!(1)), Some(&policy()), None);
        assert!(assessment.degraded);
        assert_eq!(assessment.warnings, vec!["Lite egnet"]);
    }

    #[test]
    fn test_indicator_matches_string_values() {
        let assessment = assess(&outcome_with(json!("0")), Some(&policy()), None);
        assert!(assessment.degraded);
    }

    #[test]
    fn test_indicator_silent_above_threshold() {
        let assessment = assess(&outcome_with(json!(4)), Some(&policy()), None);
        assert!(!assessment.degraded);
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn test_context_restricted_indicator() {
        let mut restricted = policy();
        restricted.quality_indicators[0].contexts = vec!["byggesak".into()];
        let outcome = outcome_with(json!(1));

        let assessment = assess(&outcome, Some(&restricted), Some("byggesak"));
        assert_eq!(assessment.warnings, vec!["Lite egnet"]);

        let assessment = assess(&outcome, Some(&restricted), Some("reguleringsplan"));
        assert!(!assessment.degraded);
        assert!(assessment.warnings.is_empty());

        let assessment = assess(&outcome, Some(&restricted), None);
        assert!(!assessment.degraded);
    }

    #[test]
    fn test_upstream_flag_without_policy() {
        let outcome = AnalysisOutcome {
            quality_degraded: true,
            ..Default::default()
        };
        let assessment = assess(&outcome, None, None);
        assert!(assessment.degraded);
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn test_merge_warnings_skips_duplicates() {
        let merged = merge_warnings(
            &["Lite egnet".to_string()],
            &["Lite egnet".to_string(), "Usikker".to_string()],
        );
        assert_eq!(merged, vec!["Lite egnet", "Usikker"]);
    }
}
