use crate::classify::outcome::{ClassifiedResult, DataAnomaly};
use crate::classify::status::ResultStatus;
use crate::error::ArealError;
use crate::model::{AnalysisOutcome, EvaluationError};
use crate::normalize::{self, Locale, DISTANCE_CAP_M};
use crate::policy::schema::PolicySet;
use crate::quality;
use crate::ClassifyOptions;

/// Planning context in which distant objects are still considered reliable.
pub const BUILDING_MATTER_CONTEXT: &str = "byggesak";

/// Inputs to classification that do not come from the outcome itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyContext {
    /// The dataset is a legally binding constraint.
    pub legally_binding: bool,
    /// Positional accuracy or reliability is too poor for this geometry.
    pub quality_degraded: bool,
}

/// Assign a status to one outcome. First matching rule wins.
pub fn classify(outcome: &AnalysisOutcome, ctx: &ClassifyContext) -> ResultStatus {
    if outcome.is_excluded_from_analysis {
        return ResultStatus::NotRelevant;
    }

    match outcome.evaluation_error {
        EvaluationError::Timeout => return ResultStatus::Timeout,
        EvaluationError::Error => return ResultStatus::Error,
        EvaluationError::None => {}
    }

    // Zero is a hit: a point or line touching the parcel has no area.
    if outcome.hit_area.is_some() {
        return if ctx.legally_binding {
            ResultStatus::HitRed
        } else {
            ResultStatus::HitYellow
        };
    }

    if ctx.quality_degraded || is_touching_without_hit(outcome) {
        return ResultStatus::NoHitYellow;
    }

    ResultStatus::NoHitGreen
}

fn is_touching_without_hit(outcome: &AnalysisOutcome) -> bool {
    outcome.hit_area.is_none() && outcome.distance_to_object == Some(0.0)
}

/// Inconsistencies in an outcome that classification tolerates but reports.
pub fn detect_anomalies(outcome: &AnalysisOutcome) -> Vec<DataAnomaly> {
    let mut anomalies = Vec::new();
    if is_touching_without_hit(outcome) {
        anomalies.push(DataAnomaly::TouchingWithoutHit);
    }
    if let Some(hit_area) = outcome.hit_area {
        if outcome.input_geometry_area > 0.0 && hit_area > outcome.input_geometry_area {
            anomalies.push(DataAnomaly::HitAreaExceedsInput);
        }
    }
    anomalies
}

/// Classify an outcome under a dataset policy and attach display values.
pub fn classify_outcome(
    outcome: &AnalysisOutcome,
    policy: &PolicySet,
    options: &ClassifyOptions,
) -> Result<ClassifiedResult, ArealError> {
    if outcome.is_excluded_from_analysis {
        return Ok(ClassifiedResult {
            outcome: outcome.clone(),
            result_status: ResultStatus::NotRelevant,
            display_distance: None,
            display_hit_percent: None,
            reason: "excluded from analysis by the municipality's map baseline -> NOT-RELEVANT"
                .into(),
            anomalies: Vec::new(),
        });
    }

    let dataset_policy = outcome.dataset_id().and_then(|id| policy.lookup(id));
    let assessment = quality::assess(outcome, dataset_policy, options.context.as_deref());
    let beyond_range_degraded = options.beyond_range_is_uncertain
        && options.context.as_deref() != Some(BUILDING_MATTER_CONTEXT)
        && outcome.hit_area.is_none()
        && outcome.distance_to_object.is_some_and(|d| d >= DISTANCE_CAP_M);

    let ctx = ClassifyContext {
        legally_binding: dataset_policy.is_some_and(|p| p.legally_binding),
        quality_degraded: assessment.degraded || beyond_range_degraded,
    };
    let status = classify(outcome, &ctx);

    let mut classified_outcome = outcome.clone();
    classified_outcome.quality_warning =
        quality::merge_warnings(&outcome.quality_warning, &assessment.warnings);

    if status.is_failure() {
        let reason = match status {
            ResultStatus::Timeout => "evaluation timed out -> TIMEOUT",
            _ => "evaluation failed -> ERROR",
        };
        return Ok(ClassifiedResult {
            outcome: classified_outcome,
            result_status: status,
            display_distance: None,
            display_hit_percent: None,
            reason: reason.into(),
            anomalies: Vec::new(),
        });
    }

    validate_numbers(outcome)?;

    let anomalies = detect_anomalies(outcome);
    for anomaly in &anomalies {
        log::warn!(
            "data anomaly '{}' in dataset '{}' (hit area {:?}, distance {:?})",
            anomaly,
            outcome.display_label().unwrap_or("<untitled>"),
            outcome.hit_area,
            outcome.distance_to_object
        );
    }

    let (display_hit_percent, display_distance) = display_values(outcome, options.locale)?;
    let reason = build_reason(
        outcome,
        status,
        &ctx,
        &classified_outcome.quality_warning,
        &anomalies,
        options.locale,
    );

    Ok(ClassifiedResult {
        outcome: classified_outcome,
        result_status: status,
        display_distance,
        display_hit_percent,
        reason,
        anomalies,
    })
}

/// Negative or NaN geometry measures are upstream bugs, never display nuances.
fn validate_numbers(outcome: &AnalysisOutcome) -> Result<(), ArealError> {
    let label = outcome.display_label().unwrap_or("<untitled>");

    if let Some(distance) = outcome.distance_to_object {
        if distance.is_nan() || distance < 0.0 {
            return Err(ArealError::Validation(format!(
                "dataset '{label}' has invalid distance {distance} m"
            )));
        }
    }

    if let Some(hit_area) = outcome.hit_area {
        if !hit_area.is_finite() || hit_area < 0.0 {
            return Err(ArealError::Validation(format!(
                "dataset '{label}' has invalid hit area {hit_area} m²"
            )));
        }
    }

    Ok(())
}

/// Hit percentage when the hit has an area, otherwise the distance when it says anything.
fn display_values(
    outcome: &AnalysisOutcome,
    locale: Locale,
) -> Result<(Option<String>, Option<String>), ArealError> {
    if let Some(hit_area) = outcome.hit_area.filter(|a| *a != 0.0) {
        let percent =
            normalize::normalize_percent_with(hit_area, outcome.input_geometry_area, locale)
                .map_err(|e| match e {
                    ArealError::Validation(msg) => ArealError::Validation(format!(
                        "dataset '{}': {msg}",
                        outcome.display_label().unwrap_or("<untitled>")
                    )),
                    other => other,
                })?;
        return Ok((Some(percent), None));
    }

    let distance = match outcome.distance_to_object.filter(|d| *d != 0.0) {
        Some(d) => Some(normalize::normalize_distance_with(d, locale)?),
        None => None,
    };
    Ok((None, distance))
}

fn build_reason(
    outcome: &AnalysisOutcome,
    status: ResultStatus,
    ctx: &ClassifyContext,
    warnings: &[String],
    anomalies: &[DataAnomaly],
    locale: Locale,
) -> String {
    match status {
        ResultStatus::HitRed | ResultStatus::HitYellow => {
            let binding = if ctx.legally_binding {
                " in legally binding dataset"
            } else {
                ""
            };
            match outcome.hit_area {
                Some(area) if area != 0.0 => format!("hit area {area} m²{binding} -> {status}"),
                _ => format!("touches parcel without area (point or line){binding} -> {status}"),
            }
        }
        ResultStatus::NoHitYellow => {
            if anomalies.contains(&DataAnomaly::TouchingWithoutHit) {
                format!("no hit registered at distance 0 m (data anomaly) -> {status}")
            } else if warnings.is_empty() {
                format!("no hit, but dataset quality is uncertain for this area -> {status}")
            } else {
                format!("no hit, but {} -> {status}", warnings.join("; "))
            }
        }
        ResultStatus::NoHitGreen => match outcome.distance_to_object {
            Some(d) if d > 0.0 => {
                let shown = normalize::normalize_distance_with(d, locale)
                    .unwrap_or_else(|_| format!("{d} m"));
                format!("no hit, nearest object {shown} -> {status}")
            }
            _ => format!("no hit -> {status}"),
        },
        ResultStatus::Timeout => "evaluation timed out -> TIMEOUT".into(),
        ResultStatus::Error => "evaluation failed -> ERROR".into(),
        ResultStatus::NotRelevant => {
            "excluded from analysis by the municipality's map baseline -> NOT-RELEVANT".into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatasetInfo;
    use crate::policy::parse_policy_str;

    const SENTINEL: f64 = 9223372036854776000.0;

    fn outcome(dataset_id: &str) -> AnalysisOutcome {
        AnalysisOutcome {
            run_on_dataset: Some(DatasetInfo {
                dataset_id: Some(dataset_id.into()),
                title: Some(dataset_id.to_uppercase()),
                ..Default::default()
            }),
            themes: vec!["Natur".into()],
            input_geometry_area: 83854.69,
            ..Default::default()
        }
    }

    fn policy() -> PolicySet {
        parse_policy_str(
            r#"{
                "name": "Test",
                "version": "1.0",
                "datasets": [
                    { "dataset_id": "flom", "legally_binding": true },
                    {
                        "dataset_id": "skred",
                        "quality_indicators": [
                            { "quality_dimension_id": "egnethet", "warning_threshold": "0 OR 1", "warning_text": "Lite egnet" }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_excluded_wins_over_everything() {
        let mut o = outcome("flom");
        o.is_excluded_from_analysis = true;
        o.hit_area = Some(100.0);
        o.evaluation_error = EvaluationError::Timeout;
        let ctx = ClassifyContext {
            legally_binding: true,
            quality_degraded: true,
        };
        assert_eq!(classify(&o, &ctx), ResultStatus::NotRelevant);
    }

    #[test]
    fn test_timeout_before_error_and_hits() {
        let mut o = outcome("flom");
        o.hit_area = Some(10.0);
        o.evaluation_error = EvaluationError::Timeout;
        assert_eq!(classify(&o, &ClassifyContext::default()), ResultStatus::Timeout);
        o.evaluation_error = EvaluationError::Error;
        assert_eq!(classify(&o, &ClassifyContext::default()), ResultStatus::Error);
    }

    #[test]
    fn test_zero_hit_area_is_a_hit() {
        let mut o = outcome("skred");
        o.hit_area = Some(0.0);
        let degraded = ClassifyContext {
            legally_binding: false,
            quality_degraded: true,
        };
        assert_eq!(classify(&o, &degraded), ResultStatus::HitYellow);
        let binding = ClassifyContext {
            legally_binding: true,
            quality_degraded: false,
        };
        assert_eq!(classify(&o, &binding), ResultStatus::HitRed);
    }

    #[test]
    fn test_degraded_quality_without_hit() {
        let mut o = outcome("skred");
        o.distance_to_object = Some(500.0);
        let ctx = ClassifyContext {
            legally_binding: true,
            quality_degraded: true,
        };
        assert_eq!(classify(&o, &ctx), ResultStatus::NoHitYellow);
    }

    #[test]
    fn test_plain_no_hit_is_green() {
        let mut o = outcome("skred");
        o.distance_to_object = Some(SENTINEL);
        assert_eq!(classify(&o, &ClassifyContext::default()), ResultStatus::NoHitGreen);
    }

    #[test]
    fn test_touching_without_hit_is_flagged_yellow() {
        let mut o = outcome("skred");
        o.distance_to_object = Some(0.0);
        assert_eq!(classify(&o, &ClassifyContext::default()), ResultStatus::NoHitYellow);

        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.anomalies, vec![DataAnomaly::TouchingWithoutHit]);
        assert!(result.reason.contains("data anomaly"));
        assert_eq!(result.display_distance, None);
    }

    #[test]
    fn test_legally_binding_hit_from_policy() {
        let mut o = outcome("flom");
        o.hit_area = Some(969.87);
        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.result_status, ResultStatus::HitRed);
        assert_eq!(result.display_hit_percent.as_deref(), Some("1.16 %"));
        assert_eq!(result.display_distance, None);
        assert!(result.reason.contains("legally binding"));
    }

    #[test]
    fn test_distance_ignored_once_hit_has_area() {
        let mut o = outcome("skred");
        o.hit_area = Some(500.0);
        o.distance_to_object = Some(300.0);
        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.result_status, ResultStatus::HitYellow);
        assert!(result.display_hit_percent.is_some());
        assert_eq!(result.display_distance, None);
    }

    #[test]
    fn test_zero_area_hit_shows_no_percent() {
        let mut o = outcome("skred");
        o.hit_area = Some(0.0);
        o.distance_to_object = Some(0.0);
        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.result_status, ResultStatus::HitYellow);
        assert_eq!(result.display_hit_percent, None);
        assert_eq!(result.display_distance, None);
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_quality_indicator_degrades_and_adds_warning() {
        let mut o = outcome("skred");
        o.distance_to_object = Some(1200.0);
        o.quality_measurement = vec![crate::model::QualityMeasurement {
            quality_dimension_id: "egnethet".into(),
            quality_dimension_name: None,
            value: serde_json::json!(1),
            comment: Some("Dårlig egnet".into()),
        }];
        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.result_status, ResultStatus::NoHitYellow);
        assert_eq!(result.outcome.quality_warning, vec!["Lite egnet"]);
        assert!(result.has_warnings());
        assert_eq!(result.display_distance.as_deref(), Some("1 200 m"));
    }

    #[test]
    fn test_sentinel_distance_green_and_capped() {
        let mut o = outcome("skred");
        o.distance_to_object = Some(SENTINEL);
        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.result_status, ResultStatus::NoHitGreen);
        assert_eq!(result.display_distance.as_deref(), Some("> 20 000 m"));
    }

    #[test]
    fn test_beyond_range_option_outside_building_matter() {
        let mut o = outcome("skred");
        o.distance_to_object = Some(SENTINEL);
        let options = ClassifyOptions {
            beyond_range_is_uncertain: true,
            ..Default::default()
        };
        let result = classify_outcome(&o, &policy(), &options).unwrap();
        assert_eq!(result.result_status, ResultStatus::NoHitYellow);

        let building_matter = ClassifyOptions {
            beyond_range_is_uncertain: true,
            context: Some(BUILDING_MATTER_CONTEXT.into()),
            ..Default::default()
        };
        let result = classify_outcome(&o, &policy(), &building_matter).unwrap();
        assert_eq!(result.result_status, ResultStatus::NoHitGreen);
    }

    #[test]
    fn test_negative_distance_fails_loud() {
        let mut o = outcome("skred");
        o.distance_to_object = Some(-5.0);
        let err = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap_err();
        assert!(matches!(err, ArealError::Validation(_)));
    }

    #[test]
    fn test_hit_with_zero_parcel_area_fails() {
        let mut o = outcome("skred");
        o.hit_area = Some(10.0);
        o.input_geometry_area = 0.0;
        let err = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap_err();
        assert!(matches!(err, ArealError::Validation(_)));
    }

    #[test]
    fn test_failed_evaluation_has_no_display_values() {
        let mut o = outcome("skred");
        o.evaluation_error = EvaluationError::Error;
        o.distance_to_object = Some(-1.0);
        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.result_status, ResultStatus::Error);
        assert_eq!(result.display_distance, None);
        assert_eq!(result.display_hit_percent, None);
    }

    #[test]
    fn test_overshooting_hit_area_clamped_and_flagged() {
        let mut o = outcome("skred");
        o.input_geometry_area = 100.0;
        o.hit_area = Some(100.004);
        let result = classify_outcome(&o, &policy(), &ClassifyOptions::default()).unwrap();
        assert_eq!(result.display_hit_percent.as_deref(), Some("100 %"));
        assert_eq!(result.anomalies, vec![DataAnomaly::HitAreaExceedsInput]);
    }
}
