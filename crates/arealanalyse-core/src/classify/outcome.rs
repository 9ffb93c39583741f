use crate::classify::status::ResultStatus;
use crate::error::ArealError;
use crate::model::AnalysisOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inconsistencies in upstream data that do not block classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataAnomaly {
    /// Distance 0 m to the nearest object, yet no hit area was registered.
    TouchingWithoutHit,
    /// Hit area larger than the parcel itself.
    HitAreaExceedsInput,
}

impl fmt::Display for DataAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataAnomaly::TouchingWithoutHit => write!(f, "touching-without-hit"),
            DataAnomaly::HitAreaExceedsInput => write!(f, "hit-area-exceeds-input"),
        }
    }
}

/// An analysis outcome with its assigned status and display values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedResult {
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    pub result_status: ResultStatus,
    /// Formatted distance, e.g. "1 234 m" or "> 20 000 m".
    pub display_distance: Option<String>,
    /// Formatted share of the parcel hit, e.g. "1.16 %".
    pub display_hit_percent: Option<String>,
    /// Human-readable explanation of the classification.
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<DataAnomaly>,
}

impl ClassifiedResult {
    pub fn has_warnings(&self) -> bool {
        !self.outcome.quality_warning.is_empty()
    }

    pub fn primary_theme(&self) -> &str {
        self.outcome.primary_theme()
    }
}

/// A result that was classified elsewhere, e.g. a stored service response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputedResult {
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    #[serde(default)]
    pub result_status: Option<ResultStatus>,
    #[serde(default)]
    pub display_distance: Option<String>,
    #[serde(default)]
    pub display_hit_percent: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl PrecomputedResult {
    /// Convert into a classified result. `index` is used for error messages only.
    pub fn into_classified(self, index: usize) -> Result<ClassifiedResult, ArealError> {
        let label = self
            .outcome
            .display_label()
            .unwrap_or("<untitled>")
            .to_string();
        let result_status = self.result_status.ok_or_else(|| {
            ArealError::InvariantViolation(format!(
                "result #{index} ('{label}') has no resultStatus"
            ))
        })?;

        Ok(ClassifiedResult {
            outcome: self.outcome,
            result_status,
            display_distance: self.display_distance,
            display_hit_percent: self.display_hit_percent,
            reason: self.reason.unwrap_or_default(),
            anomalies: Vec::new(),
        })
    }
}
