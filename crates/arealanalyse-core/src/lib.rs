pub mod classify;
pub mod dedupe;
pub mod error;
pub mod factsheet;
pub mod group;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod quality;
pub mod report;

use classify::{ClassifiedResult, PrecomputedResult};
use error::ArealError;
use factsheet::FactPart;
use model::{AnalysisOutcome, ReportMetadata};
use normalize::Locale;
use policy::schema::PolicySet;
use report::Report;
use serde::{Deserialize, Serialize};

/// Options controlling classification and display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Number formatting and label ordering.
    #[serde(default)]
    pub locale: Locale,
    /// Planning context of the request (e.g. "byggesak").
    #[serde(default)]
    pub context: Option<String>,
    /// Treat non-hits whose nearest object is beyond search range as uncertain
    /// (NO-HIT-YELLOW) unless the context is building matter.
    #[serde(default)]
    pub beyond_range_is_uncertain: bool,
}

/// One analysis run as delivered by the upstream geometry service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBatch {
    #[serde(flatten)]
    pub metadata: ReportMetadata,
    #[serde(alias = "resultList")]
    pub outcomes: Vec<AnalysisOutcome>,
    #[serde(default)]
    pub fact_sheet: Vec<FactPart>,
}

/// Main API entry point: classify every outcome and assemble the report.
pub fn build_report(
    batch: AnalysisBatch,
    policy: &PolicySet,
    options: &ClassifyOptions,
) -> Result<Report, ArealError> {
    let classified = classify_outcomes(&batch.outcomes, policy, options)?;
    report::assemble(&classified, batch.fact_sheet, batch.metadata, options.locale)
}

/// Classify a batch of outcomes, one result per outcome in input order.
pub fn classify_outcomes(
    outcomes: &[AnalysisOutcome],
    policy: &PolicySet,
    options: &ClassifyOptions,
) -> Result<Vec<ClassifiedResult>, ArealError> {
    let classified = outcomes
        .iter()
        .map(|outcome| classify::classify_outcome(outcome, policy, options))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "classified {} outcomes with policy '{}'",
        classified.len(),
        policy.name
    );

    Ok(classified)
}

/// Assemble a report from results that already carry a status.
pub fn assemble_precomputed(
    results: Vec<PrecomputedResult>,
    fact_sheet: Vec<FactPart>,
    metadata: ReportMetadata,
    locale: Locale,
) -> Result<Report, ArealError> {
    let classified = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| result.into_classified(index))
        .collect::<Result<Vec<_>, _>>()?;

    report::assemble(&classified, fact_sheet, metadata, locale)
}
