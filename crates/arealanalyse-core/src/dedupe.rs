use crate::classify::{ClassifiedResult, ResultStatus};
use crate::normalize::Locale;
use std::collections::HashSet;

/// Distinct, sorted labels of the datasets excluded from analysis.
///
/// The label is the dataset title, falling back to the result's own title and
/// then the dataset id. Results with none of these are left out here and
/// rejected by `group::verify_partition`.
pub fn dedupe_not_relevant(results: &[ClassifiedResult], locale: Locale) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut labels: Vec<String> = Vec::new();

    for result in results
        .iter()
        .filter(|r| r.result_status == ResultStatus::NotRelevant)
    {
        match result.outcome.display_label() {
            Some(label) => {
                if seen.insert(label) {
                    labels.push(label.to_string());
                }
            }
            None => log::warn!("NOT-RELEVANT result has no title or dataset id"),
        }
    }

    labels.sort_by(|a, b| locale.compare(a, b));
    labels
}
