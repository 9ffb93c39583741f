//! Partitioning of classified results into ordered status buckets.

use crate::classify::{ClassifiedResult, ResultStatus};
use crate::error::ArealError;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Results keyed by status, in display order. Only non-empty buckets are present
/// and `NOT-RELEVANT` never is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultGroups(BTreeMap<ResultStatus, Vec<ClassifiedResult>>);

impl ResultGroups {
    pub fn get(&self, status: ResultStatus) -> Option<&[ClassifiedResult]> {
        self.0.get(&status).map(Vec::as_slice)
    }

    pub fn contains(&self, status: ResultStatus) -> bool {
        self.0.contains_key(&status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResultStatus, &[ClassifiedResult])> {
        self.0.iter().map(|(status, results)| (*status, results.as_slice()))
    }

    pub fn statuses(&self) -> impl Iterator<Item = ResultStatus> + '_ {
        self.0.keys().copied()
    }

    /// Number of results across all buckets.
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All results in bucket order, then in-bucket order.
    pub fn flatten(&self) -> Vec<ClassifiedResult> {
        self.0.values().flatten().cloned().collect()
    }
}

/// Group results by status and sort each bucket.
///
/// Sorting is stable, so equal keys keep their input order and re-grouping a
/// flattened result set reproduces it exactly.
pub fn group(results: &[ClassifiedResult]) -> ResultGroups {
    let mut buckets: BTreeMap<ResultStatus, Vec<ClassifiedResult>> = BTreeMap::new();

    for result in results {
        if result.result_status == ResultStatus::NotRelevant {
            continue;
        }
        buckets
            .entry(result.result_status)
            .or_default()
            .push(result.clone());
    }

    for (status, bucket) in buckets.iter_mut() {
        match status {
            ResultStatus::HitRed | ResultStatus::HitYellow => bucket.sort_by(compare_hits),
            ResultStatus::NoHitYellow | ResultStatus::NoHitGreen => {
                bucket.sort_by(compare_no_hits)
            }
            ResultStatus::Timeout | ResultStatus::Error | ResultStatus::NotRelevant => {}
        }
    }

    log::debug!(
        "grouped {} results into {} buckets",
        results.len(),
        buckets.len()
    );

    ResultGroups(buckets)
}

/// Largest hit area first; results without an area go last.
fn compare_hits(a: &ClassifiedResult, b: &ClassifiedResult) -> Ordering {
    let area_a = a.outcome.hit_area.unwrap_or(f64::NEG_INFINITY);
    let area_b = b.outcome.hit_area.unwrap_or(f64::NEG_INFINITY);
    area_b
        .total_cmp(&area_a)
        .then_with(|| a.primary_theme().cmp(b.primary_theme()))
}

/// Nearest object first; unknown distances go last.
fn compare_no_hits(a: &ClassifiedResult, b: &ClassifiedResult) -> Ordering {
    let dist_a = a.outcome.distance_to_object.unwrap_or(f64::INFINITY);
    let dist_b = b.outcome.distance_to_object.unwrap_or(f64::INFINITY);
    dist_a
        .total_cmp(&dist_b)
        .then_with(|| a.primary_theme().cmp(b.primary_theme()))
}

/// Check that every result is accounted for exactly once: non-excluded results
/// in `groups`, excluded ones by label in `not_relevant`.
pub fn verify_partition(
    results: &[ClassifiedResult],
    groups: &ResultGroups,
    not_relevant: &[String],
) -> Result<(), ArealError> {
    for (status, bucket) in groups.iter() {
        if status == ResultStatus::NotRelevant {
            return Err(ArealError::InvariantViolation(
                "NOT-RELEVANT results must not appear in result groups".into(),
            ));
        }
        if bucket.is_empty() {
            return Err(ArealError::InvariantViolation(format!(
                "empty bucket {status} in result groups"
            )));
        }
        if let Some(stray) = bucket.iter().find(|r| r.result_status != status) {
            return Err(ArealError::InvariantViolation(format!(
                "result with status {} placed in bucket {status}",
                stray.result_status
            )));
        }
    }

    let expected = results
        .iter()
        .filter(|r| r.result_status != ResultStatus::NotRelevant)
        .count();
    if groups.total() != expected {
        return Err(ArealError::InvariantViolation(format!(
            "result groups hold {} results, expected {expected}",
            groups.total()
        )));
    }

    for (index, result) in results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.result_status == ResultStatus::NotRelevant)
    {
        match result.outcome.display_label() {
            Some(label) if not_relevant.iter().any(|l| l == label) => {}
            Some(label) => {
                return Err(ArealError::InvariantViolation(format!(
                    "NOT-RELEVANT result '{label}' missing from not-relevant labels"
                )))
            }
            None => {
                return Err(ArealError::InvariantViolation(format!(
                    "NOT-RELEVANT result #{index} has no title or dataset id"
                )))
            }
        }
    }

    if let Some(stray) = not_relevant.iter().find(|label| {
        !results.iter().any(|r| {
            r.result_status == ResultStatus::NotRelevant
                && r.outcome.display_label() == Some(label.as_str())
        })
    }) {
        return Err(ArealError::InvariantViolation(format!(
            "not-relevant label '{stray}' matches no excluded result"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnalysisOutcome;

    fn result(
        title: &str,
        theme: &str,
        status: ResultStatus,
        hit_area: Option<f64>,
        distance: Option<f64>,
    ) -> ClassifiedResult {
        ClassifiedResult {
            outcome: AnalysisOutcome {
                title: Some(title.into()),
                themes: vec![theme.into()],
                hit_area,
                distance_to_object: distance,
                input_geometry_area: 1000.0,
                ..Default::default()
            },
            result_status: status,
            display_distance: None,
            display_hit_percent: None,
            reason: String::new(),
            anomalies: vec![],
        }
    }

    fn titles(results: &[ClassifiedResult]) -> Vec<&str> {
        results
            .iter()
            .map(|r| r.outcome.title.as_deref().unwrap_or(""))
            .collect()
    }

    fn sample() -> Vec<ClassifiedResult> {
        use ResultStatus::*;
        vec![
            result("err-1", "Samfunn", Error, None, None),
            result("green-far", "Natur", NoHitGreen, None, Some(9223372036854776000.0)),
            result("red-small", "Natur", HitRed, Some(10.0), None),
            result("yellow-zero", "Kultur", HitYellow, Some(0.0), None),
            result("green-near", "Natur", NoHitGreen, None, Some(50.0)),
            result("excluded", "Natur", NotRelevant, None, None),
            result("red-large", "Natur", HitRed, Some(500.0), None),
            result("red-large-b", "Kultur", HitRed, Some(500.0), None),
            result("green-near-b", "Kultur", NoHitGreen, None, Some(50.0)),
            result("err-0", "Natur", Error, None, None),
            result("timeout", "Natur", Timeout, None, None),
            result("yellow-big", "Natur", HitYellow, Some(300.0), None),
        ]
    }

    #[test]
    fn test_buckets_in_display_order_without_not_relevant() {
        let groups = group(&sample());
        let statuses: Vec<_> = groups.statuses().collect();
        assert_eq!(
            statuses,
            vec![
                ResultStatus::HitRed,
                ResultStatus::HitYellow,
                ResultStatus::NoHitGreen,
                ResultStatus::Timeout,
                ResultStatus::Error,
            ]
        );
        assert!(!groups.contains(ResultStatus::NotRelevant));
        assert!(!groups.contains(ResultStatus::NoHitYellow));
        assert_eq!(groups.total(), 11);
    }

    #[test]
    fn test_hits_sorted_by_area_desc_then_theme() {
        let groups = group(&sample());
        assert_eq!(
            titles(groups.get(ResultStatus::HitRed).unwrap()),
            vec!["red-large-b", "red-large", "red-small"]
        );
        assert_eq!(
            titles(groups.get(ResultStatus::HitYellow).unwrap()),
            vec!["yellow-big", "yellow-zero"]
        );
    }

    #[test]
    fn test_no_hits_sorted_by_distance_asc_sentinel_last() {
        let groups = group(&sample());
        assert_eq!(
            titles(groups.get(ResultStatus::NoHitGreen).unwrap()),
            vec!["green-near-b", "green-near", "green-far"]
        );
    }

    #[test]
    fn test_failures_keep_input_order() {
        let groups = group(&sample());
        assert_eq!(
            titles(groups.get(ResultStatus::Error).unwrap()),
            vec!["err-1", "err-0"]
        );
    }

    #[test]
    fn test_missing_distance_sorts_after_sentinel() {
        let results = vec![
            result("unknown", "A", ResultStatus::NoHitYellow, None, None),
            result("far", "A", ResultStatus::NoHitYellow, None, Some(9223372036854776000.0)),
            result("near", "A", ResultStatus::NoHitYellow, None, Some(1.0)),
        ];
        let groups = group(&results);
        assert_eq!(
            titles(groups.get(ResultStatus::NoHitYellow).unwrap()),
            vec!["near", "far", "unknown"]
        );
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let results = vec![
            result("first", "Natur", ResultStatus::HitYellow, Some(5.0), None),
            result("second", "Natur", ResultStatus::HitYellow, Some(5.0), None),
        ];
        let groups = group(&results);
        assert_eq!(
            titles(groups.get(ResultStatus::HitYellow).unwrap()),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let once = group(&sample());
        let twice = group(&once.flatten());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input_gives_no_buckets() {
        let groups = group(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.get(ResultStatus::HitRed), None);
    }

    fn excluded_labels() -> Vec<String> {
        vec!["excluded".to_string()]
    }

    #[test]
    fn test_verify_partition_accepts_grouping() {
        let results = sample();
        let groups = group(&results);
        assert!(verify_partition(&results, &groups, &excluded_labels()).is_ok());
    }

    #[test]
    fn test_verify_partition_detects_duplicate_entry() {
        let results = sample();
        let mut groups = group(&results);
        let dup = groups.get(ResultStatus::HitRed).unwrap()[0].clone();
        groups.0.get_mut(&ResultStatus::HitRed).unwrap().push(dup);
        assert!(matches!(
            verify_partition(&results, &groups, &excluded_labels()),
            Err(ArealError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_verify_partition_detects_misplaced_entry() {
        let results = sample();
        let mut groups = group(&results);
        let moved = groups.0.get_mut(&ResultStatus::Timeout).unwrap().remove(0);
        groups.0.remove(&ResultStatus::Timeout);
        groups.0.get_mut(&ResultStatus::Error).unwrap().push(moved);
        assert!(matches!(
            verify_partition(&results, &groups, &excluded_labels()),
            Err(ArealError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_verify_partition_detects_dropped_not_relevant() {
        let results = sample();
        let groups = group(&results);
        assert!(matches!(
            verify_partition(&results, &groups, &[]),
            Err(ArealError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_verify_partition_rejects_unlabelled_not_relevant() {
        let mut results = sample();
        results.push(ClassifiedResult {
            outcome: AnalysisOutcome::default(),
            result_status: ResultStatus::NotRelevant,
            display_distance: None,
            display_hit_percent: None,
            reason: String::new(),
            anomalies: vec![],
        });
        let groups = group(&results);
        assert!(matches!(
            verify_partition(&results, &groups, &excluded_labels()),
            Err(ArealError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_verify_partition_detects_stray_label() {
        let results = sample();
        let groups = group(&results);
        let labels = vec!["excluded".to_string(), "Flomsoner".to_string()];
        assert!(matches!(
            verify_partition(&results, &groups, &labels),
            Err(ArealError::InvariantViolation(_))
        ));
    }
}
