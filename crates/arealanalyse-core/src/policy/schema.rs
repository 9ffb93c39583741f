use serde::{Deserialize, Serialize};

/// Per-dataset classification policy: legal weight and quality indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySet {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub datasets: Vec<DatasetPolicy>,
}

impl PolicySet {
    /// An empty policy: nothing legally binding, no quality indicators.
    pub fn empty() -> Self {
        Self {
            name: "empty".into(),
            description: None,
            version: "0".into(),
            datasets: Vec::new(),
        }
    }

    pub fn lookup(&self, dataset_id: &str) -> Option<&DatasetPolicy> {
        self.datasets.iter().find(|d| d.dataset_id == dataset_id)
    }

    /// Merge several policy sets. Later sets override earlier ones per dataset id.
    pub fn merged(sets: &[PolicySet]) -> PolicySet {
        let mut datasets: Vec<DatasetPolicy> = Vec::new();
        for set in sets {
            for policy in &set.datasets {
                match datasets.iter_mut().find(|d| d.dataset_id == policy.dataset_id) {
                    Some(existing) => *existing = policy.clone(),
                    None => datasets.push(policy.clone()),
                }
            }
        }

        let name = sets
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" + ");

        PolicySet {
            name: if name.is_empty() { "empty".into() } else { name },
            description: None,
            version: sets.last().map(|s| s.version.clone()).unwrap_or_else(|| "0".into()),
            datasets,
        }
    }
}

/// Policy for a single dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPolicy {
    pub dataset_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Hits in a legally binding dataset are conflicts (red), not notices.
    #[serde(default)]
    pub legally_binding: bool,
    #[serde(default)]
    pub quality_indicators: Vec<QualityIndicatorDef>,
}

/// Warn when a quality measurement of the given dimension takes one of the threshold values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIndicatorDef {
    pub quality_dimension_id: String,
    /// Values joined by `OR`, e.g. "0 OR 1".
    pub warning_threshold: String,
    pub warning_text: String,
    /// Planning contexts the indicator applies to. Empty means every request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,
}

impl QualityIndicatorDef {
    /// Whether the indicator is evaluated for a request in `context`.
    pub fn applies_to(&self, context: Option<&str>) -> bool {
        self.contexts.is_empty()
            || context.is_some_and(|c| self.contexts.iter().any(|allowed| allowed == c))
    }

    pub fn threshold_values(&self) -> Vec<&str> {
        self.warning_threshold
            .split("OR")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }
}
