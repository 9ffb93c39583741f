pub mod builtin;
pub mod schema;

use crate::error::ArealError;
use schema::PolicySet;
use std::collections::HashSet;
use std::path::Path;

/// Load a dataset policy from a JSON file.
pub fn load_policy(path: &Path) -> Result<PolicySet, ArealError> {
    let content = std::fs::read_to_string(path).map_err(|e| ArealError::PolicyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_policy(&content, path)
}

/// Parse a dataset policy from a JSON string.
pub fn parse_policy(json: &str, source: &Path) -> Result<PolicySet, ArealError> {
    let policy: PolicySet = serde_json::from_str(json).map_err(|e| ArealError::PolicyLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_policy(&policy)?;
    Ok(policy)
}

/// Parse a dataset policy from a JSON string (no file path context).
pub fn parse_policy_str(json: &str) -> Result<PolicySet, ArealError> {
    let policy: PolicySet = serde_json::from_str(json).map_err(ArealError::Json)?;
    validate_policy(&policy)?;
    Ok(policy)
}

/// Validate that a dataset policy is well-formed.
pub fn validate_policy(policy: &PolicySet) -> Result<(), ArealError> {
    if policy.name.trim().is_empty() {
        return Err(ArealError::PolicyInvalid("name must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for dataset in &policy.datasets {
        if dataset.dataset_id.trim().is_empty() {
            return Err(ArealError::PolicyInvalid(
                "dataset_id must not be empty".into(),
            ));
        }

        if !seen.insert(dataset.dataset_id.as_str()) {
            return Err(ArealError::PolicyInvalid(format!(
                "dataset '{}' is defined more than once",
                dataset.dataset_id
            )));
        }

        for indicator in &dataset.quality_indicators {
            if indicator.quality_dimension_id.trim().is_empty() {
                return Err(ArealError::PolicyInvalid(format!(
                    "dataset '{}' has a quality indicator without quality_dimension_id",
                    dataset.dataset_id
                )));
            }

            if indicator.threshold_values().is_empty() {
                return Err(ArealError::PolicyInvalid(format!(
                    "dataset '{}' quality indicator '{}' has no threshold values",
                    dataset.dataset_id, indicator.quality_dimension_id
                )));
            }

            if indicator.contexts.iter().any(|c| c.trim().is_empty()) {
                return Err(ArealError::PolicyInvalid(format!(
                    "dataset '{}' quality indicator '{}' has an empty context",
                    dataset.dataset_id, indicator.quality_dimension_id
                )));
            }

            if indicator.warning_text.trim().is_empty() {
                return Err(ArealError::PolicyInvalid(format!(
                    "dataset '{}' quality indicator '{}' has no warning text",
                    dataset.dataset_id, indicator.quality_dimension_id
                )));
            }
        }
    }

    Ok(())
}
