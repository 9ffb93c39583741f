use crate::error::ArealError;
use crate::policy::schema::PolicySet;

const DOK_JSON: &str = include_str!("../../../../policies/dok.json");

/// Available predefined dataset policies.
pub const PRESETS: &[&str] = &["dok"];

/// Load a predefined dataset policy by name.
pub fn load_preset(name: &str) -> Result<PolicySet, ArealError> {
    match name {
        "dok" => super::parse_policy_str(DOK_JSON),
        _ => Err(ArealError::PolicyInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
