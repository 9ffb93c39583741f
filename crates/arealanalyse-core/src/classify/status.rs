use crate::error::ArealError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Traffic-light status of one dataset against the parcel.
///
/// Variants are declared in display order, which is also their `Ord` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    #[serde(rename = "HIT-RED")]
    HitRed,
    #[serde(rename = "HIT-YELLOW")]
    HitYellow,
    #[serde(rename = "NO-HIT-YELLOW")]
    NoHitYellow,
    #[serde(rename = "NO-HIT-GREEN")]
    NoHitGreen,
    #[serde(rename = "TIMEOUT")]
    Timeout,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "NOT-RELEVANT")]
    NotRelevant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Yellow,
    Green,
    Neutral,
}

impl ResultStatus {
    pub const ALL: [ResultStatus; 7] = [
        ResultStatus::HitRed,
        ResultStatus::HitYellow,
        ResultStatus::NoHitYellow,
        ResultStatus::NoHitGreen,
        ResultStatus::Timeout,
        ResultStatus::Error,
        ResultStatus::NotRelevant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::HitRed => "HIT-RED",
            ResultStatus::HitYellow => "HIT-YELLOW",
            ResultStatus::NoHitYellow => "NO-HIT-YELLOW",
            ResultStatus::NoHitGreen => "NO-HIT-GREEN",
            ResultStatus::Timeout => "TIMEOUT",
            ResultStatus::Error => "ERROR",
            ResultStatus::NotRelevant => "NOT-RELEVANT",
        }
    }

    pub fn is_hit(self) -> bool {
        matches!(self, ResultStatus::HitRed | ResultStatus::HitYellow)
    }

    /// Upstream evaluation of the dataset did not finish.
    pub fn is_failure(self) -> bool {
        matches!(self, ResultStatus::Timeout | ResultStatus::Error)
    }

    pub fn severity(self) -> Severity {
        match self {
            ResultStatus::HitRed => Severity::Red,
            ResultStatus::HitYellow | ResultStatus::NoHitYellow => Severity::Yellow,
            ResultStatus::NoHitGreen => Severity::Green,
            ResultStatus::Timeout | ResultStatus::Error | ResultStatus::NotRelevant => {
                Severity::Neutral
            }
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStatus {
    type Err = ArealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ResultStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ArealError::Validation(format!("unknown result status '{wanted}'")))
    }
}
