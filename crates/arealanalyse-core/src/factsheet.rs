use crate::model::DatasetInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaTypeShare {
    pub area_type: String,
    /// Area in m².
    pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadLength {
    pub road_type: String,
    /// Length in metres.
    pub length: f64,
}

/// Aggregate statistics of one fact-sheet block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "camelCase")]
pub enum FactData {
    LandCover(Vec<AreaTypeShare>),
    Buildings(Vec<BuildingCount>),
    Roads(Vec<RoadLength>),
}

/// One fact-sheet block, tied to the dataset it was computed from.
///
/// Computed by an external collaborator; the report carries it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactPart {
    #[serde(default)]
    pub run_on_dataset: Option<DatasetInfo>,
    #[serde(default)]
    pub run_algorithm: Vec<String>,
    #[serde(default)]
    pub buffer: f64,
    pub data: FactData,
}

/// Total of a fact-sheet block, in the block's own unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactSummary {
    AreaM2(f64),
    Buildings(u64),
    RoadLengthM(f64),
}

impl FactPart {
    pub fn summary(&self) -> FactSummary {
        match &self.data {
            FactData::LandCover(items) => FactSummary::AreaM2(items.iter().map(|i| i.area).sum()),
            FactData::Buildings(items) => FactSummary::Buildings(items.iter().map(|i| i.count).sum()),
            FactData::Roads(items) => FactSummary::RoadLengthM(items.iter().map(|i| i.length).sum()),
        }
    }

    pub fn title(&self) -> &str {
        self.run_on_dataset
            .as_ref()
            .and_then(|d| d.title.as_deref())
            .unwrap_or(match self.data {
                FactData::LandCover(_) => "Land cover",
                FactData::Buildings(_) => "Buildings",
                FactData::Roads(_) => "Roads",
            })
    }
}
