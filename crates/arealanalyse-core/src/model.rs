use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata about the dataset an analysis was run against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Last update of the dataset, as reported by the catalogue.
    #[serde(default)]
    pub updated: Option<String>,
}

/// A quality measurement attached to a dataset (e.g. suitability for zoning plans).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMeasurement {
    pub quality_dimension_id: String,
    #[serde(default)]
    pub quality_dimension_name: Option<String>,
    pub value: serde_json::Value,
    #[serde(default)]
    pub comment: Option<String>,
}

impl QualityMeasurement {
    /// The measured value as plain text, without JSON string quoting.
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceLink {
    pub href: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Terminal failure of the upstream evaluation of one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationError {
    #[default]
    None,
    Timeout,
    Error,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::None => write!(f, "none"),
            EvaluationError::Timeout => write!(f, "timeout"),
            EvaluationError::Error => write!(f, "error"),
        }
    }
}

/// Geometry analysis outcome for one dataset evaluated against one parcel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    #[serde(default)]
    pub run_on_dataset: Option<DatasetInfo>,
    /// Sub-label of the analysis, distinct from the dataset title.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    /// Intersected area in m². Zero means a point or line touches the parcel.
    #[serde(default)]
    pub hit_area: Option<f64>,
    /// Distance in metres to the nearest object in the dataset.
    #[serde(default)]
    pub distance_to_object: Option<f64>,
    /// Area of the parcel (including any buffer) in m².
    #[serde(default)]
    pub input_geometry_area: f64,
    #[serde(default)]
    pub buffer: f64,
    #[serde(default, alias = "qualityMeasurements")]
    pub quality_measurement: Vec<QualityMeasurement>,
    #[serde(default)]
    pub quality_warning: Vec<String>,
    #[serde(default)]
    pub is_excluded_from_analysis: bool,
    #[serde(default)]
    pub evaluation_error: EvaluationError,
    /// Set upstream when positional accuracy is too poor for this geometry.
    #[serde(default)]
    pub quality_degraded: bool,
    #[serde(default)]
    pub run_algorithm: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub guidance_text: Option<String>,
    #[serde(default)]
    pub guidance_uri: Vec<GuidanceLink>,
    #[serde(default)]
    pub possible_actions: Vec<String>,
}

impl AnalysisOutcome {
    pub fn dataset_id(&self) -> Option<&str> {
        self.run_on_dataset
            .as_ref()
            .and_then(|d| d.dataset_id.as_deref())
    }

    pub fn dataset_title(&self) -> Option<&str> {
        self.run_on_dataset.as_ref().and_then(|d| d.title.as_deref())
    }

    /// The first theme tag, or "" when the outcome carries none.
    pub fn primary_theme(&self) -> &str {
        self.themes.first().map(String::as_str).unwrap_or("")
    }

    /// Dataset title if known, otherwise the outcome's own title, then the dataset id.
    pub fn display_label(&self) -> Option<&str> {
        self.dataset_title()
            .or(self.title.as_deref())
            .or(self.dataset_id())
    }
}

/// Report-level metadata supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    #[serde(default)]
    pub municipality_number: Option<String>,
    #[serde(default)]
    pub municipality_name: Option<String>,
    /// The parcel geometry, kept opaque.
    #[serde(default)]
    pub input_geometry: serde_json::Value,
    #[serde(default)]
    pub input_geometry_area: Option<f64>,
    /// CRS identifier of the input geometry, e.g. "urn:ogc:def:crs:EPSG::25833".
    #[serde(default)]
    pub crs_name: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
}

/// Extract the EPSG code from the CRS name forms used by GeoJSON and OGC services.
pub fn epsg_from_crs_name(crs_name: &str) -> Option<u32> {
    const PREFIXES: &[&str] = &[
        "http://www.opengis.net/def/crs/EPSG/0/",
        "urn:ogc:def:crs:EPSG::",
        "EPSG:",
    ];

    let name = crs_name.trim();
    PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .filter(|code| !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|code| code.parse().ok())
}
