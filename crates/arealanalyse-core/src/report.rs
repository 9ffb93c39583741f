use crate::classify::{ClassifiedResult, ResultStatus};
use crate::dedupe::dedupe_not_relevant;
use crate::error::ArealError;
use crate::factsheet::FactPart;
use crate::group::{self, ResultGroups};
use crate::model::{epsg_from_crs_name, ReportMetadata};
use crate::normalize::Locale;
use serde::Serialize;

/// The assembled analysis report handed to presentation layers.
///
/// Read-only once built: fields are private and only exposed by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    result_groups: ResultGroups,
    not_relevant: Vec<String>,
    fact_sheet: Vec<FactPart>,
    municipality_number: Option<String>,
    municipality_name: Option<String>,
    input_geometry: serde_json::Value,
    input_geometry_area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    epsg: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl Report {
    pub fn result_groups(&self) -> &ResultGroups {
        &self.result_groups
    }

    pub fn not_relevant(&self) -> &[String] {
        &self.not_relevant
    }

    pub fn fact_sheet(&self) -> &[FactPart] {
        &self.fact_sheet
    }

    pub fn municipality_number(&self) -> Option<&str> {
        self.municipality_number.as_deref()
    }

    pub fn municipality_name(&self) -> Option<&str> {
        self.municipality_name.as_deref()
    }

    pub fn input_geometry(&self) -> &serde_json::Value {
        &self.input_geometry
    }

    pub fn input_geometry_area(&self) -> f64 {
        self.input_geometry_area
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Number of results per status, including NOT-RELEVANT labels.
    pub fn counts(&self) -> Vec<(ResultStatus, usize)> {
        let mut counts: Vec<(ResultStatus, usize)> = self
            .result_groups
            .iter()
            .map(|(status, results)| (status, results.len()))
            .collect();
        if !self.not_relevant.is_empty() {
            counts.push((ResultStatus::NotRelevant, self.not_relevant.len()));
        }
        counts
    }
}

/// Build the report from classified results. All or nothing: any failure
/// aborts assembly.
pub fn assemble(
    classified: &[ClassifiedResult],
    fact_sheet: Vec<FactPart>,
    metadata: ReportMetadata,
    locale: Locale,
) -> Result<Report, ArealError> {
    let input_geometry_area = match metadata.input_geometry_area {
        Some(area) if area.is_finite() && area > 0.0 => area,
        Some(area) => {
            return Err(ArealError::IncompleteInput(format!(
                "input geometry area must be positive, got {area}"
            )))
        }
        None => {
            return Err(ArealError::IncompleteInput(
                "input geometry area is missing".into(),
            ))
        }
    };

    if classified.is_empty() {
        return Err(ArealError::IncompleteInput(
            "no datasets were classified".into(),
        ));
    }

    let result_groups = group::group(classified);
    let not_relevant = dedupe_not_relevant(classified, locale);
    group::verify_partition(classified, &result_groups, &not_relevant)?;

    let epsg = metadata.crs_name.as_deref().and_then(|name| {
        let code = epsg_from_crs_name(name);
        if code.is_none() {
            log::warn!("unrecognized CRS name '{name}'");
        }
        code
    });

    log::debug!(
        "assembled report: {} grouped results, {} not relevant, {} fact sheet blocks",
        result_groups.total(),
        not_relevant.len(),
        fact_sheet.len()
    );

    Ok(Report {
        result_groups,
        not_relevant,
        fact_sheet,
        municipality_number: metadata.municipality_number,
        municipality_name: metadata.municipality_name,
        input_geometry: metadata.input_geometry,
        input_geometry_area,
        epsg,
        correlation_id: metadata.correlation_id,
    })
}
