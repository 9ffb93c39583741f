use arealanalyse_core::classify::PrecomputedResult;
use arealanalyse_core::error::ArealError;
use arealanalyse_core::factsheet::FactPart;
use arealanalyse_core::model::ReportMetadata;
use arealanalyse_core::normalize::Locale;
use arealanalyse_core::policy::builtin;
use arealanalyse_core::policy::schema::PolicySet;
use arealanalyse_core::{AnalysisBatch, ClassifyOptions};
use serde_json::Value;
use std::path::PathBuf;

use crate::output;

pub struct ClassifyArgs {
    pub input_file: PathBuf,
    pub policy_files: Vec<PathBuf>,
    pub presets: Vec<String>,
    pub output_format: String,
    pub locale: String,
    pub context: Option<String>,
    pub beyond_range_uncertain: bool,
    pub precomputed: bool,
    pub show_reasons: bool,
}

pub fn run(args: ClassifyArgs) -> Result<(), ArealError> {
    let locale = Locale::from_str_loose(&args.locale).ok_or_else(|| {
        ArealError::Validation(format!(
            "unknown locale '{}'. Available: default, nb-no",
            args.locale
        ))
    })?;

    // Default to the built-in preset if nothing else was asked for
    let effective_presets = if args.presets.is_empty() && args.policy_files.is_empty() {
        builtin::PRESETS.iter().map(|s| s.to_string()).collect()
    } else {
        args.presets
    };

    let mut policies: Vec<PolicySet> = Vec::new();
    for preset in &effective_presets {
        policies.push(builtin::load_preset(preset)?);
    }
    for path in &args.policy_files {
        policies.push(arealanalyse_core::policy::load_policy(path)?);
    }
    let policy = PolicySet::merged(&policies);

    let options = ClassifyOptions {
        locale,
        context: args.context,
        beyond_range_is_uncertain: args.beyond_range_uncertain,
    };

    let json_bytes = std::fs::read(&args.input_file)?;

    let report = if args.precomputed {
        let raw: Value = serde_json::from_slice(&json_bytes)?;
        let (results, fact_sheet, metadata) = split_precomputed(raw)?;
        arealanalyse_core::assemble_precomputed(results, fact_sheet, metadata, locale)?
    } else {
        let batch: AnalysisBatch = serde_json::from_slice(&json_bytes)?;
        arealanalyse_core::build_report(batch, &policy, &options)?
    };

    match args.output_format.as_str() {
        "json" => output::json::print(&report)?,
        _ => output::table::print(&report, locale, args.show_reasons),
    }

    Ok(())
}

/// Split a stored service response into results, fact sheet and metadata.
fn split_precomputed(
    mut raw: Value,
) -> Result<(Vec<PrecomputedResult>, Vec<FactPart>, ReportMetadata), ArealError> {
    let obj = raw.as_object_mut().ok_or_else(|| {
        ArealError::Validation("precomputed input must be a JSON object".into())
    })?;

    let results = match obj.remove("resultList").or_else(|| obj.remove("outcomes")) {
        Some(list) => serde_json::from_value(list)?,
        None => {
            return Err(ArealError::IncompleteInput(
                "input has no resultList".into(),
            ))
        }
    };
    let fact_sheet = match obj.remove("factSheet") {
        Some(blocks) => serde_json::from_value(blocks)?,
        None => Vec::new(),
    };
    let metadata: ReportMetadata = serde_json::from_value(raw)?;
    Ok((results, fact_sheet, metadata))
}
