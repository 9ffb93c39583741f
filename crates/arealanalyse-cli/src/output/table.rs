use arealanalyse_core::classify::{ClassifiedResult, ResultStatus, Severity};
use arealanalyse_core::factsheet::FactSummary;
use arealanalyse_core::normalize::Locale;
use arealanalyse_core::report::Report;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

pub fn print(report: &Report, locale: Locale, show_reasons: bool) {
    let place = match (report.municipality_name(), report.municipality_number()) {
        (Some(name), Some(number)) => format!("{name} ({number})"),
        (Some(name), None) => name.to_string(),
        (None, Some(number)) => number.to_string(),
        (None, None) => "unknown municipality".to_string(),
    };
    println!("=== Area analysis: {} ===\n", place);
    println!(
        "  Parcel area: {} m²",
        format_number(report.input_geometry_area(), locale)
    );
    if let Some(epsg) = report.epsg() {
        println!("  CRS: EPSG:{}", epsg);
    }
    if let Some(id) = report.correlation_id() {
        println!("  Correlation id: {}", id);
    }
    println!();

    let summary: Vec<String> = report
        .counts()
        .iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .collect();
    println!("  Overall: {}\n", summary.join(", "));

    for (status, results) in report.result_groups().iter() {
        print_status_group(status, results, show_reasons);
    }

    if !report.not_relevant().is_empty() {
        println!("=== {} ===\n", group_header(ResultStatus::NotRelevant));
        for label in report.not_relevant() {
            println!("  {}", label);
        }
        println!();
    }

    if !report.fact_sheet().is_empty() {
        println!("=== Fact sheet ===\n");
        let max_title = report
            .fact_sheet()
            .iter()
            .map(|p| p.title().chars().count())
            .max()
            .unwrap_or(10);
        for part in report.fact_sheet() {
            let total = match part.summary() {
                FactSummary::AreaM2(area) => format!("{} m²", format_number(area, locale)),
                FactSummary::Buildings(count) => format!("{} buildings", count),
                FactSummary::RoadLengthM(length) => format!("{} m", format_number(length, locale)),
            };
            println!("  {:<width$}  {}", part.title(), total, width = max_title);
        }
        println!();
    }
}

fn print_status_group(status: ResultStatus, results: &[ClassifiedResult], show_reasons: bool) {
    println!("=== {} ({}) ===\n", group_header(status), results.len());

    let max_label = results
        .iter()
        .map(|r| label(r).chars().count())
        .max()
        .unwrap_or(10);

    for result in results {
        let value = result
            .display_hit_percent
            .as_deref()
            .or(result.display_distance.as_deref())
            .unwrap_or("");
        let theme = result.primary_theme();
        let theme = if theme.is_empty() {
            String::new()
        } else {
            format!("[{theme}] ")
        };
        println!(
            "  {}{:<width$}  {}",
            theme,
            label(result),
            value,
            width = max_label
        );
        for warning in &result.outcome.quality_warning {
            println!("    ! {}", warning);
        }
        for anomaly in &result.anomalies {
            println!("    ? {}", anomaly);
        }
        if show_reasons {
            println!("    {}", result.reason);
        }
    }
    println!();
}

/// Status name prefixed with its traffic-light marker, e.g. "(!) HIT-RED".
fn group_header(status: ResultStatus) -> String {
    let marker = match status.severity() {
        Severity::Red => "(!)",
        Severity::Yellow => "(?)",
        Severity::Green => "(ok)",
        Severity::Neutral => "(-)",
    };
    format!("{marker} {status}")
}

fn label(result: &ClassifiedResult) -> &str {
    result.outcome.display_label().unwrap_or("(untitled)")
}

fn format_number(value: f64, locale: Locale) -> String {
    match Decimal::from_f64(value) {
        Some(d) => locale.format_decimal(d.round_dp(2)),
        None => value.to_string(),
    }
}
