use arealanalyse_core::error::ArealError;
use arealanalyse_core::report::Report;

pub fn print(report: &Report) -> Result<(), ArealError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
