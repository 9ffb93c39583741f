use arealanalyse_core::error::ArealError;
use arealanalyse_core::policy::builtin;
use std::path::Path;

pub fn list() -> Result<(), ArealError> {
    println!("Available dataset policies:\n");
    for name in builtin::PRESETS {
        let policy = builtin::load_preset(name)?;
        println!(
            "  {:<8} {} (v{}), {} datasets",
            name,
            policy.name,
            policy.version,
            policy.datasets.len()
        );
        if let Some(ref desc) = policy.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), ArealError> {
    let policy = builtin::load_preset(preset)?;

    println!("{} (version {})\n", policy.name, policy.version);

    if let Some(ref desc) = policy.description {
        println!("{}\n", desc);
    }

    println!("A hit in a legally binding dataset is a conflict (HIT-RED);");
    println!("a hit elsewhere is a notice (HIT-YELLOW). A quality indicator that");
    println!("fires turns a non-hit into NO-HIT-YELLOW and adds its warning.\n");

    let max_id_len = policy
        .datasets
        .iter()
        .map(|d| d.dataset_id.len())
        .max()
        .unwrap_or(20);

    println!(
        "  {:<width$}  {:<8}  Title",
        "Dataset",
        "Binding",
        width = max_id_len
    );
    println!("  {}", "-".repeat(max_id_len + 40));

    for dataset in &policy.datasets {
        println!(
            "  {:<width$}  {:<8}  {}",
            dataset.dataset_id,
            if dataset.legally_binding { "yes" } else { "no" },
            dataset.title.as_deref().unwrap_or("-"),
            width = max_id_len
        );
        for qi in &dataset.quality_indicators {
            println!(
                "  {:<width$}  warns when {} is {}: {}",
                "",
                qi.quality_dimension_id,
                qi.threshold_values().join(" or "),
                qi.warning_text,
                width = max_id_len
            );
        }
    }

    println!();

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ArealError> {
    let policy = arealanalyse_core::policy::load_policy(file)?;

    println!("Policy '{}' (v{}) is valid.", policy.name, policy.version);
    println!("  Datasets: {}", policy.datasets.len());
    println!(
        "  Legally binding: {}",
        policy.datasets.iter().filter(|d| d.legally_binding).count()
    );

    // Potential issues (warnings, not errors)
    let warnings: Vec<String> = policy
        .datasets
        .iter()
        .filter(|d| d.title.is_none())
        .map(|d| format!("dataset '{}' has no title", d.dataset_id))
        .collect();

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
