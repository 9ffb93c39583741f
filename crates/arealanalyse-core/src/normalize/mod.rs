//! Display normalization of hit areas and distances.

pub mod locale;

pub use locale::Locale;

use crate::error::ArealError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Distances at or beyond this many metres are shown as out of range.
pub const DISTANCE_CAP_M: f64 = 20_000.0;

/// Render a distance in metres with the default locale.
pub fn normalize_distance(meters: f64) -> Result<String, ArealError> {
    normalize_distance_with(meters, Locale::Default)
}

/// Render a distance in metres, capping anything at or past the search range.
///
/// The "no object found" sentinel (e.g. 9223372036854776000) falls under the
/// cap and never surfaces as a literal number.
pub fn normalize_distance_with(meters: f64, locale: Locale) -> Result<String, ArealError> {
    if meters.is_nan() {
        return Err(ArealError::Validation("distance is not a number".into()));
    }
    if meters < 0.0 {
        return Err(ArealError::Validation(format!(
            "negative distance {meters} m"
        )));
    }
    let cap = Decimal::from(DISTANCE_CAP_M as u32);
    if meters >= DISTANCE_CAP_M {
        return Ok(format!("> {} m", locale.format_decimal(cap)));
    }

    let value = to_decimal(meters, "distance")?;
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Rounding may carry a value just below the cap onto it.
    if rounded >= cap {
        return Ok(format!("> {} m", locale.format_decimal(cap)));
    }
    Ok(format!("{} m", locale.format_decimal(rounded)))
}

/// Render the share of the parcel covered by a hit with the default locale.
pub fn normalize_percent(hit_area: f64, input_geometry_area: f64) -> Result<String, ArealError> {
    normalize_percent_with(hit_area, input_geometry_area, Locale::Default)
}

/// Render `hit_area / input_geometry_area` as a percentage rounded to two
/// decimals, half away from zero. Overshoot from floating point geometry is
/// clamped to 100 %.
pub fn normalize_percent_with(
    hit_area: f64,
    input_geometry_area: f64,
    locale: Locale,
) -> Result<String, ArealError> {
    let rounded = hit_percent(hit_area, input_geometry_area)?;
    Ok(format!("{} %", locale.format_decimal(rounded)))
}

/// Hit percentage as an exact decimal, rounded and clamped.
pub fn hit_percent(hit_area: f64, input_geometry_area: f64) -> Result<Decimal, ArealError> {
    if !input_geometry_area.is_finite() || input_geometry_area <= 0.0 {
        return Err(ArealError::Validation(format!(
            "input geometry area must be positive, got {input_geometry_area}"
        )));
    }
    if hit_area < 0.0 || !hit_area.is_finite() {
        return Err(ArealError::Validation(format!(
            "hit area must be a non-negative number, got {hit_area}"
        )));
    }

    let hit = to_decimal(hit_area, "hit area")?;
    let total = to_decimal(input_geometry_area, "input geometry area")?;
    let hundred = Decimal::ONE_HUNDRED;

    let percent = hit
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(hundred))
        .ok_or_else(|| {
            ArealError::Validation(format!(
                "hit percentage of {hit_area} / {input_geometry_area} overflows"
            ))
        })?;

    if percent > hundred {
        log::warn!(
            "hit area {hit_area} exceeds input geometry area {input_geometry_area}, clamping to 100 %"
        );
        return Ok(hundred);
    }

    Ok(percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn to_decimal(value: f64, what: &str) -> Result<Decimal, ArealError> {
    Decimal::from_f64(value)
        .ok_or_else(|| ArealError::Validation(format!("{what} {value} is not representable")))
}
