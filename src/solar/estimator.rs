use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::period::BillingPeriod;

/// Days per month used to turn monthly consumption into a daily figure.
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Upper bound for peak sun hours [h/day].
pub const MAX_PEAK_SUN_HOURS: f64 = 24.0;
const WH_PER_KWH: f64 = 1000.0;

/// Raw form values supplied by the caller.
///
/// Numeric fields are kept as typed so that they can be echoed back unchanged
/// in the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationInput {
    /// Energy used over `period` [kWh]
    pub consumption: String,
    pub period: BillingPeriod,
    /// Rated power of one panel [W]
    pub panel_power: String,
    /// Average daily hours of full-intensity sunlight [h]
    pub peak_sun_hours: String,
}

impl EstimationInput {
    pub fn new(
        consumption: impl Into<String>,
        period: BillingPeriod,
        panel_power: impl Into<String>,
        peak_sun_hours: impl Into<String>,
    ) -> Self {
        Self {
            consumption: consumption.into(),
            period,
            panel_power: panel_power.into(),
            peak_sun_hours: peak_sun_hours.into(),
        }
    }

    fn raw(&self, field: Field) -> &str {
        match field {
            Field::Consumption => &self.consumption,
            Field::PanelPower => &self.panel_power,
            Field::PeakSunHours => &self.peak_sun_hours,
        }
    }
}

/// Validated numeric input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Consumption,
    PanelPower,
    PeakSunHours,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Consumption, Field::PanelPower, Field::PeakSunHours];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Consumption => "consumption",
            Field::PanelPower => "panel_power",
            Field::PeakSunHours => "peak_sun_hours",
        }
    }

    /// Fixed message shown next to the field when it is rejected. Front ends
    /// that localize use `Translator::field_error` instead.
    pub fn error_message(self) -> &'static str {
        match self {
            Field::Consumption => "Por favor, ingrese un valor de consumo válido",
            Field::PanelPower => "Por favor, ingrese una potencia de panel válida",
            Field::PeakSunHours => "Por favor, ingrese un número válido de horas pico de sol (0-24)",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ErrorKind {
    /// Missing, non-numeric, non-finite or not strictly positive.
    #[error("invalid number")]
    InvalidNumber,
    /// Positive number above the field's maximum.
    #[error("out of range")]
    OutOfRange,
}

/// A rejected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: &'static str,
}

/// Field-level validation errors. Empty means every field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    entries: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.entries.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn kind(&self, field: Field) -> Option<ErrorKind> {
        self.get(field).map(|e| e.kind)
    }

    /// Errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.entries.iter().map(|(f, e)| (*f, e))
    }

    fn insert(&mut self, field: Field, kind: ErrorKind) {
        self.entries.insert(
            field,
            FieldError {
                kind,
                message: field.error_message(),
            },
        );
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.entries.keys().map(|k| k.as_str()).collect();
        write!(f, "{} invalid field(s): {}", fields.len(), fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Intermediate energy figures of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBreakdown {
    /// Consumption normalized to one month [kWh]
    pub monthly_kwh: f64,
    /// Average consumption per day [kWh]
    pub daily_kwh: f64,
    /// Daily energy divided by peak sun hours [kWh]
    pub daily_energy_kwh: f64,
}

/// Calculation result with the echoed inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    /// Consumption as entered, trimmed [kWh]
    pub consumption: String,
    pub period: BillingPeriod,
    /// Panel power as entered, trimmed [W]
    pub panel_power: String,
    /// Peak sun hours as entered, trimmed [h]
    pub peak_sun_hours: String,
    /// Number of panels needed to cover the daily consumption
    pub panels_required: u64,
    pub breakdown: EnergyBreakdown,
}

/// Parses a form value as a finite number. Missing or malformed text yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn check_positive(raw: &str) -> Result<f64, ErrorKind> {
    match parse_number(raw) {
        Some(v) if v > 0.0 => Ok(v),
        _ => Err(ErrorKind::InvalidNumber),
    }
}

fn check_field(field: Field, raw: &str) -> Result<f64, ErrorKind> {
    let value = check_positive(raw)?;
    match field {
        Field::PeakSunHours if value > MAX_PEAK_SUN_HOURS => Err(ErrorKind::OutOfRange),
        _ => Ok(value),
    }
}

/// Checks every numeric field independently and collects all failures.
pub fn validate(input: &EstimationInput) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in Field::ALL {
        if let Err(kind) = check_field(field, input.raw(field)) {
            errors.insert(field, kind);
        }
    }
    debug!(invalid = errors.len(), "validated estimation input");
    errors
}

/// Computes the number of panels.
///
/// `input` must have passed [`validate`]; invalid input is not rejected and
/// produces a meaningless panel count.
///
/// The count saturates: a ratio that underflows to zero gives 1, and one that
/// overflows to infinity (e.g. `1e308` kWh with `1e-300` W panels) gives
/// `u64::MAX`.
pub fn compute(input: &EstimationInput) -> EstimationResult {
    let consumption = parse_number(&input.consumption).unwrap_or(f64::NAN);
    let panel_power = parse_number(&input.panel_power).unwrap_or(f64::NAN);
    let peak_sun_hours = parse_number(&input.peak_sun_hours).unwrap_or(f64::NAN);

    let monthly_kwh = match input.period {
        BillingPeriod::Bimonthly => consumption / 2.0,
        BillingPeriod::Monthly => consumption,
    };
    let daily_kwh = monthly_kwh / DAYS_PER_MONTH;
    let daily_energy_kwh = daily_kwh / peak_sun_hours;
    let panels = (daily_energy_kwh * WH_PER_KWH / panel_power).ceil();
    // float-to-int casts saturate at both ends
    let panels_required = (panels as u64).max(1);
    debug!(panels_required, daily_energy_kwh, "computed panel count");

    EstimationResult {
        consumption: input.consumption.trim().to_string(),
        period: input.period,
        panel_power: input.panel_power.trim().to_string(),
        peak_sun_hours: input.peak_sun_hours.trim().to_string(),
        panels_required,
        breakdown: EnergyBreakdown {
            monthly_kwh,
            daily_kwh,
            daily_energy_kwh,
        },
    }
}

/// Validates and, when every field is valid, computes the result.
pub fn estimate(input: &EstimationInput) -> Result<EstimationResult, ValidationErrors> {
    let errors = validate(input);
    if errors.is_empty() {
        Ok(compute(input))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_ignores_whitespace() {
        assert_eq!(parse_number(" 5.5 "), Some(5.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }

    #[test]
    fn parse_number_rejects_missing_and_non_finite() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn validation_errors_display_lists_fields() {
        let errors = validate(&EstimationInput::new("", BillingPeriod::Monthly, "0", "5"));
        assert_eq!(
            errors.to_string(),
            "2 invalid field(s): consumption, panel_power"
        );
    }

    #[test]
    fn overflowing_ratio_saturates_panel_count() {
        let input = EstimationInput::new("1e308", BillingPeriod::Monthly, "1e-300", "0.0001");
        assert!(validate(&input).is_empty());
        assert_eq!(compute(&input).panels_required, u64::MAX);
    }

    #[test]
    fn underflowing_ratio_still_needs_one_panel() {
        let input = EstimationInput::new("1e-300", BillingPeriod::Monthly, "1e300", "24");
        assert_eq!(compute(&input).panels_required, 1);
    }

    #[test]
    fn compute_does_not_panic_on_unvalidated_input() {
        let res = compute(&EstimationInput::new("abc", BillingPeriod::Monthly, "", "0"));
        assert!(res.breakdown.monthly_kwh.is_nan());
    }
}
