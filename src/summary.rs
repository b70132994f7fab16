//! Human-readable rendering of results and validation errors.

use crate::i18n::{keys, Translator};
use crate::solar::{EstimationResult, ValidationErrors};

/// Renders the result card: title, panel count and the echoed inputs.
pub fn render(result: &EstimationResult, tr: &Translator) -> String {
    [
        tr.t(keys::SUMMARY_TITLE),
        tr.fill(
            keys::SUMMARY_PANELS_REQUIRED,
            &[("value", result.panels_required.to_string())],
        ),
        tr.fill(
            keys::SUMMARY_CONSUMPTION,
            &[
                ("value", result.consumption.clone()),
                ("period", tr.period_label(result.period)),
            ],
        ),
        tr.fill(
            keys::SUMMARY_PANEL_POWER,
            &[("value", result.panel_power.clone())],
        ),
        tr.fill(
            keys::SUMMARY_PEAK_SUN_HOURS,
            &[("value", result.peak_sun_hours.clone())],
        ),
    ]
    .join("\n")
}

/// Renders the intermediate energy figures with three decimals.
pub fn render_breakdown(result: &EstimationResult, tr: &Translator) -> String {
    let b = &result.breakdown;
    [
        tr.t(keys::BREAKDOWN_TITLE),
        tr.fill(keys::BREAKDOWN_MONTHLY, &[("value", format!("{:.3}", b.monthly_kwh))]),
        tr.fill(keys::BREAKDOWN_DAILY, &[("value", format!("{:.3}", b.daily_kwh))]),
        tr.fill(
            keys::BREAKDOWN_DAILY_ENERGY,
            &[("value", format!("{:.3}", b.daily_energy_kwh))],
        ),
    ]
    .join("\n")
}

/// One localized line per rejected field, in field order.
pub fn error_lines(errors: &ValidationErrors, tr: &Translator) -> Vec<String> {
    errors.iter().map(|(field, _)| tr.field_error(field)).collect()
}
