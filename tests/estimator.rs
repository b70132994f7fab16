use solar_panel_calculator::solar::{
    compute, estimate, validate, BillingPeriod, ErrorKind, EstimationInput, Field,
};

fn input(consumption: &str, period: BillingPeriod, power: &str, hours: &str) -> EstimationInput {
    EstimationInput::new(consumption, period, power, hours)
}

#[test]
fn bimonthly_bill_of_600_kwh_needs_five_450_w_panels() {
    let res = estimate(&input("600", BillingPeriod::Bimonthly, "450", "5")).expect("valid input");
    assert_eq!(res.breakdown.monthly_kwh, 300.0);
    assert_eq!(res.breakdown.daily_kwh, 10.0);
    assert_eq!(res.breakdown.daily_energy_kwh, 2.0);
    assert_eq!(res.panels_required, 5);
}

#[test]
fn monthly_bill_of_300_kwh_needs_six_300_w_panels() {
    let res = estimate(&input("300", BillingPeriod::Monthly, "300", "6")).expect("valid input");
    assert_eq!(res.breakdown.daily_kwh, 10.0);
    assert!((res.breakdown.daily_energy_kwh - 1.667).abs() < 1e-3);
    assert_eq!(res.panels_required, 6);
}

#[test]
fn exact_ratio_is_not_rounded_up() {
    // 900 kWh/month -> 30 kWh/day -> 6 kWh at 5 h -> 6000 Wh / 500 W = 12
    let res = compute(&input("900", BillingPeriod::Monthly, "500", "5"));
    assert_eq!(res.panels_required, 12);
}

#[test]
fn result_echoes_inputs_as_typed() {
    let res = estimate(&input(" 600 ", BillingPeriod::Bimonthly, "450", "5.0")).unwrap();
    assert_eq!(res.consumption, "600");
    assert_eq!(res.period, BillingPeriod::Bimonthly);
    assert_eq!(res.panel_power, "450");
    assert_eq!(res.peak_sun_hours, "5.0");
}

#[test]
fn rejects_non_positive_and_non_numeric_consumption() {
    for bad in ["0", "-5", "abc", ""] {
        let errors = validate(&input(bad, BillingPeriod::Monthly, "450", "5"));
        assert_eq!(errors.len(), 1, "consumption={bad:?}");
        assert_eq!(errors.kind(Field::Consumption), Some(ErrorKind::InvalidNumber));
    }
}

#[test]
fn rejects_zero_panel_power() {
    let errors = validate(&input("500", BillingPeriod::Monthly, "0", "5"));
    assert_eq!(errors.kind(Field::PanelPower), Some(ErrorKind::InvalidNumber));
    assert!(!errors.contains(Field::Consumption));
}

#[test]
fn peak_sun_hours_must_be_within_a_day() {
    let zero = validate(&input("500", BillingPeriod::Monthly, "450", "0"));
    assert_eq!(zero.kind(Field::PeakSunHours), Some(ErrorKind::InvalidNumber));

    let too_many = validate(&input("500", BillingPeriod::Monthly, "450", "25"));
    assert_eq!(too_many.kind(Field::PeakSunHours), Some(ErrorKind::OutOfRange));

    let full_day = validate(&input("500", BillingPeriod::Monthly, "450", "24"));
    assert!(full_day.is_empty());
}

#[test]
fn missing_or_non_numeric_peak_sun_hours_is_an_invalid_number() {
    for bad in ["abc", "", "  ", "-3"] {
        let errors = validate(&input("500", BillingPeriod::Monthly, "450", bad));
        assert_eq!(errors.len(), 1, "peak_sun_hours={bad:?}");
        assert_eq!(
            errors.kind(Field::PeakSunHours),
            Some(ErrorKind::InvalidNumber),
            "peak_sun_hours={bad:?}"
        );
    }
}

#[test]
fn accepts_typical_values() {
    assert!(validate(&input("500", BillingPeriod::Bimonthly, "450", "5.5")).is_empty());
}

#[test]
fn collects_every_invalid_field() {
    let errors = validate(&input("-1", BillingPeriod::Monthly, "0", "30"));
    let kinds: Vec<_> = errors.iter().map(|(f, e)| (f, e.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (Field::Consumption, ErrorKind::InvalidNumber),
            (Field::PanelPower, ErrorKind::InvalidNumber),
            (Field::PeakSunHours, ErrorKind::OutOfRange),
        ]
    );
    assert_eq!(
        errors.get(Field::PeakSunHours).map(|e| e.message),
        Some("Por favor, ingrese un número válido de horas pico de sol (0-24)")
    );
}

#[test]
fn estimate_returns_validation_errors_instead_of_computing() {
    let err = estimate(&input("abc", BillingPeriod::Monthly, "450", "5")).unwrap_err();
    assert!(err.contains(Field::Consumption));
    assert_eq!(err.to_string(), "1 invalid field(s): consumption");
}
