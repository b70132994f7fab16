use solar_panel_calculator::i18n::Translator;
use solar_panel_calculator::solar::{estimate, validate, BillingPeriod, EstimationInput};
use solar_panel_calculator::summary;

#[test]
fn spanish_summary_matches_result_card() {
    let tr = Translator::new("es");
    let res = estimate(&EstimationInput::new("600", BillingPeriod::Bimonthly, "450", "5")).unwrap();
    assert_eq!(
        summary::render(&res, &tr),
        "Resumen de cálculo\n\
         Paneles requeridos: 5\n\
         Consumo: 600 kWh (Bimestral)\n\
         Potencia del panel: 450 W\n\
         Horas pico de sol: 5"
    );
}

#[test]
fn english_breakdown_uses_three_decimals() {
    let tr = Translator::new("en");
    let res = estimate(&EstimationInput::new("300", BillingPeriod::Monthly, "300", "6")).unwrap();
    let text = summary::render_breakdown(&res, &tr);
    assert!(text.contains("Monthly consumption: 300.000 kWh"), "{text}");
    assert!(text.contains("Daily energy per peak hour: 1.667 kWh"), "{text}");
}

#[test]
fn error_lines_follow_field_order() {
    let tr = Translator::new("es");
    let errors = validate(&EstimationInput::new("", BillingPeriod::Monthly, "x", "99"));
    assert_eq!(
        summary::error_lines(&errors, &tr),
        vec![
            "Por favor, ingrese un valor de consumo válido",
            "Por favor, ingrese una potencia de panel válida",
            "Por favor, ingrese un número válido de horas pico de sol (0-24)",
        ]
    );
}
