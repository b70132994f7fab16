use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::solar::{BillingPeriod, Field};

/// Namespace of string keys.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const FORM_CONSUMPTION: &str = "form.consumption";
    pub const FORM_CONSUMPTION_HINT: &str = "form.consumption_hint";
    pub const FORM_PERIOD: &str = "form.period";
    pub const FORM_PANEL_POWER: &str = "form.panel_power";
    pub const FORM_PANEL_POWER_HINT: &str = "form.panel_power_hint";
    pub const FORM_PEAK_SUN_HOURS: &str = "form.peak_sun_hours";
    pub const FORM_PEAK_SUN_HOURS_HINT: &str = "form.peak_sun_hours_hint";
    pub const FORM_CALCULATE: &str = "form.calculate";
    pub const PROMPT_PERIOD_CHOICE: &str = "prompt.period_choice";

    pub const PERIOD_MONTHLY: &str = "period.monthly";
    pub const PERIOD_BIMONTHLY: &str = "period.bimonthly";

    pub const ERROR_CONSUMPTION: &str = "error.consumption";
    pub const ERROR_PANEL_POWER: &str = "error.panel_power";
    pub const ERROR_PEAK_SUN_HOURS: &str = "error.peak_sun_hours";

    pub const SUMMARY_TITLE: &str = "summary.title";
    pub const SUMMARY_PANELS_REQUIRED: &str = "summary.panels_required";
    pub const SUMMARY_CONSUMPTION: &str = "summary.consumption";
    pub const SUMMARY_PANEL_POWER: &str = "summary.panel_power";
    pub const SUMMARY_PEAK_SUN_HOURS: &str = "summary.peak_sun_hours";

    pub const BREAKDOWN_TITLE: &str = "breakdown.title";
    pub const BREAKDOWN_MONTHLY: &str = "breakdown.monthly";
    pub const BREAKDOWN_DAILY: &str = "breakdown.daily";
    pub const BREAKDOWN_DAILY_ENERGY: &str = "breakdown.daily_energy";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_CURRENT_PERIOD: &str = "settings.current_period";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const GUI_THEME_DARK: &str = "gui.theme.dark";
    pub const GUI_THEME_LIGHT: &str = "gui.theme.light";
    pub const GUI_SETTINGS_TITLE: &str = "gui.settings.title";
    pub const GUI_SETTINGS_LANGUAGE: &str = "gui.settings.language";
    pub const GUI_SETTINGS_LANGUAGE_AUTO: &str = "gui.settings.language_auto";
    pub const GUI_SETTINGS_SAVE: &str = "gui.settings.save";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    Es,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Es
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

/// Runtime string bundle.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// Builds a translator for an `es`/`en` code. Unknown codes fall back to Spanish.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// Like [`Translator::new`], but loads `<pack_dir>/<code>.toml` (then
    /// `locales/<code>.toml`) on top of the built-in strings when present.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// Looks a key up in the loaded language pack only.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// Translates a key. Missing English strings fall back to Spanish, unknown keys to the key.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let builtin = match self.lang {
            Language::En => en(key).or_else(|| es(key)),
            Language::Es => es(key),
        };
        builtin.unwrap_or(key).to_string()
    }

    /// Translates a key and replaces `{name}` placeholders.
    pub fn fill(&self, key: &str, vars: &[(&str, String)]) -> String {
        let mut out = self.t(key);
        for (k, v) in vars {
            out = out.replace(&format!("{{{k}}}"), v);
        }
        out
    }

    pub fn period_label(&self, period: BillingPeriod) -> String {
        self.t(match period {
            BillingPeriod::Monthly => keys::PERIOD_MONTHLY,
            BillingPeriod::Bimonthly => keys::PERIOD_BIMONTHLY,
        })
    }

    /// Localized message for a rejected field.
    pub fn field_error(&self, field: Field) -> String {
        self.t(match field {
            Field::Consumption => keys::ERROR_CONSUMPTION,
            Field::PanelPower => keys::ERROR_PANEL_POWER,
            Field::PeakSunHours => keys::ERROR_PEAK_SUN_HOURS,
        })
    }
}

/// Picks the language code from the CLI flag, then the config, then the system locale.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_language_code(cli_arg)
        .or_else(|| config_lang.and_then(normalize_language_code))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "es".to_string())
}

/// Maps a user-supplied code to `es`/`en`. `auto`, empty and unsupported codes yield `None`.
pub fn normalize_language_code(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("es") => Some("es".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "es" => Some("es".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// Guesses the language from the system locale.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// Loads a TOML language pack. Nested tables are flattened to dotted keys.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // es-mx -> es
    let (base, _) = lang.split_once(['-', '_'])?;
    try_load(base)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Table = toml::from_str(src).ok()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    walk(&format!("{prefix}.{k}"), v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in &value {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn es(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Saliendo del programa.",
        APP_TITLE => "Calculadora de Paneles Solares",
        MAIN_MENU_TITLE => "\n=== Calculadora de Paneles Solares ===",
        MAIN_MENU_CALCULATE => "1) Calcular paneles",
        MAIN_MENU_SETTINGS => "2) Configuración",
        MAIN_MENU_EXIT => "0) Salir",
        PROMPT_MENU_SELECT => "Seleccione una opción: ",
        INVALID_SELECTION_RETRY => "Entrada inválida. Intente de nuevo.",
        FORM_CONSUMPTION => "Consumo (kWh)",
        FORM_CONSUMPTION_HINT => "Ingrese el consumo",
        FORM_PERIOD => "Seleccione período",
        FORM_PANEL_POWER => "Potencia del Panel (W)",
        FORM_PANEL_POWER_HINT => "Ingrese la potencia del panel",
        FORM_PEAK_SUN_HOURS => "Horas Pico de Sol",
        FORM_PEAK_SUN_HOURS_HINT => "Ingrese las horas pico de sol",
        FORM_CALCULATE => "Calcular",
        PROMPT_PERIOD_CHOICE => "Período: 1) Mensual  2) Bimestral [Enter = {default}]: ",
        PERIOD_MONTHLY => "Mensual",
        PERIOD_BIMONTHLY => "Bimestral",
        ERROR_CONSUMPTION => Field::Consumption.error_message(),
        ERROR_PANEL_POWER => Field::PanelPower.error_message(),
        ERROR_PEAK_SUN_HOURS => Field::PeakSunHours.error_message(),
        SUMMARY_TITLE => "Resumen de cálculo",
        SUMMARY_PANELS_REQUIRED => "Paneles requeridos: {value}",
        SUMMARY_CONSUMPTION => "Consumo: {value} kWh ({period})",
        SUMMARY_PANEL_POWER => "Potencia del panel: {value} W",
        SUMMARY_PEAK_SUN_HOURS => "Horas pico de sol: {value}",
        BREAKDOWN_TITLE => "Detalle del cálculo",
        BREAKDOWN_MONTHLY => "Consumo mensual: {value} kWh",
        BREAKDOWN_DAILY => "Consumo diario: {value} kWh",
        BREAKDOWN_DAILY_ENERGY => "Energía diaria por hora pico: {value} kWh",
        SETTINGS_HEADING => "\n-- Configuración --",
        SETTINGS_CURRENT_LANGUAGE => "Idioma: {value}",
        SETTINGS_CURRENT_PERIOD => "Período predeterminado: {value}",
        SETTINGS_OPTIONS => "1) Idioma  2) Período predeterminado",
        SETTINGS_PROMPT_CHANGE => "Número a cambiar (Enter para cancelar): ",
        SETTINGS_PROMPT_LANGUAGE => "Código de idioma (auto/es/en): ",
        SETTINGS_INVALID => "Entrada inválida; no se realizaron cambios.",
        SETTINGS_SAVED => "Configuración guardada.",
        GUI_THEME_DARK => "Oscuro",
        GUI_THEME_LIGHT => "Claro",
        GUI_SETTINGS_TITLE => "Configuración",
        GUI_SETTINGS_LANGUAGE => "Idioma",
        GUI_SETTINGS_LANGUAGE_AUTO => "Sistema",
        GUI_SETTINGS_SAVE => "Guardar",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        APP_TITLE => "Solar Panel Calculator",
        MAIN_MENU_TITLE => "\n=== Solar Panel Calculator ===",
        MAIN_MENU_CALCULATE => "1) Calculate panels",
        MAIN_MENU_SETTINGS => "2) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        FORM_CONSUMPTION => "Consumption (kWh)",
        FORM_CONSUMPTION_HINT => "Enter the consumption",
        FORM_PERIOD => "Select period",
        FORM_PANEL_POWER => "Panel Power (W)",
        FORM_PANEL_POWER_HINT => "Enter the panel power",
        FORM_PEAK_SUN_HOURS => "Peak Sun Hours",
        FORM_PEAK_SUN_HOURS_HINT => "Enter the peak sun hours",
        FORM_CALCULATE => "Calculate",
        PROMPT_PERIOD_CHOICE => "Period: 1) Monthly  2) Bimonthly [Enter = {default}]: ",
        PERIOD_MONTHLY => "Monthly",
        PERIOD_BIMONTHLY => "Bimonthly",
        ERROR_CONSUMPTION => "Please enter a valid consumption value",
        ERROR_PANEL_POWER => "Please enter a valid panel power",
        ERROR_PEAK_SUN_HOURS => "Please enter a valid number of peak sun hours (0-24)",
        SUMMARY_TITLE => "Calculation summary",
        SUMMARY_PANELS_REQUIRED => "Panels required: {value}",
        SUMMARY_CONSUMPTION => "Consumption: {value} kWh ({period})",
        SUMMARY_PANEL_POWER => "Panel power: {value} W",
        SUMMARY_PEAK_SUN_HOURS => "Peak sun hours: {value}",
        BREAKDOWN_TITLE => "Calculation details",
        BREAKDOWN_MONTHLY => "Monthly consumption: {value} kWh",
        BREAKDOWN_DAILY => "Daily consumption: {value} kWh",
        BREAKDOWN_DAILY_ENERGY => "Daily energy per peak hour: {value} kWh",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Language: {value}",
        SETTINGS_CURRENT_PERIOD => "Default period: {value}",
        SETTINGS_OPTIONS => "1) Language  2) Default period",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_PROMPT_LANGUAGE => "Language code (auto/es/en): ",
        SETTINGS_INVALID => "Invalid input; nothing changed.",
        SETTINGS_SAVED => "Settings saved.",
        GUI_THEME_DARK => "Dark",
        GUI_THEME_LIGHT => "Light",
        GUI_SETTINGS_TITLE => "Settings",
        GUI_SETTINGS_LANGUAGE => "Language",
        GUI_SETTINGS_LANGUAGE_AUTO => "System",
        GUI_SETTINGS_SAVE => "Save",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_falls_back_to_spanish() {
        let tr = Translator::new("fr");
        assert_eq!(tr.language_code(), "es");
        assert_eq!(tr.t(keys::FORM_CALCULATE), "Calcular");
    }

    #[test]
    fn english_strings_and_placeholders() {
        let tr = Translator::new("en-US");
        assert_eq!(
            tr.fill(keys::SUMMARY_PANELS_REQUIRED, &[("value", "5".into())]),
            "Panels required: 5"
        );
        assert_eq!(tr.period_label(BillingPeriod::Bimonthly), "Bimonthly");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        assert_eq!(Translator::new("es").t("no.such.key"), "no.such.key");
    }

    #[test]
    fn explicit_codes_win_over_system_locale() {
        assert_eq!(resolve_language("en-gb", Some("es")), "en");
        assert_eq!(resolve_language("auto", Some("es-MX")), "es");
    }

    #[test]
    fn locale_strings_are_reduced_to_base_language() {
        assert_eq!(normalize_locale_string("es_AR.UTF-8"), Some("es".into()));
        assert_eq!(normalize_locale_string("en-US"), Some("en".into()));
        assert_eq!(normalize_locale_string("ko_KR"), None);
    }

    #[test]
    fn language_pack_overrides_builtins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("es.toml"),
            "[summary]\ntitle = \"Resultado\"\n",
        )
        .unwrap();
        let tr = Translator::new_with_pack("es-CL", dir.path().to_str());
        assert_eq!(tr.t(keys::SUMMARY_TITLE), "Resultado");
        assert_eq!(tr.t(keys::FORM_CALCULATE), "Calcular");
    }
}
