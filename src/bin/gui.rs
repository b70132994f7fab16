#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui desktop front end.

use clap::Parser;
use eframe::{egui, App, Frame};
use solar_panel_calculator::{
    config::{self, Config, Theme, DEFAULT_CONFIG_PATH},
    i18n::{keys, Translator},
    logging,
    solar::{self, BillingPeriod, EstimationInput, EstimationResult, Field, ValidationErrors},
    summary,
};
use std::path::PathBuf;
use tracing::{info, warn};

const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const RESULT_GREEN: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);
const ACCENT_BLUE: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

#[derive(Debug, Parser)]
#[command(name = "solar_panel_calculator", version)]
struct Args {
    /// Language: auto, es, en
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// Settings file [default: config.toml in the working directory]
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let loaded = match &args.config {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    };
    let app_cfg = match loaded {
        Ok((cfg, origin)) => {
            logging::init(&cfg.log_level);
            info!(path = %config_path.display(), origin = origin.as_str(), "config ready");
            cfg
        }
        Err(e) => {
            let cfg = Config::default();
            logging::init(&cfg.log_level);
            warn!(error = %e, "using default settings");
            eprintln!("Config error: {e}");
            cfg
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 720.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    let title = app_cfg.translator(&args.lang).t(keys::APP_TITLE);
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Box::new(GuiApp::new(app_cfg, config_path, &args.lang))),
    )
}

struct GuiApp {
    config: Config,
    config_path: PathBuf,
    tr: Translator,
    // form
    consumption: String,
    period: BillingPeriod,
    panel_power: String,
    peak_sun_hours: String,
    errors: ValidationErrors,
    result: Option<EstimationResult>,
    // settings window
    show_settings: bool,
    lang_input: String,
    settings_status: Option<String>,
    applied_theme: Option<Theme>,
}

impl GuiApp {
    fn new(config: Config, config_path: PathBuf, cli_lang: &str) -> Self {
        let tr = config.translator(cli_lang);
        Self {
            period: config.default_period,
            lang_input: config.language.clone(),
            config,
            config_path,
            tr,
            consumption: String::new(),
            panel_power: String::new(),
            peak_sun_hours: String::new(),
            errors: ValidationErrors::default(),
            result: None,
            show_settings: false,
            settings_status: None,
            applied_theme: None,
        }
    }

    fn input(&self) -> EstimationInput {
        EstimationInput::new(
            self.consumption.clone(),
            self.period,
            self.panel_power.clone(),
            self.peak_sun_hours.clone(),
        )
    }

    /// Validates the form; the result card is replaced on success and hidden on failure.
    fn submit(&mut self) {
        match solar::estimate(&self.input()) {
            Ok(result) => {
                info!(panels = result.panels_required, "calculated");
                self.errors = ValidationErrors::default();
                self.result = Some(result);
            }
            Err(errors) => {
                warn!(%errors, "rejected input");
                self.errors = errors;
                self.result = None;
            }
        }
    }

    fn save_settings(&mut self) {
        self.config.language = self.lang_input.clone();
        self.tr = self.config.translator("auto");
        self.settings_status = Some(match self.config.save_to(&self.config_path) {
            Ok(()) => {
                info!(path = %self.config_path.display(), "settings saved");
                self.tr.t(keys::SETTINGS_SAVED)
            }
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn field_error(&self, ui: &mut egui::Ui, field: Field) {
        if self.errors.contains(field) {
            ui.colored_label(ERROR_RED, self.tr.field_error(field));
        }
    }

    fn ui_top_bar(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new(tr.t(keys::APP_TITLE)).color(ACCENT_BLUE));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(tr.t(keys::GUI_SETTINGS_TITLE)).clicked() {
                    self.show_settings = true;
                }
                ui.separator();
                let before = self.config.theme;
                ui.selectable_value(&mut self.config.theme, Theme::Dark, tr.t(keys::GUI_THEME_DARK));
                ui.selectable_value(&mut self.config.theme, Theme::Light, tr.t(keys::GUI_THEME_LIGHT));
                if self.config.theme != before {
                    if let Err(e) = self.config.save_to(&self.config_path) {
                        warn!(error = %e, "could not persist theme");
                    }
                }
            });
        });
    }

    fn ui_form(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let field_width = 260.0;

        ui.label(egui::RichText::new(tr.t(keys::FORM_CONSUMPTION)).strong());
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.consumption)
                    .hint_text(tr.t(keys::FORM_CONSUMPTION_HINT))
                    .desired_width(field_width),
            );
            egui::ComboBox::from_label(tr.t(keys::FORM_PERIOD))
                .selected_text(tr.period_label(self.period))
                .show_ui(ui, |ui| {
                    for p in BillingPeriod::ALL {
                        ui.selectable_value(&mut self.period, p, tr.period_label(p));
                    }
                });
        });
        self.field_error(ui, Field::Consumption);
        ui.add_space(8.0);

        ui.label(egui::RichText::new(tr.t(keys::FORM_PANEL_POWER)).strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.panel_power)
                .hint_text(tr.t(keys::FORM_PANEL_POWER_HINT))
                .desired_width(field_width),
        );
        self.field_error(ui, Field::PanelPower);
        ui.add_space(8.0);

        ui.label(egui::RichText::new(tr.t(keys::FORM_PEAK_SUN_HOURS)).strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.peak_sun_hours)
                .hint_text(tr.t(keys::FORM_PEAK_SUN_HOURS_HINT))
                .desired_width(field_width),
        );
        self.field_error(ui, Field::PeakSunHours);
        ui.add_space(12.0);

        let button = egui::Button::new(
            egui::RichText::new(tr.t(keys::FORM_CALCULATE)).color(egui::Color32::WHITE),
        )
        .fill(ACCENT_BLUE)
        .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add(button).clicked() {
            self.submit();
        }
    }

    fn ui_result(&self, ui: &mut egui::Ui) {
        let Some(result) = &self.result else {
            return;
        };
        let text = summary::render(result, &self.tr);
        let mut lines = text.lines();
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            if let Some(title) = lines.next() {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new(title).color(RESULT_GREEN).strong());
                });
            }
            if let Some(panels) = lines.next() {
                ui.label(egui::RichText::new(panels).size(18.0).strong());
            }
            for line in lines {
                ui.label(line);
            }
            ui.separator();
            ui.label(egui::RichText::new(summary::render_breakdown(result, &self.tr)).small());
        });
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let mut save_clicked = false;
        egui::Window::new(tr.t(keys::GUI_SETTINGS_TITLE))
            .collapsible(false)
            .resizable(false)
            .open(&mut self.show_settings)
            .show(ctx, |ui| {
                ui.label(tr.t(keys::GUI_SETTINGS_LANGUAGE));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.clone())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.lang_input,
                            "auto".into(),
                            tr.t(keys::GUI_SETTINGS_LANGUAGE_AUTO),
                        );
                        ui.selectable_value(&mut self.lang_input, "es".into(), "Español");
                        ui.selectable_value(&mut self.lang_input, "en".into(), "English");
                    });
                ui.separator();
                ui.label(tr.fill(
                    keys::SETTINGS_CURRENT_PERIOD,
                    &[("value", tr.period_label(self.config.default_period))],
                ));
                ui.horizontal(|ui| {
                    for p in BillingPeriod::ALL {
                        ui.selectable_value(&mut self.config.default_period, p, tr.period_label(p));
                    }
                });
                ui.separator();
                if ui.button(tr.t(keys::GUI_SETTINGS_SAVE)).clicked() {
                    save_clicked = true;
                }
                if let Some(msg) = &self.settings_status {
                    ui.label(msg.as_str());
                }
            });
        if save_clicked {
            self.save_settings();
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.applied_theme != Some(self.config.theme) {
            ctx.set_visuals(match self.config.theme {
                Theme::Dark => egui::Visuals::dark(),
                Theme::Light => egui::Visuals::light(),
            });
            self.applied_theme = Some(self.config.theme);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.ui_top_bar(ui);
        });

        if self.show_settings {
            self.ui_settings(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        self.ui_form(ui);
                    });
                    ui.add_space(16.0);
                    self.ui_result(ui);
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(dir: &tempfile::TempDir) -> GuiApp {
        GuiApp::new(Config::default(), dir.path().join("config.toml"), "en")
    }

    #[test]
    fn new_app_uses_configured_default_period() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            default_period: BillingPeriod::Monthly,
            ..Config::default()
        };
        let app = GuiApp::new(cfg, dir.path().join("config.toml"), "en");
        assert_eq!(app.period, BillingPeriod::Monthly);
        assert!(app.result.is_none());
    }

    #[test]
    fn submit_shows_result_for_valid_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.consumption = "600".into();
        app.period = BillingPeriod::Bimonthly;
        app.panel_power = "450".into();
        app.peak_sun_hours = "5".into();
        app.submit();
        assert!(app.errors.is_empty());
        assert_eq!(app.result.as_ref().map(|r| r.panels_required), Some(5));
    }

    #[test]
    fn submit_hides_previous_result_on_invalid_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.consumption = "300".into();
        app.period = BillingPeriod::Monthly;
        app.panel_power = "300".into();
        app.peak_sun_hours = "6".into();
        app.submit();
        assert_eq!(app.result.as_ref().map(|r| r.panels_required), Some(6));

        app.consumption = "-1".into();
        app.panel_power = "0".into();
        app.peak_sun_hours = "30".into();
        app.submit();
        assert!(app.result.is_none());
        assert_eq!(app.errors.len(), 3);
    }

    #[test]
    fn save_settings_switches_language_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.lang_input = "es".into();
        app.save_settings();
        assert_eq!(app.tr.language_code(), "es");
        assert_eq!(app.settings_status.as_deref(), Some("Configuración guardada."));
        let (saved, _) = config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.language, "es");
    }
}
