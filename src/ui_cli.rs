use std::io::{self, BufRead, StdinLock, Stdout, Write};

use tracing::warn;

use crate::app::AppError;
use crate::config::Config;
use crate::i18n::{self, keys, Translator};
use crate::solar::{self, BillingPeriod, EstimationInput, EstimationResult, ValidationErrors};
use crate::summary;

/// Main menu choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    Settings,
    Exit,
}

/// Line-oriented terminal I/O.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Prints `prompt` and reads one line without its line ending.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Shows the main menu and returns the selection. Closed input counts as exit.
pub fn main_menu<R: BufRead, W: Write>(
    con: &mut Console<R, W>,
    tr: &Translator,
) -> Result<MenuChoice, AppError> {
    con.say(&tr.t(keys::MAIN_MENU_TITLE))?;
    con.say(&tr.t(keys::MAIN_MENU_CALCULATE))?;
    con.say(&tr.t(keys::MAIN_MENU_SETTINGS))?;
    con.say(&tr.t(keys::MAIN_MENU_EXIT))?;
    loop {
        let sel = match con.read_line(&tr.t(keys::PROMPT_MENU_SELECT)) {
            Ok(sel) => sel,
            Err(AppError::InputClosed) => return Ok(MenuChoice::Exit),
            Err(e) => return Err(e),
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::Calculate),
            "2" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => con.say(&tr.t(keys::INVALID_SELECTION_RETRY))?,
        }
    }
}

/// Asks for the four form values, then prints the summary or the field errors.
pub fn handle_calculation<R: BufRead, W: Write>(
    con: &mut Console<R, W>,
    tr: &Translator,
    cfg: &Config,
    verbose: bool,
) -> Result<(), AppError> {
    let consumption = con.read_line(&format!("{}: ", tr.t(keys::FORM_CONSUMPTION)))?;
    let period = read_period(con, tr, cfg.default_period)?;
    let panel_power = con.read_line(&format!("{}: ", tr.t(keys::FORM_PANEL_POWER)))?;
    let peak_sun_hours = con.read_line(&format!("{}: ", tr.t(keys::FORM_PEAK_SUN_HOURS)))?;
    let input = EstimationInput::new(consumption, period, panel_power, peak_sun_hours);
    print_outcome(con, tr, &solar::estimate(&input), verbose)?;
    Ok(())
}

/// Prints a calculation outcome. Returns `true` when the input was valid.
pub fn print_outcome<R: BufRead, W: Write>(
    con: &mut Console<R, W>,
    tr: &Translator,
    outcome: &Result<EstimationResult, ValidationErrors>,
    verbose: bool,
) -> Result<bool, AppError> {
    match outcome {
        Ok(result) => {
            con.say("")?;
            con.say(&summary::render(result, tr))?;
            if verbose {
                con.say("")?;
                con.say(&summary::render_breakdown(result, tr))?;
            }
            Ok(true)
        }
        Err(errors) => {
            warn!(%errors, "rejected input");
            let prefix = tr.t(keys::ERROR_PREFIX);
            for line in summary::error_lines(errors, tr) {
                con.say(&format!("{prefix}: {line}"))?;
            }
            Ok(false)
        }
    }
}

fn read_period<R: BufRead, W: Write>(
    con: &mut Console<R, W>,
    tr: &Translator,
    default: BillingPeriod,
) -> Result<BillingPeriod, AppError> {
    let prompt = tr.fill(
        keys::PROMPT_PERIOD_CHOICE,
        &[("default", tr.period_label(default))],
    );
    loop {
        let sel = con.read_line(&prompt)?;
        if sel.trim().is_empty() {
            return Ok(default);
        }
        match sel.parse::<BillingPeriod>() {
            Ok(period) => return Ok(period),
            Err(_) => con.say(&tr.t(keys::INVALID_SELECTION_RETRY))?,
        }
    }
}

/// Settings menu. Returns `true` when something changed.
pub fn handle_settings<R: BufRead, W: Write>(
    con: &mut Console<R, W>,
    tr: &Translator,
    cfg: &mut Config,
) -> Result<bool, AppError> {
    con.say(&tr.t(keys::SETTINGS_HEADING))?;
    con.say(&tr.fill(
        keys::SETTINGS_CURRENT_LANGUAGE,
        &[("value", cfg.language.clone())],
    ))?;
    con.say(&tr.fill(
        keys::SETTINGS_CURRENT_PERIOD,
        &[("value", tr.period_label(cfg.default_period))],
    ))?;
    con.say(&tr.t(keys::SETTINGS_OPTIONS))?;
    let sel = con.read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    match sel.trim() {
        "" => Ok(false),
        "1" => {
            let code = con.read_line(&tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
            let code = code.trim().to_lowercase();
            let accepted = if code == "auto" {
                Some(code)
            } else {
                i18n::normalize_language_code(&code)
            };
            match accepted {
                Some(code) => {
                    cfg.language = code;
                    con.say(&tr.t(keys::SETTINGS_SAVED))?;
                    Ok(true)
                }
                None => {
                    con.say(&tr.t(keys::SETTINGS_INVALID))?;
                    Ok(false)
                }
            }
        }
        "2" => {
            let period = read_period(con, tr, cfg.default_period)?;
            cfg.default_period = period;
            con.say(&tr.t(keys::SETTINGS_SAVED))?;
            Ok(true)
        }
        _ => {
            con.say(&tr.t(keys::SETTINGS_INVALID))?;
            Ok(false)
        }
    }
}
