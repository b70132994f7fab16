use std::io::{BufRead, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::i18n::{keys, Translator};
use crate::ui_cli::{self, Console, MenuChoice};

/// Errors of the terminal application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings error: {0}")]
    Config(#[from] ConfigError),
    /// Standard input reached end of file.
    #[error("input closed")]
    InputClosed,
}

/// Runs the interactive menu loop, saving settings to `config_path` when they change and on exit.
pub fn run<R: BufRead, W: Write>(
    con: &mut Console<R, W>,
    config: &mut Config,
    config_path: &Path,
    tr: &mut Translator,
    verbose: bool,
) -> Result<(), AppError> {
    loop {
        let step = match ui_cli::main_menu(con, tr)? {
            MenuChoice::Calculate => ui_cli::handle_calculation(con, tr, config, verbose),
            MenuChoice::Settings => match ui_cli::handle_settings(con, tr, config) {
                Ok(true) => {
                    config.save_to(config_path)?;
                    *tr = config.translator("auto");
                    info!(language = tr.language_code(), "settings updated");
                    Ok(())
                }
                other => other.map(|_| ()),
            },
            MenuChoice::Exit => break,
        };
        match step {
            Ok(()) => {}
            Err(AppError::InputClosed) => break,
            Err(e) => return Err(e),
        }
    }
    config.save_to(config_path)?;
    con.say(&tr.t(keys::APP_EXIT))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::BillingPeriod;
    use std::io::Cursor;

    #[test]
    fn menu_loop_calculates_and_saves_settings_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config {
            language: "en".into(),
            ..Config::default()
        };
        let mut tr = config.translator("auto");
        let script = "1\n300\nmonthly\n300\n6\n2\n2\n1\n0\n";
        let mut con = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());

        run(&mut con, &mut config, &path, &mut tr, true).unwrap();

        let out = String::from_utf8(con.into_output()).unwrap();
        assert!(out.contains("Panels required: 6"), "{out}");
        assert!(out.contains("Daily consumption: 10.000 kWh"), "{out}");
        assert!(out.contains("Exiting."), "{out}");
        let (saved, _) = crate::config::load_from(&path).unwrap();
        assert_eq!(saved.default_period, BillingPeriod::Monthly);
    }

    #[test]
    fn closed_input_mid_form_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        let mut tr = Translator::new("es");
        let mut con = Console::new(Cursor::new(b"1\n600\n".to_vec()), Vec::new());
        run(&mut con, &mut config, &path, &mut tr, false).unwrap();
        assert!(path.exists());
    }
}
