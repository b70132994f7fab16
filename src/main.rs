use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use solar_panel_calculator::{
    app::{self, AppError},
    config::{self, DEFAULT_CONFIG_PATH},
    logging,
    solar::{self, BillingPeriod, EstimationInput},
    ui_cli::{self, Console},
};
use tracing::info;

/// Estimates how many solar panels cover a household's consumption.
///
/// Without the numeric flags an interactive menu is started.
#[derive(Debug, Parser)]
#[command(name = "solar_panel_calculator_cli", version)]
#[command(group(
    ArgGroup::new("one_shot")
        .multiple(true)
        .args(["consumption", "panel_power", "peak_sun_hours"])
))]
struct Args {
    /// Language: auto, es, en
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// Settings file [default: config.toml in the working directory]
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also print the intermediate energy figures
    #[arg(short, long)]
    verbose: bool,
    /// Consumption over the billing period [kWh]
    #[arg(long, allow_hyphen_values = true)]
    consumption: Option<String>,
    /// Billing period: monthly/mensual or bimonthly/bimestral
    #[arg(long, requires = "one_shot")]
    period: Option<BillingPeriod>,
    /// Rated power of one panel [W]
    #[arg(long, allow_hyphen_values = true)]
    panel_power: Option<String>,
    /// Average daily peak sun hours
    #[arg(long, allow_hyphen_values = true)]
    peak_sun_hours: Option<String>,
}

impl Args {
    fn is_one_shot(&self) -> bool {
        self.consumption.is_some() || self.panel_power.is_some() || self.peak_sun_hours.is_some()
    }
}

/// Loads settings, then runs either a single calculation or the interactive menu.
fn main() -> ExitCode {
    let args = Args::parse();
    match try_run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(args: Args) -> Result<ExitCode, AppError> {
    let (mut cfg, origin) = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load_or_default()?,
    };
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    logging::init(&cfg.log_level);
    info!(path = %config_path.display(), origin = origin.as_str(), "config ready");

    let mut tr = cfg.translator(&args.lang);
    let mut con = Console::stdio();

    if args.is_one_shot() {
        let input = EstimationInput::new(
            args.consumption.unwrap_or_default(),
            args.period.unwrap_or(cfg.default_period),
            args.panel_power.unwrap_or_default(),
            args.peak_sun_hours.unwrap_or_default(),
        );
        let valid = ui_cli::print_outcome(&mut con, &tr, &solar::estimate(&input), args.verbose)?;
        return Ok(if valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(2)
        });
    }

    app::run(&mut con, &mut cfg, &config_path, &mut tr, args.verbose)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_alone_is_rejected() {
        let err = Args::try_parse_from(["solar_panel_calculator_cli", "--period", "monthly"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn period_with_numeric_flags_is_one_shot() {
        let args = Args::try_parse_from([
            "solar_panel_calculator_cli",
            "--period",
            "mensual",
            "--consumption",
            "300",
        ])
        .unwrap();
        assert!(args.is_one_shot());
        assert_eq!(args.period, Some(BillingPeriod::Monthly));
        assert!(args.config.is_none());
    }

    #[test]
    fn no_flags_starts_the_menu() {
        let args = Args::try_parse_from(["solar_panel_calculator_cli"]).unwrap();
        assert!(!args.is_one_shot());
    }
}
