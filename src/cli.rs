//! The command line interface for the program.
use crate::cost::calculate_costs;
use crate::input::load_model;
use crate::input::scenario::{ScenarioRaw, read_scenario};
use crate::log;
use crate::model::Model;
use crate::output::{create_output_directory, get_output_dir, write_results};
use crate::scenario::Scenario;
use crate::settings::Settings;
use crate::units::{Dimensionless, MoneyPerKilowattHour, MoneyPerSquareFootPerYear, MoneyPerTonne};
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Scenario parameters which override those in the model's `scenario.toml`
#[derive(Args, Clone, Default)]
pub struct ScenarioOpts {
    /// Carbon tax ($/tonne CO2)
    #[arg(long)]
    pub carbon_tax: Option<f64>,
    /// Period over which capital costs are amortized (years)
    #[arg(long)]
    pub amortization_years: Option<u32>,
    /// Yearly interest rate for amortization (e.g. 0.03 for 3%)
    #[arg(long)]
    pub interest_rate: Option<f64>,
    /// Electricity price ($/kWh)
    #[arg(long)]
    pub electricity_price: Option<f64>,
    /// Boiler efficiency (between 0.5 and 1)
    #[arg(long)]
    pub boiler_efficiency: Option<f64>,
    /// Building efficiency relative to the district average (between -0.5 and 1)
    #[arg(long, allow_negative_numbers = true)]
    pub building_efficiency: Option<f64>,
    /// Proportional change in mechanical system cost (e.g. -0.1 for 10% cheaper)
    #[arg(long, allow_negative_numbers = true)]
    pub boiler_cost_change: Option<f64>,
    /// Cost of building efficiency improvements ($/sf/year)
    #[arg(long)]
    pub efficiency_surcharge: Option<f64>,
    /// Efficiency surcharge for a single fuel option, as FUEL_OPTION=VALUE (can be repeated)
    #[arg(long, value_parser = parse_fuel_option_value)]
    pub efficiency_surcharge_by_fuel: Vec<(String, f64)>,
    /// Comma-separated list of fuel options to include, in order
    #[arg(long, value_delimiter = ',')]
    pub fuel_options: Option<Vec<String>>,
}

impl From<ScenarioOpts> for ScenarioRaw {
    fn from(opts: ScenarioOpts) -> Self {
        Self {
            carbon_tax: opts.carbon_tax.map(MoneyPerTonne),
            amortization_years: opts.amortization_years,
            interest_rate: opts.interest_rate.map(Dimensionless),
            electricity_price: opts.electricity_price.map(MoneyPerKilowattHour),
            boiler_efficiency: opts.boiler_efficiency.map(Dimensionless),
            building_efficiency: opts.building_efficiency.map(Dimensionless),
            boiler_cost_change: opts.boiler_cost_change.map(Dimensionless),
            efficiency_surcharge: opts.efficiency_surcharge.map(MoneyPerSquareFootPerYear),
            fuel_options: opts.fuel_options,
            efficiency_surcharge_by_fuel: opts
                .efficiency_surcharge_by_fuel
                .into_iter()
                .map(|(id, value)| (id, MoneyPerSquareFootPerYear(value)))
                .collect::<IndexMap<_, _>>(),
        }
    }
}

/// Parse an argument of the form `FUEL_OPTION=VALUE`
fn parse_fuel_option_value(arg: &str) -> Result<(String, f64)> {
    let (id, value) = arg
        .split_once('=')
        .context("Expected an argument of the form FUEL_OPTION=VALUE")?;
    let value = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value: {value}"))?;

    Ok((id.trim().to_string(), value))
}

/// Options for the run command
#[derive(Args, Clone, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Scenario parameters
    #[command(flatten)]
    pub scenario: ScenarioOpts,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Calculate heating costs for a model.
    Run {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example models.
    Example {
        /// The available subcommands for managing example models.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a model and its scenario.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
    /// Manage program settings.
    Settings {
        /// The available subcommands for managing settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ heatcost --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help in markdown format
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(model_path)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(Some(settings.log_level.as_str()), Some(output_path))
        .context("Failed to initialise logging.")?;

    // Load the model and the scenario to calculate costs for
    let model = load_model(model_path).context("Failed to load model.")?;
    info!("Loaded model from {}", model_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let scenario = read_scenario(&model, opts.scenario.clone().into())
        .context("Failed to load scenario.")?;
    log_scenario(&scenario);

    let table = calculate_costs(&model, &scenario)?;
    write_results(output_path, &model, &scenario, &table)?;

    for (id, costs) in &table.fuel_options {
        info!(
            "{}: mean total {:.2} $/sf/year, max total {:.2} $/sf/year",
            model.fuel_options[id].label, costs.mean_total, costs.max_total
        );
    }
    info!("Y-axis maximum: {:.2} $/sf/year", table.y_axis_max);
    info!("Cost calculation complete!");

    Ok(())
}

/// Log the scenario parameters which are in effect
fn log_scenario(scenario: &Scenario) {
    info!("Scenario features: {}", scenario.features);
    info!(
        "Carbon tax: {} $/t; amortization: {} years at {}",
        scenario.carbon_tax, scenario.amortization_years, scenario.interest_rate
    );
    if scenario.features.includes_electricity_price() {
        info!("Electricity price: {} $/kWh", scenario.electricity_price);
    }
    if scenario.features.includes_efficiency() {
        info!(
            "Boiler efficiency: {}; building efficiency: {}; boiler cost change: {}",
            scenario.boiler_efficiency, scenario.building_efficiency, scenario.boiler_cost_change
        );
    }
}

/// Load a model and its scenario, checking that they are valid
fn load_and_validate(model_path: &Path) -> Result<(Model, Scenario)> {
    let model = load_model(model_path).context("Failed to validate model.")?;
    let scenario =
        read_scenario(&model, ScenarioRaw::default()).context("Failed to validate scenario.")?;

    Ok((model, scenario))
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    let (model, scenario) = load_and_validate(model_path)?;
    info!(
        "Model validation successful! ({} fuel options, {} selected; {} typologies)",
        model.fuel_options.len(),
        scenario.fuel_options.len(),
        model.typologies.len()
    );

    Ok(())
}
