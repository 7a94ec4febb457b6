//! Code for reading the scenario parameters for a run.
//!
//! Parameters come from an optional `scenario.toml` file in the model directory, any of which can
//! be overridden (e.g. from the command line). Parameters which are not given take their default
//! values.
use super::*;
use crate::fuel::FuelOptionID;
use crate::id::IDCollection;
use crate::scenario::{
    DEFAULT_AMORTIZATION_YEARS, DEFAULT_ELECTRICITY_PRICE, DEFAULT_INTEREST_RATE, Scenario,
    ScenarioFeatures,
};
use crate::units::{Dimensionless, MoneyPerKilowattHour, MoneyPerSquareFootPerYear, MoneyPerTonne};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const SCENARIO_FILE_NAME: &str = "scenario.toml";

/// Scenario parameters as given by the user, before defaults are applied
#[derive(Debug, Deserialize, PartialEq, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioRaw {
    /// Carbon tax ($/tonne CO2)
    pub carbon_tax: Option<MoneyPerTonne>,
    /// Period over which capital costs are amortized
    pub amortization_years: Option<u32>,
    /// Yearly interest rate for amortization
    pub interest_rate: Option<Dimensionless>,
    /// Electricity price ($/kWh)
    pub electricity_price: Option<MoneyPerKilowattHour>,
    /// Proportion of fuel converted to heat by mechanical systems
    pub boiler_efficiency: Option<Dimensionless>,
    /// Building energy efficiency relative to the district average
    pub building_efficiency: Option<Dimensionless>,
    /// Proportional change in mechanical system cost
    pub boiler_cost_change: Option<Dimensionless>,
    /// Flat cost of building efficiency improvements
    pub efficiency_surcharge: Option<MoneyPerSquareFootPerYear>,
    /// The fuel options to include in the results, in order
    pub fuel_options: Option<Vec<String>>,
    /// Fuel-option-specific efficiency surcharges
    #[serde(default)]
    pub efficiency_surcharge_by_fuel: IndexMap<String, MoneyPerSquareFootPerYear>,
}

impl ScenarioRaw {
    /// Read scenario parameters from the model directory.
    ///
    /// The scenario file is optional. If it is absent, all parameters are unset.
    pub fn from_path(model_dir: &Path) -> Result<Self> {
        let file_path = model_dir.join(SCENARIO_FILE_NAME);
        if !file_path.is_file() {
            return Ok(Self::default());
        }

        read_toml(&file_path)
    }

    /// Override parameters with those set in `overrides`
    pub fn merge(mut self, overrides: ScenarioRaw) -> Self {
        macro_rules! merge_fields {
            ($($field:ident),*) => {
                $(
                    if overrides.$field.is_some() {
                        self.$field = overrides.$field;
                    }
                )*
            };
        }

        merge_fields!(
            carbon_tax,
            amortization_years,
            interest_rate,
            electricity_price,
            boiler_efficiency,
            building_efficiency,
            boiler_cost_change,
            efficiency_surcharge,
            fuel_options
        );
        self.efficiency_surcharge_by_fuel
            .extend(overrides.efficiency_surcharge_by_fuel);

        self
    }

    /// Warn about any parameters which will have no effect with the given features
    fn warn_unused(&self, features: ScenarioFeatures) {
        if !features.includes_electricity_price() && self.electricity_price.is_some() {
            warn!("electricity_price is ignored when features = \"{features}\"");
        }

        if !features.includes_efficiency() {
            let unused = [
                ("boiler_efficiency", self.boiler_efficiency.is_some()),
                ("building_efficiency", self.building_efficiency.is_some()),
                ("boiler_cost_change", self.boiler_cost_change.is_some()),
                ("efficiency_surcharge", self.efficiency_surcharge.is_some()),
                (
                    "efficiency_surcharge_by_fuel",
                    !self.efficiency_surcharge_by_fuel.is_empty(),
                ),
            ];
            for (name, is_set) in unused {
                if is_set {
                    warn!("{name} is ignored when features = \"{features}\"");
                }
            }
        }
    }

    /// Apply defaults and check the parameters against the model
    fn into_scenario(self, model: &Model) -> Result<Scenario> {
        let features = model.parameters.features;
        self.warn_unused(features);

        let fuel_options = match self.fuel_options {
            Some(ids) => get_fuel_option_selection(model, &ids)?,
            None => model.fuel_options.keys().cloned().collect(),
        };
        let efficiency_surcharge_by_fuel: IndexMap<_, _> = self
            .efficiency_surcharge_by_fuel
            .into_iter()
            .map(|(id, surcharge)| -> Result<_> {
                let id = model
                    .fuel_options
                    .get_id(&id)
                    .context("Invalid fuel option in efficiency_surcharge_by_fuel")?;
                Ok((id, surcharge))
            })
            .try_collect()?;

        let scenario = Scenario {
            features,
            carbon_tax: self
                .carbon_tax
                .unwrap_or(model.parameters.carbon_tax_baseline),
            amortization_years: self.amortization_years.unwrap_or(DEFAULT_AMORTIZATION_YEARS),
            interest_rate: self.interest_rate.unwrap_or(DEFAULT_INTEREST_RATE),
            electricity_price: self.electricity_price.unwrap_or(DEFAULT_ELECTRICITY_PRICE),
            boiler_efficiency: self.boiler_efficiency.unwrap_or(Dimensionless(1.0)),
            building_efficiency: self.building_efficiency.unwrap_or(Dimensionless(0.0)),
            boiler_cost_change: self.boiler_cost_change.unwrap_or(Dimensionless(0.0)),
            efficiency_surcharge: self
                .efficiency_surcharge
                .unwrap_or(MoneyPerSquareFootPerYear(0.0)),
            fuel_options,
            efficiency_surcharge_by_fuel,
        };
        scenario.validate()?;

        Ok(scenario)
    }
}

/// Check the user's selection of fuel options
fn get_fuel_option_selection(model: &Model, ids: &[String]) -> Result<Vec<FuelOptionID>> {
    let mut selection = Vec::with_capacity(ids.len());
    for id in ids {
        let id = model
            .fuel_options
            .get_id(id)
            .context("Invalid fuel option in fuel_options")?;
        ensure!(
            !selection.contains(&id),
            "Fuel option {id} selected more than once"
        );
        selection.push(id);
    }

    Ok(selection)
}

/// Read the scenario for a run.
///
/// # Arguments
///
/// * `model` - The model the scenario applies to
/// * `overrides` - Parameters which take precedence over those in the scenario file
///
/// # Returns
///
/// The fully resolved scenario or an error if any parameter is invalid
pub fn read_scenario(model: &Model, overrides: ScenarioRaw) -> Result<Scenario> {
    ScenarioRaw::from_path(&model.model_path)?
        .merge(overrides)
        .into_scenario(model)
        .with_context(|| format!("Invalid scenario for model at {}", model.model_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, model};
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Parse scenario parameters from a TOML string
    fn parse(contents: &str) -> ScenarioRaw {
        toml::from_str(contents).unwrap()
    }

    #[test]
    fn test_scenario_raw_from_path() {
        let dir = tempdir().unwrap();

        // Scenario file is optional
        assert_eq!(
            ScenarioRaw::from_path(dir.path()).unwrap(),
            ScenarioRaw::default()
        );

        {
            let mut file = File::create(dir.path().join(SCENARIO_FILE_NAME)).unwrap();
            writeln!(
                file,
                "carbon_tax = 130\nfuel_options = [\"er\"]\n\n[efficiency_surcharge_by_fuel]\nng = 1.5"
            )
            .unwrap();
        }
        let raw = ScenarioRaw::from_path(dir.path()).unwrap();
        assert_eq!(raw.carbon_tax, Some(MoneyPerTonne(130.0)));
        assert_eq!(raw.fuel_options, Some(vec!["er".to_string()]));
        assert_eq!(
            raw.efficiency_surcharge_by_fuel["ng"],
            MoneyPerSquareFootPerYear(1.5)
        );
    }

    #[test]
    fn test_scenario_raw_unknown_field() {
        assert!(toml::from_str::<ScenarioRaw>("milestone_years = [2020]").is_err());
    }

    #[test]
    fn test_merge() {
        let base = parse("carbon_tax = 130\ninterest_rate = 0.05\n[efficiency_surcharge_by_fuel]\nng = 1.0");
        let overrides = parse("carbon_tax = 200\n[efficiency_surcharge_by_fuel]\ner = 2.0");
        let merged = base.merge(overrides);
        assert_eq!(merged.carbon_tax, Some(MoneyPerTonne(200.0)));
        assert_eq!(merged.interest_rate, Some(Dimensionless(0.05)));
        assert_eq!(merged.amortization_years, None);
        assert_eq!(merged.efficiency_surcharge_by_fuel.len(), 2);
    }

    #[rstest]
    fn test_into_scenario_defaults(model: Model) {
        let scenario = ScenarioRaw::default().into_scenario(&model).unwrap();
        assert_eq!(scenario.features, model.parameters.features);
        assert_eq!(scenario.carbon_tax, model.parameters.carbon_tax_baseline);
        assert_eq!(scenario.amortization_years, DEFAULT_AMORTIZATION_YEARS);
        assert_eq!(scenario.interest_rate, DEFAULT_INTEREST_RATE);
        assert_eq!(scenario.electricity_price, DEFAULT_ELECTRICITY_PRICE);
        assert_eq!(scenario.boiler_efficiency, Dimensionless(1.0));
        assert_eq!(scenario.building_efficiency, Dimensionless(0.0));
        assert_eq!(scenario.boiler_cost_change, Dimensionless(0.0));
        assert_eq!(scenario.efficiency_surcharge, MoneyPerSquareFootPerYear(0.0));
        assert!(scenario.efficiency_surcharge_by_fuel.is_empty());

        // All fuel options are selected by default, in model order
        assert_eq!(
            scenario.fuel_options,
            model.fuel_options.keys().cloned().collect_vec()
        );
    }

    #[rstest]
    fn test_into_scenario_selection(model: Model) {
        let raw = parse("fuel_options = [\"er\", \"ng\"]\n[efficiency_surcharge_by_fuel]\ner = 0.5");
        let scenario = raw.into_scenario(&model).unwrap();
        assert_eq!(
            scenario.fuel_options,
            [FuelOptionID::from("er"), FuelOptionID::from("ng")]
        );
        assert_eq!(
            scenario.efficiency_surcharge_for(&"er".into()),
            MoneyPerSquareFootPerYear(0.5)
        );
    }

    #[rstest]
    #[case("fuel_options = [\"coal\"]", "Invalid fuel option in fuel_options")]
    #[case("fuel_options = [\"er\", \"er\"]", "Fuel option er selected more than once")]
    #[case(
        "[efficiency_surcharge_by_fuel]\ncoal = 1.0",
        "Invalid fuel option in efficiency_surcharge_by_fuel"
    )]
    #[case("fuel_options = []", "At least one fuel option must be selected")]
    #[case("boiler_efficiency = 0.2", "boiler_efficiency must be between 0.5 and 1")]
    #[case(
        "interest_rate = -0.01",
        "interest_rate must be a finite number greater than or equal to zero"
    )]
    fn test_into_scenario_invalid(model: Model, #[case] contents: &str, #[case] msg: &str) {
        assert_error!(parse(contents).into_scenario(&model), msg);
    }

    #[rstest]
    fn test_read_scenario(model: Model) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(SCENARIO_FILE_NAME)).unwrap();
            writeln!(file, "carbon_tax = 130\namortization_years = 10").unwrap();
        }
        let model = Model {
            model_path: dir.path().to_path_buf(),
            ..model
        };

        let overrides = ScenarioRaw {
            amortization_years: Some(25),
            ..ScenarioRaw::default()
        };
        let scenario = read_scenario(&model, overrides).unwrap();
        assert_eq!(scenario.carbon_tax, MoneyPerTonne(130.0));
        assert_eq!(scenario.amortization_years, 25);
    }

    #[rstest]
    fn test_read_scenario_invalid(model: Model) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(SCENARIO_FILE_NAME)).unwrap();
            writeln!(file, "carbon_tax = -1").unwrap();
        }
        let model = Model {
            model_path: dir.path().to_path_buf(),
            ..model
        };
        assert!(read_scenario(&model, ScenarioRaw::default()).is_err());
    }
}
