//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::input::{deserialise_proportion, input_err_msg, read_toml};
use crate::scenario::ScenarioFeatures;
use crate::units::{
    Dimensionless, EnergyPerKilowattHour, MoneyPerEnergy, MoneyPerSquareFootPerYear, MoneyPerTonne,
};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_unit_param_default!(default_reference_price_rate, MoneyPerEnergy, 44.0);
define_unit_param_default!(default_carbon_tax_baseline, MoneyPerTonne, 30.0);
define_unit_param_default!(default_y_axis_margin, MoneyPerSquareFootPerYear, 2.0);
define_unit_param_default!(default_electricity_conversion, EnergyPerKilowattHour, 0.0036);
define_unit_param_default!(default_hybrid_electricity_fraction, Dimensionless, 0.8);
define_unit_param_default!(default_hybrid_fixed_composition_rate, MoneyPerEnergy, 30.0);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ModelParameters {
    /// Which scenario parameters are taken into account
    #[serde(default)]
    pub features: ScenarioFeatures,
    /// The price rate to which each typology's base fuel cost corresponds
    #[serde(default = "default_reference_price_rate")]
    pub reference_price_rate: MoneyPerEnergy,
    /// The carbon tax already included in price rates
    #[serde(default = "default_carbon_tax_baseline")]
    pub carbon_tax_baseline: MoneyPerTonne,
    /// Headroom added above the highest total cost for the shared y-axis
    #[serde(default = "default_y_axis_margin")]
    pub y_axis_margin: MoneyPerSquareFootPerYear,
    /// Energy per kWh, used to convert an electricity price into a price rate
    #[serde(default = "default_electricity_conversion")]
    pub electricity_conversion: EnergyPerKilowattHour,
    /// Share of a hybrid option's price rate which follows the electricity price
    #[serde(default = "default_hybrid_electricity_fraction")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub hybrid_electricity_fraction: Dimensionless,
    /// Price rate for the non-electric share of a hybrid option (e.g. renewable natural gas plus
    /// delivery)
    #[serde(default = "default_hybrid_fixed_composition_rate")]
    pub hybrid_fixed_composition_rate: MoneyPerEnergy,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            features: ScenarioFeatures::default(),
            reference_price_rate: default_reference_price_rate(),
            carbon_tax_baseline: default_carbon_tax_baseline(),
            y_axis_margin: default_y_axis_margin(),
            electricity_conversion: default_electricity_conversion(),
            hybrid_electricity_fraction: default_hybrid_electricity_fraction(),
            hybrid_fixed_composition_rate: default_hybrid_fixed_composition_rate(),
        }
    }
}

/// Check that the `reference_price_rate` parameter is valid
fn check_reference_price_rate(value: MoneyPerEnergy) -> Result<()> {
    ensure!(
        value.is_finite() && value > MoneyPerEnergy(0.0),
        "reference_price_rate must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that the `carbon_tax_baseline` parameter is valid
fn check_carbon_tax_baseline(value: MoneyPerTonne) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerTonne(0.0),
        "carbon_tax_baseline must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `y_axis_margin` parameter is valid
fn check_y_axis_margin(value: MoneyPerSquareFootPerYear) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerSquareFootPerYear(0.0),
        "y_axis_margin must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `electricity_conversion` parameter is valid
fn check_electricity_conversion(value: EnergyPerKilowattHour) -> Result<()> {
    ensure!(
        value.is_finite() && value > EnergyPerKilowattHour(0.0),
        "electricity_conversion must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that the `hybrid_fixed_composition_rate` parameter is valid
fn check_hybrid_fixed_composition_rate(value: MoneyPerEnergy) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerEnergy(0.0),
        "hybrid_fixed_composition_rate must be a finite number greater than or equal to zero"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_reference_price_rate(self.reference_price_rate)?;
        check_carbon_tax_baseline(self.carbon_tax_baseline)?;
        check_y_axis_margin(self.y_axis_margin)?;
        check_electricity_conversion(self.electricity_conversion)?;

        // hybrid_electricity_fraction already validated with deserialise_proportion

        check_hybrid_fixed_composition_rate(self.hybrid_fixed_composition_rate)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Write a model file with the given contents to a temporary directory and read it back
    fn read_params(contents: &str) -> Result<ModelParameters> {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(file, "{contents}").unwrap();
        }

        ModelParameters::from_path(dir.path())
    }

    #[test]
    fn test_model_params_from_path_defaults() {
        assert_eq!(read_params("").unwrap(), ModelParameters::default());
    }

    #[test]
    fn test_model_params_from_path() {
        let params = read_params(
            "features = \"carbon_tax\"\nreference_price_rate = 40\nhybrid_electricity_fraction = 0.5",
        )
        .unwrap();
        assert_eq!(params.features, ScenarioFeatures::CarbonTax);
        assert_eq!(params.reference_price_rate, MoneyPerEnergy(40.0));
        assert_eq!(params.hybrid_electricity_fraction, Dimensionless(0.5));
        assert_eq!(params.carbon_tax_baseline, MoneyPerTonne(30.0));
    }

    #[rstest]
    #[case("features = \"everything\"")] // Unknown features
    #[case("hybrid_electricity_fraction = 1.5")] // Not a proportion
    #[case("reference_price_rate = 0")] // Would divide by zero
    #[case("electricity_conversion = -1.0")]
    #[case("y_axis_margin = -2.0")]
    #[case("carbon_tax_baseline = -30")]
    #[case("milestone_years = [2020]")] // Unknown field
    fn test_model_params_from_path_invalid(#[case] contents: &str) {
        assert!(read_params(contents).is_err());
    }

    #[test]
    fn test_model_params_missing_file() {
        let dir = tempdir().unwrap();
        assert!(ModelParameters::from_path(dir.path()).is_err());
    }

    #[rstest]
    #[case(44.0, true)]
    #[case(1e-10, true)]
    #[case(0.0, false)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_check_reference_price_rate(#[case] value: f64, #[case] expected_valid: bool) {
        let result = check_reference_price_rate(MoneyPerEnergy(value));
        assert_eq!(result.is_ok(), expected_valid);
        if !expected_valid {
            assert_eq!(
                result.unwrap_err().to_string(),
                "reference_price_rate must be a finite number greater than zero"
            );
        }
    }
}
