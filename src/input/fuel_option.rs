//! Code for reading fuel options from a CSV file.
use super::*;
use crate::fuel::{FuelOption, FuelOptionMap};
use crate::units::{Dimensionless, MoneyPerEnergy, TonnesPerEnergy};
use std::path::Path;

const FUEL_OPTIONS_FILE_NAME: &str = "fuel_options.csv";

/// Reads fuel options from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of fuel options, in the order given in the file, or an error
pub fn read_fuel_options(model_dir: &Path) -> Result<FuelOptionMap> {
    let file_path = model_dir.join(FUEL_OPTIONS_FILE_NAME);
    let fuel_options: FuelOptionMap = read_csv_id_file(&file_path)?;
    for fuel_option in fuel_options.values() {
        validate_fuel_option(fuel_option).with_context(|| input_err_msg(&file_path))?;
    }

    Ok(fuel_options)
}

/// Check that the values for a fuel option are valid
fn validate_fuel_option(fuel_option: &FuelOption) -> Result<()> {
    let id = &fuel_option.id;
    ensure!(
        !fuel_option.label.trim().is_empty(),
        "Label for fuel option {id} is empty"
    );
    ensure!(
        fuel_option.price_rate.is_finite() && fuel_option.price_rate >= MoneyPerEnergy(0.0),
        "Price rate for fuel option {id} must be a finite number greater than or equal to zero"
    );
    ensure!(
        fuel_option.tax_rate.is_finite() && fuel_option.tax_rate >= TonnesPerEnergy(0.0),
        "Tax rate for fuel option {id} must be a finite number greater than or equal to zero"
    );
    ensure!(
        fuel_option.cop.is_finite() && fuel_option.cop >= Dimensionless(1.0),
        "COP for fuel option {id} must be a finite number of at least 1"
    );

    Ok(())
}
