//! The module responsible for writing output data to disk.
use crate::cost::CostTable;
use crate::fuel::FuelOptionID;
use crate::model::Model;
use crate::scenario::Scenario;
use crate::typology::TypologyID;
use crate::units::{MoneyPerEnergy, MoneyPerSquareFootPerYear};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "heatcost_results";

/// The output file name for the cost table
const COSTS_FILE_NAME: &str = "costs.csv";

/// The output file name for per-fuel-option statistics
const FUEL_OPTION_SUMMARY_FILE_NAME: &str = "fuel_option_summary.csv";

/// The output file name for chart settings
const CHART_FILE_NAME: &str = "chart.toml";

/// Get the default output directory for the model in the specified directory
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model.
///
/// If the directory already contains files, they are deleted if `allow_overwrite` is true and an
/// error is returned otherwise.
///
/// # Returns
///
/// True if existing output is being overwritten, false otherwise
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut entries) = fs::read_dir(output_dir) {
        if entries.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace it."
        );
        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the costs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CostRow {
    typology: TypologyID,
    fuel_option: FuelOptionID,
    mechanical: MoneyPerSquareFootPerYear,
    electrical: MoneyPerSquareFootPerYear,
    fuel: MoneyPerSquareFootPerYear,
    efficiency: MoneyPerSquareFootPerYear,
    total: MoneyPerSquareFootPerYear,
}

/// Represents a row in the fuel option summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct FuelOptionSummaryRow {
    fuel_option: FuelOptionID,
    label: String,
    colour: String,
    price_rate: MoneyPerEnergy,
    mean_total: MoneyPerSquareFootPerYear,
    max_total: MoneyPerSquareFootPerYear,
}

/// The contents of the chart settings file
#[derive(Serialize)]
struct ChartSettings<'a> {
    /// Upper limit for the shared cost axis
    y_axis_max: MoneyPerSquareFootPerYear,
    /// The scenario the costs were calculated for
    scenario: &'a Scenario,
}

/// Write the cost table in long format: one row per typology and fuel option
fn write_costs(output_path: &Path, table: &CostTable) -> Result<()> {
    let file_path = output_path.join(COSTS_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for (typology_id, fuel_option_id, costs) in table.iter() {
        writer.serialize(CostRow {
            typology: typology_id.clone(),
            fuel_option: fuel_option_id.clone(),
            mechanical: costs.mechanical,
            electrical: costs.electrical,
            fuel: costs.fuel,
            efficiency: costs.efficiency,
            total: costs.total,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the statistics and display information for each fuel option
fn write_fuel_option_summary(output_path: &Path, model: &Model, table: &CostTable) -> Result<()> {
    let file_path = output_path.join(FUEL_OPTION_SUMMARY_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for (id, costs) in &table.fuel_options {
        let fuel_option = &model.fuel_options[id];
        writer.serialize(FuelOptionSummaryRow {
            fuel_option: id.clone(),
            label: fuel_option.label.clone(),
            colour: fuel_option.colour.clone(),
            price_rate: costs.price_rate,
            mean_total: costs.mean_total,
            max_total: costs.max_total,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the chart settings in TOML format
fn write_chart_settings(output_path: &Path, scenario: &Scenario, table: &CostTable) -> Result<()> {
    let chart = ChartSettings {
        y_axis_max: table.y_axis_max,
        scenario,
    };
    let file_path = output_path.join(CHART_FILE_NAME);
    fs::write(&file_path, toml::to_string(&chart)?)?;

    Ok(())
}

/// Write all results of a run to the output directory
pub fn write_results(
    output_path: &Path,
    model: &Model,
    scenario: &Scenario,
    table: &CostTable,
) -> Result<()> {
    write_metadata(output_path, &model.model_path).context("Failed to save metadata")?;
    write_costs(output_path, table).context("Failed to write cost table")?;
    write_fuel_option_summary(output_path, model, table)
        .context("Failed to write fuel option summary")?;
    write_chart_settings(output_path, scenario, table)
        .context("Failed to write chart settings")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::calculate_costs;
    use crate::fixture::{model, scenario};
    use itertools::Itertools;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_costs(model: Model, scenario: Scenario) {
        let table = calculate_costs(&model, &scenario).unwrap();
        let dir = tempdir().unwrap();
        write_costs(dir.path(), &table).unwrap();

        // Read back and compare
        let records: Vec<CostRow> = csv::Reader::from_path(dir.path().join(COSTS_FILE_NAME))
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(
            records
                .iter()
                .map(|row| format!("{}/{}", row.typology, row.fuel_option))
                .collect_vec(),
            ["Office/ng", "School/ng", "Office/er", "School/er"]
        );

        let costs = table.fuel_options["er"].typologies["Office"];
        assert_eq!(
            records[2],
            CostRow {
                typology: "Office".into(),
                fuel_option: "er".into(),
                mechanical: costs.mechanical,
                electrical: costs.electrical,
                fuel: costs.fuel,
                efficiency: costs.efficiency,
                total: costs.total,
            }
        );
    }

    #[rstest]
    fn test_write_fuel_option_summary(model: Model, scenario: Scenario) {
        let table = calculate_costs(&model, &scenario).unwrap();
        let dir = tempdir().unwrap();
        write_fuel_option_summary(dir.path(), &model, &table).unwrap();

        let records: Vec<FuelOptionSummaryRow> =
            csv::Reader::from_path(dir.path().join(FUEL_OPTION_SUMMARY_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fuel_option.to_string(), "er");
        assert_eq!(records[1].label, "Electrical Resistance");
        assert_eq!(records[1].colour, "#FBAF3F");
        assert_eq!(records[1].max_total, table.fuel_options["er"].max_total);
    }

    #[rstest]
    fn test_write_chart_settings(model: Model, scenario: Scenario) {
        let table = calculate_costs(&model, &scenario).unwrap();
        let dir = tempdir().unwrap();
        write_chart_settings(dir.path(), &scenario, &table).unwrap();

        let contents = fs::read_to_string(dir.path().join(CHART_FILE_NAME)).unwrap();
        let chart: toml::Table = toml::from_str(&contents).unwrap();
        assert_eq!(
            chart["y_axis_max"].as_float(),
            Some(table.y_axis_max.value())
        );
        assert_eq!(chart["scenario"]["features"].as_str(), Some("efficiency"));
        assert_eq!(chart["scenario"]["amortization_years"].as_integer(), Some(20));
    }

    #[rstest]
    fn test_write_results(model: Model, scenario: Scenario) {
        let table = calculate_costs(&model, &scenario).unwrap();
        let dir = tempdir().unwrap();
        write_results(dir.path(), &model, &scenario, &table).unwrap();
        for file_name in [
            COSTS_FILE_NAME,
            FUEL_OPTION_SUMMARY_FILE_NAME,
            CHART_FILE_NAME,
            "metadata.toml",
        ] {
            assert!(dir.path().join(file_name).is_file());
        }
    }

    #[test]
    fn test_create_output_directory_new() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results").join("model");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Empty folder can be reused
        assert!(!create_output_directory(&output_dir, false).unwrap());
    }

    #[test]
    fn test_create_output_directory_overwrite() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("model");
        fs::create_dir(&output_dir).unwrap();
        fs::write(output_dir.join(COSTS_FILE_NAME), "old").unwrap();

        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(output_dir.is_dir());
        assert!(!output_dir.join(COSTS_FILE_NAME).exists());
    }

    #[test]
    fn test_get_output_dir() {
        let dir = tempdir().unwrap();
        let model_dir = dir.path().join("toronto");
        fs::create_dir(&model_dir).unwrap();
        assert_eq!(
            get_output_dir(&model_dir).unwrap(),
            PathBuf::from("heatcost_results/toronto")
        );

        // Model must exist
        assert!(get_output_dir(&dir.path().join("missing")).is_err());
    }
}
