//! Code for reading building typologies from a CSV file.
//!
//! Besides the fixed columns, the file has a mechanical and an electrical capital cost column for
//! every fuel option, named `{fuel_option_id}_mech_cost` and `{fuel_option_id}_elec_cost`.
use super::*;
use crate::fuel::{FuelOptionID, FuelOptionMap};
use crate::id::IDCollection;
use crate::typology::{CapitalCosts, Typology, TypologyMap};
use crate::units::{Money, MoneyPerYear, SquareFeet};
use anyhow::bail;
use csv::StringRecord;
use serde::Deserialize;
use std::path::Path;

const TYPOLOGIES_FILE_NAME: &str = "typologies.csv";

/// The columns which every typologies file has
const FIXED_COLUMNS: [&str; 3] = ["typology_name", "typology_sf", "base_fuel_cost"];

const MECHANICAL_COST_SUFFIX: &str = "_mech_cost";
const ELECTRICAL_COST_SUFFIX: &str = "_elec_cost";

/// The fixed columns of a row of the typologies file
#[derive(Debug, Deserialize, PartialEq)]
struct TypologyRaw {
    typology_name: String,
    typology_sf: SquareFeet,
    base_fuel_cost: MoneyPerYear,
}

/// The positions of the capital cost columns for one fuel option
#[derive(Debug, PartialEq)]
struct CapitalCostColumns {
    mechanical: usize,
    electrical: usize,
}

/// Read typologies from the typologies CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `fuel_options` - The model's fuel options
///
/// # Returns
///
/// A map of typologies, in the order given in the file, or an error
pub fn read_typologies(model_dir: &Path, fuel_options: &FuelOptionMap) -> Result<TypologyMap> {
    let file_path = model_dir.join(TYPOLOGIES_FILE_NAME);
    read_typologies_from_file(&file_path, fuel_options).with_context(|| input_err_msg(&file_path))
}

fn read_typologies_from_file(file_path: &Path, fuel_options: &FuelOptionMap) -> Result<TypologyMap> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let headers = reader.headers()?.clone();
    let columns = get_capital_cost_columns(&headers, fuel_options)?;

    let mut typologies = TypologyMap::new();
    for record in reader.records() {
        let typology = read_typology(&record?, &headers, &columns)?;
        let id = typology.id.clone();
        let existing = typologies.insert(id.clone(), typology).is_some();
        ensure!(!existing, "Duplicate typology found: {id}");
    }
    ensure!(!typologies.is_empty(), "No typologies found");

    Ok(typologies)
}

/// Find the capital cost columns for each fuel option.
///
/// Every fuel option must have both columns and there must be no other columns.
fn get_capital_cost_columns(
    headers: &StringRecord,
    fuel_options: &FuelOptionMap,
) -> Result<IndexMap<FuelOptionID, CapitalCostColumns>> {
    let mut mechanical = IndexMap::new();
    let mut electrical = IndexMap::new();
    for (idx, header) in headers.iter().enumerate() {
        let header = header.trim();
        if FIXED_COLUMNS.contains(&header) {
            continue;
        }

        let (columns, id) = if let Some(id) = header.strip_suffix(MECHANICAL_COST_SUFFIX) {
            (&mut mechanical, id)
        } else if let Some(id) = header.strip_suffix(ELECTRICAL_COST_SUFFIX) {
            (&mut electrical, id)
        } else {
            bail!("Unrecognised column: {header}");
        };

        let id = fuel_options
            .get_id(id)
            .with_context(|| format!("Column {header} does not refer to a known fuel option"))?;
        ensure!(
            columns.insert(id, idx).is_none(),
            "Duplicate column: {header}"
        );
    }

    for column in FIXED_COLUMNS {
        ensure!(
            headers.iter().any(|header| header.trim() == column),
            "Missing column: {column}"
        );
    }

    fuel_options
        .keys()
        .map(|id| -> Result<_> {
            let mechanical = *mechanical
                .get(id)
                .with_context(|| format!("Missing column: {id}{MECHANICAL_COST_SUFFIX}"))?;
            let electrical = *electrical
                .get(id)
                .with_context(|| format!("Missing column: {id}{ELECTRICAL_COST_SUFFIX}"))?;
            Ok((
                id.clone(),
                CapitalCostColumns {
                    mechanical,
                    electrical,
                },
            ))
        })
        .try_collect()
}

/// Read a single typology from a row of the CSV file
fn read_typology(
    record: &StringRecord,
    headers: &StringRecord,
    columns: &IndexMap<FuelOptionID, CapitalCostColumns>,
) -> Result<Typology> {
    let raw: TypologyRaw = record.deserialize(Some(headers))?;
    let name = raw.typology_name.trim();
    ensure!(!name.is_empty(), "Typology name cannot be empty");
    ensure!(
        raw.typology_sf.is_finite() && raw.typology_sf > SquareFeet(0.0),
        "Floor area for typology {name} must be a finite number greater than zero"
    );
    ensure!(
        raw.base_fuel_cost.is_finite() && raw.base_fuel_cost >= MoneyPerYear(0.0),
        "Base fuel cost for typology {name} must be a finite number greater than or equal to zero"
    );

    let capital_costs: IndexMap<_, _> = columns
        .iter()
        .map(|(id, columns)| -> Result<_> {
            let costs = CapitalCosts {
                mechanical: parse_capital_cost(record, headers, columns.mechanical)?,
                electrical: parse_capital_cost(record, headers, columns.electrical)?,
            };
            Ok((id.clone(), costs))
        })
        .try_collect()
        .with_context(|| format!("Invalid capital costs for typology {name}"))?;

    Ok(Typology {
        id: name.into(),
        floor_area: raw.typology_sf,
        base_fuel_cost: raw.base_fuel_cost,
        capital_costs,
    })
}

/// Parse the capital cost in the given column
fn parse_capital_cost(record: &StringRecord, headers: &StringRecord, idx: usize) -> Result<Money> {
    let header = &headers[idx];
    let value = record
        .get(idx)
        .with_context(|| format!("Missing value for {header}"))?
        .trim();
    let cost: f64 = value
        .parse()
        .with_context(|| format!("Invalid value for {header}: {value}"))?;
    ensure!(
        cost.is_finite() && cost >= 0.0,
        "{header} must be a finite number greater than or equal to zero"
    );

    Ok(Money(cost))
}
