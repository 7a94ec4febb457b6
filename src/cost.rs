//! Calculation of the yearly heating cost of each fuel option for each building typology.
//!
//! All costs are per square foot of floor area per year. Capital costs are amortized over the
//! scenario's amortization period and fuel costs are scaled from each typology's base fuel cost.
use crate::finance::amortized_cost_per_area;
use crate::fuel::{FuelOption, FuelOptionID, fuel_cost_per_area};
use crate::model::Model;
use crate::scenario::Scenario;
use crate::typology::{Typology, TypologyID};
use crate::units::{Dimensionless, MoneyPerEnergy, MoneyPerSquareFootPerYear};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::debug;

/// The yearly cost of heating a typology with a fuel option, broken down by component
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CostBreakdown {
    /// Amortized mechanical system cost
    pub mechanical: MoneyPerSquareFootPerYear,
    /// Amortized electrical work cost
    pub electrical: MoneyPerSquareFootPerYear,
    /// Fuel cost
    pub fuel: MoneyPerSquareFootPerYear,
    /// Efficiency surcharge
    pub efficiency: MoneyPerSquareFootPerYear,
    /// Sum of the above
    pub total: MoneyPerSquareFootPerYear,
}

impl CostBreakdown {
    /// Create a new breakdown, computing the total from the components
    pub fn new(
        mechanical: MoneyPerSquareFootPerYear,
        electrical: MoneyPerSquareFootPerYear,
        fuel: MoneyPerSquareFootPerYear,
        efficiency: MoneyPerSquareFootPerYear,
    ) -> Self {
        Self {
            mechanical,
            electrical,
            fuel,
            efficiency,
            total: mechanical + electrical + fuel + efficiency,
        }
    }

    /// Check that every component is finite and non-negative
    fn validate(&self) -> Result<()> {
        let components = [
            ("mechanical", self.mechanical),
            ("electrical", self.electrical),
            ("fuel", self.fuel),
            ("efficiency", self.efficiency),
            ("total", self.total),
        ];
        for (name, value) in components {
            ensure!(
                value.is_finite() && value >= MoneyPerSquareFootPerYear(0.0),
                "{name} cost is negative or not finite ({value})"
            );
        }

        Ok(())
    }
}

/// Costs of one fuel option across all typologies
#[derive(PartialEq, Debug, Clone)]
pub struct FuelOptionCosts {
    /// The energy price rate used, including carbon tax
    pub price_rate: MoneyPerEnergy,
    /// Cost breakdown for each typology, in model order
    pub typologies: IndexMap<TypologyID, CostBreakdown>,
    /// Mean total cost across typologies
    pub mean_total: MoneyPerSquareFootPerYear,
    /// Highest total cost across typologies
    pub max_total: MoneyPerSquareFootPerYear,
}

/// The full table of costs for a scenario
#[derive(PartialEq, Debug, Clone)]
pub struct CostTable {
    /// Costs for each selected fuel option, in selection order
    pub fuel_options: IndexMap<FuelOptionID, FuelOptionCosts>,
    /// Upper limit for a shared cost axis: the highest total cost plus a margin
    pub y_axis_max: MoneyPerSquareFootPerYear,
}

impl CostTable {
    /// Iterate over every (typology, fuel option, costs) entry
    pub fn iter(&self) -> impl Iterator<Item = (&TypologyID, &FuelOptionID, &CostBreakdown)> {
        self.fuel_options.iter().flat_map(|(fuel_option_id, costs)| {
            costs
                .typologies
                .iter()
                .map(move |(typology_id, breakdown)| (typology_id, fuel_option_id, breakdown))
        })
    }
}

/// Calculate the cost of heating a single typology with a single fuel option
pub fn calculate_cost(
    typology: &Typology,
    fuel_option: &FuelOption,
    price_rate: MoneyPerEnergy,
    model: &Model,
    scenario: &Scenario,
) -> Result<CostBreakdown> {
    let capital_costs = typology.capital_costs_for(&fuel_option.id)?;
    let amortize = |principal| {
        amortized_cost_per_area(
            principal,
            scenario.amortization_years,
            scenario.interest_rate,
            typology.floor_area,
        )
    };

    let costs = CostBreakdown::new(
        amortize(capital_costs.mechanical * scenario.mechanical_cost_factor()),
        amortize(capital_costs.electrical),
        fuel_cost_per_area(
            typology.base_fuel_cost_per_area(),
            price_rate,
            model.parameters.reference_price_rate,
            fuel_option.cop,
            scenario.efficiency_factor(),
        ),
        scenario.efficiency_surcharge_for(&fuel_option.id),
    );
    costs.validate().with_context(|| {
        format!(
            "Invalid cost for typology {} with fuel option {}",
            typology.id, fuel_option.id
        )
    })?;

    Ok(costs)
}

/// Calculate the costs of all the scenario's fuel options for every typology in the model.
///
/// # Arguments
///
/// * `model` - The model
/// * `scenario` - Scenario parameters, which must have been validated against the model
///
/// # Returns
///
/// The full cost table or an error if any cost could not be calculated
pub fn calculate_costs(model: &Model, scenario: &Scenario) -> Result<CostTable> {
    ensure!(!model.typologies.is_empty(), "Model has no typologies");

    let mut fuel_options = IndexMap::new();
    for fuel_option in model.iter_fuel_options(&scenario.fuel_options) {
        let price_rate = fuel_option.carbon_adjusted_price_rate(&model.parameters, scenario)?;
        debug!("Price rate for {}: {price_rate}", fuel_option.id);

        let typologies = model
            .typologies
            .values()
            .map(|typology| {
                let costs = calculate_cost(typology, fuel_option, price_rate, model, scenario)?;
                Ok((typology.id.clone(), costs))
            })
            .collect::<Result<IndexMap<_, _>>>()?;
        let totals = typologies.values().map(|costs| costs.total);

        fuel_options.insert(
            fuel_option.id.clone(),
            FuelOptionCosts {
                price_rate,
                mean_total: mean(totals.clone()),
                max_total: max(totals),
                typologies,
            },
        );
    }
    ensure!(!fuel_options.is_empty(), "No fuel options selected");

    let y_axis_max = max(fuel_options.values().map(|costs| costs.max_total))
        + model.parameters.y_axis_margin;

    Ok(CostTable {
        fuel_options,
        y_axis_max,
    })
}

/// The arithmetic mean of a non-empty set of costs
#[allow(clippy::cast_precision_loss)]
fn mean<I>(costs: I) -> MoneyPerSquareFootPerYear
where
    I: ExactSizeIterator<Item = MoneyPerSquareFootPerYear>,
{
    let count = costs.len();
    costs.sum::<MoneyPerSquareFootPerYear>() / Dimensionless(count as f64)
}

/// The largest of a set of non-negative costs (zero if empty)
fn max<I>(costs: I) -> MoneyPerSquareFootPerYear
where
    I: Iterator<Item = MoneyPerSquareFootPerYear>,
{
    costs.fold(MoneyPerSquareFootPerYear(0.0), |max, cost| {
        if cost > max { cost } else { max }
    })
}
