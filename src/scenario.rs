//! Scenario parameters: the user-adjustable inputs to the cost calculation.
//!
//! A scenario is resolved once per run from `scenario.toml` and any command-line overrides. Which
//! parameters take effect depends on the model's [`ScenarioFeatures`].
use crate::fuel::FuelOptionID;
use crate::units::{Dimensionless, MoneyPerKilowattHour, MoneyPerSquareFootPerYear, MoneyPerTonne};
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use serde::Serialize;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// The default amortization period in years
pub const DEFAULT_AMORTIZATION_YEARS: u32 = 20;

/// The default yearly interest rate
pub const DEFAULT_INTEREST_RATE: Dimensionless = Dimensionless(0.03);

/// The default electricity price ($/kWh), equivalent to the default reference price rate
pub const DEFAULT_ELECTRICITY_PRICE: MoneyPerKilowattHour = MoneyPerKilowattHour(0.1584);

/// The allowed range for boiler efficiency
const BOILER_EFFICIENCY_RANGE: std::ops::RangeInclusive<f64> = 0.5..=1.0;

/// The allowed range for building efficiency relative to the district average
const BUILDING_EFFICIENCY_RANGE: std::ops::RangeInclusive<f64> = -0.5..=1.0;

/// The lowest allowed change in mechanical system cost
const MIN_BOILER_COST_CHANGE: f64 = -0.99;

/// Which scenario parameters are taken into account.
///
/// Each level includes all the parameters of the levels before it.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Clone,
    Copy,
    Default,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
    strum::EnumIter,
)]
pub enum ScenarioFeatures {
    /// Carbon tax, amortization period and interest rate only
    #[string = "carbon_tax"]
    CarbonTax,
    /// As above, plus a live electricity price for electricity-driven fuel options
    #[string = "electricity_price"]
    ElectricityPrice,
    /// As above, plus boiler and building efficiency and their costs
    #[default]
    #[string = "efficiency"]
    Efficiency,
}

impl ScenarioFeatures {
    /// Whether the electricity price parameter is used
    pub fn includes_electricity_price(self) -> bool {
        self >= Self::ElectricityPrice
    }

    /// Whether the efficiency-related parameters are used
    pub fn includes_efficiency(self) -> bool {
        self >= Self::Efficiency
    }
}

/// A fully resolved set of scenario parameters
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Scenario {
    /// Which parameters are taken into account
    pub features: ScenarioFeatures,
    /// Carbon tax ($/tonne CO2)
    pub carbon_tax: MoneyPerTonne,
    /// Period over which capital costs are amortized
    pub amortization_years: u32,
    /// Yearly interest rate for amortization
    pub interest_rate: Dimensionless,
    /// Electricity price ($/kWh)
    pub electricity_price: MoneyPerKilowattHour,
    /// Proportion of fuel converted to heat by mechanical systems
    pub boiler_efficiency: Dimensionless,
    /// Building energy efficiency relative to the district average (e.g. 1.0 = twice as efficient)
    pub building_efficiency: Dimensionless,
    /// Proportional change in mechanical system cost which comes with the boiler efficiency
    pub boiler_cost_change: Dimensionless,
    /// Flat cost of building efficiency improvements
    pub efficiency_surcharge: MoneyPerSquareFootPerYear,
    /// The fuel options included in the results, in order
    pub fuel_options: Vec<FuelOptionID>,
    /// Fuel-option-specific overrides for `efficiency_surcharge`
    pub efficiency_surcharge_by_fuel: IndexMap<FuelOptionID, MoneyPerSquareFootPerYear>,
}

impl Scenario {
    /// Combined effect of boiler and building efficiency on fuel use.
    ///
    /// Fuel costs are divided by this. It is one unless efficiency is modelled.
    pub fn efficiency_factor(&self) -> Dimensionless {
        if !self.features.includes_efficiency() {
            return Dimensionless(1.0);
        }

        self.boiler_efficiency * (Dimensionless(1.0) + self.building_efficiency)
    }

    /// Multiplier applied to the mechanical capital cost
    pub fn mechanical_cost_factor(&self) -> Dimensionless {
        if !self.features.includes_efficiency() {
            return Dimensionless(1.0);
        }

        Dimensionless(1.0) + self.boiler_cost_change
    }

    /// The efficiency surcharge which applies to the given fuel option
    pub fn efficiency_surcharge_for(
        &self,
        fuel_option_id: &FuelOptionID,
    ) -> MoneyPerSquareFootPerYear {
        if !self.features.includes_efficiency() {
            return MoneyPerSquareFootPerYear(0.0);
        }

        self.efficiency_surcharge_by_fuel
            .get(fuel_option_id)
            .copied()
            .unwrap_or(self.efficiency_surcharge)
    }

    /// Check that the parameters are all within their valid ranges
    pub fn validate(&self) -> Result<()> {
        check_carbon_tax(self.carbon_tax)?;
        check_interest_rate(self.interest_rate)?;
        check_electricity_price(self.electricity_price)?;
        check_boiler_efficiency(self.boiler_efficiency)?;
        check_building_efficiency(self.building_efficiency)?;
        check_boiler_cost_change(self.boiler_cost_change)?;
        check_efficiency_surcharge(self.efficiency_surcharge)?;
        for (id, surcharge) in &self.efficiency_surcharge_by_fuel {
            check_efficiency_surcharge(*surcharge)
                .map_err(|err| err.context(format!("Invalid surcharge for fuel option {id}")))?;
        }
        ensure!(
            !self.fuel_options.is_empty(),
            "At least one fuel option must be selected"
        );

        Ok(())
    }
}

/// Check that the `carbon_tax` parameter is valid
fn check_carbon_tax(value: MoneyPerTonne) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerTonne(0.0),
        "carbon_tax must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `interest_rate` parameter is valid
fn check_interest_rate(value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Dimensionless(0.0),
        "interest_rate must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `electricity_price` parameter is valid
fn check_electricity_price(value: MoneyPerKilowattHour) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerKilowattHour(0.0),
        "electricity_price must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `boiler_efficiency` parameter is valid
fn check_boiler_efficiency(value: Dimensionless) -> Result<()> {
    ensure!(
        BOILER_EFFICIENCY_RANGE.contains(&value.value()),
        "boiler_efficiency must be between {} and {}",
        BOILER_EFFICIENCY_RANGE.start(),
        BOILER_EFFICIENCY_RANGE.end()
    );

    Ok(())
}

/// Check that the `building_efficiency` parameter is valid
fn check_building_efficiency(value: Dimensionless) -> Result<()> {
    ensure!(
        BUILDING_EFFICIENCY_RANGE.contains(&value.value()),
        "building_efficiency must be between {} and {}",
        BUILDING_EFFICIENCY_RANGE.start(),
        BUILDING_EFFICIENCY_RANGE.end()
    );

    Ok(())
}

/// Check that the `boiler_cost_change` parameter is valid
fn check_boiler_cost_change(value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value.value() >= MIN_BOILER_COST_CHANGE,
        "boiler_cost_change must be a finite number no less than {MIN_BOILER_COST_CHANGE}"
    );

    Ok(())
}

/// Check that an efficiency surcharge is valid
fn check_efficiency_surcharge(value: MoneyPerSquareFootPerYear) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerSquareFootPerYear(0.0),
        "efficiency_surcharge must be a finite number greater than or equal to zero"
    );

    Ok(())
}
