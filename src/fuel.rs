//! Fuel options are the heating technologies (and the energy sources they draw on) which are
//! compared for each building typology.
use crate::id::{define_id_getter, define_id_type};
use crate::model::ModelParameters;
use crate::scenario::Scenario;
use crate::units::{
    Dimensionless, EnergyPerKilowattHour, MoneyPerEnergy, MoneyPerKilowattHour,
    MoneyPerSquareFootPerYear, MoneyPerTonne, TonnesPerEnergy,
};
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;

define_id_type! {FuelOptionID}

/// A map of [`FuelOption`]s, keyed by fuel option ID
pub type FuelOptionMap = IndexMap<FuelOptionID, FuelOption>;

/// How the energy price rate of a fuel option is determined
#[derive(PartialEq, Eq, Debug, Clone, Copy, DeserializeLabeledStringEnum)]
pub enum PriceSource {
    /// The price rate given in the input file is always used
    #[string = "fixed"]
    Fixed,
    /// The price rate follows the scenario's electricity price
    #[string = "electricity"]
    Electricity,
    /// A blend of the scenario's electricity price and a fixed-composition rate (e.g. renewable
    /// natural gas plus delivery)
    #[string = "hybrid"]
    Hybrid,
}

/// A heating fuel option
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct FuelOption {
    /// Unique identifier for the fuel option (e.g. "ashp")
    pub id: FuelOptionID,
    /// Human-readable name (e.g. "Air Source Heat Pump")
    pub label: String,
    /// Display colour for the presentation layer (e.g. "#91268F")
    pub colour: String,
    /// Energy price rate when no scenario adjustment applies
    pub price_rate: MoneyPerEnergy,
    /// Increase in energy price per unit of carbon tax, i.e. emissions intensity
    pub tax_rate: TonnesPerEnergy,
    /// Coefficient of performance
    pub cop: Dimensionless,
    /// Where the price rate comes from
    pub price_source: PriceSource,
}
define_id_getter! {FuelOption, FuelOptionID}

impl FuelOption {
    /// The energy price rate for this fuel option in the given scenario, before carbon tax.
    ///
    /// Options whose price follows electricity only do so when the scenario's features include
    /// the electricity price. Otherwise the rate from the input file is used.
    pub fn price_rate(&self, parameters: &ModelParameters, scenario: &Scenario) -> MoneyPerEnergy {
        if !scenario.features.includes_electricity_price() {
            return self.price_rate;
        }

        match self.price_source {
            PriceSource::Fixed => self.price_rate,
            PriceSource::Electricity => {
                electricity_price_rate(scenario.electricity_price, parameters.electricity_conversion)
            }
            PriceSource::Hybrid => hybrid_price_rate(
                electricity_price_rate(scenario.electricity_price, parameters.electricity_conversion),
                parameters.hybrid_electricity_fraction,
                parameters.hybrid_fixed_composition_rate,
            ),
        }
    }

    /// The energy price rate for this fuel option including the effect of carbon tax.
    ///
    /// Returns an error if the carbon tax would make the price negative.
    pub fn carbon_adjusted_price_rate(
        &self,
        parameters: &ModelParameters,
        scenario: &Scenario,
    ) -> Result<MoneyPerEnergy> {
        let rate = carbon_adjusted_price_rate(
            self.price_rate(parameters, scenario),
            self.tax_rate,
            scenario.carbon_tax,
            parameters.carbon_tax_baseline,
        );
        ensure!(
            rate.is_finite() && rate >= MoneyPerEnergy(0.0),
            "Carbon-adjusted price rate for fuel option {} is negative or not finite ({rate})",
            self.id
        );

        Ok(rate)
    }
}

/// Convert an electricity price into an energy price rate
pub fn electricity_price_rate(
    electricity_price: MoneyPerKilowattHour,
    conversion: EnergyPerKilowattHour,
) -> MoneyPerEnergy {
    electricity_price / conversion
}

/// The price rate of a hybrid option.
///
/// The rate is `electricity_fraction * electricity_rate + (1 - electricity_fraction) *
/// fixed_composition_rate`.
pub fn hybrid_price_rate(
    electricity_rate: MoneyPerEnergy,
    electricity_fraction: Dimensionless,
    fixed_composition_rate: MoneyPerEnergy,
) -> MoneyPerEnergy {
    electricity_fraction * electricity_rate
        + (Dimensionless(1.0) - electricity_fraction) * fixed_composition_rate
}

/// Add the carbon tax above the baseline to a price rate
pub fn carbon_adjusted_price_rate(
    price_rate: MoneyPerEnergy,
    tax_rate: TonnesPerEnergy,
    carbon_tax: MoneyPerTonne,
    carbon_tax_baseline: MoneyPerTonne,
) -> MoneyPerEnergy {
    price_rate + tax_rate * (carbon_tax - carbon_tax_baseline)
}

/// The yearly fuel cost per unit floor area.
///
/// The base fuel cost is what the typology spends per square foot at the reference price rate
/// with a COP of one. It is scaled by the ratio of the (carbon-adjusted) price rate to the
/// reference rate, then divided by the COP and by `efficiency`, which combines boiler and building
/// efficiency (one if these are not modelled).
pub fn fuel_cost_per_area(
    base_fuel_cost_per_area: MoneyPerSquareFootPerYear,
    adjusted_price_rate: MoneyPerEnergy,
    reference_price_rate: MoneyPerEnergy,
    cop: Dimensionless,
    efficiency: Dimensionless,
) -> MoneyPerSquareFootPerYear {
    base_fuel_cost_per_area * (adjusted_price_rate / reference_price_rate)
        * (Dimensionless(1.0) / cop)
        / efficiency
}
