//! Building typologies: the archetypes for which heating costs are compared.
use crate::fuel::FuelOptionID;
use crate::id::{define_id_getter, define_id_type};
use crate::units::{Money, MoneyPerSquareFootPerYear, MoneyPerYear, SquareFeet};
use anyhow::{Context, Result};
use indexmap::IndexMap;

define_id_type! {TypologyID}

/// A map of [`Typology`]s, keyed by typology name
pub type TypologyMap = IndexMap<TypologyID, Typology>;

/// One-off capital costs of installing a fuel option in a typology
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CapitalCosts {
    /// Cost of the mechanical system (boilers, heat pumps, distribution etc.)
    pub mechanical: Money,
    /// Cost of electrical work (service upgrades etc.)
    pub electrical: Money,
}

/// A building typology
#[derive(PartialEq, Debug, Clone)]
pub struct Typology {
    /// The typology's name (e.g. "Office")
    pub id: TypologyID,
    /// Total floor area
    pub floor_area: SquareFeet,
    /// Yearly fuel spend at the reference price rate, independent of fuel option
    pub base_fuel_cost: MoneyPerYear,
    /// Capital costs for each fuel option
    pub capital_costs: IndexMap<FuelOptionID, CapitalCosts>,
}
define_id_getter! {Typology, TypologyID}

impl Typology {
    /// The base fuel cost per unit floor area
    pub fn base_fuel_cost_per_area(&self) -> MoneyPerSquareFootPerYear {
        self.base_fuel_cost / self.floor_area
    }

    /// Get the capital costs for the given fuel option
    pub fn capital_costs_for(&self, fuel_option_id: &FuelOptionID) -> Result<&CapitalCosts> {
        self.capital_costs.get(fuel_option_id).with_context(|| {
            format!(
                "No capital costs for fuel option {fuel_option_id} in typology {}",
                self.id
            )
        })
    }
}
