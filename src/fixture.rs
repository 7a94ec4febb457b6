//! Fixtures for tests

use crate::fuel::{FuelOption, FuelOptionMap, PriceSource};
use crate::model::{Model, ModelParameters};
use crate::scenario::{Scenario, ScenarioFeatures};
use crate::typology::{CapitalCosts, Typology, TypologyMap};
use crate::units::{
    Dimensionless, Money, MoneyPerEnergy, MoneyPerKilowattHour, MoneyPerSquareFootPerYear,
    MoneyPerTonne, MoneyPerYear, SquareFeet, TonnesPerEnergy,
};
use indexmap::{IndexMap, indexmap};
use rstest::fixture;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn fuel_option() -> FuelOption {
    FuelOption {
        id: "er".into(),
        label: "Electrical Resistance".into(),
        colour: "#FBAF3F".into(),
        price_rate: MoneyPerEnergy(44.0),
        tax_rate: TonnesPerEnergy(0.028),
        cop: Dimensionless(1.0),
        price_source: PriceSource::Fixed,
    }
}

#[fixture]
pub fn fuel_options(fuel_option: FuelOption) -> FuelOptionMap {
    let natural_gas = FuelOption {
        id: "ng".into(),
        label: "Natural Gas".into(),
        colour: "#231F20".into(),
        price_rate: MoneyPerEnergy(3.0),
        tax_rate: TonnesPerEnergy(0.061),
        cop: Dimensionless(1.0),
        price_source: PriceSource::Fixed,
    };

    indexmap! {
        natural_gas.id.clone() => natural_gas,
        fuel_option.id.clone() => fuel_option,
    }
}

#[fixture]
pub fn model_parameters() -> ModelParameters {
    ModelParameters::default()
}

#[fixture]
pub fn scenario() -> Scenario {
    Scenario {
        features: ScenarioFeatures::Efficiency,
        carbon_tax: MoneyPerTonne(30.0),
        amortization_years: 20,
        interest_rate: Dimensionless(0.03),
        electricity_price: MoneyPerKilowattHour(0.1584),
        boiler_efficiency: Dimensionless(1.0),
        building_efficiency: Dimensionless(0.0),
        boiler_cost_change: Dimensionless(0.0),
        efficiency_surcharge: MoneyPerSquareFootPerYear(0.0),
        fuel_options: vec!["ng".into(), "er".into()],
        efficiency_surcharge_by_fuel: IndexMap::new(),
    }
}

#[fixture]
pub fn typology() -> Typology {
    Typology {
        id: "Office".into(),
        floor_area: SquareFeet(10_000.0),
        base_fuel_cost: MoneyPerYear(5000.0),
        capital_costs: indexmap! {
            "ng".into() => CapitalCosts {
                mechanical: Money(30_000.0),
                electrical: Money(1000.0),
            },
            "er".into() => CapitalCosts {
                mechanical: Money(50_000.0),
                electrical: Money(20_000.0),
            },
        },
    }
}

#[fixture]
pub fn typologies(typology: Typology) -> TypologyMap {
    let school = Typology {
        id: "School".into(),
        floor_area: SquareFeet(20_000.0),
        base_fuel_cost: MoneyPerYear(12_000.0),
        capital_costs: indexmap! {
            "ng".into() => CapitalCosts {
                mechanical: Money(45_000.0),
                electrical: Money(2000.0),
            },
            "er".into() => CapitalCosts {
                mechanical: Money(70_000.0),
                electrical: Money(35_000.0),
            },
        },
    };

    indexmap! {
        typology.id.clone() => typology,
        school.id.clone() => school,
    }
}

#[fixture]
pub fn model(
    model_parameters: ModelParameters,
    fuel_options: FuelOptionMap,
    typologies: TypologyMap,
) -> Model {
    Model {
        model_path: PathBuf::from("model"),
        parameters: model_parameters,
        fuel_options,
        typologies,
    }
}
