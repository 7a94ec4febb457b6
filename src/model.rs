//! The model represents the static input data provided by the user.
use crate::fuel::{FuelOption, FuelOptionID, FuelOptionMap};
use crate::typology::TypologyMap;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// The fuel options which can be compared
    pub fuel_options: FuelOptionMap,
    /// The building typologies
    pub typologies: TypologyMap,
}

impl Model {
    /// Iterate over the given fuel options in order.
    ///
    /// The IDs must have been validated against the model's fuel options.
    pub fn iter_fuel_options<'a>(
        &'a self,
        ids: &'a [FuelOptionID],
    ) -> impl Iterator<Item = &'a FuelOption> + 'a {
        ids.iter().filter_map(|id| self.fuel_options.get(id))
    }
}
