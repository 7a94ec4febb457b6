//! Common functionality for heatcost.
//!
//! heatcost calculates the yearly space heating cost per square foot of a set of building
//! typologies for each of a number of heating fuel options, given a scenario (carbon tax,
//! amortization period, interest rate and so on).
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod cost;
pub mod finance;
pub mod fuel;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod typology;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program.
///
/// Falls back to the current directory if the platform has no config dir.
pub fn get_heatcost_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        return PathBuf::from(".");
    };
    config_dir.push("heatcost");

    config_dir
}
