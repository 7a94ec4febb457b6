//! Integration tests for the `run` command.
use heatcost::cli::{RunOpts, ScenarioOpts, handle_run_command};
use heatcost::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/toronto")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("HEATCOST_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        scenario: ScenarioOpts {
            carbon_tax: Some(340.0),
            fuel_options: Some(vec!["ng".into(), "ashp".into()]),
            ..ScenarioOpts::default()
        },
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();
    for file_name in [
        "costs.csv",
        "fuel_option_summary.csv",
        "chart.toml",
        "metadata.toml",
        "heatcost_info.log",
        "heatcost_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file());
    }

    // Only the selected fuel options are included
    let summary = fs::read_to_string(output_dir.join("fuel_option_summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);

    // Output folder now has files in it, so this fails unless we allow overwriting
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    );

    // Second run will fail because the logging is already initialised
    let opts = RunOpts {
        overwrite: true,
        ..opts
    };
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
