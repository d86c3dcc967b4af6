//! Integration tests that run the batch loader against an on-disk fixture
//! and feed the result through the app.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use savings_cli::app::{App, OutputFormat};
use savings_cli::config::Config;
use savings_cli::csv_loader;
use savings_core::{Period, Profession};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("batch_inputs.csv")
}

fn brackets_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("savings-data")
        .join("test-data")
        .join("brackets.csv")
}

#[test]
fn test_load_fixture_file_succeeds() {
    let inputs =
        csv_loader::load_from_file(&fixture_path()).expect("fixture file should load without error");

    assert_eq!(inputs.len(), 4);
}

#[test]
fn test_load_fixture_rows() {
    let inputs = csv_loader::load_from_file(&fixture_path()).unwrap();

    assert_eq!(inputs[0].profession, Profession::Employee);
    assert_eq!(inputs[0].requested_period, Period::Monthly);
    assert_eq!(inputs[1].gross_income, dec!(60000));
    assert_eq!(inputs[1].requested_period, Period::Annual);
    assert_eq!(inputs[2].profession, Profession::SelfEmployed);
    assert_eq!(inputs[2].requested_period, Period::Monthly);
}

#[test]
fn test_fixture_batch_results() {
    let inputs = csv_loader::load_from_file(&fixture_path()).unwrap();
    let app = App::new(&Config::default(), None);

    let reports = app.run_batch(&inputs);

    assert_eq!(reports[0].annual_savings, dec!(1200));
    // 60 000 annual, 6 000 contribution: 2 000 -> 1 400 tax.
    assert_eq!(reports[1].period_savings, dec!(600));
    assert_eq!(reports[2].period, Period::Annual);
    assert_eq!(reports[2].period_savings, dec!(3000));
    assert!(reports[2].contribution_truncated);
    // Below the first taxable bracket.
    assert_eq!(reports[3].period_savings, dec!(0));
}

#[test]
fn test_batch_with_loaded_brackets_matches_builtin() {
    let inputs = csv_loader::load_from_file(&fixture_path()).unwrap();
    let builtin = App::new(&Config::default(), None);
    let loaded = App::load(&Config::default(), Some(&brackets_path())).expect("brackets load");

    assert_eq!(builtin.run_batch(&inputs), loaded.run_batch(&inputs));
}

#[test]
fn test_batch_renders_one_row_per_input() {
    let inputs = csv_loader::load_from_file(&fixture_path()).unwrap();
    let app = App::new(&Config::default(), None);

    let text = app
        .render_batch(&app.run_batch(&inputs), OutputFormat::Text)
        .unwrap();

    for row in 1..=4 {
        assert!(text.contains(&format!("│ {row} ")), "missing row {row}:\n{text}");
    }
}
