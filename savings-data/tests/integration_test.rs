//! Integration tests for bracket loading from the on-disk fixture.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use savings_core::{Period, Profession, SimulationInput, Simulator, default_tables};
use savings_data::{BracketTableLoader, BracketTableLoaderError};

const TEST_CSV: &str = include_str!("../test-data/brackets.csv");

fn fixture_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/brackets.csv"))
}

#[test]
fn test_fixture_matches_built_in_tables() {
    let tables = BracketTableLoader::load_file(fixture_path()).expect("Failed to load fixture");

    assert_eq!(&tables, default_tables());
}

#[test]
fn test_fixture_parses_twelve_records() {
    let records = BracketTableLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(records.len(), 12);
    for period in ["monthly", "annual"] {
        let count = records.iter().filter(|r| r.period == period).count();
        assert_eq!(count, 6, "Expected 6 brackets for {}", period);
    }
}

#[test]
fn test_loaded_tables_drive_simulation() {
    let tables = BracketTableLoader::load_file(fixture_path()).unwrap();
    let simulator = Simulator::new(&tables);

    let report = simulator.simulate(&SimulationInput {
        gross_income: dec!(5000),
        proposed_contribution: dec!(1000),
        profession: Profession::Employee,
        requested_period: Period::Monthly,
    });

    assert_eq!(report.period_savings, dec!(100));
    assert_eq!(report.annual_savings, dec!(1200));
}

#[test]
fn test_custom_table_changes_result() {
    // Flat 10% above 1000 per month, flat 10% above 12000 per year.
    let csv = "period,min_income,max_income,rate,deduction
monthly,0,1000,0,0
monthly,1001,,0.10,100
annual,0,12000,0,0
annual,12001,,0.10,1200
";
    let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();
    let tables = BracketTableLoader::build(&records).unwrap();

    let report = Simulator::new(&tables).simulate(&SimulationInput {
        gross_income: dec!(5000),
        proposed_contribution: dec!(1000),
        profession: Profession::Employee,
        requested_period: Period::Monthly,
    });

    // 400 - 300
    assert_eq!(report.tax_before, dec!(400));
    assert_eq!(report.period_savings, dec!(100));
}

#[test]
fn test_rows_out_of_order_are_rejected() {
    let csv = "period,min_income,max_income,rate,deduction
annual,40001,60000,0.10,4000
annual,0,40000,0,0
annual,60001,,0.20,10000
monthly,0,,0,0
";
    let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();

    let result = BracketTableLoader::build(&records);

    assert!(matches!(
        result,
        Err(BracketTableLoaderError::InvalidTable {
            period: Period::Annual,
            ..
        })
    ));
}
