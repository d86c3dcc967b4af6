//! Built-in bracket schedules.
//!
//! Both tables are built once, on first use, and shared read-only for the
//! life of the process.

use std::sync::LazyLock;

use rust_decimal_macros::dec;

use crate::models::{BracketTable, BracketTables, Period, TaxBracket};

static DEFAULT_TABLES: LazyLock<BracketTables> = LazyLock::new(|| {
    let monthly = BracketTable::new(Period::Monthly, monthly_brackets())
        .expect("built-in monthly bracket table is valid");
    let annual = BracketTable::new(Period::Annual, annual_brackets())
        .expect("built-in annual bracket table is valid");
    BracketTables::new(monthly, annual).expect("built-in tables are tagged with their period")
});

/// The built-in monthly and annual schedules.
pub fn default_tables() -> &'static BracketTables {
    &DEFAULT_TABLES
}

/// Monthly schedule: the annual one divided by twelve, deductions rounded to the cent.
pub fn monthly_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(dec!(0), Some(dec!(3333)), dec!(0), dec!(0)),
        TaxBracket::new(dec!(3334), Some(dec!(5000)), dec!(0.10), dec!(333.33)),
        TaxBracket::new(dec!(5001), Some(dec!(6667)), dec!(0.20), dec!(833.33)),
        TaxBracket::new(dec!(6668), Some(dec!(8333)), dec!(0.30), dec!(1500)),
        TaxBracket::new(dec!(8334), Some(dec!(15000)), dec!(0.34), dec!(1833.33)),
        TaxBracket::new(dec!(15001), None, dec!(0.37), dec!(2283.33)),
    ]
}

pub fn annual_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(dec!(0), Some(dec!(40000)), dec!(0), dec!(0)),
        TaxBracket::new(dec!(40001), Some(dec!(60000)), dec!(0.10), dec!(4000)),
        TaxBracket::new(dec!(60001), Some(dec!(80000)), dec!(0.20), dec!(10000)),
        TaxBracket::new(dec!(80001), Some(dec!(100000)), dec!(0.30), dec!(18000)),
        TaxBracket::new(dec!(100001), Some(dec!(180000)), dec!(0.34), dec!(22000)),
        TaxBracket::new(dec!(180001), None, dec!(0.37), dec!(27400)),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn default_tables_have_six_rows_each() {
        let tables = default_tables();

        assert_eq!(tables.monthly().len(), 6);
        assert_eq!(tables.annual().len(), 6);
    }

    #[test]
    fn default_tables_start_at_zero_and_end_unbounded() {
        for period in Period::all() {
            let table = default_tables().for_period(*period);
            let brackets = table.brackets();

            assert_eq!(brackets[0].lower_bound, Decimal::ZERO);
            assert!(brackets[brackets.len() - 1].is_unbounded());
        }
    }

    #[test]
    fn default_tables_are_shared() {
        assert!(std::ptr::eq(default_tables(), default_tables()));
    }
}
