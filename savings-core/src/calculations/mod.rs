//! The tax savings engine.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! mutable state. The bracket tables are passed in by reference.

pub mod common;
pub mod contribution;
pub mod simulator;

pub use contribution::max_deductible_contribution;
pub use simulator::{Simulator, simulate};

use rust_decimal::Decimal;

use crate::models::BracketTable;

/// Tax owed on `income` under `table`.
///
/// Selects the bracket containing `income` and applies
/// `max(0, income * rate - fixed_deduction)`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use savings_core::{Period, compute_tax, default_tables};
///
/// let monthly = default_tables().for_period(Period::Monthly);
///
/// assert_eq!(compute_tax(dec!(5000), monthly), dec!(166.67));
/// assert_eq!(compute_tax(dec!(3333), monthly), dec!(0));
/// ```
pub fn compute_tax(
    income: Decimal,
    table: &BracketTable,
) -> Decimal {
    table.compute_tax(income)
}
