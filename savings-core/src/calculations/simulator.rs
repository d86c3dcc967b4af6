//! Retirement-contribution tax savings simulation.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Effective period (self-employed is always annual) |
//! | 2    | Bracket table for that period |
//! | 3    | Contribution cap: income × cap ratio |
//! | 4    | Effective contribution: smaller of proposed and cap |
//! | 5    | Tax before: tax on gross income |
//! | 6    | Tax after: tax on income minus effective contribution (floor 0) |
//! | 7    | Period savings: step 5 minus step 6 (floor 0) |
//! | 8    | Monthly and annual savings from the period savings |
//! | 9    | 5, 10, 15 and 20 year projections: annual savings × years |
//!
//! Projections are linear: no compounding and no inflation adjustment.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use savings_core::{Period, Profession, SimulationInput, Simulator, default_tables};
//!
//! let input = SimulationInput {
//!     gross_income: dec!(100000),
//!     proposed_contribution: dec!(20000),
//!     profession: Profession::SelfEmployed,
//!     requested_period: Period::Monthly,
//! };
//!
//! let report = Simulator::new(default_tables()).simulate(&input);
//!
//! assert_eq!(report.period, Period::Annual);
//! assert_eq!(report.effective_contribution, dec!(10000));
//! assert!(report.contribution_truncated);
//! assert_eq!(report.period_savings, dec!(3000));
//! assert_eq!(report.five_year_savings, dec!(15000));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calculations::{compute_tax, max_deductible_contribution};
use crate::models::{
    BracketTable, BracketTables, PROJECTION_HORIZONS, Period, Profession, SimulationInput,
    SimulationReport,
};
use crate::tables::default_tables;

/// Runs simulations against a fixed pair of bracket tables.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    tables: &'a BracketTables,
}

impl<'a> Simulator<'a> {
    pub fn new(tables: &'a BracketTables) -> Self {
        Self { tables }
    }

    /// Computes the savings report for `input`.
    ///
    /// The input is assumed validated: positive income, non-negative
    /// contribution, both at most [`MAX_AMOUNT`](crate::models::MAX_AMOUNT).
    /// Identical inputs always give identical reports.
    pub fn simulate(
        &self,
        input: &SimulationInput,
    ) -> SimulationReport {
        let period = self.effective_period(input.profession, input.requested_period);
        let table = self.tables.for_period(period);

        let cap_ratio = input.profession.cap_ratio();
        let max_contribution = max_deductible_contribution(input.gross_income, input.profession);
        let (effective_contribution, contribution_truncated) =
            self.effective_contribution(input.proposed_contribution, max_contribution);

        let taxable_income_after =
            self.taxable_income_after(input.gross_income, effective_contribution);
        let tax_before = compute_tax(input.gross_income, table);
        let tax_after = compute_tax(taxable_income_after, table);
        let period_savings = self.period_savings(tax_before, tax_after);

        let (monthly_savings, annual_savings) = self.monthly_and_annual(period_savings, period);
        let [five, ten, fifteen, twenty] = self.projections(annual_savings);

        debug!(
            profession = %input.profession,
            %period,
            income = %input.gross_income,
            %max_contribution,
            %effective_contribution,
            %tax_before,
            %tax_after,
            %period_savings,
            "simulation computed"
        );
        if contribution_truncated {
            info!(
                proposed = %input.proposed_contribution,
                cap = %max_contribution,
                "contribution exceeds deductible cap, excess earns no tax benefit"
            );
        }

        SimulationReport {
            profession: input.profession,
            period,
            gross_income: input.gross_income,
            proposed_contribution: input.proposed_contribution,
            cap_ratio,
            max_contribution,
            effective_contribution,
            contribution_truncated,
            taxable_income_after,
            tax_before,
            tax_after,
            period_savings,
            monthly_savings,
            annual_savings,
            five_year_savings: five,
            ten_year_savings: ten,
            fifteen_year_savings: fifteen,
            twenty_year_savings: twenty,
        }
    }

    /// Table used for `profession` when `requested` was asked for.
    pub fn table_for(
        &self,
        profession: Profession,
        requested: Period,
    ) -> &'a BracketTable {
        self.tables
            .for_period(self.effective_period(profession, requested))
    }

    fn effective_period(
        &self,
        profession: Profession,
        requested: Period,
    ) -> Period {
        profession.effective_period(requested)
    }

    /// Smaller of the proposed contribution and the cap, and whether the cap bit.
    fn effective_contribution(
        &self,
        proposed: Decimal,
        cap: Decimal,
    ) -> (Decimal, bool) {
        if proposed > cap {
            (cap, true)
        } else {
            (proposed, false)
        }
    }

    /// Income left after the contribution, floored at zero.
    fn taxable_income_after(
        &self,
        income: Decimal,
        contribution: Decimal,
    ) -> Decimal {
        (income - contribution).max(Decimal::ZERO)
    }

    /// Cent-rounded deductions can make the tax dip by a fraction of a cent
    /// just above a boundary; savings are floored at zero.
    fn period_savings(
        &self,
        tax_before: Decimal,
        tax_after: Decimal,
    ) -> Decimal {
        (tax_before - tax_after).max(Decimal::ZERO)
    }

    fn monthly_and_annual(
        &self,
        period_savings: Decimal,
        period: Period,
    ) -> (Decimal, Decimal) {
        let months = Decimal::from(Period::MONTHS_PER_YEAR);
        match period {
            Period::Monthly => (period_savings, period_savings * months),
            Period::Annual => (period_savings / months, period_savings),
        }
    }

    fn projections(
        &self,
        annual_savings: Decimal,
    ) -> [Decimal; 4] {
        PROJECTION_HORIZONS.map(|years| annual_savings * Decimal::from(years))
    }
}

/// Runs [`Simulator::simulate`] against the built-in tables.
pub fn simulate(input: &SimulationInput) -> SimulationReport {
    Simulator::new(default_tables()).simulate(input)
}
