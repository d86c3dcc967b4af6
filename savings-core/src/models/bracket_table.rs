//! Validated bracket schedules.
//!
//! A [`BracketTable`] can only be built through [`BracketTable::new`], which
//! checks that the brackets partition the non-negative incomes in ascending
//! order and that each fixed deduction is paired with the right rate. Once
//! built, a table is immutable and lookups cannot fail for income >= 0.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use super::{Period, TaxBracket};

/// Largest allowed jump in tax when crossing a bracket boundary.
///
/// Published deductions are rounded to the cent, so the two formulas
/// evaluated at a shared bound may differ by a few hundredths.
pub const CONTINUITY_TOLERANCE: Decimal = dec!(0.05);

/// Errors raised when a bracket schedule breaks the partition invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("{0} bracket table is empty")]
    Empty(Period),

    #[error("{period} bracket table must start at 0, starts at {lower_bound}")]
    NonZeroFirstLowerBound { period: Period, lower_bound: Decimal },

    #[error("{period} bracket {index}: rate {rate} is outside [0, 1]")]
    RateOutOfRange {
        period: Period,
        index: usize,
        rate: Decimal,
    },

    #[error("{period} bracket {index}: fixed deduction {deduction} is negative")]
    NegativeDeduction {
        period: Period,
        index: usize,
        deduction: Decimal,
    },

    #[error("{period} bracket {index}: upper bound {upper} is below lower bound {lower}")]
    InvertedBounds {
        period: Period,
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("{period} bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeLast { period: Period, index: usize },

    #[error("last {0} bracket must be unbounded")]
    BoundedLastBracket(Period),

    #[error("{period} brackets {index} and {next}: gap between {upper} and {lower}", next = .index + 1)]
    Gap {
        period: Period,
        index: usize,
        upper: Decimal,
        lower: Decimal,
    },

    #[error("{period} brackets {index} and {next}: {lower} does not start above {upper}", next = .index + 1)]
    Overlap {
        period: Period,
        index: usize,
        upper: Decimal,
        lower: Decimal,
    },

    #[error("expected a {expected} table, got a {found} table")]
    WrongPeriod { expected: Period, found: Period },

    #[error(
        "{period} brackets {index} and {next}: tax jumps from {below} to {above} at {boundary}",
        next = .index + 1
    )]
    Discontinuity {
        period: Period,
        index: usize,
        boundary: Decimal,
        below: Decimal,
        above: Decimal,
    },
}

/// An ordered, validated bracket schedule for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    period: Period,
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates `brackets` and wraps them into a table for `period`.
    ///
    /// # Errors
    ///
    /// Returns a [`BracketTableError`] describing the first violated rule.
    pub fn new(
        period: Period,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty(period))?;
        if first.lower_bound != Decimal::ZERO {
            return Err(BracketTableError::NonZeroFirstLowerBound {
                period,
                lower_bound: first.lower_bound,
            });
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    period,
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.fixed_deduction < Decimal::ZERO {
                return Err(BracketTableError::NegativeDeduction {
                    period,
                    index,
                    deduction: bracket.fixed_deduction,
                });
            }
            match bracket.upper_bound {
                Some(upper) if upper < bracket.lower_bound => {
                    return Err(BracketTableError::InvertedBounds {
                        period,
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                Some(_) if index == last_index => {
                    return Err(BracketTableError::BoundedLastBracket(period));
                }
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedBeforeLast { period, index });
                }
                _ => {}
            }
        }

        for (index, pair) in brackets.windows(2).enumerate() {
            let (below, above) = (&pair[0], &pair[1]);
            // Checked above: only the last bracket is unbounded.
            let Some(upper) = below.upper_bound else {
                continue;
            };
            if above.lower_bound <= upper {
                return Err(BracketTableError::Overlap {
                    period,
                    index,
                    upper,
                    lower: above.lower_bound,
                });
            }
            if above.lower_bound > upper + Decimal::ONE {
                return Err(BracketTableError::Gap {
                    period,
                    index,
                    upper,
                    lower: above.lower_bound,
                });
            }

            let tax_below = below.tax_at(upper).max(Decimal::ZERO);
            let tax_above = above.tax_at(upper).max(Decimal::ZERO);
            if (tax_above - tax_below).abs() > CONTINUITY_TOLERANCE {
                return Err(BracketTableError::Discontinuity {
                    period,
                    index,
                    boundary: upper,
                    below: tax_below,
                    above: tax_above,
                });
            }
        }

        Ok(Self { period, brackets })
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Finds the bracket that applies to `income`.
    ///
    /// A bracket covers every income above the previous bracket's upper
    /// bound up to and including its own. Negative income matches nothing.
    pub fn bracket_for(
        &self,
        income: Decimal,
    ) -> Option<&TaxBracket> {
        if income < Decimal::ZERO {
            return None;
        }
        self.brackets.iter().find(|b| b.reaches(income))
    }

    /// Tax owed on `income` under this schedule, never negative.
    pub fn compute_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        match self.bracket_for(income) {
            Some(bracket) => bracket.tax_at(income).max(Decimal::ZERO),
            None => {
                warn!(%income, period = %self.period, "income outside every bracket, using zero tax");
                Decimal::ZERO
            }
        }
    }
}

/// The monthly and annual schedules, selected by period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTables {
    monthly: BracketTable,
    annual: BracketTable,
}

impl BracketTables {
    /// Pairs the two schedules.
    ///
    /// # Errors
    ///
    /// [`BracketTableError::WrongPeriod`] when a table is tagged with the
    /// other period.
    pub fn new(
        monthly: BracketTable,
        annual: BracketTable,
    ) -> Result<Self, BracketTableError> {
        for (expected, table) in [(Period::Monthly, &monthly), (Period::Annual, &annual)] {
            if table.period() != expected {
                return Err(BracketTableError::WrongPeriod {
                    expected,
                    found: table.period(),
                });
            }
        }
        Ok(Self { monthly, annual })
    }

    pub fn for_period(
        &self,
        period: Period,
    ) -> &BracketTable {
        match period {
            Period::Monthly => &self.monthly,
            Period::Annual => &self.annual,
        }
    }

    pub fn monthly(&self) -> &BracketTable {
        &self.monthly
    }

    pub fn annual(&self) -> &BracketTable {
        &self.annual
    }
}
