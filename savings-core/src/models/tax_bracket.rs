use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a progressive income-tax schedule.
///
/// `fixed_deduction` folds the lower brackets into a single constant so the
/// tax owed for any income in this bracket is `income * rate - fixed_deduction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    /// `None` for the top bracket.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub fixed_deduction: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
        fixed_deduction: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
            fixed_deduction,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }

    /// Whether `income` is at or below this bracket's upper bound.
    pub fn reaches(
        &self,
        income: Decimal,
    ) -> bool {
        self.upper_bound.is_none_or(|upper| income <= upper)
    }

    /// Raw quick-method formula, not clamped at zero.
    pub fn tax_at(
        &self,
        income: Decimal,
    ) -> Decimal {
        income * self.rate - self.fixed_deduction
    }
}
