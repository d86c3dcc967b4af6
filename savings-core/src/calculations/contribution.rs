use rust_decimal::Decimal;

use crate::models::Profession;

/// Largest contribution that still reduces taxable income.
///
/// `income * 0.5` for employees, `income * 0.10` for the self-employed.
pub fn max_deductible_contribution(
    income: Decimal,
    profession: Profession,
) -> Decimal {
    income * profession.cap_ratio()
}
