use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{Period, Profession};

/// Multi-year horizons reported alongside the one-year savings.
pub const PROJECTION_HORIZONS: [u32; 4] = [5, 10, 15, 20];

/// Largest income or contribution the engine accepts. Projections multiply
/// by at most 240 (12 months × 20 years), far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// A validated request to the engine.
///
/// Amounts are expressed in `requested_period` units. Validation of the
/// raw user input happens before one of these is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub gross_income: Decimal,
    pub proposed_contribution: Decimal,
    pub profession: Profession,
    #[serde(default)]
    pub requested_period: Period,
}

/// Savings accumulated over a number of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub years: u32,
    pub savings: Decimal,
}

/// Result of one simulation. Never patched after creation.
///
/// Tax and savings amounts are in `period` units except where the field
/// name says otherwise. Values keep full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub profession: Profession,
    /// Period actually used; annual whenever the profession forces it.
    pub period: Period,
    pub gross_income: Decimal,
    pub proposed_contribution: Decimal,

    // Contribution cap
    pub cap_ratio: Decimal,
    pub max_contribution: Decimal,
    pub effective_contribution: Decimal,
    /// True when part of the proposed contribution exceeded the cap.
    pub contribution_truncated: bool,

    // Tax comparison
    pub taxable_income_after: Decimal,
    pub tax_before: Decimal,
    pub tax_after: Decimal,
    pub period_savings: Decimal,

    // Savings over time
    pub monthly_savings: Decimal,
    pub annual_savings: Decimal,
    pub five_year_savings: Decimal,
    pub ten_year_savings: Decimal,
    pub fifteen_year_savings: Decimal,
    pub twenty_year_savings: Decimal,
}

impl SimulationReport {
    /// One-year savings followed by the 5, 10, 15 and 20 year projections.
    pub fn projections(&self) -> [Projection; 5] {
        [
            Projection {
                years: 1,
                savings: self.annual_savings,
            },
            Projection {
                years: 5,
                savings: self.five_year_savings,
            },
            Projection {
                years: 10,
                savings: self.ten_year_savings,
            },
            Projection {
                years: 15,
                savings: self.fifteen_year_savings,
            },
            Projection {
                years: 20,
                savings: self.twenty_year_savings,
            },
        ]
    }

    /// Portion of the proposed contribution that earns no tax benefit.
    pub fn excess_contribution(&self) -> Decimal {
        (self.proposed_contribution - self.effective_contribution).max(Decimal::ZERO)
    }
}
