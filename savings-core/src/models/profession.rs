use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::Period;

/// Professional status of the person running the simulation.
///
/// The status decides two things: which reporting period is allowed, and
/// what fraction of income may be deducted as a retirement contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    Employee,
    SelfEmployed,
}

impl Profession {
    pub fn all() -> &'static [Profession] {
        &[Profession::Employee, Profession::SelfEmployed]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::SelfEmployed => "self_employed",
        }
    }

    /// Case-insensitive. Accepts the route names `salarie` and
    /// `profession_liberale` alongside the English forms.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" | "salarie" | "salaried" => Some(Self::Employee),
            "self_employed" | "self-employed" | "selfemployed" | "profession_liberale"
            | "freelance" => Some(Self::SelfEmployed),
            _ => None,
        }
    }

    /// Share of income that may be deducted as a retirement contribution.
    pub fn cap_ratio(&self) -> Decimal {
        match self {
            Self::Employee => dec!(0.50),
            Self::SelfEmployed => dec!(0.10),
        }
    }

    /// The period imposed by this status, if any.
    pub fn forced_period(&self) -> Option<Period> {
        match self {
            Self::Employee => None,
            Self::SelfEmployed => Some(Period::Annual),
        }
    }

    /// Self-employed income is always evaluated annually.
    pub fn effective_period(
        &self,
        requested: Period,
    ) -> Period {
        self.forced_period().unwrap_or(requested)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::SelfEmployed => "Self-employed",
        }
    }

    pub fn income_label(&self) -> &'static str {
        match self {
            Self::Employee => "Taxable net salary",
            Self::SelfEmployed => "Global taxable income",
        }
    }

    pub fn income_noun(&self) -> &'static str {
        match self {
            Self::Employee => "salary",
            Self::SelfEmployed => "income",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
