use std::fmt;

use serde::{Deserialize, Serialize};

/// Time unit over which income and tax are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    Monthly,
    Annual,
}

impl Period {
    pub const MONTHS_PER_YEAR: u32 = 12;

    pub fn all() -> &'static [Period] {
        &[Period::Monthly, Period::Annual]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    /// Case-insensitive; also accepts the `mensuel` / `annuel` spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "mensuel" => Some(Self::Monthly),
            "annual" | "yearly" | "year" | "annuel" => Some(Self::Annual),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Annual => "Annual",
        }
    }

    pub fn per_label(&self) -> &'static str {
        match self {
            Self::Monthly => "per month",
            Self::Annual => "per year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
