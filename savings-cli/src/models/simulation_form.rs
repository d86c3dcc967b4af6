//! Input form for a simulation.
//!
//! Holds the raw strings the user typed and turns them into a
//! [`SimulationInput`] only when every field is valid. Nothing reaches the
//! engine otherwise.

use std::fmt;

use rust_decimal::Decimal;
use savings_core::{MAX_AMOUNT, Period, Profession, SimulationInput, max_deductible_contribution};
use tracing::debug;

use crate::utils::{is_blank, parse_decimal};

/// Every validation problem found in a form, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(pub Vec<String>);

impl std::error::Error for FormErrors {}

impl fmt::Display for FormErrors {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

/// Form state for one simulation request.
#[derive(Debug, Clone)]
pub struct SimulationForm {
    pub profession: Profession,
    /// Ignored for the self-employed, who are always evaluated annually.
    pub period: Period,
    pub income: String,
    pub contribution: String,
}

impl SimulationForm {
    pub fn new(profession: Profession) -> Self {
        Self {
            profession,
            period: Period::default(),
            income: String::new(),
            contribution: String::new(),
        }
    }

    pub fn effective_period(&self) -> Period {
        self.profession.effective_period(self.period)
    }

    pub fn income_label(&self) -> &'static str {
        self.profession.income_label()
    }

    pub fn contribution_label(&self) -> &'static str {
        match self.effective_period() {
            Period::Monthly => "Monthly contribution",
            Period::Annual => "Annual contribution",
        }
    }

    /// Cap preview shown while the income is being typed.
    ///
    /// `None` while the income is blank or not a number.
    pub fn max_contribution_preview(&self) -> Option<Decimal> {
        if is_blank(&self.income) {
            return None;
        }
        let income = parse_decimal(&self.income).ok()?;
        Some(max_deductible_contribution(income, self.profession))
    }

    /// Parse the form into a [`SimulationInput`], collecting every error.
    pub fn validate(&self) -> Result<SimulationInput, FormErrors> {
        let mut errors = Vec::new();

        let income = Self::parse_positive(self.income_label(), &self.income, &mut errors);
        let contribution =
            Self::parse_positive(self.contribution_label(), &self.contribution, &mut errors);

        match (income, contribution) {
            (Some(gross_income), Some(proposed_contribution)) => Ok(SimulationInput {
                gross_income,
                proposed_contribution,
                profession: self.profession,
                requested_period: self.period,
            }),
            _ => {
                debug!(?errors, "simulation form rejected");
                Err(FormErrors(errors))
            }
        }
    }

    fn parse_positive(
        field: &str,
        value: &str,
        errors: &mut Vec<String>,
    ) -> Option<Decimal> {
        if is_blank(value) {
            errors.push(format!("{field} is required"));
            return None;
        }
        match parse_decimal(value) {
            Ok(v) if v > MAX_AMOUNT => {
                errors.push(format!("{field} is too large"));
                None
            }
            Ok(v) if v > Decimal::ZERO => Some(v),
            Ok(_) => {
                errors.push(format!("{field} must be greater than zero"));
                None
            }
            Err(_) => {
                errors.push(format!("{field} must be a valid number"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn form(
        profession: Profession,
        income: &str,
        contribution: &str,
    ) -> SimulationForm {
        SimulationForm {
            income: income.to_string(),
            contribution: contribution.to_string(),
            ..SimulationForm::new(profession)
        }
    }

    #[test]
    fn validate_builds_input_from_valid_fields() {
        let mut form = form(Profession::Employee, "5,000", "1000");
        form.period = Period::Monthly;

        let input = form.validate().unwrap();

        assert_eq!(
            input,
            SimulationInput {
                gross_income: dec!(5000),
                proposed_contribution: dec!(1000),
                profession: Profession::Employee,
                requested_period: Period::Monthly,
            }
        );
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let errors = form(Profession::Employee, "", "  ").validate().unwrap_err();

        assert_eq!(
            errors.0,
            vec![
                "Taxable net salary is required".to_string(),
                "Monthly contribution is required".to_string(),
            ]
        );
    }

    #[test]
    fn validate_rejects_non_numeric_input() {
        let errors = form(Profession::SelfEmployed, "lots", "1000")
            .validate()
            .unwrap_err();

        assert_eq!(
            errors.0,
            vec!["Global taxable income must be a valid number".to_string()]
        );
    }

    #[test]
    fn validate_rejects_zero_and_negative_amounts() {
        let errors = form(Profession::Employee, "0", "-5").validate().unwrap_err();

        assert_eq!(
            errors.0,
            vec![
                "Taxable net salary must be greater than zero".to_string(),
                "Monthly contribution must be greater than zero".to_string(),
            ]
        );
    }

    #[test]
    fn validate_enforces_amount_ceiling() {
        let at_ceiling = form(Profession::SelfEmployed, "1 000 000 000 000", "1000")
            .validate()
            .expect("ceiling itself is accepted");
        let errors = form(Profession::SelfEmployed, "1000000000000.01", "1000")
            .validate()
            .unwrap_err();

        assert_eq!(at_ceiling.gross_income, MAX_AMOUNT);
        assert_eq!(errors.0, vec!["Global taxable income is too large".to_string()]);
    }

    #[test]
    fn contribution_label_follows_effective_period() {
        let mut employee = SimulationForm::new(Profession::Employee);
        employee.period = Period::Annual;
        let mut self_employed = SimulationForm::new(Profession::SelfEmployed);
        self_employed.period = Period::Monthly;

        assert_eq!(employee.contribution_label(), "Annual contribution");
        assert_eq!(self_employed.contribution_label(), "Annual contribution");
        assert_eq!(
            SimulationForm::new(Profession::Employee).contribution_label(),
            "Monthly contribution"
        );
    }

    #[test]
    fn max_contribution_preview_uses_profession_cap() {
        let preview = form(Profession::SelfEmployed, "100000", "")
            .max_contribution_preview();

        assert_eq!(preview, Some(dec!(10000)));
    }

    #[test]
    fn max_contribution_preview_is_none_for_bad_income() {
        assert_eq!(form(Profession::Employee, "", "").max_contribution_preview(), None);
        assert_eq!(form(Profession::Employee, "x", "").max_contribution_preview(), None);
    }

    #[test]
    fn form_errors_display_joins_messages() {
        let errors = FormErrors(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(errors.to_string(), "a; b");
    }
}
