//! Text rendering of a [`SimulationReport`].
//!
//! Amounts are rounded to the whole currency unit here and only here; the
//! report itself keeps full precision.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use savings_core::calculations::common::round_to_unit;
use savings_core::{BracketTable, SimulationReport};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::SimulationForm;

/// Grouped whole-unit amounts with a currency suffix, e.g. `1.200 DH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub group_separator: String,
    pub suffix: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            group_separator: ".".to_string(),
            suffix: " DH".to_string(),
        }
    }
}

impl CurrencyFormat {
    pub fn format(
        &self,
        amount: Decimal,
    ) -> String {
        let rounded = round_to_unit(amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = rounded.abs().trunc().to_string();
        format!("{sign}{}{}", self.group(&digits), self.suffix)
    }

    fn group(
        &self,
        digits: &str,
    ) -> String {
        let len = digits.len();
        let mut grouped = String::with_capacity(len + len / 3 * self.group_separator.len());
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push_str(&self.group_separator);
            }
            grouped.push(c);
        }
        grouped
    }
}

/// `0.10` → `10%`.
pub fn format_percent(ratio: Decimal) -> String {
    format!("{}%", (ratio * Decimal::ONE_HUNDRED).normalize())
}

/// `1` → `1 year`, `5` → `5 years`.
pub fn years_label(years: u32) -> String {
    if years == 1 {
        "1 year".to_string()
    } else {
        format!("{years} years")
    }
}

/// Rows of the savings-over-time table: per month, then each horizon.
pub fn savings_rows(report: &SimulationReport) -> Vec<(String, Decimal)> {
    let mut rows = vec![("Per month".to_string(), report.monthly_savings)];
    rows.extend(
        report
            .projections()
            .iter()
            .map(|p| (format!("Over {}", years_label(p.years)), p.savings)),
    );
    rows
}

#[derive(Tabled)]
struct SavingsRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Tax savings")]
    savings: String,
}

#[derive(Tabled)]
struct BracketRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Deduction")]
    deduction: String,
}

/// Renders reports and bracket tables for the terminal.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    currency: CurrencyFormat,
    chart_width: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(CurrencyFormat::default(), 40)
    }
}

impl ReportRenderer {
    pub fn new(
        currency: CurrencyFormat,
        chart_width: usize,
    ) -> Self {
        Self {
            currency,
            chart_width: chart_width.max(10),
        }
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// Before/after comparison and the savings for the report's period.
    pub fn summary(
        &self,
        report: &SimulationReport,
    ) -> String {
        let per = report.period.per_label();
        let lines = [
            ("Current tax", report.tax_before),
            ("With retirement contract", report.tax_after),
            ("Savings", report.period_savings),
        ];
        let amounts: Vec<String> = lines
            .iter()
            .map(|(_, amount)| self.currency.format(*amount))
            .collect();
        let width = amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0);

        let mut out = String::from("Tax savings summary\n");
        for ((label, _), amount) in lines.iter().zip(&amounts) {
            out.push_str(&format!("  {label:<26}{amount:>width$}  {per}\n"));
        }
        out
    }

    pub fn savings_table(
        &self,
        report: &SimulationReport,
    ) -> String {
        let rows = savings_rows(report).into_iter().map(|(period, amount)| SavingsRow {
            period,
            savings: self.currency.format(amount),
        });
        Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::single(1)).with(Alignment::right()))
            .to_string()
    }

    /// Horizontal bar chart of the 1 to 20 year projections.
    pub fn chart(
        &self,
        report: &SimulationReport,
    ) -> String {
        let projections = report.projections();
        let max = projections
            .iter()
            .map(|p| p.savings)
            .max()
            .unwrap_or(Decimal::ZERO);
        let width = self.chart_width;

        let mut out = String::from("Savings over time\n");
        for projection in &projections {
            let bar = self.bar_length(projection.savings, max);
            out.push_str(&format!(
                "  {:<9}│{}{} {}\n",
                years_label(projection.years),
                "█".repeat(bar),
                " ".repeat(width - bar),
                self.currency.format(projection.savings)
            ));
        }
        out.push_str(&format!("  {:<9}└{}\n", "", "─".repeat(width)));
        out.push_str(&format!("  {:<9}{}\n", "", self.axis(max)));
        out
    }

    /// Advisory shown when part of the contribution earned no deduction.
    pub fn truncation_note(
        &self,
        report: &SimulationReport,
    ) -> Option<String> {
        report.contribution_truncated.then(|| {
            format!(
                "Note: your contribution is limited to {} of your {} ({}).",
                format_percent(report.cap_ratio),
                report.profession.income_noun(),
                self.currency.format(report.max_contribution)
            )
        })
    }

    /// `Maximum deductible: 10.000 DH (10% of income)` while the form is
    /// being filled in; `None` until the income parses.
    pub fn cap_preview(
        &self,
        form: &SimulationForm,
    ) -> Option<String> {
        form.max_contribution_preview().map(|cap| {
            format!(
                "Maximum deductible: {} ({} of {})",
                self.currency.format(cap),
                format_percent(form.profession.cap_ratio()),
                form.profession.income_noun()
            )
        })
    }

    /// Summary, table, optional chart and the truncation note.
    pub fn render_text(
        &self,
        report: &SimulationReport,
        with_chart: bool,
    ) -> String {
        let mut out = self.summary(report);
        out.push('\n');
        out.push_str(&self.savings_table(report));
        out.push('\n');
        if with_chart {
            out.push('\n');
            out.push_str(&self.chart(report));
        }
        if let Some(note) = self.truncation_note(report) {
            out.push('\n');
            out.push_str(&note);
            out.push('\n');
        }
        out
    }

    pub fn bracket_table(
        &self,
        table: &BracketTable,
    ) -> String {
        let rows = table.brackets().iter().map(|b| BracketRow {
            from: self.currency.format(b.lower_bound),
            to: b
                .upper_bound
                .map(|u| self.currency.format(u))
                .unwrap_or_else(|| "and above".to_string()),
            rate: format_percent(b.rate),
            deduction: format!("{}{}", b.fixed_deduction, self.currency.suffix),
        });
        format!(
            "{} brackets\n{}",
            table.period().label(),
            Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        )
    }

    fn bar_length(
        &self,
        value: Decimal,
        max: Decimal,
    ) -> usize {
        if max <= Decimal::ZERO || value <= Decimal::ZERO {
            return 0;
        }
        let scaled = round_to_unit(value / max * Decimal::from(self.chart_width));
        scaled.to_usize().unwrap_or(0).min(self.chart_width)
    }

    /// `0k`, midpoint and maximum tick labels spread over the chart width.
    fn axis(
        &self,
        max: Decimal,
    ) -> String {
        let tick = |value: Decimal| format!("{}k", round_to_unit(value / Decimal::ONE_THOUSAND));
        let left = tick(Decimal::ZERO);
        let mid = tick(max / Decimal::TWO);
        let right = tick(max);
        let width = self.chart_width + 1;

        let mid_start = (width / 2).saturating_sub(mid.len() / 2).max(left.len() + 1);
        let right_start = width.saturating_sub(right.len()).max(mid_start + mid.len() + 1);

        let mut axis = left;
        axis.push_str(&" ".repeat(mid_start - axis.len()));
        axis.push_str(&mid);
        axis.push_str(&" ".repeat(right_start - axis.len()));
        axis.push_str(&right);
        axis
    }
}
