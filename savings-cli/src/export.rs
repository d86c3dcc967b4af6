//! Printable plain-text simulation document.
//!
//! Fixed 80-column layout, 60 lines per page, pages separated by a form
//! feed so the file prints as-is.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use savings_core::{SimulationInput, SimulationReport};
use tracing::info;

use crate::render::{CurrencyFormat, format_percent, savings_rows};

pub const PAGE_WIDTH: usize = 80;
pub const PAGE_LINES: usize = 60;
const FORM_FEED: char = '\u{000C}';

const DISCLAIMER: &str = "This simulation is provided for information only. Figures are estimates \
based on the progressive income tax schedule and do not constitute tax advice.";

#[derive(Debug, Clone, Default)]
pub struct DocumentExporter {
    currency: CurrencyFormat,
}

impl DocumentExporter {
    pub fn new(currency: CurrencyFormat) -> Self {
        Self { currency }
    }

    /// `tax-savings-simulation-DD-MM-YYYY.txt`
    pub fn file_name(date: NaiveDate) -> String {
        format!("tax-savings-simulation-{}.txt", date.format("%d-%m-%Y"))
    }

    /// Build the full document, already paginated.
    pub fn render(
        &self,
        input: &SimulationInput,
        report: &SimulationReport,
        date: NaiveDate,
    ) -> String {
        let generated = date.format("%d/%m/%Y").to_string();
        let per = report.period.per_label();
        let mut doc = Vec::new();

        // Title
        doc.push("=".repeat(PAGE_WIDTH));
        doc.push(center("Tax Savings Simulation"));
        doc.push(center("Retirement Contract"));
        doc.push(center(&format!("Generated on {generated}")));
        doc.push("=".repeat(PAGE_WIDTH));
        doc.push(String::new());

        // Personal information
        section(&mut doc, "PERSONAL INFORMATION");
        doc.push(field("Status", report.profession.label()));
        doc.push(field(
            report.profession.income_label(),
            &self.currency.format(report.gross_income),
        ));
        doc.push(field(
            &format!("{} contribution", report.period.label()),
            &self.currency.format(report.effective_contribution),
        ));
        doc.push(field(
            "Deduction limit",
            &format!(
                "{} ({})",
                format_percent(report.cap_ratio),
                self.currency.format(report.max_contribution)
            ),
        ));
        if input.requested_period != report.period {
            doc.push(field("Evaluation period", report.period.label()));
        }
        doc.push(String::new());

        // Comparison
        section(&mut doc, &format!("TAX COMPARISON ({per})"));
        doc.push(field(
            "Without retirement contract",
            &self.currency.format(report.tax_before),
        ));
        doc.push(field(
            "With retirement contract",
            &self.currency.format(report.tax_after),
        ));
        doc.push(String::new());

        // Highlighted savings
        let headline = format!(
            "YOUR TAX SAVINGS: {} {per}",
            self.currency.format(report.period_savings)
        );
        let inner = headline.chars().count() + 4;
        doc.push(center(&"*".repeat(inner + 2)));
        doc.push(center(&format!("*  {headline}  *")));
        doc.push(center(&"*".repeat(inner + 2)));
        doc.push(String::new());

        // Savings over time
        section(&mut doc, "SAVINGS OVER TIME");
        doc.push(field("Period", "Tax savings"));
        for (label, amount) in savings_rows(report) {
            doc.push(field(&label, &self.currency.format(amount)));
        }
        doc.push(String::new());

        if report.contribution_truncated {
            section(&mut doc, "NOTE");
            let note = format!(
                "Your contribution of {} exceeds the deductible limit of {} of your {}. \
                 Only {} is taken into account.",
                self.currency.format(report.proposed_contribution),
                format_percent(report.cap_ratio),
                report.profession.income_noun(),
                self.currency.format(report.max_contribution)
            );
            doc.extend(wrap(&note, PAGE_WIDTH - 2).into_iter().map(|l| format!("  {l}")));
            doc.push(String::new());
        }

        // Footer
        doc.push("-".repeat(PAGE_WIDTH));
        doc.extend(wrap(DISCLAIMER, PAGE_WIDTH));
        doc.push(format!("Document generated on {generated}"));

        paginate(&doc)
    }

    /// Write the document into `dir` (created if needed) and return its path.
    pub fn write_to(
        &self,
        dir: &Path,
        input: &SimulationInput,
        report: &SimulationReport,
        date: NaiveDate,
    ) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create export directory {}", dir.display()))?;
        let path = dir.join(Self::file_name(date));
        std::fs::write(&path, self.render(input, report, date))
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!(path = %path.display(), "exported simulation document");
        Ok(path)
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    let pad = PAGE_WIDTH.saturating_sub(len) / 2;
    format!("{}{text}", " ".repeat(pad))
}

fn section(
    doc: &mut Vec<String>,
    title: &str,
) {
    doc.push(title.to_string());
    doc.push("-".repeat(PAGE_WIDTH));
}

/// `  label ......... value` right-aligned to the page width.
fn field(
    label: &str,
    value: &str,
) -> String {
    let used = 2 + label.chars().count() + value.chars().count();
    let gap = PAGE_WIDTH.saturating_sub(used).max(1);
    format!("  {label}{}{value}", " ".repeat(gap))
}

/// Greedy word wrap. Words longer than `width` are left whole.
fn wrap(
    text: &str,
    width: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split into pages of [`PAGE_LINES`] lines, the last of which is a
/// `Page n of m` marker.
fn paginate(lines: &[String]) -> String {
    let body = PAGE_LINES - 1;
    let chunks: Vec<&[String]> = lines.chunks(body).collect();
    let total = chunks.len().max(1);

    let pages: Vec<String> = chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| {
            let marker = format!("Page {} of {total}", idx + 1);
            let mut page = chunk.join("\n");
            page.push('\n');
            page.push_str(&format!("{marker:>PAGE_WIDTH$}\n"));
            page
        })
        .collect();

    pages.join(&FORM_FEED.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use savings_core::{Period, Profession, simulate};

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).expect("valid date")
    }

    fn employee() -> (SimulationInput, SimulationReport) {
        let input = SimulationInput {
            gross_income: dec!(5000),
            proposed_contribution: dec!(1000),
            profession: Profession::Employee,
            requested_period: Period::Monthly,
        };
        let report = simulate(&input);
        (input, report)
    }

    fn self_employed() -> (SimulationInput, SimulationReport) {
        let input = SimulationInput {
            gross_income: dec!(100000),
            proposed_contribution: dec!(20000),
            profession: Profession::SelfEmployed,
            requested_period: Period::Monthly,
        };
        let report = simulate(&input);
        (input, report)
    }

    #[test]
    fn test_file_name_uses_day_month_year() {
        assert_eq!(
            DocumentExporter::file_name(date()),
            "tax-savings-simulation-07-03-2026.txt"
        );
    }

    #[test]
    fn test_render_employee_document() {
        let (input, report) = employee();

        let doc = DocumentExporter::default().render(&input, &report, date());

        assert!(doc.contains("Tax Savings Simulation"));
        assert!(doc.contains("Retirement Contract"));
        assert!(doc.contains("Generated on 07/03/2026"));
        assert!(doc.contains("Taxable net salary"));
        assert!(doc.contains("50% (2.500 DH)"));
        assert!(doc.contains("YOUR TAX SAVINGS: 100 DH per month"));
        assert!(doc.contains("Over 20 years"));
        assert!(doc.contains("24.000 DH"));
        assert!(!doc.contains("NOTE"));
        assert!(!doc.contains("Evaluation period"));
    }

    #[test]
    fn test_render_truncated_self_employed_document() {
        let (input, report) = self_employed();

        let doc = DocumentExporter::default().render(&input, &report, date());

        assert!(doc.contains("Global taxable income"));
        assert!(doc.contains("10% (10.000 DH)"));
        assert!(doc.contains("Annual contribution"));
        assert!(doc.contains("Evaluation period"));
        assert!(doc.contains("NOTE"));
        assert!(doc.contains("YOUR TAX SAVINGS: 3.000 DH per year"));
    }

    #[test]
    fn test_render_fits_one_page_and_width() {
        let (input, report) = self_employed();

        let doc = DocumentExporter::default().render(&input, &report, date());

        assert!(!doc.contains(FORM_FEED));
        assert!(doc.lines().count() <= PAGE_LINES);
        assert!(doc.lines().all(|l| l.chars().count() <= PAGE_WIDTH));
        assert!(doc.trim_end().ends_with("Page 1 of 1"));
    }

    #[test]
    fn test_paginate_splits_with_form_feed() {
        let lines: Vec<String> = (0..130).map(|i| format!("line {i}")).collect();

        let doc = paginate(&lines);
        let pages: Vec<&str> = doc.split(FORM_FEED).collect();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines().count(), PAGE_LINES);
        assert!(pages[2].trim_end().ends_with("Page 3 of 3"));
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap(DISCLAIMER, 40);

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
        assert_eq!(lines.join(" "), DISCLAIMER.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_write_to_creates_file() {
        let dir = std::env::temp_dir().join(format!("savings-export-{}", std::process::id()));
        let (input, report) = employee();

        let path = DocumentExporter::default()
            .write_to(&dir, &input, &report, date())
            .expect("export should succeed");

        assert_eq!(path, dir.join("tax-savings-simulation-07-03-2026.txt"));
        let written = std::fs::read_to_string(&path).expect("file should exist");
        assert!(written.contains("Tax Savings Simulation"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
