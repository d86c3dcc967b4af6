//! Wiring between the configuration, the bracket tables and the renderers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::ValueEnum;
use savings_core::{BracketTables, Period, SimulationInput, SimulationReport, Simulator, default_tables};
use savings_data::BracketTableLoader;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};
use tracing::{debug, info};

use crate::config::Config;
use crate::export::DocumentExporter;
use crate::models::{FormErrors, SimulationForm};
use crate::render::ReportRenderer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Status")]
    profession: &'static str,
    #[tabled(rename = "Period")]
    period: &'static str,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Deducted")]
    contribution: String,
    #[tabled(rename = "Tax before")]
    tax_before: String,
    #[tabled(rename = "Tax after")]
    tax_after: String,
    #[tabled(rename = "Savings / year")]
    annual_savings: String,
    #[tabled(rename = "Capped")]
    capped: &'static str,
}

pub struct App {
    /// Custom schedules; `None` means the built-in tables.
    tables: Option<BracketTables>,
    renderer: ReportRenderer,
}

impl App {
    pub fn new(
        config: &Config,
        tables: Option<BracketTables>,
    ) -> Self {
        let renderer =
            ReportRenderer::new(config.display.currency_format(), config.display.chart_width);
        Self { tables, renderer }
    }

    /// Build the app, loading custom brackets from `brackets_override` or the
    /// configured file when one is set.
    pub fn load(
        config: &Config,
        brackets_override: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let file = brackets_override
            .map(Path::to_path_buf)
            .or_else(|| config.brackets.file.clone());

        let tables = match file {
            Some(path) => {
                let tables = BracketTableLoader::load_file(&path)
                    .with_context(|| format!("cannot load brackets from {}", path.display()))?;
                info!(path = %path.display(), "using custom bracket tables");
                Some(tables)
            }
            None => None,
        };

        Ok(Self::new(config, tables))
    }

    pub fn tables(&self) -> &BracketTables {
        match &self.tables {
            Some(tables) => tables,
            None => default_tables(),
        }
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    fn simulator(&self) -> Simulator<'_> {
        Simulator::new(self.tables())
    }

    /// Validate the form and run the engine on it.
    pub fn simulate(
        &self,
        form: &SimulationForm,
    ) -> Result<(SimulationInput, SimulationReport), FormErrors> {
        let input = form.validate()?;
        let report = self.simulator().simulate(&input);
        debug!(savings = %report.period_savings, "simulation complete");
        Ok((input, report))
    }

    pub fn render_report(
        &self,
        report: &SimulationReport,
        format: OutputFormat,
        with_chart: bool,
    ) -> anyhow::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.renderer.render_text(report, with_chart)),
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("cannot serialize report")
            }
        }
    }

    pub fn export(
        &self,
        dir: &Path,
        input: &SimulationInput,
        report: &SimulationReport,
        date: NaiveDate,
    ) -> anyhow::Result<PathBuf> {
        DocumentExporter::new(self.renderer.currency().clone()).write_to(dir, input, report, date)
    }

    pub fn run_batch(
        &self,
        inputs: &[SimulationInput],
    ) -> Vec<SimulationReport> {
        let simulator = self.simulator();
        let reports: Vec<SimulationReport> = inputs.iter().map(|i| simulator.simulate(i)).collect();
        info!(count = reports.len(), "batch simulated");
        reports
    }

    pub fn render_batch(
        &self,
        reports: &[SimulationReport],
        format: OutputFormat,
    ) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(reports).context("cannot serialize reports")
            }
            OutputFormat::Text => {
                let currency = self.renderer.currency();
                let rows = reports.iter().enumerate().map(|(idx, r)| BatchRow {
                    row: idx + 1,
                    profession: r.profession.label(),
                    period: r.period.label(),
                    income: currency.format(r.gross_income),
                    contribution: currency.format(r.effective_contribution),
                    tax_before: currency.format(r.tax_before),
                    tax_after: currency.format(r.tax_after),
                    annual_savings: currency.format(r.annual_savings),
                    capped: if r.contribution_truncated { "yes" } else { "no" },
                });
                Ok(Table::new(rows)
                    .with(Style::rounded())
                    .with(Modify::new(Columns::new(3..8)).with(Alignment::right()))
                    .to_string())
            }
        }
    }

    /// One period, or both when `period` is `None`.
    pub fn render_brackets(
        &self,
        period: Option<Period>,
    ) -> String {
        let periods: Vec<Period> = match period {
            Some(p) => vec![p],
            None => Period::all().to_vec(),
        };
        periods
            .into_iter()
            .map(|p| self.renderer.bracket_table(self.tables().for_period(p)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use savings_core::Profession;

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
    fn test_defaults_use_builtin_tables() {
        let app = App::new(&Config::default(), None);

        assert_eq!(app.tables(), default_tables());
    }

    #[test]
    fn test_custom_tables_take_precedence() {
        let custom = BracketTables::new(
            default_tables().monthly().clone(),
            default_tables().annual().clone(),
        )
        .unwrap();
        let app = App::new(&Config::default(), Some(custom));

        assert_eq!(app.tables().monthly().len(), 6);
        assert!(!std::ptr::eq(app.tables(), default_tables()));
    }

    #[test]
    fn test_simulate_rejects_amount_beyond_engine_range() {
        let app = App::new(&Config::default(), None);

        let errors = app
            .simulate(&form(
                Profession::Employee,
                "10000000000000000000000000000",
                "5000000000000000000000000000",
            ))
            .expect_err("oversized amounts are rejected");

        assert_eq!(
            errors.0,
            vec![
                "Taxable net salary is too large".to_string(),
                "Monthly contribution is too large".to_string(),
            ]
        );
    }

    #[test]
    fn test_load_with_missing_bracket_file_fails() {
        let result = App::load(&Config::default(), Some(Path::new("no/such/brackets.csv")));

        assert!(result.is_err());
    }

    #[test]
    fn test_simulate_valid_form() {
        let app = App::new(&Config::default(), None);

        let (input, report) = app
            .simulate(&form(Profession::Employee, "5000", "1000"))
            .expect("valid form");

        assert_eq!(input.gross_income, dec!(5000));
        assert_eq!(report.period_savings, dec!(100));
    }

    #[test]
    fn test_simulate_invalid_form_returns_errors() {
        let app = App::new(&Config::default(), None);

        let errors = app
            .simulate(&form(Profession::Employee, "", "abc"))
            .expect_err("invalid form");

        assert_eq!(errors.0.len(), 2);
    }

    #[test]
    fn test_render_report_json() {
        let app = App::new(&Config::default(), None);
        let (_, report) = app
            .simulate(&form(Profession::Employee, "5000", "1000"))
            .unwrap();

        let json = app.render_report(&report, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["profession"], "employee");
        assert_eq!(value["period"], "monthly");
        assert_eq!(value["contribution_truncated"], false);
    }

    #[test]
    fn test_render_batch_text_and_json() {
        let app = App::new(&Config::default(), None);
        let inputs = vec![
            form(Profession::Employee, "5000", "1000").validate().unwrap(),
            form(Profession::SelfEmployed, "100000", "20000").validate().unwrap(),
        ];

        let reports = app.run_batch(&inputs);
        let text = app.render_batch(&reports, OutputFormat::Text).unwrap();
        let json = app.render_batch(&reports, OutputFormat::Json).unwrap();

        assert_eq!(reports.len(), 2);
        assert!(text.contains("Self-employed"));
        assert!(text.contains("yes"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_render_brackets_both_periods() {
        let app = App::new(&Config::default(), None);

        let both = app.render_brackets(None);
        let annual = app.render_brackets(Some(Period::Annual));

        assert!(both.contains("Monthly brackets"));
        assert!(both.contains("Annual brackets"));
        assert!(!annual.contains("Monthly brackets"));
    }
}
