mod compare_floats;
pub mod core;
pub mod errors;
pub mod input;
pub mod output;

pub use crate::core::capacity::calc_kwp;
pub use crate::core::flow::{
    compute_flow, compute_flow_with_assumptions, FlowAssumptions, FlowResult,
};
use crate::core::validation::{check_plausibility, ValidationReport};
use crate::errors::{PostprocessingError, PvFlowError};
use crate::input::{ingest_for_processing, FlowInput};
use crate::output::Output;
use bitflags::bitflags;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::{Read, Write};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, info, warn};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ProjectFlags: u32 {
        /// Reject negative numbers and fail on plausibility errors instead of clamping and logging.
        const STRICT_VALIDATION = 0b1;
        const WRITE_CSV = 0b10;
        const WRITE_JSON = 0b100;
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRunResults {
    pub input: FlowInput,
    pub result: FlowResult,
    pub report: ValidationReport,
}

pub fn run_project(
    input: impl Read,
    output: impl Output,
    assumptions: Option<FlowAssumptions>,
    flags: &ProjectFlags,
) -> Result<FlowRunResults, PvFlowError> {
    let input = ingest_for_processing(input)?;
    let strict = flags.contains(ProjectFlags::STRICT_VALIDATION);

    if strict {
        input.validate_strict()?;
    }

    let report = check_plausibility(&input);
    for error in &report.errors {
        warn!("Plausibility error: {error}");
    }
    for warning in &report.warnings {
        warn!("Plausibility warning: {warning}");
    }
    if strict && report.has_errors() {
        return Err(PvFlowError::FailedValidation(report));
    }

    let assumptions = assumptions.unwrap_or_default();
    debug!(
        "Calculating flows with {} annual battery cycles",
        assumptions.battery_annual_cycles
    );
    let result = compute_flow_with_assumptions(&input, &assumptions);
    info!(
        "Calculated {} kWh production for {} kWp, total annual benefit {}",
        result.annual_production_kwh, result.kwp, result.total_annual_benefit_euro
    );

    if !output.is_noop() {
        if flags.contains(ProjectFlags::WRITE_CSV) {
            write_core_output_file(&output, "results", &result).map_err(PostprocessingError::new)?;
        }
        if flags.contains(ProjectFlags::WRITE_JSON) {
            write_json_output_file(&output, "results", &result).map_err(PostprocessingError::new)?;
        }
    }

    Ok(FlowRunResults {
        input,
        result,
        report,
    })
}

/// Columns of the results file, in output order.
#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq)]
pub enum FlowResultField {
    #[strum(serialize = "Installed capacity")]
    InstalledCapacity,
    #[strum(serialize = "Annual consumption")]
    AnnualConsumption,
    #[strum(serialize = "Annual production")]
    AnnualProduction,
    #[strum(serialize = "Direct use")]
    DirectUse,
    #[strum(serialize = "Battery charge budget")]
    ChargeBudget,
    #[strum(serialize = "Remaining after direct use")]
    RemainingAfterDirect,
    #[strum(serialize = "To battery")]
    ToBattery,
    #[strum(serialize = "From battery")]
    FromBattery,
    #[strum(serialize = "Battery surplus")]
    BatterySurplus,
    #[strum(serialize = "Feed-in from production")]
    FeedInFromProduction,
    #[strum(serialize = "Grid export total")]
    GridExportTotal,
    #[strum(serialize = "Savings from direct use")]
    SavingsDirect,
    #[strum(serialize = "Savings from battery")]
    SavingsFromBattery,
    #[strum(serialize = "Feed-in revenue")]
    RevenueFeedIn,
    #[strum(serialize = "Battery export revenue")]
    RevenueBatteryExport,
    #[strum(serialize = "Total annual benefit")]
    TotalAnnualBenefit,
}

impl FlowResultField {
    pub fn units(&self) -> &'static str {
        match self {
            Self::InstalledCapacity => "[kWp]",
            Self::SavingsDirect
            | Self::SavingsFromBattery
            | Self::RevenueFeedIn
            | Self::RevenueBatteryExport
            | Self::TotalAnnualBenefit => "[currency]",
            _ => "[kWh]",
        }
    }

    pub fn value(&self, result: &FlowResult) -> f64 {
        match self {
            Self::InstalledCapacity => result.kwp,
            Self::AnnualConsumption => result.annual_consumption_kwh,
            Self::AnnualProduction => result.annual_production_kwh,
            Self::DirectUse => result.direct_use_kwh,
            Self::ChargeBudget => result.charge_budget_kwh,
            Self::RemainingAfterDirect => result.remaining_after_direct_kwh,
            Self::ToBattery => result.to_battery_kwh,
            Self::FromBattery => result.from_battery_kwh,
            Self::BatterySurplus => result.battery_surplus_kwh,
            Self::FeedInFromProduction => result.feed_in_from_production_kwh,
            Self::GridExportTotal => result.grid_export_total_kwh,
            Self::SavingsDirect => result.savings_direct_euro,
            Self::SavingsFromBattery => result.savings_from_battery_euro,
            Self::RevenueFeedIn => result.revenue_feed_in_euro,
            Self::RevenueBatteryExport => result.revenue_battery_export_euro,
            Self::TotalAnnualBenefit => result.total_annual_benefit_euro,
        }
    }
}

fn write_core_output_file(
    output: &impl Output,
    output_key: &str,
    result: &FlowResult,
) -> anyhow::Result<()> {
    debug!("writing out to {output_key}.csv");
    let writer = output.writer_for_location_key(output_key, "csv")?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record(FlowResultField::iter().map(|field| field.to_string()))?;
    writer.write_record(FlowResultField::iter().map(|field| field.units()))?;
    writer.write_record(FlowResultField::iter().map(|field| field.value(result).to_string()))?;

    writer.flush()?;

    Ok(())
}

fn write_json_output_file(
    output: &impl Output,
    output_key: &str,
    result: &FlowResult,
) -> anyhow::Result<()> {
    debug!("writing out to {output_key}.json");
    let mut writer = output.writer_for_location_key(output_key, "json")?;
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SinkOutput;
    use approx::assert_relative_eq;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::BTreeMap;
    use std::fs::File;
    use std::io::{self, Cursor};
    use std::sync::Arc;
    use walkdir::WalkDir;

    /// Keeps every "file" written in memory, keyed by `{location_key}.{file_extension}`.
    #[derive(Clone, Debug, Default)]
    struct MemoryOutput(Arc<Mutex<BTreeMap<String, Vec<u8>>>>);

    impl MemoryOutput {
        fn file(&self, name: &str) -> Option<String> {
            self.0
                .lock()
                .get(name)
                .map(|bytes| String::from_utf8(bytes.clone()).unwrap())
        }
    }

    struct MemoryWriter {
        files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
        name: String,
    }

    impl Write for MemoryWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.files
                .lock()
                .entry(self.name.clone())
                .or_default()
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Output for MemoryOutput {
        fn writer_for_location_key(
            &self,
            location_key: &str,
            file_extension: &str,
        ) -> anyhow::Result<impl Write> {
            Ok(MemoryWriter {
                files: self.0.clone(),
                name: format!("{location_key}.{file_extension}"),
            })
        }
    }

    #[fixture]
    fn demo_json() -> &'static str {
        r#"{
            "basics": {
                "annualConsumptionHouseholdKWh": 3500,
                "annualConsumptionHeatingKWh": 0,
                "tariffEuroPerKWh": 0.27
            },
            "setup": {"modules": 20, "moduleWp": 440, "batteryCapacityKWh": 6.6},
            "tariffs": {"feedInEuroPerKWh": 0.0786},
            "annualProductionOverrideKWh": 9077
        }"#
    }

    #[rstest]
    fn should_run_project_and_write_csv_and_json(demo_json: &str) {
        let output = MemoryOutput::default();
        let results = run_project(
            Cursor::new(demo_json),
            output.clone(),
            None,
            &(ProjectFlags::WRITE_CSV | ProjectFlags::WRITE_JSON),
        )
        .unwrap();

        assert_relative_eq!(results.result.kwp, 8.8);
        assert_relative_eq!(
            results.result.total_annual_benefit_euro,
            1383.3522,
            max_relative = 1e-9
        );
        assert!(results.report.is_clean());

        let csv = output.file("results.csv").unwrap();
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Installed capacity,Annual consumption,Annual production"));
        assert!(lines[1].starts_with("[kWp],[kWh],[kWh]"));
        assert!(lines[2].starts_with("8.8,3500,9077,3500,"));
        assert_eq!(
            lines[0].split(',').count(),
            FlowResultField::iter().count()
        );

        let json: FlowResult =
            serde_json::from_str(&output.file("results.json").unwrap()).unwrap();
        assert_eq!(json.direct_use_kwh, 3500.);
        assert_relative_eq!(
            json.total_annual_benefit_euro,
            results.result.total_annual_benefit_euro,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn should_only_write_requested_outputs(demo_json: &str) {
        let output = MemoryOutput::default();
        run_project(
            Cursor::new(demo_json),
            output.clone(),
            None,
            &ProjectFlags::WRITE_JSON,
        )
        .unwrap();

        assert!(output.file("results.csv").is_none());
        assert!(output.file("results.json").is_some());
    }

    #[rstest]
    fn should_apply_given_assumptions(demo_json: &str) {
        let results = run_project(
            Cursor::new(demo_json),
            SinkOutput,
            Some(FlowAssumptions {
                battery_annual_cycles: 0.,
            }),
            &ProjectFlags::empty(),
        )
        .unwrap();

        assert_eq!(results.result.to_battery_kwh, 0.);
        assert_eq!(results.result.feed_in_from_production_kwh, 5577.);
    }

    #[rstest]
    fn should_fail_for_invalid_json() {
        let result = run_project(
            Cursor::new("{\"basics\": "),
            SinkOutput,
            None,
            &ProjectFlags::empty(),
        );
        assert!(matches!(result, Err(PvFlowError::InvalidRequest(_))));
    }

    #[rstest]
    fn should_clamp_negative_values_when_not_strict() {
        let json = r#"{
            "basics": {"annualConsumptionHouseholdKWh": -3500, "tariffEuroPerKWh": 0.27},
            "setup": {"modules": 20, "moduleWp": 440},
            "tariffs": {"feedInEuroPerKWh": 0.0786},
            "annualProductionOverrideKWh": 9077
        }"#;
        let results =
            run_project(Cursor::new(json), SinkOutput, None, &ProjectFlags::empty()).unwrap();

        assert_eq!(results.result.annual_consumption_kwh, 0.);
        assert_eq!(results.result.feed_in_from_production_kwh, 9077.);
        assert!(results.report.has_errors());
    }

    #[rstest]
    fn should_reject_negative_values_when_strict() {
        let json = r#"{
            "basics": {"annualConsumptionHouseholdKWh": -3500, "tariffEuroPerKWh": 0.27},
            "setup": {"modules": 20, "moduleWp": 440},
            "tariffs": {"feedInEuroPerKWh": 0.0786}
        }"#;
        let result = run_project(
            Cursor::new(json),
            SinkOutput,
            None,
            &ProjectFlags::STRICT_VALIDATION,
        );
        assert!(matches!(result, Err(PvFlowError::InvalidRequest(_))));
    }

    #[rstest]
    fn should_fail_plausibility_errors_when_strict() {
        let json = r#"{
            "basics": {"annualConsumptionHouseholdKWh": 3500, "tariffEuroPerKWh": 0.27},
            "setup": {"modules": 0, "moduleWp": 440},
            "tariffs": {"feedInEuroPerKWh": 0.0786}
        }"#;
        let result = run_project(
            Cursor::new(json),
            SinkOutput,
            None,
            &ProjectFlags::STRICT_VALIDATION,
        );
        match result {
            Err(PvFlowError::FailedValidation(report)) => assert_eq!(report.errors.len(), 1),
            other => panic!("expected a failed validation, got {other:?}"),
        }
    }

    #[rstest]
    fn should_run_all_demo_files() {
        for entry in WalkDir::new("./demos/input")
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| {
                !e.file_type().is_dir() && e.file_name().to_str().unwrap().ends_with("json")
            })
        {
            let results = run_project(
                File::open(entry.path()).unwrap(),
                SinkOutput,
                None,
                &ProjectFlags::empty(),
            );
            assert!(
                results.is_ok(),
                "error was {:?} when running file {}",
                results.err().unwrap(),
                entry.file_name().to_str().unwrap()
            );
        }
    }
}
