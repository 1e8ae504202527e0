use crate::compare_floats::{max_of_2, min_of_2, non_negative, non_negative_or};
use crate::core::capacity::calc_kwp;
use crate::core::units::BATTERY_ANNUAL_CYCLES;
use crate::input::{FlowInput, ProjectBasics};
use serde::{Deserialize, Serialize};

/// Fixed modelling assumptions applied to every calculation.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlowAssumptions {
    /// Multiplier turning usable battery capacity into the annual charge budget
    pub battery_annual_cycles: f64,
}

impl Default for FlowAssumptions {
    fn default() -> Self {
        Self {
            battery_annual_cycles: BATTERY_ANNUAL_CYCLES,
        }
    }
}

/// Annual energy (kWh) and money (per the tariffs' currency) flows of a PV system.
///
/// No rounding is applied; formatting for display is left to the caller.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FlowResult {
    #[serde(rename = "kWp")]
    pub kwp: f64,
    #[serde(rename = "annualConsumptionKWh")]
    pub annual_consumption_kwh: f64,
    #[serde(rename = "annualProductionKWh")]
    pub annual_production_kwh: f64,

    #[serde(rename = "directUseKWh")]
    pub direct_use_kwh: f64,
    /// maximum energy the battery may absorb over the year
    #[serde(rename = "chargeBudgetKWh")]
    pub charge_budget_kwh: f64,
    #[serde(rename = "remainingAfterDirectKWh")]
    pub remaining_after_direct_kwh: f64,
    #[serde(rename = "toBatteryKWh")]
    pub to_battery_kwh: f64,
    #[serde(rename = "fromBatteryKWh")]
    pub from_battery_kwh: f64,
    /// charged into the battery but not drawn back by the household, so exported
    #[serde(rename = "batterySurplusKWh")]
    pub battery_surplus_kwh: f64,
    /// exported straight from production without passing through the battery
    #[serde(rename = "feedInFromProductionKWh")]
    pub feed_in_from_production_kwh: f64,
    #[serde(rename = "gridExportTotalKWh")]
    pub grid_export_total_kwh: f64,

    #[serde(rename = "savingsDirectEuro")]
    pub savings_direct_euro: f64,
    #[serde(rename = "savingsFromBatteryEuro")]
    pub savings_from_battery_euro: f64,
    #[serde(rename = "revenueFeedInEuro")]
    pub revenue_feed_in_euro: f64,
    #[serde(rename = "revenueBatteryExportEuro")]
    pub revenue_battery_export_euro: f64,
    #[serde(rename = "totalAnnualBenefitEuro")]
    pub total_annual_benefit_euro: f64,
}

fn sum_annual_consumption(basics: &ProjectBasics) -> f64 {
    non_negative(basics.annual_consumption_household_kwh)
        + non_negative_or(basics.annual_consumption_heating_kwh, 0.)
}

/// Calculate the annual flows using the default assumptions.
pub fn compute_flow(input: &FlowInput) -> FlowResult {
    compute_flow_with_assumptions(input, &FlowAssumptions::default())
}

/// Calculate the annual flows of a PV system with optional battery.
///
/// Malformed values never cause a failure: negative and NaN numbers are clamped to zero and
/// absent optional values take their defaults.
pub fn compute_flow_with_assumptions(
    input: &FlowInput,
    assumptions: &FlowAssumptions,
) -> FlowResult {
    let FlowInput {
        basics,
        setup,
        tariffs,
        annual_production_override_kwh,
        direct_use_override_kwh,
    } = input;

    let kwp = calc_kwp(setup.modules, setup.module_wp);

    let consumption = sum_annual_consumption(basics);
    let annual_production = non_negative_or(*annual_production_override_kwh, 0.);

    let direct_use = match direct_use_override_kwh {
        Some(direct_use) => min_of_2(non_negative(*direct_use), annual_production),
        None => min_of_2(annual_production, consumption),
    };

    let charge_budget = non_negative(
        non_negative_or(setup.battery_capacity_kwh, 0.)
            * non_negative(assumptions.battery_annual_cycles),
    );
    let remaining_after_direct = max_of_2(annual_production - direct_use, 0.);

    let to_battery = min_of_2(remaining_after_direct, charge_budget);
    let from_battery = min_of_2(to_battery, max_of_2(consumption - direct_use, 0.));
    let battery_surplus = max_of_2(to_battery - from_battery, 0.);

    let feed_in_from_production = max_of_2(annual_production - direct_use - to_battery, 0.);
    let grid_export_total = feed_in_from_production + battery_surplus;

    let grid_tariff = non_negative(basics.tariff_euro_per_kwh);
    let feed_in_tariff = non_negative(tariffs.feed_in_euro_per_kwh);

    let savings_direct_euro = direct_use * grid_tariff;
    let savings_from_battery_euro = from_battery * grid_tariff;
    let revenue_feed_in_euro = feed_in_from_production * feed_in_tariff;
    let revenue_battery_export_euro = battery_surplus * feed_in_tariff;
    let total_annual_benefit_euro = savings_direct_euro
        + savings_from_battery_euro
        + revenue_feed_in_euro
        + revenue_battery_export_euro;

    FlowResult {
        kwp,
        annual_consumption_kwh: consumption,
        annual_production_kwh: annual_production,
        direct_use_kwh: direct_use,
        charge_budget_kwh: charge_budget,
        remaining_after_direct_kwh: remaining_after_direct,
        to_battery_kwh: to_battery,
        from_battery_kwh: from_battery,
        battery_surplus_kwh: battery_surplus,
        feed_in_from_production_kwh: feed_in_from_production,
        grid_export_total_kwh: grid_export_total,
        savings_direct_euro,
        savings_from_battery_euro,
        revenue_feed_in_euro,
        revenue_battery_export_euro,
        total_annual_benefit_euro,
    }
}
