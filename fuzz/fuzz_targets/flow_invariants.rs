#![no_main]

use libfuzzer_sys::fuzz_target;
use pvflow::compute_flow;
use pvflow::input::FlowInput;

fn is_finite(input: &FlowInput) -> bool {
    [
        Some(input.basics.annual_consumption_household_kwh),
        input.basics.annual_consumption_heating_kwh,
        Some(input.basics.tariff_euro_per_kwh),
        Some(input.setup.modules),
        Some(input.setup.module_wp),
        input.setup.battery_capacity_kwh,
        Some(input.tariffs.feed_in_euro_per_kwh),
        input.annual_production_override_kwh,
        input.direct_use_override_kwh,
    ]
    .into_iter()
    .flatten()
    .all(|value| value.is_finite() && value.abs() < 1e12)
}

fuzz_target!(|input: FlowInput| {
    let result = compute_flow(&input);
    if !is_finite(&input) {
        return;
    }

    assert!(result.direct_use_kwh >= 0.);
    assert!(result.direct_use_kwh <= result.annual_production_kwh);
    assert!(result.to_battery_kwh <= result.charge_budget_kwh);
    assert!(result.from_battery_kwh <= result.to_battery_kwh);
    assert!(result.battery_surplus_kwh >= 0.);
    assert!(result.feed_in_from_production_kwh >= 0.);
    assert_eq!(
        result.grid_export_total_kwh,
        result.feed_in_from_production_kwh + result.battery_surplus_kwh
    );
    assert!(result.total_annual_benefit_euro >= 0.);
});
