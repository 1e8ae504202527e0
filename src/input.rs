use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::Read;

pub fn ingest_for_processing(json: impl Read) -> Result<FlowInput, anyhow::Error> {
    Ok(serde_json::from_reader(json)?)
}

/// Consumption and purchase tariff of the household.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct ProjectBasics {
    /// Annual household consumption in kWh
    #[serde(rename = "annualConsumptionHouseholdKWh")]
    #[validate(minimum = 0.)]
    pub annual_consumption_household_kwh: f64,
    /// Annual consumption in kWh of heating on a second meter, if any
    #[serde(
        rename = "annualConsumptionHeatingKWh",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(minimum = 0.)]
    pub annual_consumption_heating_kwh: Option<f64>,
    /// Price the household pays for grid electricity, per kWh
    #[serde(rename = "tariffEuroPerKWh")]
    #[validate(minimum = 0.)]
    pub tariff_euro_per_kwh: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct PvSetup {
    /// Number of PV modules. Fractional counts are truncated when calculating capacity.
    #[validate(minimum = 0.)]
    pub modules: f64,
    /// Nominal power of a single module in Wp
    #[serde(rename = "moduleWp")]
    #[validate(minimum = 0.)]
    pub module_wp: f64,
    /// Usable storage capacity in kWh
    #[serde(
        rename = "batteryCapacityKWh",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(minimum = 0.)]
    pub battery_capacity_kwh: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct Tariffs {
    /// Feed-in compensation per exported kWh
    #[serde(rename = "feedInEuroPerKWh")]
    #[validate(minimum = 0.)]
    pub feed_in_euro_per_kwh: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct FlowInput {
    #[validate]
    pub basics: ProjectBasics,
    #[validate]
    pub setup: PvSetup,
    #[validate]
    pub tariffs: Tariffs,
    /// Annual production in kWh. Without it production is taken as 0: there is no
    /// production model here, a realistic estimate has to be passed in.
    #[serde(
        rename = "annualProductionOverrideKWh",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(minimum = 0.)]
    pub annual_production_override_kwh: Option<f64>,
    /// Amount of the production consumed directly by the household, in kWh.
    /// Without it min(production, consumption) is used.
    #[serde(
        rename = "directUseOverrideKWh",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(minimum = 0.)]
    pub direct_use_override_kwh: Option<f64>,
}

impl FlowInput {
    /// Reject any negative number in the input. The calculation itself clamps such values to
    /// zero, so this is only for callers that want to refuse them outright.
    pub fn validate_strict(&self) -> anyhow::Result<()> {
        self.validate()
            .map_err(|errors| anyhow::anyhow!("Input failed strict validation: {errors}"))
    }
}
