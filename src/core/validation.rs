use crate::compare_floats::{non_negative, non_negative_or};
use crate::core::capacity::calc_kwp;
use crate::input::FlowInput;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Installed capacity above which a system is considered implausibly large for a home.
pub const LARGE_SYSTEM_KWP: f64 = 100.;

/// Plausibility findings about an input. Errors describe inputs that cannot describe a real
/// project; warnings describe inputs the calculation will quietly adjust.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lines = self
            .errors
            .iter()
            .map(|error| format!("error: {error}"))
            .chain(self.warnings.iter().map(|warning| format!("warning: {warning}")))
            .collect::<Vec<_>>();
        write!(f, "{}", lines.join("; "))
    }
}

pub fn check_plausibility(input: &FlowInput) -> ValidationReport {
    let mut report = ValidationReport::default();

    let kwp = calc_kwp(input.setup.modules, input.setup.module_wp);
    if kwp <= 0. {
        report
            .errors
            .push("Installed capacity must be greater than 0 kWp".to_string());
    } else if kwp > LARGE_SYSTEM_KWP {
        report.warnings.push(format!(
            "Very large installed capacity of {kwp} kWp - please check module count and rating"
        ));
    }

    let consumption = non_negative(input.basics.annual_consumption_household_kwh)
        + non_negative_or(input.basics.annual_consumption_heating_kwh, 0.);
    if consumption <= 0. {
        report
            .errors
            .push("Annual consumption must be greater than 0 kWh".to_string());
    }

    match (
        input.annual_production_override_kwh,
        input.direct_use_override_kwh,
    ) {
        (None, Some(_)) => report.warnings.push(
            "Direct use was given without an annual production, so all flows will be 0"
                .to_string(),
        ),
        (Some(production), Some(direct_use))
            if non_negative(direct_use) > non_negative(production) =>
        {
            report.warnings.push(format!(
                "Direct use of {direct_use} kWh exceeds annual production of {production} kWh and will be capped"
            ))
        }
        _ => {}
    }

    report
}
