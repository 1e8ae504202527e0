pub const WATTS_PER_KILOWATT: u32 = 1_000;

/// Annual charge allowance of a battery expressed as a multiple of its usable capacity.
/// The battery is not simulated cycle by cycle: one "cycle" per day on 300 days of the year.
pub const BATTERY_ANNUAL_CYCLES: f64 = 300.;

pub(crate) fn watts_to_kilowatts(watts: f64) -> f64 {
    watts / WATTS_PER_KILOWATT as f64
}
