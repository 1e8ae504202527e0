use crate::compare_floats::non_negative;
use crate::core::units::watts_to_kilowatts;

/// Installed capacity in kWp of an array of `module_count` modules each rated at
/// `module_watt_peak` Wp.
///
/// Negative (and NaN) inputs are clamped to zero rather than rejected, and a fractional module
/// count is truncated toward zero.
pub fn calc_kwp(module_count: f64, module_watt_peak: f64) -> f64 {
    let modules = non_negative(module_count).trunc();
    let watt_peak = non_negative(module_watt_peak);

    watts_to_kilowatts(modules * watt_peak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_calc_kwp_for_twenty_440_wp_modules() {
        assert_relative_eq!(calc_kwp(20., 440.), 8.8);
    }

    #[rstest]
    #[case(0., 440.)]
    #[case(20., 0.)]
    #[case(-4., 440.)]
    #[case(20., -440.)]
    #[case(f64::NAN, 440.)]
    #[case(0.9, 440.)]
    fn should_calc_zero_kwp(#[case] module_count: f64, #[case] module_watt_peak: f64) {
        assert_eq!(calc_kwp(module_count, module_watt_peak), 0.);
    }

    #[rstest]
    #[case(12.7, 400., 4.8)]
    #[case(12.2, 400., 4.8)]
    #[case(1.999, 1000., 1.)]
    fn should_truncate_fractional_module_counts(
        #[case] module_count: f64,
        #[case] module_watt_peak: f64,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(calc_kwp(module_count, module_watt_peak), expected);
    }

    #[rstest]
    #[case(1, 300.)]
    #[case(7, 415.)]
    #[case(20, 440.)]
    #[case(48, 375.5)]
    #[case(250, 450.)]
    fn should_scale_linearly_with_module_count(#[case] module_count: u32, #[case] watt_peak: f64) {
        let n = module_count as f64;
        assert_relative_eq!(calc_kwp(2. * n, watt_peak), 2. * calc_kwp(n, watt_peak));
        assert_relative_eq!(calc_kwp(n, watt_peak), n * watt_peak / 1000.);
    }
}
