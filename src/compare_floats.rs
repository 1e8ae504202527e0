pub fn min_of_2<T: PartialOrd + Copy>(first: T, second: T) -> T {
    if first < second {
        first
    } else {
        second
    }
}

pub fn max_of_2<T: PartialOrd + Copy>(first: T, second: T) -> T {
    if first > second {
        first
    } else {
        second
    }
}

/// Clamp a value to be non-negative. NaN is treated as zero, mirroring how the form layer maps
/// unparsable text to 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.
    } else {
        max_of_2(value, 0.)
    }
}

/// Clamp an optional value to be non-negative, falling back to the given default when absent.
pub(crate) fn non_negative_or(value: Option<f64>, default: f64) -> f64 {
    non_negative(value.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_calc_2_as_min_of_4_and_2_floats() {
        assert_eq!(min_of_2(4., 2.), 2.);
    }

    #[rstest]
    fn should_calc_4_as_max_of_4_and_2_floats() {
        assert_eq!(max_of_2(4., 2.), 4.);
    }

    #[rstest]
    #[case(5.5, 5.5)]
    #[case(0., 0.)]
    #[case(-0.1, 0.)]
    #[case(-3500., 0.)]
    #[case(f64::NAN, 0.)]
    #[case(f64::INFINITY, f64::INFINITY)]
    #[case(f64::NEG_INFINITY, 0.)]
    fn should_clamp_to_non_negative(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(non_negative(value), expected);
    }

    #[rstest]
    fn should_use_default_when_absent() {
        assert_eq!(non_negative_or(None, 0.), 0.);
        assert_eq!(non_negative_or(None, 42.), 42.);
        assert_eq!(non_negative_or(Some(-1.), 42.), 0.);
        assert_eq!(non_negative_or(Some(7.), 42.), 7.);
    }
}
