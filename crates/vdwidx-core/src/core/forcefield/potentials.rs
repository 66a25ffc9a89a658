/// Lennard-Jones 12-6 well with its minimum of `-well_depth` at `r_min`.
#[inline]
pub fn lennard_jones_12_6(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    let rho6 = (r_min / dist).powi(6);
    well_depth * (rho6 * rho6 - 2.0 * rho6)
}

#[inline]
pub fn lennard_jones_8_4(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    let rho4 = (r_min / dist).powi(4);
    well_depth * (rho4 * rho4 - 2.0 * rho4)
}

/// CHARMM-style switching function on squared distances.
///
/// Returns 1 up to `r_on`, 0 from `r_off` on, and a smooth monotone blend in between.
#[inline]
pub fn switching(dist: f64, r_on: f64, r_off: f64) -> f64 {
    if dist <= r_on {
        return 1.0;
    }
    if dist >= r_off {
        return 0.0;
    }
    let r2 = dist * dist;
    let on2 = r_on * r_on;
    let off2 = r_off * r_off;
    let denom = (off2 - on2).powi(3);
    (off2 - r2).powi(2) * (off2 + 2.0 * r2 - 3.0 * on2) / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn lennard_jones_12_6_at_minimum_distance_returns_negative_well_depth() {
        assert!(f64_approx_equal(lennard_jones_12_6(2.0, 2.0, 10.0), -10.0));
    }

    #[test]
    fn lennard_jones_8_4_at_minimum_distance_returns_negative_well_depth() {
        assert!(f64_approx_equal(lennard_jones_8_4(3.5, 3.5, 0.4), -0.4));
    }

    #[test]
    fn lennard_jones_is_repulsive_inside_minimum() {
        assert!(lennard_jones_12_6(1.5, 2.0, 1.0) > 0.0);
        assert!(lennard_jones_8_4(1.5, 2.0, 1.0) > 0.0);
    }

    #[test]
    fn switching_is_one_inside_and_zero_outside() {
        assert_eq!(switching(3.0, 4.0, 6.0), 1.0);
        assert_eq!(switching(4.0, 4.0, 6.0), 1.0);
        assert_eq!(switching(6.0, 4.0, 6.0), 0.0);
        assert_eq!(switching(7.5, 4.0, 6.0), 0.0);
    }

    #[test]
    fn switching_is_continuous_at_both_ends() {
        assert!(f64_approx_equal(switching(4.0 + 1e-9, 4.0, 6.0), 1.0));
        assert!(switching(6.0 - 1e-9, 4.0, 6.0).abs() < 1e-9);
    }

    #[test]
    fn switching_decreases_monotonically_in_blend_region() {
        let mut previous = 1.0;
        for step in 1..100 {
            let dist = 4.0 + 2.0 * step as f64 / 100.0;
            let value = switching(dist, 4.0, 6.0);
            assert!(value <= previous);
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
    }
}
