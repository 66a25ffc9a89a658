use super::potentials;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum PotentialError {
    #[error("Invalid value {value} for potential parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Switching onset {switch_on} must be smaller than the cutoff {cutoff}")]
    SwitchBeyondCutoff { switch_on: f64, cutoff: f64 },
}

/// Exponent pair of the n-m well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VdwExponents {
    /// Classic Lennard-Jones 12-6 well.
    #[default]
    SixTwelve,
    /// Softer 8-4 well, more tolerant of close contacts in docking.
    FourEight,
}

/// The pairwise van der Waals potential.
///
/// A pure function of interatomic distance and the two atomic radii. The well minimum
/// sits at the sum of the radii, repulsion is capped, and a switching function takes
/// the energy smoothly to zero at the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdwPotential {
    well_depth: f64,
    exponents: VdwExponents,
    switch_on: f64,
    cutoff: f64,
    min_separation: f64,
    max_repulsion: f64,
}

impl Default for VdwPotential {
    fn default() -> Self {
        Self {
            well_depth: 0.2,
            exponents: VdwExponents::SixTwelve,
            switch_on: 5.0,
            cutoff: 6.0,
            min_separation: 0.1,
            max_repulsion: 10.0,
        }
    }
}

impl VdwPotential {
    pub fn builder() -> VdwPotentialBuilder {
        VdwPotentialBuilder::new()
    }

    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    pub fn switch_on(&self) -> f64 {
        self.switch_on
    }

    #[inline]
    pub fn well_depth(&self) -> f64 {
        self.well_depth
    }

    #[inline]
    pub fn exponents(&self) -> VdwExponents {
        self.exponents
    }

    /// Evaluates the pair energy.
    ///
    /// Returns exactly zero beyond the cutoff. Distances below `min_separation`,
    /// including coincident atoms, are clamped so the result is always finite.
    #[inline]
    pub fn evaluate(&self, distance: f64, radius_a: f64, radius_b: f64) -> f64 {
        if distance > self.cutoff {
            return 0.0;
        }
        let r = distance.max(self.min_separation);
        let r_min = radius_a + radius_b;
        let well = match self.exponents {
            VdwExponents::SixTwelve => potentials::lennard_jones_12_6(r, r_min, self.well_depth),
            VdwExponents::FourEight => potentials::lennard_jones_8_4(r, r_min, self.well_depth),
        };
        well.min(self.max_repulsion) * potentials::switching(r, self.switch_on, self.cutoff)
    }
}

#[derive(Default)]
pub struct VdwPotentialBuilder {
    well_depth: Option<f64>,
    exponents: Option<VdwExponents>,
    switch_on: Option<f64>,
    cutoff: Option<f64>,
    min_separation: Option<f64>,
    max_repulsion: Option<f64>,
}

impl VdwPotentialBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn well_depth(mut self, depth: f64) -> Self {
        self.well_depth = Some(depth);
        self
    }
    pub fn exponents(mut self, exponents: VdwExponents) -> Self {
        self.exponents = Some(exponents);
        self
    }
    pub fn switch_on(mut self, distance: f64) -> Self {
        self.switch_on = Some(distance);
        self
    }
    pub fn cutoff(mut self, distance: f64) -> Self {
        self.cutoff = Some(distance);
        self
    }
    pub fn min_separation(mut self, distance: f64) -> Self {
        self.min_separation = Some(distance);
        self
    }
    pub fn max_repulsion(mut self, energy: f64) -> Self {
        self.max_repulsion = Some(energy);
        self
    }

    /// Builds the potential, filling unset values from [`VdwPotential::default`].
    pub fn build(self) -> Result<VdwPotential, PotentialError> {
        let defaults = VdwPotential::default();
        let potential = VdwPotential {
            well_depth: self.well_depth.unwrap_or(defaults.well_depth),
            exponents: self.exponents.unwrap_or(defaults.exponents),
            switch_on: self.switch_on.unwrap_or(defaults.switch_on),
            cutoff: self.cutoff.unwrap_or(defaults.cutoff),
            min_separation: self.min_separation.unwrap_or(defaults.min_separation),
            max_repulsion: self.max_repulsion.unwrap_or(defaults.max_repulsion),
        };

        positive("well_depth", potential.well_depth)?;
        positive("cutoff", potential.cutoff)?;
        positive("min_separation", potential.min_separation)?;
        positive("max_repulsion", potential.max_repulsion)?;
        if !potential.switch_on.is_finite() || potential.switch_on < 0.0 {
            return Err(PotentialError::InvalidParameter {
                name: "switch_on",
                value: potential.switch_on,
                reason: "must be finite and non-negative",
            });
        }
        if potential.switch_on >= potential.cutoff {
            return Err(PotentialError::SwitchBeyondCutoff {
                switch_on: potential.switch_on,
                cutoff: potential.cutoff,
            });
        }
        Ok(potential)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), PotentialError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PotentialError::InvalidParameter {
            name,
            value,
            reason: "must be finite and positive",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn unit_potential() -> VdwPotential {
        VdwPotential::builder()
            .well_depth(1.0)
            .switch_on(3.0)
            .cutoff(4.0)
            .max_repulsion(1e6)
            .build()
            .unwrap()
    }

    #[test]
    fn evaluate_at_radius_sum_returns_negative_well_depth() {
        let potential = unit_potential();
        assert!(f64_approx_equal(potential.evaluate(2.0, 1.0, 1.0), -1.0));
    }

    #[test]
    fn evaluate_beyond_cutoff_is_exactly_zero() {
        let potential = unit_potential();
        assert_eq!(potential.evaluate(5.0, 1.0, 1.0), 0.0);
        assert_eq!(potential.evaluate(4.0 + 1e-12, 1.0, 1.0), 0.0);
    }

    #[test]
    fn evaluate_is_continuous_at_cutoff() {
        let potential = unit_potential();
        assert_eq!(potential.evaluate(4.0, 1.0, 1.0), 0.0);
        assert!(potential.evaluate(4.0 - 1e-7, 1.0, 1.0).abs() < 1e-6);
    }

    #[test]
    fn evaluate_at_zero_distance_is_finite_and_capped() {
        let potential = VdwPotential::default();
        let energy = potential.evaluate(0.0, 1.8, 1.9);
        assert!(energy.is_finite());
        assert!(f64_approx_equal(energy, 10.0));
    }

    #[test]
    fn evaluate_uses_softer_well_for_four_eight_exponents() {
        let hard = unit_potential();
        let soft = VdwPotential::builder()
            .well_depth(1.0)
            .exponents(VdwExponents::FourEight)
            .switch_on(3.0)
            .cutoff(4.0)
            .max_repulsion(1e6)
            .build()
            .unwrap();
        assert!(soft.evaluate(1.6, 1.0, 1.0) < hard.evaluate(1.6, 1.0, 1.0));
        assert!(f64_approx_equal(soft.evaluate(2.0, 1.0, 1.0), -1.0));
    }

    #[test]
    fn build_fills_defaults() {
        let potential = VdwPotential::builder().build().unwrap();
        assert_eq!(potential, VdwPotential::default());
    }

    #[test]
    fn build_rejects_switch_onset_at_or_beyond_cutoff() {
        let result = VdwPotential::builder().switch_on(6.0).cutoff(6.0).build();
        assert!(matches!(
            result,
            Err(PotentialError::SwitchBeyondCutoff { .. })
        ));
    }

    #[test]
    fn build_rejects_non_positive_values() {
        assert!(matches!(
            VdwPotential::builder().well_depth(0.0).build(),
            Err(PotentialError::InvalidParameter {
                name: "well_depth",
                ..
            })
        ));
        assert!(matches!(
            VdwPotential::builder().cutoff(f64::NAN).build(),
            Err(PotentialError::InvalidParameter { name: "cutoff", .. })
        ));
        assert!(matches!(
            VdwPotential::builder().switch_on(-1.0).build(),
            Err(PotentialError::InvalidParameter {
                name: "switch_on",
                ..
            })
        ));
    }
}
