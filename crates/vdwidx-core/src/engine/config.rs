use crate::core::forcefield::vdw::PotentialError;
use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Unknown parameter: '{0}'")]
    UnknownParameter(String),

    #[error("Parameter '{name}' expects a {expected} value, got {actual}")]
    TypeMismatch {
        name: &'static str,
        expected: &'static str,
        actual: ParamValue,
    },

    #[error("Invalid value {value} for parameter '{name}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid potential: {0}")]
    Potential(#[from] PotentialError),
}

/// A runtime-configurable option of the van der Waals term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// Per-ligand-atom score below which an atom counts as attractive (energy units).
    AttractiveThreshold,
    /// Per-ligand-atom score above which an atom counts as repulsive (energy units).
    RepulsiveThreshold,
    /// Minimum magnitude of an annotated lipophilic contact (energy units).
    LipoAnnotation,
    /// Whether score maps carry lipophilic annotations.
    Annotate,
    /// Whether the static solvent self-interaction is served from cache.
    FastSolvent,
}

/// Recognized option names, the single source of truth for [`VdwParams::update`].
pub static PARAMETERS: Map<&'static str, ParamKey> = phf_map! {
    "threshold_attr" => ParamKey::AttractiveThreshold,
    "threshold_rep" => ParamKey::RepulsiveThreshold,
    "annotation_lipo" => ParamKey::LipoAnnotation,
    "annotate" => ParamKey::Annotate,
    "fast_solvent" => ParamKey::FastSolvent,
};

impl ParamKey {
    pub fn name(&self) -> &'static str {
        match self {
            ParamKey::AttractiveThreshold => "threshold_attr",
            ParamKey::RepulsiveThreshold => "threshold_rep",
            ParamKey::LipoAnnotation => "annotation_lipo",
            ParamKey::Annotate => "annotate",
            ParamKey::FastSolvent => "fast_solvent",
        }
    }
}

/// Value carried by a parameter update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f64),
    Bool(bool),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Runtime options of the van der Waals term.
///
/// Independent of grids and interaction lists: changing any of them takes effect on the
/// next scoring call without a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VdwParams {
    #[serde(rename = "threshold_attr")]
    attractive_threshold: f64,
    #[serde(rename = "threshold_rep")]
    repulsive_threshold: f64,
    #[serde(rename = "annotation_lipo")]
    lipo_annotation: f64,
    annotate: bool,
    fast_solvent: bool,
}

impl Default for VdwParams {
    fn default() -> Self {
        Self {
            attractive_threshold: 0.5,
            repulsive_threshold: 0.5,
            lipo_annotation: 0.5,
            annotate: true,
            fast_solvent: true,
        }
    }
}

impl VdwParams {
    pub fn attractive_threshold(&self) -> f64 {
        self.attractive_threshold
    }
    pub fn repulsive_threshold(&self) -> f64 {
        self.repulsive_threshold
    }
    pub fn lipo_annotation(&self) -> f64 {
        self.lipo_annotation
    }
    pub fn annotate(&self) -> bool {
        self.annotate
    }
    pub fn fast_solvent(&self) -> bool {
        self.fast_solvent
    }

    pub fn set_attractive_threshold(&mut self, value: f64) -> Result<(), ConfigError> {
        self.attractive_threshold = threshold(ParamKey::AttractiveThreshold, value)?;
        Ok(())
    }
    pub fn set_repulsive_threshold(&mut self, value: f64) -> Result<(), ConfigError> {
        self.repulsive_threshold = threshold(ParamKey::RepulsiveThreshold, value)?;
        Ok(())
    }
    pub fn set_lipo_annotation(&mut self, value: f64) -> Result<(), ConfigError> {
        self.lipo_annotation = threshold(ParamKey::LipoAnnotation, value)?;
        Ok(())
    }
    pub fn set_annotate(&mut self, enabled: bool) {
        self.annotate = enabled;
    }
    pub fn set_fast_solvent(&mut self, enabled: bool) {
        self.fast_solvent = enabled;
    }

    /// Applies a named option after validating name, value type and value.
    ///
    /// On error the parameters are left unchanged.
    pub fn update(&mut self, name: &str, value: ParamValue) -> Result<ParamKey, ConfigError> {
        let key = *PARAMETERS
            .get(name)
            .ok_or_else(|| ConfigError::UnknownParameter(name.to_string()))?;

        match (key, value) {
            (ParamKey::AttractiveThreshold, ParamValue::Float(v)) => {
                self.set_attractive_threshold(v)?
            }
            (ParamKey::RepulsiveThreshold, ParamValue::Float(v)) => {
                self.set_repulsive_threshold(v)?
            }
            (ParamKey::LipoAnnotation, ParamValue::Float(v)) => self.set_lipo_annotation(v)?,
            (ParamKey::Annotate, ParamValue::Bool(v)) => self.set_annotate(v),
            (ParamKey::FastSolvent, ParamValue::Bool(v)) => self.set_fast_solvent(v),
            (
                ParamKey::AttractiveThreshold
                | ParamKey::RepulsiveThreshold
                | ParamKey::LipoAnnotation,
                actual,
            ) => {
                return Err(ConfigError::TypeMismatch {
                    name: key.name(),
                    expected: "floating-point",
                    actual,
                });
            }
            (ParamKey::Annotate | ParamKey::FastSolvent, actual) => {
                return Err(ConfigError::TypeMismatch {
                    name: key.name(),
                    expected: "boolean",
                    actual,
                });
            }
        }
        Ok(key)
    }

    /// Checks every threshold, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        threshold(ParamKey::AttractiveThreshold, self.attractive_threshold)?;
        threshold(ParamKey::RepulsiveThreshold, self.repulsive_threshold)?;
        threshold(ParamKey::LipoAnnotation, self.lipo_annotation)?;
        Ok(())
    }

    pub fn get(&self, key: ParamKey) -> ParamValue {
        match key {
            ParamKey::AttractiveThreshold => self.attractive_threshold.into(),
            ParamKey::RepulsiveThreshold => self.repulsive_threshold.into(),
            ParamKey::LipoAnnotation => self.lipo_annotation.into(),
            ParamKey::Annotate => self.annotate.into(),
            ParamKey::FastSolvent => self.fast_solvent.into(),
        }
    }
}

fn threshold(key: ParamKey, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidValue {
            name: key.name(),
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(ConfigError::InvalidValue {
            name: key.name(),
            value,
            reason: "thresholds are magnitudes and must be non-negative",
        });
    }
    Ok(value)
}
