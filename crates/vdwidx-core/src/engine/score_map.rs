use super::aggregator::ThresholdCounters;
use super::annotation::ResidueAnnotation;
use super::partition::Category;
use crate::core::forcefield::term::ScoreBreakdown;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Score(f64),
    Count(usize),
    Annotations(Vec<ResidueAnnotation>),
}

/// Named scoring results under the term's instance name.
///
/// Keys are `{name}` for the total and `{name}.{suffix}` for sub-scores, counters and
/// annotations.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ScoreMap {
    entries: BTreeMap<String, ScoreValue>,
}

pub const NATTR_SUFFIX: &str = "nattr";
pub const NREP_SUFFIX: &str = "nrep";
pub const ANNOTATIONS_SUFFIX: &str = "annotations";

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_outcome(
        name: &str,
        breakdown: &ScoreBreakdown,
        counters: &ThresholdCounters,
        annotations: Option<Vec<ResidueAnnotation>>,
    ) -> Self {
        let mut map = Self::new();
        map.insert(name.to_string(), ScoreValue::Score(breakdown.total()));
        for category in Category::ALL {
            map.insert(
                format!("{name}.{}", category.key()),
                ScoreValue::Score(category.score_in(breakdown)),
            );
        }
        map.insert(
            format!("{name}.{NATTR_SUFFIX}"),
            ScoreValue::Count(counters.attractive),
        );
        map.insert(
            format!("{name}.{NREP_SUFFIX}"),
            ScoreValue::Count(counters.repulsive),
        );
        if let Some(annotations) = annotations {
            map.insert(
                format!("{name}.{ANNOTATIONS_SUFFIX}"),
                ScoreValue::Annotations(annotations),
            );
        }
        map
    }

    pub fn insert(&mut self, key: String, value: ScoreValue) -> Option<ScoreValue> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&ScoreValue> {
        self.entries.get(key)
    }

    pub fn score(&self, key: &str) -> Option<f64> {
        match self.entries.get(key)? {
            ScoreValue::Score(value) => Some(*value),
            _ => None,
        }
    }

    pub fn count(&self, key: &str) -> Option<usize> {
        match self.entries.get(key)? {
            ScoreValue::Count(value) => Some(*value),
            _ => None,
        }
    }

    pub fn annotations(&self, key: &str) -> Option<&[ResidueAnnotation]> {
        match self.entries.get(key)? {
            ScoreValue::Annotations(value) => Some(value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoreValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
