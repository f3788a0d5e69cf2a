//! Chart registry
//!
//! Owns one line chart per indicator and applies live updates to it.

use super::parser::{ValueError, parse_value};
use crate::indicator::IndicatorId;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Charts need at least one historical value.
    #[error("no values provided for chart")]
    EmptyHistory,

    /// A historical value could not be parsed.
    #[error("history entry {index} is invalid: {source}")]
    InvalidHistory { index: usize, source: ValueError },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("chart for ID {0} not found")]
    ChartNotFound(IndicatorId),

    #[error(transparent)]
    InvalidValue(#[from] ValueError),
}

/// Line chart state bound to one indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    name: String,
    samples: Vec<f64>,
    labels: Vec<u64>,
}

impl ChartHandle {
    /// Builds a chart from display-formatted history.
    ///
    /// Nothing is built unless every entry parses.
    pub fn from_history(name: &str, history: &[String]) -> Result<Self, ChartError> {
        if history.is_empty() {
            return Err(ChartError::EmptyHistory);
        }
        let samples = history
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                parse_value(raw).map_err(|source| ChartError::InvalidHistory { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let labels = (0..samples.len() as u64).collect();

        Ok(Self {
            name: name.to_string(),
            samples,
            labels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn labels(&self) -> &[u64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// (label, sample) pairs in the shape the chart widget plots.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.labels
            .iter()
            .zip(&self.samples)
            .map(|(label, sample)| (*label as f64, *sample))
            .collect()
    }

    /// Appends one sample with the next label.
    ///
    /// The dashboard redraws every tick, so the new point shows on the next frame.
    fn push(&mut self, sample: f64) {
        let label = self.labels.len() as u64;
        self.samples.push(sample);
        self.labels.push(label);
    }
}

/// Mapping from indicator identifier to its chart.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: HashMap<IndicatorId, ChartHandle>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a chart, replacing any previous chart for the same identifier.
    pub fn insert(&mut self, id: IndicatorId, chart: ChartHandle) -> Option<ChartHandle> {
        self.charts.insert(id, chart)
    }

    pub fn remove(&mut self, id: &IndicatorId) -> Option<ChartHandle> {
        self.charts.remove(id)
    }

    pub fn get(&self, id: &IndicatorId) -> Option<&ChartHandle> {
        self.charts.get(id)
    }

    pub fn contains(&self, id: &IndicatorId) -> bool {
        self.charts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Applies a live value to the chart bound to `id`.
    ///
    /// The chart is left untouched on any error. Returns the new sample count.
    pub fn apply_update(&mut self, id: &IndicatorId, raw: &str) -> Result<usize, UpdateError> {
        let chart = self
            .charts
            .get_mut(id)
            .ok_or_else(|| UpdateError::ChartNotFound(id.clone()))?;
        let sample = parse_value(raw)?;
        chart.push(sample);
        Ok(chart.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_history_then_live_update() {
        let mut registry = ChartRegistry::new();
        let id = IndicatorId::from("1");
        let chart = ChartHandle::from_history("Temp", &history(&["1,0", "2,5"])).unwrap();
        registry.insert(id.clone(), chart);

        assert_eq!(registry.apply_update(&id, "3,7"), Ok(3));

        let chart = registry.get(&id).unwrap();
        assert_eq!(chart.samples(), &[1.0, 2.5, 3.7]);
        assert_eq!(chart.labels(), &[0, 1, 2]);
    }

    #[test]
    fn test_lengths_grow_with_valid_updates() {
        let mut registry = ChartRegistry::new();
        let id = IndicatorId::from("7");
        let initial = history(&["10", "11,5", "12"]);
        registry.insert(id.clone(), ChartHandle::from_history("Flow", &initial).unwrap());

        let updates = ["1", "2,25", "oops", "3", "", "4,5"];
        let valid = updates
            .iter()
            .filter(|raw| registry.apply_update(&id, raw).is_ok())
            .count();

        let chart = registry.get(&id).unwrap();
        assert_eq!(valid, 4);
        assert_eq!(chart.samples().len(), initial.len() + valid);
        assert_eq!(chart.labels().len(), initial.len() + valid);
        let expected: Vec<u64> = (0..chart.len() as u64).collect();
        assert_eq!(chart.labels(), expected.as_slice());
    }

    #[test]
    fn test_invalid_value_leaves_chart_untouched() {
        let mut registry = ChartRegistry::new();
        let id = IndicatorId::from("2");
        registry.insert(id.clone(), ChartHandle::from_history("P", &history(&["5"])).unwrap());
        let before = registry.get(&id).unwrap().clone();

        let result = registry.apply_update(&id, "not a number");

        assert!(matches!(result, Err(UpdateError::InvalidValue(_))));
        assert_eq!(registry.get(&id), Some(&before));
    }

    #[test]
    fn test_unregistered_identifier_is_reported() {
        let mut registry = ChartRegistry::new();
        let id = IndicatorId::from("missing");
        assert_eq!(
            registry.apply_update(&id, "1,0"),
            Err(UpdateError::ChartNotFound(id))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_construction_requires_valid_history() {
        assert_eq!(
            ChartHandle::from_history("Empty", &[]),
            Err(ChartError::EmptyHistory)
        );
        assert!(matches!(
            ChartHandle::from_history("Bad", &history(&["1,0", "x", "3"])),
            Err(ChartError::InvalidHistory { index: 1, .. })
        ));
    }

    #[test]
    fn test_remove_drops_the_chart() {
        let mut registry = ChartRegistry::new();
        let id = IndicatorId::from("9");
        registry.insert(id.clone(), ChartHandle::from_history("L", &history(&["1"])).unwrap());
        assert!(registry.remove(&id).is_some());
        assert!(!registry.contains(&id));
        assert!(registry.apply_update(&id, "2").is_err());
    }
}
