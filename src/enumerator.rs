use std::fs;
use std::path::Path;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::combination::{combinations_with_repetition, multiset_count};
use crate::component::{Capacitor, Resistor};
use crate::error::{RcError, Result};

/// Builds every series RC circuit available from a resistor and capacitor pool
#[derive(Debug, Clone, Default)]
pub struct CircuitEnumerator {
    resistors: Vec<Resistor>,
    capacitors: Vec<Capacitor>,
}

impl CircuitEnumerator {
    /// Create an enumerator with empty pools
    pub fn new() -> Self {
        CircuitEnumerator::default()
    }

    /// Replace the resistor pool with the given resistances in ohms
    pub fn set_resistors(&mut self, resistances_ohms: &[i32]) {
        self.resistors = resistances_ohms.iter().copied().map(Resistor::new).collect();
    }

    /// Replace the capacitor pool with the given capacitances in microfarads
    pub fn set_capacitors(&mut self, capacitances_micro_farads: &[i32]) {
        self.capacitors = capacitances_micro_farads
            .iter()
            .copied()
            .map(Capacitor::new)
            .collect();
    }

    pub fn set_resistor_pool(&mut self, resistors: Vec<Resistor>) {
        self.resistors = resistors;
    }

    pub fn set_capacitor_pool(&mut self, capacitors: Vec<Capacitor>) {
        self.capacitors = capacitors;
    }

    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    pub fn capacitors(&self) -> &[Capacitor] {
        &self.capacitors
    }

    /// Number of circuits `all_possible_circuits` would return, or `None` on overflow
    pub fn possible_circuit_count(&self, max_resistors: usize, max_capacitors: usize) -> Option<usize> {
        let resistor_combos = size_class_total(self.resistors.len(), max_resistors)?;
        let capacitor_combos = size_class_total(self.capacitors.len(), max_capacitors)?;
        resistor_combos.checked_mul(capacitor_combos)
    }

    /// Every circuit with 1..=max_resistors resistors and 1..=max_capacitors
    /// capacitors. Circuits differing only in element order are produced once.
    ///
    /// Results are grouped by resistor combination (smallest combinations
    /// first), each paired with every capacitor combination in turn. A
    /// maximum of 0 yields no circuits.
    pub fn all_possible_circuits(&self, max_resistors: usize, max_capacitors: usize) -> Vec<Circuit> {
        match self.possible_circuit_count(max_resistors, max_capacitors) {
            Some(count) => info!(
                "Enumerating {} circuits ({} resistors, {} capacitors in pool)",
                count,
                self.resistors.len(),
                self.capacitors.len()
            ),
            None => info!("Enumerating a circuit count too large to predict"),
        }

        let resistor_combinations = combinations_up_to(&self.resistors, max_resistors, "resistor");
        let capacitor_combinations = combinations_up_to(&self.capacitors, max_capacitors, "capacitor");

        let mut circuits =
            Vec::with_capacity(resistor_combinations.len() * capacitor_combinations.len());
        for resistors in &resistor_combinations {
            for capacitors in &capacitor_combinations {
                circuits.push(Circuit::from_combinations(resistors.clone(), capacitors.clone()));
            }
        }

        debug!("Built {} circuits", circuits.len());
        circuits
    }
}

fn size_class_total(pool_size: usize, max_size: usize) -> Option<usize> {
    (1..=max_size).try_fold(0usize, |total, k| total.checked_add(multiset_count(pool_size, k)?))
}

fn combinations_up_to<T: Clone>(pool: &[T], max_size: usize, label: &str) -> Vec<Vec<T>> {
    let mut combinations = Vec::new();
    for size in 1..=max_size {
        let batch = combinations_with_repetition(pool, size);
        debug!("{} {} combinations of size {}", batch.len(), label, size);
        combinations.extend(batch);
    }
    combinations
}

/// Keep the circuits whose time constant is within `tolerance` seconds of
/// `target_seconds`, preserving input order.
///
/// A tolerance of 0 keeps exact matches, allowing for one ulp-scale rounding
/// difference between the computed time constant and the target.
pub fn filter_by_time_constant(circuits: Vec<Circuit>, target_seconds: f64, tolerance: f64) -> Vec<Circuit> {
    let total = circuits.len();
    let kept: Vec<Circuit> = circuits
        .into_iter()
        .filter(|circuit| {
            let tau = circuit.time_constant_seconds();
            let slack = f64::EPSILON * tau.abs().max(target_seconds.abs());
            (tau - target_seconds).abs() <= tolerance + slack
        })
        .collect();

    info!(
        "Kept {} of {} circuits within {}s of {}s",
        kept.len(),
        total,
        tolerance,
        target_seconds
    );
    kept
}

/// Keep the circuits whose time constant lies in
/// `[target - target * fraction, target + target * fraction]`.
pub fn filter_by_relative_tolerance(circuits: Vec<Circuit>, target_seconds: f64, fraction: f64) -> Vec<Circuit> {
    let min_time_constant = target_seconds - target_seconds * fraction;
    let max_time_constant = target_seconds + target_seconds * fraction;
    let total = circuits.len();

    let kept: Vec<Circuit> = circuits
        .into_iter()
        .filter(|circuit| {
            let tau = circuit.time_constant_seconds();
            tau >= min_time_constant && tau <= max_time_constant
        })
        .collect();

    info!(
        "Kept {} of {} circuits with time constant in [{}, {}]s",
        kept.len(),
        total,
        min_time_constant,
        max_time_constant
    );
    kept
}

/// Parameters for one enumerate-then-filter run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub resistors_ohms: Vec<i32>,
    pub capacitors_micro_farads: Vec<i32>,
    pub max_resistors: usize,
    pub max_capacitors: usize,
    /// Target time constant in seconds; `None` keeps every circuit
    pub target_time_constant: Option<f64>,
    /// Allowed deviation as a fraction of the target (0.2 = 20%)
    pub tolerance_fraction: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            resistors_ohms: vec![5, 10, 25, 50, 100],
            capacitors_micro_farads: vec![100, 250, 400],
            max_resistors: 3,
            max_capacitors: 2,
            target_time_constant: Some(0.01),
            tolerance_fraction: 0.2,
        }
    }
}

impl SearchConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| RcError::io(path.display().to_string(), e))?;
        let config: SearchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(&bad) = self.resistors_ohms.iter().find(|&&r| r <= 0) {
            return Err(RcError::invalid_value(bad.to_string(), "resistance must be positive"));
        }
        if let Some(&bad) = self.capacitors_micro_farads.iter().find(|&&c| c <= 0) {
            return Err(RcError::invalid_value(bad.to_string(), "capacitance must be positive"));
        }
        if !(self.tolerance_fraction >= 0.0) {
            return Err(RcError::invalid_parameter(format!(
                "tolerance fraction must be non-negative, got {}",
                self.tolerance_fraction
            )));
        }
        if let Some(target) = self.target_time_constant {
            if !target.is_finite() || target < 0.0 {
                return Err(RcError::invalid_parameter(format!(
                    "target time constant must be a non-negative number of seconds, got {}",
                    target
                )));
            }
        }
        Ok(())
    }

    /// Enumerate every circuit, then apply the target filter if one is set
    pub fn run(&self) -> Result<SearchReport> {
        self.validate()?;

        let mut enumerator = CircuitEnumerator::new();
        enumerator.set_resistors(&self.resistors_ohms);
        enumerator.set_capacitors(&self.capacitors_micro_farads);

        let circuits = enumerator.all_possible_circuits(self.max_resistors, self.max_capacitors);
        let total_circuits = circuits.len();

        let circuits = match self.target_time_constant {
            Some(target) => filter_by_relative_tolerance(circuits, target, self.tolerance_fraction),
            None => circuits,
        };

        Ok(SearchReport {
            config: self.clone(),
            total_circuits,
            circuits,
        })
    }
}

/// Outcome of [`SearchConfig::run`]
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub config: SearchConfig,
    /// Circuits enumerated before filtering
    pub total_circuits: usize,
    pub circuits: Vec<Circuit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn small_enumerator() -> CircuitEnumerator {
        let mut enumerator = CircuitEnumerator::new();
        enumerator.set_resistors(&[5, 10]);
        enumerator.set_capacitors(&[100]);
        enumerator
    }

    fn circuit(ohms: &[i32], micro_farads: &[i32]) -> Circuit {
        Circuit::new(
            ohms.iter().copied().map(Resistor::new).collect(),
            micro_farads.iter().copied().map(Capacitor::new).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_small_scenario() {
        let circuits = small_enumerator().all_possible_circuits(2, 1);
        assert_eq!(circuits.len(), 5);

        let ohms: Vec<Vec<i32>> = circuits
            .iter()
            .map(|c| c.resistors().iter().map(|r| r.resistance_ohms()).collect())
            .collect();
        assert_eq!(ohms, vec![vec![5], vec![10], vec![5, 5], vec![5, 10], vec![10, 10]]);
        assert!(circuits.iter().all(|c| c.capacitors() == [Capacitor::new(100)]));

        let mixed = &circuits[3];
        assert_eq!(mixed.effective_resistance_ohms(), 15);
        assert_eq!(mixed.effective_capacitance_micro_farads(), 100.0);
        assert_relative_eq!(mixed.time_constant_seconds(), 0.0015, epsilon = 1e-12);
    }

    #[test]
    fn test_count_formula() {
        let mut enumerator = CircuitEnumerator::new();
        enumerator.set_resistors(&[5, 10, 25, 50, 100]);
        enumerator.set_capacitors(&[100, 250, 400]);

        // (5 + 15 + 35) * (3 + 6)
        let circuits = enumerator.all_possible_circuits(3, 2);
        assert_eq!(circuits.len(), 55 * 9);
        assert_eq!(enumerator.possible_circuit_count(3, 2), Some(circuits.len()));
    }

    #[test]
    fn test_enumeration_is_idempotent() {
        let enumerator = small_enumerator();
        let first = enumerator.all_possible_circuits(3, 2);
        let second = enumerator.all_possible_circuits(3, 2);
        assert_eq!(first.len(), second.len());
        assert!(first.iter().zip(&second).all(|(a, b)| a == b));
    }

    #[test]
    fn test_zero_maximum_yields_nothing() {
        let enumerator = small_enumerator();
        assert!(enumerator.all_possible_circuits(0, 1).is_empty());
        assert!(enumerator.all_possible_circuits(2, 0).is_empty());
        assert_eq!(enumerator.possible_circuit_count(0, 1), Some(0));
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let mut enumerator = CircuitEnumerator::new();
        enumerator.set_resistors(&[5, 10]);
        assert!(enumerator.all_possible_circuits(2, 2).is_empty());
    }

    #[test]
    fn test_typed_pools() {
        let mut enumerator = CircuitEnumerator::new();
        enumerator.set_resistor_pool(vec![Resistor::new(5), Resistor::new(10)]);
        enumerator.set_capacitor_pool(vec![Capacitor::new(100)]);
        assert_eq!(enumerator.resistors().len(), 2);
        assert_eq!(enumerator.all_possible_circuits(2, 1).len(), 5);
    }

    #[test]
    fn test_filter_by_time_constant() {
        let circuits = small_enumerator().all_possible_circuits(2, 1);
        let kept = filter_by_time_constant(circuits, 0.001, 0.0002);

        assert!(kept.contains(&circuit(&[10], &[100])));
        assert!(kept
            .iter()
            .all(|c| (c.time_constant_seconds() - 0.001).abs() <= 0.0002 + 1e-15));
        // [5ohms] at 0.0005s is out, [10ohms] and [5ohms, 5ohms] at 0.001s are in
        let ohms: Vec<i64> = kept.iter().map(|c| c.effective_resistance_ohms()).collect();
        assert_eq!(ohms, vec![10, 10]);
        assert_eq!(kept[0].resistors().len(), 1);
        assert_eq!(kept[1].resistors().len(), 2);
    }

    #[test]
    fn test_zero_tolerance_is_exact() {
        let circuits = small_enumerator().all_possible_circuits(2, 1);
        let target = circuit(&[5, 10], &[100]).time_constant_seconds();
        let kept = filter_by_time_constant(circuits, target, 0.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].effective_resistance_ohms(), 15);
    }

    #[test]
    fn test_filter_keeps_input_order() {
        let circuits = vec![circuit(&[50], &[100]), circuit(&[10], &[100]), circuit(&[25], &[100])];
        let kept = filter_by_time_constant(circuits, 0.003, 0.003);
        let ohms: Vec<i64> = kept.iter().map(|c| c.effective_resistance_ohms()).collect();
        assert_eq!(ohms, vec![50, 10, 25]);
    }

    #[test]
    fn test_filter_by_relative_tolerance() {
        let circuits = small_enumerator().all_possible_circuits(2, 1);
        let kept = filter_by_relative_tolerance(circuits, 0.002, 0.3);
        // [1.4ms, 2.6ms] admits 15 and 20 ohms
        let ohms: Vec<i64> = kept.iter().map(|c| c.effective_resistance_ohms()).collect();
        assert_eq!(ohms, vec![15, 20]);
    }

    #[test]
    fn test_default_search() {
        let report = SearchConfig::default().run().unwrap();
        assert_eq!(report.total_circuits, 55 * 9);
        assert!(!report.circuits.is_empty());
        let (min, max) = (0.01 - 0.01 * 0.2, 0.01 + 0.01 * 0.2);
        assert!(report
            .circuits
            .iter()
            .all(|c| (min..=max).contains(&c.time_constant_seconds())));
    }

    #[test]
    fn test_search_without_target_keeps_everything() {
        let config = SearchConfig {
            resistors_ohms: vec![5, 10],
            capacitors_micro_farads: vec![100],
            max_resistors: 2,
            max_capacitors: 1,
            target_time_constant: None,
            ..SearchConfig::default()
        };
        let report = config.run().unwrap();
        assert_eq!(report.total_circuits, 5);
        assert_eq!(report.circuits.len(), 5);
    }

    #[test]
    fn test_config_validation() {
        let config = SearchConfig {
            resistors_ohms: vec![5, 0],
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(RcError::InvalidValue { .. })));

        let config = SearchConfig {
            tolerance_fraction: -0.1,
            ..SearchConfig::default()
        };
        assert!(matches!(config.run(), Err(RcError::InvalidParameter { .. })));
    }

    #[test]
    fn test_config_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"resistors_ohms": [5, 10], "max_resistors": 2, "target_time_constant": null}}"#).unwrap();

        let config = SearchConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.resistors_ohms, vec![5, 10]);
        assert_eq!(config.max_resistors, 2);
        assert_eq!(config.capacitors_micro_farads, vec![100, 250, 400]);
        assert_eq!(config.target_time_constant, None);
    }

    #[test]
    fn test_config_missing_file() {
        let result = SearchConfig::from_json_file("/nonexistent/search.json");
        assert!(matches!(result, Err(RcError::Io { .. })));
    }
}
