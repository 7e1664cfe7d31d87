use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::component::{Capacitor, Resistor};
use crate::error::{RcError, Result};

/// Conversion from microfarads to farads
pub const MICRO: f64 = 1e-6;

/// A series resistor block followed by a series capacitor block.
///
/// The element lists keep the order they were built in for display, but
/// neither the derived quantities nor equality depend on that order.
#[derive(Debug, Clone)]
pub struct Circuit {
    resistors: Vec<Resistor>,
    capacitors: Vec<Capacitor>,
    time_constant: OnceCell<f64>,
}

impl Circuit {
    /// Build a circuit from its resistor and capacitor lists.
    ///
    /// An empty capacitor list is rejected since its effective capacitance
    /// would be `1 / 0`. An empty resistor list is accepted and behaves as a
    /// zero-ohm block.
    pub fn new(resistors: Vec<Resistor>, capacitors: Vec<Capacitor>) -> Result<Self> {
        if capacitors.is_empty() {
            return Err(RcError::invalid_circuit(
                "a circuit needs at least one capacitor",
            ));
        }

        Ok(Circuit {
            resistors,
            capacitors,
            time_constant: OnceCell::new(),
        })
    }

    /// Pair two combinations produced by the enumerator, which never yields
    /// an empty capacitor combination.
    pub(crate) fn from_combinations(resistors: Vec<Resistor>, capacitors: Vec<Capacitor>) -> Self {
        debug_assert!(!capacitors.is_empty());
        Circuit {
            resistors,
            capacitors,
            time_constant: OnceCell::new(),
        }
    }

    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    pub fn capacitors(&self) -> &[Capacitor] {
        &self.capacitors
    }

    /// Series resistance: R = R1 + R2 + ... + Rn
    pub fn effective_resistance_ohms(&self) -> i64 {
        self.resistors
            .iter()
            .map(|r| i64::from(r.resistance_ohms()))
            .sum()
    }

    /// Series capacitance: 1 / C = 1 / C1 + 1 / C2 + ... + 1 / Cn
    pub fn effective_capacitance_micro_farads(&self) -> f64 {
        let inverse_sum: f64 = self
            .capacitors
            .iter()
            .map(|c| 1.0 / f64::from(c.capacitance_micro_farads()))
            .sum();
        1.0 / inverse_sum
    }

    /// Time constant in seconds, computed on first access
    pub fn time_constant_seconds(&self) -> f64 {
        *self.time_constant.get_or_init(|| {
            self.effective_resistance_ohms() as f64 * self.effective_capacitance_micro_farads() * MICRO
        })
    }
}

/// True when every element of `needles` occurs somewhere in `haystack`.
fn contains_all<T: PartialEq>(haystack: &[T], needles: &[T]) -> bool {
    needles.iter().all(|item| haystack.contains(item))
}

fn mutually_contained<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    contains_all(a, b) && contains_all(b, a)
}

/// Two circuits are equal when each resistor list contains every resistor of
/// the other, and likewise for capacitors. Multiplicity is not compared, so
/// `[5ohms]` and `[5ohms, 5ohms]` are equal.
impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        mutually_contained(&self.resistors, &other.resistors)
            && mutually_contained(&self.capacitors, &other.capacitors)
    }
}

impl Eq for Circuit {}

impl Hash for Circuit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Distinct values only, to agree with the containment rule above
        let resistors: BTreeSet<&Resistor> = self.resistors.iter().collect();
        let capacitors: BTreeSet<&Capacitor> = self.capacitors.iter().collect();
        resistors.hash(state);
        capacitors.hash(state);
    }
}

impl Serialize for Circuit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Circuit", 5)?;
        state.serialize_field("resistors", &self.resistors)?;
        state.serialize_field("capacitors", &self.capacitors)?;
        state.serialize_field("effective_resistance_ohms", &self.effective_resistance_ohms())?;
        state.serialize_field(
            "effective_capacitance_uf",
            &self.effective_capacitance_micro_farads(),
        )?;
        state.serialize_field("time_constant_s", &self.time_constant_seconds())?;
        state.end()
    }
}

/// Render a list as `[a, b, c]`
pub(crate) fn format_list<T: fmt::Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Fixed-point rendering with `,` between each group of three integer
/// digits, e.g. `format_grouped(2200.0, 5)` gives `2,200.00000`
pub(crate) fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    if !value.is_finite() {
        return formatted;
    }

    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time Constant: {} | Resistors: {} | Capacitors: {} | Eff Resistance: {}ohms | Eff Capacitance: {}uF",
            format_grouped(self.time_constant_seconds(), 8),
            format_list(&self.resistors),
            format_list(&self.capacitors),
            self.effective_resistance_ohms(),
            format_grouped(self.effective_capacitance_micro_farads(), 5),
        )
    }
}
