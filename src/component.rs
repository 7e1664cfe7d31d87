use std::fmt;
use serde::{Deserialize, Serialize};

/// A resistor with a fixed resistance in ohms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resistor {
    resistance_ohms: i32,
}

impl Resistor {
    pub fn new(resistance_ohms: i32) -> Self {
        Resistor { resistance_ohms }
    }

    pub fn resistance_ohms(&self) -> i32 {
        self.resistance_ohms
    }
}

impl From<i32> for Resistor {
    fn from(resistance_ohms: i32) -> Self {
        Resistor::new(resistance_ohms)
    }
}

impl fmt::Display for Resistor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ohms", self.resistance_ohms)
    }
}

/// A capacitor with a fixed capacitance in microfarads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacitor {
    capacitance_micro_farads: i32,
}

impl Capacitor {
    pub fn new(capacitance_micro_farads: i32) -> Self {
        Capacitor { capacitance_micro_farads }
    }

    pub fn capacitance_micro_farads(&self) -> i32 {
        self.capacitance_micro_farads
    }
}

impl From<i32> for Capacitor {
    fn from(capacitance_micro_farads: i32) -> Self {
        Capacitor::new(capacitance_micro_farads)
    }
}

impl fmt::Display for Capacitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}uF", self.capacitance_micro_farads)
    }
}
