pub mod circuit;
pub mod cli;
pub mod combination;
pub mod component;
pub mod enumerator;
pub mod error;
pub mod output;

// Re-export commonly used types
pub use circuit::Circuit;
pub use combination::{combinations_with_repetition, multiset_count, CombinationsWithRepetition};
pub use component::{Capacitor, Resistor};
pub use enumerator::{
    filter_by_relative_tolerance, filter_by_time_constant, CircuitEnumerator, SearchConfig, SearchReport,
};
pub use error::{RcError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
