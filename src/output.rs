use std::fs::File;
use std::io::{self, Write};
use log::info;
use serde::Serialize;

use crate::circuit::{format_grouped, format_list, Circuit};
use crate::cli::OutputFormat;
use crate::enumerator::SearchReport;
use crate::error::{RcError, Result};

/// One row of the tabular circuit listing
#[derive(Debug, Serialize)]
struct CircuitRecord {
    resistors: String,
    capacitors: String,
    effective_resistance_ohms: i64,
    effective_capacitance_uf: f64,
    time_constant_s: String,
}

impl From<&Circuit> for CircuitRecord {
    fn from(circuit: &Circuit) -> Self {
        CircuitRecord {
            resistors: format_list(circuit.resistors()),
            capacitors: format_list(circuit.capacitors()),
            effective_resistance_ohms: circuit.effective_resistance_ohms(),
            effective_capacitance_uf: circuit.effective_capacitance_micro_farads(),
            time_constant_s: format_grouped(circuit.time_constant_seconds(), 8),
        }
    }
}

/// Headline describing the search, e.g.
/// `Found 12 circuits with 3 resistors, 2 capacitors, and a time constant within 20.000000% of 0.010000s`
pub fn headline(report: &SearchReport) -> String {
    let config = &report.config;
    match config.target_time_constant {
        Some(target) => format!(
            "Found {} circuits with {} resistors, {} capacitors, and a time constant within {:.6}% of {:.6}s",
            report.circuits.len(),
            config.max_resistors,
            config.max_capacitors,
            config.tolerance_fraction * 100.0,
            target
        ),
        None => format!(
            "Found {} circuits with {} resistors and {} capacitors",
            report.circuits.len(),
            config.max_resistors,
            config.max_capacitors
        ),
    }
}

pub fn write_summary<W: Write>(report: &SearchReport, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", headline(report))?;
    writeln!(writer, "  Allowed Resistors (Ohms): {}", format_list(&report.config.resistors_ohms))?;
    writeln!(writer, "  Allowed Capacitors (uF):  {}", format_list(&report.config.capacitors_micro_farads))?;
    for (i, circuit) in report.circuits.iter().enumerate() {
        writeln!(writer, "  Circuit #{}:\n    {}", i + 1, circuit)?;
    }
    Ok(())
}

/// Print the search summary to stdout
pub fn print_summary(report: &SearchReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_summary(report, stdout.lock())
}

pub fn write_csv<W: Write>(report: &SearchReport, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for circuit in &report.circuits {
        writer.serialize(CircuitRecord::from(circuit))?;
    }
    writer.flush().map_err(|e| RcError::io("csv output", e))?;
    Ok(())
}

/// Export the matching circuits to a file
pub fn export_results(report: &SearchReport, filename: &str, format: OutputFormat) -> Result<()> {
    let file = File::create(filename).map_err(|e| RcError::io(filename, e))?;

    match format {
        OutputFormat::Csv => {
            write_csv(report, file)?;
            info!("Results exported to CSV: {}", filename);
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(file, report)?;
            info!("Results exported to JSON: {}", filename);
        }
    }
    Ok(())
}
