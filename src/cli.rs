use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::enumerator::SearchConfig;
use crate::error::RcError;

lazy_static! {
    static ref VALUE_PATTERN: Regex = Regex::new(
        r"^([0-9]+(?:\.[0-9]+)?)\s*([a-z]*)$"
    ).unwrap();
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub search: SearchConfig,
    pub output_file: Option<String>,
    pub output_format: OutputFormat,
    pub verbose_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

pub fn create_cli() -> Command {
    Command::new("rcgen")
        .version(crate::VERSION)
        .about("Enumerates series RC circuits and filters them by time constant")
        .arg(
            Arg::new("resistors")
                .short('r')
                .long("resistors")
                .value_name("LIST")
                .help("Allowed resistors, comma separated (e.g. 5,10,4.7k)"),
        )
        .arg(
            Arg::new("capacitors")
                .short('c')
                .long("capacitors")
                .value_name("LIST")
                .help("Allowed capacitors in uF, comma separated (e.g. 100,250,2.2mF)"),
        )
        .arg(
            Arg::new("max-resistors")
                .long("max-resistors")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Maximum number of resistors in series"),
        )
        .arg(
            Arg::new("max-capacitors")
                .long("max-capacitors")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Maximum number of capacitors in series"),
        )
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .value_name("TIME")
                .help("Target time constant (e.g. 10ms, 0.01)"),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .value_name("FRACTION")
                .help("Allowed deviation from the target as a fraction or percentage (e.g. 0.2, 20%)"),
        )
        .arg(
            Arg::new("no-target")
                .long("no-target")
                .action(ArgAction::SetTrue)
                .conflicts_with("target")
                .help("List every circuit without filtering"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON search configuration; flags override its fields"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file for the matching circuits"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase verbosity level"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .default_value("csv")
                .value_parser(["csv", "json"])
                .help("Output format"),
        )
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut search = match matches.get_one::<String>("config") {
            Some(path) => SearchConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config '{}'", path))?,
            None => SearchConfig::default(),
        };

        if let Some(list) = matches.get_one::<String>("resistors") {
            search.resistors_ohms = parse_value_list(list, parse_resistance)?;
        }
        if let Some(list) = matches.get_one::<String>("capacitors") {
            search.capacitors_micro_farads = parse_value_list(list, parse_capacitance)?;
        }
        if let Some(&count) = matches.get_one::<usize>("max-resistors") {
            search.max_resistors = count;
        }
        if let Some(&count) = matches.get_one::<usize>("max-capacitors") {
            search.max_capacitors = count;
        }
        if let Some(target) = matches.get_one::<String>("target") {
            search.target_time_constant = Some(parse_time_value(target)?);
        }
        if matches.get_flag("no-target") {
            search.target_time_constant = None;
        }
        if let Some(tolerance) = matches.get_one::<String>("tolerance") {
            search.tolerance_fraction = parse_fraction(tolerance)?;
        }

        if search.max_resistors == 0 || search.max_capacitors == 0 {
            return Err(anyhow!("Maximum resistor and capacitor counts must be at least 1"));
        }
        search.validate()?;

        let output_file = matches.get_one::<String>("output").cloned();
        let verbose_level = matches.get_count("verbose");

        let output_format = match matches.get_one::<String>("format").map(String::as_str) {
            Some("csv") | None => OutputFormat::Csv,
            Some("json") => OutputFormat::Json,
            Some(other) => return Err(anyhow!("Invalid output format '{}'", other)),
        };

        Ok(CliArgs {
            search,
            output_file,
            output_format,
            verbose_level,
        })
    }
}

/// Parse a comma-separated list of component values
pub fn parse_value_list(list: &str, parse: fn(&str) -> Result<i32, RcError>) -> Result<Vec<i32>> {
    let values = list
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse)
        .collect::<Result<Vec<i32>, RcError>>()?;

    if values.is_empty() {
        return Err(anyhow!("Component list '{}' contains no values", list));
    }
    Ok(values)
}

/// Split a value into its number and lowercase unit suffix
fn split_value(value: &str) -> Result<(f64, String), RcError> {
    let normalized = value.trim().to_lowercase();
    let captures = VALUE_PATTERN
        .captures(&normalized)
        .ok_or_else(|| RcError::invalid_value(value, "expected a positive number with optional unit"))?;

    let number = captures[1]
        .parse::<f64>()
        .map_err(|e| RcError::invalid_value(value, e.to_string()))?;
    Ok((number, captures[2].to_string()))
}

/// Convert to a positive whole number of base units
fn to_whole_units(value: &str, scaled: f64) -> Result<i32, RcError> {
    let rounded = scaled.round();
    if (scaled - rounded).abs() > 1e-9 {
        return Err(RcError::invalid_value(value, "must be a whole number of base units"));
    }
    if rounded <= 0.0 || rounded > f64::from(i32::MAX) {
        return Err(RcError::invalid_value(value, "out of range"));
    }
    Ok(rounded as i32)
}

/// Parse resistance in ohms (e.g., "47", "4.7k", "1meg", "100ohm")
pub fn parse_resistance(value: &str) -> Result<i32, RcError> {
    let (number, unit) = split_value(value)?;
    let multiplier = match unit.as_str() {
        "" | "r" | "ohm" | "ohms" => 1.0,
        "k" => 1e3,
        "meg" => 1e6,
        _ => return Err(RcError::invalid_value(value, format!("unknown resistance unit '{}'", unit))),
    };
    to_whole_units(value, number * multiplier)
}

/// Parse capacitance in microfarads (e.g., "100", "100uf", "2.2mf")
pub fn parse_capacitance(value: &str) -> Result<i32, RcError> {
    let (number, unit) = split_value(value)?;
    let multiplier = match unit.as_str() {
        "" | "u" | "uf" => 1.0,
        "m" | "mf" => 1e3,
        "f" => 1e6,
        _ => return Err(RcError::invalid_value(value, format!("unknown capacitance unit '{}'", unit))),
    };
    to_whole_units(value, number * multiplier)
}

/// Parse time value with unit (e.g., "10ms", "1.5s", "500us")
pub fn parse_time_value(value: &str) -> Result<f64> {
    let value = value.trim().to_lowercase();

    let seconds = if let Some(num_str) = value.strip_suffix("ns") {
        num_str.parse::<f64>()? * 1e-9
    } else if let Some(num_str) = value.strip_suffix("us") {
        num_str.parse::<f64>()? * 1e-6
    } else if let Some(num_str) = value.strip_suffix("ms") {
        num_str.parse::<f64>()? * 1e-3
    } else if let Some(num_str) = value.strip_suffix('s') {
        num_str.parse::<f64>()?
    } else {
        // Assume seconds if no unit specified
        value.parse::<f64>()?
    };

    if seconds < 0.0 {
        return Err(anyhow!("Time constant must not be negative"));
    }
    Ok(seconds)
}

/// Parse a tolerance as a fraction ("0.2") or a percentage ("20%")
pub fn parse_fraction(value: &str) -> Result<f64> {
    let value = value.trim();
    let fraction = match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>()? / 100.0,
        None => value.parse::<f64>()?,
    };

    if fraction < 0.0 {
        return Err(anyhow!("Tolerance must not be negative"));
    }
    Ok(fraction)
}
