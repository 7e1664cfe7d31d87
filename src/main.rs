use clap::ArgMatches;
use colored::*;
use log::{error, info, LevelFilter};

use rc_circuit_gen::cli::{self, CliArgs};
use rc_circuit_gen::output;

fn main() {
    let matches = cli::create_cli().get_matches();

    init_logger(matches.get_count("verbose"));

    if let Err(e) = run_application(&matches) {
        error!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

/// RUST_LOG wins over -v when set
fn init_logger(verbose_level: u8) {
    let level = match verbose_level {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run_application(matches: &ArgMatches) -> anyhow::Result<()> {
    let args = CliArgs::from_matches(matches)?;

    info!("{}", "Starting RC circuit enumeration".green().bold());
    info!(
        "Resistors: {:?} (up to {}), capacitors: {:?} (up to {})",
        args.search.resistors_ohms,
        args.search.max_resistors,
        args.search.capacitors_micro_farads,
        args.search.max_capacitors
    );

    let report = args.search.run()?;

    if let Some(output_file) = &args.output_file {
        output::export_results(&report, output_file, args.output_format)?;
        info!("Results exported to: {}", output_file.bright_green());
    } else {
        output::print_summary(&report)?;
    }

    info!(
        "{}",
        format!("Done: {} of {} circuits matched", report.circuits.len(), report.total_circuits)
            .green()
            .bold()
    );
    Ok(())
}
