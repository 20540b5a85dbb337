use std::path::PathBuf;
use std::process;

use ridgeline_flight::report;
use ridgeline_flight::routes::Route;
use ridgeline_flight::{FlightError, FlightRunner, ViewerConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut route_name: Option<String> = None;
    let mut frame_count = 600u32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(value_of(&args, &mut i)));
            }
            "--output" => {
                output_path = Some(PathBuf::from(value_of(&args, &mut i)));
            }
            "--route" => {
                route_name = Some(value_of(&args, &mut i).to_string());
            }
            "--frames" => {
                let value = value_of(&args, &mut i);
                frame_count = match value.parse() {
                    Ok(n) => n,
                    Err(_) => {
                        eprintln!("invalid --frames value: {}", value);
                        process::exit(1);
                    }
                };
            }
            "--help" | "-h" => {
                eprintln!("Usage: flight-runner [OPTIONS]");
                eprintln!("  --config <path>    Viewer config RON (default: built-in defaults)");
                eprintln!("  --route <name>     Route to fly (default: all)");
                eprintln!("  --frames <n>       Frames per route (default: 600)");
                eprintln!("  --output <path>    Save results as JSON");
                let names: Vec<&str> = Route::ALL.iter().map(|r| r.name()).collect();
                eprintln!("Routes: {}", names.join(", "));
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    if let Err(e) = run(config_path, route_name, frame_count, output_path) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(
    config_path: Option<PathBuf>,
    route_name: Option<String>,
    frame_count: u32,
    output_path: Option<PathBuf>,
) -> Result<(), FlightError> {
    let config = match config_path {
        Some(ref path) => {
            log::info!("Loading config from {}", path.display());
            ViewerConfig::load(path)?
        }
        None => ViewerConfig::default(),
    };

    let routes = match route_name {
        Some(ref name) => vec![Route::from_name(name)?],
        None => Route::ALL.to_vec(),
    };

    log::info!("Initializing GPU...");
    let runner = FlightRunner::new(config)?;

    let mut results = Vec::with_capacity(routes.len());
    for route in routes {
        results.push(runner.fly(route, frame_count)?);
    }

    println!("\n## Flight Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let flight_report = report::FlightReport {
            timestamp: format!("flight-{}", process::id()),
            results,
        };
        report::save_report(path, &flight_report)?;
        log::info!("Saved report to {}", path.display());
    }

    log::info!("Flight complete.");
    Ok(())
}

/// Advance past a flag and return its value, exiting if it is missing.
fn value_of<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(value) => value,
        None => {
            eprintln!("missing value for {}", args[*i - 1]);
            process::exit(1);
        }
    }
}
