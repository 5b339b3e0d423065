//! cellgraph - Reactive spreadsheet cells from the command line

mod config;

use anyhow::{Context, bail};
use cellgraph_core::Sheet;
use config::Config;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: cellgraph [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet file to open (.json); created on save if missing");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <NAME=TEXT>     Set a cell (can be repeated)");
    eprintln!("  -g, --get <NAME>          Print a cell value (can be repeated)");
    eprintln!("  -p, --print               Print every non-empty cell");
    eprintln!("  -o, --output <FILE>       Save to FILE");
    eprintln!("  --config <FILE>           Load settings from TOML file");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  --verbose                 Log debug output to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    sets: Vec<String>,
    gets: Vec<String>,
    print: bool,
    output_file: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut options = Options::default();
    let mut config_file: Option<PathBuf> = None;
    let mut no_config = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-s" | "--set" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --set requires NAME=TEXT");
                    std::process::exit(1);
                }
                options.sets.push(args[i].to_string());
            }
            "-g" | "--get" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --get requires a cell name");
                    std::process::exit(1);
                }
                options.gets.push(args[i].to_string());
            }
            "-p" | "--print" => options.print = true,
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                options.output_file = Some(PathBuf::from(&args[i]));
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => no_config = true,
            "--verbose" => verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if options.file_path.is_none() {
                    options.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    init_tracing(verbose);

    let config = if no_config {
        Config::default()
    } else {
        let (config, warnings) = config::load_config(config_file.as_ref());
        for warning in warnings {
            eprintln!("Warning: {}", warning);
        }
        config
    };

    if let Err(e) = run(&options, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(options: &Options, config: &Config) -> anyhow::Result<()> {
    let mut sheet = match options.file_path.as_ref() {
        Some(path) if path.exists() => Sheet::open(path)?,
        Some(path) => {
            debug!(path = %path.display(), "new sheet");
            Sheet::new()
        }
        None => Sheet::new(),
    };

    for assignment in &options.sets {
        let Some((name, text)) = assignment.split_once('=') else {
            bail!("Invalid --set '{}': expected NAME=TEXT", assignment);
        };
        let order = sheet
            .set_contents_of_cell(name.trim(), text)
            .with_context(|| format!("Cannot set {}", name.trim()))?;
        if config.output.show_order {
            let names: Vec<&str> = order.iter().map(|n| n.as_str()).collect();
            println!("Recalculated: {}", names.join(", "));
        }
    }

    for name in &options.gets {
        let value = sheet.cell_value(name)?;
        println!("{}: {}", name.to_ascii_uppercase(), value);
    }

    if options.print {
        for (name, cell) in sheet.cells() {
            println!("{}: {} => {}", name, cell.contents, cell.value);
        }
    }

    let target = match (&options.output_file, &options.file_path) {
        (Some(output), _) => Some(output),
        (None, Some(file)) if sheet.is_changed() => Some(file),
        _ => None,
    };
    if let Some(path) = target {
        sheet.save(path, config.output.pretty)?;
        eprintln!("Saved to {}", path.display());
    }

    Ok(())
}
