//! Command-line interface for pod
//! This binary is used to view / convert / process pod files into different
//! output representations.
//!
//! Usage:
//!   pod execute `<path>` [--format `<format>`]  - Process a pod file
//!   pod list-formats                          - List all available formats

use clap::{Arg, Command};

use pod::pod::processor::{available_formats, process_file, ProcessingSpec};

fn main() {
    let matches = Command::new("pod")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting and processing pod files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("execute")
                .about("Process a pod file")
                .arg(
                    Arg::new("path")
                        .help("Path to the pod file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'tree-tag', 'tree-treeviz', 'text-plain')")
                        .default_value("tree-tag"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("execute", execute_matches)) => {
            let path = execute_matches.get_one::<String>("path").unwrap();
            let format = execute_matches.get_one::<String>("format").unwrap();
            handle_execute_command(path, format);
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

/// Handle the execute command
fn handle_execute_command(path: &str, format: &str) {
    let spec = ProcessingSpec::from_string(format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let output = process_file(path, &spec).unwrap_or_else(|e| {
        eprintln!("Execution error: {}", e);
        std::process::exit(1);
    });

    print!("{}", output);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
