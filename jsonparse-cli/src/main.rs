//! jsonparse CLI: check and query JSON files.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage or I/O error
//! - 2: Parse error
//! - 3: Query error
//!
//! Logging goes to stderr and is controlled by `JSONPARSE_LOG`
//! (e.g. `JSONPARSE_LOG=debug`).

mod commands;

use std::process;

use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "check" => commands::check(&args[2..]),
        "get" => commands::get(&args[2..]),
        "type" => commands::type_of(&args[2..]),
        "keys" => commands::keys(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("JSONPARSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_usage() {
    eprintln!("Usage: jsonparse <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  check <file> [--any]          Parse a file and report success");
    eprintln!("  get <file> <path> [--any]     Print the value at a dotted key path");
    eprintln!("  type <file> <path> [--any]    Print the type of the value at a path");
    eprintln!("  keys <file> [path] [--any]    List member keys of an object");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --any    Accept any JSON value at top level, not only objects");
}
