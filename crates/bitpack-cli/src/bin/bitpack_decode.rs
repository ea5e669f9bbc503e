//! `bitpack-decode`: unpack bytes (stdin) under a schema to JSON (stdout).
//!
//! Usage:
//!   bitpack-decode --schema <file> [--base64]

use bitpack_cli::cli::{load_schema, parse_args, unpack, CliError};
use std::io::{self, Read, Write};

fn run() -> Result<(), CliError> {
    let options = parse_args(std::env::args().skip(1))?;
    let schema = load_schema(&options.schema)?;

    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;

    let json = unpack(&schema, &buf, options.base64)?;
    let mut stdout = io::stdout();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
