//! `bitpack-encode`: pack a JSON value (stdin) under a schema (stdout).
//!
//! Usage:
//!   bitpack-encode --schema <file> [--base64]

use bitpack_cli::cli::{load_schema, pack, parse_args, CliError};
use std::io::{self, Read, Write};

fn run() -> Result<(), CliError> {
    let options = parse_args(std::env::args().skip(1))?;
    let schema = load_schema(&options.schema)?;

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;

    let bytes = pack(&schema, buf.trim(), options.base64)?;
    io::stdout().write_all(&bytes)?;
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
