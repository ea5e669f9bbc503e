//! Core logic used by the binary entry points:
//! - `bitpack-encode`: JSON value → packed bytes
//! - `bitpack-decode`: packed bytes → JSON value
//!
//! Both take `--schema <file>` (a JSON schema description) and an optional
//! `--base64` flag that swaps raw bytes for base64 text.

mod coerce;

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bitpack::{PackError, Schema, Value};

pub use coerce::coerce;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Pack(#[from] PackError),
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("missing required flag {0}")]
    MissingFlag(&'static str),
    #[error("flag {0} expects a value")]
    MissingValue(&'static str),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

// ── Options ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub schema: PathBuf,
    pub base64: bool,
}

/// Parses the arguments following the program name.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, CliError> {
    let mut schema = None;
    let mut base64 = false;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base64" => base64 = true,
            "--schema" => {
                let path = args.next().ok_or(CliError::MissingValue("--schema"))?;
                schema = Some(PathBuf::from(path));
            }
            _ => return Err(CliError::UnknownArgument(arg)),
        }
    }
    Ok(Options {
        schema: schema.ok_or(CliError::MissingFlag("--schema"))?,
        base64,
    })
}

/// Parses a JSON schema description.
pub fn parse_schema(text: &str) -> Result<Schema, CliError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(Schema::from_json(&json)?)
}

/// Reads and parses the schema description at `path`.
pub fn load_schema(path: &Path) -> Result<Schema, CliError> {
    let text = std::fs::read_to_string(path)?;
    let schema = parse_schema(&text)?;
    log::debug!("loaded schema {} from {}", schema, path.display());
    Ok(schema)
}

// ── bitpack-encode ────────────────────────────────────────────────────────

/// Encodes a JSON value under `schema`. With `base64`, the output is a line
/// of base64 text instead of raw bytes.
pub fn pack(schema: &Schema, json: &str, base64: bool) -> Result<Vec<u8>, CliError> {
    let json: serde_json::Value = serde_json::from_str(json)?;
    let value = coerce(schema, Value::try_from(&json)?);
    let bytes = bitpack::encode(schema, &value)?;
    log::debug!("packed {} bytes", bytes.len());
    if base64 {
        let mut text = STANDARD.encode(&bytes).into_bytes();
        text.push(b'\n');
        Ok(text)
    } else {
        Ok(bytes)
    }
}

// ── bitpack-decode ────────────────────────────────────────────────────────

/// Decodes packed bytes (or base64 text of them) to a pretty-printed JSON
/// string.
pub fn unpack(schema: &Schema, input: &[u8], base64: bool) -> Result<String, CliError> {
    let bytes = if base64 {
        STANDARD.decode(String::from_utf8_lossy(input).trim())?
    } else {
        input.to_vec()
    };
    let value = bitpack::decode(schema, &bytes)?;
    Ok(serde_json::to_string_pretty(&serde_json::Value::from(value))?)
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bitpack::ErrorKind;
    use serde_json::json;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const POINT: &str = r#"{"kind": "struct", "fields": {
        "x": {"kind": "uint", "size": 20},
        "y": {"kind": "uint", "size": 20},
        "dir": {"kind": "uint", "size": 2}
    }}"#;

    // ── options ────────────────────────────────────────────────────────────

    #[test]
    fn parses_schema_and_base64_flags() {
        let options = parse_args(args(&["--base64", "--schema", "s.json"])).unwrap();
        assert_eq!(
            options,
            Options {
                schema: PathBuf::from("s.json"),
                base64: true
            }
        );
        let options = parse_args(args(&["--schema", "s.json"])).unwrap();
        assert!(!options.base64);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(
            parse_args(args(&[])),
            Err(CliError::MissingFlag("--schema"))
        ));
        assert!(matches!(
            parse_args(args(&["--schema"])),
            Err(CliError::MissingValue("--schema"))
        ));
        assert!(matches!(
            parse_args(args(&["--schema", "s.json", "--cbor"])),
            Err(CliError::UnknownArgument(a)) if a == "--cbor"
        ));
    }

    // ── pack / unpack roundtrips ───────────────────────────────────────────

    #[test]
    fn pack_unpack_struct() {
        let schema = parse_schema(POINT).unwrap();
        let bytes = pack(&schema, r#"{"x": 5, "y": 9, "dir": 3}"#, false).unwrap();
        assert_eq!(bytes.len(), 6);
        let json = unpack(&schema, &bytes, false).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v, json!({"x": 5, "y": 9, "dir": 3}));
    }

    #[test]
    fn pack_unpack_base64() {
        let schema = parse_schema(r#"{"kind": "nat"}"#).unwrap();
        let text = pack(&schema, "5", true).unwrap();
        assert_eq!(text, b"Hw==\n");
        assert_eq!(unpack(&schema, &text, true).unwrap(), "5");
    }

    #[test]
    fn wide_integers_survive_the_json_round_trip() {
        let schema = parse_schema(
            r#"{"kind": "tuple", "fields": [{"kind": "uint", "size": 128}, {"kind": "int", "size": 64}]}"#,
        )
        .unwrap();
        let input = r#"["340282366920938463463374607431768211455", -9223372036854775808]"#;
        let bytes = pack(&schema, input, false).unwrap();
        assert_eq!(bytes.len(), 24);
        let json = unpack(&schema, &bytes, false).unwrap();
        let again = pack(&schema, &json, false).unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn non_string_keyed_maps_round_trip() {
        let schema = parse_schema(
            r#"{"kind": "map", "key": {"kind": "int", "size": 4}, "value": {"kind": "string"}}"#,
        )
        .unwrap();
        let bytes = pack(&schema, r#"[[-1, "minus one"], [2, "two"]]"#, false).unwrap();
        let json = unpack(&schema, &bytes, false).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v, json!([[-1, "minus one"], [2, "two"]]));
    }

    // ── errors ─────────────────────────────────────────────────────────────

    #[test]
    fn reports_codec_and_input_errors() {
        let schema = parse_schema(POINT).unwrap();
        assert!(matches!(pack(&schema, "{", false), Err(CliError::Json(_))));
        match pack(&schema, r#"{"x": 5, "y": 9, "dir": 4}"#, false) {
            Err(CliError::Pack(e)) => assert_eq!(e.kind(), ErrorKind::Range),
            other => panic!("expected a range error, got {other:?}"),
        }
        assert!(matches!(pack(&schema, "null", false), Err(CliError::Pack(_))));
        assert!(matches!(unpack(&schema, &[0, 0], false), Err(CliError::Pack(_))));
        assert!(matches!(unpack(&schema, b"%%", true), Err(CliError::Base64(_))));
        match parse_schema(r#"{"kind": "float"}"#) {
            Err(CliError::Pack(e)) => assert_eq!(e.kind(), ErrorKind::Configuration),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn missing_schema_file_is_an_io_error() {
        let path = std::env::temp_dir().join("bitpack-cli-no-such-schema.json");
        assert!(matches!(load_schema(&path), Err(CliError::Io(_))));
    }
}
