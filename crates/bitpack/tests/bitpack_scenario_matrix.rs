use bitpack::{bit_size, decode, encode, BitPackDecoder, BitPackEncoder, Schema, Value};
use num_bigint::BigInt;

fn obj(fields: &[(&str, Value)]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

fn roundtrip(schema: &Schema, value: &Value) -> (Vec<u8>, Value) {
    let bytes = encode(schema, value).unwrap_or_else(|e| panic!("encode failed: {e}"));
    let bits = bit_size(schema, value).unwrap_or_else(|e| panic!("size failed: {e}"));
    assert_eq!(bytes.len() as u64, bits.div_ceil(8), "buffer length for {schema}");
    if bits % 8 != 0 {
        let last = bytes[bytes.len() - 1];
        assert_eq!(last >> (bits % 8), 0, "padding bits must be zero for {schema}");
    }
    let back = decode(schema, &bytes).unwrap_or_else(|e| panic!("decode failed: {e}"));
    (bytes, back)
}

#[test]
fn fixed_width_struct_scenario() {
    let schema = Schema::structure([
        ("x", Schema::uint(20)),
        ("y", Schema::uint(20)),
        ("dir", Schema::uint(2)),
    ]);
    let value = obj(&[
        ("x", Value::Integer(5)),
        ("y", Value::Integer(9)),
        ("dir", Value::Integer(3)),
    ]);
    assert_eq!(bit_size(&schema, &value), Ok(42));
    let (bytes, back) = roundtrip(&schema, &value);
    assert_eq!(bytes.len(), 6);
    assert_eq!(back, value);
}

#[test]
fn nat_scenario() {
    let (bytes, back) = roundtrip(&Schema::Nat, &Value::Integer(5));
    assert_eq!(bytes, [0b0001_1111]);
    assert_eq!(back, Value::Integer(5));
}

#[test]
fn union_tag_scenario() {
    let schema = Schema::union([
        ("A", Schema::Str),
        ("B", Schema::Str),
        ("C", Schema::Str),
    ]);
    match &schema {
        Schema::Union(u) => assert_eq!(u.tag_bits(), 2),
        _ => unreachable!(),
    }
    let value = obj(&[("type", Value::from("B")), ("value", Value::from(""))]);
    let (bytes, back) = roundtrip(&schema, &value);
    // tag 1 in two bits, then the empty string terminator
    assert_eq!(bytes, [0b001]);
    assert_eq!(back, value);
}

#[test]
fn int8_scenario() {
    let (bytes, back) = roundtrip(&Schema::int(8), &Value::Integer(-1));
    assert_eq!(bytes, [0b1111_1111]);
    assert_eq!(back, Value::Integer(-1));
}

#[test]
fn empty_list_scenario() {
    let schema = Schema::list(Schema::uint(8));
    assert_eq!(bit_size(&schema, &Value::Array(vec![])), Ok(1));
    let (bytes, back) = roundtrip(&schema, &Value::Array(vec![]));
    assert_eq!(bytes, [0]);
    assert_eq!(back, Value::Array(vec![]));
}

#[test]
fn utf8_string_scenario() {
    let value = Value::from("é");
    assert_eq!(bit_size(&Schema::Str, &value), Ok(19));
    let (bytes, back) = roundtrip(&Schema::Str, &value);
    assert_eq!(bytes.len(), 3);
    assert_eq!(back, value);
}

#[test]
fn string_matrix() {
    let cases = ["", "hello", "café", "日本語", "\u{1f600} emoji", "a\u{0}b"];
    for case in cases {
        let value = Value::from(case);
        assert_eq!(
            bit_size(&Schema::Str, &value),
            Ok(1 + 9 * case.len() as u64)
        );
        let (_, back) = roundtrip(&Schema::Str, &value);
        assert_eq!(back, value, "{case:?}");
    }
}

#[test]
fn surrogate_handling() {
    let pair = Value::from_utf16(&[0xd83d, 0xde00]);
    assert_eq!(bit_size(&Schema::Str, &pair), Ok(1 + 9 * 4));
    let lone = Value::from_utf16(&[0xdc00]);
    assert_eq!(bit_size(&Schema::Str, &lone), Ok(1 + 9 * 3));
    let (_, back) = roundtrip(&Schema::Str, &lone);
    assert_eq!(back, Value::from("\u{fffd}"));
}

#[test]
fn union_tag_width_matrix() {
    for k in 1..=9usize {
        let variants: Vec<(String, Schema)> =
            (0..k).map(|i| (format!("v{i}"), Schema::uint(0))).collect();
        let schema = Schema::union(variants);
        let expected = if k == 1 {
            0
        } else {
            (k as f64).log2().ceil() as u64
        };
        let last = obj(&[
            ("type", Value::from(format!("v{}", k - 1))),
            ("value", Value::Integer(0)),
        ]);
        assert_eq!(bit_size(&schema, &last), Ok(expected), "k = {k}");
        let (_, back) = roundtrip(&schema, &last);
        assert_eq!(back, last);
    }
}

#[test]
fn struct_variant_roundtrip() {
    let schema = Schema::union([
        (
            "move",
            Schema::structure([("x", Schema::uint(5)), ("y", Schema::uint(5))]),
        ),
        ("pass", Schema::structure(Vec::<(&str, Schema)>::new())),
        ("say", Schema::Str),
    ]);
    let cases = [
        obj(&[
            ("type", Value::from("move")),
            ("x", Value::Integer(31)),
            ("y", Value::Integer(0)),
        ]),
        obj(&[("type", Value::from("pass"))]),
        obj(&[("type", Value::from("say")), ("value", Value::from("gg"))]),
    ];
    for case in cases {
        let (_, back) = roundtrip(&schema, &case);
        assert_eq!(back, case);
    }
}

#[test]
fn struct_field_order_is_declared_order() {
    let schema = Schema::structure([("b", Schema::uint(4)), ("a", Schema::uint(4))]);
    let value = obj(&[("a", Value::Integer(1)), ("b", Value::Integer(2))]);
    let bytes = encode(&schema, &value).unwrap();
    assert_eq!(bytes, [0x12]);
    let back = decode(&schema, &bytes).unwrap();
    assert_eq!(
        back,
        obj(&[("b", Value::Integer(2)), ("a", Value::Integer(1))])
    );
    assert!(back.equivalent(&value));
}

#[test]
fn map_from_object_decodes_to_equivalent_map() {
    let schema = Schema::map(Schema::Str, Schema::uint(8));
    let value = obj(&[("k1", Value::Integer(1)), ("k2", Value::Integer(2))]);
    let (_, back) = roundtrip(&schema, &value);
    assert!(matches!(back, Value::Map(_)));
    assert!(back.equivalent(&value));

    let keyed = Schema::map(Schema::tuple([Schema::uint(3), Schema::uint(3)]), Schema::Nat);
    let value = Value::Map(vec![
        (
            Value::Array(vec![Value::Integer(1), Value::Integer(7)]),
            Value::Integer(3),
        ),
        (
            Value::Array(vec![Value::Integer(0), Value::Integer(0)]),
            Value::Integer(0),
        ),
    ]);
    let (_, back) = roundtrip(&keyed, &value);
    assert_eq!(back, value);
}

#[test]
fn wide_integer_matrix() {
    let schema = Schema::tuple([
        Schema::uint(33),
        Schema::uint(53),
        Schema::uint(54),
        Schema::int(64),
        Schema::uint(128),
        Schema::int(0),
        Schema::uint(0),
    ]);
    let value = Value::Array(vec![
        Value::Integer((1 << 33) - 1),
        Value::Integer(bitpack::MAX_SAFE_INTEGER),
        Value::BigInt(BigInt::from(1u64 << 53)),
        Value::BigInt(BigInt::from(i64::MIN)),
        Value::BigInt(BigInt::from(u128::MAX)),
        Value::Integer(0),
        Value::Integer(0),
    ]);
    assert_eq!(bit_size(&schema, &value), Ok(33 + 53 + 54 + 64 + 128));
    let (_, back) = roundtrip(&schema, &value);
    assert_eq!(back, value);
}

#[test]
fn nested_containers_roundtrip() {
    let schema = Schema::structure([
        ("grid", Schema::vector(2, Schema::vector(3, Schema::int(3)))),
        ("log", Schema::list(Schema::tuple([Schema::Nat, Schema::Str]))),
        (
            "scores",
            Schema::map(Schema::Str, Schema::list(Schema::uint(10))),
        ),
    ]);
    let value = obj(&[
        (
            "grid",
            Value::Array(vec![
                Value::Array(vec![Value::Integer(-4), Value::Integer(0), Value::Integer(3)]),
                Value::Array(vec![Value::Integer(1), Value::Integer(-1), Value::Integer(2)]),
            ]),
        ),
        (
            "log",
            Value::Array(vec![
                Value::Array(vec![Value::Integer(0), Value::from("start")]),
                Value::Array(vec![Value::Integer(12), Value::from("ход")]),
            ]),
        ),
        (
            "scores",
            Value::Map(vec![
                (
                    Value::from("alice"),
                    Value::Array(vec![Value::Integer(1023), Value::Integer(0)]),
                ),
                (Value::from("bob"), Value::Array(vec![])),
            ]),
        ),
    ]);
    let (_, back) = roundtrip(&schema, &value);
    assert_eq!(back, value);
}

#[test]
fn encoder_and_decoder_structs_stream_values() {
    let mut encoder = BitPackEncoder::new();
    encoder.write_value(&Schema::Nat, &Value::Integer(2)).unwrap();
    encoder
        .write_value(&Schema::Str, &Value::from("ok"))
        .unwrap();
    encoder
        .write_value(&Schema::int(5), &Value::Integer(-16))
        .unwrap();
    let bytes = encoder.writer.flush();

    let mut decoder = BitPackDecoder::new(&bytes);
    assert_eq!(decoder.read_value(&Schema::Nat), Ok(Value::Integer(2)));
    assert_eq!(decoder.read_value(&Schema::Str), Ok(Value::from("ok")));
    assert_eq!(decoder.read_value(&Schema::int(5)), Ok(Value::Integer(-16)));
}
