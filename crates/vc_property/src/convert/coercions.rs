//! The default coercions installed by [`TypeConverter::new`].

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use crate::convert::{CoercionError, ConversionKey, TypeConverter};
use crate::value::{EnumValue, IntType, Value, ValueKind, ValueType};

pub(super) fn register_defaults(converter: &mut TypeConverter) {
    use ConversionKey::Kind;

    converter.register(ValueKind::Text, Kind(ValueKind::Bool), text_to_bool);
    converter.register(ValueKind::Text, Kind(ValueKind::Int), text_to_int);
    converter.register(ValueKind::Text, Kind(ValueKind::Float), text_to_float);
    converter.register(ValueKind::Text, Kind(ValueKind::Char), text_to_char);
    converter.register(ValueKind::Text, Kind(ValueKind::Enum), text_to_enum);
    converter.register(ValueKind::Text, Kind(ValueKind::List), text_to_list);

    converter.register(ValueKind::Int, Kind(ValueKind::Float), int_to_float);
    converter.register(ValueKind::Float, Kind(ValueKind::Int), float_to_int);

    for kind in [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::Char,
        ValueKind::Enum,
    ] {
        converter.register(kind, Kind(ValueKind::Text), to_text);
    }

    for kind in [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::Char,
        ValueKind::Enum,
        ValueKind::Bean,
    ] {
        converter.register(kind, Kind(ValueKind::List), to_singleton_list);
    }
}

// -----------------------------------------------------------------------------
// Text sources

fn text(raw: &Value) -> &str {
    raw.as_text().unwrap_or_default()
}

fn text_to_bool(raw: &Value, _: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    let text = text(raw).trim();
    let value = match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => true,
        "false" | "no" | "off" | "0" => false,
        _ => return Err(CoercionError::InvalidBool(text.to_string())),
    };
    Ok(Value::Bool(value))
}

fn parse_int(text: &str, width: IntType) -> Result<i128, CoercionError> {
    let invalid = || CoercionError::InvalidNumber(text.to_string());

    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .or_else(|| digits.strip_prefix('#'))
    {
        (16, hex)
    } else {
        (10, digits)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    // A `u64` magnitude covers every supported width, `i64::MIN` included.
    let magnitude = u64::from_str_radix(digits, radix).map_err(|err| {
        use core::num::IntErrorKind;
        match err.kind() {
            IntErrorKind::PosOverflow => CoercionError::OutOfRange {
                value: text.to_string(),
                target: width,
            },
            _ => invalid(),
        }
    })?;
    let magnitude = i128::from(magnitude);
    Ok(if negative { -magnitude } else { magnitude })
}

/// The width named in range errors for `target`.
fn int_width(target: &ValueType) -> IntType {
    match target {
        ValueType::Int(ty) => *ty,
        _ => IntType::I64,
    }
}

fn text_to_int(raw: &Value, target: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    let text = text(raw).trim();
    let value = parse_int(text, int_width(target))?;
    match target {
        ValueType::Int(ty) if !ty.contains(value) => Err(CoercionError::OutOfRange {
            value: text.to_string(),
            target: *ty,
        }),
        _ => Ok(Value::Int(value)),
    }
}

fn text_to_float(raw: &Value, _: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    let text = text(raw).trim();
    text.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| CoercionError::InvalidNumber(text.to_string()))
}

fn text_to_char(raw: &Value, _: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    let text = text(raw);
    let invalid = || CoercionError::InvalidChar(text.to_string());

    let mut chars = text.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(Value::Char(c));
    }

    // `\uXXXX` escapes.
    let hex = text.strip_prefix("\\u").ok_or_else(invalid)?;
    if hex.len() != 4 {
        return Err(invalid());
    }
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .map(Value::Char)
        .ok_or_else(invalid)
}

fn text_to_enum(raw: &Value, target: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    let text = text(raw).trim();
    let ValueType::Enum(info) = target else {
        return Err(CoercionError::Unsupported {
            from: ValueKind::Text,
            to: target.clone(),
        });
    };
    match info.variant(text) {
        Some(variant) => Ok(Value::Enum(EnumValue {
            ty: info.ty(),
            variant,
        })),
        None => Err(CoercionError::UnknownVariant {
            variant: text.to_string(),
            ty: info.ty(),
        }),
    }
}

fn text_to_list(
    raw: &Value,
    target: &ValueType,
    converter: &TypeConverter,
) -> Result<Value, CoercionError> {
    let text = text(raw);
    let elem = target.element();
    if text.trim().is_empty() {
        return Ok(Value::List(Vec::new()));
    }

    let items = text
        .split(',')
        .map(|part| {
            let part = Value::Text(part.trim().to_string());
            let converted = converter.try_convert(&part, elem)?;
            Ok(converted.unwrap_or(part))
        })
        .collect::<Result<Vec<_>, CoercionError>>()?;
    Ok(Value::List(items))
}

// -----------------------------------------------------------------------------
// Numeric sources

fn int_to_float(raw: &Value, _: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    match raw {
        Value::Int(value) => Ok(Value::Float(*value as f64)),
        other => Err(CoercionError::Unsupported {
            from: other.kind(),
            to: ValueType::Float,
        }),
    }
}

fn float_to_int(raw: &Value, target: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    let Value::Float(value) = raw else {
        return Err(CoercionError::Unsupported {
            from: raw.kind(),
            to: target.clone(),
        });
    };
    if !value.is_finite() {
        return Err(CoercionError::InvalidNumber(alloc::format!("{value}")));
    }
    if *value < -9_223_372_036_854_775_808.0 || *value >= 18_446_744_073_709_551_616.0 {
        return Err(CoercionError::OutOfRange {
            value: alloc::format!("{value}"),
            target: int_width(target),
        });
    }
    // Only integral floats convert.
    let int = *value as i128;
    if int as f64 != *value {
        return Err(CoercionError::InvalidNumber(alloc::format!("{value}")));
    }
    match target {
        ValueType::Int(ty) if !ty.contains(int) => Err(CoercionError::OutOfRange {
            value: alloc::format!("{int}"),
            target: *ty,
        }),
        _ => Ok(Value::Int(int)),
    }
}

// -----------------------------------------------------------------------------
// Generic sources

fn to_text(raw: &Value, _: &ValueType, _: &TypeConverter) -> Result<Value, CoercionError> {
    Ok(Value::Text(alloc::format!("{raw}")))
}

fn to_singleton_list(
    raw: &Value,
    target: &ValueType,
    converter: &TypeConverter,
) -> Result<Value, CoercionError> {
    let item = converter
        .try_convert(raw, target.element())?
        .unwrap_or_else(|| raw.clone());
    Ok(Value::List(vec![item]))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use crate::convert::{CoercionError, ConversionKey, TypeConverter};
    use crate::value::{EnumInfo, EnumValue, IntType, Value, ValueKind, ValueType};

    enum Color {}

    fn color() -> EnumInfo {
        EnumInfo::of::<Color>(&["Red", "Green"])
    }

    fn int(ty: IntType) -> ValueType {
        ValueType::Int(ty)
    }

    #[test]
    fn text_to_bool() {
        let converter = TypeConverter::new();
        for (text, expected) in [("TRUE", true), (" on ", true), ("0", false), ("No", false)] {
            let out = converter.convert(text.into(), &ValueType::Bool).unwrap();
            assert_eq!(out, Value::Bool(expected), "{text}");
        }
        let err = converter.convert("maybe".into(), &ValueType::Bool).unwrap_err();
        assert_eq!(err.value, Value::Text("maybe".into()));
        assert_eq!(err.source, CoercionError::InvalidBool("maybe".into()));
    }

    #[test]
    fn text_to_int() {
        let converter = TypeConverter::new();
        let i64_ = int(IntType::I64);
        assert_eq!(converter.convert(" -42 ".into(), &i64_).unwrap(), Value::Int(-42));
        assert_eq!(converter.convert("#ff".into(), &i64_).unwrap(), Value::Int(255));
        assert_eq!(
            converter.convert("-9223372036854775808".into(), &i64_).unwrap(),
            Value::Int(-9_223_372_036_854_775_808)
        );
        assert_eq!(
            converter.convert("18446744073709551615".into(), &int(IntType::U64)).unwrap(),
            Value::Int(18_446_744_073_709_551_615)
        );
        assert!(matches!(
            converter.convert("18446744073709551616".into(), &int(IntType::U64)).unwrap_err().source,
            CoercionError::OutOfRange { target: IntType::U64, .. }
        ));
        assert!(matches!(
            converter.convert("9223372036854775808".into(), &i64_).unwrap_err().source,
            CoercionError::OutOfRange { target: IntType::I64, .. }
        ));
        assert!(matches!(
            converter.convert("foobar".into(), &i64_).unwrap_err().source,
            CoercionError::InvalidNumber(_)
        ));
        assert!(matches!(
            converter.convert("-1".into(), &int(IntType::U32)).unwrap_err().source,
            CoercionError::OutOfRange { target: IntType::U32, .. }
        ));
        assert!(matches!(
            converter.convert("--1".into(), &i64_).unwrap_err().source,
            CoercionError::InvalidNumber(_)
        ));
    }

    #[test]
    fn numeric_widening_and_narrowing() {
        let converter = TypeConverter::new();
        assert_eq!(
            converter.convert(Value::Int(3), &ValueType::Float).unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(
            converter.convert(Value::Float(4.0), &int(IntType::U8)).unwrap(),
            Value::Int(4)
        );
        assert!(converter.convert(Value::Float(4.5), &int(IntType::U8)).is_err());
        assert!(converter.convert(Value::Int(-1), &int(IntType::U8)).is_err());
    }

    #[test]
    fn chars_and_text() {
        let converter = TypeConverter::new();
        assert_eq!(
            converter.convert("\\u0041".into(), &ValueType::Char).unwrap(),
            Value::Char('A')
        );
        assert_eq!(converter.convert("é".into(), &ValueType::Char).unwrap(), Value::Char('é'));
        assert!(converter.convert("ab".into(), &ValueType::Char).is_err());
        assert_eq!(
            converter.convert(Value::Int(8), &ValueType::Text).unwrap(),
            Value::Text("8".into())
        );
    }

    #[test]
    fn enums() {
        let converter = TypeConverter::new();
        let target = ValueType::Enum(color());
        let out = converter.convert(" Green".into(), &target).unwrap();
        assert_eq!(
            out,
            Value::Enum(EnumValue {
                ty: color().ty(),
                variant: "Green"
            })
        );
        assert!(matches!(
            converter.convert("green".into(), &target).unwrap_err().source,
            CoercionError::UnknownVariant { .. }
        ));
        assert_eq!(
            converter.convert(out, &ValueType::Text).unwrap(),
            Value::Text("Green".into())
        );
    }

    #[test]
    fn collections() {
        let converter = TypeConverter::new();
        let list = ValueType::List(int(IntType::I32).into());
        assert_eq!(
            converter.convert("1, 2,3".into(), &list).unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            converter.convert(Value::Int(7), &list).unwrap(),
            Value::List(vec![Value::Int(7)])
        );
        assert_eq!(
            converter
                .convert(Value::List(vec![Value::Int(1), "2".into()]), &list)
                .unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );

        let mut raw = BTreeMap::new();
        raw.insert(String::from("a"), Value::from("1.5"));
        let map = ValueType::Map(ValueType::Float.into());
        let Value::Map(out) = converter.convert(Value::Map(raw), &map).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(out["a"], Value::Float(1.5));
    }

    #[test]
    fn optional_targets() {
        let converter = TypeConverter::new();
        let target = ValueType::Optional(int(IntType::I32).into());
        assert_eq!(converter.convert(Value::Null, &target).unwrap(), Value::Optional(None));
        assert_eq!(
            converter.convert("5".into(), &target).unwrap(),
            Value::Optional(Some(Value::Int(5).into()))
        );
        assert!(converter.convert(Value::Null, &int(IntType::I32)).is_err());
        assert_eq!(converter.convert(Value::Null, &ValueType::Any).unwrap(), Value::Null);
    }

    #[test]
    fn type_specific_coercion_wins() {
        let mut converter = TypeConverter::new();
        converter.register(
            ValueKind::Text,
            ConversionKey::of::<Color>(),
            |_, target, _| match target {
                ValueType::Enum(info) => Ok(Value::Enum(EnumValue {
                    ty: info.ty(),
                    variant: "Red",
                })),
                _ => Err(CoercionError::Custom("not a color".into())),
            },
        );
        let out = converter.convert("anything".into(), &ValueType::Enum(color())).unwrap();
        assert_eq!(
            out,
            Value::Enum(EnumValue {
                ty: color().ty(),
                variant: "Red"
            })
        );
        assert!(converter.contains(ValueKind::Text, ConversionKey::of::<Color>()));
    }

    #[test]
    fn empty_converter_only_passes_through() {
        let converter = TypeConverter::empty();
        assert!(converter.convert("1".into(), &int(IntType::I32)).is_err());
        assert_eq!(
            converter.convert(Value::Int(1), &int(IntType::I32)).unwrap(),
            Value::Int(1)
        );
    }
}
