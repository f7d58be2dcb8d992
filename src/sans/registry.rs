//! The table of known fields, with their converters and units.
//!
//! Adding a field means adding a row to [`REGISTRY`]. Units are attached to
//! values verbatim; no scaling is performed (a battery voltage of `12800` in
//! `mV` stays `12800`).

use alloc::string::String;

use super::value::{ConvertError, DeviceState, ErrorCode, Value};

use self::Converter::{AutoBase, Integer, Text};

/// How the text of a field becomes a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Converter {
    /// Signed decimal integer.
    Integer,
    /// Hexadecimal integer when prefixed by `0x`, decimal otherwise.
    AutoBase,
    /// Text passed through unchanged.
    Text,
    /// Operating state lookup on an auto-base integer.
    State,
    /// Error code lookup on an auto-base integer.
    Error,
}

impl Converter {
    pub fn convert(self, text: &str) -> Result<Value, ConvertError> {
        Ok(match self {
            Converter::Integer => Value::Integer(parse_integer(text)?),
            Converter::AutoBase => Value::Integer(parse_auto_base(text)?),
            Converter::Text => Value::Text(String::from(text)),
            Converter::State => Value::State(DeviceState::from_code(parse_auto_base(text)?)?),
            Converter::Error => Value::Error(ErrorCode::from_code(parse_auto_base(text)?)?),
        })
    }
}

/// A known field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub converter: Converter,
    pub unit: Option<&'static str>,
}

const fn field(name: &'static str, converter: Converter, unit: Option<&'static str>) -> FieldSpec {
    FieldSpec {
        name,
        converter,
        unit,
    }
}

/// Every field known to the decoder.
pub static REGISTRY: [FieldSpec; 55] = [
    field("V", Integer, Some("mV")),
    field("VS", Integer, Some("mV")),
    field("VM", Integer, Some("mV")),
    field("DM", Integer, Some("%")),
    field("VPV", Integer, Some("mV")),
    field("PPV", Integer, Some("W")),
    field("I", Integer, Some("mA")),
    field("IL", Integer, Some("mA")),
    field("LOAD", Text, None),
    field("T", Integer, Some("°C")),
    field("P", Integer, Some("W")),
    field("CE", Integer, Some("mAh")),
    field("SOC", Integer, Some("%")),
    field("TTG", Integer, Some("Minutes")),
    field("Alarm", Text, None),
    field("Relay", Text, None),
    field("AR", AutoBase, None),
    field("OR", AutoBase, None),
    field("H1", Integer, Some("mAh")),
    field("H2", Integer, Some("mAh")),
    field("H3", Integer, Some("mAh")),
    field("H4", Integer, None),
    field("H5", Integer, None),
    field("H6", Integer, Some("mAh")),
    field("H7", Integer, Some("mV")),
    field("H8", Integer, Some("mV")),
    field("H9", Integer, Some("Seconds")),
    field("H10", AutoBase, None),
    field("H11", AutoBase, None),
    field("H12", AutoBase, None),
    field("H13", AutoBase, None),
    field("H14", AutoBase, None),
    field("H15", Integer, Some("mV")),
    field("H16", Integer, Some("mV")),
    field("H17", Integer, Some("0.01 kWh")),
    field("H18", Integer, Some("0.01 kWh")),
    field("H19", Integer, Some("0.01 kWh")),
    field("H20", Integer, Some("0.01 kWh")),
    field("H21", Integer, Some("W")),
    field("H22", Integer, Some("0.01 kWh")),
    field("H23", Integer, Some("W")),
    field("ERR", Converter::Error, None),
    field("CS", Converter::State, Some("*")),
    field("BMV", Text, None),
    field("FW", Text, None),
    field("PID", Text, None),
    field("SER#", Text, None),
    field("HSDS", AutoBase, None),
    field("MODE", AutoBase, None),
    field("AC_OUT_V", Integer, Some("0.01 V")),
    field("AC_OUT_I", Integer, Some("0.1 A")),
    field("AC_OUT_S", Integer, Some("VA")),
    field("WARN", AutoBase, None),
    field("MPPT", AutoBase, None),
    field("MON", Integer, None),
];

/// Find the registry entry for a field name.
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    REGISTRY.iter().find(|f| f.name == name)
}

fn parse_integer(text: &str) -> Result<i64, ConvertError> {
    Ok(text.trim().parse()?)
}

fn parse_auto_base(text: &str) -> Result<i64, ConvertError> {
    let text = text.trim();

    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    else {
        return parse_integer(text);
    };

    // The sign goes before the prefix. Keep only a sign found after it, so
    // `from_str_radix` rejects it as a lone sign.
    let hex = match hex.as_bytes().first() {
        Some(b'+' | b'-') => &hex[..1],
        _ => hex,
    };

    let magnitude = i64::from_str_radix(hex, 16)?;
    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, a) in REGISTRY.iter().enumerate() {
            assert!(
                REGISTRY[i + 1..].iter().all(|b| b.name != a.name),
                "{} registered twice",
                a.name
            );
        }
    }

    #[test]
    fn lookup_known_and_unknown() {
        let v = lookup("V").unwrap();
        assert_eq!(v.converter, Converter::Integer);
        assert_eq!(v.unit, Some("mV"));

        assert_eq!(lookup("H19").unwrap().unit, Some("0.01 kWh"));
        assert_eq!(lookup("SER#").unwrap().converter, Converter::Text);

        assert!(lookup("V2").is_none());
        assert!(lookup("Checksum").is_none());
        assert!(lookup("v").is_none());
    }

    #[test]
    fn auto_base() {
        assert_eq!(parse_auto_base("0x0005"), Ok(5));
        assert_eq!(parse_auto_base("0XFF"), Ok(255));
        assert_eq!(parse_auto_base("-0x10"), Ok(-16));
        assert_eq!(parse_auto_base("42"), Ok(42));
        assert_eq!(parse_auto_base("007"), Ok(7));
        assert!(parse_auto_base("0x").is_err());
        assert!(parse_auto_base("ON").is_err());
    }

    #[test]
    fn auto_base_rejects_sign_after_prefix() {
        for text in ["0x-5", "-0x-5", "0x+5", "+0x+5", "0X-FF"] {
            assert!(
                matches!(parse_auto_base(text), Err(ConvertError::InvalidInteger(_))),
                "{text} accepted"
            );
        }

        assert!(matches!(
            Converter::AutoBase.convert("0x-5"),
            Err(ConvertError::InvalidInteger(_))
        ));
        assert_eq!(parse_auto_base("+0x5"), Ok(5));
    }

    #[test]
    fn converters() {
        assert_eq!(Converter::Integer.convert("-1500"), Ok(Value::Integer(-1500)));
        assert_eq!(Converter::Text.convert("ON"), Ok(Value::Text("ON".into())));
        assert_eq!(
            Converter::State.convert("3"),
            Ok(Value::State(DeviceState::Bulk))
        );
        assert_eq!(
            Converter::Error.convert("0x21"),
            Ok(Value::Error(ErrorCode::InputVoltageTooHigh))
        );
        assert_eq!(
            Converter::State.convert("8"),
            Err(ConvertError::UnknownState(8))
        );
        assert!(Converter::Integer.convert("0x10").is_err());
        assert!(Converter::Integer.convert("").is_err());
        assert!(Converter::Integer.convert("1_000").is_err());
        assert!(Converter::AutoBase.convert("0x1_0").is_err());
    }
}
