//! Conversion of raw text records into typed records.

use alloc::{collections::BTreeMap, string::String};

use log::warn;
use thiserror::Error;

use super::{
    frame::RawRecord,
    registry::lookup,
    value::{ConvertError, Value},
};

/// A converted field value, tagged with its unit if the field has one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedField {
    pub value: Value,
    pub unit: Option<&'static str>,
}

/// The typed fields of one frame, keyed by registered field name.
pub type TypedRecord = BTreeMap<&'static str, TypedField>;

/// A field dropped while typecasting a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldIssue {
    /// The field name is not in the registry.
    #[error("Unknown field {name:?} with value {value:?}.")]
    Unknown { name: String, value: String },
    /// The registered converter rejected the field's text.
    #[error("Invalid value {value:?} for field {name}: {source}")]
    Invalid {
        name: &'static str,
        value: String,
        #[source]
        source: ConvertError,
    },
}

/// Convert every field of a record, logging a warning for each field that is
/// dropped.
pub fn typecast(raw: &RawRecord) -> TypedRecord {
    typecast_with(raw, |issue| warn!("{issue}"))
}

/// Convert every field of a record, reporting each field that is dropped.
///
/// Unknown fields and fields whose text does not convert are left out of the
/// result; the remaining fields are unaffected.
pub fn typecast_with(raw: &RawRecord, mut on_issue: impl FnMut(FieldIssue)) -> TypedRecord {
    let mut typed = TypedRecord::new();

    for (name, text) in raw.iter() {
        let Some(spec) = lookup(name) else {
            on_issue(FieldIssue::Unknown {
                name: name.into(),
                value: text.into(),
            });
            continue;
        };

        match spec.converter.convert(text) {
            Ok(value) => {
                typed.insert(
                    spec.name,
                    TypedField {
                        value,
                        unit: spec.unit,
                    },
                );
            }
            Err(source) => on_issue(FieldIssue::Invalid {
                name: spec.name,
                value: text.into(),
                source,
            }),
        }
    }

    typed
}

#[cfg(test)]
mod tests {
    use alloc::{borrow::ToOwned, vec::Vec};

    use super::*;
    use crate::sans::value::{DeviceState, ErrorCode};

    fn raw(fields: &[(&str, &str)]) -> RawRecord {
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn minimal_record() {
        let typed = typecast(&raw(&[("V", "0")]));

        assert_eq!(typed.len(), 1);
        assert_eq!(
            typed["V"],
            TypedField {
                value: Value::Integer(0),
                unit: Some("mV"),
            }
        );
    }

    #[test]
    fn unknown_field_is_dropped() {
        let mut issues = Vec::new();
        let typed = typecast_with(&raw(&[("ZZZ", "1"), ("V", "0")]), |i| issues.push(i));

        assert_eq!(typed.keys().copied().collect::<Vec<_>>(), ["V"]);
        assert_eq!(
            issues,
            [FieldIssue::Unknown {
                name: "ZZZ".into(),
                value: "1".into(),
            }]
        );
    }

    #[test]
    fn invalid_value_is_dropped() {
        let mut issues = Vec::new();
        let typed = typecast_with(
            &raw(&[("CS", "8"), ("ERR", "0"), ("I", "lots")]),
            |i| issues.push(i),
        );

        assert_eq!(typed.len(), 1);
        assert_eq!(typed["ERR"].value, Value::Error(ErrorCode::NoError));
        assert_eq!(typed["ERR"].unit, None);

        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0],
            FieldIssue::Invalid {
                name: "CS",
                value: "8".into(),
                source: ConvertError::UnknownState(8),
            }
        );
        assert!(matches!(issues[1], FieldIssue::Invalid { name: "I", .. }));
    }

    #[test]
    fn charger_record() {
        let typed = typecast(&raw(&[
            ("PID", "0xA053"),
            ("FW", "159"),
            ("SER#", "HQ1328A1B2C"),
            ("V", "13790"),
            ("I", "-200"),
            ("VPV", "18370"),
            ("PPV", "4"),
            ("CS", "5"),
            ("MPPT", "2"),
            ("OR", "0x00000000"),
            ("ERR", "0"),
            ("LOAD", "ON"),
            ("H19", "1027"),
            ("H20", "2"),
            ("H21", "12"),
            ("H22", "5"),
            ("H23", "33"),
            ("HSDS", "151"),
        ]));

        assert_eq!(typed.len(), 18);
        assert_eq!(typed["PID"].value, Value::Text("0xA053".into()));
        assert_eq!(typed["FW"].value, Value::Text("159".into()));
        assert_eq!(typed["I"].value, Value::Integer(-200));
        assert_eq!(typed["I"].unit, Some("mA"));
        assert_eq!(typed["CS"].value, Value::State(DeviceState::Float));
        assert_eq!(typed["CS"].unit, Some("*"));
        assert_eq!(typed["OR"].value, Value::Integer(0));
        assert_eq!(typed["H19"].unit, Some("0.01 kWh"));
        assert_eq!(typed["H21"].unit, Some("W"));
        assert_eq!(typed["HSDS"].value, Value::Integer(151));
        assert_eq!(typed["LOAD"].unit, None);
    }
}
