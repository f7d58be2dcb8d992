//! Convenience interfaces for common reading patterns.
//!
//! The [`reader`] module drives the decoder from a serial port or any other
//! byte source, and [`slice`] decodes a captured stream held in memory. Both
//! publish [`TypedRecord`]s to a [`RecordSink`], which any closure taking a
//! record implements.
//!
//! Records can be mapped onto structs of a known shape with the
//! [`FromRecord`] trait, which in most cases can be derived. See the
//! [`FromRecord`](macro@FromRecord) macro for details.

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

use alloc::string::String;

#[cfg(feature = "std")]
pub use reader::Reader;
pub use slice::decode as decode_slice;

use crate::sans::{
    flags::{AlarmReason, OffReason, TrackerMode},
    typecast::TypedRecord,
    value::{DeviceState, ErrorCode, Value},
};

/// Receive typed records as they are decoded.
pub trait RecordSink {
    /// Accept one record.
    fn accept(&mut self, record: TypedRecord);
}

impl<F: FnMut(TypedRecord)> RecordSink for F {
    fn accept(&mut self, record: TypedRecord) {
        self(record)
    }
}

/// Derive [`FromRecord`] for a struct representing a device's fields.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive the value of a field, add the `field("NAME")` attribute to an
/// `Option<T>` struct field, where `NAME` is the protocol field name and `T`
/// implements [`FromValue`]. Values which cannot be represented as `T` are
/// skipped, and fields not named by any attribute are ignored.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct SolarCharger {
///     #[field("V")]
///     battery_voltage: Option<i64>,
///     #[field("PPV")]
///     panel_power: Option<i64>,
///     #[field("CS")]
///     state: Option<DeviceState>,
///     #[field("SER#")]
///     serial_number: Option<String>,
/// }
/// ```
///
/// To accumulate values or decode into other types, supply a handler
/// closure. Since the value type cannot be inferred, the second argument must
/// be typed.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct Monitor {
///     #[field("AR", |v, code: i64| *v = AlarmReason::from_code(code))]
///     alarm: Option<AlarmReason>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use vedirect_derive::FromRecord;

/// Receive the fields of a typed record.
///
/// See the [`FromRecord`](macro@FromRecord) derive macro for an automatic
/// implementation of this trait.
pub trait FromRecord {
    /// Add the value of a field to the struct.
    fn add_field(&mut self, name: &str, value: &Value);

    /// Build a struct from every field of a record.
    fn from_record(record: &TypedRecord) -> Self
    where
        Self: Default,
    {
        let mut o = Self::default();
        for (name, field) in record {
            o.add_field(name, &field.value);
        }
        o
    }
}

/// Extract a Rust type from a field value.
pub trait FromValue: Sized {
    /// Convert the value, if it holds this type.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(String::from)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {$(
        impl FromValue for $t {
            fn from_value(value: &Value) -> Option<Self> {
                value.as_integer().and_then(|n| n.try_into().ok())
            }
        }
    )*};
}

from_integer!(i64, i32, i16, u64, u32, u16, u8);

impl FromValue for DeviceState {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::State(s) => Some(*s),
            _ => None,
        }
    }
}

impl FromValue for ErrorCode {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl FromValue for AlarmReason {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer().and_then(AlarmReason::from_code)
    }
}

impl FromValue for OffReason {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer().and_then(OffReason::from_code)
    }
}

impl FromValue for TrackerMode {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer().and_then(TrackerMode::from_code)
    }
}
