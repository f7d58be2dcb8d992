//! Typed field values.

use alloc::string::String;
use core::{fmt, num::ParseIntError};

use thiserror::Error;
use zerocopy::TryFromBytes;

/// The converted value of a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Numeric fields, including bitmasks sent in hexadecimal.
    Integer(i64),
    /// Fields passed through as text, such as `PID` and `SER#`.
    Text(String),
    /// Operating state (field `CS`).
    State(DeviceState),
    /// Error code (field `ERR`).
    Error(ErrorCode),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::State(s) => write!(f, "{s}"),
            Value::Error(e) => write!(f, "{e}"),
        }
    }
}

/// An error converting the text of a known field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Text was not an integer.
    #[error("Invalid integer: {0}.")]
    InvalidInteger(#[from] ParseIntError),
    /// Integer was not a known operating state.
    #[error("Unknown operating state ({0}).")]
    UnknownState(i64),
    /// Integer was not a known error code.
    #[error("Unknown error code ({0}).")]
    UnknownError(i64),
}

/// Operating state of a charger or inverter.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromBytes)]
pub enum DeviceState {
    Off = 0,
    LowPower = 1,
    Fault = 2,
    Bulk = 3,
    Absorption = 4,
    Float = 5,
    Storage = 6,
    Equalize = 7,
    Inverting = 9,
    PowerSupply = 11,
    StartingUp = 245,
    RepeatedAbsorption = 246,
    AutoEqualize = 247,
    BatterySafe = 248,
    ExternalControl = 252,
}

impl DeviceState {
    /// Look up an operating state by its protocol code.
    pub fn from_code(code: i64) -> Result<Self, ConvertError> {
        let byte = u8::try_from(code).map_err(|_| ConvertError::UnknownState(code))?;
        let state: Result<Self, _> = zerocopy::try_transmute!(byte);
        state.map_err(|_| ConvertError::UnknownState(code))
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            DeviceState::Off => "Off",
            DeviceState::LowPower => "Low power",
            DeviceState::Fault => "Fault",
            DeviceState::Bulk => "Bulk",
            DeviceState::Absorption => "Absorption",
            DeviceState::Float => "Float",
            DeviceState::Storage => "Storage",
            DeviceState::Equalize => "Equalize (manual)",
            DeviceState::Inverting => "Inverting",
            DeviceState::PowerSupply => "Power supply",
            DeviceState::StartingUp => "Starting-up",
            DeviceState::RepeatedAbsorption => "Repeated absorption",
            DeviceState::AutoEqualize => "Auto equalize / Recondition",
            DeviceState::BatterySafe => "BatterySafe",
            DeviceState::ExternalControl => "External Control",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error reported by a charger.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromBytes)]
pub enum ErrorCode {
    NoError = 0,
    BatteryVoltageTooHigh = 2,
    ChargerTemperatureTooHigh = 17,
    ChargerOverCurrent = 18,
    ChargerCurrentReversed = 19,
    BulkTimeLimitExceeded = 20,
    CurrentSensorIssue = 21,
    TerminalsOverheated = 26,
    InputVoltageTooHigh = 33,
    InputCurrentTooHigh = 34,
    InputShutdown = 38,
    FactoryCalibrationDataLost = 116,
    InvalidFirmware = 117,
    UserSettingsInvalid = 119,
}

impl ErrorCode {
    /// Look up an error by its protocol code.
    pub fn from_code(code: i64) -> Result<Self, ConvertError> {
        let byte = u8::try_from(code).map_err(|_| ConvertError::UnknownError(code))?;
        let error: Result<Self, _> = zerocopy::try_transmute!(byte);
        error.map_err(|_| ConvertError::UnknownError(code))
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorCode::NoError => "No error",
            ErrorCode::BatteryVoltageTooHigh => "Battery voltage too high",
            ErrorCode::ChargerTemperatureTooHigh => "Charger temperature too high",
            ErrorCode::ChargerOverCurrent => "Charger over current",
            ErrorCode::ChargerCurrentReversed => "Charger current reversed",
            ErrorCode::BulkTimeLimitExceeded => "Bulk time limit exceeded",
            ErrorCode::CurrentSensorIssue => "Current sensor issue (sensor bias/sensor broken)",
            ErrorCode::TerminalsOverheated => "Terminals overheated",
            ErrorCode::InputVoltageTooHigh => "Input voltage too high (solar panel)",
            ErrorCode::InputCurrentTooHigh => "Input current too high (solar panel)",
            ErrorCode::InputShutdown => "Input shutdown (due to excessive battery voltage)",
            ErrorCode::FactoryCalibrationDataLost => "Factory calibration data lost",
            ErrorCode::InvalidFirmware => "Invalid/incompatible firmware",
            ErrorCode::UserSettingsInvalid => "User settings invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
