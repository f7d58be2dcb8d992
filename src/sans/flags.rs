//! Interpretation of bitmask and enumeration fields.
//!
//! The registry decodes these fields to plain integers. The types here give
//! their bits names, for example `AlarmReason::from_code(0x0005)` has
//! `low_voltage()` and `low_soc()` set.

use core::fmt;

use tartan_bitfield::bitfield;
use zerocopy::TryFromBytes;

bitfield! {
    pub struct AlarmReason(u16) {
        [0] pub low_voltage,
        [1] pub high_voltage,
        [2] pub low_soc,
        [3] pub low_starter_voltage,
        [4] pub high_starter_voltage,
        [5] pub low_temperature,
        [6] pub high_temperature,
        [7] pub mid_voltage,
        [8] pub overload,
        [9] pub dc_ripple,
        [10] pub low_ac_out_voltage,
        [11] pub high_ac_out_current,
        [12] pub short_circuit,
        [13] pub bms_lockout,
    }
}

const ALARM_LABELS: [(fn(AlarmReason) -> bool, &str); 14] = [
    (|r| r.low_voltage(), "Low Voltage"),
    (|r| r.high_voltage(), "High Voltage"),
    (|r| r.low_soc(), "Low SOC"),
    (|r| r.low_starter_voltage(), "Low Starter Voltage"),
    (|r| r.high_starter_voltage(), "High Starter Voltage"),
    (|r| r.low_temperature(), "Low Temperature"),
    (|r| r.high_temperature(), "High Temperature"),
    (|r| r.mid_voltage(), "Mid Voltage"),
    (|r| r.overload(), "Overload"),
    (|r| r.dc_ripple(), "DC-ripple"),
    (|r| r.low_ac_out_voltage(), "Low V AC out"),
    (|r| r.high_ac_out_current(), "High C AC out"),
    (|r| r.short_circuit(), "Short Circuit"),
    (|r| r.bms_lockout(), "BMS Lockout"),
];

impl AlarmReason {
    /// Interpret the value of an `AR` or `WARN` field.
    ///
    /// Returns `None` for values outside 16 bits.
    pub fn from_code(code: i64) -> Option<Self> {
        u16::try_from(code).ok().map(AlarmReason)
    }

    /// Labels of the active alarm reasons, from the lowest bit up.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        ALARM_LABELS
            .into_iter()
            .filter(move |(is_set, _)| is_set(self))
            .map(|(_, label)| label)
    }
}

bitfield! {
    pub struct OffReason(u32) {
        [0] pub no_input_power,
        [1] pub power_switch,
        [2] pub device_mode,
        [3] pub remote_input,
        [4] pub protection_active,
        [5] pub paygo,
        [6] pub bms,
        [7] pub engine_shutdown,
        [8] pub analyzing_input_voltage,
    }
}

const OFF_LABELS: [(fn(OffReason) -> bool, &str); 9] = [
    (|r| r.no_input_power(), "No input power"),
    (|r| r.power_switch(), "Switched off (power switch)"),
    (|r| r.device_mode(), "Switched off (device mode register)"),
    (|r| r.remote_input(), "Remote input"),
    (|r| r.protection_active(), "Protection active"),
    (|r| r.paygo(), "Paygo"),
    (|r| r.bms(), "BMS"),
    (|r| r.engine_shutdown(), "Engine shutdown detection"),
    (|r| r.analyzing_input_voltage(), "Analyzing input voltage"),
];

impl OffReason {
    /// Interpret the value of an `OR` field.
    ///
    /// Returns `None` for values outside 32 bits.
    pub fn from_code(code: i64) -> Option<Self> {
        u32::try_from(code).ok().map(OffReason)
    }

    /// Labels of the active off reasons, from the lowest bit up.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        OFF_LABELS
            .into_iter()
            .filter(move |(is_set, _)| is_set(self))
            .map(|(_, label)| label)
    }
}

/// Tracker operation mode (field `MPPT`).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromBytes)]
pub enum TrackerMode {
    Off = 0,
    Limited = 1,
    Active = 2,
}

impl TrackerMode {
    pub fn from_code(code: i64) -> Option<Self> {
        let byte = u8::try_from(code).ok()?;
        let mode: Result<Self, _> = zerocopy::try_transmute!(byte);
        mode.ok()
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackerMode::Off => "Off",
            TrackerMode::Limited => "Voltage or current limited",
            TrackerMode::Active => "MPPT Tracker active",
        }
    }
}

impl fmt::Display for TrackerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn alarm_bits() {
        let reason = AlarmReason::from_code(0x0005).unwrap();

        assert!(reason.low_voltage());
        assert!(!reason.high_voltage());
        assert!(reason.low_soc());
        assert_eq!(reason.labels().collect::<Vec<_>>(), ["Low Voltage", "Low SOC"]);

        assert!(AlarmReason::from_code(0x1_0000).is_none());
    }

    #[test]
    fn off_bits() {
        let reason = OffReason::from_code(0x0000_0101).unwrap();

        assert_eq!(
            reason.labels().collect::<Vec<_>>(),
            ["No input power", "Analyzing input voltage"]
        );
        assert_eq!(OffReason::from_code(0).unwrap().labels().count(), 0);
    }

    #[test]
    fn tracker_modes() {
        assert_eq!(TrackerMode::from_code(2), Some(TrackerMode::Active));
        assert_eq!(TrackerMode::from_code(3), None);
    }
}
