#![no_std]

//! A decoder for Victron Energy's VE.Direct text protocol, as spoken by solar
//! charge controllers, battery monitors and inverters.
//!
//! VE.Direct devices transmit a block of tab-separated `key value` lines about
//! once a second, closed by a `Checksum` pseudo-field whose byte brings the
//! block's byte sum to zero. This crate validates those blocks and converts
//! their fields into typed values tagged with units.
//!
//! Most users should begin with the [`avec`] module, which drives the decoder
//! from a serial port (or any other byte source) and maps records onto
//! structs. Applications needing finer control, such as those running on
//! embedded systems, can feed bytes to the state machine in the [`sans`]
//! module directly.
//!
//! There is no code to open a serial port here. VE.Direct runs at 19200 baud,
//! 8 bits per byte, no parity with 1 stop bit (19200 8N1); configure your
//! serial peripheral as such, with a read timeout, and hand it to
//! [`avec::reader::Reader`].
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader-based decoder (default).

extern crate alloc;

pub mod avec;
pub mod sans;
