//! IO-free core: the frame state machine and the field registry.
//!
//! This module is intended for applications that need fine control over how
//! bytes reach the decoder. See [`crate::avec`] for implementations covering
//! common reading patterns.
//!
//! # Architecture
//!
//! Decoding happens in two stages:
//!
//! 1. A [`FrameParser`](frame::FrameParser) accepts one byte at a time and
//!    returns a [`RawRecord`](frame::RawRecord) of text fields on the byte
//!    that completes a frame with a valid checksum. Frames with a bad checksum
//!    are dropped whole, and the parser resynchronises on the next frame
//!    header, so no byte sequence can leave it stuck.
//!
//! 2. [`typecast`](typecast::typecast) looks each field up in the
//!    [`registry`], converting its text into a [`Value`](value::Value) and
//!    attaching the field's unit. Unknown fields and values the registry
//!    rejects are dropped individually.
//!
//! Some areas of the decoding process are left to the application:
//!
//! - Reading bytes from the transport, and deciding what to do when it times
//!   out or closes.
//!
//! - Using one parser per connection. A parser holds the partially received
//!   frame, so interleaving bytes from two devices into one parser corrupts
//!   both streams.
//!
//! Implementers are recommended to begin by studying the reader in
//! [`crate::avec::reader`].

pub mod check;
pub mod flags;
pub mod frame;
pub mod registry;
pub mod typecast;
pub mod value;

/// Entrypoint to the state machine.
pub type Decoder = frame::FrameParser;
