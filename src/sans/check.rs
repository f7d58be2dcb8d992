//! Helper for computing frame checksums.
//!
//! A frame is valid when the sum of every byte from its leading carriage
//! return up to and including the checksum byte is zero, modulo 256.

/// Accumulate a slice of bytes into a checksum value.
pub fn compute_checksum(init: u8, r: &[u8]) -> u8 {
    r.iter().fold(init, |acc, b| acc.wrapping_add(*b))
}

/// Compute the trailing byte which brings the sum of a frame to zero.
///
/// `r` must hold the whole frame up to, but excluding, the checksum byte
/// (that is, ending with `Checksum\t`).
pub fn checksum_byte(r: &[u8]) -> u8 {
    compute_checksum(0, r).wrapping_neg()
}
