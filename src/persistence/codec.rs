//! Reversible encoding for persisted counters
//!
//! Values are stored as 16 hex digits of a scrambled u64 followed by a
//! 2-digit checksum, so a hand-edited or truncated value is detected instead
//! of silently loading garbage. Plain decimal strings from older saves are
//! still accepted.

use thiserror::Error;

const SCRAMBLE_KEY: u64 = 0x5A17_C0DE_9E37_79B9;
const ROTATION: u32 = 17;
const PAYLOAD_LEN: usize = 16;
const ENCODED_LEN: usize = PAYLOAD_LEN + 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("empty value")]
    Empty,
    #[error("checksum mismatch (expected {expected:02x}, found {found:02x})")]
    Checksum { expected: u8, found: u8 },
    #[error("malformed value {0:?}")]
    Malformed(String),
}

fn checksum(mixed: u64) -> u8 {
    mixed
        .to_le_bytes()
        .iter()
        .fold(0u8, |acc, b| acc.rotate_left(1) ^ b)
}

/// Encode a counter for storage
pub fn encode(value: u64) -> String {
    let mixed = (value ^ SCRAMBLE_KEY).rotate_left(ROTATION);
    format!("{:016x}{:02x}", mixed, checksum(mixed))
}

/// Decode a stored counter
pub fn decode(raw: &str) -> Result<u64, CodecError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CodecError::Empty);
    }

    let envelope = decode_envelope(raw);
    if envelope.is_ok() {
        return envelope;
    }

    // Older saves kept the bare number
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(value) = raw.parse::<u64>() {
            log::debug!("Accepted legacy decimal value {}", value);
            return Ok(value);
        }
    }
    envelope
}

fn decode_envelope(raw: &str) -> Result<u64, CodecError> {
    if raw.len() != ENCODED_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::Malformed(raw.to_string()));
    }
    let (payload, sum) = raw.split_at(PAYLOAD_LEN);
    let mixed =
        u64::from_str_radix(payload, 16).map_err(|_| CodecError::Malformed(raw.to_string()))?;
    let found = u8::from_str_radix(sum, 16).map_err(|_| CodecError::Malformed(raw.to_string()))?;
    let expected = checksum(mixed);
    if found != expected {
        return Err(CodecError::Checksum { expected, found });
    }
    Ok(mixed.rotate_right(ROTATION) ^ SCRAMBLE_KEY)
}
