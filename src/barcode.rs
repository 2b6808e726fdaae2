//! EAN-13 check digit and GTIN normalization.

use std::fmt;

use crate::error::{InvalidInput, InvalidReason};

pub const PAYLOAD_LEN: usize = 12;
pub const GTIN_LEN: usize = 13;

/// A canonical 13-digit GTIN whose last digit is always the check digit of
/// the first twelve. Only [`normalize`] builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gtin(String);

impl Gtin {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 12-digit payload handed to the symbology encoder.
    pub fn payload(&self) -> &str {
        &self.0[..PAYLOAD_LEN]
    }
}

impl fmt::Display for Gtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Gtin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn ensure_digits(raw: &str) -> Result<(), InvalidInput> {
    match raw.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        Some((position, found)) => Err(InvalidInput {
            raw: raw.to_string(),
            reason: InvalidReason::NonDigit { position, found },
        }),
        None => Ok(()),
    }
}

// Caller guarantees 12 ASCII digits.
fn check_digit_of(payload: &[u8]) -> char {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            // position from the right is i + 1: odd positions weigh 3
            if i % 2 == 0 { d * 3 } else { d }
        })
        .sum();
    let check = (10 - sum % 10) % 10;
    char::from(b'0' + check as u8)
}

/// EAN-13 check digit of a 12-digit payload.
///
/// Total over 12-digit decimal strings; anything else is rejected as
/// [`InvalidInput`].
pub fn checksum(payload: &str) -> Result<char, InvalidInput> {
    ensure_digits(payload)?;
    if payload.len() != PAYLOAD_LEN {
        return Err(InvalidInput {
            raw: payload.to_string(),
            reason: InvalidReason::Length(payload.len()),
        });
    }
    Ok(check_digit_of(payload.as_bytes()))
}

/// Turn a raw 12- or 13-digit code into a canonical GTIN.
///
/// A 13-digit input keeps only its first twelve digits; the check digit is
/// always recomputed, so a wrong or stale one is silently repaired.
/// No trimming happens here.
pub fn normalize(raw: &str) -> Result<Gtin, InvalidInput> {
    ensure_digits(raw)?;
    let payload = match raw.len() {
        PAYLOAD_LEN | GTIN_LEN => &raw[..PAYLOAD_LEN],
        n => {
            return Err(InvalidInput { raw: raw.to_string(), reason: InvalidReason::Length(n) });
        }
    };
    let mut code = String::with_capacity(GTIN_LEN);
    code.push_str(payload);
    code.push(check_digit_of(payload.as_bytes()));
    Ok(Gtin(code))
}
