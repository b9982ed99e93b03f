use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("invalid duration {0:?}")]
    InvalidNumber(String),

    #[error("negative duration {0:?}")]
    Negative(String),

    #[error("duration {0:?} is out of range")]
    Overflow(String),
}

const NANOS_PER_UNIT: &[(&str, u64)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000), // U+00B5 micro sign
    ("μs", 1_000), // U+03BC greek mu
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Parse a duration like `300ms`, `1.5h` or `3s30ms`.
///
/// The format is a sequence of decimal numbers, each with an optional
/// fraction and a mandatory unit (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`).
/// A bare `0` is accepted. Negative durations are rejected since they cannot
/// be represented by [`Duration`].
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let mut s = input;

    if let Some(rest) = s.strip_prefix('-') {
        return match parse_duration(rest) {
            Ok(d) if d.is_zero() => Ok(d),
            Ok(_) => Err(DurationError::Negative(input.to_string())),
            Err(e) => Err(e),
        };
    }
    s = s.strip_prefix('+').unwrap_or(s);

    if s.is_empty() {
        return Err(DurationError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let invalid = || DurationError::InvalidNumber(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let mut total: u128 = 0;

    while !s.is_empty() {
        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, rest) = s.split_at(int_len);

        let (frac_part, rest) = match rest.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", rest),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        let (unit, rest) = rest.split_at(unit_len);

        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, nanos)| u128::from(*nanos))
            .ok_or_else(|| DurationError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            })?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        total = whole
            .checked_mul(scale)
            .and_then(|v| v.checked_add(total))
            .ok_or_else(overflow)?;

        // Fractions are truncated to whole nanoseconds.
        let mut divisor: u128 = 1;
        let mut frac: u128 = 0;
        for digit in frac_part.bytes().map(|b| u128::from(b - b'0')) {
            if divisor > scale {
                break;
            }
            frac = frac * 10 + digit;
            divisor *= 10;
        }
        total = total
            .checked_add(frac * scale / divisor)
            .ok_or_else(overflow)?;

        s = rest;
    }

    let secs = u64::try_from(total / 1_000_000_000).map_err(|_| overflow())?;
    let nanos = (total % 1_000_000_000) as u32;
    Ok(Duration::new(secs, nanos))
}
