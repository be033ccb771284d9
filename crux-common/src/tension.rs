//! Per-curve tension derivation
//!
//! Every attempt curve gets a smoothing strength derived from the athlete's
//! name and the attempt number, so that overlapping curves of different
//! athletes bend differently while the same attempt always draws the same way.
//!
//! The name hash is a 31-multiplier string hash over UTF-16 code units with
//! wrapping 32-bit signed arithmetic. Changing the width or the code unit
//! encoding changes every rendered curve, so both are fixed here.

/// Lower bound of any tension
pub const MIN_TENSION: f64 = 0.2;

/// Upper bound of any tension
pub const MAX_TENSION: f64 = 0.85;

const BASE_TENSION: f64 = 0.3;
const BASE_SPAN: f64 = 0.4;
const BOOST_PER_ATTEMPT: f64 = 0.05;
const MAX_ATTEMPT_BOOST: f64 = 0.15;

/// 32-bit signed string hash: `hash = hash * 31 + code_unit`, wrapping
pub fn hash_string(identity: &str) -> i32 {
    identity
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Map an identity onto [0, 1] by reinterpreting its hash as unsigned
pub fn hash_string_to_unit(identity: &str) -> f64 {
    f64::from(hash_string(identity) as u32) / f64::from(u32::MAX)
}

/// Additive boost for later attempts, capped at 0.15
///
/// Attempts that are not finite, or exactly zero, count as attempt 1.
/// Attempts below 1 are not floored and yield a negative boost.
pub fn attempt_boost(attempt: f64) -> f64 {
    let attempt = if attempt.is_finite() && attempt != 0.0 {
        attempt
    } else {
        1.0
    };
    ((attempt - 1.0) * BOOST_PER_ATTEMPT).min(MAX_ATTEMPT_BOOST)
}

/// Tension in [0.2, 0.85] for one (identity, attempt) pair
pub fn tension(identity: &str, attempt: f64) -> f64 {
    let base = BASE_TENSION + hash_string_to_unit(identity) * BASE_SPAN;
    (base + attempt_boost(attempt)).clamp(MIN_TENSION, MAX_TENSION)
}
