//! Deterministic fixed-point arithmetic for the economy engine.
//!
//! All growth and decay curves are evaluated in Q64.64 ([`Fix`]) with
//! truncating rounding, so two observers replaying the same history always
//! land on identical bits. Native floats never touch simulation state.

use fixed::types::I64F64;

/// Q64.64 signed fixed-point: 64 integer bits, 64 fractional bits.
///
/// Wide enough that `energy_cap * energy` products for the largest planets
/// stay inside the integer range.
pub type Fix = I64F64;

/// Timestamps are seconds supplied by the external clock source.
pub type Timestamp = u64;

/// ln(2) in Q64.64.
const LN2_BITS: i128 = 0xB172_17F7_D1CF_79AB;

/// Exponents at or above this evaluate to zero in Q64.64 anyway; short-circuit
/// so the integer-part loop stays bounded.
const EXP_NEG_CUTOFF: u32 = 45;

/// Convert an f64 to [`Fix`]. Use only for display math and test tolerances,
/// never in a state transition.
#[inline]
pub fn f64_to_fix(v: f64) -> Fix {
    Fix::from_num(v)
}

/// Convert [`Fix`] to f64. Use only for display/logging, never in a state
/// transition.
#[inline]
pub fn fix_to_f64(v: Fix) -> f64 {
    v.to_num::<f64>()
}

/// e^(-x) for x >= 0, evaluated deterministically.
///
/// Splits x into integer and fractional parts: the fractional part uses an
/// alternating Taylor series (24 terms, error below the Q64.64 ulp), the
/// integer part multiplies by a series-computed e^(-1).
pub fn exp_neg(x: Fix) -> Fix {
    debug_assert!(x >= Fix::ZERO, "exp_neg takes a non-negative exponent");
    if x >= Fix::from_num(EXP_NEG_CUTOFF) {
        return Fix::ZERO;
    }
    let n: u32 = x.int().to_num();
    let mut out = exp_neg_frac(x.frac());
    if n > 0 {
        let inv_e = exp_neg_frac(Fix::ONE);
        for _ in 0..n {
            out *= inv_e;
        }
    }
    out
}

/// 2^(-q) for q >= 0. The integer part of q is an exact bit shift; only
/// the fractional mantissa goes through e^(-f ln 2), so integer exponents
/// (including the dist == range case) lose no precision at all.
pub fn pow2_neg(q: Fix) -> Fix {
    debug_assert!(q >= Fix::ZERO, "pow2_neg takes a non-negative exponent");
    if q >= Fix::from_num(64) {
        return Fix::ZERO;
    }
    let n: u32 = q.int().to_num();
    let f = q.frac();
    let mantissa = if f == Fix::ZERO {
        Fix::ONE
    } else {
        exp_neg(f * Fix::from_bits(LN2_BITS))
    };
    mantissa >> n
}

/// e^(-f) for 0 <= f <= 1 by alternating Taylor series.
fn exp_neg_frac(f: Fix) -> Fix {
    let mut term = Fix::ONE;
    let mut sum = Fix::ONE;
    for k in 1..=24u32 {
        term = term * f / Fix::from_num(k);
        if term == Fix::ZERO {
            break;
        }
        if k % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
    }
    sum
}

/// Floor of the square root, for Euclidean distances between coordinates.
pub fn isqrt(v: u128) -> u64 {
    if v == 0 {
        return 0;
    }
    let bits = 128 - v.leading_zeros();
    let mut x = 1u128 << bits.div_ceil(2);
    loop {
        let y = (x + v / x) >> 1;
        if y >= x {
            break;
        }
        x = y;
    }
    x as u64
}
