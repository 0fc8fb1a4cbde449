//! Float comparison in units of last place, for tests that check exact
//! reproduction of reference values.

/// Maps the bit pattern of `x` onto a monotonic unsigned scale.
#[inline]
fn monotonic_bits(x: f64) -> u64 {
    const SIGN: u64 = 1 << 63;
    let bits = x.to_bits();
    if bits & SIGN == 0 {
        bits | SIGN
    } else {
        !bits
    }
}

/// Count of doubles separating `a` from `b`.
#[inline]
pub fn ulp_diff(a: f64, b: f64) -> u64 {
    monotonic_bits(a).abs_diff(monotonic_bits(b))
}

#[track_caller]
pub fn assert_ulp_le(a: f64, b: f64, max_ulp: u64, ctx: &str) {
    if a == 0.0 && b == 0.0 {
        return;
    }
    assert!(a.is_finite() && b.is_finite(), "{}: {} vs {}", ctx, a, b);
    let d = ulp_diff(a, b);
    assert!(d <= max_ulp, "{}: {} and {} are {} ULP apart", ctx, a, b, d);
}

#[macro_export]
macro_rules! assert_ulp_lt {
    ($a:expr, $b:expr, $max_ulp:expr) => {
        $crate::test_helpers::assert_ulp_le(
            $a,
            $b,
            $max_ulp,
            concat!(stringify!($a), " ~ ", stringify!($b)),
        )
    };
    ($a:expr, $b:expr, $max_ulp:expr, $($arg:tt)*) => {
        $crate::test_helpers::assert_ulp_le($a, $b, $max_ulp, &format!($($arg)*))
    };
}
