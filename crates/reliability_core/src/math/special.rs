//! Standard normal special functions.
//!
//! Tail probabilities of the order of `1e-10` are routine in reliability
//! analysis, so the distribution function evaluates the lower tail directly
//! rather than as `1 - Φ(x)`.
//!
//! # Algorithms
//!
//! - Φ: Hart (1968) double precision rational approximation as presented by
//!   West (2005), "Better approximations to cumulative normal functions",
//!   switching to a continued fraction beyond |x| ≈ 7.07.
//! - Φ⁻¹: Acklam's rational approximation followed by one Halley step
//!   against Φ, giving close to full double precision.

/// 1/√(2π)
pub const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// √(2π)
pub const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

const ACKLAM_A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const ACKLAM_B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const ACKLAM_C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const ACKLAM_D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];
const ACKLAM_P_LOW: f64 = 0.024_25;

/// Standard normal density φ(x) = exp(−x²/2)/√(2π).
///
/// # Examples
/// ```
/// use reliability_core::math::special::normal_pdf;
/// assert!((normal_pdf(0.0) - 0.3989422804014327).abs() < 1e-15);
/// ```
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal distribution function Φ(x) = P(Z ≤ x).
///
/// Returns NaN for NaN input and saturates to 0 or 1 beyond |x| = 37.
///
/// # Examples
/// ```
/// use reliability_core::math::special::normal_cdf;
/// assert_eq!(normal_cdf(0.0), 0.5);
/// assert!((normal_cdf(1.959963984540054) - 0.975).abs() < 1e-12);
/// ```
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let tail = lower_tail(x.abs());
    if x <= 0.0 {
        tail
    } else {
        1.0 - tail
    }
}

/// Standard normal survival function 1 − Φ(x), accurate in the upper tail.
///
/// # Examples
/// ```
/// use reliability_core::math::special::{normal_cdf, normal_sf};
/// assert_eq!(normal_sf(3.0), normal_cdf(-3.0));
/// ```
#[inline]
pub fn normal_sf(x: f64) -> f64 {
    normal_cdf(-x)
}

/// Φ(−z) for z ≥ 0.
fn lower_tail(z: f64) -> f64 {
    if z > 37.0 {
        return 0.0;
    }
    let e = (-0.5 * z * z).exp();
    if z < 7.071_067_811_865_47 {
        let n = (((((3.526_249_659_989_11e-2 * z + 0.700_383_064_443_688) * z
            + 6.373_962_203_531_65)
            * z
            + 33.912_866_078_383)
            * z
            + 112.079_291_497_871)
            * z
            + 221.213_596_169_931)
            * z
            + 220.206_867_912_376;
        let d = ((((((8.838_834_764_831_84e-2 * z + 1.755_667_163_182_64) * z
            + 16.064_177_579_207)
            * z
            + 86.780_732_202_946_1)
            * z
            + 296.564_248_779_674)
            * z
            + 637.333_633_378_831)
            * z
            + 793.826_512_519_948)
            * z
            + 440.413_735_824_752;
        e * n / d
    } else {
        let f = z + 1.0 / (z + 2.0 / (z + 3.0 / (z + 4.0 / (z + 0.65))));
        e / f / SQRT_2PI
    }
}

/// Standard normal quantile Φ⁻¹(p).
///
/// # Returns
/// - NaN if `p` is NaN or outside [0, 1]
/// - −∞ for `p == 0`, +∞ for `p == 1`
///
/// # Examples
/// ```
/// use reliability_core::math::special::normal_quantile;
/// assert!(normal_quantile(0.5).abs() < 1e-15);
/// assert!((normal_quantile(0.975) - 1.959963984540054).abs() < 1e-12);
/// ```
pub fn normal_quantile(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    // 1 - p is exact for p in [0.5, 1], so work in the lower half only.
    let (q, sign) = if p > 0.5 { (1.0 - p, -1.0) } else { (p, 1.0) };
    sign * lower_quantile(q)
}

/// Φ⁻¹(q) for q in (0, 0.5].
fn lower_quantile(q: f64) -> f64 {
    let x = if q < ACKLAM_P_LOW {
        let t = (-2.0 * q.ln()).sqrt();
        (((((ACKLAM_C[0] * t + ACKLAM_C[1]) * t + ACKLAM_C[2]) * t + ACKLAM_C[3]) * t
            + ACKLAM_C[4])
            * t
            + ACKLAM_C[5])
            / ((((ACKLAM_D[0] * t + ACKLAM_D[1]) * t + ACKLAM_D[2]) * t + ACKLAM_D[3]) * t + 1.0)
    } else {
        let s = q - 0.5;
        let r = s * s;
        (((((ACKLAM_A[0] * r + ACKLAM_A[1]) * r + ACKLAM_A[2]) * r + ACKLAM_A[3]) * r
            + ACKLAM_A[4])
            * r
            + ACKLAM_A[5])
            * s
            / (((((ACKLAM_B[0] * r + ACKLAM_B[1]) * r + ACKLAM_B[2]) * r + ACKLAM_B[3]) * r
                + ACKLAM_B[4])
                * r
                + 1.0)
    };

    // Halley refinement
    let e = normal_cdf(x) - q;
    let u = e * SQRT_2PI * (0.5 * x * x).exp();
    let refined = x - u / (1.0 + 0.5 * x * u);
    if refined.is_finite() {
        refined
    } else {
        x
    }
}

/// Two-sided normal quantile z such that P(|Z| ≤ z) = `level`.
///
/// Returns NaN when `level` is outside (0, 1).
///
/// # Examples
/// ```
/// use reliability_core::math::special::two_sided_quantile;
/// assert!((two_sided_quantile(0.90) - 1.6448536269514729).abs() < 1e-12);
/// ```
#[inline]
pub fn two_sided_quantile(level: f64) -> f64 {
    if !(level > 0.0 && level < 1.0) {
        return f64::NAN;
    }
    normal_quantile(0.5 * (1.0 + level))
}
