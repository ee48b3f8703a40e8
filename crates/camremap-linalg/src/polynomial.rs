/// Evaluate a polynomial with Horner's method.
///
/// # Arguments
///
/// * `coeffs` - The coefficients in ascending power order, `coeffs[0]` is the constant term.
/// * `x` - The value to evaluate the polynomial at.
///
/// # Returns
///
/// The value of the polynomial at `x`, or `0.0` for an empty coefficient list.
///
/// # Example
///
/// ```
/// use camremap_linalg::evaluate_polynomial;
///
/// assert_eq!(evaluate_polynomial(&[1.0, 0.0, -2.0], 3.0), -17.0);
/// ```
pub fn evaluate_polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluate `1 + c[0] x + c[1] x^2 + ...`, a polynomial whose constant term is fixed to one.
///
/// Distortion coefficients are stored without the implicit leading one, an empty
/// list evaluates to `1.0`.
pub fn evaluate_unit_polynomial(coeffs: &[f64], x: f64) -> f64 {
    1.0 + x * evaluate_polynomial(coeffs, x)
}

/// Evaluate a truncated Fourier series in the azimuth angle.
///
/// The coefficients are grouped in `(cos, sin)` pairs starting at harmonic 1:
/// `sum_k c[2k-2] * cos(k * phi) + c[2k-1] * sin(k * phi)`.
///
/// # Arguments
///
/// * `coeffs` - The coefficient pairs, the length is expected to be even.
/// * `phi` - The angle in radians.
///
/// # Returns
///
/// The value of the series, `0.0` for an empty coefficient list. A trailing
/// unpaired coefficient is ignored.
pub fn evaluate_fourier(coeffs: &[f64], phi: f64) -> f64 {
    coeffs
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let (sin_k, cos_k) = ((i + 1) as f64 * phi).sin_cos();
            pair[0] * cos_k + pair[1] * sin_k
        })
        .sum()
}

/// Check whether every coefficient equals zero. True for an empty list.
pub fn is_zero(coeffs: &[f64]) -> bool {
    coeffs.iter().all(|&c| c == 0.0)
}

/// Check whether an optional distortion term takes part in the evaluation.
///
/// A term is active when its coefficient list is non-empty and not all zero.
pub fn is_active(coeffs: &[f64]) -> bool {
    !coeffs.is_empty() && !is_zero(coeffs)
}
