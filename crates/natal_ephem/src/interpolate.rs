//! Lagrange interpolation over uniformly spaced samples.
//!
//! Samples are indexed by a normalised abscissa: node `k` sits at `u = k`.
//! Callers map time onto `u` with `(t - t_first) / step` and divide
//! derivatives by `step`.

/// Evaluate the Lagrange polynomial through `(k, ys[k])` at `u`.
pub fn lagrange(ys: &[f64], u: f64) -> f64 {
    let n = ys.len();
    let mut sum = 0.0;
    for (j, &y) in ys.iter().enumerate() {
        let mut basis = 1.0;
        for m in 0..n {
            if m != j {
                basis *= (u - m as f64) / (j as f64 - m as f64);
            }
        }
        sum += y * basis;
    }
    sum
}

/// Derivative with respect to `u` of the Lagrange polynomial through
/// `(k, ys[k])`.
///
/// Uses the product-rule expansion of each basis polynomial, so it stays
/// finite when `u` coincides with a node.
pub fn lagrange_derivative(ys: &[f64], u: f64) -> f64 {
    let n = ys.len();
    let mut sum = 0.0;
    for (j, &y) in ys.iter().enumerate() {
        let xj = j as f64;
        let mut d_basis = 0.0;
        for k in (0..n).filter(|&k| k != j) {
            let mut term = 1.0 / (xj - k as f64);
            for m in (0..n).filter(|&m| m != j && m != k) {
                term *= (u - m as f64) / (xj - m as f64);
            }
            d_basis += term;
        }
        sum += y * d_basis;
    }
    sum
}

/// First index of an `n`-point window around sample `index`.
///
/// The window is centred on the interval `[index, index + 1]` and shifted
/// inward when it would run past either end of `len` samples.
pub fn window_start(index: usize, n: usize, len: usize) -> usize {
    if n >= len {
        return 0;
    }
    let centred = (index + 1).saturating_sub(n / 2);
    centred.min(len - n)
}

/// Remove 360° jumps so consecutive angles differ by less than 180°.
pub fn unwrap_degrees(angles: &mut [f64]) {
    for i in 1..angles.len() {
        let step = natal_frames::signed_diff_deg(angles[i], angles[i - 1]);
        angles[i] = angles[i - 1] + step;
    }
}
