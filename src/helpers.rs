//! Helper functions for grids, quadrature and common constants.

/// Small epsilon for numerical comparisons (e.g., avoiding division by zero).
pub const NUMERICAL_EPS: f64 = 1e-10;

/// Gauss-Legendre nodes on `[-1, 1]` (5-point rule, exact up to degree 9).
const GL_NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683_1,
    0.0,
    0.538_469_310_105_683_1,
    0.906_179_845_938_664,
];

/// Gauss-Legendre weights matching [`GL_NODES`].
const GL_WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189_1,
    0.478_628_670_499_366_5,
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
];

/// `n` equispaced points from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Quadrature points and weights covering `[a, b]` split into `n_intervals`
/// equal pieces, 5 Gauss-Legendre nodes per piece.
pub fn gauss_legendre(a: f64, b: f64, n_intervals: usize) -> (Vec<f64>, Vec<f64>) {
    let breaks = linspace(a, b, n_intervals.max(1) + 1);
    gauss_legendre_on(&breaks)
}

/// Gauss-Legendre points and weights over consecutive intervals
/// `[breaks[k], breaks[k + 1]]`. Zero-length intervals are skipped.
pub fn gauss_legendre_on(breaks: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut points = Vec::with_capacity(breaks.len() * GL_NODES.len());
    let mut weights = Vec::with_capacity(points.capacity());
    for w in breaks.windows(2) {
        let (lo, hi) = (w[0], w[1]);
        if hi - lo <= NUMERICAL_EPS {
            continue;
        }
        let half = (hi - lo) / 2.0;
        let mid = (hi + lo) / 2.0;
        for (node, weight) in GL_NODES.iter().zip(GL_WEIGHTS.iter()) {
            points.push(mid + half * node);
            weights.push(half * weight);
        }
    }
    (points, weights)
}

/// Whether two values agree up to a relative/absolute tolerance.
pub(crate) fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_gauss_legendre_exact_for_polynomials() {
        // ∫_0^2 t^7 dt = 2^8 / 8 = 32
        let (pts, w) = gauss_legendre(0.0, 2.0, 1);
        let integral: f64 = pts.iter().zip(&w).map(|(t, wi)| t.powi(7) * wi).sum();
        assert!((integral - 32.0).abs() < 1e-9, "got {}", integral);
    }

    #[test]
    fn test_gauss_legendre_skips_empty_intervals() {
        let (pts, w) = gauss_legendre_on(&[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(pts.len(), 5);
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
