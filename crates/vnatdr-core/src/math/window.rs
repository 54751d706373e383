//! Kaiser window generation
//!
//! The Kaiser window trades main lobe width against sidelobe level with a
//! single shape parameter β:
//!
//! - β = 0: Rectangular window
//! - β = 6: Similar to Hann
//! - β = 13: Very low sidelobes

/// Symmetric Kaiser window of `length` samples
///
/// `w[n] = I0(β·sqrt(1 - (2n/(N-1) - 1)²)) / I0(β)`
pub fn kaiser_window(length: usize, beta: f64) -> Vec<f64> {
    if length == 0 {
        return vec![];
    }
    if length == 1 {
        return vec![1.0];
    }

    let half = (length - 1) as f64 / 2.0;
    let i0_beta = bessel_i0(beta);

    (0..length)
        .map(|n| {
            let x = (n as f64 - half) / half;
            let arg = beta * (1.0 - x * x).max(0.0).sqrt();
            bessel_i0(arg) / i0_beta
        })
        .collect()
}

/// Modified Bessel function of the first kind, order 0.
///
/// Power series `sum((x/2)^(2k) / (k!)^2)`, summed until the terms stop
/// contributing. Converges quickly for the β range used by windows.
pub fn bessel_i0(x: f64) -> f64 {
    let half_sq = (x / 2.0) * (x / 2.0);
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;

    while term > sum * 1e-17 {
        term *= half_sq / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bessel_i0_values() {
        assert_eq!(bessel_i0(0.0), 1.0);
        assert_relative_eq!(bessel_i0(1.0), 1.2660658777520082, epsilon = 1e-14);
        assert_relative_eq!(bessel_i0(6.0), 67.23440697647797, max_relative = 1e-13);
        assert_relative_eq!(bessel_i0(13.0), 49444.489582217575, max_relative = 1e-12);
    }

    #[test]
    fn test_kaiser_beta_zero_is_rectangular() {
        let w = kaiser_window(16, 0.0);
        assert!(w.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_kaiser_is_symmetric_and_tapered() {
        let w = kaiser_window(21, 6.0);
        assert_eq!(w.len(), 21);
        assert_relative_eq!(w[10], 1.0, epsilon = 1e-12);
        for i in 0..10 {
            assert_relative_eq!(w[i], w[20 - i], epsilon = 1e-12);
            assert!(w[i] < w[i + 1]);
        }
        // Edge value is 1/I0(β)
        assert_relative_eq!(w[0], 1.0 / bessel_i0(6.0), epsilon = 1e-12);
    }

    #[test]
    fn test_kaiser_degenerate_lengths() {
        assert!(kaiser_window(0, 6.0).is_empty());
        assert_eq!(kaiser_window(1, 6.0), vec![1.0]);
    }
}
