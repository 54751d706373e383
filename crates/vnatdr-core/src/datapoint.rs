//! Single-frequency complex measurement

use num_complex::Complex64;

/// A complex reading at one frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datapoint {
    freq: f64,
    re: f64,
    im: f64,
}

/// Measurements of one channel, ordered by frequency
pub type Sweep = Vec<Datapoint>;

impl Datapoint {
    pub fn new(freq: f64, re: f64, im: f64) -> Self {
        Self { freq, re, im }
    }

    /// Create from a frequency and a complex value
    pub fn from_complex(freq: f64, z: Complex64) -> Self {
        Self::new(freq, z.re, z.im)
    }

    /// Frequency in Hz
    #[inline]
    pub fn freq(&self) -> f64 {
        self.freq
    }

    #[inline]
    pub fn re(&self) -> f64 {
        self.re
    }

    #[inline]
    pub fn im(&self) -> f64 {
        self.im
    }

    /// Complex value `re + i·im`
    #[inline]
    pub fn z(&self) -> Complex64 {
        Complex64::new(self.re, self.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datapoint_complex_value() {
        let dp = Datapoint::new(1e6, 0.25, -0.5);
        assert_eq!(dp.freq(), 1e6);
        assert_eq!(dp.z(), Complex64::new(0.25, -0.5));
        assert_eq!(Datapoint::from_complex(1e6, dp.z()), dp);
    }
}
