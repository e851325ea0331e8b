//! Least-squares quadratic fit against the frame index.
//!
//! The fit is computed in the orthogonal basis `{1, u, u^2 - s2/n}` over the centred index
//! `u = t - (n - 1) / 2`. The three coefficients decouple into independent projections, so the
//! fit stays well conditioned for long series and reproduces constant traces exactly.

use ndarray::ArrayView1;

/// Sample-point basis for frames `0..n`. Reused across every series of the same length.
#[derive(Debug, Clone)]
pub struct QuadraticBasis {
    center: f64,
    q: f64,
    u: Vec<f64>,
    p2: Vec<f64>,
    norm1: f64,
    norm2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticFit {
    center: f64,
    q: f64,
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

impl QuadraticBasis {
    pub const MIN_SAMPLES: usize = 3;

    pub fn new(n: usize) -> Option<Self> {
        if n < Self::MIN_SAMPLES {
            return None;
        }
        let center = (n - 1) as f64 / 2.0;
        let u: Vec<f64> = (0..n).map(|t| t as f64 - center).collect();
        let norm1: f64 = u.iter().map(|v| v * v).sum();
        let q = norm1 / n as f64;
        let p2: Vec<f64> = u.iter().map(|v| v * v - q).collect();
        let norm2: f64 = p2.iter().map(|v| v * v).sum();
        Some(Self {
            center,
            q,
            u,
            p2,
            norm1,
            norm2,
        })
    }

    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// Panics if `values` does not have `self.len()` samples.
    pub fn fit(&self, values: ArrayView1<'_, f64>) -> QuadraticFit {
        assert_eq!(values.len(), self.len(), "series length does not match basis");
        let n = self.len() as f64;
        let mut c0 = 0.0;
        for v in values.iter() {
            c0 += *v;
        }
        c0 /= n;

        let mut dot1 = 0.0;
        let mut dot2 = 0.0;
        for ((v, u), p2) in values.iter().zip(&self.u).zip(&self.p2) {
            let y = *v - c0;
            dot1 += y * u;
            dot2 += y * p2;
        }

        QuadraticFit {
            center: self.center,
            q: self.q,
            c0,
            c1: dot1 / self.norm1,
            c2: dot2 / self.norm2,
        }
    }
}

impl QuadraticFit {
    pub fn eval(&self, t: f64) -> f64 {
        let u = t - self.center;
        self.c0 + self.c1 * u + self.c2 * (u * u - self.q)
    }

    pub fn fitted(&self, n: usize) -> Vec<f64> {
        (0..n).map(|t| self.eval(t as f64)).collect()
    }

    /// Coefficients of `a*t^2 + b*t + c` in the raw frame index, highest degree first.
    pub fn coefficients(&self) -> [f64; 3] {
        let a = self.c2;
        let b = self.c1 - 2.0 * self.c2 * self.center;
        let c = self.c0 - self.c1 * self.center + self.c2 * (self.center * self.center - self.q);
        [a, b, c]
    }
}
