//! Empirical distributions and the statistics used to compare them.

use std::cmp::Ordering;

/// How far apart two empirical distance distributions are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Divergence {
    /// maximum absolute gap between the two CDFs
    KolmogorovSmirnov,

    /// area between the two CDFs, divided by a length scale
    Wasserstein,
}

impl Default for Divergence {
    fn default() -> Self {
        Divergence::Wasserstein
    }
}

impl Divergence {
    /// Compare two distributions. `scale` normalizes the Wasserstein distance and is ignored by
    /// Kolmogorov-Smirnov.
    pub fn between(&self, a: &Ecdf, b: &Ecdf, scale: f64) -> f64 {
        match *self {
            Divergence::KolmogorovSmirnov => kolmogorov_smirnov(a, b),
            Divergence::Wasserstein => {
                let w = wasserstein(a, b);
                if scale > 0.0 {
                    w / scale
                } else {
                    w
                }
            }
        }
    }
}

/// Empirical cumulative distribution function
#[derive(Debug, Clone)]
pub struct Ecdf {
    sorted: Vec<f64>,
}

impl Ecdf {
    /// NaN values are dropped
    pub fn new(mut values: Vec<f64>) -> Self {
        values.retain(|v| !v.is_nan());
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Ecdf { sorted: values }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.sorted
    }

    /// fraction of values `<= x`
    pub fn eval(&self, x: f64) -> f64 {
        if self.sorted.is_empty() {
            return 0.0;
        }
        let below = self.sorted.partition_point(|&v| v <= x);
        below as f64 / self.sorted.len() as f64
    }
}

/// sorted union of both sample sets; the CDFs only change at these points
fn breakpoints(a: &Ecdf, b: &Ecdf) -> Vec<f64> {
    let mut points: Vec<f64> = a.sorted.iter().chain(b.sorted.iter()).cloned().collect();
    points.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
    points.dedup();
    points
}

fn kolmogorov_smirnov(a: &Ecdf, b: &Ecdf) -> f64 {
    breakpoints(a, b)
        .into_iter()
        .map(|x| (a.eval(x) - b.eval(x)).abs())
        .fold(0.0, f64::max)
}

fn wasserstein(a: &Ecdf, b: &Ecdf) -> f64 {
    let points = breakpoints(a, b);
    points
        .windows(2)
        .map(|w| (a.eval(w[0]) - b.eval(w[0])).abs() * (w[1] - w[0]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecdf_steps() {
        let e = Ecdf::new(vec![3.0, 1.0, 2.0, 2.0]);
        assert_eq!(e.values(), &[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(e.eval(0.5), 0.0);
        assert_eq!(e.eval(2.0), 0.75);
        assert_eq!(e.eval(10.0), 1.0);
    }

    #[test]
    fn identical_distributions_do_not_diverge() {
        let a = Ecdf::new(vec![1.0, 2.0, 3.0]);
        let b = Ecdf::new(vec![3.0, 2.0, 1.0]);
        assert_eq!(Divergence::KolmogorovSmirnov.between(&a, &b, 1.0), 0.0);
        assert_eq!(Divergence::Wasserstein.between(&a, &b, 1.0), 0.0);
    }

    #[test]
    fn shifted_distributions() {
        let a = Ecdf::new(vec![0.0, 1.0]);
        let b = Ecdf::new(vec![2.0, 3.0]);

        assert_eq!(Divergence::KolmogorovSmirnov.between(&a, &b, 1.0), 1.0);

        // the area between two unit steps shifted by 2
        assert!((Divergence::Wasserstein.between(&a, &b, 1.0) - 2.0).abs() < 1e-12);
        assert!((Divergence::Wasserstein.between(&a, &b, 4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn partial_overlap() {
        let a = Ecdf::new(vec![1.0, 2.0]);
        let b = Ecdf::new(vec![2.0]);
        assert_eq!(Divergence::KolmogorovSmirnov.between(&a, &b, 1.0), 0.5);
        assert!((Divergence::Wasserstein.between(&a, &b, 1.0) - 0.5).abs() < 1e-12);
    }
}
