//! Measure accumulators are summaries of model performance, such as the regression error over all
//! held-out predictions.

use std::marker::PhantomData;
use num_traits::AsPrimitive;

/// Trait implemented by performance measures
pub trait MeasureAccumulator<T> {
    /// initialize new measure
    fn new() -> Self;

    /// update with one prediction
    fn update_one(&mut self, known: &T, pred: &T);

    /// get resulting performance
    fn result(&self) -> f64;

    /// update with multiple predictions
    fn update<I: Iterator<Item = T>>(&mut self, known: I, predicted: I) {
        for (k, p) in known.zip(predicted) {
            self.update_one(&k, &p)
        }
    }
}

/// Root Mean Squared Error
#[derive(Debug)]
pub struct RootMeanSquaredError<T> {
    sum_of_squares: f64,
    n: usize,
    _t: PhantomData<T>,
}

impl<T> MeasureAccumulator<T> for RootMeanSquaredError<T>
where
    T: AsPrimitive<f64>,
{
    fn new() -> Self {
        RootMeanSquaredError {
            sum_of_squares: 0.0,
            n: 0,
            _t: PhantomData,
        }
    }

    fn update_one(&mut self, known: &T, pred: &T) {
        let diff = known.as_() - pred.as_();
        self.sum_of_squares += diff * diff;
        self.n += 1;
    }

    fn result(&self) -> f64 {
        (self.sum_of_squares / self.n as f64).sqrt()
    }
}

/// Mean Absolute Error
#[derive(Debug)]
pub struct MeanAbsoluteError<T> {
    sum_of_abs: f64,
    n: usize,
    _t: PhantomData<T>,
}

impl<T> MeasureAccumulator<T> for MeanAbsoluteError<T>
where
    T: AsPrimitive<f64>,
{
    fn new() -> Self {
        MeanAbsoluteError {
            sum_of_abs: 0.0,
            n: 0,
            _t: PhantomData,
        }
    }

    fn update_one(&mut self, known: &T, pred: &T) {
        self.sum_of_abs += (known.as_() - pred.as_()).abs();
        self.n += 1;
    }

    fn result(&self) -> f64 {
        self.sum_of_abs / self.n as f64
    }
}

/// Coefficient of determination, `1 - SSE / SST`, pooled over all predictions
///
/// The total sum of squares is accumulated around a running mean (Welford), so targets with a
/// large offset keep their precision.
#[derive(Debug)]
pub struct RSquared<T> {
    mean: f64,
    total: f64,
    squared_error: f64,
    n: usize,
    _t: PhantomData<T>,
}

impl<T> MeasureAccumulator<T> for RSquared<T>
where
    T: AsPrimitive<f64>,
{
    fn new() -> Self {
        RSquared {
            mean: 0.0,
            total: 0.0,
            squared_error: 0.0,
            n: 0,
            _t: PhantomData,
        }
    }

    fn update_one(&mut self, known: &T, pred: &T) {
        let y = known.as_();
        let diff = y - pred.as_();
        self.n += 1;
        let delta = y - self.mean;
        self.mean += delta / self.n as f64;
        self.total += delta * (y - self.mean);
        self.squared_error += diff * diff;
    }

    fn result(&self) -> f64 {
        1.0 - self.squared_error / self.total
    }
}

#[test]
fn rmse() {
    let mut m: RootMeanSquaredError<f64> = MeasureAccumulator::new();
    m.update(vec![1.0, 2.0, 3.0, 4.0].into_iter(), vec![1.0, 2.0, 3.0, 6.0].into_iter());
    assert_eq!(m.result(), 1.0);
}

#[test]
fn mae() {
    let mut m: MeanAbsoluteError<i32> = MeasureAccumulator::new();
    m.update(vec![1, 2, 3, 4].into_iter(), vec![2, 2, 1, 4].into_iter());
    assert_eq!(m.result(), 0.75);
}

#[test]
fn r_squared() {
    let mut perfect: RSquared<f64> = MeasureAccumulator::new();
    perfect.update(vec![1.0, 2.0, 3.0].into_iter(), vec![1.0, 2.0, 3.0].into_iter());
    assert_eq!(perfect.result(), 1.0);

    // predicting the mean explains nothing
    let mut mean: RSquared<f64> = MeasureAccumulator::new();
    mean.update(vec![1.0, 2.0, 3.0].into_iter(), vec![2.0, 2.0, 2.0].into_iter());
    assert!(mean.result().abs() < 1e-12);
}

#[test]
fn r_squared_with_large_offset() {
    let mut m: RSquared<f64> = MeasureAccumulator::new();
    m.update(
        vec![1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0].into_iter(),
        vec![1e9 + 2.0, 1e9 + 2.0, 1e9 + 2.0].into_iter(),
    );
    assert!(m.result().abs() < 1e-9);

    let mut exact: RSquared<f64> = MeasureAccumulator::new();
    exact.update(
        vec![1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0].into_iter(),
        vec![1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0].into_iter(),
    );
    assert_eq!(exact.result(), 1.0);
}
