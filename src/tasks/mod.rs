//! Running a model once per fold and scoring its held-out predictions

mod spatial_regression;

pub use self::spatial_regression::SpatialRegression;

use crate::error::{InputError, Result};
use crate::measure_accumulator::MeasureAccumulator;
use crate::procedures::Procedure;

/// Cross-validate `flow` over the folds of `procedure`.
///
/// For every fold `flow` receives the training pairs and the test features and returns one
/// prediction per test row. Predictions of all folds are pooled into a single measure.
pub fn cross_validate<X, Y, F, M>(procedure: &dyn Procedure, x: &[X], y: &[Y], flow: F) -> Result<M>
where
    F: Fn(&mut dyn Iterator<Item = (&X, &Y)>, &mut dyn Iterator<Item = &X>) -> Box<dyn Iterator<Item = Y>>,
    M: MeasureAccumulator<Y>,
{
    if x.len() != y.len() {
        return Err(InputError::LengthMismatch {
            features: x.len(),
            targets: y.len(),
        }
        .into());
    }

    for fold in procedure.iter() {
        let mut rows = fold.trainset.iter().chain(fold.testset.iter());
        if let Some(&index) = rows.find(|&&i| i >= x.len()) {
            return Err(InputError::RowOutOfRange {
                index,
                rows: x.len(),
            }
            .into());
        }
    }

    let mut measure = M::new();

    for fold in procedure.iter() {
        let mut train = fold.trainset.iter().map(|&i| (&x[i], &y[i]));

        let mut test = fold.testset.iter().map(|&i| &x[i]);

        let predictit = flow(&mut train, &mut test);

        for (known, pred) in fold.testset.iter().map(|&i| &y[i]).zip(predictit) {
            measure.update_one(known, &pred);
        }
    }

    Ok(measure)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::measure_accumulator::RootMeanSquaredError;
    use crate::error::Error;
    use crate::procedures::{FoldAssignment, FrozenSets};

    fn echo(
        _: &mut dyn Iterator<Item = (&f64, &f64)>,
        test: &mut dyn Iterator<Item = &f64>,
    ) -> Box<dyn Iterator<Item = f64>> {
        let out: Vec<f64> = test.cloned().collect();
        Box::new(out.into_iter())
    }

    #[test]
    fn every_fold_sees_its_own_rows() {
        let folds = FoldAssignment::from_labels(&[0, 1, 0, 1], 2);
        let x = vec![10, 11, 12, 13];
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let seen = RefCell::new(vec![]);

        let _: RootMeanSquaredError<f64> = cross_validate(&folds, &x, &y, |train, test| {
            let train: Vec<i32> = train.map(|(&xi, _)| xi).collect();
            let test: Vec<i32> = test.cloned().collect();
            let out: Vec<f64> = test.iter().map(|_| 0.0).collect();
            seen.borrow_mut().push((train, test));
            Box::new(out.into_iter())
        })
        .unwrap();

        assert_eq!(
            seen.into_inner(),
            vec![(vec![11, 13], vec![10, 12]), (vec![10, 12], vec![11, 13])]
        );
    }

    #[test]
    fn mean_predictor_error() {
        let folds = FoldAssignment::from_labels(&[0, 0, 1, 1], 2);
        let x = vec![(); 4];
        let y = vec![1.0, 1.0, 3.0, 3.0];

        // each fold trains on the other fold's constant target
        let rmse: RootMeanSquaredError<f64> = cross_validate(&folds, &x, &y, |train, test| {
            let ys: Vec<f64> = train.map(|(_, &yi)| yi).collect();
            let mean = ys.iter().sum::<f64>() / ys.len() as f64;
            let out: Vec<f64> = test.map(|_| mean).collect();
            Box::new(out.into_iter())
        })
        .unwrap();

        assert_eq!(rmse.result(), 2.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let folds = FoldAssignment::from_labels(&[0, 1], 2);
        let result: Result<RootMeanSquaredError<f64>> =
            cross_validate(&folds, &[1.0, 2.0], &[1.0], |_, test| {
                let out: Vec<f64> = test.cloned().collect();
                Box::new(out.into_iter())
            });
        assert!(result.is_err());
    }

    #[test]
    fn assignment_longer_than_data_is_rejected() {
        let folds = FoldAssignment::from_labels(&[0, 1, 0, 1], 2);
        let result: Result<RootMeanSquaredError<f64>> =
            cross_validate(&folds, &[1.0, 2.0], &[1.0, 2.0], echo);

        match result {
            Err(Error::Input(InputError::RowOutOfRange { index, rows })) => {
                assert_eq!(index, 2);
                assert_eq!(rows, 2);
            }
            other => panic!("unexpected result {:?}", other.map(|m| m.result())),
        }
    }

    #[test]
    fn split_file_row_past_the_data_is_rejected() {
        let raw = "@RELATION splits\n\
                   \n\
                   @ATTRIBUTE type {TRAIN,TEST}\n\
                   @ATTRIBUTE rowid NUMERIC\n\
                   @ATTRIBUTE repeat NUMERIC\n\
                   @ATTRIBUTE fold NUMERIC\n\
                   \n\
                   @DATA\n\
                   TRAIN,0,0,0\n\
                   TRAIN,1,0,0\n\
                   TEST,9,0,0\n";
        let sets = FrozenSets::from_arff(raw).unwrap();

        let result: Result<RootMeanSquaredError<f64>> =
            cross_validate(&sets, &[1.0, 2.0], &[1.0, 2.0], echo);

        match result {
            Err(Error::Input(InputError::RowOutOfRange { index, rows })) => {
                assert_eq!(index, 9);
                assert_eq!(rows, 2);
            }
            other => panic!("unexpected result {:?}", other.map(|m| m.result())),
        }
    }
}
