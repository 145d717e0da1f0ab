use arff::dynamic::de::from_dataset;
use serde::de::DeserializeOwned;

use crate::dataset::DataSet;
use crate::error::Result;
use crate::geometry::{Domain, SamplePoint};
use crate::measure_accumulator::MeasureAccumulator;
use crate::procedures::{SpatialFoldAssigner, SpatialFolds};

use super::cross_validate;

/// Regression task validated on spatial folds.
///
/// The coordinate columns only place the samples; they are not passed to the model.
pub struct SpatialRegression {
    pub(crate) name: String,
    pub(crate) source_data: DataSet,
    pub(crate) samples: Vec<SamplePoint>,
    pub(crate) folds: SpatialFolds,
}

impl SpatialRegression {
    /// Split `data` into `k` spatial folds over `domain`, locating rows by the `x_col` and `y_col`
    /// columns.
    pub fn new(
        name: &str,
        data: DataSet,
        x_col: &str,
        y_col: &str,
        domain: &Domain,
        k: usize,
        assigner: &SpatialFoldAssigner,
    ) -> Result<Self> {
        let (source_data, samples) = data.take_coordinates(x_col, y_col)?;
        let folds = assigner.assign(&samples, domain, k)?;

        Ok(SpatialRegression {
            name: name.to_owned(),
            source_data,
            samples,
            folds,
        })
    }

    /// get task name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    /// the folds the task is validated on
    pub fn folds(&self) -> &SpatialFolds {
        &self.folds
    }

    /// run task, specifying the type of an entire feature row in `X`. This allows to run machine
    /// learning models that take features of different types, or named features in form of
    /// structs.
    pub fn run_static<X, Y, F, M>(&self, flow: F) -> Result<M>
    where
        F: Fn(&mut dyn Iterator<Item = (&X, &Y)>, &mut dyn Iterator<Item = &X>) -> Box<dyn Iterator<Item = Y>>,
        X: DeserializeOwned,
        Y: DeserializeOwned,
        M: MeasureAccumulator<Y>,
    {
        let (dx, dy) = self.source_data.clone_split()?;

        let x: Vec<X> = from_dataset(&dx)?;
        let y: Vec<Y> = from_dataset(&dy)?;

        cross_validate(&self.folds, &x, &y, flow)
    }

    /// run task, specifying the feature type in `X`. This allows to run machine learning models
    /// that expect every feature to have the same type.
    pub fn run<X, Y, F, M>(&self, flow: F) -> Result<M>
    where
        F: Fn(&mut dyn Iterator<Item = (&[X], &Y)>, &mut dyn Iterator<Item = &[X]>) -> Box<dyn Iterator<Item = Y>>,
        X: DeserializeOwned,
        Y: DeserializeOwned,
        M: MeasureAccumulator<Y>,
    {
        let (dx, dy) = self.source_data.clone_split()?;

        let x: Vec<X> = from_dataset(&dx)?;
        let y: Vec<Y> = from_dataset(&dy)?;

        let rows: Vec<&[X]> = x.chunks(dx.n_cols().max(1)).collect();

        cross_validate(&self.folds, &rows, &y, |train, test| {
            let mut train = train.map(|(&row, yi)| (row, yi));
            let mut test = test.map(|&row| row);
            flow(&mut train, &mut test)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Polygon};
    use crate::measure_accumulator::RootMeanSquaredError;

    const SITES: &str = "@RELATION richness

@ATTRIBUTE x NUMERIC
@ATTRIBUTE y NUMERIC
@ATTRIBUTE temperature NUMERIC
@ATTRIBUTE precipitation NUMERIC
@ATTRIBUTE richness NUMERIC

@DATA
0,0,10,100,20
1,0,11,110,22
0,1,10,120,20
1,1,12,100,24
50,50,20,300,40
51,50,21,310,42
50,51,20,320,40
51,51,22,300,44
";

    fn task() -> SpatialRegression {
        let data = DataSet::from_arff(SITES, Some("richness")).unwrap();
        let domain = Domain::polygon(Polygon::rectangle(
            Point::new(-100.0, -100.0),
            Point::new(200.0, 200.0),
        ));
        SpatialRegression::new(
            "richness",
            data,
            "x",
            "y",
            &domain,
            2,
            &SpatialFoldAssigner::default(),
        )
        .unwrap()
    }

    #[test]
    fn coordinates_become_samples() {
        let task = task();
        assert_eq!(task.name(), "richness");
        assert_eq!(task.samples().len(), 8);
        assert_eq!(task.samples()[5], SamplePoint::new(5, 51.0, 50.0));

        let mut tests: Vec<Vec<usize>> = task
            .folds()
            .assignment
            .folds()
            .iter()
            .map(|f| f.testset.clone())
            .collect();
        tests.sort();
        assert_eq!(tests, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
    }

    #[test]
    fn run_feeds_predictor_columns_only() {
        let task = task();

        let rmse: RootMeanSquaredError<f64> = task
            .run(|train, test| {
                for (x, _) in train {
                    assert_eq!(x.len(), 2);
                }
                let out: Vec<f64> = test.map(|x: &[f64]| x[0] * 2.0).collect();
                Box::new(out.into_iter())
            })
            .unwrap();

        assert_eq!(rmse.result(), 0.0);
    }
}
