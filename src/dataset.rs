use arff::dynamic::de::from_dataset;
use arff::dynamic::DataSet as ArffDataSet;

use crate::error::{InputError, Result};
use crate::geometry::SamplePoint;

/// A table of samples: coordinate columns, predictor columns and an optional target column
#[derive(Debug, Clone)]
pub struct DataSet {
    pub(crate) arff: ArffDataSet,
    pub(crate) target: Option<String>,
}

impl DataSet {
    /// parse an ARFF document
    pub fn from_arff(raw: &str, target: Option<&str>) -> Result<Self> {
        let arff = ArffDataSet::from_str(raw)?;
        Ok(DataSet {
            arff,
            target: target.map(str::to_owned),
        })
    }

    /// Remove the two coordinate columns and return them as sample points, identified by row.
    pub fn take_coordinates(self, x_col: &str, y_col: &str) -> Result<(DataSet, Vec<SamplePoint>)> {
        let (rest, dx) = self.arff.split_one(x_col);
        let (rest, dy) = rest.split_one(y_col);

        let xs: Vec<f64> = from_dataset(&dx)?;
        let ys: Vec<f64> = from_dataset(&dy)?;
        let samples = SamplePoint::from_coords(xs.into_iter().zip(ys));

        let data = DataSet {
            arff: rest,
            target: self.target,
        };
        Ok((data, samples))
    }

    /// return two `ArffDataSet`s; one containing the features and the other containing the target
    /// variable.
    pub(crate) fn clone_split(&self) -> Result<(ArffDataSet, ArffDataSet)> {
        match self.target {
            None => Err(InputError::MissingTarget.into()),
            Some(ref col) => {
                let data = self.arff.clone();
                Ok(data.split_one(col))
            }
        }
    }
}
