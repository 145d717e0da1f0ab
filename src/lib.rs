//! Spatially-aware cross-validation.
//!
//! Samples are assigned to folds so that held-out samples lie about as far from their training
//! data as the prediction domain lies from the samples. Validation error measured on such folds
//! then reflects prediction into unsampled space.
//!
//! ```
//! use spatialcv::prelude::*;
//! use spatialcv::{assign, Domain, Point, Polygon, SamplePoint};
//!
//! let samples = SamplePoint::from_coords(vec![
//!     (1.0, 1.0), (2.0, 1.0), (8.0, 8.0), (9.0, 8.0), (1.0, 9.0), (2.0, 9.0),
//! ]);
//! let domain = Domain::polygon(Polygon::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
//!
//! let folds = assign(&samples, &domain, 3).unwrap();
//! assert_eq!(folds.assignment.k(), 3);
//! for fold in folds.iter() {
//!     assert_eq!(fold.testset.len(), 2);
//! }
//! ```

extern crate arff;
#[macro_use]
extern crate log;
extern crate num_traits;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

pub mod clustering;
mod config;
mod dataset;
pub mod distance;
pub mod divergence;
mod error;
pub mod geometry;
mod measure_accumulator;
mod procedures;
mod tasks;

pub use crate::config::AssignerConfig;
pub use crate::dataset::DataSet;
pub use crate::error::{ConvergenceWarning, Error, InputError, Result};
pub use crate::geometry::{BoundingBox, Domain, Point, Polygon, SamplePoint};
pub use crate::measure_accumulator::{MeanAbsoluteError, RSquared, RootMeanSquaredError};
pub use crate::procedures::{
    assign, Fold, FoldAssignment, FrozenSets, SpatialFoldAssigner, SpatialFolds,
};
pub use crate::tasks::{cross_validate, SpatialRegression};

pub mod prelude {
    pub use crate::measure_accumulator::MeasureAccumulator;
    pub use crate::procedures::Procedure;
}
