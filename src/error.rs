use std::error::Error as StdError;
use std::fmt;
use std::result::Result as StdResult;

use arff::Error as ArffError;
use serde_json::Error as JsonError;

pub type Result<T> = StdResult<T, Error>;

#[derive(Debug)]
pub enum Error {
    Input(InputError),
    JsonError(JsonError),
    ArffError(ArffError),
}

/// Malformed or insufficient input. Names the precondition that failed.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    TooFewFolds { k: usize },
    TooFewLocations { found: usize },
    TooManyFolds { k: usize, locations: usize },
    NonFiniteCoordinate { index: usize },
    EmptyDomain,
    DegenerateDomain,
    InvalidConfig(String),
    MissingTarget,
    LengthMismatch { features: usize, targets: usize },
    RowOutOfRange { index: usize, rows: usize },
}

/// The search ended without matching the target distribution within tolerance.
///
/// Not fatal: the best assignment found is returned alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceWarning {
    pub divergence: f64,
    pub tolerance: f64,
    pub candidates_evaluated: usize,
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Error::Input(e)
    }
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Self {
        Error::JsonError(e)
    }
}

impl From<ArffError> for Error {
    fn from(e: ArffError) -> Self {
        Error::ArffError(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Input(ref e) => write!(f, "invalid input: {}", e),
            Error::JsonError(ref e) => write!(f, "json error: {}", e),
            Error::ArffError(ref e) => write!(f, "arff error: {:?}", e),
        }
    }
}

impl StdError for Error {}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InputError::TooFewFolds { k } => write!(f, "need at least 2 folds, got k = {}", k),
            InputError::TooFewLocations { found } => {
                write!(f, "need at least 2 distinct sample locations, found {}", found)
            }
            InputError::TooManyFolds { k, locations } => write!(
                f,
                "k = {} exceeds the number of distinct sample locations ({})",
                k, locations
            ),
            InputError::NonFiniteCoordinate { index } => {
                write!(f, "sample {} has a non-finite coordinate", index)
            }
            InputError::EmptyDomain => write!(f, "prediction domain is empty"),
            InputError::DegenerateDomain => write!(f, "prediction domain has no area"),
            InputError::InvalidConfig(ref msg) => write!(f, "invalid configuration: {}", msg),
            InputError::MissingTarget => write!(f, "data set has no target column"),
            InputError::LengthMismatch { features, targets } => write!(
                f,
                "{} feature rows but {} target values",
                features, targets
            ),
            InputError::RowOutOfRange { index, rows } => {
                write!(f, "fold refers to row {} but the data has {} rows", index, rows)
            }
        }
    }
}

impl StdError for InputError {}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "best divergence {:.4} exceeds tolerance {:.4} after {} candidates",
            self.divergence, self.tolerance, self.candidates_evaluated
        )
    }
}
